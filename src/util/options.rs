use crate::util::constants::*;
use crate::util::layout::Endianness;
use crate::util::tags::ForwardingTag;
use std::default::Default;

fn always_valid<T>(_: &T) -> bool {
    true
}

macro_rules! options {
    ($($name:ident: $type:ty[$validator:expr] = $default:expr),*,) => [
        options!($($name: $type[$validator] = $default),*);
    ];
    ($($name:ident: $type:ty[$validator:expr] = $default:expr),*) => [
        /// Options that describe the object model's header word.
        #[derive(Clone, Debug)]
        pub struct Options {
            $(pub $name: $type),*
        }
        impl Options {
            /// Set an option by its snake case name. Returns false and keeps the old value if
            /// the value cannot be parsed or is invalid.
            pub fn set_from_str(&mut self, s: &str, val: &str) -> bool {
                match s {
                    // Parse the given value from str (by env vars or by calling process()) to the right type
                    $(stringify!($name) => if let Ok(ref val) = val.parse::<$type>() {
                        // Validate
                        let validate_fn = $validator;
                        let is_valid = validate_fn(val);
                        if is_valid {
                            // Only set value if valid.
                            self.$name = val.clone();
                        } else {
                            warn!("Unable to set {}={:?}. Invalid value. Default value will be used.", s, val);
                        }
                        is_valid
                    } else {
                        warn!("Unable to set {}={:?}. Cant parse value. Default value will be used.", s, val);
                        false
                    })*
                    _ => panic!("Invalid Options key: {}", s)
                }
            }
        }
        impl Default for Options {
            fn default() -> Self {
                let mut options = Options {
                    $($name: $default),*
                };

                // If we have env vars that start with SCAVENGER_ and match any option (such as SCAVENGER_GROWTH_TAGGING),
                // we set the option to its value (if it is a valid value). Otherwise, use the default value.
                const PREFIX: &str = "SCAVENGER_";
                for (key, val) in std::env::vars() {
                    // strip the prefix, and get the lower case string
                    if let Some(rest_of_key) = key.strip_prefix(PREFIX) {
                        let lowercase: &str = &rest_of_key.to_lowercase();
                        match lowercase {
                            $(stringify!($name) => { options.set_from_str(lowercase, &val); },)*
                            _ => {}
                        }
                    }
                }
                options
            }
        }
    ]
}

options! {
    // Offset of the header word from the object reference. Must be word aligned.
    header_offset:             isize      [|v: &isize| *v % BYTES_IN_WORD as isize == 0] = 0,
    // log2 of the minimal object alignment. Must leave room for every tag.
    log_min_object_alignment:  usize      [|v: &usize| *v >= ForwardingTag::LOG_TAG_BITS_REQUIRED && *v < BITS_IN_HALF_WORD] = LOG_MIN_OBJECT_ALIGNMENT as usize,
    // Are references stored compressed (half a word)? Only supported on 64-bit targets.
    compressed_references:     bool       [|v: &bool| !*v || BITS_IN_WORD == 64] = false,
    // Byte order of the header word.
    header_endianness:         Endianness [always_valid] = Endianness::NATIVE,
    // Record whether a destination copy was grown during evacuation.
    growth_tagging:            bool       [always_valid] = false,
}

impl Options {
    /// Set an option by its camel case name, as a binding would pass it (e.g. `growthTagging`).
    pub fn process(&mut self, name: &str, value: &str) -> bool {
        trace!("Trying to process option pair: ({}, {})", name, value);

        let mut sr = String::with_capacity(name.len());
        for c in name.chars() {
            if c.is_uppercase() {
                sr.push('_');
                for c in c.to_lowercase() {
                    sr.push(c);
                }
            } else {
                sr.push(c)
            }
        }

        let result = self.set_from_str(sr.as_str(), value);

        if result {
            trace!("Validation passed");
        } else {
            trace!("Validation failed")
        }
        result
    }
}
