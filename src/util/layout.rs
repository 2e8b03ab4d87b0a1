use crate::util::address::ByteOffset;
use crate::util::constants::*;
use crate::util::options::Options;
use crate::util::tags::ForwardingTag;

/// Byte order of the header word in memory.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, strum_macros::EnumString, strum_macros::Display)]
#[strum(ascii_case_insensitive)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    /// The byte order of the build target.
    pub const NATIVE: Endianness = if cfg!(target_endian = "big") {
        Endianness::Big
    } else {
        Endianness::Little
    };
}

/// How the object model lays out the header word that holds the class reference, and
/// therefore the forwarding pointer once the object is evacuated.
///
/// This is a runtime value so one build can serve several object models, and so the
/// big-endian compressed layout can be exercised on any host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HeaderLayout {
    /// Offset of the header word from the object reference, in bytes.
    pub header_offset: ByteOffset,
    /// log2 of the minimal object alignment. The low `log_min_object_alignment` bits of the
    /// logical header word are reserved for tags.
    pub log_min_object_alignment: usize,
    /// Are object references stored as half-word compressed references? If so, the class
    /// reference occupies one half of the header word.
    pub compressed_references: bool,
    /// Byte order of the header word.
    pub endianness: Endianness,
    /// Does the collector record whether a destination copy was grown? Collection modes that
    /// never enlarge objects leave this off.
    pub growth_tagging: bool,
}

impl HeaderLayout {
    /// Uncompressed header at the start of the object, native byte order, minimal alignment,
    /// no growth tagging.
    pub const fn native() -> Self {
        let layout = Self {
            header_offset: 0,
            log_min_object_alignment: LOG_MIN_OBJECT_ALIGNMENT as usize,
            compressed_references: false,
            endianness: Endianness::NATIVE,
            growth_tagging: false,
        };
        layout.validate();
        layout
    }

    pub const fn with_header_offset(self, header_offset: ByteOffset) -> Self {
        Self {
            header_offset,
            ..self
        }
    }

    pub const fn with_log_min_object_alignment(self, log_min_object_alignment: usize) -> Self {
        Self {
            log_min_object_alignment,
            ..self
        }
    }

    pub const fn with_compressed_references(self, compressed_references: bool) -> Self {
        Self {
            compressed_references,
            ..self
        }
    }

    pub const fn with_endianness(self, endianness: Endianness) -> Self {
        Self { endianness, ..self }
    }

    pub const fn with_growth_tagging(self, growth_tagging: bool) -> Self {
        Self {
            growth_tagging,
            ..self
        }
    }

    /// The minimal object alignment in bytes.
    pub const fn min_object_alignment(&self) -> usize {
        1 << self.log_min_object_alignment
    }

    /// All bits reserved for tags in the logical header word.
    pub const fn tag_mask(&self) -> usize {
        self.min_object_alignment() - 1
    }

    /// With compressed references on a big-endian machine, the class reference lives in the
    /// high half of the word value, so the halves must be swapped before tagging.
    pub const fn needs_half_word_swap(&self) -> bool {
        self.compressed_references && matches!(self.endianness, Endianness::Big)
    }

    /// Panics if the layout cannot hold a tagged forwarding pointer.
    pub const fn validate(&self) {
        assert!(self.log_min_object_alignment >= ForwardingTag::LOG_TAG_BITS_REQUIRED);
        assert!(self.log_min_object_alignment < LOG_BITS_IN_WORD);
        assert!(self.header_offset % BYTES_IN_WORD as isize == 0);
        if self.compressed_references {
            // A compressed reference is half a word. It only makes sense on 64-bit targets.
            assert!(BITS_IN_WORD == 64);
            assert!(self.log_min_object_alignment < BITS_IN_HALF_WORD);
        }
    }

    /// Build the layout from options.
    pub fn from_options(options: &Options) -> Self {
        let layout = Self {
            header_offset: options.header_offset,
            log_min_object_alignment: options.log_min_object_alignment,
            compressed_references: options.compressed_references,
            endianness: options.header_endianness,
            growth_tagging: options.growth_tagging,
        };
        layout.validate();
        debug!("Header layout from options: {:?}", layout);
        layout
    }
}

impl Default for HeaderLayout {
    fn default() -> Self {
        Self::native()
    }
}
