#![allow(dead_code)]

use scavenger_forwarding::{Address, ForwardingCodec, ObjectReference};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A from-space made of header words only. Each header is the whole object.
pub struct HeaderSpace {
    headers: Vec<AtomicUsize>,
}

impl HeaderSpace {
    /// `count` objects in the plain state. Object `i` has the class reference
    /// `class_base + i * 16`.
    pub fn new(codec: &ForwardingCodec, count: usize, class_base: usize) -> Self {
        let headers = (0..count)
            .map(|i| AtomicUsize::new(codec.plain_word(address(class_base + i * 16))))
            .collect();
        Self { headers }
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn object(&self, index: usize) -> ObjectReference {
        ObjectReference::from_raw_address(Address::from_ref(&self.headers[index])).unwrap()
    }

    pub fn header_word(&self, index: usize) -> usize {
        self.headers[index].load(Ordering::SeqCst)
    }
}

pub fn address(raw: usize) -> Address {
    unsafe { Address::from_usize(raw) }
}

pub fn object_reference(raw: usize) -> ObjectReference {
    ObjectReference::from_raw_address(address(raw)).unwrap()
}

/// Install the built-in logger so `RUST_LOG=trace` shows every claim.
pub fn init_logger() {
    let _ = scavenger_forwarding::util::logger::try_init();
}
