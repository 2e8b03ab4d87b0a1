use crate::util::codec::ForwardingCodec;
use crate::util::constants::BYTES_IN_WORD;
use crate::util::{Address, ObjectReference};
use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

const TEST_OBJECT_WORDS: usize = 4;
// The object reference points into the middle so tests can place the header before it.
const REFERENCE_WORD: usize = 2;

/// A few words of aligned memory standing in for a heap object.
#[repr(C, align(16))]
pub struct TestObject {
    words: [AtomicUsize; TEST_OBJECT_WORDS],
}

impl TestObject {
    /// Allocate an object in the plain state with the class reference `class`.
    pub fn new(codec: &ForwardingCodec, class: Address) -> Box<TestObject> {
        let object = Box::new(TestObject {
            words: Default::default(),
        });
        object.words[object.header_index(codec)].store(codec.plain_word(class), Ordering::SeqCst);
        object
    }

    pub fn object(&self) -> ObjectReference {
        ObjectReference::from_raw_address(Address::from_ref(&self.words[REFERENCE_WORD])).unwrap()
    }

    /// Load the live header word.
    pub fn header_word(&self, codec: &ForwardingCodec) -> usize {
        self.words[self.header_index(codec)].load(Ordering::SeqCst)
    }

    fn header_index(&self, codec: &ForwardingCodec) -> usize {
        let index = REFERENCE_WORD as isize + codec.layout().header_offset / BYTES_IN_WORD as isize;
        assert!(
            (0..TEST_OBJECT_WORDS as isize).contains(&index),
            "Header offset {} is outside of the test object",
            codec.layout().header_offset
        );
        index as usize
    }
}

// https://github.com/rust-lang/rfcs/issues/2798#issuecomment-552949300
pub fn panic_after<T, F>(millis: u64, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T,
    F: Send + 'static,
{
    let (done_tx, done_rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        let val = f();
        done_tx.send(()).expect("Unable to send completion signal");
        val
    });

    match done_rx.recv_timeout(Duration::from_millis(millis)) {
        Ok(_) => handle.join().expect("Thread panicked"),
        Err(e) => panic!("Thread took too long: {}", e),
    }
}

lazy_static! {
    // A global lock to make tests serial.
    static ref SERIAL_TEST_LOCK: Mutex<()> = Mutex::default();
}

// force some tests to be executed serially
pub fn serial_test<F>(f: F)
where
    F: FnOnce(),
{
    // If one test fails, the lock will become poisoned. We would want to continue for other tests anyway.
    let _guard = SERIAL_TEST_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    f();
}

// Always execute a cleanup closure no matter the test panics or not.
pub fn with_cleanup<T, C>(test: T, cleanup: C)
where
    T: FnOnce() + panic::UnwindSafe,
    C: FnOnce(),
{
    let res = panic::catch_unwind(test);
    cleanup();
    if let Err(e) = res {
        panic::resume_unwind(e);
    }
}
