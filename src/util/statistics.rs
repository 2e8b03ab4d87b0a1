use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::util::object_forwarding::ClaimOutcome;

/// Counts forwarding claims won and lost.
///
/// Every lost claim leaves behind a destination copy that nobody will use; the count of lost
/// claims is the amount of to-space the allocator has to reclaim. Counters are relaxed: they
/// are read after the workers have joined.
#[derive(Default)]
pub struct ForwardingStats {
    won: AtomicUsize,
    lost: AtomicUsize,
}

impl ForwardingStats {
    pub const fn new() -> Self {
        Self {
            won: AtomicUsize::new(0),
            lost: AtomicUsize::new(0),
        }
    }

    pub fn record(&self, outcome: &ClaimOutcome) {
        let counter = if outcome.is_winner() {
            &self.won
        } else {
            &self.lost
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn won(&self) -> usize {
        self.won.load(Ordering::Relaxed)
    }

    pub fn lost(&self) -> usize {
        self.lost.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.won() + self.lost()
    }

    pub fn reset(&self) {
        self.won.store(0, Ordering::Relaxed);
        self.lost.store(0, Ordering::Relaxed);
    }
}

impl fmt::Debug for ForwardingStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ForwardingStats")
            .field("won", &self.won())
            .field("lost", &self.lost())
            .finish()
    }
}
