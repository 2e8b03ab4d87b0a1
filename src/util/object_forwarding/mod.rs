use crate::util::codec::ForwardingCodec;
use crate::util::statistics::ForwardingStats;
use crate::util::tags::{ForwardingTag, TagSet};
use crate::util::{Address, ObjectReference};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

mod growing;

/// A snapshot of the header word of an object being evacuated, together with the object it
/// was read from.
///
/// The header word is read once, when the view is created, and kept as the *preserved*
/// value. Every query is answered from the preserved value, and the preserved value is the
/// expected value of the compare-and-swap that forwards the object. Two views of the same
/// object taken at different times may therefore disagree: a view taken before another
/// worker forwarded the object keeps reporting it as not forwarded. Only the outcome of the
/// compare-and-swap decides a race. Create a new view to observe the current state.
///
/// A worker that reaches an object through a reference:
///
/// 1. reads the header with [`ForwardedHeader::read`];
/// 2. if [`ForwardedHeader::is_forwarded`], takes [`ForwardedHeader::forwarded_object`];
/// 3. otherwise copies the object to a destination it allocated, and calls
///    [`ForwardedHeader::set_forwarded_object`] (or [`ForwardedHeader::attempt_forward`]
///    to learn whether its copy won). The returned reference is the one every worker uses.
///
/// Once the forwarded tag is set in the live header, the forwarding pointer never changes.
#[derive(Copy, Clone)]
pub struct ForwardedHeader<'a> {
    /// The object to forward.  This field holds the from-space address.
    object: ObjectReference,
    /// The header word as it was when this view was created.
    preserved: usize,
    codec: &'a ForwardingCodec,
    /// Where claims made through this view are counted, if anywhere.
    stats: Option<&'a ForwardingStats>,
}

/// The result of an attempt to install a forwarding pointer.
///
/// Both variants carry the destination that every worker must use from now on.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The compare-and-swap succeeded. The header now holds the caller's destination.
    Won(ObjectReference),
    /// Another worker forwarded the object first. This holds the winner's destination. The
    /// caller's own copy is garbage and is left to the allocator to reclaim.
    Lost(ObjectReference),
}

impl ClaimOutcome {
    /// The destination of the object, regardless of who won.
    pub fn destination(self) -> ObjectReference {
        match self {
            ClaimOutcome::Won(destination) | ClaimOutcome::Lost(destination) => destination,
        }
    }

    pub fn is_winner(self) -> bool {
        matches!(self, ClaimOutcome::Won(_))
    }
}

impl<'a> ForwardedHeader<'a> {
    /// Read the header of `object` and create a view of it.
    ///
    /// `object` must refer to a live object whose header is at the offset given by the codec's
    /// layout. The load has acquire ordering, so if the header is forwarded, the destination
    /// copy written by the winner is visible to this thread.
    pub fn read(object: ObjectReference, codec: &'a ForwardingCodec) -> Self {
        let header = object.to_header(codec.layout().header_offset);
        let preserved = unsafe { header.atomic_load::<AtomicUsize>(Ordering::Acquire) };
        Self::with_preserved(object, preserved, codec)
    }

    /// Create a view from a header word that the caller has already read.
    ///
    /// `preserved` should be a value loaded from the header of `object`. A forwarded word
    /// that decodes to the null address is a corrupted header, and decoding its destination
    /// panics.
    pub fn with_preserved(
        object: ObjectReference,
        preserved: usize,
        codec: &'a ForwardingCodec,
    ) -> Self {
        Self {
            object,
            preserved,
            codec,
            stats: None,
        }
    }

    /// Count the outcome of every claim made through this view in `stats`.
    pub fn with_stats(self, stats: &'a ForwardingStats) -> Self {
        Self {
            stats: Some(stats),
            ..self
        }
    }

    /// The object this view was read from.
    pub fn object(&self) -> ObjectReference {
        self.object
    }

    /// The address of the live header word.
    pub fn header_address(&self) -> Address {
        self.object.to_header(self.codec.layout().header_offset)
    }

    /// The header word captured by this view, in its physical form.
    pub fn preserved_value(&self) -> usize {
        self.preserved
    }

    pub fn codec(&self) -> &'a ForwardingCodec {
        self.codec
    }

    /// Is the object forwarded, as seen by this view?
    pub fn is_forwarded(&self) -> bool {
        self.codec.has_tag(self.preserved, ForwardingTag::Forwarded)
    }

    /// The destination of a forwarded object, with all tags cleared.
    ///
    /// The view must be forwarded.
    pub fn forwarded_object(&self) -> ObjectReference {
        forwarding_assert!(
            self.is_forwarded(),
            "forwarded_object called for object {} that is not forwarded. Header = {:#x}",
            self.object,
            self.preserved
        );
        self.forwarded_object_no_check()
    }

    /// The destination if this view is forwarded, or `None`.
    pub fn forwarded_object_if_any(&self) -> Option<ObjectReference> {
        if self.is_forwarded() {
            Some(self.forwarded_object_no_check())
        } else {
            None
        }
    }

    fn forwarded_object_no_check(&self) -> ObjectReference {
        // A forwarded header always holds the address of an allocated copy.
        match ObjectReference::from_raw_address(self.codec.decode(self.preserved)) {
            Some(destination) => destination,
            None => panic!(
                "Header of object {} is forwarded to the null address. Header = {:#x}",
                self.object, self.preserved
            ),
        }
    }

    /// Is the grow tag set? The view must be forwarded.
    pub fn has_grow_tag(&self) -> bool {
        forwarding_assert!(
            self.is_forwarded(),
            "has_grow_tag called for object {} that is not forwarded. Header = {:#x}",
            self.object,
            self.preserved
        );
        self.codec.has_tag(self.preserved, ForwardingTag::Grow)
    }

    /// The class reference of an object in the plain state, with the tag bits cleared.
    ///
    /// The view must not be forwarded.
    pub fn preserved_class(&self) -> Address {
        forwarding_assert!(
            !self.is_forwarded(),
            "preserved_class called for object {} that is forwarded to {}",
            self.object,
            self.forwarded_object_no_check()
        );
        self.codec.decode(self.preserved)
    }

    /// Try to forward the object to `destination`.
    ///
    /// This performs a single compare-and-swap of the live header from the preserved value
    /// to `destination` tagged as forwarded. It never retries and never blocks. The view must
    /// not be forwarded.
    pub fn attempt_forward(&self, destination: ObjectReference) -> ClaimOutcome {
        self.claim(destination, TagSet::FORWARDED)
    }

    /// Forward the object to `destination`, and return the destination that won.
    ///
    /// If another worker forwarded the object first, its destination is returned instead of
    /// `destination`. All workers racing on the same object get the same result.
    pub fn set_forwarded_object(&self, destination: ObjectReference) -> ObjectReference {
        self.attempt_forward(destination).destination()
    }

    fn claim(&self, destination: ObjectReference, tags: TagSet) -> ClaimOutcome {
        forwarding_assert!(
            !self.is_forwarded(),
            "Attempt to forward object {} that is already forwarded to {}",
            self.object,
            self.forwarded_object_no_check()
        );
        debug_assert!(tags.contains(ForwardingTag::Forwarded));

        let new_value = self.codec.encode(destination.to_raw_address(), tags);
        // Release publishes the destination copy to whoever later observes the forwarded
        // tag. Acquire on failure makes the winner's copy visible to the loser.
        let result = unsafe {
            self.header_address().compare_exchange::<AtomicUsize>(
                self.preserved,
                new_value,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
        };

        let outcome = match result {
            Ok(_) => {
                trace!(
                    "Forwarded {} to {} (header {:#x} -> {:#x})",
                    self.object,
                    destination,
                    self.preserved,
                    new_value
                );
                ClaimOutcome::Won(destination)
            }
            Err(current) => {
                // `current` is the live header at the time of the failed swap.
                let winner = ForwardedHeader::with_preserved(self.object, current, self.codec);
                forwarding_assert!(
                    winner.is_forwarded(),
                    "Header of object {} changed from {:#x} to {:#x} without being forwarded",
                    self.object,
                    self.preserved,
                    current
                );
                let winner = winner.forwarded_object_no_check();
                debug!(
                    "Lost the race to forward {}: wanted {}, winner is {}",
                    self.object, destination, winner
                );
                ClaimOutcome::Lost(winner)
            }
        };
        if let Some(stats) = self.stats {
            stats.record(&outcome);
        }
        outcome
    }
}

impl fmt::Debug for ForwardedHeader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ForwardedHeader")
            .field("object", &self.object)
            .field("preserved", &format_args!("{:#x}", self.preserved))
            .field("tags", &self.codec.tags(self.preserved))
            .finish()
    }
}
