//! Forwarding that also records whether the destination copy was grown.
//!
//! Some collection modes enlarge an object while copying it, for example to add a hash
//! code slot. The grow tag is set in the same compare-and-swap that installs the forwarding
//! pointer, so a reader that sees the forwarding pointer also sees whether the copy grew.
//! Layouts without growth tagging never set the bit.

use super::{ClaimOutcome, ForwardedHeader};
use crate::util::tags::{ForwardingTag, TagSet};
use crate::util::ObjectReference;

impl ForwardedHeader<'_> {
    /// Try to forward the object to `destination`, tagging the forwarding pointer as grown if
    /// `is_growing`.
    ///
    /// The destination in the outcome never carries the grow tag, whichever worker won. The
    /// layout must enable growth tagging, and `destination` must carry no tag bits.
    pub fn attempt_forward_growing(
        &self,
        destination: ObjectReference,
        is_growing: bool,
    ) -> ClaimOutcome {
        forwarding_assert!(
            self.codec.layout().growth_tagging,
            "Growth tagging is not enabled for the header layout {:?}",
            self.codec.layout()
        );
        // no tags must be set on the incoming pointer
        forwarding_assert!(
            destination.to_raw_address() & self.codec.reserved_tags().bits() == 0,
            "Destination {} has reserved tag bits set",
            destination
        );
        let tags = if is_growing {
            TagSet::FORWARDED | ForwardingTag::Grow
        } else {
            TagSet::FORWARDED
        };
        self.claim(destination, tags)
    }

    /// Forward the object to `destination`, tagging it as grown if `is_growing`, and return
    /// the destination that won, without the grow tag.
    pub fn set_forwarded_object_growing(
        &self,
        destination: ObjectReference,
        is_growing: bool,
    ) -> ObjectReference {
        self.attempt_forward_growing(destination, is_growing).destination()
    }

    /// Did the object grow when it was copied?
    ///
    /// This is answered from the preserved header, so a view that lost a race reports
    /// nothing about the winner. Read a new view to see the winner's tag. The view must be
    /// forwarded.
    pub fn did_object_grow_on_copy(&self) -> bool {
        // this only applies to forwarded objects
        forwarding_assert!(
            self.is_forwarded(),
            "did_object_grow_on_copy called for object {} that is not forwarded",
            self.object
        );
        self.codec.has_tag(self.preserved, ForwardingTag::Grow)
    }
}
