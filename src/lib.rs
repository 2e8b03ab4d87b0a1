//! Lock-free object forwarding for the evacuation phase of parallel copying garbage
//! collectors.
//!
//! When several GC workers reach the same live object through different references, each
//! of them may copy it. The worker that first installs a forwarding pointer in the object's
//! header wins, and every worker, winner or not, redirects its reference to the winner's copy.
//! The header holds either the object's class reference (plain) or the address of the copy
//! tagged as forwarded; the transition happens with a single compare-and-swap and is never
//! undone during a collection.
//!
//! * [`util::layout::HeaderLayout`] describes where the header is and how it is stored,
//!   including compressed references on big-endian machines.
//! * [`util::codec::ForwardingCodec`] packs a destination address and tags into a header word.
//! * [`util::object_forwarding::ForwardedHeader`] is a snapshot of a header that can be
//!   queried and used to claim the object.
//!
//! The crate never allocates or copies objects. Allocating the destination, copying the
//! payload, and reclaiming the copies of workers that lost a race are left to the collector.

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

pub mod util;

pub use crate::util::codec::ForwardingCodec;
pub use crate::util::layout::{Endianness, HeaderLayout};
pub use crate::util::object_forwarding::{ClaimOutcome, ForwardedHeader};
pub use crate::util::statistics::ForwardingStats;
pub use crate::util::tags::{ForwardingTag, TagSet};
pub use crate::util::{Address, ObjectReference};

use crate::util::options::Options;

lazy_static! {
    /// The codec for the header layout described by the `SCAVENGER_*` environment variables,
    /// or the native layout if none are set. Collectors with a fixed layout can build their
    /// own [`ForwardingCodec`] instead.
    pub static ref DEFAULT_CODEC: ForwardingCodec =
        ForwardingCodec::new(HeaderLayout::from_options(&Options::default()));
}
