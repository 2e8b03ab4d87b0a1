//! Tag bits stored in the low-order bits of a forwarded header word.
//!
//! Heap objects are aligned to at least [`crate::util::constants::MIN_OBJECT_ALIGNMENT`]
//! bytes, so the low `log2(alignment)` bits of any object address are always zero. Those
//! bits are reserved for tags. A header layout with a larger alignment reserves more bits;
//! bits that no [`ForwardingTag`] names are still reserved and are stripped on decode.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use bytemuck::NoUninit;
use strum::{EnumCount, IntoEnumIterator};

use crate::util::constants::LOG_MIN_OBJECT_ALIGNMENT;
use crate::util::layout::HeaderLayout;

/// A status flag stored in the header word of a forwarded object.
///
/// The discriminant is the bit index of the tag. Bit 0 is left to the object model, which
/// may use it in the plain state (for example to mark heap holes).
#[repr(u8)]
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum_macros::EnumCount,
    strum_macros::EnumIter,
    strum_macros::IntoStaticStr,
)]
pub enum ForwardingTag {
    /// The destination copy was enlarged relative to the source. Only meaningful together
    /// with `Forwarded`.
    Grow = 1,
    /// The header holds the address of the destination copy instead of a class reference.
    Forwarded = 2,
}

impl ForwardingTag {
    /// Every tag, in ascending bit order.
    pub const VALUES: [ForwardingTag; ForwardingTag::COUNT] =
        [ForwardingTag::Grow, ForwardingTag::Forwarded];

    /// The number of low-order bits that must be free in an object address to hold every tag.
    pub const LOG_TAG_BITS_REQUIRED: usize = {
        let mut max = 0;
        let mut i = 0;
        while i < Self::VALUES.len() {
            let bit = Self::VALUES[i].bit_index() + 1;
            if bit > max {
                max = bit;
            }
            i += 1;
        }
        max
    };

    /// The index of the bit this tag occupies in the logical header word.
    pub const fn bit_index(self) -> usize {
        self as usize
    }

    /// The mask of this tag in the logical header word.
    pub const fn mask(self) -> usize {
        1 << self.bit_index()
    }
}

static_assertions::const_assert!(
    ForwardingTag::LOG_TAG_BITS_REQUIRED <= LOG_MIN_OBJECT_ALIGNMENT as usize
);

/// A set of [`ForwardingTag`]s, represented by their bits in the logical header word.
#[repr(transparent)]
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, NoUninit)]
pub struct TagSet(usize);

impl TagSet {
    /// No tag.
    pub const EMPTY: TagSet = TagSet(0);
    /// Only the forwarded tag.
    pub const FORWARDED: TagSet = TagSet::of(ForwardingTag::Forwarded);
    /// Only the grow tag.
    pub const GROW: TagSet = TagSet::of(ForwardingTag::Grow);

    /// A set with a single tag.
    pub const fn of(tag: ForwardingTag) -> TagSet {
        TagSet(tag.mask())
    }

    /// Every bit `layout` reserves for tags, named or not.
    pub const fn reserved(layout: &HeaderLayout) -> TagSet {
        TagSet(layout.tag_mask())
    }

    /// Build a tag set from the raw tag bits of a logical header word. Bits outside of
    /// `reserved_mask` are dropped.
    pub const fn from_bits_truncate(bits: usize, reserved_mask: usize) -> TagSet {
        TagSet(bits & reserved_mask)
    }

    /// This set plus `tag`.
    pub const fn with(self, tag: ForwardingTag) -> TagSet {
        TagSet(self.0 | tag.mask())
    }

    /// This set minus `tag`.
    pub const fn without(self, tag: ForwardingTag) -> TagSet {
        TagSet(self.0 & !tag.mask())
    }

    pub const fn contains(self, tag: ForwardingTag) -> bool {
        self.0 & tag.mask() != 0
    }

    /// Is every bit of this set also in `other`?
    pub const fn is_subset_of(self, other: TagSet) -> bool {
        self.0 & !other.0 == 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The raw bits of this set.
    pub const fn bits(self) -> usize {
        self.0
    }

    /// Iterate over the named tags in this set.
    pub fn iter(self) -> impl Iterator<Item = ForwardingTag> {
        ForwardingTag::iter().filter(move |tag| self.contains(*tag))
    }
}

impl From<ForwardingTag> for TagSet {
    fn from(tag: ForwardingTag) -> TagSet {
        TagSet::of(tag)
    }
}

impl BitOr for TagSet {
    type Output = TagSet;
    fn bitor(self, other: TagSet) -> TagSet {
        TagSet(self.0 | other.0)
    }
}

impl BitOr<ForwardingTag> for TagSet {
    type Output = TagSet;
    fn bitor(self, tag: ForwardingTag) -> TagSet {
        self.with(tag)
    }
}

impl BitOrAssign<ForwardingTag> for TagSet {
    fn bitor_assign(&mut self, tag: ForwardingTag) {
        *self = self.with(tag);
    }
}

impl fmt::Debug for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TagSet(")?;
        let mut first = true;
        for tag in self.iter() {
            if !first {
                write!(f, " | ")?;
            }
            let name: &'static str = tag.into();
            write!(f, "{}", name)?;
            first = false;
        }
        let unnamed = self.0 & !ForwardingTag::iter().fold(0, |acc, tag| acc | tag.mask());
        if unnamed != 0 {
            if !first {
                write!(f, " | ")?;
            }
            write!(f, "{:#x}", unnamed)?;
        }
        write!(f, ")")
    }
}
