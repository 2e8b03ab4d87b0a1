//! Packing a destination address and tags into a header word.
//!
//! The codec distinguishes two views of a header word:
//!
//! * the *logical* word, in which the class reference or the forwarding pointer starts at
//!   bit 0 and tags occupy the low alignment bits, and
//! * the *physical* word, the value actually loaded from and stored to the header.
//!
//! The two are identical except for compressed references on big-endian machines. There
//! the class reference is the first half-word in memory, which is the high half of the
//! loaded word value, so the logical word is the physical word rotated by half a word.
//! The rotation is its own inverse.

use crate::util::constants::BITS_IN_HALF_WORD;
use crate::util::layout::HeaderLayout;
use crate::util::tags::{ForwardingTag, TagSet};
use crate::util::Address;

/// Encodes and decodes header words for one [`HeaderLayout`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ForwardingCodec {
    layout: HeaderLayout,
    swap_halves: bool,
    reserved: TagSet,
}

impl ForwardingCodec {
    pub const fn new(layout: HeaderLayout) -> Self {
        layout.validate();
        Self {
            layout,
            swap_halves: layout.needs_half_word_swap(),
            reserved: TagSet::reserved(&layout),
        }
    }

    pub const fn layout(&self) -> &HeaderLayout {
        &self.layout
    }

    pub const fn needs_half_word_swap(&self) -> bool {
        self.swap_halves
    }

    /// All reserved tag bits in the logical word.
    pub const fn tag_mask(&self) -> usize {
        self.reserved.bits()
    }

    pub const fn reserved_tags(&self) -> TagSet {
        self.reserved
    }

    /// Convert a logical word to the value stored in the header.
    pub const fn to_physical(&self, logical: usize) -> usize {
        if self.swap_halves {
            logical.rotate_left(BITS_IN_HALF_WORD as u32)
        } else {
            logical
        }
    }

    /// Convert a value loaded from the header to the logical word.
    pub const fn to_logical(&self, physical: usize) -> usize {
        // Rotating by half a word twice is the identity.
        self.to_physical(physical)
    }

    /// Encode `destination` with `tags` into a physical header word.
    ///
    /// `destination` must be aligned to the minimal object alignment, and `tags` must only
    /// use reserved bits.
    pub fn encode(&self, destination: Address, tags: TagSet) -> usize {
        forwarding_assert!(
            destination.is_aligned_to(self.layout.min_object_alignment()),
            "Destination {} is not aligned to {} bytes",
            destination,
            self.layout.min_object_alignment()
        );
        forwarding_assert!(
            tags.is_subset_of(self.reserved),
            "{:?} does not fit in {:?}",
            tags,
            self.reserved
        );
        self.to_physical(destination | tags.bits())
    }

    /// Decode the address held in a physical header word, with every reserved bit cleared.
    pub fn decode(&self, word: usize) -> Address {
        unsafe { Address::from_usize(self.to_logical(word) & !self.reserved.bits()) }
    }

    /// The tags held in a physical header word.
    pub fn tags(&self, word: usize) -> TagSet {
        TagSet::from_bits_truncate(self.to_logical(word), self.reserved.bits())
    }

    /// Is `tag` set in a physical header word?
    pub fn has_tag(&self, word: usize, tag: ForwardingTag) -> bool {
        self.to_logical(word) & tag.mask() != 0
    }

    /// The physical header word of an object in the plain state whose class reference is
    /// `class`, with no tags.
    pub fn plain_word(&self, class: Address) -> usize {
        self.encode(class, TagSet::EMPTY)
    }
}

impl Default for ForwardingCodec {
    fn default() -> Self {
        Self::new(HeaderLayout::native())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::layout::Endianness;

    fn addr(raw: usize) -> Address {
        unsafe { Address::from_usize(raw) }
    }

    fn all_tag_sets() -> Vec<TagSet> {
        vec![
            TagSet::EMPTY,
            TagSet::FORWARDED,
            TagSet::GROW,
            TagSet::FORWARDED | TagSet::GROW,
        ]
    }

    #[test]
    fn native_encode_is_bitwise_or() {
        let codec = ForwardingCodec::default();
        assert_eq!(codec.encode(addr(0x2000), TagSet::FORWARDED), 0x2004);
        assert_eq!(codec.encode(addr(0x2000), TagSet::FORWARDED | TagSet::GROW), 0x2006);
        assert_eq!(codec.decode(0x2006), addr(0x2000));
        assert_eq!(codec.tags(0x2006), TagSet::FORWARDED | TagSet::GROW);
    }

    #[test]
    fn decode_strips_unnamed_reserved_bits() {
        let codec = ForwardingCodec::default();
        assert_eq!(codec.decode(0x2007), addr(0x2000));
        let wide = ForwardingCodec::new(HeaderLayout::native().with_log_min_object_alignment(4));
        assert_eq!(wide.decode(0x200f), addr(0x2000));
        assert_eq!(wide.tags(0x200c).bits(), 0b1100);
    }

    #[test]
    fn no_swap_without_compression_or_on_little_endian() {
        for layout in [
            HeaderLayout::native().with_endianness(Endianness::Big),
            HeaderLayout::native().with_endianness(Endianness::Little),
        ] {
            let codec = ForwardingCodec::new(layout);
            assert!(!codec.needs_half_word_swap());
            assert_eq!(codec.encode(addr(0x2000), TagSet::FORWARDED), 0x2004);
        }
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn little_endian_compressed_does_not_swap() {
        let codec = ForwardingCodec::new(
            HeaderLayout::native()
                .with_compressed_references(true)
                .with_endianness(Endianness::Little),
        );
        assert!(!codec.needs_half_word_swap());
        assert_eq!(codec.encode(addr(0x2000), TagSet::FORWARDED), 0x2004);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn big_endian_compressed_swaps_halves() {
        let codec = ForwardingCodec::new(
            HeaderLayout::native()
                .with_compressed_references(true)
                .with_endianness(Endianness::Big),
        );
        assert!(codec.needs_half_word_swap());
        let word = codec.encode(addr(0x0000_0000_0000_2000), TagSet::FORWARDED);
        // The tag lands in the class slot, which is the high half of the loaded word.
        assert_eq!(word, 0x0000_2004_0000_0000);
        assert_eq!(codec.decode(word), addr(0x2000));
        assert!(codec.has_tag(word, ForwardingTag::Forwarded));
        assert!(!codec.has_tag(word, ForwardingTag::Grow));

        // Destinations wider than a compressed reference survive the round trip too.
        let wide = addr(0x0000_0007_f000_2000);
        let word = codec.encode(wide, TagSet::FORWARDED | TagSet::GROW);
        assert_eq!(word, 0xf000_2006_0000_0007);
        assert_eq!(codec.decode(word), wide);
        assert_eq!(codec.tags(word), TagSet::FORWARDED | TagSet::GROW);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn round_trip_every_configuration() {
        let destinations = [0x8usize, 0x2000, 0xdead_bee8, 0x0000_7fff_ffff_fff8];
        for compressed in [false, true] {
            for endianness in [Endianness::Little, Endianness::Big] {
                let codec = ForwardingCodec::new(
                    HeaderLayout::native()
                        .with_compressed_references(compressed)
                        .with_endianness(endianness),
                );
                for raw in destinations {
                    for tags in all_tag_sets() {
                        let word = codec.encode(addr(raw), tags);
                        assert_eq!(codec.decode(word), addr(raw));
                        assert_eq!(codec.tags(word), tags);
                        assert_eq!(codec.to_logical(codec.to_physical(word)), word);
                    }
                }
            }
        }
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn plain_word_has_no_tags() {
        let codec = ForwardingCodec::new(
            HeaderLayout::native()
                .with_compressed_references(true)
                .with_endianness(Endianness::Big),
        );
        let word = codec.plain_word(addr(0x1000));
        assert_eq!(word, 0x0000_1000_0000_0000);
        assert!(codec.tags(word).is_empty());
        assert_eq!(codec.decode(word), addr(0x1000));
    }

    #[test]
    fn reserved_tags_follow_layout() {
        let wide = ForwardingCodec::new(HeaderLayout::native().with_log_min_object_alignment(4));
        assert_eq!(wide.reserved_tags(), TagSet::reserved(wide.layout()));
        // Alignment 16 reserves bit 3, so 0x2008 is not a valid destination but 0x2010 is.
        assert_eq!(wide.encode(addr(0x2010), TagSet::FORWARDED), 0x2014);
    }

    #[test]
    #[should_panic]
    fn encode_rejects_destination_misaligned_for_layout() {
        let wide = ForwardingCodec::new(HeaderLayout::native().with_log_min_object_alignment(4));
        let _ = wide.encode(addr(0x2008), TagSet::FORWARDED);
    }

    #[test]
    #[should_panic]
    fn encode_rejects_tagged_destination() {
        let codec = ForwardingCodec::default();
        let _ = codec.encode(addr(0x2004), TagSet::FORWARDED);
    }
}
