//! Range boundary behavior and draw priority.
//!
//! Bit layout (u32):
//! - bits 4..6: start boundary, `0x10` MARK (text inserted at the start joins
//!   the range) or `0x20` POINT (text inserted at the start stays outside).
//! - bits 0..2: end boundary, `0x01` MARK (inserted text stays outside) or
//!   `0x02` POINT (inserted text joins the range).
//! - bits 16..24: priority. Higher priority ranges sort first in queries.
//!
//! Unknown bits are retained so flags survive a snapshot round trip untouched.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SpanFlags: u32 {
        const START_MARK = 0x10;
        const START_POINT = 0x20;
        const END_MARK = 0x01;
        const END_POINT = 0x02;

        const INCLUSIVE_EXCLUSIVE = 0x11;
        const INCLUSIVE_INCLUSIVE = 0x12;
        const EXCLUSIVE_EXCLUSIVE = 0x21;
        const EXCLUSIVE_INCLUSIVE = 0x22;
        const PARAGRAPH = 0x33;

        const POINT_MARK_MASK = 0x33;
        const PRIORITY = 0x00FF_0000;

        const _ = !0;
    }
}

const PRIORITY_SHIFT: u32 = 16;

impl Default for SpanFlags {
    fn default() -> Self {
        SpanFlags::EXCLUSIVE_EXCLUSIVE
    }
}

impl SpanFlags {
    pub fn priority(self) -> u8 {
        ((self.bits() & Self::PRIORITY.bits()) >> PRIORITY_SHIFT) as u8
    }

    pub fn with_priority(self, priority: u8) -> Self {
        let cleared = self.bits() & !Self::PRIORITY.bits();
        Self::from_bits_retain(cleared | (u32::from(priority) << PRIORITY_SHIFT))
    }

    /// Point/mark bits only.
    pub fn boundary(self) -> Self {
        self & Self::POINT_MARK_MASK
    }

    /// Text inserted exactly at the range start becomes part of the range.
    pub fn start_inclusive(self) -> bool {
        self.contains(Self::START_MARK)
    }

    /// Text inserted exactly at the range end becomes part of the range.
    pub fn end_inclusive(self) -> bool {
        self.contains(Self::END_POINT)
    }

    /// Ranges with these flags are dropped once an edit swallows them.
    pub fn removed_when_emptied(self) -> bool {
        self.boundary() == Self::EXCLUSIVE_EXCLUSIVE
    }
}
