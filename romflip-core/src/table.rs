//! Bit-reversal lookup table
//!
//! The C1P/Superboard character ROM feeds its data lines into the video shift
//! register in the opposite order from the C2/C4 ROM. Reversing the bits of
//! every byte converts an image from one convention to the other, and since
//! reversal is its own inverse the same table converts it back.

use crate::constants::{BYTE_BITS, LISTING_FIELD_WIDTH, TABLE_SIZE};
use crate::traits::ByteTransform;
use core::iter::FusedIterator;

/// Reverse the bit order of a byte
///
/// Shifts the accumulator left and feeds in the low bit of the remaining
/// input, once per bit.
pub const fn reverse_bits(byte: u8) -> u8 {
    let mut reversed: u8 = 0;
    let mut rest = byte;

    // can't use for loops in const context yet
    let mut bit = 0;
    while bit < BYTE_BITS {
        reversed <<= 1;
        reversed |= rest & 1;
        rest >>= 1;
        bit += 1;
    }

    reversed
}

/// Table built at compile time
pub const FLIP_TABLE: FlipTable = FlipTable::build();

/// One row of the table: a byte value and its reversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlipEntry {
    pub original: u8,
    pub flipped: u8,
}

impl core::fmt::Display for FlipEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "c={:>w$x}, flip={:>w$x}",
            self.original,
            self.flipped,
            w = LISTING_FIELD_WIDTH
        )
    }
}

/// 256-entry table mapping every byte to its bit reversal
///
/// Immutable once built. It is `Copy` and only 256 bytes, so it can be
/// shared by reference across threads or embedded in other structures.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FlipTable {
    entries: [u8; TABLE_SIZE],
}

impl FlipTable {
    /// Build the table
    pub const fn build() -> Self {
        let mut entries = [0u8; TABLE_SIZE];

        let mut i = 0;
        while i < TABLE_SIZE {
            entries[i] = reverse_bits(i as u8);
            i += 1;
        }

        Self { entries }
    }

    /// Build the table, reporting every computed pair to `observer`
    ///
    /// Pairs are reported in ascending order of the original byte, as soon
    /// as each one is computed.
    pub fn build_with<F: FnMut(FlipEntry)>(mut observer: F) -> Self {
        let mut entries = [0u8; TABLE_SIZE];

        for (i, slot) in entries.iter_mut().enumerate() {
            let original = i as u8;
            let flipped = reverse_bits(original);
            observer(FlipEntry { original, flipped });
            *slot = flipped;
        }

        Self { entries }
    }

    /// Look up the reversal of `byte`
    #[inline]
    pub const fn get(&self, byte: u8) -> u8 {
        self.entries[byte as usize]
    }

    /// Raw table contents, indexed by input byte
    pub const fn as_bytes(&self) -> &[u8; TABLE_SIZE] {
        &self.entries
    }

    /// Iterate over all entries in index order
    pub fn entries(&self) -> Entries<'_> {
        Entries {
            table: self,
            next: 0,
        }
    }

    /// Check that applying the table twice is the identity
    pub fn is_involution(&self) -> bool {
        (0..=u8::MAX).all(|b| self.get(self.get(b)) == b)
    }
}

impl Default for FlipTable {
    fn default() -> Self {
        FLIP_TABLE
    }
}

impl core::fmt::Debug for FlipTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlipTable")
            .field("len", &TABLE_SIZE)
            .field("involution", &self.is_involution())
            .finish()
    }
}

impl ByteTransform for FlipTable {
    #[inline]
    fn transform_byte(&self, byte: u8) -> u8 {
        self.get(byte)
    }
}

/// Iterator over the entries of a [`FlipTable`]
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    table: &'a FlipTable,
    next: usize,
}

impl Iterator for Entries<'_> {
    type Item = FlipEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= TABLE_SIZE {
            return None;
        }

        let original = self.next as u8;
        self.next += 1;
        Some(FlipEntry {
            original,
            flipped: self.table.get(original),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = TABLE_SIZE - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Entries<'_> {}

impl FusedIterator for Entries<'_> {}
