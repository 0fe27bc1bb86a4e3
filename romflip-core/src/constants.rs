//! Fixed parameters of the bit-reversal transform

/// Width of a single ROM data word in bits
pub const BYTE_BITS: u32 = 8;

/// Number of entries in a bit-reversal table, one per byte value
pub const TABLE_SIZE: usize = 1 << BYTE_BITS;

/// Width of each hex field in a table listing line
pub const LISTING_FIELD_WIDTH: usize = 4;
