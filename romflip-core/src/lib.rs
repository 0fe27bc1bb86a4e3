#![no_std]

//! romflip core - bit-reversal table definitions
//!
//! This crate provides the lookup table and transform traits used to convert
//! character-generator ROM images between MSB-first and LSB-first bit order.
//! Nothing in here performs I/O.

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod constants;
pub mod error;
pub mod table;
pub mod traits;

pub use error::*;
pub use table::{reverse_bits, Entries, FlipEntry, FlipTable, FLIP_TABLE};
pub use traits::ByteTransform;
