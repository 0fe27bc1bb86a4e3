//! romflip - character-generator ROM bit-order conversion
//!
//! The C1P/Superboard and the C2/C4 feed their character ROM data into the
//! video shift register in opposite bit order. This crate converts ROM images
//! between the two by reversing the bits of every byte. Running a converted
//! image through again restores the original.
//!
//! ## Architecture
//!
//! - **romflip-core**: the lookup table and transform trait (no I/O)
//! - **romflip**: stream and file conversion, table dumps and the CLI
//!
//! ## Quick Start
//!
//! ```rust
//! use romflip::{transform_stream, FLIP_TABLE};
//!
//! fn example() -> romflip::Result<()> {
//!     let mut out = Vec::new();
//!     transform_stream(&FLIP_TABLE, &[0x01u8, 0x02, 0x80][..], &mut out)?;
//!     assert_eq!(out, [0x80, 0x40, 0x01]);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

// Re-export core abstractions
pub use romflip_core::{
    reverse_bits, ByteTransform, FlipEntry, FlipTable, RomflipError, FLIP_TABLE,
};

pub mod dump;
pub mod error;
#[cfg(feature = "mmap")]
pub mod file;
pub mod stream;

pub use dump::{write_table_dump, DumpFormat};
pub use error::{Error, Result};
#[cfg(feature = "mmap")]
pub use file::{convert_file, convert_file_in_place};
pub use stream::{transform_stream, StreamState, StreamTransformer};
