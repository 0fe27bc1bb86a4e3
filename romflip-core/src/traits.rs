//! Byte transform abstraction
//!
//! The stream and file converters are written against this trait rather than
//! a concrete table, so any per-byte mapping can be plugged in.

use crate::RomflipError;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// A stateless mapping applied independently to every byte of an image
pub trait ByteTransform {
    /// Map a single byte
    fn transform_byte(&self, byte: u8) -> u8;

    /// Map every byte of `buf` in place
    fn transform_in_place(&self, buf: &mut [u8]) {
        buf.iter_mut().for_each(|b| *b = self.transform_byte(*b));
    }

    /// Map `src` into `dst`, returning the number of bytes written
    ///
    /// Both buffers must have the same length; the destination is left
    /// untouched otherwise.
    fn transform_into(&self, src: &[u8], dst: &mut [u8]) -> Result<usize, RomflipError> {
        if src.len() != dst.len() {
            return Err(RomflipError::LengthMismatch {
                expected: src.len(),
                actual: dst.len(),
            });
        }

        for (out, &b) in dst.iter_mut().zip(src) {
            *out = self.transform_byte(b);
        }

        Ok(src.len())
    }

    /// Map `src` into a newly allocated buffer
    #[cfg(feature = "alloc")]
    fn transform_to_vec(&self, src: &[u8]) -> Vec<u8> {
        src.iter().map(|&b| self.transform_byte(b)).collect()
    }
}

impl<T: ByteTransform + ?Sized> ByteTransform for &T {
    fn transform_byte(&self, byte: u8) -> u8 {
        (**self).transform_byte(byte)
    }

    fn transform_in_place(&self, buf: &mut [u8]) {
        (**self).transform_in_place(buf)
    }
}
