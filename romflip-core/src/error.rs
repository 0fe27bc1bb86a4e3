//! Error types for romflip core operations

/// Errors that can occur while applying a byte transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RomflipError {
    /// Source and destination buffers differ in length
    LengthMismatch {
        /// Length of the source buffer
        expected: usize,
        /// Length of the destination buffer
        actual: usize,
    },
}

impl core::fmt::Display for RomflipError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RomflipError::LengthMismatch { expected, actual } => write!(
                f,
                "Destination buffer holds {actual} bytes, source has {expected}"
            ),
        }
    }
}

/// Result type for romflip core operations
pub type Result<T> = core::result::Result<T, RomflipError>;
