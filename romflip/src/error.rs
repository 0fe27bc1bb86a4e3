//! Error types for ROM image conversion
//!
//! End of input is never an error; it ends the conversion normally. Read and
//! write failures are kept apart so a broken pipe on the output is not
//! mistaken for a truncated input.

use romflip_core::RomflipError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while converting or dumping
#[derive(Debug, Error)]
pub enum Error {
    /// Reading the input stream failed
    #[error("failed to read input")]
    Read(#[source] io::Error),

    /// Writing or flushing the output stream failed
    #[error("failed to write output")]
    Write(#[source] io::Error),

    /// The input file could not be opened
    #[error("failed to open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output file could not be created or sized
    #[error("failed to create {}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Memory mapping a file failed
    #[error("failed to map {}", path.display())]
    Map {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A core transform rejected its buffers
    #[error("{0}")]
    Core(RomflipError),

    /// JSON serialization of the table failed
    #[cfg(feature = "serde")]
    #[error("failed to serialize table")]
    Json(#[from] serde_json::Error),
}

impl From<RomflipError> for Error {
    fn from(err: RomflipError) -> Self {
        Error::Core(err)
    }
}

/// Result type for ROM image conversion
pub type Result<T> = std::result::Result<T, Error>;
