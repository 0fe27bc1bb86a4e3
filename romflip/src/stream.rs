//! Stream conversion of ROM images
//!
//! Reads raw bytes until end of input, maps each one through a
//! [`ByteTransform`] and writes the result. The output always has exactly as
//! many bytes as the input.

use crate::{Error, Result};
use romflip_core::ByteTransform;
use std::io::{ErrorKind, Read, Write};

/// Default size of the read buffer
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// Progress of a [`StreamTransformer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// More input may be available
    Reading,
    /// End of input was reached and the output flushed
    Done,
}

/// Converts an input stream into an output stream one buffer at a time
pub struct StreamTransformer<T, R, W> {
    transform: T,
    reader: R,
    writer: W,
    buffer: Box<[u8]>,
    state: StreamState,
    bytes_processed: u64,
}

impl<T, R, W> StreamTransformer<T, R, W>
where
    T: ByteTransform,
    R: Read,
    W: Write,
{
    /// Create a transformer with the default buffer size
    pub fn new(transform: T, reader: R, writer: W) -> Self {
        Self::with_buffer_size(transform, reader, writer, DEFAULT_BUFFER_SIZE)
    }

    /// Create a transformer reading at most `buffer_size` bytes per step
    ///
    /// A size of zero is treated as one.
    pub fn with_buffer_size(transform: T, reader: R, writer: W, buffer_size: usize) -> Self {
        Self {
            transform,
            reader,
            writer,
            buffer: vec![0u8; buffer_size.max(1)].into_boxed_slice(),
            state: StreamState::Reading,
            bytes_processed: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Number of bytes converted and written so far
    pub fn bytes_processed(&self) -> u64 {
        self.bytes_processed
    }

    /// Perform one read/transform/write round
    ///
    /// Returns [`StreamState::Done`] once the reader reports end of input;
    /// further calls are no-ops.
    pub fn step(&mut self) -> Result<StreamState> {
        if self.state == StreamState::Done {
            return Ok(StreamState::Done);
        }

        let n = loop {
            match self.reader.read(&mut self.buffer) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Read(e)),
            }
        };

        if n == 0 {
            self.writer.flush().map_err(Error::Write)?;
            self.state = StreamState::Done;
            log::debug!("end of input after {} bytes", self.bytes_processed);
            return Ok(StreamState::Done);
        }

        let chunk = &mut self.buffer[..n];
        self.transform.transform_in_place(chunk);
        self.writer.write_all(chunk).map_err(Error::Write)?;
        self.bytes_processed += n as u64;
        log::trace!("converted {n} bytes ({} total)", self.bytes_processed);

        Ok(StreamState::Reading)
    }

    /// Convert until end of input, returning the total byte count
    pub fn run(&mut self) -> Result<u64> {
        while self.step()? == StreamState::Reading {}
        Ok(self.bytes_processed)
    }

    /// Give back the reader and writer
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

/// Convert everything from `reader` into `writer`
pub fn transform_stream<T, R, W>(transform: T, reader: R, writer: W) -> Result<u64>
where
    T: ByteTransform,
    R: Read,
    W: Write,
{
    StreamTransformer::new(transform, reader, writer).run()
}
