//! Memory-mapped file conversion
//!
//! Path-to-path conversion maps the input read-only and the output
//! read-write, then fills the output in parallel chunks. This avoids copying
//! large images through a user-space buffer.

use crate::{transform_stream, Error, Result};
use memmap2::{Mmap, MmapMut};
use rayon::prelude::*;
use romflip_core::ByteTransform;
use std::fs::{self, File, Metadata, OpenOptions};
use std::io::BufWriter;
use std::path::Path;

/// Bytes handed to each rayon task
pub const PARALLEL_CHUNK_SIZE: usize = 64 * 1024;

/// Convert the file at `input` into a new file at `output`
///
/// The output is created or truncated and ends up exactly as long as the
/// input. When both paths name the same file the conversion is done in place.
/// Inputs or existing outputs that are not regular files (pipes, devices,
/// process substitutions) have no usable length and go through the stream
/// converter instead of being mapped.
pub fn convert_file<T, P, Q>(transform: &T, input: P, output: Q) -> Result<u64>
where
    T: ByteTransform + Sync,
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let input = input.as_ref();
    let output = output.as_ref();

    let src_meta = fs::metadata(input).map_err(|source| Error::Open {
        path: input.to_path_buf(),
        source,
    })?;
    let dst_meta = fs::metadata(output).ok();

    if let Some(dst_meta) = &dst_meta {
        if src_meta.is_file() && is_same_file(input, &src_meta, output, dst_meta) {
            return convert_file_in_place(transform, input);
        }
    }

    let dst_is_regular = dst_meta.as_ref().map_or(true, |meta| meta.is_file());
    if !src_meta.is_file() || !dst_is_regular {
        return convert_unmappable(transform, input, output, dst_is_regular);
    }

    let src_file = File::open(input).map_err(|source| Error::Open {
        path: input.to_path_buf(),
        source,
    })?;
    let len = src_file
        .metadata()
        .map_err(|source| Error::Open {
            path: input.to_path_buf(),
            source,
        })?
        .len();

    let dst_file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(output)
        .and_then(|file| file.set_len(len).map(|_| file))
        .map_err(|source| Error::Create {
            path: output.to_path_buf(),
            source,
        })?;

    // Zero-length files cannot be mapped
    if len == 0 {
        log::debug!("{} is empty, nothing to convert", input.display());
        return Ok(0);
    }

    // SAFETY: the input is only read for the lifetime of the map; concurrent
    // modification by another process is outside our control, as for any mmap
    let src = unsafe { Mmap::map(&src_file) }.map_err(|source| Error::Map {
        path: input.to_path_buf(),
        source,
    })?;
    // SAFETY: the output was just created and sized by us
    let mut dst = unsafe { MmapMut::map_mut(&dst_file) }.map_err(|source| Error::Map {
        path: output.to_path_buf(),
        source,
    })?;

    dst.par_chunks_mut(PARALLEL_CHUNK_SIZE)
        .zip(src.par_chunks(PARALLEL_CHUNK_SIZE))
        .try_for_each(|(dst_chunk, src_chunk)| {
            transform.transform_into(src_chunk, dst_chunk).map(|_| ())
        })?;

    dst.flush().map_err(Error::Write)?;
    log::info!(
        "converted {} -> {} ({len} bytes)",
        input.display(),
        output.display()
    );

    Ok(len)
}

/// Convert the file at `path` in place
pub fn convert_file_in_place<T, P>(transform: &T, path: P) -> Result<u64>
where
    T: ByteTransform + Sync,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let len = file
        .metadata()
        .map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    if len == 0 {
        return Ok(0);
    }

    // SAFETY: the map is dropped before this function returns
    let mut map = unsafe { MmapMut::map_mut(&file) }.map_err(|source| Error::Map {
        path: path.to_path_buf(),
        source,
    })?;

    map.par_chunks_mut(PARALLEL_CHUNK_SIZE)
        .for_each(|chunk| transform.transform_in_place(chunk));

    map.flush().map_err(Error::Write)?;
    log::info!("converted {} in place ({len} bytes)", path.display());

    Ok(len)
}

/// Stream `input` into `output` when either cannot be mapped
///
/// Regular outputs are truncated; pipes and devices are only opened for
/// writing.
fn convert_unmappable<T>(
    transform: &T,
    input: &Path,
    output: &Path,
    truncate: bool,
) -> Result<u64>
where
    T: ByteTransform,
{
    log::debug!(
        "{} -> {} is not a regular file pair, streaming",
        input.display(),
        output.display()
    );

    let reader = File::open(input).map_err(|source| Error::Open {
        path: input.to_path_buf(),
        source,
    })?;
    let writer = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(truncate)
        .open(output)
        .map_err(|source| Error::Create {
            path: output.to_path_buf(),
            source,
        })?;

    transform_stream(transform, reader, BufWriter::new(writer))
}

/// Hard links and bind mounts share a device and inode even when their
/// paths differ
#[cfg(unix)]
fn is_same_file(_a: &Path, a_meta: &Metadata, _b: &Path, b_meta: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;

    a_meta.dev() == b_meta.dev() && a_meta.ino() == b_meta.ino()
}

#[cfg(not(unix))]
fn is_same_file(a: &Path, _a_meta: &Metadata, b: &Path, _b_meta: &Metadata) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use romflip_core::FLIP_TABLE;

    fn random_image(len: usize) -> Vec<u8> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(len as u64);
        (0..len).map(|_| rng.gen()).collect()
    }

    #[test]
    fn test_convert_file_matches_stream() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("c1p.rom");
        let output = dir.path().join("c2.rom");

        // Spans several parallel chunks with a ragged tail
        let image = random_image(PARALLEL_CHUNK_SIZE * 2 + 123);
        fs::write(&input, &image).unwrap();

        let n = convert_file(&FLIP_TABLE, &input, &output).unwrap();
        assert_eq!(n, image.len() as u64);

        let mut expected = Vec::new();
        transform_stream(&FLIP_TABLE, &image[..], &mut expected).unwrap();
        assert_eq!(fs::read(&output).unwrap(), expected);
    }

    #[test]
    fn test_convert_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.rom");
        let b = dir.path().join("b.rom");
        let c = dir.path().join("c.rom");

        let image = random_image(2048);
        fs::write(&a, &image).unwrap();

        convert_file(&FLIP_TABLE, &a, &b).unwrap();
        convert_file(&FLIP_TABLE, &b, &c).unwrap();
        assert_eq!(fs::read(&c).unwrap(), image);
    }

    #[test]
    fn test_convert_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.rom");
        let output = dir.path().join("out.rom");
        fs::write(&input, b"").unwrap();

        assert_eq!(convert_file(&FLIP_TABLE, &input, &output).unwrap(), 0);
        assert!(fs::read(&output).unwrap().is_empty());
    }

    #[test]
    fn test_convert_truncates_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.rom");
        let output = dir.path().join("out.rom");
        fs::write(&input, [0x01u8, 0x02, 0x80]).unwrap();
        fs::write(&output, [0xAAu8; 16]).unwrap();

        convert_file(&FLIP_TABLE, &input, &output).unwrap();
        assert_eq!(fs::read(&output).unwrap(), vec![0x80, 0x40, 0x01]);
    }

    #[test]
    fn test_same_path_converts_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rom.bin");
        fs::write(&path, [0x01u8, 0x02, 0x80]).unwrap();

        assert_eq!(convert_file(&FLIP_TABLE, &path, &path).unwrap(), 3);
        assert_eq!(fs::read(&path).unwrap(), vec![0x80, 0x40, 0x01]);
    }

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("missing.rom");
        let output = dir.path().join("out.rom");

        let err = convert_file(&FLIP_TABLE, &input, &output).unwrap_err();
        assert!(matches!(err, Error::Open { path, .. } if path == input));
        assert!(!output.exists());
    }

    #[cfg(unix)]
    fn make_fifo(path: &Path) {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        let c_path = CString::new(path.as_os_str().as_bytes()).unwrap();
        // SAFETY: c_path is a valid NUL-terminated string
        let rc = unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) };
        assert_eq!(rc, 0, "mkfifo failed");
    }

    #[cfg(unix)]
    #[test]
    fn test_fifo_input_is_streamed() {
        let dir = tempfile::tempdir().unwrap();
        let fifo = dir.path().join("in.fifo");
        let output = dir.path().join("out.rom");
        make_fifo(&fifo);

        let writer_path = fifo.clone();
        let writer = std::thread::spawn(move || {
            fs::write(writer_path, [0x01u8, 0x02, 0x80]).unwrap();
        });

        let n = convert_file(&FLIP_TABLE, &fifo, &output).unwrap();
        writer.join().unwrap();

        assert_eq!(n, 3);
        assert_eq!(fs::read(&output).unwrap(), vec![0x80, 0x40, 0x01]);
    }

    #[cfg(unix)]
    #[test]
    fn test_device_output_is_streamed() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.rom");
        fs::write(&input, [0x01u8, 0x02, 0x80]).unwrap();

        // set_len on a character device fails, so this only works via the stream path
        assert_eq!(convert_file(&FLIP_TABLE, &input, "/dev/null").unwrap(), 3);
    }

    #[test]
    fn test_hard_link_output_converts_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("rom.bin");
        let link = dir.path().join("rom-link.bin");
        fs::write(&original, [0x01u8, 0x02, 0x80]).unwrap();
        fs::hard_link(&original, &link).unwrap();

        assert_eq!(convert_file(&FLIP_TABLE, &original, &link).unwrap(), 3);
        assert_eq!(fs::read(&original).unwrap(), vec![0x80, 0x40, 0x01]);
        assert_eq!(fs::read(&link).unwrap(), vec![0x80, 0x40, 0x01]);
    }
}
