use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Files at or above this size are memory-mapped instead of heap-read.
const MMAP_THRESHOLD: u64 = 32 * 1024;

/// Reads a file as text, replacing undecodable byte sequences with the
/// U+FFFD placeholder instead of failing.
///
/// Returns `Ok(None)` if the file exceeds `max_size`. Small files are
/// read with a single `read` syscall; large files are memory-mapped so
/// the OS page cache is used directly.
pub fn read_lossy(path: &Path, max_size: Option<u64>) -> io::Result<Option<String>> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();

    if let Some(max) = max_size
        && len > max
    {
        return Ok(None);
    }

    if len >= MMAP_THRESHOLD {
        read_large_file_mmap(&file)
    } else {
        read_small_file(&mut file, len)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "files above max_size are already rejected; remaining sizes fit in usize"
)]
fn read_small_file(file: &mut File, len: u64) -> io::Result<Option<String>> {
    let mut bytes = Vec::with_capacity(len as usize);
    file.read_to_end(&mut bytes)?;
    Ok(Some(decode_lossy(bytes)))
}

fn read_large_file_mmap(file: &File) -> io::Result<Option<String>> {
    // SAFETY: The map is read-only and dropped before this function returns.
    // Concurrent file truncation could cause SIGBUS, but this is the same
    // risk `git` and `ripgrep` accept for mmap-based file reading.
    #[expect(unsafe_code, reason = "mmap requires unsafe; lifetime is scoped to this function")]
    let mmap = unsafe { memmap2::Mmap::map(file) }?;

    Ok(Some(String::from_utf8_lossy(&mmap).into_owned()))
}

/// Converts bytes to a `String`, reusing the allocation when the content
/// is already valid UTF-8.
fn decode_lossy(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}
