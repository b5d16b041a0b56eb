//! File hashing utilities

use blake3::Hasher;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::utils::config::HashingConsts;

/// Hash a file with blake3. Uses memory-mapped I/O for files above threshold, chunked reading otherwise.
pub fn hash_file(path: &Path, size: u64) -> io::Result<[u8; 32]> {
    let file = File::open(path)?;
    let mut hasher = Hasher::new();

    if size > HashingConsts::HASH_MMAP_THRESHOLD {
        // SAFETY: read-only map; a concurrent writer can only make the hash stale, which the next check catches.
        let mmap = unsafe { Mmap::map(&file)? };
        hasher.update(&mmap);
    } else {
        let mut reader = io::BufReader::with_capacity(HashingConsts::HASH_READ_CHUNK_SIZE, file);
        let mut buffer = vec![0u8; HashingConsts::HASH_READ_CHUNK_SIZE.min(size as usize + 1)];
        loop {
            let n = reader.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }
    }

    Ok(*hasher.finalize().as_bytes())
}

/// True if both files have the same size and blake3 digest.
pub fn same_content(a: &Path, b: &Path) -> io::Result<bool> {
    let (size_a, size_b) = (std::fs::metadata(a)?.len(), std::fs::metadata(b)?.len());
    if size_a != size_b {
        return Ok(false);
    }
    Ok(hash_file(a, size_a)? == hash_file(b, size_b)?)
}
