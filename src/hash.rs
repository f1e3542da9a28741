//! MD5 content hashing for download integrity checks
//!
//! Digests are lowercase hex. File hashing streams the input in fixed-size
//! chunks. Read failures yield an empty string ("hash unavailable"), which is
//! never a valid digest: the digest of empty input is
//! [`EMPTY_DIGEST`].

use md5::{Digest, Md5};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// MD5 of the empty byte sequence
pub const EMPTY_DIGEST: &str = "d41d8cd98f00b204e9800998ecf8427e";

const CHUNK_SIZE: usize = 4096;

/// Hash a string's UTF-8 bytes
pub fn hash_string(s: &str) -> String {
    hex::encode(Md5::digest(s.as_bytes()))
}

/// Hash a file's contents; empty string if it cannot be read
pub fn hash_file(path: &Path) -> String {
    match try_hash_file(path) {
        Ok(digest) => digest,
        Err(e) => {
            debug!("Cannot hash {}: {}", path.display(), e);
            String::new()
        }
    }
}

/// Hash a file's contents, reporting read failures
pub fn try_hash_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Md5::new();
    let mut buf = [0u8; CHUNK_SIZE];

    loop {
        let n = match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}
