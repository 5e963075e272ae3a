use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::FileFingerprint;
use crate::error::{IoContext, PadError, Result};
use crate::util::hash_forward::DigestSink;

const READ_BUF: usize = 64 * 1024;

/// Size plus MD5, SHA-1, SHA-256 and BLAKE3 of the whole file.
///
/// Content is streamed through the hashers, so memory stays flat for
/// multi-gigabyte padded outputs.
pub fn fingerprint(path: &Path) -> Result<FileFingerprint> {
    let f = File::open(path).map_err(|e| PadError::lookup(path, e))?;
    let mut reader = BufReader::with_capacity(READ_BUF, f);
    let mut sink = DigestSink::new();
    io::copy(&mut reader, &mut sink).at("read", path)?;
    let size = sink.counted();
    debug!(path = %path.display(), size, "fingerprinted");
    Ok(FileFingerprint {
        path: path.to_path_buf(),
        size,
        digests: sink.finish(),
    })
}

/// Fingerprint each path independently; a failure is recorded for that path only.
pub fn fingerprint_all<P: AsRef<Path>>(paths: &[P]) -> Vec<(PathBuf, Result<FileFingerprint>)> {
    paths
        .iter()
        .map(|p| {
            let p = p.as_ref();
            (p.to_path_buf(), fingerprint(p))
        })
        .collect()
}
