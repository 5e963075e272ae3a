use std::collections::BTreeMap;
use std::io::{Result, Write};

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::domain::DigestAlgorithm;

/// Write sink feeding every supported digest at once.
pub struct DigestSink {
    md5: Md5,
    sha1: Sha1,
    sha256: Sha256,
    blake3: blake3::Hasher,
    counted: u64,
}

impl Default for DigestSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DigestSink {
    pub fn new() -> Self {
        Self {
            md5: Md5::new(),
            sha1: Sha1::new(),
            sha256: Sha256::new(),
            blake3: blake3::Hasher::new(),
            counted: 0,
        }
    }

    pub fn update(&mut self, buf: &[u8]) {
        self.md5.update(buf);
        self.sha1.update(buf);
        self.sha256.update(buf);
        self.blake3.update(buf);
        self.counted += buf.len() as u64;
    }

    /// Bytes fed so far.
    pub fn counted(&self) -> u64 {
        self.counted
    }

    /// Lowercase hex digests keyed by algorithm.
    pub fn finish(self) -> BTreeMap<DigestAlgorithm, String> {
        let mut out = BTreeMap::new();
        out.insert(DigestAlgorithm::Md5, hex::encode(self.md5.finalize()));
        out.insert(DigestAlgorithm::Sha1, hex::encode(self.sha1.finalize()));
        out.insert(DigestAlgorithm::Sha256, hex::encode(self.sha256.finalize()));
        out.insert(
            DigestAlgorithm::Blake3,
            self.blake3.finalize().to_hex().to_string(),
        );
        out
    }
}

impl Write for DigestSink {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Digests of an in-memory buffer.
pub fn digest_bytes(data: &[u8]) -> BTreeMap<DigestAlgorithm, String> {
    let mut sink = DigestSink::new();
    sink.update(data);
    sink.finish()
}
