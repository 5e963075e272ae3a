// padzip_core/src/domain.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::fill::FillSelector;

/// Digest algorithms, ordered weakest to strongest.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Blake3,
}

impl DigestAlgorithm {
    pub const ALL: [DigestAlgorithm; 4] = [
        DigestAlgorithm::Md5,
        DigestAlgorithm::Sha1,
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Blake3,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "md5",
            DigestAlgorithm::Sha1 => "sha1",
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Size and content digests of one file at one point in time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFingerprint {
    pub path: PathBuf,
    pub size: u64,
    pub digests: BTreeMap<DigestAlgorithm, String>,
}

impl FileFingerprint {
    pub fn digest(&self, alg: DigestAlgorithm) -> Option<&str> {
        self.digests.get(&alg).map(String::as_str)
    }

    /// Same size and every digest equal; the path is not compared.
    pub fn same_content(&self, other: &FileFingerprint) -> bool {
        self.size == other.size && self.digests == other.digests
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaddingResult {
    pub original_size: u64,
    pub final_size: u64,
    pub bytes_appended: u64,
    pub destination: PathBuf,
    pub fill: FillSelector,
    /// The byte actually written; for `Random` this is the draw for this run.
    pub fill_byte: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// Name inside the container (base name, de-duplicated).
    pub name: String,
    pub source: PathBuf,
    pub size: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArchiveResult {
    pub archive: PathBuf,
    pub total_uncompressed: u64,
    pub compressed_size: u64,
    pub entries: Vec<ArchiveEntry>,
    /// Requested inputs that did not exist or were not regular files.
    pub skipped: Vec<PathBuf>,
}

impl ArchiveResult {
    /// `uncompressed / compressed`, or 0.0 for an empty container.
    pub fn ratio(&self) -> f64 {
        if self.compressed_size == 0 {
            0.0
        } else {
            self.total_uncompressed as f64 / self.compressed_size as f64
        }
    }

    /// Percentage saved relative to the inputs; negative when the container grew.
    pub fn space_savings(&self) -> f64 {
        if self.total_uncompressed == 0 {
            0.0
        } else {
            (1.0 - self.compressed_size as f64 / self.total_uncompressed as f64) * 100.0
        }
    }
}
