#![forbid(unsafe_code)]

pub mod domain;
pub mod error;
pub mod fill;

pub mod util {
    pub mod counting;
    pub mod hash_forward;
}

pub mod archive;
pub mod fingerprint;
pub mod grow;
pub mod technique;

// Re-exports: stable API surface
pub use archive::{ArchiveCodec, PackageOptions, package};
pub use domain::{ArchiveEntry, ArchiveResult, DigestAlgorithm, FileFingerprint, PaddingResult};
pub use error::{PadError, Result};
pub use fill::FillSelector;
pub use fingerprint::{fingerprint, fingerprint_all};
pub use grow::progress::{GrowProgress, GrowProgressSink, NoProgress};
pub use grow::{GrowOptions, PaddingRequest, grow, grow_file};
pub use technique::{Technique, apply_techniques};
