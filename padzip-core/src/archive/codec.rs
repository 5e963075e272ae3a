use serde::{Deserialize, Serialize};
use zip::CompressionMethod;

use crate::error::{PadError, Result};

/// Highest accepted compression level; 0 stores entries uncompressed.
pub const MAX_LEVEL: u32 = 9;

/// Codec used for levels 1..=9.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveCodec {
    #[default]
    Deflate,
    Zstd,
}

pub fn check_level(level: u32) -> Result<()> {
    if level > MAX_LEVEL {
        return Err(PadError::InvalidArgument(format!(
            "compression level {level} out of range 0..={MAX_LEVEL}"
        )));
    }
    Ok(())
}

/// ZIP method and level for an entry. Stored entries carry no level.
pub fn entry_method(codec: ArchiveCodec, level: u32) -> (CompressionMethod, Option<i64>) {
    if level == 0 {
        return (CompressionMethod::Stored, None);
    }
    let method = match codec {
        ArchiveCodec::Deflate => CompressionMethod::Deflated,
        ArchiveCodec::Zstd => CompressionMethod::Zstd,
    };
    (method, Some(i64::from(level)))
}
