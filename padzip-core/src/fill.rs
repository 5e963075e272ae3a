use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{PadError, Result};

/// x86 NOP, used by [`FillSelector::Pattern`].
pub const PATTERN_BYTE: u8 = 0x90;

/// Which byte value pads the file.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillSelector {
    /// 0x00
    Null,
    /// 0xFF
    Ff,
    /// One OS-random byte, drawn once per operation and repeated.
    Random,
    /// [`PATTERN_BYTE`]
    Pattern,
}

impl FillSelector {
    pub const ALL: [FillSelector; 4] = [
        FillSelector::Null,
        FillSelector::Ff,
        FillSelector::Random,
        FillSelector::Pattern,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FillSelector::Null => "null",
            FillSelector::Ff => "ff",
            FillSelector::Random => "random",
            FillSelector::Pattern => "pattern",
        }
    }

    /// The fixed byte for this selector, `None` for `Random`.
    pub fn fixed_byte(self) -> Option<u8> {
        match self {
            FillSelector::Null => Some(0x00),
            FillSelector::Ff => Some(0xFF),
            FillSelector::Random => None,
            FillSelector::Pattern => Some(PATTERN_BYTE),
        }
    }

    /// Pick the concrete byte for one operation.
    pub fn resolve(self) -> Result<u8> {
        match self.fixed_byte() {
            Some(b) => Ok(b),
            None => {
                let mut b = [0u8; 1];
                getrandom::getrandom(&mut b).map_err(|e| {
                    PadError::Io(std::io::Error::other(format!("random fill byte: {e}")))
                })?;
                Ok(b[0])
            }
        }
    }
}

impl fmt::Display for FillSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FillSelector {
    type Err = PadError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "null" | "zero" => Ok(FillSelector::Null),
            "ff" | "high" => Ok(FillSelector::Ff),
            "random" => Ok(FillSelector::Random),
            "pattern" | "nop" => Ok(FillSelector::Pattern),
            other => Err(PadError::InvalidArgument(format!(
                "unknown fill type {other:?} (expected one of: null, ff, random, pattern)"
            ))),
        }
    }
}
