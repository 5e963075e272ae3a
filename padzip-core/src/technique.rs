use std::path::Path;

use tracing::warn;

use crate::domain::PaddingResult;
use crate::error::{PadError, Result};
use crate::fill::FillSelector;
use crate::grow::progress::GrowProgressSink;
use crate::grow::{GrowOptions, PaddingRequest, grow};

/// Padding placements. Only appending is implemented; executable formats are never parsed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Technique {
    Append { growth_mb: u64, fill: FillSelector },
    /// Filler before the original bytes.
    Prepend,
    /// Growing sections inside a PE image.
    Section,
}

impl Technique {
    pub fn name(&self) -> &'static str {
        match self {
            Technique::Append { .. } => "append",
            Technique::Prepend => "prepend",
            Technique::Section => "section",
        }
    }
}

/// Run one technique. Unsupported placements fail without touching the filesystem.
pub fn apply(
    source: &Path,
    destination: &Path,
    technique: Technique,
    opts: &GrowOptions,
    progress: &mut dyn GrowProgressSink,
) -> Result<PaddingResult> {
    match technique {
        Technique::Append { growth_mb, fill } => {
            let req = PaddingRequest::new(source, Some(destination.to_path_buf()), growth_mb, fill);
            grow(&req, opts, progress)
        }
        Technique::Prepend | Technique::Section => {
            warn!(technique = technique.name(), "padding technique not supported");
            Err(PadError::Unsupported(format!(
                "{} padding",
                technique.name()
            )))
        }
    }
}

/// Run each technique in order; one failing does not stop the rest.
pub fn apply_techniques(
    source: &Path,
    destination: &Path,
    techniques: &[Technique],
    opts: &GrowOptions,
    progress: &mut dyn GrowProgressSink,
) -> Vec<(Technique, Result<PaddingResult>)> {
    let mut out = Vec::with_capacity(techniques.len());
    for &t in techniques {
        out.push((t, apply(source, destination, t, opts, &mut *progress)));
    }
    out
}
