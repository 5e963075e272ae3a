use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::domain::{ArchiveEntry, ArchiveResult};
use crate::error::{IoContext, PadError, Result};

pub mod codec;
pub mod naming;

pub use codec::{ArchiveCodec, MAX_LEVEL};
use naming::EntryNames;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageOptions {
    /// 0 (store) ..= 9 (best).
    pub level: u32,
    pub codec: ArchiveCodec,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            level: MAX_LEVEL,
            codec: ArchiveCodec::Deflate,
        }
    }
}

/// Bundle `inputs` into a ZIP container at `out`, one entry per file under its base name.
///
/// Missing inputs are skipped; if none remain the call fails with
/// [`PadError::NoInputFiles`] and `out` is never created. A failure while
/// writing may leave a partial container behind.
pub fn package(inputs: &[&Path], out: &Path, opts: Option<&PackageOptions>) -> Result<ArchiveResult> {
    let opts = opts.cloned().unwrap_or_default();
    codec::check_level(opts.level)?;

    let mut sources: Vec<PathBuf> = Vec::new();
    let mut skipped: Vec<PathBuf> = Vec::new();
    for p in inputs {
        match fs::metadata(p) {
            Ok(md) if md.is_file() => sources.push(p.to_path_buf()),
            Ok(_) => {
                warn!(path = %p.display(), "not a regular file, skipping");
                skipped.push(p.to_path_buf());
            }
            Err(e) => {
                warn!(path = %p.display(), error = %e, "input unavailable, skipping");
                skipped.push(p.to_path_buf());
            }
        }
    }
    if sources.is_empty() {
        return Err(PadError::NoInputFiles);
    }

    info!(
        archive = %out.display(),
        files = sources.len(),
        level = opts.level,
        codec = ?opts.codec,
        "creating archive"
    );

    let (method, level) = codec::entry_method(opts.codec, opts.level);
    let out_f = File::create(out).at("create", out)?;
    let mut zw = ZipWriter::new(BufWriter::new(out_f));
    let mut names = EntryNames::default();
    let mut entries = Vec::with_capacity(sources.len());
    let mut total_uncompressed = 0u64;

    for src in &sources {
        let mut f = File::open(src).map_err(|e| PadError::lookup(src, e))?;
        let size_hint = f.metadata().at("stat", src)?.len();
        let name = names.assign(src);
        let entry_opts = SimpleFileOptions::default()
            .compression_method(method)
            .compression_level(level)
            .large_file(size_hint >= u64::from(u32::MAX));

        zw.start_file(name.as_str(), entry_opts)?;
        let size = io::copy(&mut f, &mut zw).at("write entry into", out)?;
        total_uncompressed += size;
        debug!(entry = %name, source = %src.display(), size, "added");

        entries.push(ArchiveEntry {
            name,
            source: src.clone(),
            size,
        });
    }

    let mut w = zw.finish()?;
    w.flush().at("flush", out)?;
    let out_f = w.into_inner().map_err(|e| e.into_error()).at("flush", out)?;
    out_f.sync_all().at("sync", out)?;
    drop(out_f);

    let compressed_size = fs::metadata(out).at("stat", out)?.len();
    let result = ArchiveResult {
        archive: out.to_path_buf(),
        total_uncompressed,
        compressed_size,
        entries,
        skipped,
    };
    info!(
        archive = %out.display(),
        total_uncompressed,
        compressed_size,
        ratio = result.ratio(),
        "archive created"
    );
    Ok(result)
}
