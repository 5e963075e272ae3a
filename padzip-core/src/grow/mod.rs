//! Byte-growth engine: copy a file and append an exact run of filler bytes.
//!
//! Two write strategies are offered through [`GrowOptions::atomic`]:
//!
//! * atomic (default): the output is staged in a temporary file next to the
//!   destination and renamed over it only after every byte is written. A
//!   failure leaves the destination, and an in-place source, untouched. A
//!   symlinked destination is resolved first so the rename lands on the file
//!   it points at. A destination with several hard links is written directly,
//!   since a rename would detach it from its other names.
//! * direct: the source is read into memory and the destination truncated and
//!   rewritten. If this fails part way while growing in place, the original
//!   content is gone and the file is left truncated or partially written.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::domain::PaddingResult;
use crate::error::{IoContext, PadError, Result};
use crate::fill::FillSelector;
use crate::util::counting::CountingWriter;

pub mod filler;
pub mod progress;

use filler::{ChunkPlan, write_filler};
use progress::{GrowProgressSink, NoProgress};

pub const MIB: u64 = 1024 * 1024;
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;
pub const DEFAULT_PROGRESS_EVERY: u64 = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrowOptions {
    /// Filler bytes written per write call; bounds peak padding memory.
    pub chunk_size: usize,
    /// Progress notification stride, in chunks.
    pub progress_every: u64,
    /// Stage in a temp file and rename on success.
    pub atomic: bool,
}

impl Default for GrowOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            progress_every: DEFAULT_PROGRESS_EVERY,
            atomic: true,
        }
    }
}

impl GrowOptions {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(PadError::InvalidArgument("chunk size must be > 0".into()));
        }
        if self.progress_every == 0 {
            return Err(PadError::InvalidArgument(
                "progress interval must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaddingRequest {
    pub source: PathBuf,
    /// May equal `source`, in which case the file is grown in place.
    pub destination: PathBuf,
    pub growth_mb: u64,
    pub fill: FillSelector,
}

impl PaddingRequest {
    /// `destination: None` grows `source` in place.
    pub fn new(
        source: impl Into<PathBuf>,
        destination: Option<PathBuf>,
        growth_mb: u64,
        fill: FillSelector,
    ) -> Self {
        let source = source.into();
        let destination = destination.unwrap_or_else(|| source.clone());
        Self {
            source,
            destination,
            growth_mb,
            fill,
        }
    }

    /// Build from a textual fill name; an unknown name fails before any I/O.
    pub fn parse(
        source: impl Into<PathBuf>,
        destination: Option<PathBuf>,
        growth_mb: u64,
        fill: &str,
    ) -> Result<Self> {
        let fill = fill.parse::<FillSelector>()?;
        Ok(Self::new(source, destination, growth_mb, fill))
    }

    /// `growth_mb * 1 MiB`.
    pub fn padding_size(&self) -> Result<u64> {
        self.growth_mb.checked_mul(MIB).ok_or_else(|| {
            PadError::InvalidArgument(format!("growth of {} MB overflows", self.growth_mb))
        })
    }

    pub fn in_place(&self) -> bool {
        if self.source == self.destination {
            return true;
        }
        match (
            fs::canonicalize(&self.source),
            fs::canonicalize(&self.destination),
        ) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

/// Bytes produced by one write pass.
#[derive(Debug, PartialEq, Eq)]
struct Written {
    original: u64,
    appended: u64,
}

impl Written {
    /// Split the writer's running `total` at `original` and check the tail
    /// against what the filler `reported`.
    fn measured(original: u64, total: u64, reported: u64, path: &Path) -> Result<Self> {
        let appended = total.saturating_sub(original);
        if total < original || appended != reported {
            return Err(PadError::IoAt {
                op: "write padding to",
                path: path.to_path_buf(),
                source: io::Error::new(
                    io::ErrorKind::WriteZero,
                    format!(
                        "filler reported {reported} bytes but {appended} reached the output"
                    ),
                ),
            });
        }
        Ok(Self { original, appended })
    }
}

/// Grow `source` into `destination` by `growth_mb` MiB of the selected fill byte.
///
/// On success `final_size == original_size + growth_mb * 1 MiB` exactly. See
/// the module docs for what a failure leaves behind in each write mode.
pub fn grow(
    req: &PaddingRequest,
    opts: &GrowOptions,
    progress: &mut dyn GrowProgressSink,
) -> Result<PaddingResult> {
    opts.validate()?;
    let padding_size = req.padding_size()?;

    let src_meta = fs::metadata(&req.source).map_err(|e| PadError::lookup(&req.source, e))?;
    if !src_meta.is_file() {
        return Err(PadError::InvalidArgument(format!(
            "{} is not a regular file",
            req.source.display()
        )));
    }
    let expected = src_meta.len().checked_add(padding_size).ok_or_else(|| {
        PadError::InvalidArgument(format!("growth of {} MB overflows", req.growth_mb))
    })?;

    let fill_byte = req.fill.resolve()?;
    let plan = ChunkPlan::new(padding_size, opts.chunk_size);

    info!(
        source = %req.source.display(),
        destination = %req.destination.display(),
        original_size = src_meta.len(),
        padding_size,
        fill = %req.fill,
        fill_byte,
        "growing file"
    );
    if req.in_place() {
        warn!(path = %req.source.display(), "modifying original file in place");
    }
    debug!(
        chunk_size = plan.chunk_size,
        full_chunks = plan.full_chunks,
        remainder = plan.remainder,
        "padding plan"
    );

    let staged_target = if opts.atomic {
        staging_target(&req.destination)?
    } else {
        None
    };
    let written = match staged_target {
        Some(target) => write_staged(req, &target, &src_meta, fill_byte, &plan, opts, progress)?,
        None => write_direct(req, &src_meta, fill_byte, &plan, opts, progress)?,
    };

    let final_size = fs::metadata(&req.destination)
        .at("stat", &req.destination)?
        .len();
    if final_size != written.original + written.appended || written.appended != padding_size {
        return Err(PadError::IoAt {
            op: "verify size",
            path: req.destination.clone(),
            source: io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "expected {} bytes ({} + {padding_size}), found {final_size}",
                    written.original + padding_size,
                    written.original
                ),
            ),
        });
    }
    if final_size != expected {
        warn!(
            expected,
            final_size, "source changed size while it was being copied"
        );
    }

    info!(
        destination = %req.destination.display(),
        final_size,
        bytes_appended = written.appended,
        "padding complete"
    );

    Ok(PaddingResult {
        original_size: written.original,
        final_size,
        bytes_appended: written.appended,
        destination: req.destination.clone(),
        fill: req.fill,
        fill_byte,
    })
}

/// [`grow`] with default options and no progress reporting.
pub fn grow_file(
    source: &Path,
    destination: Option<&Path>,
    growth_mb: u64,
    fill: FillSelector,
) -> Result<PaddingResult> {
    let req = PaddingRequest::new(source, destination.map(Path::to_path_buf), growth_mb, fill);
    grow(&req, &GrowOptions::default(), &mut NoProgress)
}

fn staging_dir(dest: &Path) -> &Path {
    match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Path the staged file is renamed onto, or `None` when the destination must
/// be written directly.
fn staging_target(dest: &Path) -> Result<Option<PathBuf>> {
    let meta = match fs::metadata(dest) {
        Ok(m) => m,
        // New file, or a dangling link that the rename replaces.
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Some(dest.to_path_buf())),
        Err(e) => return Err(e).at("stat", dest),
    };
    if shares_inode(&meta) {
        warn!(
            path = %dest.display(),
            "destination has other hard links, writing it directly"
        );
        return Ok(None);
    }
    let target = fs::canonicalize(dest).at("resolve", dest)?;
    if target != dest {
        debug!(path = %dest.display(), target = %target.display(), "staging onto resolved path");
    }
    Ok(Some(target))
}

#[cfg(unix)]
fn shares_inode(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    meta.is_file() && meta.nlink() > 1
}

#[cfg(not(unix))]
fn shares_inode(_meta: &fs::Metadata) -> bool {
    false
}

#[allow(clippy::too_many_arguments)]
fn write_staged(
    req: &PaddingRequest,
    target: &Path,
    src_meta: &fs::Metadata,
    fill_byte: u8,
    plan: &ChunkPlan,
    opts: &GrowOptions,
    progress: &mut dyn GrowProgressSink,
) -> Result<Written> {
    let dir = staging_dir(target);
    let mut tmp = tempfile::Builder::new()
        .prefix(".padzip-")
        .tempfile_in(dir)
        .at("create temp file in", dir)?;
    let tmp_path = tmp.path().to_path_buf();

    let mut src = File::open(&req.source).map_err(|e| PadError::lookup(&req.source, e))?;
    let written = {
        let mut out = CountingWriter::new(BufWriter::new(tmp.as_file_mut()));
        copy_source(&mut src, &mut out, &req.source, &tmp_path)?;
        let original = out.count();
        let reported = write_filler(&mut out, fill_byte, plan, opts.progress_every, progress)
            .at("write padding to", &tmp_path)?;
        out.flush().at("flush", &tmp_path)?;
        Written::measured(original, out.count(), reported, &tmp_path)?
    };
    tmp.as_file().sync_all().at("sync", &tmp_path)?;
    // Temp files are created 0600; keep the source's mode (executables stay executable).
    fs::set_permissions(&tmp_path, src_meta.permissions()).at("set permissions on", &tmp_path)?;

    tmp.persist(target).map_err(|e| PadError::IoAt {
        op: "rename into",
        path: target.to_path_buf(),
        source: e.error,
    })?;
    Ok(written)
}

fn write_direct(
    req: &PaddingRequest,
    src_meta: &fs::Metadata,
    fill_byte: u8,
    plan: &ChunkPlan,
    opts: &GrowOptions,
    progress: &mut dyn GrowProgressSink,
) -> Result<Written> {
    // Read everything first: destination may be the source and is truncated below.
    let data = fs::read(&req.source).map_err(|e| PadError::lookup(&req.source, e))?;
    let dest = &req.destination;
    let file = File::create(dest).at("create", dest)?;
    let mut out = CountingWriter::new(BufWriter::new(file));
    out.write_all(&data).at("write", dest)?;
    let original = out.count();
    let reported = write_filler(&mut out, fill_byte, plan, opts.progress_every, progress)
        .at("write padding to", dest)?;
    out.flush().at("flush", dest)?;
    let written = Written::measured(original, out.count(), reported, dest)?;

    let file = out
        .into_inner()
        .into_inner()
        .map_err(|e| e.into_error())
        .at("flush", dest)?;
    file.sync_all().at("sync", dest)?;
    if !req.in_place() {
        fs::set_permissions(dest, src_meta.permissions()).at("set permissions on", dest)?;
    }
    Ok(written)
}

fn copy_source<W: Write>(
    src: &mut File,
    out: &mut W,
    src_path: &Path,
    dst_path: &Path,
) -> Result<()> {
    let mut buf = vec![0u8; 1 << 16];
    loop {
        let n = match src.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).at("read", src_path),
        };
        out.write_all(&buf[..n]).at("write", dst_path)?;
    }
    Ok(())
}
