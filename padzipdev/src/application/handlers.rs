use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use padzip_core::{
    ArchiveCodec, FillSelector, GrowOptions, PackageOptions, PaddingRequest, PaddingResult,
    fingerprint, fingerprint_all, grow, package,
};
use tracing::error;

use crate::presentation::progress::PaddingProgress;
use crate::presentation::report::{print_archive, print_fingerprint, print_padding};

fn show_info(path: &Path, title: &str) {
    match fingerprint(path) {
        Ok(fp) => print_fingerprint(&fp, title),
        Err(e) => error!(path = %path.display(), error = %e, "cannot fingerprint"),
    }
}

fn grow_with_bar(req: &PaddingRequest, opts: &GrowOptions) -> Result<PaddingResult> {
    let total = req.padding_size()?;
    let label = req.destination.display().to_string();
    let mut bar = PaddingProgress::new(total, &label);
    match grow(req, opts, &mut bar) {
        Ok(res) => {
            bar.finish();
            Ok(res)
        }
        Err(e) => {
            bar.abandon();
            Err(e.into())
        }
    }
}

fn zip_and_report(inputs: &[&Path], zip: &Path, opts: &PackageOptions) -> Result<()> {
    let res = package(inputs, zip, Some(opts))
        .with_context(|| format!("creating archive {}", zip.display()))?;
    print_archive(&res);
    show_info(zip, "FINAL ARCHIVE");
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn handle_grow(
    inputs: Vec<PathBuf>,
    size: u64,
    output: Option<PathBuf>,
    fill: String,
    zip: Option<PathBuf>,
    level: u32,
    chunk_size: usize,
    direct: bool,
) -> Result<()> {
    // Flags are checked before any file is touched.
    let fill: FillSelector = fill.parse()?;
    let opts = GrowOptions {
        chunk_size,
        atomic: !direct,
        ..GrowOptions::default()
    };
    opts.validate()?;
    let pack_opts = PackageOptions {
        level,
        ..PackageOptions::default()
    };
    padzip_core::archive::codec::check_level(level)?;
    if output.is_some() && inputs.len() > 1 {
        bail!("--output can only be used with a single input file");
    }

    let mut failed = 0usize;
    let mut padded = Vec::with_capacity(inputs.len());
    for input in &inputs {
        println!("\n{}", "#".repeat(60));
        println!("PROCESSING: {}", input.display());
        println!("{}", "#".repeat(60));
        show_info(input, "ORIGINAL FILE");

        let req = PaddingRequest::new(input, output.clone(), size, fill);
        let res = match grow_with_bar(&req, &opts) {
            Ok(res) => res,
            Err(e) => {
                error!(path = %input.display(), error = %e, "padding failed");
                failed += 1;
                continue;
            }
        };
        print_padding(&res);
        show_info(&res.destination, "PADDED FILE");
        padded.push(res.destination);
    }

    // One archive holds every padded output.
    let mut operations = inputs.len();
    if let Some(zip) = zip.as_ref().filter(|_| !padded.is_empty()) {
        operations += 1;
        let refs: Vec<_> = padded.iter().map(|p| p.as_path()).collect();
        if let Err(e) = zip_and_report(&refs, zip, &pack_opts) {
            error!(error = %format!("{e:#}"), "archive failed");
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{failed} of {operations} operations failed");
    }
    println!("\n[+] Operations completed successfully!");
    Ok(())
}

pub fn handle_info(inputs: Vec<PathBuf>, json: bool) -> Result<()> {
    let results = fingerprint_all(inputs.as_slice());
    let mut failed = 0usize;
    let mut reports = Vec::new();
    for (path, res) in results {
        match res {
            Ok(fp) if json => reports.push(fp),
            Ok(fp) => print_fingerprint(&fp, "FILE ANALYSIS"),
            Err(e) => {
                error!(path = %path.display(), error = %e, "cannot fingerprint");
                failed += 1;
            }
        }
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }
    if failed > 0 {
        bail!("{failed} of {} files could not be read", inputs.len());
    }
    Ok(())
}

pub fn handle_zip(inputs: Vec<PathBuf>, zip: PathBuf, level: u32, zstd: bool) -> Result<()> {
    let refs: Vec<_> = inputs.iter().map(|p| p.as_path()).collect();
    let opts = PackageOptions {
        level,
        codec: if zstd {
            ArchiveCodec::Zstd
        } else {
            ArchiveCodec::Deflate
        },
    };
    zip_and_report(&refs, &zip, &opts)
}

pub fn handle_demo(input: PathBuf, size: u64, out_dir: Option<PathBuf>) -> Result<()> {
    let out_dir = out_dir.unwrap_or_else(|| match input.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    });

    println!("\n{}", "=".repeat(60));
    println!("COMPLETE PADDING DEMONSTRATION");
    println!("{}", "=".repeat(60));

    let original = fingerprint(&input)
        .with_context(|| format!("reading {}", input.display()))?;
    print_fingerprint(&original, "ORIGINAL FILE");

    let padded = out_dir.join("padded_executable.exe");
    let req = PaddingRequest::new(&input, Some(padded.clone()), size, FillSelector::Null);
    let res = grow_with_bar(&req, &GrowOptions::default())?;
    print_padding(&res);
    show_info(&padded, "AFTER BINARY PADDING");

    let zip = out_dir.join("compressed_delivery.zip");
    zip_and_report(&[padded.as_path()], &zip, &PackageOptions::default())?;

    println!("\n[+] Demonstration completed!");
    println!("    Original -> Padded -> Small ZIP");
    Ok(())
}
