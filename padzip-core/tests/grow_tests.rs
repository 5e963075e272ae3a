use std::fs;
use std::path::{Path, PathBuf};

use padzip_core::grow::MIB;
use padzip_core::{
    FillSelector, GrowOptions, GrowProgress, NoProgress, PadError, PaddingRequest, grow, grow_file,
};
use proptest::prelude::*;
use tempfile::TempDir;

fn sample(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

fn write_source(dir: &TempDir, name: &str, data: &[u8]) -> PathBuf {
    let p = dir.path().join(name);
    fs::write(&p, data).unwrap();
    p
}

fn small_chunks(atomic: bool) -> GrowOptions {
    GrowOptions {
        chunk_size: 4096,
        progress_every: 1,
        atomic,
    }
}

fn assert_padded(out: &Path, original: &[u8], padding: u64, byte: u8) {
    let got = fs::read(out).unwrap();
    assert_eq!(got.len() as u64, original.len() as u64 + padding);
    assert_eq!(&got[..original.len()], original);
    assert!(got[original.len()..].iter().all(|&b| b == byte));
}

#[test]
fn one_megabyte_of_zeros_after_thousand_bytes() {
    let dir = TempDir::new().unwrap();
    let data = sample(1000);
    let src = write_source(&dir, "in.exe", &data);
    let out = dir.path().join("out.exe");

    let res = grow_file(&src, Some(out.as_path()), 1, FillSelector::Null).unwrap();

    assert_eq!(res.original_size, 1000);
    assert_eq!(res.bytes_appended, 1_048_576);
    assert_eq!(res.final_size, 1_049_576);
    assert_eq!(res.fill_byte, 0x00);
    assert_eq!(res.destination, out);
    assert_padded(&out, &data, MIB, 0x00);
    // Source untouched when writing elsewhere.
    assert_eq!(fs::read(&src).unwrap(), data);
}

#[test]
fn each_fixed_selector_fills_with_its_byte() {
    let dir = TempDir::new().unwrap();
    let data = sample(333);
    let src = write_source(&dir, "in.bin", &data);
    for (sel, byte) in [
        (FillSelector::Null, 0x00),
        (FillSelector::Ff, 0xFF),
        (FillSelector::Pattern, 0x90),
    ] {
        let out = dir.path().join(format!("out-{sel}.bin"));
        let req = PaddingRequest::new(&src, Some(out.clone()), 1, sel);
        let res = grow(&req, &small_chunks(true), &mut NoProgress).unwrap();
        assert_eq!(res.fill_byte, byte);
        assert_padded(&out, &data, MIB, byte);
    }
}

#[test]
fn random_selector_repeats_one_byte() {
    let dir = TempDir::new().unwrap();
    let data = sample(10);
    let src = write_source(&dir, "in.bin", &data);
    let out = dir.path().join("out.bin");
    let req = PaddingRequest::new(&src, Some(out.clone()), 2, FillSelector::Random);

    let res = grow(&req, &small_chunks(true), &mut NoProgress).unwrap();

    assert_padded(&out, &data, 2 * MIB, res.fill_byte);
}

#[test]
fn zero_growth_is_a_plain_copy() {
    let dir = TempDir::new().unwrap();
    let data = sample(5000);
    let src = write_source(&dir, "in.bin", &data);
    let out = dir.path().join("out.bin");

    let res = grow_file(&src, Some(out.as_path()), 0, FillSelector::Ff).unwrap();

    assert_eq!(res.bytes_appended, 0);
    assert_eq!(res.final_size, res.original_size);
    assert_eq!(fs::read(&out).unwrap(), data);
}

#[test]
fn empty_source_becomes_pure_padding() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "empty.bin", &[]);
    let res = grow_file(&src, None, 1, FillSelector::Pattern).unwrap();
    assert_eq!(res.original_size, 0);
    assert_padded(&src, &[], MIB, 0x90);
}

#[test]
fn in_place_growth_keeps_prefix_in_both_modes() {
    for atomic in [true, false] {
        let dir = TempDir::new().unwrap();
        let data = sample(2048);
        let src = write_source(&dir, "tool.exe", &data);
        let req = PaddingRequest::new(&src, None, 1, FillSelector::Ff);
        assert!(req.in_place());

        let res = grow(&req, &small_chunks(atomic), &mut NoProgress).unwrap();

        assert_eq!(res.destination, src);
        assert_padded(&src, &data, MIB, 0xFF);
        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1, "no staging files left behind");
    }
}

#[test]
fn small_chunks_match_default_chunking() {
    let dir = TempDir::new().unwrap();
    let data = sample(777);
    let src = write_source(&dir, "in.bin", &data);
    let a = dir.path().join("a.bin");
    let b = dir.path().join("b.bin");

    grow_file(&src, Some(a.as_path()), 3, FillSelector::Pattern).unwrap();
    let odd = GrowOptions {
        chunk_size: 1000, // does not divide 1 MiB
        progress_every: 7,
        atomic: false,
    };
    let req = PaddingRequest::new(&src, Some(b.clone()), 3, FillSelector::Pattern);
    grow(&req, &odd, &mut NoProgress).unwrap();

    assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
}

#[test]
fn progress_reaches_completion() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "in.bin", &sample(10));
    let out = dir.path().join("out.bin");
    let mut events: Vec<GrowProgress> = Vec::new();
    let mut sink = |p: GrowProgress| events.push(p);

    let req = PaddingRequest::new(&src, Some(out), 1, FillSelector::Null);
    grow(&req, &small_chunks(true), &mut sink).unwrap();

    let last = events.last().copied().unwrap();
    assert!(last.is_done());
    assert_eq!(last.total_bytes, MIB);
    assert!(events.windows(2).all(|w| w[0].bytes_written < w[1].bytes_written));
}

#[test]
fn missing_source_is_not_found() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("missing.exe");
    let out = dir.path().join("out.exe");

    let err = grow_file(&src, Some(out.as_path()), 1, FillSelector::Null).unwrap_err();

    assert!(matches!(err, PadError::NotFound { ref path } if *path == src));
    assert!(!out.exists());
}

#[test]
fn unknown_selector_fails_before_io() {
    let dir = TempDir::new().unwrap();
    let data = sample(64);
    let src = write_source(&dir, "in.bin", &data);
    let out = dir.path().join("out.bin");

    let err = PaddingRequest::parse(&src, Some(out.clone()), 1, "sparkles").unwrap_err();

    assert!(matches!(err, PadError::InvalidArgument(_)));
    assert_eq!(fs::read(&src).unwrap(), data);
    assert!(!out.exists());
}

#[test]
fn invalid_options_are_rejected_before_io() {
    let dir = TempDir::new().unwrap();
    let data = sample(64);
    let src = write_source(&dir, "in.bin", &data);
    let opts = GrowOptions {
        chunk_size: 0,
        ..GrowOptions::default()
    };
    let req = PaddingRequest::new(&src, None, 1, FillSelector::Null);

    let err = grow(&req, &opts, &mut NoProgress).unwrap_err();

    assert!(matches!(err, PadError::InvalidArgument(_)));
    assert_eq!(fs::read(&src).unwrap(), data);
}

#[test]
fn overflowing_growth_is_invalid() {
    let req = PaddingRequest::new("whatever.bin", None, u64::MAX, FillSelector::Null);
    assert!(matches!(
        req.padding_size(),
        Err(PadError::InvalidArgument(_))
    ));
    let err = grow(&req, &GrowOptions::default(), &mut NoProgress).unwrap_err();
    assert!(matches!(err, PadError::InvalidArgument(_)));
}

#[test]
fn atomic_failure_leaves_destination_intact() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "in.bin", &sample(100));
    // Destination is a directory: the final rename must fail.
    let out = dir.path().join("taken");
    fs::create_dir(&out).unwrap();
    fs::write(out.join("keep.txt"), b"keep").unwrap();

    let req = PaddingRequest::new(&src, Some(out.clone()), 1, FillSelector::Null);
    let err = grow(&req, &small_chunks(true), &mut NoProgress).unwrap_err();

    assert!(err.is_io_failure());
    assert_eq!(fs::read(out.join("keep.txt")).unwrap(), b"keep");
    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names.len(), 2, "staging file removed on failure: {names:?}");
}

#[cfg(unix)]
#[test]
fn permissions_follow_the_source() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "run.sh", b"#!/bin/sh\n");
    fs::set_permissions(&src, fs::Permissions::from_mode(0o755)).unwrap();
    let out = dir.path().join("run-padded.sh");

    grow_file(&src, Some(out.as_path()), 1, FillSelector::Null).unwrap();

    let mode = fs::metadata(&out).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o755);
}

#[cfg(unix)]
#[test]
fn in_place_through_symlink_pads_the_target() {
    for atomic in [true, false] {
        let dir = TempDir::new().unwrap();
        let data = sample(2);
        let real = write_source(&dir, "real.bin", &data);
        let link = dir.path().join("link.bin");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let req = PaddingRequest::new(&link, None, 1, FillSelector::Null);
        let res = grow(&req, &small_chunks(atomic), &mut NoProgress).unwrap();

        assert_eq!(res.destination, link);
        assert_eq!(res.final_size, 2 + MIB);
        assert!(
            fs::symlink_metadata(&link).unwrap().file_type().is_symlink(),
            "atomic={atomic}: link must survive"
        );
        assert_padded(&real, &data, MIB, 0x00);
        let names: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(names.len(), 2, "atomic={atomic}: no staging files left behind");
    }
}

#[cfg(unix)]
#[test]
fn in_place_on_hard_link_pads_every_name() {
    for atomic in [true, false] {
        let dir = TempDir::new().unwrap();
        let data = sample(2);
        let a = write_source(&dir, "a.bin", &data);
        let b = dir.path().join("b.bin");
        fs::hard_link(&a, &b).unwrap();

        let req = PaddingRequest::new(&a, None, 1, FillSelector::Null);
        let res = grow(&req, &small_chunks(atomic), &mut NoProgress).unwrap();

        assert_eq!(res.final_size, 2 + MIB);
        assert_padded(&a, &data, MIB, 0x00);
        assert_padded(&b, &data, MIB, 0x00);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn output_is_source_then_uniform_fill(
        data in proptest::collection::vec(any::<u8>(), 0..4096),
        growth_mb in 0u64..=2,
        chunk_size in 1usize..=70_000,
        sel_idx in 0usize..4,
        atomic in any::<bool>(),
    ) {
        let dir = TempDir::new().unwrap();
        let src = write_source(&dir, "in.bin", &data);
        let out = dir.path().join("out.bin");
        let sel = FillSelector::ALL[sel_idx];
        let opts = GrowOptions { chunk_size, progress_every: 10, atomic };
        let req = PaddingRequest::new(&src, Some(out.clone()), growth_mb, sel);

        let res = grow(&req, &opts, &mut NoProgress).unwrap();

        let got = fs::read(&out).unwrap();
        prop_assert_eq!(res.final_size, data.len() as u64 + growth_mb * MIB);
        prop_assert_eq!(got.len() as u64, res.final_size);
        prop_assert_eq!(&got[..data.len()], &data[..]);
        prop_assert!(got[data.len()..].iter().all(|&b| b == res.fill_byte));
        if let Some(b) = sel.fixed_byte() {
            prop_assert_eq!(res.fill_byte, b);
        }
    }
}
