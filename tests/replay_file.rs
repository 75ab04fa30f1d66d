//! End-to-end parsing through the public API, including the filesystem entry point.

use anyhow::{Context, Result, ensure};
use lfs_raf::{HlvcStatus, RafError, Replay, parse_replay};
use std::f64::consts::FRAC_PI_2;
use std::path::PathBuf;

const NUM_WHEELS: u8 = 4;

/// Minimal stream: version 2, 10 ms interval, 4 wheels, 2 splits, one block with fx = 32767.
fn minimal_raf() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"LFSRAF");
    bytes.extend_from_slice(&[0, 0]);
    bytes.extend_from_slice(&[2, 10]);
    bytes.extend_from_slice(&[0, 0]);
    for size in [1024u16, 192, 32, 64] {
        bytes.extend_from_slice(&size.to_le_bytes());
    }
    bytes.extend_from_slice(&1u32.to_le_bytes());

    let strings: [(&[u8], usize); 7] = [
        (&b"AS3"[..], 4),
        (&b""[..], 4), // track ruler length 0.0
        (&b"Driver"[..], 32),
        (&b"FZ5"[..], 32),
        (&b"Aston"[..], 32),
        (&b"Club"[..], 16),
        (&b"Clear"[..], 16),
    ];
    for (text, width) in strings {
        let mut field = text.to_vec();
        field.resize(width, 0);
        bytes.extend_from_slice(&field);
    }
    bytes.extend_from_slice(b"0.6H\0\0\0\0");

    bytes.extend_from_slice(&[0, NUM_WHEELS, 2, 2]);
    for split in [41_000i32, 82_500, 0, 0] {
        bytes.extend_from_slice(&split.to_le_bytes());
    }
    bytes.resize(512, 0);
    bytes.resize(512 + usize::from(NUM_WHEELS) * 128, 0);

    let block_start = bytes.len();
    bytes.resize(block_start + 64, 0);
    bytes[block_start + 58..block_start + 60].copy_from_slice(&32767i16.to_le_bytes());
    bytes.resize(block_start + 64 + usize::from(NUM_WHEELS) * 32, 0);
    bytes
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("lfs-raf-{}-{}", std::process::id(), name))
}

#[test]
fn minimal_stream_parses_end_to_end() -> Result<()> {
    let _ = tracing_subscriber::fmt::try_init();

    let replay = parse_replay(minimal_raf().as_slice()).context("parsing minimal stream")?;

    ensure!(replay.raf_version == 2);
    ensure!(replay.update_interval == 10);
    ensure!(replay.short_track_name == "AS3");
    ensure!(replay.player == "Driver");
    ensure!(replay.lfs_version == "0.6H");
    ensure!(replay.hlvc_legal == HlvcStatus::Illegal);
    ensure!(replay.splits == vec![41_000, 82_500]);
    ensure!(replay.static_wheel_info.len() == usize::from(NUM_WHEELS));
    ensure!(replay.data.len() == 1);
    ensure!(replay.data[0].wheels.len() == usize::from(NUM_WHEELS));
    ensure!((replay.data[0].heading + FRAC_PI_2).abs() < 1e-6);
    ensure!(replay.to_string() == "Driver FZ5 Aston Club");
    Ok(())
}

#[test]
fn from_path_reads_file() -> Result<()> {
    let path = temp_path("hotlap.raf");
    std::fs::write(&path, minimal_raf())?;

    let result = Replay::from_path(&path);
    std::fs::remove_file(&path)?;

    let replay = result.context("parsing temp file")?;
    ensure!(replay.track == "Aston");
    Ok(())
}

#[test]
fn from_path_reports_missing_file() {
    let path = temp_path("does-not-exist.raf");
    match Replay::from_path(&path) {
        Err(RafError::File { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("Expected File error, got {other:?}"),
    }
}

#[test]
fn from_path_rejects_foreign_file() -> Result<()> {
    let path = temp_path("notes.txt");
    std::fs::write(&path, b"just some notes, not telemetry")?;

    let result = Replay::from_path(&path);
    // Removal succeeding on every platform shows the handle was released.
    std::fs::remove_file(&path)?;

    ensure!(matches!(result, Err(RafError::InvalidSignature { .. })));
    Ok(())
}

#[test]
fn stream_shorter_than_header_is_exhausted() {
    let bytes = minimal_raf();
    let err = parse_replay(&bytes[..300]).unwrap_err();
    assert!(err.is_truncation(), "unexpected error: {err}");
}

#[test]
fn missing_block_is_exhausted() {
    let bytes = minimal_raf();
    let header_and_wheels = 512 + usize::from(NUM_WHEELS) * 128;
    let err = parse_replay(&bytes[..header_and_wheels]).unwrap_err();
    match err {
        RafError::StreamExhausted { offset, context, .. } => {
            assert_eq!(offset, header_and_wheels as u64);
            assert_eq!(context, "block throttle");
        }
        other => panic!("Expected StreamExhausted, got {other:?}"),
    }
}
