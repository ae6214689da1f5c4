//! Tests for CLI parsing and command execution

use std::fs;
use std::path::PathBuf;

use crate::commands::{cli, AnalyzeCommand, Command, CommandFactory, ListTagsCommand, MetapeekCommandFactory};
use crate::config::ScanLimits;
use crate::metadata::errors::AnalysisError;
use crate::png::tests::test_utils::{build_png, png_chunk, text_data, SAMPLE_TIME};

fn temp_file(name: &str, bytes: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("metapeek-{}-{}", std::process::id(), name));
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_cli_requires_input() {
    assert!(cli().try_get_matches_from(["metapeek"]).is_err());
    assert!(cli().try_get_matches_from(["metapeek", "--list-tags"]).is_ok());

    let matches = cli().try_get_matches_from(["metapeek", "photo.jpg", "-v"]).unwrap();
    assert_eq!(matches.get_one::<String>("input").map(String::as_str), Some("photo.jpg"));
    assert!(matches.get_flag("verbose"));
}

#[test]
fn test_list_tags_output() {
    let mut out = Vec::new();
    ListTagsCommand::new().execute(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 15);
    assert_eq!(lines[0], "0x010D DocumentName");
    assert!(lines.contains(&"0x010F Make"));
    assert_eq!(lines[14], "0xA420 ImageUniqueID");
}

#[test]
fn test_analyze_prints_records() {
    let png = build_png(&[
        png_chunk(b"tEXt", &text_data(b"Title", b"Harbour")),
        png_chunk(b"tIME", &SAMPLE_TIME),
    ]);
    let path = temp_file("analyze.png", &png);

    let mut out = Vec::new();
    AnalyzeCommand::with_limits(&path, ScanLimits::default()).execute(&mut out).unwrap();
    assert_eq!(out, b"Title: Harbour\nTimestamp: 5/20/2023 12:30:0\n");

    let _ = fs::remove_file(&path);
}

#[test]
fn test_failure_prints_nothing() {
    let mut time = png_chunk(b"tIME", &SAMPLE_TIME);
    time[10] ^= 0x01;
    let png = build_png(&[png_chunk(b"tEXt", &text_data(b"Title", b"Harbour")), time]);
    let path = temp_file("corrupt.png", &png);

    let mut out = Vec::new();
    let result = AnalyzeCommand::with_limits(&path, ScanLimits::default()).execute(&mut out);
    assert!(matches!(result, Err(AnalysisError::ChecksumMismatch { .. })));
    assert!(out.is_empty());

    let _ = fs::remove_file(&path);
}

#[test]
fn test_factory_loads_limits_file() {
    let limits = temp_file("limits.toml", b"[limits]\nmax_chunk_length = 4\n");
    let png = temp_file("limited.png", &build_png(&[]));
    let args = cli()
        .try_get_matches_from([
            "metapeek".to_string(),
            png.display().to_string(),
            "--limits".to_string(),
            limits.display().to_string(),
        ])
        .unwrap();

    let command = MetapeekCommandFactory::new().create_command(&args).unwrap();
    let mut out = Vec::new();
    assert!(matches!(command.execute(&mut out), Err(AnalysisError::InvalidChunkLength(13))));

    let _ = fs::remove_file(&limits);
    let _ = fs::remove_file(&png);
}

#[test]
fn test_factory_rejects_bad_limits_file() {
    let limits = temp_file("bad-limits.toml", b"[limits]\nmax_ifd_depth = \"deep\"\n");
    let args = cli()
        .try_get_matches_from(["metapeek".to_string(), "x.png".to_string(), "--limits".to_string(), limits.display().to_string()])
        .unwrap();

    let result = MetapeekCommandFactory::new().create_command(&args);
    assert!(matches!(result, Err(AnalysisError::InvalidConfig(_))));

    let _ = fs::remove_file(&limits);
}
