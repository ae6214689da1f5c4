//! Tests for format detection and the analyzer entry points

use std::io::{Cursor, Seek, SeekFrom};

use crate::config::ScanLimits;
use crate::io::cursor::ByteCursor;
use crate::metadata::analyzer::{analyze, ImageFormat, MetadataAnalyzer};
use crate::metadata::errors::AnalysisError;
use crate::png::tests::test_utils::{build_png, png_chunk, text_data, ztxt_data};
use crate::tiff::tests::test_utils::{build_app1_payload, build_jpeg, sample_tiff};

#[test]
fn test_detect_format() {
    let mut png = Cursor::new(build_png(&[]));
    let mut cursor = ByteCursor::new(&mut png).unwrap();
    assert_eq!(ImageFormat::detect(&mut cursor).unwrap(), ImageFormat::Png);
    assert_eq!(cursor.position(), 0);

    let mut jpeg = Cursor::new(build_jpeg(None));
    let mut cursor = ByteCursor::new(&mut jpeg).unwrap();
    assert_eq!(ImageFormat::detect(&mut cursor).unwrap(), ImageFormat::Jpeg);
}

#[test]
fn test_unknown_lead_byte() {
    let result = analyze(&mut Cursor::new(b"GIF89a".to_vec()));
    assert!(matches!(result, Err(AnalysisError::BadSignature)));
}

#[test]
fn test_empty_stream() {
    let result = analyze(&mut Cursor::new(Vec::new()));
    assert!(matches!(result, Err(AnalysisError::BadSignature)));
}

#[test]
fn test_analyze_jpeg() {
    let payload = build_app1_payload(&sample_tiff());
    let records = analyze(&mut Cursor::new(build_jpeg(Some(&payload)))).unwrap();

    assert_eq!(records.len(), 4);
    assert_eq!(records[0].to_string(), "Make: Canon");
    assert_eq!(records[3].to_string(), "UserComment: Sunset over the bay");
}

#[test]
fn test_analyze_png() {
    let png = build_png(&[png_chunk(b"tEXt", &text_data(b"Title", b"Harbour"))]);
    let records = analyze(&mut Cursor::new(png)).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].to_string(), "Title: Harbour");
}

#[test]
fn test_read_from_current_position() {
    let mut bytes = b"junk".to_vec();
    bytes.extend(build_png(&[png_chunk(b"tEXt", &text_data(b"Title", b"Harbour"))]));

    let mut source = Cursor::new(bytes);
    source.seek(SeekFrom::Start(4)).unwrap();
    assert_eq!(analyze(&mut source).unwrap().len(), 1);
}

#[test]
fn test_custom_limits_apply() {
    let limits = ScanLimits {
        inflate_initial_capacity: 1,
        inflate_max_output: 16,
        ..ScanLimits::default()
    };
    let text = "x".repeat(64);
    let png = build_png(&[png_chunk(b"zTXt", &ztxt_data(b"Comment", text.as_bytes()))]);

    let analyzer = MetadataAnalyzer::with_limits(limits);
    assert_eq!(analyzer.limits().inflate_max_output, 16);
    let result = analyzer.read(&mut Cursor::new(png.clone()));
    assert!(matches!(result, Err(AnalysisError::DecompressionFailed(_))));

    assert_eq!(MetadataAnalyzer::new().read(&mut Cursor::new(png)).unwrap().len(), 1);
}

#[test]
fn test_load_missing_file() {
    let result = MetadataAnalyzer::new().load("/nonexistent/metapeek/photo.jpg");
    assert!(matches!(result, Err(AnalysisError::IoError(_))));
}
