//! Tests for the Exif IFD decoder

use std::io::{Cursor, SeekFrom};

use crate::config::ScanLimits;
use crate::io::byte_order::LittleEndianHandler;
use crate::io::cursor::ByteCursor;
use crate::metadata::errors::AnalysisError;
use crate::metadata::record::MetadataRecord;
use crate::tiff::constants::{field_types, tags};
use crate::tiff::decoder::{ExifDecoder, IfdWalk};
use crate::tiff::tags::TagRegistry;
use super::test_utils::{ascii, build_app1_payload, build_tiff, raw_string, sample_tiff, TestEntry, TestValue};

fn decode_payload(payload: Vec<u8>, limits: &ScanLimits) -> Result<Vec<MetadataRecord>, AnalysisError> {
    let mut source = Cursor::new(payload);
    let mut cursor = ByteCursor::new(&mut source).unwrap();
    ExifDecoder::new(limits).decode(&mut cursor)
}

fn texts(records: &[MetadataRecord]) -> Vec<String> {
    records.iter().map(|r| r.to_string()).collect()
}

#[test]
fn test_decode_sample_block() {
    let limits = ScanLimits::default();
    let records = decode_payload(build_app1_payload(&sample_tiff()), &limits).unwrap();

    assert_eq!(
        texts(&records),
        vec![
            "Make: Canon",
            "Model: EOS",
            "DateTimeOriginal: 2023:05:20 12:30:00",
            "UserComment: Sunset over the bay",
        ]
    );
}

#[test]
fn test_decode_leaves_cursor_in_place() {
    let limits = ScanLimits::default();
    let mut source = Cursor::new(build_app1_payload(&sample_tiff()));
    let mut cursor = ByteCursor::new(&mut source).unwrap();

    ExifDecoder::new(&limits).decode(&mut cursor).unwrap();
    assert_eq!(cursor.position(), 0);
}

#[test]
fn test_decode_ifd_preserves_position_on_success() {
    let limits = ScanLimits::default();
    let mut source = Cursor::new(sample_tiff());
    let mut cursor = ByteCursor::new(&mut source).unwrap();
    cursor.seek(SeekFrom::Start(5)).unwrap();

    let decoder = ExifDecoder::new(&limits);
    let mut walk = IfdWalk::new();
    decoder.decode_ifd(&mut cursor, &LittleEndianHandler, 0, 8, 0, &mut walk).unwrap();

    assert_eq!(cursor.position(), 5);
    assert_eq!(walk.records.len(), 4);
}

#[test]
fn test_decode_ifd_preserves_position_on_failure() {
    let limits = ScanLimits::default();
    let mut tiff = sample_tiff();
    // Cut the block in the middle of the 0th IFD
    tiff.truncate(20);
    let mut source = Cursor::new(tiff);
    let mut cursor = ByteCursor::new(&mut source).unwrap();
    cursor.seek(SeekFrom::Start(3)).unwrap();

    let decoder = ExifDecoder::new(&limits);
    let mut walk = IfdWalk::new();
    let result = decoder.decode_ifd(&mut cursor, &LittleEndianHandler, 0, 8, 0, &mut walk);

    assert!(matches!(result, Err(AnalysisError::BadIfd(_))));
    assert_eq!(cursor.position(), 3);
}

#[test]
fn test_decode_ifd_offset_past_end() {
    let limits = ScanLimits::default();
    let mut source = Cursor::new(sample_tiff());
    let mut cursor = ByteCursor::new(&mut source).unwrap();

    let decoder = ExifDecoder::new(&limits);
    let mut walk = IfdWalk::new();
    let result = decoder.decode_ifd(&mut cursor, &LittleEndianHandler, 0, 10_000, 0, &mut walk);

    assert!(matches!(result, Err(AnalysisError::BadIfd(_))));
    assert_eq!(cursor.position(), 0);
}

#[test]
fn test_inline_and_out_of_line_strings_match() {
    let limits = ScanLimits::default();

    let inline = build_tiff(&[raw_string(0x010F, field_types::ASCII, b"EOS\0".to_vec())], None);
    let out_of_line = build_tiff(&[raw_string(0x010F, field_types::ASCII, b"EOS\0\0\0\0\0".to_vec())], None);

    let a = decode_payload(build_app1_payload(&inline), &limits).unwrap();
    let b = decode_payload(build_app1_payload(&out_of_line), &limits).unwrap();

    assert_eq!(a, b);
    assert_eq!(texts(&a), vec!["Make: EOS"]);
}

#[test]
fn test_out_of_line_without_terminator_stops_at_count() {
    let limits = ScanLimits::default();
    let tiff = build_tiff(
        &[
            raw_string(0x0110, field_types::ASCII, b"Nikon!".to_vec()),
            ascii(0x0131, "Firmware 1.0"),
        ],
        None,
    );

    let records = decode_payload(build_app1_payload(&tiff), &limits).unwrap();
    assert_eq!(texts(&records), vec!["Model: Nikon!", "Software: Firmware 1.0"]);
}

#[test]
fn test_user_comment_without_ascii_code_is_verbatim() {
    let limits = ScanLimits::default();
    let tiff = build_tiff(
        &[],
        Some(&[raw_string(tags::USER_COMMENT, field_types::UNDEFINED, b"Plain comment".to_vec())][..]),
    );

    let records = decode_payload(build_app1_payload(&tiff), &limits).unwrap();
    assert_eq!(texts(&records), vec!["UserComment: Plain comment"]);
}

#[test]
fn test_self_referencing_exif_pointer_is_rejected() {
    let limits = ScanLimits::default();
    let tiff = build_tiff(
        &[
            ascii(0x010F, "Canon"),
            TestEntry { tag: tags::EXIF_IFD_POINTER, datatype: field_types::LONG, count: 1, value: TestValue::Pointer(8) },
        ],
        None,
    );

    let result = decode_payload(build_app1_payload(&tiff), &limits);
    assert!(matches!(result, Err(AnalysisError::IfdCycle(8))));
}

#[test]
fn test_exif_depth_limit() {
    let limits = ScanLimits { max_ifd_depth: 0, ..ScanLimits::default() };
    let result = decode_payload(build_app1_payload(&sample_tiff()), &limits);
    assert!(matches!(result, Err(AnalysisError::IfdDepthExceeded(0))));
}

#[test]
fn test_zero_exif_pointer_is_ignored() {
    let limits = ScanLimits::default();
    let tiff = build_tiff(
        &[
            ascii(0x013B, "Ada"),
            TestEntry { tag: tags::EXIF_IFD_POINTER, datatype: field_types::LONG, count: 1, value: TestValue::Pointer(0) },
        ],
        None,
    );

    let records = decode_payload(build_app1_payload(&tiff), &limits).unwrap();
    assert_eq!(texts(&records), vec!["Artist: Ada"]);
}

#[test]
fn test_big_endian_header_is_rejected() {
    let limits = ScanLimits::default();
    let mut tiff = sample_tiff();
    tiff[0] = b'M';
    tiff[1] = b'M';

    let result = decode_payload(build_app1_payload(&tiff), &limits);
    assert!(matches!(result, Err(AnalysisError::BadTiffHeader(_))));
}

#[test]
fn test_bad_exif_magic_is_rejected() {
    let limits = ScanLimits::default();
    let mut payload = build_app1_payload(&sample_tiff());
    payload[0] = b'X';

    let result = decode_payload(payload, &limits);
    assert!(matches!(result, Err(AnalysisError::BadTiffHeader(_))));
}

#[test]
fn test_bad_tiff_magic_is_rejected() {
    let limits = ScanLimits::default();
    let mut tiff = sample_tiff();
    tiff[2] = 43;

    let result = decode_payload(build_app1_payload(&tiff), &limits);
    assert!(matches!(result, Err(AnalysisError::BadTiffHeader(_))));
}

#[test]
fn test_string_value_offset_past_end() {
    let limits = ScanLimits::default();
    let tiff = build_tiff(
        &[TestEntry { tag: 0x010F, datatype: field_types::ASCII, count: 12, value: TestValue::Pointer(5_000) }],
        None,
    );

    let result = decode_payload(build_app1_payload(&tiff), &limits);
    assert!(matches!(result, Err(AnalysisError::BadIfd(_))));
}

#[test]
fn test_custom_registry_limits_reported_tags() {
    let registry = TagRegistry::from_str("[tiff]\n0x0110 = \"CameraModel\"\n").unwrap();
    let limits = ScanLimits::default();
    let mut source = Cursor::new(build_app1_payload(&sample_tiff()));
    let mut cursor = ByteCursor::new(&mut source).unwrap();

    let records = ExifDecoder::with_registry(&registry, &limits).decode(&mut cursor).unwrap();
    assert_eq!(texts(&records), vec!["CameraModel: EOS"]);
}

#[test]
fn test_byte_order_marker_must_be_little_endian() {
    let limits = ScanLimits::default();

    let mut motorola = sample_tiff();
    motorola[..2].copy_from_slice(b"MM");
    match decode_payload(build_app1_payload(&motorola), &limits) {
        Err(AnalysisError::BadTiffHeader(msg)) => assert!(msg.contains("unsupported byte order")),
        other => panic!("expected header failure, got {:?}", other),
    }

    let mut garbage = sample_tiff();
    garbage[..2].copy_from_slice(b"XY");
    let result = decode_payload(build_app1_payload(&garbage), &limits);
    assert!(matches!(result, Err(AnalysisError::BadTiffHeader(_))));
}
