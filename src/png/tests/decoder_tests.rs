//! Tests for the tEXt, zTXt and tIME decoders

use crate::config::ScanLimits;
use crate::metadata::errors::AnalysisError;
use crate::metadata::record::{MetadataRecord, MetadataValue};
use crate::png::chunk::{ChunkType, PngChunk};
use crate::png::decoders::{lookup_decoder, PngDecoderState};
use crate::png::tests::test_utils::{text_data, ztxt_data, SAMPLE_TIME};

fn chunk(chunk_type: ChunkType, data: Vec<u8>) -> PngChunk {
    PngChunk {
        length: data.len() as u32,
        crc32: PngChunk::compute_crc(&chunk_type, &data),
        chunk_type,
        data,
    }
}

fn decode(chunk: &PngChunk, state: &mut PngDecoderState) -> Result<MetadataRecord, AnalysisError> {
    let descriptor = lookup_decoder(&chunk.chunk_type).expect("recognized chunk");
    descriptor.decoder.decode(chunk, state, &ScanLimits::default())
}

#[test]
fn test_lookup_is_exact() {
    assert!(lookup_decoder(&ChunkType::tEXt).is_some());
    assert!(lookup_decoder(&ChunkType::zTXt).is_some());
    assert!(lookup_decoder(&ChunkType::tIME).is_some());
    assert!(lookup_decoder(&ChunkType(*b"iTXt")).is_none());
    assert!(lookup_decoder(&ChunkType(*b"TEXT")).is_none());
}

#[test]
fn test_text_splits_at_first_nul() {
    let mut state = PngDecoderState::default();
    let record = decode(&chunk(ChunkType::tEXt, text_data(b"Comment", b"a\0b")), &mut state).unwrap();

    assert_eq!(record.key, "Comment");
    assert_eq!(record.value, MetadataValue::Text("a\0b".to_string()));
}

#[test]
fn test_keyword_and_text_share_one_encoding() {
    let mut state = PngDecoderState::default();
    let record = decode(&chunk(ChunkType::tEXt, text_data(b"Aut\xf6r", b"Jos\xe9")), &mut state).unwrap();

    assert_eq!(record.key, "Autör");
    assert_eq!(record.value, MetadataValue::Text("José".to_string()));

    let mut out = Vec::new();
    record.write_line(&mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "Autör: José\n");
}

#[test]
fn test_compressed_text_decodes_latin1() {
    let mut state = PngDecoderState::default();
    let record = decode(&chunk(ChunkType::zTXt, ztxt_data(b"Comment", b"Caf\xe9")), &mut state).unwrap();

    assert_eq!(record.value, MetadataValue::Text("Café".to_string()));
}

#[test]
fn test_text_without_separator() {
    let mut state = PngDecoderState::default();
    let result = decode(&chunk(ChunkType::tEXt, b"NoSeparator".to_vec()), &mut state);

    assert!(matches!(result, Err(AnalysisError::MalformedChunk(_))));
}

#[test]
fn test_compressed_text() {
    let text = "Lorem ipsum dolor sit amet. ".repeat(40);
    let mut state = PngDecoderState::default();
    let record = decode(&chunk(ChunkType::zTXt, ztxt_data(b"Description", text.as_bytes())), &mut state).unwrap();

    assert_eq!(record.key, "Description");
    assert_eq!(record.value.as_bytes(), text.as_bytes());
}

#[test]
fn test_compressed_text_unknown_method() {
    let mut data = ztxt_data(b"Description", b"hello");
    data[12] = 1;
    let mut state = PngDecoderState::default();
    let result = decode(&chunk(ChunkType::zTXt, data), &mut state);

    assert!(matches!(result, Err(AnalysisError::UnsupportedCompressionMethod(1))));
}

#[test]
fn test_compressed_text_garbage() {
    let mut data = text_data(b"Description", &[0]);
    data.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    let mut state = PngDecoderState::default();
    let result = decode(&chunk(ChunkType::zTXt, data), &mut state);

    assert!(matches!(result, Err(AnalysisError::DecompressionFailed(_))));
}

#[test]
fn test_compressed_text_missing_method() {
    let mut state = PngDecoderState::default();
    let result = decode(&chunk(ChunkType::zTXt, b"Description\0".to_vec()), &mut state);

    assert!(matches!(result, Err(AnalysisError::MalformedChunk(_))));
}

#[test]
fn test_timestamp_format() {
    let mut state = PngDecoderState::default();
    let record = decode(&chunk(ChunkType::tIME, SAMPLE_TIME.to_vec()), &mut state).unwrap();

    assert_eq!(record.to_string(), "Timestamp: 5/20/2023 12:30:0");
    assert!(state.seen_timestamp);
}

#[test]
fn test_timestamp_wrong_length() {
    let mut state = PngDecoderState::default();
    let result = decode(&chunk(ChunkType::tIME, SAMPLE_TIME[..6].to_vec()), &mut state);

    assert!(matches!(result, Err(AnalysisError::MalformedChunk(_))));
    assert!(!state.seen_timestamp);
}

#[test]
fn test_second_timestamp_rejected() {
    let mut state = PngDecoderState::default();
    let time = chunk(ChunkType::tIME, SAMPLE_TIME.to_vec());

    assert!(decode(&time, &mut state).is_ok());
    assert!(matches!(decode(&time, &mut state), Err(AnalysisError::DuplicateChunk(_))));
}
