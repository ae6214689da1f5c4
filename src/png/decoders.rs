//! Decoders for the recognized PNG chunk types
//!
//! Each recognized chunk type maps to a [`ChunkDecoder`] through the
//! immutable [`RECOGNIZED_CHUNKS`] table. Every decoder turns one verified
//! chunk into exactly one record. Keywords and text are ISO 8859-1 in the
//! file and are both decoded to UTF-8 text.

use log::debug;

use crate::compression::CompressionFactory;
use crate::config::ScanLimits;
use crate::metadata::errors::{AnalysisError, AnalysisResult};
use crate::metadata::record::MetadataRecord;
use crate::png::chunk::{ChunkType, PngChunk};
use crate::utils::string_utils::{latin1_to_string, split_at_nul};

/// Length of a tIME chunk
pub const TIME_CHUNK_LENGTH: usize = 7;

/// Decoder state for one PNG stream
///
/// Created per scan and passed to every decoder call.
#[derive(Debug, Default)]
pub struct PngDecoderState {
    /// Whether a tIME chunk has already been decoded
    pub seen_timestamp: bool,
}

/// Strategy trait for chunk decoders
pub trait ChunkDecoder: Send + Sync {
    /// Decode a chunk whose CRC has been verified
    fn decode(&self, chunk: &PngChunk, state: &mut PngDecoderState, limits: &ScanLimits) -> AnalysisResult<MetadataRecord>;

    /// Get the name of this decoder
    fn name(&self) -> &'static str;
}

/// Entry of the chunk registry
pub struct ChunkDescriptor {
    /// Chunk type handled
    pub chunk_type: ChunkType,
    /// Human-readable chunk name
    pub name: &'static str,
    /// Decoder for that type
    pub decoder: &'static dyn ChunkDecoder,
}

/// Chunk types that produce records
pub static RECOGNIZED_CHUNKS: [ChunkDescriptor; 3] = [
    ChunkDescriptor { chunk_type: ChunkType::tEXt, name: "Textual data", decoder: &TextDecoder },
    ChunkDescriptor { chunk_type: ChunkType::zTXt, name: "Compressed textual data", decoder: &CompressedTextDecoder },
    ChunkDescriptor { chunk_type: ChunkType::tIME, name: "Last modification time", decoder: &TimestampDecoder },
];

/// Finds the descriptor for a chunk type, matching all four bytes exactly
pub fn lookup_decoder(chunk_type: &ChunkType) -> Option<&'static ChunkDescriptor> {
    RECOGNIZED_CHUNKS.iter().find(|d| d.chunk_type == *chunk_type)
}

/// Uncompressed text: keyword, NUL, text
pub struct TextDecoder;

impl ChunkDecoder for TextDecoder {
    fn decode(&self, chunk: &PngChunk, _state: &mut PngDecoderState, _limits: &ScanLimits) -> AnalysisResult<MetadataRecord> {
        let (keyword, text) = split_at_nul(&chunk.data)
            .ok_or_else(|| AnalysisError::MalformedChunk("tEXt without keyword separator".to_string()))?;

        Ok(MetadataRecord::text(latin1_to_string(keyword), latin1_to_string(text)))
    }

    fn name(&self) -> &'static str {
        "Text"
    }
}

/// Compressed text: keyword, NUL, method byte, compressed text
pub struct CompressedTextDecoder;

impl ChunkDecoder for CompressedTextDecoder {
    fn decode(&self, chunk: &PngChunk, _state: &mut PngDecoderState, limits: &ScanLimits) -> AnalysisResult<MetadataRecord> {
        let (keyword, rest) = split_at_nul(&chunk.data)
            .ok_or_else(|| AnalysisError::MalformedChunk("zTXt without keyword separator".to_string()))?;

        let (&method, compressed) = rest
            .split_first()
            .ok_or_else(|| AnalysisError::MalformedChunk("zTXt without compression method".to_string()))?;

        let handler = CompressionFactory::create_handler(method, limits)?;
        let text = handler.decompress(compressed)?;
        debug!("zTXt: {} compressed bytes -> {} ({}, method {})", compressed.len(), text.len(), handler.name(), handler.code());

        Ok(MetadataRecord::text(latin1_to_string(keyword), latin1_to_string(&text)))
    }

    fn name(&self) -> &'static str {
        "Compressed text"
    }
}

/// Last-modification time: year (2 bytes), month, day, hour, minute, second
pub struct TimestampDecoder;

impl ChunkDecoder for TimestampDecoder {
    fn decode(&self, chunk: &PngChunk, state: &mut PngDecoderState, _limits: &ScanLimits) -> AnalysisResult<MetadataRecord> {
        if state.seen_timestamp {
            return Err(AnalysisError::DuplicateChunk(chunk.chunk_type.to_string()));
        }

        let fields: &[u8; TIME_CHUNK_LENGTH] = chunk.data.as_slice().try_into().map_err(|_| {
            AnalysisError::MalformedChunk(format!("tIME has {} bytes, expected {}", chunk.data.len(), TIME_CHUNK_LENGTH))
        })?;

        let [year_hi, year_lo, month, day, hour, minute, second] = *fields;
        let year = u16::from_be_bytes([year_hi, year_lo]);
        state.seen_timestamp = true;

        Ok(MetadataRecord::text(
            "Timestamp",
            format!("{}/{}/{} {}:{}:{}", month, day, year, hour, minute, second),
        ))
    }

    fn name(&self) -> &'static str {
        "Timestamp"
    }
}
