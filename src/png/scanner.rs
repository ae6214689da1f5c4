//! PNG chunk scanner
//!
//! Validates the signature, then walks length-prefixed chunks. Chunks with
//! a registered decoder are read in full and CRC-checked; everything else
//! is skipped by length.

use log::{debug, info, trace};
use std::io::SeekFrom;

use crate::config::ScanLimits;
use crate::io::byte_order::{BigEndianHandler, ByteOrderHandler};
use crate::io::cursor::ByteCursor;
use crate::metadata::errors::{AnalysisError, AnalysisResult};
use crate::metadata::record::MetadataRecord;
use crate::png::chunk::{ChunkType, PngChunk, PNG_SIGNATURE};
use crate::png::decoders::{lookup_decoder, PngDecoderState};

/// Size of the CRC field after the chunk data
const CRC_SIZE: i64 = 4;

/// Scanner over the chunks of a PNG stream
pub struct PngScanner<'a> {
    /// Chunk length cap and inflate bounds
    limits: &'a ScanLimits,
    /// All PNG integers are big-endian
    handler: BigEndianHandler,
}

impl<'a> PngScanner<'a> {
    /// Creates a new scanner
    pub fn new(limits: &'a ScanLimits) -> Self {
        PngScanner {
            limits,
            handler: BigEndianHandler,
        }
    }

    /// Scans a PNG stream from the cursor position
    ///
    /// # Returns
    /// One record per recognized chunk, in file order
    pub fn scan(&self, cursor: &mut ByteCursor) -> AnalysisResult<Vec<MetadataRecord>> {
        self.validate_signature(cursor)?;

        let mut state = PngDecoderState::default();
        let mut records = Vec::new();
        let mut chunks = 0usize;

        while !cursor.is_eof()? {
            chunks += 1;
            if let Some(record) = self.scan_chunk(cursor, &mut state)? {
                records.push(record);
            }
        }

        info!("Scanned {} PNG chunks, {} records", chunks, records.len());
        Ok(records)
    }

    /// Checks the 8-byte PNG signature
    pub fn validate_signature(&self, cursor: &mut ByteCursor) -> AnalysisResult<()> {
        let signature: [u8; 8] = cursor.read_array("PNG signature")?;
        if signature != PNG_SIGNATURE {
            return Err(AnalysisError::BadSignature);
        }
        Ok(())
    }

    fn scan_chunk(&self, cursor: &mut ByteCursor, state: &mut PngDecoderState) -> AnalysisResult<Option<MetadataRecord>> {
        let length = self
            .handler
            .read_u32(cursor)
            .map_err(|e| AnalysisError::from_io(e, "chunk length"))?;
        if length > self.limits.max_chunk_length {
            return Err(AnalysisError::InvalidChunkLength(length));
        }

        let chunk_type = ChunkType(cursor.read_array("chunk type")?);
        trace!("Chunk {} with {} data bytes at {}", chunk_type, length, cursor.position() - 8);

        let descriptor = match lookup_decoder(&chunk_type) {
            Some(descriptor) => descriptor,
            None => {
                self.skip_chunk(cursor, chunk_type, length)?;
                return Ok(None);
            }
        };

        let chunk = self.read_chunk_body(cursor, chunk_type, length)?;
        chunk.verify_crc()?;

        debug!("Decoding {} ({}) with {} decoder", chunk_type, descriptor.name, descriptor.decoder.name());
        let record = descriptor.decoder.decode(&chunk, state, self.limits)?;
        Ok(Some(record))
    }

    /// Reads data and CRC of a chunk whose length and type are known
    pub fn read_chunk_body(&self, cursor: &mut ByteCursor, chunk_type: ChunkType, length: u32) -> AnalysisResult<PngChunk> {
        let data = cursor.read_n(length as u64, "chunk data")?;
        let crc32 = self
            .handler
            .read_u32(cursor)
            .map_err(|e| AnalysisError::from_io(e, "chunk CRC"))?;

        Ok(PngChunk {
            length,
            chunk_type,
            data,
            crc32,
        })
    }

    /// Skips data and CRC of an unrecognized chunk without checking the CRC
    fn skip_chunk(&self, cursor: &mut ByteCursor, chunk_type: ChunkType, length: u32) -> AnalysisResult<()> {
        trace!("Skipping {} chunk", chunk_type);
        cursor
            .seek(SeekFrom::Current(length as i64 + CRC_SIZE))
            .map_err(|e| match e {
                AnalysisError::SeekOutOfRange { .. } => {
                    AnalysisError::Truncated(format!("{} chunk", chunk_type))
                }
                other => other,
            })?;
        Ok(())
    }
}
