//! PNG chunk structures

use flate2::Crc;
use std::fmt;

use crate::metadata::errors::{AnalysisError, AnalysisResult};

/// Every PNG stream starts with these 8 bytes
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Four-byte chunk type code
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkType(pub [u8; 4]);

#[allow(non_upper_case_globals)]
impl ChunkType {
    pub const tEXt: Self = Self(*b"tEXt");
    pub const zTXt: Self = Self(*b"zTXt");
    pub const tIME: Self = Self(*b"tIME");
    pub const IEND: Self = Self(*b"IEND");

    /// The raw type bytes
    pub fn bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({})", self)
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

/// A chunk read in full
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngChunk {
    /// Length of the data field
    pub length: u32,
    /// Chunk type
    pub chunk_type: ChunkType,
    /// Chunk data
    pub data: Vec<u8>,
    /// CRC stored after the data
    pub crc32: u32,
}

impl PngChunk {
    /// CRC-32 over the type and data fields
    pub fn compute_crc(chunk_type: &ChunkType, data: &[u8]) -> u32 {
        let mut crc = Crc::new();
        crc.update(chunk_type.bytes());
        crc.update(data);
        crc.sum()
    }

    /// Checks the stored CRC against the computed one
    pub fn verify_crc(&self) -> AnalysisResult<()> {
        let computed = Self::compute_crc(&self.chunk_type, &self.data);
        if computed != self.crc32 {
            return Err(AnalysisError::ChecksumMismatch {
                chunk_type: self.chunk_type.to_string(),
                stored: self.crc32,
                computed,
            });
        }
        Ok(())
    }
}
