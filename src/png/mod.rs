//! PNG container scanning
//!
//! This module walks PNG chunks, verifies their CRC and decodes the text
//! and timestamp chunks into records.

pub mod chunk;
pub mod decoders;
pub mod scanner;
#[cfg(test)]
pub(crate) mod tests;

pub use chunk::{ChunkType, PngChunk, PNG_SIGNATURE};
pub use decoders::{lookup_decoder, ChunkDecoder, ChunkDescriptor, PngDecoderState, RECOGNIZED_CHUNKS};
pub use scanner::PngScanner;
