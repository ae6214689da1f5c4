//! Handler for zlib/deflate compressed text

use crate::metadata::errors::AnalysisResult;
use super::handler::CompressionHandler;
use super::inflate::InflateBuffer;

/// Deflate (zlib) handler, compression method 0
pub struct DeflateHandler {
    /// Starting size of the output buffer
    initial_capacity: usize,
    /// Output size at which inflation fails
    max_output: usize,
}

impl DeflateHandler {
    /// Creates a handler with the given buffer bounds
    pub fn new(initial_capacity: usize, max_output: usize) -> Self {
        DeflateHandler {
            initial_capacity,
            max_output,
        }
    }
}

impl CompressionHandler for DeflateHandler {
    fn decompress(&self, data: &[u8]) -> AnalysisResult<Vec<u8>> {
        InflateBuffer::new(self.initial_capacity, self.max_output).inflate(data)
    }

    fn name(&self) -> &'static str {
        "Deflate"
    }

    fn code(&self) -> u8 {
        0
    }
}
