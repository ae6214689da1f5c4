//! Compression handler trait definition

use crate::metadata::errors::AnalysisResult;

/// Strategy trait for the compression methods a PNG text chunk may declare
pub trait CompressionHandler: Send + Sync {
    /// Decompress the data
    fn decompress(&self, data: &[u8]) -> AnalysisResult<Vec<u8>>;

    /// Get the name of this compression method
    fn name(&self) -> &'static str;

    /// Get the compression method byte
    fn code(&self) -> u8;
}
