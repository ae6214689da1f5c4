//! Factory for creating compression handlers

use crate::config::ScanLimits;
use crate::metadata::errors::{AnalysisError, AnalysisResult};
use super::deflate::DeflateHandler;
use super::handler::CompressionHandler;

/// Factory for creating compression handlers
pub struct CompressionFactory;

impl CompressionFactory {
    /// Create a handler for a PNG compression method byte
    ///
    /// Method 0 (deflate) is the only one PNG defines.
    pub fn create_handler(method: u8, limits: &ScanLimits) -> AnalysisResult<Box<dyn CompressionHandler>> {
        match method {
            0 => Ok(Box::new(DeflateHandler::new(
                limits.inflate_initial_capacity,
                limits.inflate_max_output,
            ))),
            _ => Err(AnalysisError::UnsupportedCompressionMethod(method)),
        }
    }
}
