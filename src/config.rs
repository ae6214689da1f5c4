//! Scan limits
//!
//! Bounds applied while walking untrusted files. The defaults suit ordinary
//! camera and screenshot output; a TOML file can override any of them:
//!
//! ```toml
//! [limits]
//! max_ifd_depth = 1
//! max_chunk_length = 2147483647
//! inflate_initial_capacity = 256
//! inflate_max_output = 16777216
//! ```

use log::debug;
use std::fs;

use crate::metadata::errors::{AnalysisError, AnalysisResult};

/// Largest chunk length the PNG format allows (2^31 - 1)
pub const PNG_MAX_CHUNK_LENGTH: u32 = 0x7FFF_FFFF;

/// Limits applied while scanning one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLimits {
    /// Deepest Exif sub-IFD level followed (the 0th IFD is level 0)
    pub max_ifd_depth: usize,
    /// Largest PNG chunk length accepted
    pub max_chunk_length: u32,
    /// Starting size of the zTXt inflate buffer
    pub inflate_initial_capacity: usize,
    /// Size at which zTXt inflation gives up
    pub inflate_max_output: usize,
}

impl Default for ScanLimits {
    fn default() -> Self {
        ScanLimits {
            max_ifd_depth: 1,
            max_chunk_length: PNG_MAX_CHUNK_LENGTH,
            inflate_initial_capacity: 256,
            inflate_max_output: 16 * 1024 * 1024,
        }
    }
}

impl ScanLimits {
    /// Parse limits from a TOML string
    ///
    /// Keys live in a `[limits]` table; missing keys keep their defaults.
    pub fn from_str(content: &str) -> AnalysisResult<Self> {
        let toml_value: toml::Value = match content.parse() {
            Ok(value) => value,
            Err(e) => return Err(AnalysisError::InvalidConfig(format!("Failed to parse TOML: {}", e))),
        };

        let mut limits = ScanLimits::default();

        let table = match toml_value.get("limits").and_then(|v| v.as_table()) {
            Some(table) => table,
            None => return Ok(limits),
        };

        for (key, value) in table {
            let number = value.as_integer().ok_or_else(|| {
                AnalysisError::InvalidConfig(format!("{} must be an integer", key))
            })?;

            match key.as_str() {
                "max_ifd_depth" => limits.max_ifd_depth = Self::to_usize(key, number)?,
                "max_chunk_length" => {
                    let length = u32::try_from(number)
                        .ok()
                        .filter(|l| *l <= PNG_MAX_CHUNK_LENGTH)
                        .ok_or_else(|| {
                            AnalysisError::InvalidConfig(format!("max_chunk_length out of range: {}", number))
                        })?;
                    limits.max_chunk_length = length;
                }
                "inflate_initial_capacity" => {
                    limits.inflate_initial_capacity = Self::to_usize(key, number)?.max(1)
                }
                "inflate_max_output" => limits.inflate_max_output = Self::to_usize(key, number)?,
                other => debug!("Ignoring unknown limit '{}'", other),
            }
        }

        if limits.inflate_initial_capacity > limits.inflate_max_output {
            return Err(AnalysisError::InvalidConfig(
                "inflate_initial_capacity exceeds inflate_max_output".to_string(),
            ));
        }

        Ok(limits)
    }

    /// Load limits from a TOML file
    pub fn from_file(path: &str) -> AnalysisResult<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => return Err(AnalysisError::IoError(e)),
        };

        Self::from_str(&contents)
    }

    fn to_usize(key: &str, number: i64) -> AnalysisResult<usize> {
        usize::try_from(number)
            .map_err(|_| AnalysisError::InvalidConfig(format!("{} must not be negative: {}", key, number)))
    }
}
