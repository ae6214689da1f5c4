//! Format detection and analysis entry points
//!
//! [`MetadataAnalyzer`] wraps a stream in a [`ByteCursor`], decides from the
//! first byte whether it is a PNG or a JPEG, and hands the cursor to the
//! matching scanner.

use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::config::ScanLimits;
use crate::io::cursor::ByteCursor;
use crate::io::seekable::SeekableReader;
use crate::jpeg::scanner::JpegScanner;
use crate::metadata::errors::{AnalysisError, AnalysisResult};
use crate::metadata::record::MetadataRecord;
use crate::png::scanner::PngScanner;

/// First byte of a PNG signature
const PNG_LEAD_BYTE: u8 = 0x89;
/// First byte of every JPEG marker
const JPEG_LEAD_BYTE: u8 = 0xFF;

/// Container formats that can be analyzed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Detects the format from the next byte without consuming it
    ///
    /// Only the lead byte is looked at here; each scanner validates the
    /// rest of its signature.
    pub fn detect(cursor: &mut ByteCursor) -> AnalysisResult<Self> {
        match cursor.peek()? {
            Some(PNG_LEAD_BYTE) => Ok(ImageFormat::Png),
            Some(JPEG_LEAD_BYTE) => Ok(ImageFormat::Jpeg),
            _ => Err(AnalysisError::BadSignature),
        }
    }

    /// Get the name of this format
    pub fn name(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Png => "PNG",
        }
    }
}

/// Extracts metadata records from JPEG and PNG streams
#[derive(Debug, Clone, Default)]
pub struct MetadataAnalyzer {
    limits: ScanLimits,
}

impl MetadataAnalyzer {
    /// Creates an analyzer with default limits
    pub fn new() -> Self {
        MetadataAnalyzer::default()
    }

    /// Creates an analyzer with custom limits
    pub fn with_limits(limits: ScanLimits) -> Self {
        MetadataAnalyzer { limits }
    }

    /// Limits in effect
    pub fn limits(&self) -> &ScanLimits {
        &self.limits
    }

    /// Analyzes a stream from its current position
    ///
    /// # Arguments
    /// * `reader` - Seekable stream holding a PNG or JPEG
    ///
    /// # Returns
    /// All records in file order, or the first structural error. No partial
    /// results are returned on failure.
    pub fn read(&self, reader: &mut dyn SeekableReader) -> AnalysisResult<Vec<MetadataRecord>> {
        let mut cursor = ByteCursor::new(reader)?;
        let format = ImageFormat::detect(&mut cursor)?;
        info!("Detected {} stream of {} bytes", format.name(), cursor.len());

        match format {
            ImageFormat::Png => PngScanner::new(&self.limits).scan(&mut cursor),
            ImageFormat::Jpeg => JpegScanner::new(&self.limits).scan(&mut cursor),
        }
    }

    /// Opens a file and analyzes it
    ///
    /// # Arguments
    /// * `path` - Path to the image file
    pub fn load<P: AsRef<Path>>(&self, path: P) -> AnalysisResult<Vec<MetadataRecord>> {
        let path = path.as_ref();
        info!("Analyzing {}", path.display());

        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        self.read(&mut reader)
    }
}

/// Analyzes a stream with default limits
pub fn analyze(reader: &mut dyn SeekableReader) -> AnalysisResult<Vec<MetadataRecord>> {
    MetadataAnalyzer::new().read(reader)
}
