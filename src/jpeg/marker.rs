//! JPEG markers

use std::fmt;

use crate::metadata::errors::{AnalysisError, AnalysisResult};

/// Lowest valid marker code
pub const MARKER_MIN: u16 = 0xFF01;
/// Highest valid marker code
pub const MARKER_MAX: u16 = 0xFFFE;

/// Start of image
pub const SOI: u16 = 0xFFD8;
/// End of image
pub const EOI: u16 = 0xFFD9;
/// Start of scan
pub const SOS: u16 = 0xFFDA;
/// Application segment 1 (Exif)
pub const APP1: u16 = 0xFFE1;

/// First and last marker without a length field (RST0..RST7, SOI, EOI, SOS)
const SUPERCHUNK_RANGE: std::ops::RangeInclusive<u16> = 0xFFD0..=0xFFDA;

/// A marker read from the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// No length field; followed by entropy-coded data (possibly empty)
    Superchunk(u16),
    /// Followed by a big-endian length and `length - 2` payload bytes
    StandardChunk(u16),
}

impl Marker {
    /// Classifies a marker code
    ///
    /// Codes outside [0xFF01, 0xFFFE] are rejected.
    pub fn from_code(code: u16) -> AnalysisResult<Self> {
        if !(MARKER_MIN..=MARKER_MAX).contains(&code) {
            return Err(AnalysisError::InvalidMarker(code));
        }

        if SUPERCHUNK_RANGE.contains(&code) {
            Ok(Marker::Superchunk(code))
        } else {
            Ok(Marker::StandardChunk(code))
        }
    }

    /// The raw marker code
    pub fn code(&self) -> u16 {
        match self {
            Marker::Superchunk(code) | Marker::StandardChunk(code) => *code,
        }
    }

    /// Whether this is the APP1 marker
    pub fn is_app1(&self) -> bool {
        self.code() == APP1
    }

    /// Short name of the marker, for logging
    pub fn name(&self) -> &'static str {
        match self.code() {
            SOI => "SOI",
            EOI => "EOI",
            SOS => "SOS",
            0xFFD0..=0xFFD7 => "RST",
            0xFFE0..=0xFFEF => "APP",
            0xFFC0..=0xFFCF => "SOF/DHT",
            0xFFDB => "DQT",
            0xFFDD => "DRI",
            0xFFFE => "COM",
            _ => "other",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#06x})", self.name(), self.code())
    }
}
