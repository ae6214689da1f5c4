//! Custom error types for metadata analysis

use std::fmt;
use std::io;

/// Structural failures raised while scanning a JPEG or PNG stream
///
/// Every variant aborts the whole analysis. Items that are merely
/// unrecognized (unknown tags, unknown chunk types) are skipped by the
/// scanners and never surface here.
#[derive(Debug)]
pub enum AnalysisError {
    /// I/O error other than a short read
    IoError(io::Error),
    /// Stream does not start with a PNG signature or a JPEG SOI marker
    BadSignature,
    /// Stream ended before a structure was complete
    Truncated(String),
    /// Seek target outside the stream
    SeekOutOfRange {
        /// Requested absolute position
        target: i128,
        /// Stream length
        len: u64,
    },
    /// JPEG marker outside [0xFF01, 0xFFFE]
    InvalidMarker(u16),
    /// JPEG segment length smaller than its own length field
    InvalidSegmentLength(u16),
    /// Exif/TIFF header mismatch
    BadTiffHeader(String),
    /// Malformed image file directory
    BadIfd(String),
    /// Exif sub-IFD nesting deeper than allowed
    IfdDepthExceeded(usize),
    /// Exif sub-IFD pointer revisits an IFD offset
    IfdCycle(u64),
    /// PNG chunk length above the configured maximum
    InvalidChunkLength(u32),
    /// Stored chunk CRC does not match the computed one
    ChecksumMismatch {
        /// Chunk type
        chunk_type: String,
        /// CRC stored in the file
        stored: u32,
        /// CRC computed over type and data
        computed: u32,
    },
    /// Recognized chunk whose payload does not follow its layout
    MalformedChunk(String),
    /// Chunk type that may appear only once was repeated
    DuplicateChunk(String),
    /// zTXt compression method other than deflate
    UnsupportedCompressionMethod(u8),
    /// Inflate failed or exceeded the output limit
    DecompressionFailed(String),
    /// Scan limits could not be loaded
    InvalidConfig(String),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::IoError(e) => write!(f, "I/O error: {}", e),
            AnalysisError::BadSignature => write!(f, "Not a PNG or JPEG file"),
            AnalysisError::Truncated(what) => write!(f, "Unexpected end of file while reading {}", what),
            AnalysisError::SeekOutOfRange { target, len } => {
                write!(f, "Seek to {} outside stream of {} bytes", target, len)
            }
            AnalysisError::InvalidMarker(m) => write!(f, "Invalid JPEG marker: {:#06x}", m),
            AnalysisError::InvalidSegmentLength(l) => write!(f, "Invalid JPEG segment length: {}", l),
            AnalysisError::BadTiffHeader(msg) => write!(f, "Invalid Exif header: {}", msg),
            AnalysisError::BadIfd(msg) => write!(f, "Invalid IFD: {}", msg),
            AnalysisError::IfdDepthExceeded(d) => write!(f, "Exif IFD nesting exceeds depth {}", d),
            AnalysisError::IfdCycle(offset) => write!(f, "IFD at offset {} visited twice", offset),
            AnalysisError::InvalidChunkLength(l) => write!(f, "Invalid PNG chunk length: {}", l),
            AnalysisError::ChecksumMismatch { chunk_type, stored, computed } => write!(
                f,
                "CRC mismatch in {} chunk: stored {:#010x}, computed {:#010x}",
                chunk_type, stored, computed
            ),
            AnalysisError::MalformedChunk(msg) => write!(f, "Malformed chunk: {}", msg),
            AnalysisError::DuplicateChunk(t) => write!(f, "Duplicate {} chunk", t),
            AnalysisError::UnsupportedCompressionMethod(m) => {
                write!(f, "Unsupported compression method: {}", m)
            }
            AnalysisError::DecompressionFailed(msg) => write!(f, "Decompression failed: {}", msg),
            AnalysisError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            AnalysisError::GenericError(msg) => write!(f, "Analysis error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl AnalysisError {
    /// Converts an I/O error, naming the structure that was being read
    ///
    /// A short read becomes [`AnalysisError::Truncated`]; anything else
    /// stays an I/O error.
    pub fn from_io(error: io::Error, what: &str) -> Self {
        if error.kind() == io::ErrorKind::UnexpectedEof {
            AnalysisError::Truncated(what.to_string())
        } else {
            AnalysisError::IoError(error)
        }
    }

    /// Whether this error was caused by the stream ending early
    pub fn is_truncation(&self) -> bool {
        matches!(self, AnalysisError::Truncated(_))
    }
}

impl From<io::Error> for AnalysisError {
    fn from(error: io::Error) -> Self {
        if error.kind() == io::ErrorKind::UnexpectedEof {
            AnalysisError::Truncated("stream".to_string())
        } else {
            AnalysisError::IoError(error)
        }
    }
}

impl From<String> for AnalysisError {
    fn from(msg: String) -> Self {
        AnalysisError::GenericError(msg)
    }
}

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
