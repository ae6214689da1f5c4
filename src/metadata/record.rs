//! Metadata record model

use std::fmt;
use std::io::{self, Write};

/// Value of a metadata record
///
/// Exif strings are kept as the raw bytes found in the file; PNG text and
/// timestamps are decoded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataValue {
    /// Decoded text
    Text(String),
    /// Raw bytes copied from the file
    Bytes(Vec<u8>),
}

impl MetadataValue {
    /// Raw bytes of this value
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            MetadataValue::Text(s) => s.as_bytes(),
            MetadataValue::Bytes(b) => b,
        }
    }

    /// Lossy text rendering of this value
    pub fn to_text(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }
}

/// One key/value pair found in a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    /// Printable key (tag name, PNG keyword, or "Timestamp")
    pub key: String,
    /// Record value
    pub value: MetadataValue,
}

impl MetadataRecord {
    /// Creates a record holding raw bytes
    pub fn bytes(key: impl Into<String>, value: Vec<u8>) -> Self {
        MetadataRecord {
            key: key.into(),
            value: MetadataValue::Bytes(value),
        }
    }

    /// Creates a record holding text
    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        MetadataRecord {
            key: key.into(),
            value: MetadataValue::Text(value.into()),
        }
    }

    /// Writes the record as one `"<Key>: <Value>"` line
    ///
    /// Byte values are written untouched so non-UTF-8 text survives as-is.
    pub fn write_line(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(self.key.as_bytes())?;
        out.write_all(b": ")?;
        out.write_all(self.value.as_bytes())?;
        out.write_all(b"\n")
    }
}

impl fmt::Display for MetadataRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value.to_text())
    }
}
