//! Image File Directory (IFD) structures and methods
//!
//! An IFD is a count followed by fixed-size entries. Each entry names a tag,
//! its datatype, a value count and either the value itself (when it fits in
//! four bytes) or an offset to it relative to the TIFF base.

use std::fmt;
use log::{debug, trace};

use crate::tiff::constants::{field_types, tags, INLINE_VALUE_SIZE};

/// Represents an Image File Directory
#[derive(Debug, Clone)]
pub struct Ifd {
    /// Entries in file order
    pub entries: Vec<IfdEntry>,
    /// Offset of this IFD from the TIFF base
    pub offset: u64,
    /// Nesting level (0 for the 0th IFD, 1 for the Exif sub-IFD)
    pub depth: usize,
    /// Exif sub-IFD pointer found in this directory, if any
    pub exif_pointer: Option<u32>,
}

/// Represents an entry in an Image File Directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IfdEntry {
    /// Tag identifier
    pub tag_id: u16,
    /// Field type
    pub datatype: u16,
    /// Number of values
    pub count: u32,
    /// Value or offset to values
    pub value_or_offset: u32,
}

impl IfdEntry {
    /// Creates a new IFD entry
    pub fn new(tag_id: u16, datatype: u16, count: u32, value_or_offset: u32) -> Self {
        trace!("IFD entry: tag={:#06x}, type={} ({}), count={}, value/offset={:#010x}",
               tag_id, datatype, field_type_name(datatype), count, value_or_offset);

        IfdEntry {
            tag_id,
            datatype,
            count,
            value_or_offset,
        }
    }

    /// Whether the datatype is ASCII or undefined
    pub fn is_string(&self) -> bool {
        matches!(self.datatype, field_types::ASCII | field_types::UNDEFINED)
    }

    /// Whether this entry points at the Exif sub-IFD
    pub fn is_exif_pointer(&self) -> bool {
        self.tag_id == tags::EXIF_IFD_POINTER
    }

    /// Whether a string value is stored inside the entry itself
    pub fn is_value_inline(&self) -> bool {
        self.count <= INLINE_VALUE_SIZE
    }

    /// Returns the inline string value
    ///
    /// The value is the first `count` bytes of the field as stored in the
    /// file, cut at the first NUL.
    pub fn inline_bytes(&self) -> Vec<u8> {
        let raw = self.value_or_offset.to_le_bytes();
        let count = (self.count.min(INLINE_VALUE_SIZE)) as usize;

        raw[..count]
            .iter()
            .take_while(|&&b| b != 0)
            .copied()
            .collect()
    }

    /// Returns a human-readable description of this entry
    pub fn description(&self) -> String {
        format!("Tag: {:#06x}, Type: {} ({}), Count: {}, Value/Offset: {}",
                self.tag_id, self.datatype, field_type_name(self.datatype),
                self.count, self.value_or_offset)
    }
}

impl Ifd {
    /// Creates a new empty IFD
    pub fn new(offset: u64, depth: usize) -> Self {
        debug!("Creating IFD at offset {} (depth {})", offset, depth);

        Ifd {
            entries: Vec::new(),
            offset,
            depth,
            exif_pointer: None,
        }
    }

    /// Adds an entry to this IFD
    ///
    /// A non-zero Exif pointer is remembered for after the directory has
    /// been read; a zero pointer means there is no sub-IFD.
    pub fn add_entry(&mut self, entry: IfdEntry) {
        if entry.is_exif_pointer() && entry.value_or_offset != 0 {
            debug!("Exif sub-IFD pointer at offset {}", entry.value_or_offset);
            self.exif_pointer = Some(entry.value_or_offset);
        }
        self.entries.push(entry);
    }

    /// Gets an IFD entry by tag
    pub fn get_entry(&self, tag_id: u16) -> Option<&IfdEntry> {
        self.entries.iter().find(|e| e.tag_id == tag_id)
    }

    /// Gets the number of entries in this IFD
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for Ifd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IFD (offset: {}, depth: {})", self.offset, self.depth)?;
        writeln!(f, "  Number of entries: {}", self.entries.len())?;
        for entry in &self.entries {
            writeln!(f, "    {}", entry.description())?;
        }
        Ok(())
    }
}

/// Name of a TIFF field type, for logging
pub fn field_type_name(datatype: u16) -> &'static str {
    match datatype {
        field_types::BYTE => "BYTE",
        field_types::ASCII => "ASCII",
        field_types::SHORT => "SHORT",
        field_types::LONG => "LONG",
        field_types::RATIONAL => "RATIONAL",
        field_types::SBYTE => "SBYTE",
        field_types::UNDEFINED => "UNDEFINED",
        field_types::SSHORT => "SSHORT",
        field_types::SLONG => "SLONG",
        field_types::SRATIONAL => "SRATIONAL",
        field_types::FLOAT => "FLOAT",
        field_types::DOUBLE => "DOUBLE",
        _ => "Unknown",
    }
}
