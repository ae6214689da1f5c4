//! Exif/TIFF format constants
//!
//! Magic numbers used while decoding the TIFF block embedded in a JPEG
//! APP1 segment.

/// Exif APP1 header constants
pub mod header {
    /// "Exif" followed by two NUL bytes, in front of the TIFF block
    pub const EXIF_MAGIC: [u8; 6] = *b"Exif\0\0";

    /// "II" byte order marker for little-endian
    pub const LITTLE_ENDIAN_MARKER: [u8; 2] = [0x49, 0x49];

    /// Standard TIFF version number (42), little-endian
    pub const TIFF_MAGIC: [u8; 2] = [0x2A, 0x00];
}

/// Field types as defined by TIFF 6.0
pub mod field_types {
    pub const BYTE: u16 = 1;       // 8-bit unsigned integer
    pub const ASCII: u16 = 2;      // 8-bit byte containing ASCII character
    pub const SHORT: u16 = 3;      // 16-bit unsigned integer
    pub const LONG: u16 = 4;       // 32-bit unsigned integer
    pub const RATIONAL: u16 = 5;   // Two LONGs: numerator and denominator
    pub const SBYTE: u16 = 6;      // 8-bit signed integer
    pub const UNDEFINED: u16 = 7;  // 8-bit byte with unspecified format
    pub const SSHORT: u16 = 8;     // 16-bit signed integer
    pub const SLONG: u16 = 9;      // 32-bit signed integer
    pub const SRATIONAL: u16 = 10; // Two SLONGs: numerator and denominator
    pub const FLOAT: u16 = 11;     // Single precision IEEE floating point
    pub const DOUBLE: u16 = 12;    // Double precision IEEE floating point
}

/// Tags with special handling
pub mod tags {
    pub const EXIF_IFD_POINTER: u16 = 0x8769; // Offset of the Exif sub-IFD
    pub const USER_COMMENT: u16 = 0x9286;     // Comment with character code preamble
}

/// UserComment character code preamble for ASCII text
pub const ASCII_CHARACTER_CODE: [u8; 8] = *b"ASCII\0\0\0";

/// Size of an IFD entry in bytes
pub const IFD_ENTRY_SIZE: u64 = 12;

/// Values of at most this many bytes are stored inside the entry
pub const INLINE_VALUE_SIZE: u32 = 4;
