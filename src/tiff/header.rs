//! Exif/TIFF header

use log::debug;

use crate::io::byte_order::ByteOrder;
use crate::io::cursor::ByteCursor;
use crate::metadata::errors::{AnalysisError, AnalysisResult};
use crate::tiff::constants::header;

/// Header of the TIFF block carried in an APP1 segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    /// Position of the byte-order marker; all IFD offsets are relative to it
    pub base: u64,
    /// Byte order of the block (always little-endian here)
    pub byte_order: ByteOrder,
    /// Offset of the 0th IFD from `base`
    pub first_ifd_offset: u32,
}

impl TiffHeader {
    /// Reads and validates the header
    ///
    /// Expects the cursor at the start of the APP1 payload. Checks the
    /// `Exif\0\0` magic, the `II` marker and the 42 magic number, then reads
    /// the 0th IFD offset. Only little-endian blocks are accepted.
    pub fn read(cursor: &mut ByteCursor) -> AnalysisResult<Self> {
        let magic: [u8; 6] = cursor.read_array("Exif header")?;
        if magic != header::EXIF_MAGIC {
            return Err(AnalysisError::BadTiffHeader("missing Exif magic".to_string()));
        }

        let base = cursor.position();

        let marker: [u8; 2] = cursor.read_array("TIFF byte order")?;
        if marker != header::LITTLE_ENDIAN_MARKER {
            // Valid but unsupported markers get a clearer message than garbage
            let detected = ByteOrder::detect(marker)?;
            return Err(AnalysisError::BadTiffHeader(format!(
                "unsupported byte order: {}", detected.name()
            )));
        }
        let byte_order = ByteOrder::LittleEndian;

        let version: [u8; 2] = cursor.read_array("TIFF version")?;
        if version != header::TIFF_MAGIC {
            return Err(AnalysisError::BadTiffHeader(format!(
                "bad magic number {:02x} {:02x}", version[0], version[1]
            )));
        }

        let handler = byte_order.create_handler();
        let first_ifd_offset = handler
            .read_u32(cursor)
            .map_err(|e| AnalysisError::from_io(e, "0th IFD offset"))?;

        debug!("TIFF base at {}, {}, 0th IFD at +{}", base, byte_order.name(), first_ifd_offset);

        Ok(TiffHeader {
            base,
            byte_order,
            first_ifd_offset,
        })
    }
}
