//! Exif IFD decoder
//!
//! Walks the 0th IFD of the TIFF block in an APP1 segment, then the Exif
//! sub-IFD it points to, and turns every known string tag into a
//! [`MetadataRecord`].

use log::{debug, info, trace};
use std::collections::HashSet;
use std::io::SeekFrom;

use crate::config::ScanLimits;
use crate::io::byte_order::ByteOrderHandler;
use crate::io::cursor::ByteCursor;
use crate::metadata::errors::{AnalysisError, AnalysisResult};
use crate::metadata::record::MetadataRecord;
use crate::tiff::constants::{tags, ASCII_CHARACTER_CODE, IFD_ENTRY_SIZE};
use crate::tiff::header::TiffHeader;
use crate::tiff::ifd::{Ifd, IfdEntry};
use crate::tiff::tags::TagRegistry;

/// State of one walk over the IFD tree
///
/// Created per APP1 segment and threaded through every recursive call.
#[derive(Debug, Default)]
pub struct IfdWalk {
    /// IFD offsets already decoded
    visited: HashSet<u64>,
    /// Records collected so far, in file order
    pub records: Vec<MetadataRecord>,
}

impl IfdWalk {
    /// Creates an empty walk
    pub fn new() -> Self {
        IfdWalk::default()
    }
}

/// Decoder for the TIFF block inside an Exif APP1 segment
pub struct ExifDecoder<'a> {
    /// Known string tags
    registry: &'a TagRegistry,
    /// Depth limit for sub-IFDs
    limits: &'a ScanLimits,
}

impl<'a> ExifDecoder<'a> {
    /// Creates a decoder using the built-in tag registry
    pub fn new(limits: &'a ScanLimits) -> Self {
        ExifDecoder {
            registry: TagRegistry::builtin(),
            limits,
        }
    }

    /// Creates a decoder with a custom tag registry
    pub fn with_registry(registry: &'a TagRegistry, limits: &'a ScanLimits) -> Self {
        ExifDecoder { registry, limits }
    }

    /// Decodes an APP1 payload
    ///
    /// Expects the cursor at the first byte after the segment length. The
    /// cursor is left where it was on return.
    ///
    /// # Returns
    /// Records for every known string tag, 0th IFD first
    pub fn decode(&self, cursor: &mut ByteCursor) -> AnalysisResult<Vec<MetadataRecord>> {
        let mut mark = cursor.mark();
        let header = TiffHeader::read(&mut mark)?;
        let handler = header.byte_order.create_handler();

        let mut walk = IfdWalk::new();
        self.decode_ifd(&mut mark, handler.as_ref(), header.base, header.first_ifd_offset as u64, 0, &mut walk)?;
        mark.release()?;

        info!("Decoded {} Exif records", walk.records.len());
        Ok(walk.records)
    }

    /// Decodes the IFD at `base + offset` and, recursively, its Exif sub-IFD
    ///
    /// The cursor position is the same on return as on entry, whether the
    /// call succeeds or fails.
    ///
    /// # Arguments
    /// * `cursor` - Cursor over the stream
    /// * `handler` - Byte order of the TIFF block
    /// * `base` - Absolute position of the TIFF header
    /// * `offset` - Offset of the IFD from `base`
    /// * `depth` - Nesting level of this IFD
    /// * `walk` - Visited offsets and collected records
    pub fn decode_ifd(
        &self,
        cursor: &mut ByteCursor,
        handler: &dyn ByteOrderHandler,
        base: u64,
        offset: u64,
        depth: usize,
        walk: &mut IfdWalk,
    ) -> AnalysisResult<()> {
        if depth > self.limits.max_ifd_depth {
            return Err(AnalysisError::IfdDepthExceeded(self.limits.max_ifd_depth));
        }
        if !walk.visited.insert(offset) {
            return Err(AnalysisError::IfdCycle(offset));
        }

        let mut mark = cursor.mark();
        let result = self.decode_ifd_contents(&mut mark, handler, base, offset, depth, walk);
        let restored = mark.release();

        result?;
        restored
    }

    fn decode_ifd_contents(
        &self,
        cursor: &mut ByteCursor,
        handler: &dyn ByteOrderHandler,
        base: u64,
        offset: u64,
        depth: usize,
        walk: &mut IfdWalk,
    ) -> AnalysisResult<()> {
        let ifd = self.read_ifd(cursor, handler, base, offset, depth)?;

        for entry in &ifd.entries {
            if let Some(record) = self.resolve_entry(cursor, base, entry)? {
                walk.records.push(record);
            }
        }

        if let Some(pointer) = ifd.exif_pointer {
            debug!("Following Exif sub-IFD at +{}", pointer);
            self.decode_ifd(cursor, handler, base, pointer as u64, depth + 1, walk)?;
        }

        Ok(())
    }

    /// Reads the entry count and entries of the IFD at `base + offset`
    ///
    /// Leaves the cursor after the last entry.
    pub fn read_ifd(
        &self,
        cursor: &mut ByteCursor,
        handler: &dyn ByteOrderHandler,
        base: u64,
        offset: u64,
        depth: usize,
    ) -> AnalysisResult<Ifd> {
        cursor
            .seek(SeekFrom::Start(base + offset))
            .map_err(|e| ifd_error(e, "IFD offset"))?;

        let entry_count = handler
            .read_u16(cursor)
            .map_err(|e| ifd_error(AnalysisError::from_io(e, "entry count"), "entry count"))?;
        debug!("IFD at +{} has {} entries", offset, entry_count);

        // Reject directories that cannot fit before reading them one by one
        let needed = entry_count as u64 * IFD_ENTRY_SIZE;
        if cursor.position() + needed > cursor.len() {
            return Err(AnalysisError::BadIfd(format!(
                "{} entries at +{} run past end of stream", entry_count, offset
            )));
        }

        let mut ifd = Ifd::new(offset, depth);
        for _ in 0..entry_count {
            let entry = self.read_ifd_entry(cursor, handler)?;
            ifd.add_entry(entry);
        }
        trace!("{}", ifd);

        Ok(ifd)
    }

    fn read_ifd_entry(&self, cursor: &mut ByteCursor, handler: &dyn ByteOrderHandler) -> AnalysisResult<IfdEntry> {
        let field = |e| ifd_error(AnalysisError::from_io(e, "IFD entry"), "IFD entry");

        let tag_id = handler.read_u16(cursor).map_err(field)?;
        let datatype = handler.read_u16(cursor).map_err(field)?;
        let count = handler.read_u32(cursor).map_err(field)?;
        let value_or_offset = handler.read_u32(cursor).map_err(field)?;

        Ok(IfdEntry::new(tag_id, datatype, count, value_or_offset))
    }

    /// Turns one entry into a record, or `None` if it is not reported
    fn resolve_entry(&self, cursor: &mut ByteCursor, base: u64, entry: &IfdEntry) -> AnalysisResult<Option<MetadataRecord>> {
        if entry.is_exif_pointer() {
            return Ok(None);
        }

        if !entry.is_string() {
            trace!("Skipping non-string tag {:#06x}", entry.tag_id);
            return Ok(None);
        }

        let name = match self.registry.name(entry.tag_id) {
            Some(name) => name,
            None => {
                trace!("Skipping unknown tag {:#06x}", entry.tag_id);
                return Ok(None);
            }
        };

        let value = if entry.is_value_inline() {
            entry.inline_bytes()
        } else {
            self.read_out_of_line(cursor, base, entry)?
        };

        debug!("{}: {} bytes", name, value.len());
        Ok(Some(MetadataRecord::bytes(name, value)))
    }

    /// Reads a string stored at `base + value_or_offset`
    ///
    /// Stops after `count` bytes or at a NUL. A UserComment starting with the
    /// ASCII character code has those 8 bytes removed.
    fn read_out_of_line(&self, cursor: &mut ByteCursor, base: u64, entry: &IfdEntry) -> AnalysisResult<Vec<u8>> {
        let mut mark = cursor.mark();
        mark.seek(SeekFrom::Start(base + entry.value_or_offset as u64))
            .map_err(|e| ifd_error(e, "value offset"))?;

        let mut remaining = entry.count as u64;
        if entry.tag_id == tags::USER_COMMENT && remaining >= ASCII_CHARACTER_CODE.len() as u64 {
            let code: [u8; 8] = mark
                .read_array("UserComment character code")
                .map_err(|e| ifd_error(e, "UserComment character code"))?;

            if code == ASCII_CHARACTER_CODE {
                remaining -= ASCII_CHARACTER_CODE.len() as u64;
            } else {
                trace!("UserComment without ASCII character code, reading verbatim");
                mark.seek(SeekFrom::Current(-(ASCII_CHARACTER_CODE.len() as i64)))?;
            }
        }

        let value = mark
            .read_until_nul(remaining, "tag value")
            .map_err(|e| ifd_error(e, "tag value"))?;
        mark.release()?;

        Ok(value)
    }
}

/// Reports stream-shape failures inside an IFD as a malformed IFD
fn ifd_error(error: AnalysisError, what: &str) -> AnalysisError {
    match error {
        AnalysisError::Truncated(_) | AnalysisError::SeekOutOfRange { .. } => {
            AnalysisError::BadIfd(format!("{}: {}", what, error))
        }
        other => other,
    }
}
