//! JPEG segment scanner
//!
//! Walks the marker segments of a JPEG stream until it finds the APP1
//! segment, hands its payload to the Exif decoder and stops there.

use log::{debug, info, trace};
use std::io::SeekFrom;

use crate::config::ScanLimits;
use crate::io::byte_order::{BigEndianHandler, ByteOrderHandler};
use crate::io::cursor::ByteCursor;
use crate::jpeg::marker::{Marker, SOI};
use crate::metadata::errors::{AnalysisError, AnalysisResult};
use crate::metadata::record::MetadataRecord;
use crate::tiff::decoder::ExifDecoder;

/// Outcome of scanning one segment
#[derive(Debug)]
enum SegmentOutcome {
    /// Keep scanning
    Continue,
    /// APP1 decoded; scanning is over
    Exif(Vec<MetadataRecord>),
}

/// Scanner over the segments of a JPEG stream
pub struct JpegScanner<'a> {
    /// Limits handed to the Exif decoder
    limits: &'a ScanLimits,
    /// Segment lengths are big-endian
    handler: BigEndianHandler,
}

impl<'a> JpegScanner<'a> {
    /// Creates a new scanner
    pub fn new(limits: &'a ScanLimits) -> Self {
        JpegScanner {
            limits,
            handler: BigEndianHandler,
        }
    }

    /// Scans a JPEG stream from the cursor position
    ///
    /// The first marker must be SOI. Scanning stops successfully at the end
    /// of the stream or right after the APP1 segment has been decoded.
    ///
    /// # Returns
    /// Exif records, or an empty list for a file without APP1
    pub fn scan(&self, cursor: &mut ByteCursor) -> AnalysisResult<Vec<MetadataRecord>> {
        let first = self.read_marker(cursor).map_err(|e| match e {
            AnalysisError::InvalidMarker(_) => AnalysisError::BadSignature,
            other => other,
        })?;
        if first.code() != SOI {
            return Err(AnalysisError::BadSignature);
        }
        self.skip_entropy_data(cursor)?;

        let mut segments = 1usize;
        while !cursor.is_eof()? {
            segments += 1;
            if let SegmentOutcome::Exif(records) = self.scan_segment(cursor)? {
                info!("Exif segment found after {} segments", segments);
                return Ok(records);
            }
        }

        info!("Scanned {} JPEG segments, no Exif segment", segments);
        Ok(Vec::new())
    }

    fn scan_segment(&self, cursor: &mut ByteCursor) -> AnalysisResult<SegmentOutcome> {
        let marker = self.read_marker(cursor)?;
        trace!("Marker {} at {}", marker, cursor.position() - 2);

        match marker {
            Marker::Superchunk(_) => {
                self.skip_entropy_data(cursor)?;
                Ok(SegmentOutcome::Continue)
            }
            Marker::StandardChunk(_) => {
                let payload_len = self.read_length(cursor)?;

                if marker.is_app1() {
                    debug!("APP1 segment with {} payload bytes", payload_len);
                    let records = ExifDecoder::new(self.limits).decode(cursor)?;
                    return Ok(SegmentOutcome::Exif(records));
                }

                cursor.seek(SeekFrom::Current(payload_len as i64)).map_err(|e| match e {
                    AnalysisError::SeekOutOfRange { .. } => {
                        AnalysisError::Truncated(format!("{} segment payload", marker))
                    }
                    other => other,
                })?;
                Ok(SegmentOutcome::Continue)
            }
        }
    }

    /// Reads and classifies a two-byte marker
    pub fn read_marker(&self, cursor: &mut ByteCursor) -> AnalysisResult<Marker> {
        let code = self
            .handler
            .read_u16(cursor)
            .map_err(|e| AnalysisError::from_io(e, "JPEG marker"))?;
        Marker::from_code(code)
    }

    /// Reads a segment length and returns the payload size
    fn read_length(&self, cursor: &mut ByteCursor) -> AnalysisResult<u16> {
        let length = self
            .handler
            .read_u16(cursor)
            .map_err(|e| AnalysisError::from_io(e, "JPEG segment length"))?;

        // The length counts its own two bytes
        length
            .checked_sub(2)
            .ok_or(AnalysisError::InvalidSegmentLength(length))
    }

    /// Skips entropy-coded data after a superchunk marker
    ///
    /// Stops on a 0xFF that is not followed by 0x00, leaving the cursor on
    /// that byte. A superchunk at the very end of the stream (EOI) has no
    /// data; running out of bytes anywhere else is an error.
    pub fn skip_entropy_data(&self, cursor: &mut ByteCursor) -> AnalysisResult<()> {
        if cursor.is_eof()? {
            return Ok(());
        }

        let start = cursor.position();
        while let Some(byte) = cursor.next_byte()? {
            if byte == 0xFF && cursor.peek()? != Some(0x00) {
                cursor.seek(SeekFrom::Current(-1))?;
                trace!("Skipped {} bytes of entropy-coded data", cursor.position() - start);
                return Ok(());
            }
        }

        Err(AnalysisError::Truncated("entropy-coded data".to_string()))
    }
}
