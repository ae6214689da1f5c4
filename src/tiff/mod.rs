//! Exif/TIFF decoding module
//!
//! This module provides the structures and the decoder for the TIFF block
//! embedded in a JPEG APP1 segment.

pub(crate) mod constants;
pub mod decoder;
pub mod header;
pub mod ifd;
pub mod tags;
#[cfg(test)]
pub(crate) mod tests;

pub use decoder::{ExifDecoder, IfdWalk};
pub use header::TiffHeader;
pub use ifd::{Ifd, IfdEntry};
pub use tags::{TagDescriptor, TagGroup, TagRegistry};
