//! JPEG container scanning
//!
//! This module walks JPEG marker segments and extracts the Exif data held
//! in the APP1 segment.

pub mod marker;
pub mod scanner;

pub use marker::Marker;
pub use scanner::JpegScanner;
