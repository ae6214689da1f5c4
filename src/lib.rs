pub mod io;
pub mod config;
pub mod metadata;
pub mod jpeg;
pub mod tiff;
pub mod png;
pub mod utils;
pub mod compression;
pub mod commands;

pub use config::ScanLimits;
pub use metadata::{analyze, AnalysisError, AnalysisResult, ImageFormat, MetadataAnalyzer, MetadataRecord, MetadataValue};
pub use io::SeekableReader;
