//! Metadata model and analysis entry points

pub mod analyzer;
pub mod errors;
pub mod record;
#[cfg(test)]
mod tests;

pub use analyzer::{analyze, ImageFormat, MetadataAnalyzer};
pub use errors::{AnalysisError, AnalysisResult};
pub use record::{MetadataRecord, MetadataValue};
