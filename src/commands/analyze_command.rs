//! Metadata extraction command
//!
//! This module implements the default command: analyze one JPEG or PNG
//! file and print a `Key: Value` line per record.

use clap::ArgMatches;
use log::{debug, info};
use std::io::Write;
use std::path::PathBuf;

use crate::commands::command_traits::Command;
use crate::config::ScanLimits;
use crate::metadata::analyzer::MetadataAnalyzer;
use crate::metadata::errors::{AnalysisError, AnalysisResult};

/// Command for printing the metadata of an image file
pub struct AnalyzeCommand {
    /// Path to the input file
    input_file: PathBuf,
    /// Limits applied while scanning
    limits: ScanLimits,
}

impl AnalyzeCommand {
    /// Create a new analyze command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    ///
    /// # Returns
    /// A new AnalyzeCommand instance or an error
    pub fn new(args: &ArgMatches) -> AnalysisResult<Self> {
        let input_file = args.get_one::<String>("input")
            .ok_or_else(|| AnalysisError::GenericError("Missing input file".to_string()))?;

        let limits = match args.get_one::<String>("limits") {
            Some(path) => {
                debug!("Loading scan limits from {}", path);
                ScanLimits::from_file(path)?
            }
            None => ScanLimits::default(),
        };

        Ok(AnalyzeCommand::with_limits(input_file, limits))
    }

    /// Create a command for a path with explicit limits
    pub fn with_limits(input_file: impl Into<PathBuf>, limits: ScanLimits) -> Self {
        AnalyzeCommand {
            input_file: input_file.into(),
            limits,
        }
    }
}

impl Command for AnalyzeCommand {
    fn execute(&self, out: &mut dyn Write) -> AnalysisResult<()> {
        let analyzer = MetadataAnalyzer::with_limits(self.limits);
        // Nothing is written unless the whole file parsed
        let records = analyzer.load(&self.input_file)?;

        for record in &records {
            record.write_line(out)?;
        }
        out.flush()?;

        info!("Printed {} records from {}", records.len(), self.input_file.display());
        Ok(())
    }
}
