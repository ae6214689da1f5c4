//! CLI command implementations
//!
//! This module contains implementations of various commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod analyze_command;
pub mod list_tags_command;
#[cfg(test)]
mod tests;

pub use command_traits::{Command, CommandFactory};
pub use analyze_command::AnalyzeCommand;
pub use list_tags_command::ListTagsCommand;

use clap::{Arg, ArgAction, ArgMatches, Command as ClapCommand};
use crate::metadata::errors::AnalysisResult;

/// Builds the command-line interface
pub fn cli() -> ClapCommand {
    ClapCommand::new("metapeek")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Print Exif metadata from JPEG files and text metadata from PNG files")
        .arg(
            Arg::new("input")
                .help("Input JPEG or PNG file")
                .required_unless_present("list-tags")
                .index(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Write log messages to this file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("limits")
                .long("limits")
                .help("TOML file overriding the scan limits")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("list-tags")
                .long("list-tags")
                .help("List the Exif tags that are reported and exit")
                .action(ArgAction::SetTrue),
        )
}

/// Factory for creating command instances based on CLI arguments
///
/// This factory examines the command-line arguments and creates
/// the appropriate command instance for execution.
pub struct MetapeekCommandFactory;

impl MetapeekCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        MetapeekCommandFactory
    }
}

impl Default for MetapeekCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandFactory for MetapeekCommandFactory {
    fn create_command(&self, args: &ArgMatches) -> AnalysisResult<Box<dyn Command>> {
        if args.get_flag("list-tags") {
            Ok(Box::new(ListTagsCommand::new()))
        } else {
            // Default to analyze command
            Ok(Box::new(AnalyzeCommand::new(args)?))
        }
    }
}
