//! Tag listing command

use std::io::Write;

use crate::commands::command_traits::Command;
use crate::metadata::errors::AnalysisResult;
use crate::tiff::tags::TagRegistry;

/// Command for printing the Exif tags the analyzer reports
pub struct ListTagsCommand {
    registry: &'static TagRegistry,
}

impl ListTagsCommand {
    /// Create a command listing the built-in registry
    pub fn new() -> Self {
        ListTagsCommand {
            registry: TagRegistry::builtin(),
        }
    }
}

impl Default for ListTagsCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for ListTagsCommand {
    fn execute(&self, out: &mut dyn Write) -> AnalysisResult<()> {
        for tag in self.registry.iter() {
            writeln!(out, "0x{:04X} {}", tag.id, tag.name)?;
        }
        out.flush()?;
        Ok(())
    }
}
