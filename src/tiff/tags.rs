//! Exif tag registry
//!
//! The set of string tags the decoder reports lives in `exif_tags.toml`,
//! embedded at build time and parsed once into an ordered, immutable map.

use std::collections::BTreeMap;
use std::fmt;
use lazy_static::lazy_static;
use log::error;

use crate::metadata::errors::{AnalysisError, AnalysisResult};

lazy_static! {
    // Parse the embedded TOML file on first use
    static ref EXIF_TAGS: TagRegistry = {
        let content = include_str!("../../exif_tags.toml");
        TagRegistry::from_str(content).unwrap_or_else(|e| {
            error!("Failed to parse Exif tag definitions: {}", e);
            TagRegistry::default()
        })
    };
}

/// Directory a tag normally lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagGroup {
    /// 0th IFD (TIFF baseline tags)
    Tiff,
    /// Exif sub-IFD
    Exif,
}

impl fmt::Display for TagGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagGroup::Tiff => write!(f, "TIFF"),
            TagGroup::Exif => write!(f, "Exif"),
        }
    }
}

/// A known tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDescriptor {
    /// Tag identifier
    pub id: u16,
    /// Printed name
    pub name: String,
    /// Directory the tag belongs to
    pub group: TagGroup,
}

/// Ordered mapping from tag id to descriptor
#[derive(Debug, Default)]
pub struct TagRegistry {
    tags: BTreeMap<u16, TagDescriptor>,
}

impl TagRegistry {
    /// The registry built from the embedded tag table
    pub fn builtin() -> &'static TagRegistry {
        &EXIF_TAGS
    }

    /// Parse a registry from a TOML string
    ///
    /// Expects `[tiff]` and `[exif]` tables mapping hex ids (`"0x010F"`) to
    /// names. An id listed twice is an error.
    pub fn from_str(content: &str) -> AnalysisResult<Self> {
        let toml_value: toml::Value = match content.parse() {
            Ok(value) => value,
            Err(e) => return Err(AnalysisError::InvalidConfig(format!("Failed to parse TOML: {}", e))),
        };

        let mut registry = TagRegistry::default();
        registry.parse_group(&toml_value, "tiff", TagGroup::Tiff)?;
        registry.parse_group(&toml_value, "exif", TagGroup::Exif)?;

        Ok(registry)
    }

    fn parse_group(&mut self, toml_value: &toml::Value, table_name: &str, group: TagGroup) -> AnalysisResult<()> {
        let table = match toml_value.get(table_name).and_then(|v| v.as_table()) {
            Some(table) => table,
            None => return Ok(()),
        };

        for (k, v) in table {
            let id = parse_tag_id(k)?;
            let name = v.as_str().ok_or_else(|| {
                AnalysisError::InvalidConfig(format!("Tag {} has no name", k))
            })?;

            let descriptor = TagDescriptor { id, name: name.to_string(), group };
            if self.tags.insert(id, descriptor).is_some() {
                return Err(AnalysisError::InvalidConfig(format!("Tag {:#06x} defined twice", id)));
            }
        }

        Ok(())
    }

    /// Looks up a tag by exact id
    pub fn lookup(&self, id: u16) -> Option<&TagDescriptor> {
        self.tags.get(&id)
    }

    /// Printed name of a tag, if known
    pub fn name(&self, id: u16) -> Option<&str> {
        self.lookup(id).map(|d| d.name.as_str())
    }

    /// Number of known tags
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Descriptors in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &TagDescriptor> {
        self.tags.values()
    }
}

fn parse_tag_id(key: &str) -> AnalysisResult<u16> {
    let digits = key
        .strip_prefix("0x")
        .or_else(|| key.strip_prefix("0X"))
        .unwrap_or(key);

    u16::from_str_radix(digits, 16)
        .map_err(|_| AnalysisError::InvalidConfig(format!("Invalid tag id: {}", key)))
}
