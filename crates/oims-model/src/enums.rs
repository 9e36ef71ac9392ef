//! Controlled vocabularies used by mapping documents.
//!
//! Mapping documents store these values as authored strings so that the
//! consistency validator can report the offending text. The enums here are
//! the typed view parsed on demand.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Section of the OIMS document a sheet mapping contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OimsSection {
    /// Header block (file descriptors, mapping tools).
    Header,
    /// Content block (entity objects).
    Content,
}

impl OimsSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            OimsSection::Header => "header",
            OimsSection::Content => "content",
        }
    }
}

impl fmt::Display for OimsSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OimsSection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "header" => Ok(OimsSection::Header),
            "content" => Ok(OimsSection::Content),
            _ => Err(format!("Unknown OIMS section: {s}")),
        }
    }
}

/// How attributes are laid out in a sheet.
///
/// With `Rows` every attribute occupies a row and its values run to the
/// right; with `Columns` every attribute occupies a column and its values
/// run downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableOrientation {
    Rows,
    Columns,
}

impl TableOrientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableOrientation::Rows => "rows",
            TableOrientation::Columns => "columns",
        }
    }
}

impl fmt::Display for TableOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TableOrientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rows" => Ok(TableOrientation::Rows),
            "columns" => Ok(TableOrientation::Columns),
            _ => Err(format!("Unknown table orientation: {s}")),
        }
    }
}

/// Header subsections a header-shaped sheet mapping may target.
pub const HEADER_SUBSECTIONS: &[&str] = &["file_descriptors", "mapping_tools"];

/// Entity class vocabulary for content-shaped sheet mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityClass {
    Collection,
    Dataset,
    DataFile,
    SupportDocumentation,
    DataContainer,
    Container,
    Variable,
    DataVariable,
}

impl EntityClass {
    /// Every member of the vocabulary, in declaration order.
    pub const ALL: [EntityClass; 8] = [
        EntityClass::Collection,
        EntityClass::Dataset,
        EntityClass::DataFile,
        EntityClass::SupportDocumentation,
        EntityClass::DataContainer,
        EntityClass::Container,
        EntityClass::Variable,
        EntityClass::DataVariable,
    ];

    /// Returns the canonical token as written in mapping documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityClass::Collection => "collection",
            EntityClass::Dataset => "dataset",
            EntityClass::DataFile => "data_file",
            EntityClass::SupportDocumentation => "support_documentation",
            EntityClass::DataContainer => "data_container",
            EntityClass::Container => "container",
            EntityClass::Variable => "variable",
            EntityClass::DataVariable => "data_variable",
        }
    }
}

impl fmt::Display for EntityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityClass {
    type Err = String;

    /// Exact, case-sensitive match against the vocabulary.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityClass::ALL
            .iter()
            .find(|class| class.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown entity class: {s}"))
    }
}
