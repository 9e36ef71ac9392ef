//! Run settings loaded from a JSON file.
//!
//! ```json
//! {
//!   "path_to_primary_metadata": "data/metadata.xlsx",
//!   "mapping_classification_id": "EXCEL_TO_OIMS_MAPPING_BASE",
//!   "mapping_id": "GENNOVATE_001",
//!   "oims_metadata_schema_id": "Foresight data metametadata",
//!   "path_to_oims_metadata_schema_file": "schemas/foresight.json",
//!   "path_to_mapping_file": "mappings/gennovate.xlsx",
//!   "path_to_output_oims_metadata_file": "output/metadata.json",
//!   "report_path": "output/report.json"
//! }
//! ```
//!
//! Relative paths are resolved against the directory of the settings file.

use std::path::{Path, PathBuf};

use oims_transform::MapperIds;
use oims_validate::SheetPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A required input file does not exist.
    #[error("{key} does not exist: {path}")]
    MissingPath { key: &'static str, path: PathBuf },

    #[error("unsupported mapping file format: {path} (expected .json, .xlsx, .xlsm, .xlsb, .xls or .ods)")]
    UnsupportedMappingFormat { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// How the mapping document is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingFormat {
    /// Canonical mapping document.
    Json,
    /// Mapping workbook to compile first.
    Workbook,
}

impl MappingFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Workbook),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub path_to_primary_metadata: PathBuf,
    pub mapping_classification_id: String,
    pub mapping_id: String,
    pub oims_metadata_schema_id: String,
    pub path_to_oims_metadata_schema_file: PathBuf,
    pub path_to_mapping_file: PathBuf,
    pub path_to_output_oims_metadata_file: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_path: Option<PathBuf>,
    /// TOML registry replacing the built-in mapper registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_to_mapper_registry: Option<PathBuf>,
    #[serde(default)]
    pub allowed_missing_sheets: Vec<String>,
    #[serde(default)]
    pub sheets_to_skip: Vec<String>,
}

impl Settings {
    /// Read a settings file and resolve its relative paths.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings: Settings =
            serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        if let Some(base) = path.parent() {
            settings.resolve_paths(base);
        }
        tracing::debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Make every relative path absolute against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        resolve(&mut self.path_to_primary_metadata);
        resolve(&mut self.path_to_oims_metadata_schema_file);
        resolve(&mut self.path_to_mapping_file);
        resolve(&mut self.path_to_output_oims_metadata_file);
        if let Some(path) = self.report_path.as_mut() {
            resolve(path);
        }
        if let Some(path) = self.path_to_mapper_registry.as_mut() {
            resolve(path);
        }
    }

    /// Check the input files exist and the mapping format is supported.
    pub fn validate(&self) -> Result<MappingFormat> {
        let mut required = vec![
            ("path_to_primary_metadata", &self.path_to_primary_metadata),
            (
                "path_to_oims_metadata_schema_file",
                &self.path_to_oims_metadata_schema_file,
            ),
            ("path_to_mapping_file", &self.path_to_mapping_file),
        ];
        if let Some(path) = &self.path_to_mapper_registry {
            required.push(("path_to_mapper_registry", path));
        }
        for (key, path) in required {
            if !path.is_file() {
                return Err(SettingsError::MissingPath {
                    key,
                    path: path.clone(),
                });
            }
        }
        MappingFormat::from_path(&self.path_to_mapping_file).ok_or_else(|| {
            SettingsError::UnsupportedMappingFormat {
                path: self.path_to_mapping_file.clone(),
            }
        })
    }

    pub fn mapper_ids(&self) -> MapperIds {
        MapperIds::new(
            &self.mapping_id,
            &self.mapping_classification_id,
            &self.oims_metadata_schema_id,
        )
    }

    pub fn sheet_policy(&self) -> SheetPolicy {
        SheetPolicy::new(
            self.allowed_missing_sheets.iter().cloned(),
            self.sheets_to_skip.iter().cloned(),
        )
    }
}
