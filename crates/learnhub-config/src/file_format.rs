use std::path::Path;

use serde::{Deserialize, Serialize};

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    #[default]
    Json,
    Yaml,
    Yml,
}

impl FileFormat {
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Yaml => "yaml",
            FileFormat::Yml => "yml",
        }
    }

    /// Format implied by a file extension, if any.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Some(FileFormat::Json),
            Some("yaml") => Some(FileFormat::Yaml),
            Some("yml") => Some(FileFormat::Yml),
            _ => None,
        }
    }

    pub fn is_yaml(self) -> bool {
        matches!(self, FileFormat::Yaml | FileFormat::Yml)
    }
}
