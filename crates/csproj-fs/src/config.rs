//! Format-agnostic configuration loading

use serde::de::DeserializeOwned;

use crate::{Error, NormalizedPath, Result, io};

/// Structured record formats understood by [`ConfigStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Detect the format from a file extension (without the dot).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
        }
    }
}

/// Format-agnostic configuration store.
///
/// Detects format from file extension, or takes it explicitly for files whose
/// extension says nothing about their syntax (assembly definitions are JSON).
#[derive(Debug, Default)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a file.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let extension = path.extension().unwrap_or("");
        let format = ConfigFormat::from_extension(extension).ok_or_else(|| {
            Error::UnsupportedFormat {
                extension: extension.to_string(),
            }
        })?;
        self.load_as(path, format)
    }

    /// Load configuration from a file using an explicit format.
    pub fn load_as<T: DeserializeOwned>(
        &self,
        path: &NormalizedPath,
        format: ConfigFormat,
    ) -> Result<T> {
        let content = io::read_text(path)?;
        self.parse_as(path, &content, format)
    }

    /// Parse already-read content, attributing errors to `path`.
    pub fn parse_as<T: DeserializeOwned>(
        &self,
        path: &NormalizedPath,
        content: &str,
        format: ConfigFormat,
    ) -> Result<T> {
        let parse_error = |message: String| Error::ConfigParse {
            path: path.to_native(),
            format: format.label().into(),
            message,
        };
        // Editors on Windows like to prepend a byte order mark
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        match format {
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
            ConfigFormat::Json => {
                serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))
            }
        }
    }
}
