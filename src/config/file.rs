//! Schema file loading.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use super::value::{RawDefault, ValueType};
use super::ConfigError;

/// File names searched by [`Schema::discover`], in order.
pub const SCHEMA_FILE_NAMES: &[&str] = &["config.json", "config.toml"];

/// How one logical config name maps onto a flag, an environment variable,
/// a default and a type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Descriptor {
    pub description: String,
    pub default: Option<RawDefault>,
    pub env_name: String,
    pub flag_name: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(rename = "require")]
    pub required: bool,
}

/// A map from logical config name to its [`Descriptor`].
///
/// Entries are kept sorted by name so that binding, validation and
/// reporting happen in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    entries: BTreeMap<String, Descriptor>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a descriptor.
    pub fn insert(&mut self, name: impl Into<String>, descriptor: Descriptor) {
        self.entries.insert(name.into(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&Descriptor> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Descriptor)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Loads a schema file, choosing the format from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = Format::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            Err(e) => {
                return Err(ConfigError::ReadError {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        let schema = match format {
            Format::Json => Self::from_json_str(&contents).map_err(|e| ConfigError::JsonError {
                path: path.to_path_buf(),
                source: e,
            })?,
            Format::Toml => Self::from_toml_str(&contents).map_err(|e| ConfigError::TomlError {
                path: path.to_path_buf(),
                source: e,
            })?,
        };

        info!(path = %path.display(), entries = schema.len(), "loaded config schema");
        Ok(schema)
    }

    /// Loads the first of [`SCHEMA_FILE_NAMES`] present in `dir`.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        match find_schema_file(dir) {
            Some(path) => Self::from_file(path),
            None => Err(ConfigError::NoSchemaFile(dir.to_path_buf())),
        }
    }
}

impl FromIterator<(String, Descriptor)> for Schema {
    fn from_iter<I: IntoIterator<Item = (String, Descriptor)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Format::Json),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }
}

fn find_schema_file(dir: &Path) -> Option<PathBuf> {
    SCHEMA_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}
