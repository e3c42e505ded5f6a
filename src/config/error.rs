use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use super::ValueType;

/// Errors that stop a configuration run before any value is resolved.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("schema file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read schema file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse JSON schema file '{path}': {source}")]
    JsonError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to parse TOML schema file '{path}': {source}")]
    TomlError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("unsupported schema format (expected .json or .toml): {0}")]
    UnsupportedFormat(PathBuf),

    #[error("no schema file found in {0}")]
    NoSchemaFile(PathBuf),

    #[error(transparent)]
    Cli(#[from] clap::Error),
}

/// A per-entry failure recorded by the source binder.
///
/// The entry is left out of the resolution table; other entries are
/// unaffected.
#[derive(Debug, Clone, Error, PartialEq)]
#[non_exhaustive]
pub enum ParseError {
    #[error("default for `{name}` is not a valid {value_type}: {reason}")]
    InvalidDefault {
        name: String,
        value_type: ValueType,
        reason: String,
    },

    #[error("environment variable {var} for `{name}` could not be parsed as {value_type}: {source}")]
    InvalidEnv {
        name: String,
        var: String,
        value_type: ValueType,
        source: EnvValueError,
    },

    #[error("flag --{flag} for `{name}` is already registered by `{owner}`")]
    DuplicateFlag {
        name: String,
        flag: String,
        owner: String,
    },

    #[error("flag --{flag} for `{name}` is reserved")]
    ReservedFlag { name: String, flag: String },

    #[error("flag name {flag:?} for `{name}` is not a valid long flag")]
    InvalidFlagName { name: String, flag: String },
}

impl ParseError {
    /// The logical config name the error belongs to.
    pub fn name(&self) -> &str {
        match self {
            ParseError::InvalidDefault { name, .. }
            | ParseError::InvalidEnv { name, .. }
            | ParseError::DuplicateFlag { name, .. }
            | ParseError::ReservedFlag { name, .. }
            | ParseError::InvalidFlagName { name, .. } => name,
        }
    }
}

/// Why an environment value could not be used.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum EnvValueError {
    #[error(transparent)]
    Int(#[from] std::num::ParseIntError),

    #[error("value is not valid unicode")]
    NotUnicode,
}

/// Why a required value counts as missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingCause {
    /// The entry never made it into the resolution table.
    Unresolved,
    /// The entry resolved to nothing or to its type's zero value.
    Empty,
}

/// An `ArgumentMissing` violation for one required descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub name: String,
    pub flag_name: String,
    pub env_name: String,
    pub cause: MissingCause,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.cause {
            MissingCause::Unresolved => "could not be resolved",
            MissingCause::Empty => "was not specified",
        };
        write!(
            f,
            "argument `{}` (flag: {:?}, env: {:?}) {}",
            self.name, self.flag_name, self.env_name, what
        )
    }
}

impl std::error::Error for ValidationError {}

/// Failures writing resolved values into a destination.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum BindError {
    #[error("invalid configuration target: {0}")]
    InvalidTarget(String),

    #[error("field `{field}` expects {expected} but resolved to {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("field `{field}` cannot hold {value}: out of range for {target}")]
    OutOfRange {
        field: String,
        value: u64,
        target: &'static str,
    },
}
