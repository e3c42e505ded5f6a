use crate::config::{BindError, ConfigError, Rejection};
use thiserror::Error;

/// Top-level error type for the schemaconf library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Rejected(Box<Rejection>),

    #[error("failed to load configuration: {0}")]
    Bind(#[from] BindError),
}
