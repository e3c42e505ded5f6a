use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;

use super::value::{Scalar, ValueType};
use super::{EnvValueError, ParseError};

/// A source of environment variables.
///
/// [`ProcessEnv`] reads the real process environment; the map
/// implementations let callers and tests supply a fixed set of variables.
/// Values are raw OS strings so a set but non-Unicode value is not mistaken
/// for an unset one.
pub trait Environment: std::fmt::Debug {
    fn var_os(&self, name: &str) -> Option<OsString>;
}

/// The environment of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var_os(&self, name: &str) -> Option<OsString> {
        std::env::var_os(name)
    }
}

impl Environment for HashMap<String, String> {
    fn var_os(&self, name: &str) -> Option<OsString> {
        self.get(name).map(OsString::from)
    }
}

impl Environment for BTreeMap<String, String> {
    fn var_os(&self, name: &str) -> Option<OsString> {
        self.get(name).map(OsString::from)
    }
}

impl Environment for HashMap<String, OsString> {
    fn var_os(&self, name: &str) -> Option<OsString> {
        self.get(name).cloned()
    }
}

impl<E: Environment + ?Sized> Environment for &E {
    fn var_os(&self, name: &str) -> Option<OsString> {
        (**self).var_os(name)
    }
}

/// Reads `var` and coerces it to `value_type`.
///
/// Unset and empty variables both yield `Ok(None)`: they are "not supplied",
/// not an error. A value that is set but not valid Unicode is an
/// [`ParseError::InvalidEnv`].
pub fn read_env<E: Environment + ?Sized>(
    env: &E,
    name: &str,
    var: &str,
    value_type: ValueType,
) -> Result<Option<Scalar>, ParseError> {
    let raw = match env.var_os(var) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(None),
    };

    let invalid = |source: EnvValueError| ParseError::InvalidEnv {
        name: name.to_string(),
        var: var.to_string(),
        value_type,
        source,
    };

    let raw = raw
        .into_string()
        .map_err(|_| invalid(EnvValueError::NotUnicode))?;

    value_type
        .parse(&raw)
        .map(Some)
        .map_err(|e| invalid(e.into()))
}
