//! Source precedence for a single config value.
//!
//! An environment value always wins when it was supplied. Otherwise a flag
//! value wins unless it equals its type's zero value, in which case the
//! schema default is used. A flag explicitly set to `""` or `0` therefore
//! looks exactly like a flag that was never passed.

use std::collections::BTreeMap;
use std::ffi::OsString;

use super::bind::{bind_struct, Bind};
use super::file::Schema;
use super::value::{Scalar, ValueType};
use super::{BindError, ParseError};

/// The per-source values captured for one logical config name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedValue {
    flag: Option<Scalar>,
    env: Option<Scalar>,
    fallback: Option<Scalar>,
    value_type: ValueType,
}

impl ResolvedValue {
    pub fn new(value_type: ValueType, fallback: Option<Scalar>) -> Self {
        Self {
            flag: None,
            env: None,
            fallback,
            value_type,
        }
    }

    #[must_use]
    pub fn with_flag(mut self, value: Scalar) -> Self {
        self.flag = Some(value);
        self
    }

    #[must_use]
    pub fn with_env(mut self, value: Scalar) -> Self {
        self.env = Some(value);
        self
    }

    /// Picks the value according to source precedence.
    ///
    /// Returns `None` only when neither source applies and the schema had
    /// no default.
    pub fn resolve(&self) -> Option<&Scalar> {
        if let Some(env) = &self.env {
            return Some(env);
        }
        match &self.flag {
            Some(flag) if !flag.is_zero() => Some(flag),
            _ => self.fallback.as_ref(),
        }
    }

    /// Whether the environment supplied this value.
    pub fn uses_env(&self) -> bool {
        self.env.is_some()
    }

    pub fn flag(&self) -> Option<&Scalar> {
        self.flag.as_ref()
    }

    pub fn env(&self) -> Option<&Scalar> {
        self.env.as_ref()
    }

    pub fn fallback(&self) -> Option<&Scalar> {
        self.fallback.as_ref()
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }
}

/// The resolution table produced by one configuration run.
///
/// A `Resolver` is built once, by [`Config::build`](crate::Config::build),
/// and handed to whatever needs configuration. It is immutable; a fresh run
/// yields a fresh `Resolver`.
#[derive(Debug, Clone)]
pub struct Resolver {
    schema: Schema,
    table: BTreeMap<String, ResolvedValue>,
    errors: Vec<ParseError>,
    operands: Vec<OsString>,
}

impl Resolver {
    pub fn new(
        schema: Schema,
        table: BTreeMap<String, ResolvedValue>,
        errors: Vec<ParseError>,
    ) -> Self {
        Self {
            schema,
            table,
            errors,
            operands: Vec::new(),
        }
    }

    /// Attaches the command-line operands left after flag parsing.
    #[must_use]
    pub fn with_operands(mut self, operands: Vec<OsString>) -> Self {
        self.operands = operands;
        self
    }

    /// The resolved value for a logical config name.
    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.table.get(name).and_then(ResolvedValue::resolve)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Scalar::as_str)
    }

    pub fn get_u64(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(Scalar::as_u64)
    }

    pub fn entry(&self, name: &str) -> Option<&ResolvedValue> {
        self.table.get(name)
    }

    pub fn entries(&self) -> &BTreeMap<String, ResolvedValue> {
        &self.table
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Per-entry errors recorded while binding sources.
    pub fn entry_errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Positional arguments that followed the flags, in order.
    pub fn operands(&self) -> &[OsString] {
        &self.operands
    }

    /// Writes resolved values into the fields of `dest`.
    ///
    /// See [`bind_struct`] for how fields are matched.
    pub fn load<T: Bind + ?Sized>(&self, dest: &mut T) -> Result<(), BindError> {
        bind_struct(dest, &self.table)
    }
}
