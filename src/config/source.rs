//! Populates the resolution table from flags and environment variables.

use std::collections::BTreeMap;
use std::ffi::OsString;

use tracing::{debug, warn};

use super::env::{read_env, Environment};
use super::file::{Descriptor, Schema};
use super::flags::FlagSet;
use super::resolve::ResolvedValue;
use super::{ConfigError, ParseError};

/// The outcome of binding every descriptor in a schema.
#[derive(Debug, Default)]
pub struct Bound {
    pub table: BTreeMap<String, ResolvedValue>,
    /// Per-entry failures, in schema order. Failed entries are absent from
    /// `table`.
    pub errors: Vec<ParseError>,
    /// Command-line arguments left after the flags.
    pub operands: Vec<OsString>,
}

/// Binds every descriptor in `schema` to its flag and environment variable.
///
/// Descriptors are processed independently: a malformed default or an
/// unparseable environment value is recorded in [`Bound::errors`] and only
/// that entry is skipped. Flags are registered for every entry first and
/// `args` (program name first) is parsed once at the end.
///
/// Only a malformed command line fails the whole call.
pub fn bind<E, I, T>(
    schema: &Schema,
    program: &str,
    args: I,
    env: &E,
) -> Result<Bound, ConfigError>
where
    E: Environment + ?Sized,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut flags = FlagSet::new(program);
    let mut pending = Vec::new();
    let mut errors = Vec::new();

    for (name, descriptor) in schema.iter() {
        match bind_entry(name, descriptor, &mut flags, env) {
            Ok(value) => pending.push((name, descriptor, value)),
            Err(e) => {
                warn!(name, error = %e, "skipping config entry");
                errors.push(e);
            }
        }
    }

    let parsed = flags.parse(args)?;

    let mut table = BTreeMap::new();
    for (name, descriptor, mut value) in pending {
        if let Some(flag) = parsed.value(&descriptor.flag_name) {
            value = value.with_flag(flag);
        }
        debug!(name, resolved = ?value.resolve(), uses_env = value.uses_env(), "bound config entry");
        table.insert(name.to_string(), value);
    }

    Ok(Bound {
        table,
        errors,
        operands: parsed.operands(),
    })
}

fn bind_entry<E: Environment + ?Sized>(
    name: &str,
    descriptor: &Descriptor,
    flags: &mut FlagSet,
    env: &E,
) -> Result<ResolvedValue, ParseError> {
    let value_type = descriptor.value_type;
    let fallback = value_type.coerce_default(name, descriptor.default.as_ref())?;

    if !descriptor.flag_name.is_empty() {
        flags.register(name, descriptor, fallback.as_ref())?;
    }

    let mut value = ResolvedValue::new(value_type, fallback);
    if !descriptor.env_name.is_empty() {
        if let Some(env_value) = read_env(env, name, &descriptor.env_name, value_type)? {
            value = value.with_env(env_value);
        }
    }

    Ok(value)
}
