//! The report shown when a configuration run is rejected.

use std::fmt;

use super::env::Environment;
use super::file::Schema;
use super::resolve::ResolvedValue;
use super::{ParseError, ValidationError};

/// What was attempted for one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub name: String,
    pub description: String,
    pub flag_name: String,
    /// The parsed flag value, empty when the entry never made it into the
    /// table.
    pub flag_value: String,
    pub env_name: String,
    /// The raw environment value, empty when unset.
    pub env_value: String,
}

/// Every reason a configuration run was rejected, plus what was attempted.
///
/// The `Display` impl renders the full report; printing it and exiting is
/// left to the caller.
#[derive(Debug, Clone)]
pub struct Rejection {
    pub errors: Vec<ParseError>,
    pub violations: Vec<ValidationError>,
    pub attempts: Vec<Attempt>,
}

impl Rejection {
    pub(crate) fn new<E: Environment + ?Sized>(
        schema: &Schema,
        table: &std::collections::BTreeMap<String, ResolvedValue>,
        env: &E,
        errors: Vec<ParseError>,
        violations: Vec<ValidationError>,
    ) -> Self {
        let attempts = schema
            .iter()
            .map(|(name, descriptor)| Attempt {
                name: name.to_string(),
                description: descriptor.description.clone(),
                flag_name: descriptor.flag_name.clone(),
                flag_value: table
                    .get(name)
                    .and_then(ResolvedValue::flag)
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                env_name: descriptor.env_name.clone(),
                env_value: if descriptor.env_name.is_empty() {
                    String::new()
                } else {
                    env.var_os(&descriptor.env_name)
                        .map(|raw| raw.to_string_lossy().into_owned())
                        .unwrap_or_default()
                },
            })
            .collect();

        Self {
            errors,
            violations,
            attempts,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "cannot start application:")?;
        for error in &self.errors {
            writeln!(f, "  {error}")?;
        }
        for violation in &self.violations {
            writeln!(f, "  {violation}")?;
        }

        writeln!(f)?;
        writeln!(f, "attempted to use the following values:")?;
        for attempt in &self.attempts {
            writeln!(f, "-")?;
            writeln!(f, "  flag:\t{}: {:?}", attempt.flag_name, attempt.flag_value)?;
            writeln!(f, "  env:\t{}: {:?}", attempt.env_name, attempt.env_value)?;
        }

        writeln!(f)?;
        writeln!(f, "usage:")?;
        for attempt in &self.attempts {
            writeln!(f, "  {}:\t\t{}", attempt.name, attempt.description)?;
        }
        Ok(())
    }
}
