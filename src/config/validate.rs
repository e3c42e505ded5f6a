use std::collections::BTreeMap;

use super::file::Schema;
use super::resolve::ResolvedValue;
use super::{MissingCause, ValidationError};

/// Checks every required descriptor against the resolution table.
///
/// Returns all violations, in schema order. A required entry that resolves
/// to `""` or `0` counts as missing, the same as one that never resolved.
pub fn validate(schema: &Schema, table: &BTreeMap<String, ResolvedValue>) -> Vec<ValidationError> {
    schema
        .iter()
        .filter(|(_, descriptor)| descriptor.required)
        .filter_map(|(name, descriptor)| {
            let cause = match table.get(name) {
                None => MissingCause::Unresolved,
                Some(value) => match value.resolve() {
                    Some(scalar) if !scalar.is_zero() => return None,
                    _ => MissingCause::Empty,
                },
            };
            Some(ValidationError {
                name: name.to_string(),
                flag_name: descriptor.flag_name.clone(),
                env_name: descriptor.env_name.clone(),
                cause,
            })
        })
        .collect()
}
