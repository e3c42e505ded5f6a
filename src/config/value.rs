//! Scalar values and the closed set of declared types.

use std::fmt;

use serde::Deserialize;

use super::ParseError;

/// The declared type of a descriptor.
///
/// Every fixed-width unsigned variant (`uint8` .. `uint64`) collapses to
/// [`ValueType::Uint`]. Anything else, including an absent `type`, is
/// handled as a string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ValueType {
    #[default]
    String,
    Uint,
}

impl ValueType {
    /// Maps a schema type name onto the closed type set.
    pub fn from_name(name: &str) -> Self {
        match name {
            "uint" | "uint8" | "uint16" | "uint32" | "uint64" => ValueType::Uint,
            // Unrecognized names are strings.
            _ => ValueType::String,
        }
    }

    /// The zero value for this type (`""` or `0`).
    pub fn zero(self) -> Scalar {
        match self {
            ValueType::String => Scalar::Str(String::new()),
            ValueType::Uint => Scalar::Uint(0),
        }
    }

    /// Coerces raw text (a flag or environment value) into this type.
    pub fn parse(self, raw: &str) -> Result<Scalar, std::num::ParseIntError> {
        match self {
            ValueType::String => Ok(Scalar::Str(raw.to_string())),
            ValueType::Uint => raw.parse::<u64>().map(Scalar::Uint),
        }
    }

    /// Coerces a schema default into this type.
    ///
    /// An absent default yields `Ok(None)`. A uint default must be a finite,
    /// non-negative whole number; JSON decodes every number as a float, so
    /// `8080.0` is accepted while `80.5` is not.
    pub fn coerce_default(
        self,
        name: &str,
        raw: Option<&RawDefault>,
    ) -> Result<Option<Scalar>, ParseError> {
        let Some(raw) = raw else {
            return Ok(None);
        };

        let invalid = |reason: &str| ParseError::InvalidDefault {
            name: name.to_string(),
            value_type: self,
            reason: reason.to_string(),
        };

        match (self, raw) {
            (ValueType::Uint, RawDefault::Number(n)) => {
                if !n.is_finite() || *n < 0.0 || n.fract() != 0.0 || *n >= u64::MAX as f64 {
                    return Err(invalid(&format!("{n} is not a non-negative whole number")));
                }
                Ok(Some(Scalar::Uint(*n as u64)))
            }
            (ValueType::Uint, RawDefault::Text(s)) => {
                Err(invalid(&format!("expected a number, found string {s:?}")))
            }
            (ValueType::Uint, RawDefault::Bool(b)) => {
                Err(invalid(&format!("expected a number, found boolean {b}")))
            }
            (ValueType::String, RawDefault::Text(s)) => Ok(Some(Scalar::Str(s.clone()))),
            (ValueType::String, RawDefault::Number(n)) => Ok(Some(Scalar::Str(format_number(*n)))),
            (ValueType::String, RawDefault::Bool(b)) => Ok(Some(Scalar::Str(b.to_string()))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Uint => "uint",
        }
    }
}

impl From<String> for ValueType {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A default value as written in the schema, before coercion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawDefault {
    Number(f64),
    Bool(bool),
    Text(String),
}

/// A single resolved configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Str(String),
    Uint(u64),
}

impl Scalar {
    /// Returns `true` for `""` and `0`.
    pub fn is_zero(&self) -> bool {
        match self {
            Scalar::Str(s) => s.is_empty(),
            Scalar::Uint(n) => *n == 0,
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Scalar::Str(_) => ValueType::String,
            Scalar::Uint(_) => ValueType::Uint,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            Scalar::Uint(_) => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Scalar::Uint(n) => Some(*n),
            Scalar::Str(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => f.write_str(s),
            Scalar::Uint(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<u64> for Scalar {
    fn from(n: u64) -> Self {
        Scalar::Uint(n)
    }
}

/// Renders a float without a trailing `.0` when it holds a whole number.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
