//! Command-line flag registration and parsing.
//!
//! All flags are collected first and the argument vector is parsed exactly
//! once: [`FlagSet::parse`] consumes the set, so nothing can be registered
//! after parsing.
//!
//! A registered flag may be written `--name`, `--name=value`, `-name` or
//! `-name=value`. Flag parsing stops at the first operand or at `--`; that
//! operand and everything after it are kept as [`ParsedFlags::operands`].

use std::collections::HashMap;
use std::ffi::OsString;

use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::debug;

use super::file::Descriptor;
use super::value::{Scalar, ValueType};
use super::ParseError;

/// Flag names owned by the parser itself.
pub const RESERVED_FLAGS: &[&str] = &["help"];

// Contains whitespace, so no registered flag can share the id.
const OPERANDS: &str = "trailing operands";

/// Flags registered so far, not yet parsed.
#[derive(Debug)]
pub struct FlagSet {
    program: String,
    args: Vec<Arg>,
    // flag name -> (owning config name, type)
    owners: HashMap<String, (String, ValueType)>,
}

impl FlagSet {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            owners: HashMap::new(),
        }
    }

    /// Registers `--<flag_name>` for the config entry `name`.
    ///
    /// `default` is the coerced schema default; without one the flag
    /// defaults to its type's zero value.
    pub fn register(
        &mut self,
        name: &str,
        descriptor: &Descriptor,
        default: Option<&Scalar>,
    ) -> Result<(), ParseError> {
        let flag = descriptor.flag_name.as_str();

        if !is_valid_flag_name(flag) {
            return Err(ParseError::InvalidFlagName {
                name: name.to_string(),
                flag: flag.to_string(),
            });
        }
        if RESERVED_FLAGS.contains(&flag) {
            return Err(ParseError::ReservedFlag {
                name: name.to_string(),
                flag: flag.to_string(),
            });
        }
        if let Some((owner, _)) = self.owners.get(flag) {
            return Err(ParseError::DuplicateFlag {
                name: name.to_string(),
                flag: flag.to_string(),
                owner: owner.clone(),
            });
        }

        let value_type = descriptor.value_type;
        let default = default.cloned().unwrap_or_else(|| value_type.zero());

        let mut arg = Arg::new(flag.to_string())
            .long(flag.to_string())
            .help(descriptor.description.clone())
            .action(ArgAction::Set);
        arg = match value_type {
            ValueType::Uint => arg.value_name("UINT").value_parser(clap::value_parser!(u64)),
            ValueType::String => arg.value_name("STRING").value_parser(clap::value_parser!(String)),
        };
        if !matches!(&default, Scalar::Str(s) if s.is_empty()) {
            arg = arg.default_value(default.to_string());
        }

        debug!(flag, name, %value_type, %default, "registered flag");
        self.args.push(arg);
        self.owners
            .insert(flag.to_string(), (name.to_string(), value_type));
        Ok(())
    }

    pub fn is_registered(&self, flag: &str) -> bool {
        self.owners.contains_key(flag)
    }

    /// Builds the command carrying every registered flag.
    pub fn command(&self) -> Command {
        Command::new(self.program.clone())
            .disable_version_flag(true)
            .args(self.args.iter().cloned())
            .arg(
                Arg::new(OPERANDS)
                    .value_name("ARGS")
                    .num_args(0..)
                    .trailing_var_arg(true)
                    .value_parser(clap::value_parser!(OsString))
                    .action(ArgAction::Append),
            )
    }

    /// Parses `args` (program name first) against the registered flags.
    pub fn parse<I, T>(self, args: I) -> Result<ParsedFlags, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = self.normalize(args.into_iter().map(Into::into).collect());
        let matches = self.command().try_get_matches_from(args)?;
        let types = self
            .owners
            .into_iter()
            .map(|(flag, (_, value_type))| (flag, value_type))
            .collect();
        Ok(ParsedFlags { matches, types })
    }

    /// Rewrites single-dash spellings of registered flags to the long form.
    ///
    /// Only arguments before the first operand (or `--`) are considered, and
    /// the value following a bare `-name` is never rewritten.
    fn normalize(&self, args: Vec<OsString>) -> Vec<OsString> {
        let mut out = Vec::with_capacity(args.len());
        let mut args = args.into_iter();
        out.extend(args.next());

        let mut takes_value = false;
        let mut operands = false;
        for arg in args {
            if operands || takes_value {
                takes_value = false;
                out.push(arg);
                continue;
            }

            let Some(text) = arg.to_str() else {
                operands = true;
                out.push(arg);
                continue;
            };

            if text == "--" {
                operands = true;
            } else if let Some(long) = text.strip_prefix("--") {
                takes_value = !long.contains('=') && self.is_registered(long);
            } else if let Some(short) = text.strip_prefix('-').filter(|s| !s.is_empty()) {
                let (flag, inline) = match short.split_once('=') {
                    Some((flag, _)) => (flag, true),
                    None => (short, false),
                };
                if self.is_registered(flag) {
                    takes_value = !inline;
                    out.push(OsString::from(format!("--{short}")));
                    continue;
                }
            } else {
                operands = true;
            }
            out.push(arg);
        }
        out
    }
}

fn is_valid_flag_name(flag: &str) -> bool {
    !flag.is_empty()
        && !flag.starts_with('-')
        && !flag.contains('=')
        && !flag.chars().any(char::is_whitespace)
}

/// The outcome of the single parse of the argument vector.
#[derive(Debug)]
pub struct ParsedFlags {
    matches: ArgMatches,
    types: HashMap<String, ValueType>,
}

impl ParsedFlags {
    /// The parsed value of `flag`, or its default when it was not passed.
    ///
    /// Returns `None` only for flags that were never registered.
    pub fn value(&self, flag: &str) -> Option<Scalar> {
        let value_type = *self.types.get(flag)?;
        let parsed = match value_type {
            ValueType::Uint => self.matches.get_one::<u64>(flag).copied().map(Scalar::Uint),
            ValueType::String => self.matches.get_one::<String>(flag).cloned().map(Scalar::Str),
        };
        Some(parsed.unwrap_or_else(|| value_type.zero()))
    }

    /// Arguments left after flag parsing stopped, in order.
    pub fn operands(&self) -> Vec<OsString> {
        self.matches
            .get_many::<OsString>(OPERANDS)
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    }
}
