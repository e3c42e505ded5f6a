//! Configuration resolution from flags, environment variables and schema
//! defaults.

mod bind;
mod builder;
mod env;
mod error;
mod file;
mod flags;
mod report;
mod resolve;
mod source;
mod validate;
mod value;

pub use bind::{bind_struct, Bind, FieldValue, Fields};
pub use builder::Config;
pub use env::{read_env, Environment, ProcessEnv};
pub use error::{
    BindError, ConfigError, EnvValueError, MissingCause, ParseError, ValidationError,
};
pub use file::{Descriptor, Schema, SCHEMA_FILE_NAMES};
pub use flags::{FlagSet, ParsedFlags, RESERVED_FLAGS};
pub use report::{Attempt, Rejection};
pub use resolve::{ResolvedValue, Resolver};
pub use source::{bind, Bound};
pub use validate::validate;
pub use value::{RawDefault, Scalar, ValueType};
