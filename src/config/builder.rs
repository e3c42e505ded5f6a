use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::env::{Environment, ProcessEnv};
use super::file::Schema;
use super::report::Rejection;
use super::resolve::Resolver;
use super::source::bind;
use super::validate::validate;
use crate::Error;

/// Where the schema comes from.
#[derive(Debug)]
enum SchemaSource {
    File(PathBuf),
    Discover(PathBuf),
    Inline(Schema),
}

/// Builder for a configuration run.
///
/// A run loads the schema, binds every descriptor to its flag and
/// environment variable, parses the command line once and checks required
/// values. The result is a [`Resolver`] holding the resolved table.
///
/// Precedence per value is environment, then a non-empty flag, then the
/// schema default.
///
/// ## Example
///
/// ```no_run
/// use schemaconf::{impl_bind, Config};
///
/// #[derive(Default)]
/// struct MyConfig {
///     port: u64,
///     bucket: String,
/// }
///
/// impl_bind!(MyConfig { port, bucket => "s3_bucket" });
///
/// let resolver = Config::builder()
///     .with_schema_file("config.json")
///     .build()?;
///
/// let mut config = MyConfig::default();
/// resolver.load(&mut config)?;
/// # Ok::<(), schemaconf::Error>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct Config {
    schema: Option<SchemaSource>,
    args: Option<Vec<OsString>>,
    env: Option<Box<dyn Environment>>,
    program: Option<String>,
}

impl Config {
    /// Creates a new configuration builder.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Loads the schema from a `.json` or `.toml` file.
    pub fn with_schema_file(mut self, path: impl AsRef<Path>) -> Self {
        self.schema = Some(SchemaSource::File(path.as_ref().to_path_buf()));
        self
    }

    /// Uses an already loaded schema.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(SchemaSource::Inline(schema));
        self
    }

    /// Searches `dir` for a schema file (see [`Schema::discover`]).
    ///
    /// This is the default, with the current working directory, when no
    /// schema source is set.
    pub fn discover_in(mut self, dir: impl AsRef<Path>) -> Self {
        self.schema = Some(SchemaSource::Discover(dir.as_ref().to_path_buf()));
        self
    }

    /// Parses these arguments instead of the process arguments.
    ///
    /// The first item is the program name, as with `std::env::args_os`.
    pub fn with_args<I, T>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Reads environment variables from `env` instead of the process
    /// environment.
    pub fn with_env(mut self, env: impl Environment + 'static) -> Self {
        self.env = Some(Box::new(env));
        self
    }

    /// Overrides the program name shown in command-line usage.
    pub fn with_program_name(mut self, name: impl Into<String>) -> Self {
        self.program = Some(name.into());
        self
    }

    /// Runs the configuration pipeline.
    ///
    /// Per-entry parse errors alone do not fail the run; they are logged and
    /// kept on the [`Resolver`]. The run is rejected when any required value
    /// is missing, in which case [`Error::Rejected`] carries every error.
    pub fn build(self) -> Result<Resolver, Error> {
        let schema = match self.schema {
            Some(SchemaSource::File(path)) => Schema::from_file(path)?,
            Some(SchemaSource::Discover(dir)) => Schema::discover(dir)?,
            Some(SchemaSource::Inline(schema)) => schema,
            None => Schema::discover(std::env::current_dir().map_err(|e| {
                crate::ConfigError::ReadError {
                    path: PathBuf::from("."),
                    source: e,
                }
            })?)?,
        };

        let args = self.args.unwrap_or_else(|| std::env::args_os().collect());
        let program = self
            .program
            .or_else(|| args.first().map(program_name))
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
        let env: Box<dyn Environment> = self.env.unwrap_or_else(|| Box::new(ProcessEnv));

        let bound = bind(&schema, &program, args, env.as_ref())?;
        let violations = validate(&schema, &bound.table);

        if !violations.is_empty() {
            warn!(count = violations.len(), "required configuration values are missing");
            let rejection = Rejection::new(&schema, &bound.table, env.as_ref(), bound.errors, violations);
            return Err(Error::Rejected(Box::new(rejection)));
        }

        debug!(
            entries = bound.table.len(),
            errors = bound.errors.len(),
            "configuration resolved"
        );
        Ok(Resolver::new(schema, bound.table, bound.errors).with_operands(bound.operands))
    }
}

/// The file name of `argv[0]`.
fn program_name(arg: &OsString) -> String {
    Path::new(arg)
        .file_name()
        .unwrap_or(arg.as_os_str())
        .to_string_lossy()
        .into_owned()
}
