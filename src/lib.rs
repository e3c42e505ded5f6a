pub mod config;
mod error;

pub use config::{
    bind_struct, Bind, BindError, Config, ConfigError, Descriptor, Environment, ParseError,
    ResolvedValue, Resolver, Scalar, Schema, ValueType,
};
pub use error::Error;

/// Resolves configuration for this process and writes it into `dest`.
///
/// The schema is discovered in the working directory, flags come from the
/// process arguments and values from the process environment. The returned
/// [`Resolver`] can be handed on to anything that needs other values.
///
/// ```no_run
/// use schemaconf::impl_bind;
///
/// #[derive(Default)]
/// struct MyConfig {
///     port: u64,
///     bucket: String,
/// }
///
/// impl_bind!(MyConfig { port, bucket => "s3_bucket" });
///
/// let mut config = MyConfig::default();
/// let _resolver = schemaconf::load(&mut config)?;
/// # Ok::<(), schemaconf::Error>(())
/// ```
pub fn load<T: Bind + ?Sized>(dest: &mut T) -> Result<Resolver, Error> {
    let resolver = Config::builder().build()?;
    resolver.load(dest)?;
    Ok(resolver)
}
