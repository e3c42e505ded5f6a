//! Writes resolved values into the fields of a destination struct.
//!
//! A destination lists its bindable fields through [`Bind`], usually by way
//! of the [`impl_bind!`](crate::impl_bind) macro. Each listed field carries
//! the logical config name it is bound to; fields that are not listed are
//! never read or written.

use std::collections::{BTreeMap, HashSet};

use super::resolve::ResolvedValue;
use super::value::Scalar;
use super::BindError;

/// A struct whose fields can receive resolved configuration values.
///
/// Implementations call [`Fields::field`] once per bindable field. Most
/// structs should use [`impl_bind!`](crate::impl_bind) rather than writing
/// this by hand.
pub trait Bind {
    fn bind_fields(&mut self, fields: &mut Fields<'_>) -> Result<(), BindError>;
}

/// A field type that can be built from a resolved [`Scalar`].
pub trait FieldValue: Sized {
    fn from_scalar(field: &str, value: &Scalar) -> Result<Self, BindError>;
}

fn found(value: &Scalar) -> &'static str {
    match value {
        Scalar::Str(_) => "a string",
        Scalar::Uint(_) => "an unsigned integer",
    }
}

impl FieldValue for String {
    fn from_scalar(field: &str, value: &Scalar) -> Result<Self, BindError> {
        match value {
            Scalar::Str(s) => Ok(s.clone()),
            other => Err(BindError::TypeMismatch {
                field: field.to_string(),
                expected: "a string",
                found: found(other),
            }),
        }
    }
}

macro_rules! uint_field {
    ($($ty:ty),*) => {$(
        impl FieldValue for $ty {
            fn from_scalar(field: &str, value: &Scalar) -> Result<Self, BindError> {
                match value {
                    Scalar::Uint(n) => <$ty>::try_from(*n).map_err(|_| BindError::OutOfRange {
                        field: field.to_string(),
                        value: *n,
                        target: stringify!($ty),
                    }),
                    other => Err(BindError::TypeMismatch {
                        field: field.to_string(),
                        expected: "an unsigned integer",
                        found: found(other),
                    }),
                }
            }
        }
    )*};
}

uint_field!(u8, u16, u32, u64, usize);

impl<V: FieldValue> FieldValue for Option<V> {
    fn from_scalar(field: &str, value: &Scalar) -> Result<Self, BindError> {
        V::from_scalar(field, value).map(Some)
    }
}

/// The resolution table as seen by a [`Bind`] implementation.
///
/// A destination is visited twice: once to convert every value without
/// writing anything, and once more to assign. A failure in the first pass
/// leaves the destination untouched.
#[derive(Debug)]
pub struct Fields<'a> {
    table: &'a BTreeMap<String, ResolvedValue>,
    assign: bool,
    seen: HashSet<String>,
}

impl<'a> Fields<'a> {
    fn new(table: &'a BTreeMap<String, ResolvedValue>, assign: bool) -> Self {
        Self {
            table,
            assign,
            seen: HashSet::new(),
        }
    }

    /// Binds `slot` to the logical config name `name`.
    ///
    /// A name with no resolved value leaves `slot` as it is. Binding the same
    /// name to two fields is a [`BindError::InvalidTarget`].
    pub fn field<V: FieldValue>(&mut self, name: &str, slot: &mut V) -> Result<(), BindError> {
        if !self.seen.insert(name.to_string()) {
            return Err(BindError::InvalidTarget(format!(
                "config name `{name}` is bound to more than one field"
            )));
        }

        let Some(resolved) = self.table.get(name).and_then(ResolvedValue::resolve) else {
            return Ok(());
        };
        let value = V::from_scalar(name, resolved)?;
        if self.assign {
            *slot = value;
        }
        Ok(())
    }
}

/// Assigns every bound field of `dest` whose name has a resolved value.
///
/// Fields without a matching entry, or whose entry resolves to nothing, keep
/// their current value. Nothing is written unless every field converts, so
/// on error `dest` is left untouched. Values wider than the field fail with
/// [`BindError::OutOfRange`] and are never truncated.
///
/// ## Example
///
/// ```
/// use std::collections::BTreeMap;
/// use schemaconf::{bind_struct, impl_bind, ResolvedValue, Scalar, ValueType};
///
/// #[derive(Default)]
/// struct AppConfig {
///     port: u16,
///     bucket: String,
///     started: bool,
/// }
///
/// impl_bind!(AppConfig { port, bucket => "s3_bucket" });
///
/// let mut table = BTreeMap::new();
/// table.insert(
///     "s3_bucket".to_string(),
///     ResolvedValue::new(ValueType::String, Some(Scalar::from("my-bucket"))),
/// );
///
/// let mut config = AppConfig { port: 80, started: true, ..Default::default() };
/// bind_struct(&mut config, &table)?;
/// assert_eq!(config.bucket, "my-bucket");
/// assert_eq!(config.port, 80);
/// assert!(config.started);
/// # Ok::<(), schemaconf::BindError>(())
/// ```
///
/// Only types implementing [`Bind`] are accepted, so maps and other
/// non-struct values cannot be used as a destination:
///
/// ```compile_fail
/// use std::collections::{BTreeMap, HashMap};
/// use schemaconf::bind_struct;
///
/// let mut map: HashMap<String, String> = HashMap::new();
/// bind_struct(&mut map, &BTreeMap::new()).unwrap();
/// ```
pub fn bind_struct<T>(dest: &mut T, table: &BTreeMap<String, ResolvedValue>) -> Result<(), BindError>
where
    T: Bind + ?Sized,
{
    dest.bind_fields(&mut Fields::new(table, false))?;
    dest.bind_fields(&mut Fields::new(table, true))
}

/// Implements [`Bind`](crate::config::Bind) for a struct.
///
/// Each listed field is bound to the config name matching its identifier,
/// or to the name given after `=>`. Fields that are not listed keep their
/// value.
///
/// ```
/// use schemaconf::impl_bind;
///
/// #[derive(Default)]
/// struct AppConfig {
///     port: u16,
///     bucket: Option<String>,
/// }
///
/// impl_bind!(AppConfig { port, bucket => "s3_bucket" });
/// ```
#[macro_export]
macro_rules! impl_bind {
    (@name $field:ident) => {
        stringify!($field)
    };
    (@name $field:ident $name:literal) => {
        $name
    };
    ($ty:ty { $($field:ident $(=> $name:literal)?),* $(,)? }) => {
        impl $crate::config::Bind for $ty {
            fn bind_fields(
                &mut self,
                fields: &mut $crate::config::Fields<'_>,
            ) -> ::std::result::Result<(), $crate::BindError> {
                $(
                    fields.field($crate::impl_bind!(@name $field $($name)?), &mut self.$field)?;
                )*
                Ok(())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::value::ValueType;

    #[derive(Debug, Default, PartialEq)]
    struct AppConfig {
        port: u64,
        bucket: String,
        untouched: String,
    }

    impl_bind!(AppConfig { port, bucket => "s3_bucket", untouched });

    fn table(entries: &[(&str, ResolvedValue)]) -> BTreeMap<String, ResolvedValue> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn fixed(value: Scalar) -> ResolvedValue {
        ResolvedValue::new(value.value_type(), Some(value))
    }

    #[test]
    fn test_binds_renamed_and_plain_fields() {
        let table = table(&[
            ("port", fixed(Scalar::Uint(8080))),
            ("s3_bucket", fixed(Scalar::from("my-bucket"))),
        ]);
        let mut config = AppConfig {
            untouched: "keep".into(),
            ..Default::default()
        };

        bind_struct(&mut config, &table).unwrap();
        assert_eq!(
            config,
            AppConfig {
                port: 8080,
                bucket: "my-bucket".into(),
                untouched: "keep".into(),
            }
        );
    }

    #[test]
    fn test_field_identifier_not_used_when_renamed() {
        let table = table(&[("bucket", fixed(Scalar::from("wrong")))]);
        let mut config = AppConfig::default();
        bind_struct(&mut config, &table).unwrap();
        assert_eq!(config.bucket, "");
    }

    #[test]
    fn test_unresolved_entry_leaves_field() {
        let table = table(&[("port", ResolvedValue::new(ValueType::Uint, None))]);
        let mut config = AppConfig {
            port: 42,
            ..Default::default()
        };
        bind_struct(&mut config, &table).unwrap();
        assert_eq!(config.port, 42);
    }

    #[test]
    fn test_string_into_number_is_mismatch() {
        let table = table(&[
            ("s3_bucket", fixed(Scalar::from("my-bucket"))),
            ("port", fixed(Scalar::from("8080"))),
        ]);
        let mut config = AppConfig::default();

        let result = bind_struct(&mut config, &table);
        assert!(matches!(
            result,
            Err(BindError::TypeMismatch { ref field, .. }) if field == "port"
        ));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_overflow_is_not_truncated() {
        #[derive(Debug, Default)]
        struct Small {
            level: u8,
        }
        impl_bind!(Small { level });

        let table = table(&[("level", fixed(Scalar::Uint(300)))]);
        let mut small = Small { level: 7 };
        let result = bind_struct(&mut small, &table);
        assert_eq!(
            result,
            Err(BindError::OutOfRange {
                field: "level".into(),
                value: 300,
                target: "u8",
            })
        );
        assert_eq!(small.level, 7);
    }

    #[test]
    fn test_narrow_and_optional_fields() {
        #[derive(Debug, Default)]
        struct Narrow {
            port: u16,
            name: Option<String>,
        }
        impl_bind!(Narrow { port, name });

        let table = table(&[
            ("port", fixed(Scalar::Uint(9090))),
            ("name", fixed(Scalar::from("svc"))),
        ]);
        let mut narrow = Narrow::default();
        bind_struct(&mut narrow, &table).unwrap();
        assert_eq!(narrow.port, 9090);
        assert_eq!(narrow.name.as_deref(), Some("svc"));
    }

    #[test]
    fn test_empty_option_given_wrong_kind_is_mismatch() {
        #[derive(Debug, Default)]
        struct Limits {
            max_conns: Option<u64>,
        }
        impl_bind!(Limits { max_conns });

        let table = table(&[("max_conns", fixed(Scalar::from("abc")))]);
        let mut limits = Limits::default();
        let result = bind_struct(&mut limits, &table);
        assert_eq!(
            result,
            Err(BindError::TypeMismatch {
                field: "max_conns".into(),
                expected: "an unsigned integer",
                found: "a string",
            })
        );
        assert_eq!(limits.max_conns, None);
    }

    #[test]
    fn test_unlisted_fields_survive_binding() {
        #[derive(Debug)]
        struct Server {
            port: u64,
            cache: Vec<u32>,
            session: String,
        }
        impl_bind!(Server { port });

        let table = table(&[
            ("port", fixed(Scalar::Uint(8080))),
            ("session", fixed(Scalar::from("ignored"))),
        ]);
        let mut server = Server {
            port: 1,
            cache: vec![1, 2, 3],
            session: "live".into(),
        };
        bind_struct(&mut server, &table).unwrap();
        assert_eq!(server.port, 8080);
        assert_eq!(server.cache, vec![1, 2, 3]);
        assert_eq!(server.session, "live");
    }

    #[test]
    fn test_later_failure_writes_nothing() {
        #[derive(Debug, Default, PartialEq)]
        struct Pair {
            name: String,
            level: u8,
        }
        impl_bind!(Pair { name, level });

        let table = table(&[
            ("name", fixed(Scalar::from("svc"))),
            ("level", fixed(Scalar::Uint(1000))),
        ]);
        let mut pair = Pair::default();
        assert!(bind_struct(&mut pair, &table).is_err());
        assert_eq!(pair, Pair::default());
    }

    #[test]
    fn test_name_bound_twice_is_invalid_target() {
        #[derive(Debug, Default)]
        struct Twice {
            a: String,
            b: String,
        }
        impl_bind!(Twice { a => "name", b => "name" });

        let table = table(&[("name", fixed(Scalar::from("svc")))]);
        let mut twice = Twice::default();
        let result = bind_struct(&mut twice, &table);
        assert!(matches!(result, Err(BindError::InvalidTarget(_))));
        assert_eq!(twice.a, "");
    }
}
