use std::collections::HashMap;
use std::ffi::OsString;

use schemaconf::config::MissingCause;
use schemaconf::{impl_bind, BindError, Config, Error, Schema};

const SCHEMA: &str = r#"{
    "port": {
        "description": "The port that the application will run on",
        "default": 8080,
        "env_name": "PORT",
        "flag_name": "port",
        "type": "uint",
        "require": true
    },
    "s3_bucket": {
        "description": "The s3 bucket used to upload icons",
        "default": "",
        "env_name": "S3_BUCKET",
        "flag_name": "s3.bucket",
        "type": "string"
    },
    "workers": {
        "description": "Worker count",
        "default": "lots",
        "flag_name": "workers",
        "type": "uint8"
    }
}"#;

#[derive(Debug, Default, PartialEq)]
struct AppConfig {
    port: u16,
    bucket: String,
    workers: u8,
    name: String,
}

impl_bind!(AppConfig {
    port,
    bucket => "s3_bucket",
    workers,
    name,
});

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn build(args: &[&str], vars: &[(&str, &str)]) -> Result<schemaconf::Resolver, Error> {
    Config::builder()
        .with_schema(Schema::from_json_str(SCHEMA).unwrap())
        .with_args(args.iter().copied())
        .with_env(env(vars))
        .build()
}

#[test]
fn test_defaults_flow_into_struct() {
    let resolver = build(&["app"], &[("S3_BUCKET", "my-bucket")]).unwrap();

    let mut config = AppConfig {
        workers: 4,
        name: "svc".into(),
        ..Default::default()
    };
    resolver.load(&mut config).unwrap();

    assert_eq!(
        config,
        AppConfig {
            port: 8080,
            bucket: "my-bucket".into(),
            workers: 4,
            name: "svc".into(),
        }
    );
}

#[test]
fn test_env_wins_over_explicit_flag() {
    let resolver = build(&["app", "--port=1234"], &[("PORT", "9090")]).unwrap();
    let mut config = AppConfig::default();
    resolver.load(&mut config).unwrap();
    assert_eq!(config.port, 9090);
}

#[test]
fn test_flag_used_without_env() {
    let resolver = build(&["app", "--port=1234", "--s3.bucket", "b"], &[]).unwrap();
    let mut config = AppConfig::default();
    resolver.load(&mut config).unwrap();
    assert_eq!(config.port, 1234);
    assert_eq!(config.bucket, "b");
}

#[test]
fn test_malformed_default_only_affects_its_entry() {
    let resolver = build(&["app"], &[]).unwrap();
    assert_eq!(resolver.entry_errors().len(), 1);
    assert_eq!(resolver.entry_errors()[0].name(), "workers");
    assert_eq!(resolver.get_u64("port"), Some(8080));
}

#[test]
fn test_zero_port_rejected_as_missing() {
    let result = build(&["app"], &[("PORT", "0")]);
    match result {
        Err(Error::Rejected(rejection)) => {
            assert_eq!(rejection.violations.len(), 1);
            assert_eq!(rejection.violations[0].name, "port");
            assert_eq!(rejection.violations[0].cause, MissingCause::Empty);
            let report = rejection.to_string();
            assert!(report.contains("PORT: \"0\""));
            assert!(report.contains("usage:"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn test_port_overflowing_field_is_not_truncated() {
    let resolver = build(&["app", "--port=70000"], &[]).unwrap();
    let mut config = AppConfig::default();
    let result = resolver.load(&mut config);
    assert!(matches!(result, Err(BindError::OutOfRange { value: 70000, .. })));
    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_single_dash_flag_respects_precedence() {
    let resolver = build(&["app", "-port=1234"], &[("PORT", "9090")]).unwrap();
    let mut config = AppConfig::default();
    resolver.load(&mut config).unwrap();
    assert_eq!(config.port, 9090);

    let resolver = build(&["app", "-port=1234", "-s3.bucket", "icons"], &[]).unwrap();
    let mut config = AppConfig::default();
    resolver.load(&mut config).unwrap();
    assert_eq!(config.port, 1234);
    assert_eq!(config.bucket, "icons");
}

#[test]
fn test_trailing_operands_do_not_reject_run() {
    let resolver = build(&["app", "--port=1", "serve", "--dry-run"], &[]).unwrap();
    assert_eq!(resolver.get_u64("port"), Some(1));
    assert_eq!(
        resolver.operands(),
        &[OsString::from("serve"), OsString::from("--dry-run")]
    );
}

#[test]
fn test_unbound_fields_keep_their_state() {
    struct Service {
        port: u16,
        handle: Option<Vec<u8>>,
        label: String,
    }
    impl_bind!(Service { port });

    let resolver = build(&["app", "--port=4000"], &[]).unwrap();
    let mut service = Service {
        port: 0,
        handle: Some(vec![7]),
        label: "primary".into(),
    };
    resolver.load(&mut service).unwrap();
    assert_eq!(service.port, 4000);
    assert_eq!(service.handle, Some(vec![7]));
    assert_eq!(service.label, "primary");
}

#[cfg(unix)]
#[test]
fn test_non_unicode_env_is_entry_error() {
    use std::os::unix::ffi::OsStringExt;

    let env: HashMap<String, OsString> = [(
        "S3_BUCKET".to_string(),
        OsString::from_vec(vec![0xff]),
    )]
    .into_iter()
    .collect();

    let resolver = Config::builder()
        .with_schema(Schema::from_json_str(SCHEMA).unwrap())
        .with_args(["app", "--s3.bucket=fallback"])
        .with_env(env)
        .build()
        .unwrap();

    assert!(resolver
        .entry_errors()
        .iter()
        .any(|e| matches!(e, schemaconf::ParseError::InvalidEnv { name, .. } if name == "s3_bucket")));
    assert_eq!(resolver.get("s3_bucket"), None);
}

#[test]
fn test_unknown_flag_is_reported() {
    let result = build(&["app", "--verbose"], &[]);
    assert!(matches!(
        result,
        Err(Error::Config(schemaconf::ConfigError::Cli(_)))
    ));
}
