use schemaconf::{impl_bind, Config, Error};

#[derive(Debug, Default)]
struct AppConfig {
    port: u16,
    bucket: String,
}

impl_bind!(AppConfig { port, bucket => "s3_bucket" });

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Try: S3_BUCKET=icons cargo run --example basic -- -port=9000 serve
    let resolver = match Config::builder()
        .with_schema_file("demos/config.json")
        .build()
    {
        Ok(resolver) => resolver,
        Err(Error::Config(schemaconf::ConfigError::Cli(e))) => e.exit(),
        Err(Error::Rejected(rejection)) => {
            eprint!("{rejection}");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let mut config = AppConfig::default();
    if let Err(e) = resolver.load(&mut config) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    println!("{config:#?}");
    if !resolver.operands().is_empty() {
        println!("operands: {:?}", resolver.operands());
    }
}
