use std::process::ExitCode;

use catalog_consumer::{config::BASE_URI_VAR, Consumer, ConsumerConfig};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// `catalog-consumer` command arguments.
#[derive(Debug, Parser)]
#[command(name = "catalog-consumer", about = "Look up users and products on the catalog provider", version)]
struct CliArgs {
    /// Provider base URI. Falls back to `CONSUMER_BASE_URI` when omitted.
    #[arg(long = "base-uri", value_name = "uri", env = BASE_URI_VAR)]
    base_uri: Option<String>,
    #[command(subcommand)]
    lookup: Lookup,
}

#[derive(Debug, Subcommand)]
enum Lookup {
    /// Fetch a user by name.
    User { name: String },
    /// Fetch a product by id.
    Product { id: i64 },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let base_uri = match args.base_uri {
        Some(uri) => uri,
        None => ConsumerConfig::from_env()?.base_uri,
    };
    let consumer = Consumer::new(&base_uri);

    let found = match args.lookup {
        Lookup::User { name } => consumer.get_user(&name)?.map(|u| serde_json::to_string_pretty(&u)),
        Lookup::Product { id } => consumer.get_product(id)?.map(|p| serde_json::to_string_pretty(&p)),
    };

    match found {
        Some(json) => {
            println!("{}", json?);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("not found");
            Ok(ExitCode::FAILURE)
        }
    }
}
