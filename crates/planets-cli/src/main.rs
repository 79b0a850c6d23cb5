//! Command line client for the PlanetsJPM API

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use planets_network::{Endpoint, HttpMethod, NetworkService, RequestExecutor};
use serde_json::Value;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use url::Url;

mod api;
mod config;

use crate::api::ApiEndpoint;
use crate::config::{Diagnostic, Settings};

/// Fetch a JSON resource and print it
#[derive(Parser)]
#[command(name = "planets")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Logging level, overrides the configured one
    #[arg(short, long)]
    log_level: Option<Level>,
    /// HTTP method used for endpoint requests
    #[arg(short, long, default_value = "get")]
    method: HttpMethod,
    /// Request body, sent as is
    #[arg(short, long)]
    body: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Request a path relative to the configured base URL
    Endpoint {
        /// Path joined onto the base URL
        path: String,
    },
    /// Request a raw URL with GET
    Url {
        /// Absolute http(s) URL
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    let (settings, mut diagnostics) = Settings::load(args.config);

    let level = match args.log_level {
        Some(level) => level,
        None => settings.level().unwrap_or_else(|msg| {
            diagnostics.push(Diagnostic::Warn(msg));
            Level::INFO
        }),
    };

    let env_filter = EnvFilter::new(format!("{},hyper=warn,reqwest=warn", level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    for diagnostic in &diagnostics {
        diagnostic.emit();
    }
    tracing::debug!("Using settings: {:?}", settings);

    let service = NetworkService::with_config(settings.transport_config())?;
    let body = args.body.map(String::into_bytes);

    let value = match args.command {
        Commands::Endpoint { path } => {
            let base = Url::parse(&settings.base_url)?;
            let endpoint = ApiEndpoint::new(base, &path, args.method);
            run(&service, Some(&endpoint), None, body).await?
        }
        Commands::Url { url } => {
            if args.method != HttpMethod::Get {
                tracing::warn!("Raw URLs are always requested with GET, ignoring --method");
            }
            run::<_, ApiEndpoint>(&service, None, Some(&url), body).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&value)?);

    Ok(())
}

async fn run<X, E>(
    executor: &X,
    endpoint: Option<&E>,
    raw_url: Option<&str>,
    body: Option<Vec<u8>>,
) -> Result<Value>
where
    X: RequestExecutor,
    E: Endpoint + Sync,
{
    Ok(executor.request(endpoint, raw_url, body).await?)
}
