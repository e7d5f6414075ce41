use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store_endpoint: String,
    pub store_region: String,
    pub store_container: String,
}

/// Command-line + environment configuration.
///
/// Store credentials are not part of this struct; the SDK reads
/// `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` through its environment
/// credentials provider.
#[derive(Parser, Debug)]
#[command(author, version, about = "Image upload gateway backed by an object store")]
pub struct Args {
    /// Host to bind to (overrides UPLOAD_GATEWAY_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides UPLOAD_GATEWAY_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Object store endpoint URL (overrides STORE_ENDPOINT_URL)
    #[arg(long)]
    pub store_endpoint: Option<String>,

    /// Object store region (overrides STORE_REGION)
    #[arg(long)]
    pub store_region: Option<String>,

    /// Container the gateway uploads into (overrides STORE_CONTAINER)
    #[arg(long)]
    pub store_container: Option<String>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        let args = Args::parse();

        // --- Environment fallback ---
        let env_host = env::var("UPLOAD_GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("UPLOAD_GATEWAY_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing UPLOAD_GATEWAY_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading UPLOAD_GATEWAY_PORT"),
        };
        let env_endpoint =
            env::var("STORE_ENDPOINT_URL").unwrap_or_else(|_| "http://127.0.0.1:9000".into());
        let env_region = env::var("STORE_REGION").unwrap_or_else(|_| "us-east-1".into());
        let env_container =
            env::var("STORE_CONTAINER").unwrap_or_else(|_| "lanternfly-images".into());

        // --- Merge ---
        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            store_endpoint: args.store_endpoint.unwrap_or(env_endpoint),
            store_region: args.store_region.unwrap_or(env_region),
            store_container: args.store_container.unwrap_or(env_container),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
