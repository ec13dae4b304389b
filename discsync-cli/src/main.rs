mod cli;
mod output;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use bridge_http::ReqwestHttpClient;
use core_reconcile::Reconciler;
use core_runtime::{init_logging, LogFormat, LoggingConfig, SyncSettings};
use index_elastic::{ElasticConfig, ElasticIndex};
use provider_discogs::DiscogsConnector;

use cli::Cli;
use output::{print_error, print_summary};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let settings = SyncSettings::from_env().context("Could not load configuration")?;

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::default()
    };
    init_logging(LoggingConfig::default().with_format(format))
        .context("Could not initialize logging")?;

    // Default to the configured identity when no user flag is given.
    let user = cli
        .user
        .unwrap_or_else(|| settings.discogs_username.clone());

    let http_client = Arc::new(ReqwestHttpClient::new()?);

    let source = Arc::new(DiscogsConnector::new(
        http_client.clone(),
        settings.discogs_token.clone(),
    ));
    let index = Arc::new(ElasticIndex::new(
        http_client,
        &ElasticConfig {
            host: settings.elasticsearch_host.clone(),
            port: settings.elasticsearch_port,
            username: settings.elasticsearch_user.clone(),
            password: settings.elasticsearch_password.clone(),
        },
    ));

    info!(user = %user, "Starting collection sync");

    let report = Reconciler::new(source, index)
        .sync(&user)
        .await
        .with_context(|| format!("Sync failed for '{user}'"))?;

    print_summary(&user, &report);
    Ok(())
}
