mod bootstrap;
mod services;

use kbq_config::KbqConfig;
use kbq_secrets::SecretOverrides;
use kbq_storage::Storage;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(error) = init_tracing() {
        eprintln!("kbq: failed to initialize tracing: {error:#}");
        std::process::exit(1);
    }

    match run().await {
        Ok(()) => std::process::exit(0),
        Err(StartupError::Config(error)) => {
            error!(%error, "configuration error");
            std::process::exit(1);
        }
        Err(StartupError::StorageUnreachable(error)) => {
            error!(%error, "storage unreachable at startup");
            std::process::exit(2);
        }
    }
}

#[derive(Debug)]
enum StartupError {
    Config(anyhow::Error),
    StorageUnreachable(anyhow::Error),
}

async fn run() -> Result<(), StartupError> {
    let overrides = match kbq_secrets::load_env_overrides().await.map_err(|e| StartupError::Config(e.into()))? {
        SecretOverrides::Disabled => Vec::new(),
        SecretOverrides::Values(values) => values,
    };
    let config = KbqConfig::load_with_env_overrides(&overrides).map_err(|e| StartupError::Config(e.into()))?;

    let services = bootstrap::build_services(&config).await.map_err(StartupError::Config)?;

    services
        .storage
        .list_projects()
        .await
        .map_err(|e| StartupError::StorageUnreachable(e.into()))?;

    info!(storage_type = ?config.storage.storage_type, "kbq ready");

    tokio::signal::ctrl_c().await.map_err(|e| StartupError::Config(e.into()))?;
    info!("shutdown signal received, exiting");

    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_env("KBQ_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}
