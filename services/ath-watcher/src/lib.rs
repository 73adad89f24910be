//! ATH Watcher - mining pool best-share monitor
//!
//! Polls each chain's pool API, detects when a worker's all-time best share
//! grows, and announces every new record to a webhook.

pub mod chain;
pub mod config;
pub mod discord;
pub mod error;
pub mod format;
pub mod history;
pub mod io;
pub mod notifier;
pub mod pool_client;
pub mod server;
pub mod status;
pub mod supervisor;
pub mod watcher;
pub mod worker;

pub use chain::Chain;
pub use config::{load_config, Config};
pub use error::{Result, WatcherError};

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::FileConfigProvider;
use crate::discord::DiscordWebhook;
use crate::history::HistoryStore;
use crate::io::ReqwestHttpClient;
use crate::notifier::Notifier;
use crate::pool_client::PoolClient;
use crate::server::ServerState;
use crate::supervisor::{supervise, Supervisor};

/// Settings for the configuration and status interface
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub port: u16,
    pub admin_password: String,
}

/// Everything the service needs to start
#[derive(Debug, Clone)]
pub struct Settings {
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
    pub poll_interval: Duration,
    pub server: Option<ServerSettings>,
}

/// Run the watcher service until Ctrl-C
pub async fn run(settings: Settings) -> Result<()> {
    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::new());
    let pool = PoolClient::new(Arc::clone(&http));
    let notifier: Arc<dyn Notifier> = Arc::new(DiscordWebhook::new(Arc::clone(&http)));

    std::fs::create_dir_all(&settings.data_dir).map_err(|e| {
        WatcherError::Persistence(format!(
            "Cannot create data directory {:?}: {}",
            settings.data_dir, e
        ))
    })?;

    let config = FileConfigProvider::new(&settings.config_path);
    tracing::info!("Reading configuration from {:?}", config.path());

    let supervisor = Supervisor::new(
        Arc::new(config),
        pool.clone(),
        Arc::clone(&notifier),
        HistoryStore::new(&settings.data_dir),
        settings.poll_interval,
    );

    tracing::info!("Multi-chain ATH monitor, polling every {:?}", settings.poll_interval);
    let handles = supervisor.start();

    if let Some(server) = settings.server {
        let state = ServerState {
            config_path: settings.config_path.clone(),
            admin_password: Arc::from(server.admin_password.as_str()),
            pool,
            notifier,
        };
        let port = server.port;

        tokio::spawn(async move {
            let router = server::build_router(state);
            let addr = SocketAddr::from(([0, 0, 0, 0], port));

            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(l) => l,
                Err(e) => {
                    tracing::error!(
                        "Failed to bind config interface to port {}: {}. Continuing without it.",
                        port,
                        e
                    );
                    return;
                }
            };
            tracing::info!("Config interface listening on http://{}", addr);

            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Config interface stopped: {}", e);
            }
        });
    }

    tokio::select! {
        _ = supervise(handles) => {
            tracing::error!("All watchers stopped");
        }
        result = tokio::signal::ctrl_c() => {
            match result {
                Ok(()) => tracing::info!("Shutdown signal received"),
                Err(e) => tracing::error!("Failed to listen for ctrl-c: {}", e),
            }
        }
    }

    Ok(())
}
