//! ATH Watcher CLI

use std::path::PathBuf;
use std::time::Duration;

use ath_watcher::{ServerSettings, Settings};
use clap::Parser;
use tracing::Level;

#[derive(Parser)]
#[command(name = "ath-watcher")]
#[command(about = "Announces new worker best shares from mining pools to a webhook")]
#[command(version)]
struct Args {
    /// Path to the configuration document
    #[arg(short, long, default_value = "/data/config.json")]
    config: PathBuf,

    /// Directory holding per-chain history files
    #[arg(short, long, default_value = "/data")]
    data_dir: PathBuf,

    /// Seconds between poll cycles
    #[arg(long, env = "POLL_SECONDS", default_value_t = 15)]
    poll_seconds: u64,

    /// Port of the configuration and status interface
    #[arg(short, long, default_value_t = ath_watcher::server::DEFAULT_PORT)]
    port: u16,

    /// Do not serve the configuration and status interface
    #[arg(long)]
    no_server: bool,

    /// Shared secret for the configuration interface (empty disables the gate)
    #[arg(long, env = "ADMIN_PASSWORD", default_value = "", hide_env_values = true)]
    admin_password: String,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, data_dir={:?}, poll_seconds={}, port={}, no_server={}",
        args.config,
        args.data_dir,
        args.poll_seconds,
        args.port,
        args.no_server
    );

    let settings = Settings {
        config_path: args.config,
        data_dir: args.data_dir,
        poll_interval: Duration::from_secs(args.poll_seconds.max(1)),
        server: (!args.no_server).then(|| ServerSettings {
            port: args.port,
            admin_password: args.admin_password.trim().to_string(),
        }),
    };

    if let Err(e) = ath_watcher::run(settings).await {
        tracing::error!("Fatal error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
