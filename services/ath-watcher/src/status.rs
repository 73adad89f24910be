//! On-demand pool status snapshot
//!
//! Reads the pools but never touches worker history.

use serde::Serialize;

use crate::chain::Chain;
use crate::config::Config;
use crate::notifier::{announce_status, Delivery, Notifier};
use crate::pool_client::{hashrate, PoolClient};
use crate::worker::worker_count;

/// Health snapshot of one configured chain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainStatus {
    pub chain: Chain,
    pub workers: Option<usize>,
    pub hashrate: Option<f64>,
    pub error: Option<String>,
}

async fn chain_status(pool: &PoolClient, chain: Chain, base_url: &str, token: &str) -> ChainStatus {
    let fetched = async {
        let workers = pool.fetch_workers(base_url, token).await?;
        let summary = pool.fetch_summary(base_url, token).await?;
        Ok::<_, crate::WatcherError>((worker_count(&workers), hashrate(&summary)))
    }
    .await;

    match fetched {
        Ok((workers, hashrate)) => ChainStatus {
            chain,
            workers: Some(workers),
            hashrate,
            error: None,
        },
        Err(e) => {
            tracing::warn!("[{}] Status fetch failed: {}", chain, e);
            ChainStatus {
                chain,
                workers: None,
                hashrate: None,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Snapshot every chain with a configured base URL
pub async fn collect_status(config: &Config, pool: &PoolClient) -> Vec<ChainStatus> {
    let mut statuses = Vec::new();
    for chain in config.enabled_chains() {
        statuses.push(chain_status(pool, chain, config.base_url(chain), &config.proxy_token).await);
    }
    statuses
}

/// Collect a snapshot and send it as one combined announcement
pub async fn broadcast_status(
    config: &Config,
    pool: &PoolClient,
    notifier: &dyn Notifier,
) -> (Vec<ChainStatus>, crate::Result<Delivery>) {
    let statuses = collect_status(config, pool).await;
    tracing::info!(
        "Broadcasting status for {} chain(s) via {}",
        statuses.len(),
        notifier.type_name()
    );
    let delivery = announce_status(notifier, &statuses, &config.discord_webhook).await;
    (statuses, delivery)
}
