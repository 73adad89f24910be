//! Supervisor: one independent watcher task per chain

use std::sync::Arc;
use std::time::Duration;

use tokio::task::{JoinError, JoinHandle, JoinSet};

use crate::chain::Chain;
use crate::config::ConfigProvider;
use crate::history::HistoryStore;
use crate::notifier::Notifier;
use crate::pool_client::PoolClient;
use crate::watcher::ChainWatcher;

/// Handle to a running chain watcher
#[derive(Debug)]
pub struct WatcherHandle {
    pub chain: Chain,
    pub handle: JoinHandle<()>,
}

/// Starts chain watchers; does not coordinate or restart them
pub struct Supervisor {
    chains: Vec<Chain>,
    config: Arc<dyn ConfigProvider>,
    pool: PoolClient,
    notifier: Arc<dyn Notifier>,
    store: HistoryStore,
    interval: Duration,
}

impl Supervisor {
    pub fn new(
        config: Arc<dyn ConfigProvider>,
        pool: PoolClient,
        notifier: Arc<dyn Notifier>,
        store: HistoryStore,
        interval: Duration,
    ) -> Self {
        Self {
            chains: Chain::ALL.to_vec(),
            config,
            pool,
            notifier,
            store,
            interval,
        }
    }

    /// Restrict the supervised chains
    pub fn with_chains(mut self, chains: &[Chain]) -> Self {
        self.chains = chains.to_vec();
        self
    }

    /// Spawn one task per chain
    pub fn start(&self) -> Vec<WatcherHandle> {
        self.chains
            .iter()
            .map(|&chain| {
                let watcher = ChainWatcher::new(
                    chain,
                    Arc::clone(&self.config),
                    self.pool.clone(),
                    Arc::clone(&self.notifier),
                    self.store.clone(),
                    self.interval,
                );
                tracing::debug!("Spawning watcher for {}", chain);
                WatcherHandle {
                    chain,
                    handle: tokio::spawn(watcher.run()),
                }
            })
            .collect()
    }
}

/// Collect watcher exits in the order they happen
pub fn exits(handles: Vec<WatcherHandle>) -> JoinSet<(Chain, Result<(), JoinError>)> {
    let mut set = JoinSet::new();
    for WatcherHandle { chain, handle } in handles {
        set.spawn(async move { (chain, handle.await) });
    }
    set
}

/// Wait on every watcher, logging each one as it stops
pub async fn supervise(handles: Vec<WatcherHandle>) {
    let mut exits = exits(handles);
    while let Some(joined) = exits.join_next().await {
        match joined {
            Ok((chain, Ok(()))) => tracing::error!("[{}] Watcher exited unexpectedly", chain),
            Ok((chain, Err(e))) => tracing::error!("[{}] Watcher stopped: {}", chain, e),
            Err(e) => tracing::error!("Watcher supervision task failed: {}", e),
        }
    }
}
