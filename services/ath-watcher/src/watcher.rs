//! Chain watcher: the per-chain poll, evaluate, notify and persist loop

use std::sync::Arc;
use std::time::Duration;

use crate::chain::Chain;
use crate::config::{Config, ConfigProvider};
use crate::format::format_mining_number;
use crate::history::{History, HistoryStore, Observation};
use crate::notifier::{announce_record, Delivery, Notifier, RecordEvent};
use crate::pool_client::{JsonObject, PoolClient};
use crate::worker::{display_name, extract_samples, WorkerSample};

/// Default pause between cycles
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Outcome of comparing one fetch against history
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Workers seen for the first time this cycle
    pub baselines: Vec<String>,
    /// Strict increases, in the order the pool reported them
    pub records: Vec<RecordEvent>,
}

impl Evaluation {
    /// Whether history was modified and needs persisting
    pub fn changed(&self) -> bool {
        !self.baselines.is_empty() || !self.records.is_empty()
    }
}

/// Compare samples against history, updating it in memory
pub fn evaluate(history: &mut History, samples: &[WorkerSample]) -> Evaluation {
    let mut evaluation = Evaluation::default();
    for sample in samples {
        match history.observe(&sample.identifier, sample.best_share) {
            Observation::Baseline => evaluation.baselines.push(sample.identifier.clone()),
            Observation::Increase { previous } => evaluation.records.push(RecordEvent {
                identifier: sample.identifier.clone(),
                display_name: display_name(&sample.identifier),
                previous,
                current: sample.best_share,
            }),
            Observation::Unchanged => {}
        }
    }
    evaluation
}

/// Summary of a cycle that reached the pool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub workers_seen: usize,
    pub baselines: usize,
    pub records: Vec<RecordEvent>,
    pub announced: usize,
    pub announce_failures: usize,
    pub persisted: bool,
}

/// Outcome of one watch cycle
#[derive(Debug)]
pub enum CycleOutcome {
    /// No base URL configured for the chain this cycle
    Disabled,
    Completed(CycleReport),
    /// A fetch failed; history was left untouched
    Failed(crate::WatcherError),
}

/// Watches one chain forever
pub struct ChainWatcher {
    chain: Chain,
    config: Arc<dyn ConfigProvider>,
    pool: PoolClient,
    notifier: Arc<dyn Notifier>,
    store: HistoryStore,
    history: History,
    interval: Duration,
}

impl std::fmt::Debug for ChainWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainWatcher")
            .field("chain", &self.chain)
            .field("tracked_workers", &self.history.len())
            .field("interval", &self.interval)
            .finish()
    }
}

impl ChainWatcher {
    /// Create a watcher, loading the chain's persisted history
    pub fn new(
        chain: Chain,
        config: Arc<dyn ConfigProvider>,
        pool: PoolClient,
        notifier: Arc<dyn Notifier>,
        store: HistoryStore,
        interval: Duration,
    ) -> Self {
        let history = store.load(chain);
        Self {
            chain,
            config,
            pool,
            notifier,
            store,
            history,
            interval,
        }
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Run cycles until the process exits
    pub async fn run(mut self) {
        tracing::info!(
            "[{}] Monitor started, tracking {} workers, polling every {:?}",
            self.chain,
            self.history.len(),
            self.interval
        );
        loop {
            match self.run_cycle().await {
                CycleOutcome::Disabled => {
                    tracing::debug!("[{}] Skipping - no URL configured", self.chain);
                }
                CycleOutcome::Completed(report) => {
                    tracing::debug!(
                        "[{}] Cycle done: {} workers, {} new, {} records",
                        self.chain,
                        report.workers_seen,
                        report.baselines,
                        report.records.len()
                    );
                }
                CycleOutcome::Failed(e) => {
                    tracing::warn!("[{}] Cycle failed: {}", self.chain, e);
                }
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Run a single poll, evaluate, notify and persist cycle
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let config = self.config.load();
        let base_url = config.base_url(self.chain);
        if base_url.is_empty() {
            return CycleOutcome::Disabled;
        }

        tracing::debug!("[{}] Fetching from {}", self.chain, base_url);
        let (workers, summary) = match self.fetch(&config, base_url).await {
            Ok(fetched) => fetched,
            Err(e) => return CycleOutcome::Failed(e),
        };

        let samples = extract_samples(&workers);
        let evaluation = evaluate(&mut self.history, &samples);
        for identifier in &evaluation.baselines {
            tracing::info!(
                "[{}] Tracking new worker: {} (bestever: {})",
                self.chain,
                display_name(identifier),
                self.history
                    .get(identifier)
                    .map(format_mining_number)
                    .unwrap_or_default()
            );
        }

        let mut report = CycleReport {
            workers_seen: samples.len(),
            baselines: evaluation.baselines.len(),
            ..Default::default()
        };

        for event in &evaluation.records {
            tracing::info!(
                "[{}] ATH {}: {} → {}",
                self.chain,
                event.display_name,
                format_mining_number(event.previous),
                format_mining_number(event.current)
            );
            match announce_record(
                self.notifier.as_ref(),
                event,
                &summary,
                self.chain,
                &config.discord_webhook,
            )
            .await
            {
                Ok(Delivery::Sent) => {
                    report.announced += 1;
                    tracing::info!(
                        "[{}] Announced {} via {}",
                        self.chain,
                        event.display_name,
                        self.notifier.type_name()
                    );
                }
                Ok(Delivery::Skipped) => {}
                Err(e) => {
                    report.announce_failures += 1;
                    tracing::warn!(
                        "[{}] Announcing {} failed: {}",
                        self.chain,
                        event.display_name,
                        e
                    );
                }
            }
        }

        if evaluation.changed() {
            match self.store.save(self.chain, &self.history) {
                Ok(()) => report.persisted = true,
                Err(e) => tracing::warn!("[{}] Keeping history in memory: {}", self.chain, e),
            }
        }

        report.records = evaluation.records;
        CycleOutcome::Completed(report)
    }

    async fn fetch(&self, config: &Config, base_url: &str) -> crate::Result<(JsonObject, JsonObject)> {
        let workers = self
            .pool
            .fetch_workers(base_url, &config.proxy_token)
            .await?;
        let summary = self
            .pool
            .fetch_summary(base_url, &config.proxy_token)
            .await?;
        Ok((workers, summary))
    }
}
