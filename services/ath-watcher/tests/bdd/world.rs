//! BDD test world for the ATH watcher

use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ath_watcher::config::{save_config, Config, FileConfigProvider};
use ath_watcher::discord::DiscordWebhook;
use ath_watcher::history::{History, HistoryStore};
use ath_watcher::io::{HttpClient, HttpResponse};
use ath_watcher::pool_client::PoolClient;
use ath_watcher::watcher::{ChainWatcher, CycleOutcome};
use ath_watcher::{Chain, WatcherError};
use cucumber::World;

pub const WEBHOOK_URL: &str = "http://webhook.test/hook";

/// Serves a scripted pool API and records webhook posts
#[derive(Debug, Default)]
pub struct ScriptedHttpClient {
    pub workers: Mutex<Vec<(String, u64)>>,
    pub network_difficulty: Mutex<Option<u64>>,
    pub unreachable: AtomicBool,
    pub webhook_status: AtomicU16,
    pub gets: Mutex<Vec<String>>,
    pub posts: Mutex<Vec<serde_json::Value>>,
}

impl ScriptedHttpClient {
    pub fn set_worker(&self, identifier: &str, best_share: u64) {
        let mut workers = self.workers.lock().unwrap();
        match workers.iter_mut().find(|(id, _)| id == identifier) {
            Some(entry) => entry.1 = best_share,
            None => workers.push((identifier.to_string(), best_share)),
        }
    }

    fn workers_body(&self) -> String {
        let details: Vec<serde_json::Value> = self
            .workers
            .lock()
            .unwrap()
            .iter()
            .map(|(id, best)| serde_json::json!({"workername": id, "bestever": best}))
            .collect();
        serde_json::json!({ "workers_details": details }).to_string()
    }

    fn summary_body(&self) -> String {
        match *self.network_difficulty.lock().unwrap() {
            Some(diff) => serde_json::json!({"network_difficulty": diff, "hashrate": 1e12}),
            None => serde_json::json!({"hashrate": 1e12}),
        }
        .to_string()
    }
}

#[async_trait::async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn get(&self, url: &str, _token: &str) -> ath_watcher::Result<HttpResponse> {
        self.gets.lock().unwrap().push(url.to_string());
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(WatcherError::Transport(format!(
                "GET {} failed: connection refused",
                url
            )));
        }
        let body = if url.ends_with("/api/pool/workers") {
            self.workers_body()
        } else {
            self.summary_body()
        };
        Ok(HttpResponse { status: 200, body })
    }

    async fn post_json(
        &self,
        _url: &str,
        body: &serde_json::Value,
    ) -> ath_watcher::Result<HttpResponse> {
        self.posts.lock().unwrap().push(body.clone());
        let status = match self.webhook_status.load(Ordering::SeqCst) {
            0 => 204,
            status => status,
        };
        Ok(HttpResponse {
            status,
            body: String::new(),
        })
    }
}

#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct WatcherWorld {
    pub dir: tempfile::TempDir,
    pub http: Arc<ScriptedHttpClient>,
    pub config: Config,
    pub watcher: Option<ChainWatcher>,
    pub outcomes: Vec<CycleOutcome>,
    pub saved_history: Option<History>,
    pub loaded_history: Option<History>,
}

impl WatcherWorld {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
            http: Arc::new(ScriptedHttpClient::default()),
            config: Config::default(),
            watcher: None,
            outcomes: Vec::new(),
            saved_history: None,
            loaded_history: None,
        }
    }

    pub fn config_path(&self) -> std::path::PathBuf {
        self.dir.path().join("config.json")
    }

    pub fn store(&self) -> HistoryStore {
        HistoryStore::new(self.dir.path())
    }

    pub fn write_config(&self) {
        save_config(&self.config_path(), &self.config).expect("save config");
    }

    /// The watcher for `chain`, created on first use like the supervisor does
    pub fn watcher_for(&mut self, chain: Chain) -> &mut ChainWatcher {
        if self.watcher.as_ref().map(|w| w.chain()) != Some(chain) {
            let http: Arc<dyn HttpClient> = self.http.clone();
            self.watcher = Some(ChainWatcher::new(
                chain,
                Arc::new(FileConfigProvider::new(self.config_path())),
                PoolClient::new(Arc::clone(&http)),
                Arc::new(DiscordWebhook::new(http)),
                self.store(),
                Duration::from_millis(10),
            ));
        }
        self.watcher.as_mut().expect("watcher")
    }
}

pub fn parse_chain(tag: &str) -> Chain {
    Chain::ALL
        .into_iter()
        .find(|c| c.tag() == tag)
        .unwrap_or_else(|| panic!("unknown chain {tag}"))
}

pub fn base_url(chain: Chain) -> String {
    format!("http://{}.pool.test", chain.tag().to_lowercase())
}

pub fn set_base_url(config: &mut Config, chain: Chain, url: String) {
    match chain {
        Chain::Bch => config.bch_base = url,
        Chain::Xec => config.xec_base = url,
        Chain::Btc => config.btc_base = url,
        Chain::Dbg => config.dbg_base = url,
    }
}
