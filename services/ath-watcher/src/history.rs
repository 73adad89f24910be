//! Per-chain history of each worker's best share, and its on-disk store

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::chain::Chain;

/// Result of comparing an observed best share against history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// First sighting of the worker; its value becomes the baseline
    Baseline,
    /// Strictly greater than the stored maximum
    Increase { previous: u64 },
    /// Equal to or below the stored maximum
    Unchanged,
}

/// Last known best share per worker identifier.
///
/// Stored values never decrease and entries are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(BTreeMap<String, u64>);

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observation, updating the stored maximum when it grows
    pub fn observe(&mut self, identifier: &str, value: u64) -> Observation {
        match self.0.get_mut(identifier) {
            None => {
                self.0.insert(identifier.to_string(), value);
                Observation::Baseline
            }
            Some(stored) if value > *stored => {
                let previous = *stored;
                *stored = value;
                Observation::Increase { previous }
            }
            Some(_) => Observation::Unchanged,
        }
    }

    pub fn get(&self, identifier: &str) -> Option<u64> {
        self.0.get(identifier).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, u64)> for History {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// On-disk layout of a chain's history file
#[derive(Debug, Serialize, Deserialize)]
struct HistoryFile {
    last_bestever: History,
}

/// Persists one history file per chain under a data directory
#[derive(Debug, Clone)]
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, chain: Chain) -> PathBuf {
        self.dir.join(chain.state_file_name())
    }

    /// Load a chain's history; absent or invalid files yield an empty history
    pub fn load(&self, chain: Chain) -> History {
        let path = self.path_for(chain);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("[{}] No history at {:?}, starting empty", chain, path);
                return History::new();
            }
            Err(e) => {
                tracing::warn!("[{}] Failed to read history {:?}: {}", chain, path, e);
                return History::new();
            }
        };

        match serde_json::from_str::<HistoryFile>(&content) {
            Ok(file) => {
                tracing::debug!(
                    "[{}] Loaded {} workers from {:?}",
                    chain,
                    file.last_bestever.len(),
                    path
                );
                file.last_bestever
            }
            Err(e) => {
                tracing::warn!("[{}] Ignoring invalid history {:?}: {}", chain, path, e);
                History::new()
            }
        }
    }

    /// Atomically replace a chain's history file
    pub fn save(&self, chain: Chain, history: &History) -> crate::Result<()> {
        let path = self.path_for(chain);
        let file = HistoryFile {
            last_bestever: history.clone(),
        };
        let json = serde_json::to_vec(&file)?;
        write_atomic(&path, &json).map_err(|e| {
            crate::WatcherError::Persistence(format!("Writing {:?}: {}", path, e))
        })?;
        tracing::debug!("[{}] Saved {} workers to {:?}", chain, history.len(), path);
        Ok(())
    }
}

/// Write `bytes` to `<path>.tmp`, then rename it over `path`
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    {
        let mut f = std::fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path)
}
