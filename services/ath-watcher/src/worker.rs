//! Worker record extraction from heterogeneous pool responses

use serde_json::Value;

use crate::pool_client::JsonObject;

/// Key holding the worker list in the `/api/pool/workers` response
pub const WORKERS_KEY: &str = "workers_details";

/// Key holding a worker's identifier
pub const IDENTIFIER_KEY: &str = "workername";

/// Candidate best-share keys, tried in priority order
pub const BEST_SHARE_FIELDS: [&str; 4] = [
    "best_share_since_block",
    "bestshare_since_block",
    "bestever_since_block",
    "bestever",
];

const UNKNOWN_WORKER: &str = "Unknown";

/// A worker observation with a resolvable best share
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSample {
    pub identifier: String,
    pub best_share: u64,
}

/// Derive a display label from a raw worker identifier.
///
/// `"pool.rig one"` becomes `"Rig One"`; the part before the first `.` is
/// the account and is dropped.
pub fn display_name(identifier: &str) -> String {
    let suffix = match identifier.split_once('.') {
        Some((_, rest)) => rest,
        None => identifier,
    };
    let collapsed = suffix.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return UNKNOWN_WORKER.to_string();
    }
    title_case(&collapsed)
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
        } else {
            out.push(c);
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

/// Resolve the best share from the first present, non-null candidate field.
///
/// Returns `None` when no candidate is present or the first present one
/// cannot be read as a non-negative integer.
pub fn resolve_best_share(record: &JsonObject) -> Option<u64> {
    let value = BEST_SHARE_FIELDS
        .iter()
        .filter_map(|key| record.get(*key))
        .find(|v| !v.is_null())?;
    coerce_u64(value)
}

fn coerce_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && *f < u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        Value::Bool(b) => Some(u64::from(*b)),
        _ => None,
    }
}

/// Extract every worker with an identifier and a resolvable best share,
/// preserving the order the pool reported them in.
pub fn extract_samples(workers: &JsonObject) -> Vec<WorkerSample> {
    let Some(details) = workers.get(WORKERS_KEY).and_then(Value::as_array) else {
        return Vec::new();
    };

    details
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|record| {
            let identifier = match record.get(IDENTIFIER_KEY) {
                Some(Value::String(s)) => s.trim().to_string(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            if identifier.is_empty() {
                return None;
            }
            match resolve_best_share(record) {
                Some(best_share) => Some(WorkerSample {
                    identifier,
                    best_share,
                }),
                None => {
                    tracing::debug!("Skipping worker '{}': no usable best share", identifier);
                    None
                }
            }
        })
        .collect()
}

/// Number of entries in the worker list, regardless of their contents
pub fn worker_count(workers: &JsonObject) -> usize {
    workers
        .get(WORKERS_KEY)
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0)
}
