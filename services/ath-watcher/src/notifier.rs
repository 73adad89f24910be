//! Notifier trait, webhook message model and the two announcements

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::chain::Chain;
use crate::format::{format_magnitude, format_mining_number, progress_bar, DEFAULT_BAR_WIDTH};
use crate::pool_client::{network_difficulty, JsonObject};
use crate::status::ChainStatus;

const STATUS_COLOR: u32 = 0x5865F2;

/// A message accepted by the webhook sink
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
    pub fields: Vec<EmbedField>,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<Footer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    fn new(name: &str, value: String, inline: bool) -> Self {
        Self {
            name: name.to_string(),
            value,
            inline,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footer {
    pub text: String,
}

/// A detected increase of a worker's best share
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEvent {
    pub identifier: String,
    pub display_name: String,
    pub previous: u64,
    pub current: u64,
}

/// What happened to an announcement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    Sent,
    /// No sink configured; nothing was sent
    Skipped,
}

/// Trait for delivering messages to a sink
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Get the notifier type name (e.g. "discord")
    fn type_name(&self) -> &str;

    /// Deliver one message to `sink_url`, with no retry
    async fn send(&self, sink_url: &str, message: &WebhookMessage) -> crate::Result<()>;
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Build the announcement for a new worker best share
pub fn record_message(event: &RecordEvent, pool_summary: &JsonObject, chain: Chain) -> WebhookMessage {
    let difficulty = network_difficulty(pool_summary);
    let difficulty_text = difficulty
        .map(format_magnitude)
        .unwrap_or_else(|| "—".to_string());

    let mut fields = vec![
        EmbedField::new("🏷 Worker", format!("**{}**", event.display_name), true),
        EmbedField::new(
            "🎯 Best Share",
            format!("`{}`", format_mining_number(event.current)),
            true,
        ),
        EmbedField::new(
            "⏮ Previous Best",
            format!("`{}`", format_mining_number(event.previous)),
            true,
        ),
        EmbedField::new("⛏ Block Diff", format!("`{}`", difficulty_text), true),
    ];
    if let Some(difficulty) = difficulty {
        let ratio = event.current as f64 / difficulty;
        fields.push(EmbedField::new(
            "📈 Progress to Block",
            progress_bar(ratio, DEFAULT_BAR_WIDTH),
            false,
        ));
    }

    WebhookMessage {
        content: None,
        embeds: vec![Embed {
            title: format!("🔥 NEW WORKER ATH! ({})", chain),
            description: format!("**{}** just hit a new best share!", event.display_name),
            color: chain.color(),
            thumbnail: Some(Thumbnail {
                url: chain.thumbnail_url().to_string(),
            }),
            fields,
            timestamp: now_rfc3339(),
            footer: Some(Footer {
                text: chain.footer(),
            }),
        }],
    }
}

/// Build the combined pool status summary
pub fn status_message(statuses: &[ChainStatus]) -> WebhookMessage {
    if statuses.is_empty() {
        return WebhookMessage {
            content: Some("📊 Pool status: no chains are configured.".to_string()),
            embeds: Vec::new(),
        };
    }

    let fields = statuses
        .iter()
        .map(|status| {
            let value = match &status.error {
                Some(error) => format!("⚠ Unreachable: {}", error),
                None => format!(
                    "Workers: `{}`\nHashrate: `{}H/s`",
                    status.workers.unwrap_or(0),
                    status
                        .hashrate
                        .map(format_magnitude)
                        .unwrap_or_else(|| "—".to_string())
                ),
            };
            EmbedField::new(status.chain.tag(), value, true)
        })
        .collect();

    WebhookMessage {
        content: None,
        embeds: vec![Embed {
            title: "📊 Pool Status".to_string(),
            description: format!("Snapshot of {} configured chain(s)", statuses.len()),
            color: STATUS_COLOR,
            thumbnail: None,
            fields,
            timestamp: now_rfc3339(),
            footer: Some(Footer {
                text: "ATH Watcher".to_string(),
            }),
        }],
    }
}

/// Announce a new best share. An empty `sink_url` is a logged no-op.
pub async fn announce_record(
    notifier: &dyn Notifier,
    event: &RecordEvent,
    pool_summary: &JsonObject,
    chain: Chain,
    sink_url: &str,
) -> crate::Result<Delivery> {
    if sink_url.is_empty() {
        tracing::info!("[{}] Webhook not set, not announcing {}", chain, event.display_name);
        return Ok(Delivery::Skipped);
    }
    let message = record_message(event, pool_summary, chain);
    notifier.send(sink_url, &message).await?;
    Ok(Delivery::Sent)
}

/// Announce a status summary. An empty `sink_url` is a logged no-op.
pub async fn announce_status(
    notifier: &dyn Notifier,
    statuses: &[ChainStatus],
    sink_url: &str,
) -> crate::Result<Delivery> {
    if sink_url.is_empty() {
        tracing::info!("Webhook not set, not announcing status");
        return Ok(Delivery::Skipped);
    }
    notifier.send(sink_url, &status_message(statuses)).await?;
    Ok(Delivery::Sent)
}
