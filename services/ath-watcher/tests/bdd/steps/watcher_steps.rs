//! BDD step definitions for record detection and announcement

use std::sync::atomic::Ordering;

use cucumber::{given, then, when};

use ath_watcher::watcher::CycleOutcome;

use crate::world::{base_url, parse_chain, set_base_url, WatcherWorld, WEBHOOK_URL};

#[given(expr = "a {word} pool with a configured webhook")]
fn pool_with_webhook(world: &mut WatcherWorld, tag: String) {
    let chain = parse_chain(&tag);
    set_base_url(&mut world.config, chain, base_url(chain));
    world.config.discord_webhook = WEBHOOK_URL.to_string();
    world.write_config();
}

#[given(expr = "a {word} pool without a webhook")]
fn pool_without_webhook(world: &mut WatcherWorld, tag: String) {
    let chain = parse_chain(&tag);
    set_base_url(&mut world.config, chain, base_url(chain));
    world.config.discord_webhook = String::new();
    world.write_config();
}

#[given(expr = "the network difficulty is {int}")]
fn network_difficulty(world: &mut WatcherWorld, difficulty: u64) {
    *world.http.network_difficulty.lock().unwrap() = Some(difficulty);
}

#[given(expr = "the webhook responds with status {int}")]
fn webhook_status(world: &mut WatcherWorld, status: u16) {
    world.http.webhook_status.store(status, Ordering::SeqCst);
}

#[given(expr = "worker {string} reports a best share of {int}")]
fn worker_reports(world: &mut WatcherWorld, identifier: String, best_share: u64) {
    world.http.set_worker(&identifier, best_share);
}

#[when(expr = "worker {string} now reports a best share of {int}")]
fn worker_now_reports(world: &mut WatcherWorld, identifier: String, best_share: u64) {
    world.http.set_worker(&identifier, best_share);
}

#[when(expr = "the {word} watcher runs a cycle")]
async fn run_cycle(world: &mut WatcherWorld, tag: String) {
    let chain = parse_chain(&tag);
    let outcome = world.watcher_for(chain).run_cycle().await;
    world.outcomes.push(outcome);
}

#[then("no announcement was attempted")]
fn no_announcement(world: &mut WatcherWorld) {
    let posts = world.http.posts.lock().unwrap();
    assert!(posts.is_empty(), "unexpected posts: {posts:?}");
}

#[then(expr = "exactly {int} announcement was attempted")]
fn announcements_attempted(world: &mut WatcherWorld, count: usize) {
    assert_eq!(world.http.posts.lock().unwrap().len(), count);
}

#[then(expr = "the last announcement names worker {string} with best share {string}")]
fn last_announcement(world: &mut WatcherWorld, display: String, best: String) {
    let posts = world.http.posts.lock().unwrap();
    let embed = &posts.last().expect("no announcement")["embeds"][0];
    let fields = embed["fields"].as_array().expect("fields");
    let value_of = |name: &str| {
        fields
            .iter()
            .find(|f| f["name"] == name)
            .and_then(|f| f["value"].as_str())
            .unwrap_or_default()
            .to_string()
    };
    assert_eq!(value_of("🏷 Worker"), format!("**{}**", display));
    assert_eq!(value_of("🎯 Best Share"), format!("`{}`", best));
}

#[then(expr = "the last announcement shows progress {string}")]
fn last_announcement_progress(world: &mut WatcherWorld, percent: String) {
    let posts = world.http.posts.lock().unwrap();
    let fields = posts.last().expect("no announcement")["embeds"][0]["fields"].clone();
    let progress = fields
        .as_array()
        .and_then(|fields| fields.iter().find(|f| f["name"] == "📈 Progress to Block"))
        .and_then(|f| f["value"].as_str().map(str::to_string))
        .expect("no progress field");
    assert!(progress.contains(&percent), "{progress}");
}

#[then(expr = "the last cycle recorded an increase from {int} to {int}")]
fn last_cycle_increase(world: &mut WatcherWorld, previous: u64, current: u64) {
    match world.outcomes.last() {
        Some(CycleOutcome::Completed(report)) => {
            assert_eq!(report.records.len(), 1);
            assert_eq!(report.records[0].previous, previous);
            assert_eq!(report.records[0].current, current);
        }
        other => panic!("expected a completed cycle, got {other:?}"),
    }
}

#[then(expr = "the watcher's in-memory history holds {int} for {string}")]
fn in_memory_history(world: &mut WatcherWorld, value: u64, identifier: String) {
    let watcher = world.watcher.as_ref().expect("no watcher");
    assert_eq!(watcher.history().get(&identifier), Some(value));
}

#[then(expr = "the persisted {word} history holds {int} for {string}")]
fn persisted_history(world: &mut WatcherWorld, tag: String, value: u64, identifier: String) {
    let history = world.store().load(parse_chain(&tag));
    assert_eq!(history.get(&identifier), Some(value));
}
