//! BDD step definitions for per-cycle configuration and fetch failures

use std::sync::atomic::Ordering;

use cucumber::{given, then};

use ath_watcher::watcher::CycleOutcome;

use crate::world::{base_url, parse_chain, set_base_url, WatcherWorld, WEBHOOK_URL};

#[given(expr = "a configuration without a {word} base URL")]
fn config_without_chain(world: &mut WatcherWorld, tag: String) {
    let missing = parse_chain(&tag);
    for chain in ath_watcher::Chain::ALL {
        if chain != missing {
            set_base_url(&mut world.config, chain, base_url(chain));
        }
    }
    world.config.discord_webhook = WEBHOOK_URL.to_string();
    world.write_config();
}

#[given("no configuration document exists")]
fn no_config(world: &mut WatcherWorld) {
    let _ = std::fs::remove_file(world.config_path());
}

#[given("the pool is unreachable")]
fn pool_unreachable(world: &mut WatcherWorld) {
    world.http.unreachable.store(true, Ordering::SeqCst);
}

#[given("the pool is reachable again")]
fn pool_reachable(world: &mut WatcherWorld) {
    world.http.unreachable.store(false, Ordering::SeqCst);
}

#[then("the cycle is reported as disabled")]
fn cycle_disabled(world: &mut WatcherWorld) {
    assert!(
        matches!(world.outcomes.last(), Some(CycleOutcome::Disabled)),
        "{:?}",
        world.outcomes.last()
    );
}

#[then("the cycle is reported as failed")]
fn cycle_failed(world: &mut WatcherWorld) {
    assert!(
        matches!(world.outcomes.last(), Some(CycleOutcome::Failed(_))),
        "{:?}",
        world.outcomes.last()
    );
}

#[then("no pool request was made")]
fn no_pool_request(world: &mut WatcherWorld) {
    let gets = world.http.gets.lock().unwrap();
    assert!(gets.is_empty(), "unexpected requests: {gets:?}");
}

#[then(expr = "no {word} history file exists")]
fn no_history_file(world: &mut WatcherWorld, tag: String) {
    let path = world.store().path_for(parse_chain(&tag));
    assert!(!path.exists(), "{path:?} exists");
}
