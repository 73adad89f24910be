//! BDD step definitions for history persistence

use cucumber::{given, then, when};

use ath_watcher::history::History;

use crate::world::{parse_chain, WatcherWorld};

#[given(expr = "the {word} history file contains {string}")]
fn history_file_contains(world: &mut WatcherWorld, tag: String, content: String) {
    let path = world.store().path_for(parse_chain(&tag));
    std::fs::write(path, content).expect("write history");
}

#[given(expr = "a history with {string} at {int} and {string} at {int}")]
fn history_with(world: &mut WatcherWorld, a: String, a_value: u64, b: String, b_value: u64) {
    let history: History = [(a, a_value), (b, b_value)].into_iter().collect();
    world.saved_history = Some(history);
}

#[when(expr = "the {word} history is loaded")]
fn load_history(world: &mut WatcherWorld, tag: String) {
    world.loaded_history = Some(world.store().load(parse_chain(&tag)));
}

#[when(expr = "it is saved and reloaded for chain {word}")]
fn save_and_reload(world: &mut WatcherWorld, tag: String) {
    let chain = parse_chain(&tag);
    let history = world.saved_history.as_ref().expect("no history");
    world.store().save(chain, history).expect("save history");
    world.loaded_history = Some(world.store().load(chain));
}

#[then("the loaded history is empty")]
fn loaded_empty(world: &mut WatcherWorld) {
    assert!(world.loaded_history.as_ref().expect("not loaded").is_empty());
}

#[then("the loaded history equals the saved one")]
fn loaded_equals_saved(world: &mut WatcherWorld) {
    assert_eq!(world.loaded_history, world.saved_history);
}

#[given(expr = "the {word} history already records {int} for {string}")]
fn history_already_records(world: &mut WatcherWorld, tag: String, value: u64, identifier: String) {
    let history: History = [(identifier, value)].into_iter().collect();
    world
        .store()
        .save(parse_chain(&tag), &history)
        .expect("save history");
}
