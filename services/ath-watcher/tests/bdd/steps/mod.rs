//! BDD step definitions for the ATH watcher

pub mod config_steps;
pub mod history_steps;
pub mod watcher_steps;
