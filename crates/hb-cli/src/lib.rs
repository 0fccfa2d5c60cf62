//! Healing Buds command-line front end
//!
//! Drives the region gate from the terminal. The two browser storage scopes
//! are JSON files under `--state-dir`: `durable.json` plays local storage and
//! `session.json` plays session storage. Delete `session.json` to simulate a
//! new tab.

pub mod cli;
pub mod commands;
pub mod file_store;

pub use file_store::{FileStore, StoreError};
