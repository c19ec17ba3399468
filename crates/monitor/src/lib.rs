//! `rulwatch-monitor` library crate.
//!
//! Re-exports internal modules for integration testing. The binary
//! entrypoint lives in `main.rs`.

pub mod client;
pub mod config;
pub mod input;
pub mod poller;
pub mod render;
pub mod store;
