//! visitlog — tiny visitor logger library.
//!
//! This library exposes the log store, the mail notifier and the HTTP
//! router for integration testing. The binary entrypoint is in `main.rs`.

pub mod cli;
pub mod config;
pub mod notify;
pub mod server;
pub mod store;
