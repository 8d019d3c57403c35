//! Ledger Exporter Library
//!
//! Persists cleared-order and cleared-market events emitted by a trading or
//! simulation engine into append-only CSV ledgers.
//! The binary in `main.rs` replays recorded event streams through the same
//! modules exported here.

pub mod config;
pub mod logging;
pub mod middleware;
pub mod recording;
pub mod replay;

pub use config::ExporterConfig;
pub use recording::{LoggingControl, LoggingEvent, RecordStore, RecordStoreConfig};
