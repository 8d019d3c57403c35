//! Record Store
//!
//! Owns the orders ledger and the optional markets ledger for the lifetime of
//! the process.
//!
//! - Construction creates parent directories and writes each ledger's header,
//!   truncating any existing file, unless append mode is on and the file
//!   already exists.
//! - Each handler call opens the target ledger once, writes every row that
//!   maps cleanly in batch order, and flushes before returning. A record that
//!   fails to map is logged and reported, never written, and never stops the
//!   rest of the batch.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::recording::control::LoggingControl;
use crate::recording::error::{LedgerError, RecordError};
use crate::recording::events::{ClearedMarkets, ClearedOrder};
use crate::recording::mapper::{map_market, map_order};
use crate::recording::report::{BatchReport, RecordFailure};
use crate::recording::schema::{MARKET_FIELDNAMES, ORDER_FIELDNAMES};

// =============================================================================
// Configuration
// =============================================================================

/// Where the ledgers live and whether existing files are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordStoreConfig {
    pub orders_file: PathBuf,
    /// Market summaries are only logged when this is unset.
    #[serde(default)]
    pub markets_file: Option<PathBuf>,
    /// Keep existing ledgers instead of recreating them at startup.
    #[serde(default)]
    pub append_to_logs: bool,
}

impl RecordStoreConfig {
    pub fn new(orders_file: impl Into<PathBuf>) -> Self {
        Self {
            orders_file: orders_file.into(),
            markets_file: None,
            append_to_logs: false,
        }
    }

    pub fn with_markets_file(mut self, markets_file: impl Into<PathBuf>) -> Self {
        self.markets_file = Some(markets_file.into());
        self
    }

    pub fn with_append(mut self, append_to_logs: bool) -> Self {
        self.append_to_logs = append_to_logs;
        self
    }
}

// =============================================================================
// Ledger File Helpers
// =============================================================================

fn ensure_parent_dir(path: &Path) -> Result<(), LedgerError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| LedgerError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}

fn write_header(
    writer: &mut csv::Writer<File>,
    path: &Path,
    fieldnames: &[&str],
) -> Result<(), LedgerError> {
    writer
        .write_record(fieldnames)
        .map_err(|source| LedgerError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

fn flush(writer: &mut csv::Writer<File>, path: &Path) -> Result<(), LedgerError> {
    writer.flush().map_err(|source| LedgerError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Creates (or truncates) the ledger and writes its header, unless append mode
/// keeps an existing file. Returns whether a fresh header was written.
fn init_ledger(path: &Path, fieldnames: &[&str], append: bool) -> Result<bool, LedgerError> {
    ensure_parent_dir(path)?;

    if append && path.exists() {
        debug!(path = %path.display(), "Keeping existing ledger");
        return Ok(false);
    }

    let file = File::create(path).map_err(|source| LedgerError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    write_header(&mut writer, path, fieldnames)?;
    flush(&mut writer, path)?;

    debug!(path = %path.display(), columns = fieldnames.len(), "Ledger initialised");
    Ok(true)
}

/// Opens a ledger for appending. A ledger found empty (e.g. removed since
/// startup) gets its header back before any row.
fn open_for_append(path: &Path, fieldnames: &[&str]) -> Result<csv::Writer<File>, LedgerError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LedgerError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let needs_header = file
        .metadata()
        .map_err(|source| LedgerError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .len()
        == 0;

    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    if needs_header {
        warn!(path = %path.display(), "Ledger was empty, rewriting header");
        write_header(&mut writer, path, fieldnames)?;
    }
    Ok(writer)
}

// =============================================================================
// Record Store
// =============================================================================

/// File-backed logging control for cleared orders and markets.
#[derive(Debug)]
pub struct RecordStore {
    config: RecordStoreConfig,
}

impl RecordStore {
    pub const NAME: &'static str = "FILE_LOGGING_CONTROL";

    /// Prepares both ledgers. Directory or file failures here are fatal and
    /// returned to the caller.
    pub fn new(config: RecordStoreConfig) -> Result<Self, LedgerError> {
        let created = init_ledger(&config.orders_file, &ORDER_FIELDNAMES, config.append_to_logs)?;
        info!(
            path = %config.orders_file.display(),
            fresh = created,
            "Orders ledger ready"
        );

        if let Some(markets_file) = &config.markets_file {
            let created = init_ledger(markets_file, &MARKET_FIELDNAMES, config.append_to_logs)?;
            info!(
                path = %markets_file.display(),
                fresh = created,
                "Markets ledger ready"
            );
        }

        Ok(Self { config })
    }

    pub fn config(&self) -> &RecordStoreConfig {
        &self.config
    }

    pub fn orders_file(&self) -> &Path {
        &self.config.orders_file
    }

    pub fn markets_file(&self) -> Option<&Path> {
        self.config.markets_file.as_deref()
    }

    /// Appends one row per cleanly-mapped order, in batch order.
    ///
    /// An empty batch touches nothing and logs nothing.
    pub fn handle_cleared_orders(
        &mut self,
        orders: &[ClearedOrder],
    ) -> Result<BatchReport, LedgerError> {
        let mut report = BatchReport::new(orders.len());
        if orders.is_empty() {
            return Ok(report);
        }

        let path = self.config.orders_file.as_path();
        let mut writer = open_for_append(path, &ORDER_FIELDNAMES)?;

        for (index, order) in orders.iter().enumerate() {
            let outcome = map_order(order)
                .map_err(RecordError::from)
                .and_then(|record| writer.serialize(&record).map_err(RecordError::from));

            match outcome {
                Ok(()) => report.written += 1,
                Err(e) => {
                    error!(order = ?order, error = %e, "Failed to record cleared order");
                    report.failures.push(RecordFailure {
                        index,
                        key: order.id.clone(),
                        error: e,
                    });
                }
            }
        }

        flush(&mut writer, path)?;

        info!(
            order_count = orders.len(),
            written = report.written,
            failed = report.failed(),
            "Orders updated"
        );
        Ok(report)
    }

    /// Logs every settlement and, with a markets ledger configured, appends
    /// one summary row per market.
    pub fn handle_cleared_markets(
        &mut self,
        cleared: &ClearedMarkets,
    ) -> Result<BatchReport, LedgerError> {
        let mut report = BatchReport::new(cleared.markets.len());
        if cleared.markets.is_empty() {
            return Ok(report);
        }

        let mut ledger = match &self.config.markets_file {
            Some(path) => Some((path.as_path(), open_for_append(path, &MARKET_FIELDNAMES)?)),
            None => None,
        };

        for (index, settlement) in cleared.markets.iter().enumerate() {
            info!(
                market_id = settlement.market_id.as_deref().unwrap_or_default(),
                bet_count = settlement.bet_count,
                profit = settlement.profit,
                commission = settlement.commission,
                "Cleared market"
            );

            let record = match map_market(settlement) {
                Ok(record) => record,
                Err(e) => {
                    error!(market = ?settlement, error = %e, "Failed to record cleared market");
                    report.failures.push(RecordFailure {
                        index,
                        key: settlement.market_id.clone(),
                        error: e.into(),
                    });
                    continue;
                }
            };

            if let Some((_, writer)) = ledger.as_mut() {
                match writer.serialize(&record) {
                    Ok(()) => report.written += 1,
                    Err(e) => {
                        error!(market = ?settlement, error = %e, "Failed to write market summary");
                        report.failures.push(RecordFailure {
                            index,
                            key: Some(record.market_id),
                            error: e.into(),
                        });
                    }
                }
            }
        }

        if let Some((path, mut writer)) = ledger {
            flush(&mut writer, path)?;
        }
        Ok(report)
    }
}

impl LoggingControl for RecordStore {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn process_cleared_orders(
        &mut self,
        orders: &[ClearedOrder],
    ) -> Result<BatchReport, LedgerError> {
        self.handle_cleared_orders(orders)
    }

    fn process_cleared_markets(
        &mut self,
        cleared: &ClearedMarkets,
    ) -> Result<BatchReport, LedgerError> {
        self.handle_cleared_markets(cleared)
    }
}
