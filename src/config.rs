//! Exporter configuration
//!
//! Loaded from a TOML file, with CLI/env overrides applied on top.
//!
//! ```toml
//! [ledger]
//! orders_file = "out/orders.csv"
//! markets_file = "out/markets.csv"
//! append_to_logs = false
//!
//! [logging]
//! level = "info"
//! stream = true
//! logfile = "logs/exporter.log"
//!
//! [catalogue]
//! path = "data/catalogues"
//! extension = "gz"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::logging::LogConfig;
use crate::middleware::CatalogueConfig;
use crate::recording::RecordStoreConfig;

/// `[ledger]` section. `orders_file` may come from the CLI instead of the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSection {
    #[serde(default)]
    pub orders_file: Option<PathBuf>,
    #[serde(default)]
    pub markets_file: Option<PathBuf>,
    #[serde(default)]
    pub append_to_logs: bool,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExporterConfig {
    #[serde(default)]
    pub ledger: LedgerSection,
    #[serde(default)]
    pub logging: LogConfig,
    #[serde(default)]
    pub catalogue: Option<CatalogueConfig>,
}

impl ExporterConfig {
    /// Load from TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML config")
    }

    /// Load the file if given, otherwise start from defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply CLI overrides. `None` leaves the loaded value in place.
    pub fn apply_overrides(
        &mut self,
        orders_file: Option<PathBuf>,
        markets_file: Option<PathBuf>,
        append_to_logs: Option<bool>,
    ) {
        if let Some(path) = orders_file {
            self.ledger.orders_file = Some(path);
        }
        if let Some(path) = markets_file {
            self.ledger.markets_file = Some(path);
        }
        if let Some(append) = append_to_logs {
            self.ledger.append_to_logs = append;
        }
    }

    /// Settings for the record store. Fails when no orders file is configured.
    pub fn record_store_config(&self) -> Result<RecordStoreConfig> {
        let orders_file = self
            .ledger
            .orders_file
            .clone()
            .context("No orders file configured (set [ledger] orders_file or --orders-file)")?;

        Ok(RecordStoreConfig {
            orders_file,
            markets_file: self.ledger.markets_file.clone(),
            append_to_logs: self.ledger.append_to_logs,
        })
    }
}
