//! Market Catalogue Middleware
//!
//! Attaches reference metadata to a market from a per-market JSON document at
//! `{catalogue_path}/{market_id}.{extension}`. Documents may be gzipped
//! (detected from the gzip magic bytes) or plain. A missing document means no
//! enrichment is available and is not an error.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::middleware::{Market, Middleware};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

// =============================================================================
// Catalogue Document
// =============================================================================

/// Runner entry of a market catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerCatalogue {
    pub selection_id: u64,
    pub runner_name: Option<String>,
    #[serde(default)]
    pub handicap: f64,
    pub sort_priority: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reference metadata for one market. Keys not modelled here are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketCatalogue {
    pub market_id: String,
    pub market_name: Option<String>,
    pub market_start_time: Option<DateTime<Utc>>,
    pub total_matched: Option<f64>,
    #[serde(default)]
    pub runners: Vec<RunnerCatalogue>,
    pub event_type: Option<Value>,
    pub competition: Option<Value>,
    pub event: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MarketCatalogue {
    pub fn runner_name(&self, selection_id: u64) -> Option<&str> {
        self.runners
            .iter()
            .find(|r| r.selection_id == selection_id)
            .and_then(|r| r.runner_name.as_deref())
    }
}

// =============================================================================
// Configuration
// =============================================================================

fn default_extension() -> String {
    "gz".to_string()
}

/// `[catalogue]` section of the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueConfig {
    pub path: PathBuf,
    #[serde(default = "default_extension")]
    pub extension: String,
}

// =============================================================================
// Middleware
// =============================================================================

#[derive(Debug, Clone)]
pub struct MarketCatalogueMiddleware {
    catalogue_path: PathBuf,
    extension: String,
}

impl MarketCatalogueMiddleware {
    pub fn new(catalogue_path: impl Into<PathBuf>) -> Self {
        Self {
            catalogue_path: catalogue_path.into(),
            extension: default_extension(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn from_config(config: &CatalogueConfig) -> Self {
        Self::new(&config.path).with_extension(config.extension.as_str())
    }

    pub fn file_path(&self, market_id: &str) -> PathBuf {
        let extension = self.extension.trim_start_matches('.');
        if extension.is_empty() {
            self.catalogue_path.join(market_id)
        } else {
            self.catalogue_path
                .join(format!("{}.{}", market_id, extension))
        }
    }

    /// Reads the catalogue for `market_id`, or `None` when no document exists.
    pub fn load(&self, market_id: &str) -> Result<Option<MarketCatalogue>> {
        let path = self.file_path(market_id);
        if !path.exists() {
            debug!(market_id, path = %path.display(), "No market catalogue");
            return Ok(None);
        }

        let document = read_document(&path)?;
        let catalogue: MarketCatalogue = serde_json::from_str(&document)
            .with_context(|| format!("Failed to parse market catalogue: {:?}", path))?;
        Ok(Some(catalogue))
    }
}

fn read_document(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read market catalogue: {:?}", path))?;

    if bytes.starts_with(&GZIP_MAGIC) {
        let mut document = String::new();
        GzDecoder::new(bytes.as_slice())
            .read_to_string(&mut document)
            .with_context(|| format!("Failed to decompress market catalogue: {:?}", path))?;
        Ok(document)
    } else {
        String::from_utf8(bytes)
            .with_context(|| format!("Market catalogue is not UTF-8: {:?}", path))
    }
}

impl Middleware for MarketCatalogueMiddleware {
    fn add_market(&self, market: &mut Market) -> Result<()> {
        if let Some(catalogue) = self.load(&market.market_id)? {
            debug!(
                market_id = %market.market_id,
                runners = catalogue.runners.len(),
                "Market catalogue attached"
            );
            market.market_catalogue = Some(catalogue);
        }
        Ok(())
    }
}
