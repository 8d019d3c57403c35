//! Market Middleware
//!
//! Hooks run against a market before simulation starts. Middleware enriches
//! the in-memory market; it never writes to the ledgers.

pub mod catalogue;

pub use catalogue::{
    CatalogueConfig, MarketCatalogue, MarketCatalogueMiddleware, RunnerCatalogue,
};

use anyhow::Result;

/// In-memory market handed to middleware.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Market {
    pub market_id: String,
    /// Reference metadata, when a catalogue entry was found.
    pub market_catalogue: Option<MarketCatalogue>,
}

impl Market {
    pub fn new(market_id: impl Into<String>) -> Self {
        Self {
            market_id: market_id.into(),
            market_catalogue: None,
        }
    }
}

pub trait Middleware {
    /// Called once when a market is added to the simulation.
    fn add_market(&self, market: &mut Market) -> Result<()>;
}
