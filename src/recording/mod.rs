//! Cleared-Event Recording
//!
//! Turns cleared-order and cleared-market events into rows of two
//! append-only CSV ledgers.
//!
//! ```text
//!  host engine ──LoggingEvent──▶ LoggingControl::process_event
//!                                        │
//!                     ┌──────────────────┴──────────────────┐
//!                     ▼                                     ▼
//!          handle_cleared_orders                 handle_cleared_markets
//!                     │ map_order (per record)              │ map_market
//!                     ▼                                     ▼
//!              orders ledger (36 cols)             markets ledger (4 cols)
//! ```
//!
//! Per-record mapping failures are isolated: they are logged, collected in the
//! returned [`BatchReport`], and the remaining records are still written.

pub mod control;
pub mod error;
pub mod events;
pub mod mapper;
pub mod report;
pub mod schema;
pub mod store;


pub use control::LoggingControl;
pub use error::{LedgerError, MappingError, RecordError};
pub use events::{
    BetTargetType, ClearedMarkets, ClearedOrder, LimitOnCloseOrder, LimitOrder, LoggingEvent,
    MarketOnCloseOrder, MarketSettlement, OrderStatus, OrderType, PersistenceType, Side,
    TimeInForce, Trade, TradeStatus,
};
pub use mapper::{map_market, map_order};
pub use report::{BatchReport, RecordFailure};
pub use schema::{MarketSummaryRecord, OrderRecord, MARKET_FIELDNAMES, ORDER_FIELDNAMES};
pub use store::{RecordStore, RecordStoreConfig};
