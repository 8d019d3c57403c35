//! Cleared Event Model
//!
//! Shapes of the events handed to a logging control by the host engine once
//! orders and markets reach final settlement.
//!
//! Every field the engine may leave unset is an `Option`. Whether a field is
//! actually required for a ledger row is decided by the field mapper, so a
//! single incomplete order can be rejected without failing the whole batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Enumerations
// =============================================================================

/// Order side (back = buy the outcome, lay = sell it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Back,
    Lay,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Back => "BACK",
            Side::Lay => "LAY",
        }
    }
}

/// What happens to the unmatched part of an order at the in-play turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersistenceType {
    /// Cancel at turn in-play
    Lapse,
    /// Keep in the book when the market turns in-play
    Persist,
    /// Convert to a market-on-close bet at turn in-play
    MarketOnClose,
}

impl PersistenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersistenceType::Lapse => "LAPSE",
            PersistenceType::Persist => "PERSIST",
            PersistenceType::MarketOnClose => "MARKET_ON_CLOSE",
        }
    }
}

/// Time-in-force for limit orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInForce {
    FillOrKill,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::FillOrKill => "FILL_OR_KILL",
        }
    }
}

/// Target the size of a limit order is expressed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BetTargetType {
    Payout,
    BackersProfit,
}

impl BetTargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BetTargetType::Payout => "PAYOUT",
            BetTargetType::BackersProfit => "BACKERS_PROFIT",
        }
    }
}

/// Lifecycle status of a trade (the parent of one or more orders).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeStatus {
    Pending,
    Live,
    Complete,
}

impl TradeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Pending => "Pending",
            TradeStatus::Live => "Live",
            TradeStatus::Complete => "Complete",
        }
    }
}

/// Lifecycle status of a single order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Executable,
    ExecutionComplete,
    Expired,
    Violation,
    Cancelling,
    Updating,
    Replacing,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Executable => "Executable",
            OrderStatus::ExecutionComplete => "Execution complete",
            OrderStatus::Expired => "Expired",
            OrderStatus::Violation => "Violation",
            OrderStatus::Cancelling => "Cancelling",
            OrderStatus::Updating => "Updating",
            OrderStatus::Replacing => "Replacing",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(Side, PersistenceType, TimeInForce, BetTargetType, TradeStatus, OrderStatus);

// =============================================================================
// Order Type Payload
// =============================================================================

/// Order-type payload. Each variant carries only the fields it defines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "order_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Limit(LimitOrder),
    LimitOnClose(LimitOnCloseOrder),
    MarketOnClose(MarketOnCloseOrder),
}

impl OrderType {
    pub fn name(&self) -> &'static str {
        match self {
            OrderType::Limit(_) => "LIMIT",
            OrderType::LimitOnClose(_) => "LIMIT_ON_CLOSE",
            OrderType::MarketOnClose(_) => "MARKET_ON_CLOSE",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitOrder {
    pub price: Option<f64>,
    pub size: Option<f64>,
    pub persistence_type: Option<PersistenceType>,
    pub time_in_force: Option<TimeInForce>,
    pub min_fill_size: Option<f64>,
    pub bet_target_type: Option<BetTargetType>,
    pub bet_target_size: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitOnCloseOrder {
    pub price: Option<f64>,
    pub liability: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketOnCloseOrder {
    pub liability: Option<f64>,
}

// =============================================================================
// Cleared Orders
// =============================================================================

/// The trade an order belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trade {
    pub id: Option<String>,
    /// Name of the owning strategy.
    pub strategy: Option<String>,
    pub market_notes: Option<String>,
    pub notes: Option<String>,
    pub status: Option<TradeStatus>,
    /// Every status the trade has passed through, oldest first.
    pub status_log: Vec<TradeStatus>,
}

/// A settled order as reported by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearedOrder {
    pub id: Option<String>,
    pub bet_id: Option<String>,
    pub customer_order_ref: Option<String>,
    pub trade: Option<Trade>,
    pub date_time_created: Option<DateTime<Utc>>,
    /// Placement time from the exchange response, if the order was ever placed.
    pub date_time_placed: Option<DateTime<Utc>>,
    /// Seconds between creation and the order becoming executable.
    pub elapsed_seconds_executable: Option<f64>,
    pub market_id: Option<String>,
    pub selection_id: Option<u64>,
    pub handicap: f64,
    pub side: Option<Side>,
    pub order_type: Option<OrderType>,
    pub average_price_matched: Option<f64>,
    pub size_matched: Option<f64>,
    pub size_remaining: Option<f64>,
    pub size_cancelled: Option<f64>,
    pub size_lapsed: Option<f64>,
    pub size_voided: Option<f64>,
    pub profit: Option<f64>,
    pub runner_status: Option<String>,
    pub notes: Option<String>,
    pub status: Option<OrderStatus>,
    /// Every status the order has passed through, oldest first.
    pub status_log: Vec<OrderStatus>,
    pub violation_msg: Option<String>,
}

// =============================================================================
// Cleared Markets
// =============================================================================

/// Per-market settlement result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSettlement {
    pub market_id: Option<String>,
    pub bet_count: u32,
    pub profit: f64,
    pub commission: f64,
}

/// Container the engine emits when one or more markets are cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearedMarkets {
    pub markets: Vec<MarketSettlement>,
}

// =============================================================================
// Dispatch
// =============================================================================

/// Control event delivered to a logging control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoggingEvent {
    ClearedOrders { orders: Vec<ClearedOrder> },
    ClearedMarkets(ClearedMarkets),
}

impl LoggingEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            LoggingEvent::ClearedOrders { .. } => "cleared_orders",
            LoggingEvent::ClearedMarkets(_) => "cleared_markets",
        }
    }
}
