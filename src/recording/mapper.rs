//! Field Mapper
//!
//! Flattens cleared events into ledger rows. Mapping is pure: the row is a
//! snapshot of the event at call time, so later mutation of the engine's
//! status histories cannot alter a row already handed to the writer.

use chrono::{DateTime, Timelike, Utc};

use crate::recording::error::MappingError;
use crate::recording::events::{ClearedOrder, MarketSettlement, OrderType};
use crate::recording::schema::{MarketSummaryRecord, OrderRecord};

/// Ledger timestamps are UTC. Whole seconds carry no fraction; anything else
/// always gets six fraction digits so a column never mixes precisions.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TIMESTAMP_FORMAT_MICROS: &str = "%Y-%m-%d %H:%M:%S%.6f";

pub fn render_timestamp(ts: &DateTime<Utc>) -> String {
    if ts.nanosecond() == 0 {
        ts.format(TIMESTAMP_FORMAT).to_string()
    } else {
        ts.format(TIMESTAMP_FORMAT_MICROS).to_string()
    }
}

/// Joins a status history into a single comma-separated cell.
pub fn render_status_log<'a, I>(log: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    log.into_iter().collect::<Vec<_>>().join(",")
}

fn required<T>(field: &'static str, value: Option<T>) -> Result<T, MappingError> {
    value.ok_or(MappingError::MissingField(field))
}

fn finite(field: &'static str, value: Option<f64>) -> Result<Option<f64>, MappingError> {
    match value {
        Some(v) if !v.is_finite() => Err(MappingError::InvalidValue {
            field,
            reason: format!("{} is not a finite number", v),
        }),
        other => Ok(other),
    }
}

// =============================================================================
// Order-Type Payload Columns
// =============================================================================

/// The eight payload columns. Columns the active variant does not define stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
struct PayloadColumns {
    price: Option<f64>,
    liability: Option<f64>,
    size: Option<f64>,
    persistence_type: Option<String>,
    time_in_force: Option<String>,
    min_fill_size: Option<f64>,
    bet_target_type: Option<String>,
    bet_target_size: Option<f64>,
}

impl PayloadColumns {
    fn from_order_type(order_type: &OrderType) -> Result<Self, MappingError> {
        let columns = match order_type {
            OrderType::Limit(limit) => Self {
                price: finite("price", limit.price)?,
                size: finite("size", limit.size)?,
                persistence_type: limit.persistence_type.map(|p| p.as_str().to_string()),
                time_in_force: limit.time_in_force.map(|t| t.as_str().to_string()),
                min_fill_size: finite("min_fill_size", limit.min_fill_size)?,
                bet_target_type: limit.bet_target_type.map(|t| t.as_str().to_string()),
                bet_target_size: finite("bet_target_size", limit.bet_target_size)?,
                ..Self::default()
            },
            OrderType::LimitOnClose(loc) => Self {
                price: finite("price", loc.price)?,
                liability: finite("liability", loc.liability)?,
                ..Self::default()
            },
            OrderType::MarketOnClose(moc) => Self {
                liability: finite("liability", moc.liability)?,
                ..Self::default()
            },
        };
        Ok(columns)
    }
}

// =============================================================================
// Mapping
// =============================================================================

/// Maps one cleared order to an orders-ledger row.
///
/// Fails with [`MappingError::MissingField`] when the order id, market id,
/// selection id, side, creation time, parent trade (with its id and strategy)
/// or order-type payload is absent, and with [`MappingError::InvalidValue`]
/// when a numeric column holds a non-finite value.
pub fn map_order(order: &ClearedOrder) -> Result<OrderRecord, MappingError> {
    let trade = required("trade", order.trade.as_ref())?;
    let order_type = required("order_type", order.order_type.as_ref())?;
    let payload = PayloadColumns::from_order_type(order_type)?;

    let handicap = finite("handicap", Some(order.handicap))?.unwrap_or_default();

    Ok(OrderRecord {
        order_id: required("id", order.id.clone())?,
        bet_id: order.bet_id.clone(),
        customer_order_ref: order.customer_order_ref.clone(),
        strategy_name: required("trade.strategy", trade.strategy.clone())?,
        date_time_created: render_timestamp(required(
            "date_time_created",
            order.date_time_created.as_ref(),
        )?),
        date_time_placed: order.date_time_placed.as_ref().map(render_timestamp),
        elapsed_seconds_executable: finite(
            "elapsed_seconds_executable",
            order.elapsed_seconds_executable,
        )?,
        market_id: required("market_id", order.market_id.clone())?,
        selection_id: required("selection_id", order.selection_id)?,
        handicap,
        trade_id: required("trade.id", trade.id.clone())?,
        side: required("side", order.side)?.as_str().to_string(),
        price: payload.price,
        liability: payload.liability,
        size: payload.size,
        persistence_type: payload.persistence_type,
        time_in_force: payload.time_in_force,
        min_fill_size: payload.min_fill_size,
        bet_target_type: payload.bet_target_type,
        bet_target_size: payload.bet_target_size,
        average_price_matched: finite("average_price_matched", order.average_price_matched)?,
        size_matched: finite("size_matched", order.size_matched)?,
        size_remaining: finite("size_remaining", order.size_remaining)?,
        size_cancelled: finite("size_cancelled", order.size_cancelled)?,
        size_lapsed: finite("size_lapsed", order.size_lapsed)?,
        size_voided: finite("size_voided", order.size_voided)?,
        profit: finite("profit", order.profit)?,
        runner_status: order.runner_status.clone(),
        market_notes: trade.market_notes.clone(),
        trade_notes: trade.notes.clone(),
        order_notes: order.notes.clone(),
        trade_status: trade.status.map(|s| s.as_str().to_string()),
        trade_status_log: render_status_log(trade.status_log.iter().map(|s| s.as_str())),
        order_status: order.status.map(|s| s.as_str().to_string()),
        order_status_log: render_status_log(order.status_log.iter().map(|s| s.as_str())),
        violation_msg: order.violation_msg.clone(),
    })
}

/// Maps one market settlement to a markets-ledger row.
pub fn map_market(settlement: &MarketSettlement) -> Result<MarketSummaryRecord, MappingError> {
    Ok(MarketSummaryRecord {
        market_id: required("market_id", settlement.market_id.clone())?,
        bet_count: settlement.bet_count,
        profit: finite("profit", Some(settlement.profit))?.unwrap_or_default(),
        commission: finite("commission", Some(settlement.commission))?.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::events::{
        BetTargetType, LimitOnCloseOrder, LimitOrder, MarketOnCloseOrder, OrderStatus,
        PersistenceType, Side, TimeInForce, Trade, TradeStatus,
    };
    use crate::recording::schema::ORDER_FIELDNAMES;
    use chrono::TimeZone;

    fn limit_order() -> ClearedOrder {
        ClearedOrder {
            id: Some("138524".to_string()),
            bet_id: Some("298767845".to_string()),
            customer_order_ref: Some("bt-138524".to_string()),
            trade: Some(Trade {
                id: Some("a1b2".to_string()),
                strategy: Some("LowestLayer".to_string()),
                market_notes: Some("2.1,2.12,2.08".to_string()),
                notes: Some("entry".to_string()),
                status: Some(TradeStatus::Complete),
                status_log: vec![TradeStatus::Pending, TradeStatus::Live, TradeStatus::Complete],
            }),
            date_time_created: Some(Utc.with_ymd_and_hms(2024, 3, 1, 13, 45, 7).unwrap()),
            date_time_placed: None,
            elapsed_seconds_executable: Some(0.25),
            market_id: Some("1.225812345".to_string()),
            selection_id: Some(47972),
            handicap: 0.0,
            side: Some(Side::Back),
            order_type: Some(OrderType::Limit(LimitOrder {
                price: Some(2.1),
                size: Some(10.0),
                persistence_type: Some(PersistenceType::Lapse),
                time_in_force: None,
                min_fill_size: None,
                bet_target_type: None,
                bet_target_size: None,
            })),
            average_price_matched: Some(2.1),
            size_matched: Some(10.0),
            size_remaining: Some(0.0),
            size_cancelled: Some(0.0),
            size_lapsed: Some(0.0),
            size_voided: Some(0.0),
            profit: Some(11.0),
            runner_status: Some("WINNER".to_string()),
            notes: None,
            status: Some(OrderStatus::ExecutionComplete),
            status_log: vec![
                OrderStatus::Pending,
                OrderStatus::Executable,
                OrderStatus::ExecutionComplete,
            ],
            violation_msg: None,
        }
    }

    #[test]
    fn test_limit_order_populates_only_limit_columns() {
        let record = map_order(&limit_order()).unwrap();
        assert_eq!(record.price, Some(2.1));
        assert_eq!(record.size, Some(10.0));
        assert_eq!(record.liability, None);
        assert_eq!(record.persistence_type.as_deref(), Some("LAPSE"));
        assert_eq!(record.time_in_force, None);
        assert_eq!(record.side, "BACK");
        assert_eq!(record.strategy_name, "LowestLayer");
        assert_eq!(record.trade_id, "a1b2");
    }

    #[test]
    fn test_limit_order_full_payload() {
        let mut order = limit_order();
        order.order_type = Some(OrderType::Limit(LimitOrder {
            price: Some(3.0),
            size: Some(5.0),
            persistence_type: Some(PersistenceType::Persist),
            time_in_force: Some(TimeInForce::FillOrKill),
            min_fill_size: Some(2.0),
            bet_target_type: Some(BetTargetType::BackersProfit),
            bet_target_size: Some(4.0),
        }));
        let record = map_order(&order).unwrap();
        assert_eq!(record.time_in_force.as_deref(), Some("FILL_OR_KILL"));
        assert_eq!(record.min_fill_size, Some(2.0));
        assert_eq!(record.bet_target_type.as_deref(), Some("BACKERS_PROFIT"));
        assert_eq!(record.bet_target_size, Some(4.0));
        assert_eq!(record.liability, None);
    }

    #[test]
    fn test_limit_on_close_and_market_on_close_columns() {
        let mut order = limit_order();
        order.order_type = Some(OrderType::LimitOnClose(LimitOnCloseOrder {
            price: Some(1.5),
            liability: Some(20.0),
        }));
        let record = map_order(&order).unwrap();
        assert_eq!(record.price, Some(1.5));
        assert_eq!(record.liability, Some(20.0));
        assert_eq!(record.size, None);
        assert_eq!(record.persistence_type, None);

        order.order_type = Some(OrderType::MarketOnClose(MarketOnCloseOrder {
            liability: Some(7.5),
        }));
        let record = map_order(&order).unwrap();
        assert_eq!(record.price, None);
        assert_eq!(record.size, None);
        assert_eq!(record.liability, Some(7.5));
    }

    #[test]
    fn test_status_logs_render_comma_joined() {
        let record = map_order(&limit_order()).unwrap();
        assert_eq!(record.trade_status.as_deref(), Some("Complete"));
        assert_eq!(record.trade_status_log, "Pending,Live,Complete");
        assert_eq!(record.order_status.as_deref(), Some("Execution complete"));
        assert_eq!(
            record.order_status_log,
            "Pending,Executable,Execution complete"
        );
    }

    #[test]
    fn test_empty_history_and_missing_status() {
        let mut order = limit_order();
        order.status = None;
        order.status_log.clear();
        if let Some(trade) = order.trade.as_mut() {
            trade.status = None;
            trade.status_log.clear();
        }
        let record = map_order(&order).unwrap();
        assert_eq!(record.order_status, None);
        assert_eq!(record.order_status_log, "");
        assert_eq!(record.trade_status, None);
        assert_eq!(record.trade_status_log, "");
    }

    #[test]
    fn test_timestamps_render_readable() {
        let mut order = limit_order();
        order.date_time_placed = Some(
            Utc.with_ymd_and_hms(2024, 3, 1, 13, 45, 8).unwrap()
                + chrono::Duration::microseconds(250_000),
        );
        let record = map_order(&order).unwrap();
        assert_eq!(record.date_time_created, "2024-03-01 13:45:07");
        assert_eq!(
            record.date_time_placed.as_deref(),
            Some("2024-03-01 13:45:08.250000")
        );
    }

    #[test]
    fn test_timestamp_fraction_width_is_fixed() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let half = base + chrono::Duration::milliseconds(500);
        let half_plus = half + chrono::Duration::microseconds(1);

        assert_eq!(render_timestamp(&base), "2024-01-01 00:00:00");
        assert_eq!(render_timestamp(&half), "2024-01-01 00:00:00.500000");
        assert_eq!(render_timestamp(&half_plus), "2024-01-01 00:00:00.500001");
    }

    #[test]
    fn test_missing_required_fields() {
        let mut order = limit_order();
        order.trade = None;
        assert_eq!(map_order(&order), Err(MappingError::MissingField("trade")));

        let mut order = limit_order();
        order.order_type = None;
        assert_eq!(map_order(&order), Err(MappingError::MissingField("order_type")));

        let mut order = limit_order();
        order.id = None;
        assert_eq!(map_order(&order), Err(MappingError::MissingField("id")));

        let mut order = limit_order();
        if let Some(trade) = order.trade.as_mut() {
            trade.strategy = None;
        }
        assert_eq!(
            map_order(&order),
            Err(MappingError::MissingField("trade.strategy"))
        );

        let mut order = limit_order();
        order.side = None;
        assert_eq!(map_order(&order), Err(MappingError::MissingField("side")));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let mut order = limit_order();
        order.profit = Some(f64::NAN);
        assert!(matches!(
            map_order(&order),
            Err(MappingError::InvalidValue { field: "profit", .. })
        ));
    }

    #[test]
    fn test_mapping_is_a_snapshot() {
        let mut order = limit_order();
        let record = map_order(&order).unwrap();
        order.status_log.push(OrderStatus::Expired);
        assert_eq!(
            record.order_status_log,
            "Pending,Executable,Execution complete"
        );
    }

    #[test]
    fn test_map_market() {
        let settlement = MarketSettlement {
            market_id: Some("1.23".to_string()),
            bet_count: 4,
            profit: 12.5,
            commission: 0.6,
        };
        let record = map_market(&settlement).unwrap();
        assert_eq!(record.market_id, "1.23");
        assert_eq!(record.bet_count, 4);

        let missing = MarketSettlement {
            market_id: None,
            ..settlement.clone()
        };
        assert_eq!(map_market(&missing), Err(MappingError::MissingField("market_id")));

        let infinite = MarketSettlement {
            commission: f64::INFINITY,
            ..settlement
        };
        assert!(map_market(&infinite).is_err());
    }

    #[test]
    fn test_schema_width() {
        assert_eq!(ORDER_FIELDNAMES.len(), 36);
    }
}
