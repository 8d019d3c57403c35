//! Ledger Schemas
//!
//! Column layout of the orders and markets ledgers. Columns are identified by
//! position, so the field order of [`OrderRecord`] and [`MarketSummaryRecord`]
//! must match [`ORDER_FIELDNAMES`] and [`MARKET_FIELDNAMES`] exactly. Absent
//! values are written as empty cells, never dropped.

use serde::{Deserialize, Serialize};

/// Orders ledger header, in column order.
pub const ORDER_FIELDNAMES: [&str; 36] = [
    "order_id",
    "bet_id",
    "customer_order_ref",
    "strategy_name",
    "date_time_created",
    "date_time_placed",
    "elapsed_seconds_executable",
    "market_id",
    "selection_id",
    "handicap",
    "trade_id",
    "side",
    "price",
    "liability",
    "size",
    "persistence_type",
    "time_in_force",
    "min_fill_size",
    "bet_target_type",
    "bet_target_size",
    "average_price_matched",
    "size_matched",
    "size_remaining",
    "size_cancelled",
    "size_lapsed",
    "size_voided",
    "profit",
    "runner_status",
    "market_notes",
    "trade_notes",
    "order_notes",
    "trade_status",
    "trade_status_log",
    "order_status",
    "order_status_log",
    "violation_msg",
];

/// Markets ledger header, in column order.
pub const MARKET_FIELDNAMES: [&str; 4] = ["market_id", "bet_count", "profit", "commission"];

/// One row of the orders ledger.
///
/// An empty optional string (`Some("")`) and `None` both write an empty cell,
/// and an empty cell reads back as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    // identity
    pub order_id: String,
    pub bet_id: Option<String>,
    pub customer_order_ref: Option<String>,
    pub strategy_name: String,
    // timing
    pub date_time_created: String,
    pub date_time_placed: Option<String>,
    pub elapsed_seconds_executable: Option<f64>,
    // instrument / selection
    pub market_id: String,
    pub selection_id: u64,
    pub handicap: f64,
    pub trade_id: String,
    pub side: String,
    // order-type payload
    pub price: Option<f64>,
    pub liability: Option<f64>,
    pub size: Option<f64>,
    pub persistence_type: Option<String>,
    pub time_in_force: Option<String>,
    pub min_fill_size: Option<f64>,
    pub bet_target_type: Option<String>,
    pub bet_target_size: Option<f64>,
    // execution / outcome
    pub average_price_matched: Option<f64>,
    pub size_matched: Option<f64>,
    pub size_remaining: Option<f64>,
    pub size_cancelled: Option<f64>,
    pub size_lapsed: Option<f64>,
    pub size_voided: Option<f64>,
    pub profit: Option<f64>,
    pub runner_status: Option<String>,
    pub market_notes: Option<String>,
    pub trade_notes: Option<String>,
    pub order_notes: Option<String>,
    pub trade_status: Option<String>,
    pub trade_status_log: String,
    pub order_status: Option<String>,
    pub order_status_log: String,
    pub violation_msg: Option<String>,
}

/// One row of the markets ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummaryRecord {
    pub market_id: String,
    pub bet_count: u32,
    pub profit: f64,
    pub commission: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> OrderRecord {
        OrderRecord {
            order_id: "1".to_string(),
            bet_id: None,
            customer_order_ref: None,
            strategy_name: "s".to_string(),
            date_time_created: "2024-01-01 00:00:00".to_string(),
            date_time_placed: None,
            elapsed_seconds_executable: None,
            market_id: "1.2".to_string(),
            selection_id: 1,
            handicap: 0.0,
            trade_id: "t".to_string(),
            side: "BACK".to_string(),
            price: None,
            liability: None,
            size: None,
            persistence_type: None,
            time_in_force: None,
            min_fill_size: None,
            bet_target_type: None,
            bet_target_size: None,
            average_price_matched: None,
            size_matched: None,
            size_remaining: None,
            size_cancelled: None,
            size_lapsed: None,
            size_voided: None,
            profit: None,
            runner_status: None,
            market_notes: None,
            trade_notes: None,
            order_notes: None,
            trade_status: None,
            trade_status_log: String::new(),
            order_status: None,
            order_status_log: String::new(),
            violation_msg: None,
        }
    }

    fn serialized_header<T: Serialize>(record: &T) -> String {
        let mut bytes = Vec::new();
        {
            let mut wtr = csv::Writer::from_writer(&mut bytes);
            wtr.serialize(record).unwrap();
            wtr.flush().unwrap();
        }
        let text = String::from_utf8(bytes).unwrap();
        text.lines().next().unwrap().to_string()
    }

    #[test]
    fn test_order_record_fields_follow_header() {
        let record = sample_order();
        assert_eq!(serialized_header(&record), ORDER_FIELDNAMES.join(","));
    }

    #[test]
    fn test_empty_optional_string_reads_back_as_none() {
        let mut record = sample_order();
        record.bet_id = Some(String::new());
        record.order_notes = Some("kept".to_string());

        let mut bytes = Vec::new();
        {
            let mut wtr = csv::Writer::from_writer(&mut bytes);
            wtr.serialize(&record).unwrap();
            wtr.flush().unwrap();
        }

        let mut rdr = csv::Reader::from_reader(bytes.as_slice());
        let parsed: OrderRecord = rdr.deserialize().next().unwrap().unwrap();
        assert_eq!(parsed.bet_id, None);
        assert_eq!(parsed.order_notes.as_deref(), Some("kept"));
        assert_eq!(parsed.trade_status_log, "");
    }

    #[test]
    fn test_market_record_fields_follow_header() {
        let record = MarketSummaryRecord {
            market_id: "1.23".to_string(),
            bet_count: 4,
            profit: 12.5,
            commission: 0.6,
        };
        assert_eq!(serialized_header(&record), MARKET_FIELDNAMES.join(","));
    }
}
