//! Logging Control Interface
//!
//! The seam between the host engine and anything that persists cleared
//! events. The engine hands over one [`LoggingEvent`] at a time, on a single
//! dispatch thread.

use crate::recording::error::LedgerError;
use crate::recording::events::{ClearedMarkets, ClearedOrder, LoggingEvent};
use crate::recording::report::BatchReport;

pub trait LoggingControl {
    fn name(&self) -> &'static str;

    fn process_cleared_orders(
        &mut self,
        orders: &[ClearedOrder],
    ) -> Result<BatchReport, LedgerError>;

    fn process_cleared_markets(
        &mut self,
        cleared: &ClearedMarkets,
    ) -> Result<BatchReport, LedgerError>;

    /// Routes an event to the matching handler.
    fn process_event(&mut self, event: &LoggingEvent) -> Result<BatchReport, LedgerError> {
        match event {
            LoggingEvent::ClearedOrders { orders } => self.process_cleared_orders(orders),
            LoggingEvent::ClearedMarkets(cleared) => self.process_cleared_markets(cleared),
        }
    }
}
