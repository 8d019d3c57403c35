//! Event Stream Replay
//!
//! Feeds newline-delimited JSON [`LoggingEvent`]s into a logging control, one
//! event per line. Lines that do not parse are logged and skipped; a ledger
//! failure stops the replay.

use std::io::BufRead;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::recording::{BatchReport, LoggingControl, LoggingEvent};

/// Totals for one replay run.
#[derive(Debug, Default)]
pub struct ReplaySummary {
    pub events: usize,
    pub skipped_lines: usize,
    pub orders: BatchReport,
    pub markets: BatchReport,
}

impl std::fmt::Display for ReplaySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Events replayed:   {}", self.events)?;
        writeln!(f, "Lines skipped:     {}", self.skipped_lines)?;
        writeln!(
            f,
            "Orders:            {} received, {} written, {} failed",
            self.orders.received,
            self.orders.written,
            self.orders.failed()
        )?;
        write!(
            f,
            "Markets:           {} received, {} written, {} failed",
            self.markets.received,
            self.markets.written,
            self.markets.failed()
        )
    }
}

pub fn replay_events<R: BufRead>(
    mut reader: R,
    control: &mut dyn LoggingControl,
) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();
    let control_name = control.name();
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("Failed to read event line {}", line_no + 1))?;
        if read == 0 {
            break;
        }
        line_no += 1;

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim(),
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping non-UTF-8 event line");
                summary.skipped_lines += 1;
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }

        let event: LoggingEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping malformed event line");
                summary.skipped_lines += 1;
                continue;
            }
        };

        let report = control
            .process_event(&event)
            .with_context(|| format!("{} failed on line {}", control_name, line_no))?;
        summary.events += 1;

        match event {
            LoggingEvent::ClearedOrders { .. } => summary.orders.absorb(report),
            LoggingEvent::ClearedMarkets(_) => summary.markets.absorb(report),
        }
    }

    info!(
        events = summary.events,
        skipped_lines = summary.skipped_lines,
        orders_written = summary.orders.written,
        markets_written = summary.markets.written,
        "Replay finished"
    );
    Ok(summary)
}
