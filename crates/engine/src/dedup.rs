//! Per-symbol alert deduplication keyed on candle open time.

use chrono::{DateTime, Utc};
use scanner_core::Symbol;
use std::collections::HashMap;

/// Remembers the open time of the last alerted candle for each symbol.
///
/// Owned by a single scanner; `should_alert` followed by `record` is not
/// atomic and must not be shared across concurrent scans.
#[derive(Debug, Default)]
pub struct AlertDeduplicator {
    last_alerted: HashMap<Symbol, DateTime<Utc>>,
}

impl AlertDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True unless an alert was already recorded for this exact candle.
    pub fn should_alert(&self, symbol: &Symbol, open_time: DateTime<Utc>) -> bool {
        self.last_alerted.get(symbol) != Some(&open_time)
    }

    /// Record that `symbol` was alerted for the candle opening at `open_time`.
    pub fn record(&mut self, symbol: &Symbol, open_time: DateTime<Utc>) {
        self.last_alerted.insert(symbol.clone(), open_time);
    }

    pub fn last_alerted(&self, symbol: &Symbol) -> Option<DateTime<Utc>> {
        self.last_alerted.get(symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.last_alerted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_alerted.is_empty()
    }
}
