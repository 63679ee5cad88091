//! OHLCV candle samples.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Fewest candles a series needs before its indicator values are used:
/// 26-period slow EMA warm-up plus 9-period signal smoothing.
pub const MIN_CANDLES: usize = 35;

/// One OHLCV sample for a symbol at a fixed interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Candle start time
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Volume in base asset units
    pub volume: f64,
    /// Exchange-reported quote-currency turnover
    pub turnover: f64,
}

impl Candle {
    /// Create a candle from its fields.
    pub fn new(
        open_time: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        turnover: f64,
    ) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
            turnover,
        }
    }

    /// Quote-currency notional proxy: base volume times close.
    #[inline]
    pub fn volume_usd(&self) -> f64 {
        self.volume * self.close
    }

    /// Candle start as Unix milliseconds.
    pub fn open_time_ms(&self) -> i64 {
        self.open_time.timestamp_millis()
    }
}

/// Convert Unix milliseconds to a UTC instant.
pub fn datetime_from_millis(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

/// Sort a series by open time and drop repeated open times, keeping the
/// last occurrence of each.
pub fn normalize_series(candles: &mut Vec<Candle>) {
    candles.sort_by_key(|c| c.open_time);
    let mut out: Vec<Candle> = Vec::with_capacity(candles.len());
    for candle in candles.drain(..) {
        match out.last_mut() {
            Some(last) if last.open_time == candle.open_time => *last = candle,
            _ => out.push(candle),
        }
    }
    *candles = out;
}
