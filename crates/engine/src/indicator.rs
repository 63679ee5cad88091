//! Exponential moving averages and MACD.

use scanner_core::Candle;
use serde::{Deserialize, Serialize};

/// Exponential moving average, updated one observation at a time.
///
/// Non-adjusted recursive form:
///   bar 0  → value = price (seeded with the first observation)
///   bar 1+ → value = α·price + (1−α)·prev   where α = 2/(period+1)
#[derive(Debug, Clone)]
pub struct Ema {
    alpha: f64,
    value: Option<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            alpha: 2.0 / (period as f64 + 1.0),
            value: None,
        }
    }

    /// Feed one observation, return the current EMA value.
    pub fn update(&mut self, price: f64) -> f64 {
        let next = match self.value {
            None => price,
            Some(prev) => self.alpha * price + (1.0 - self.alpha) * prev,
        };
        self.value = Some(next);
        next
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

/// MACD periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

/// Indicator values derived from one candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSample {
    pub ema_fast: f64,
    pub ema_slow: f64,
    /// ema_fast − ema_slow
    pub macd: f64,
    /// EMA of macd over the signal period
    pub signal: f64,
}

/// MACD over a close-price series; one sample per input value.
pub fn compute_macd_closes(closes: &[f64], params: MacdParams) -> Vec<IndicatorSample> {
    let mut ema_fast = Ema::new(params.fast);
    let mut ema_slow = Ema::new(params.slow);
    let mut ema_signal = Ema::new(params.signal);

    closes
        .iter()
        .map(|&close| {
            let fast = ema_fast.update(close);
            let slow = ema_slow.update(close);
            let macd = fast - slow;
            let signal = ema_signal.update(macd);
            IndicatorSample {
                ema_fast: fast,
                ema_slow: slow,
                macd,
                signal,
            }
        })
        .collect()
}

/// MACD over the closes of a candle series.
pub fn compute_macd(candles: &[Candle], params: MacdParams) -> Vec<IndicatorSample> {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    compute_macd_closes(&closes, params)
}
