//! Bullish MACD crossover detection.

use crate::indicator::IndicatorSample;
use chrono::{DateTime, Utc};
use scanner_core::Candle;
use serde::{Deserialize, Serialize};

/// Default minimum candle volume in quote currency.
pub const DEFAULT_MIN_VOLUME_USD: f64 = 500_000.0;

/// How the current candle's quote-currency volume is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VolumeBasis {
    /// Base volume times close price.
    #[default]
    CloseTimesVolume,
    /// Exchange-reported turnover.
    Turnover,
}

impl VolumeBasis {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "close_x_volume" | "close_times_volume" => Some(VolumeBasis::CloseTimesVolume),
            "turnover" => Some(VolumeBasis::Turnover),
            _ => None,
        }
    }

    pub fn volume_usd(self, candle: &Candle) -> f64 {
        match self {
            VolumeBasis::CloseTimesVolume => candle.volume_usd(),
            VolumeBasis::Turnover => candle.turnover,
        }
    }
}

/// True when macd moved from strictly below to strictly above the signal
/// line and the current volume meets the threshold.
#[inline]
pub fn detect(
    prev: &IndicatorSample,
    curr: &IndicatorSample,
    curr_volume_usd: f64,
    min_volume_usd: f64,
) -> bool {
    prev.macd < prev.signal && curr.macd > curr.signal && curr_volume_usd >= min_volume_usd
}

/// A fired crossover on the last candle of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossover {
    pub open_time: DateTime<Utc>,
    pub close: f64,
    pub volume_usd: f64,
    pub sample: IndicatorSample,
}

/// Detector configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossoverDetector {
    pub min_volume_usd: f64,
    pub volume_basis: VolumeBasis,
}

impl Default for CrossoverDetector {
    fn default() -> Self {
        Self {
            min_volume_usd: DEFAULT_MIN_VOLUME_USD,
            volume_basis: VolumeBasis::default(),
        }
    }
}

impl CrossoverDetector {
    pub fn new(min_volume_usd: f64, volume_basis: VolumeBasis) -> Self {
        Self {
            min_volume_usd,
            volume_basis,
        }
    }

    /// Check the last two samples of a series.
    ///
    /// `samples` must be index-aligned with `candles`. Returns `None` when
    /// fewer than two samples exist or the crossover does not fire.
    pub fn evaluate(&self, candles: &[Candle], samples: &[IndicatorSample]) -> Option<Crossover> {
        let (prev, curr) = match samples {
            [.., prev, curr] => (prev, curr),
            _ => return None,
        };
        let candle = candles.last()?;
        let volume_usd = self.volume_basis.volume_usd(candle);

        if detect(prev, curr, volume_usd, self.min_volume_usd) {
            Some(Crossover {
                open_time: candle.open_time,
                close: candle.close,
                volume_usd,
                sample: *curr,
            })
        } else {
            None
        }
    }
}
