//! Scan loop: list symbols, evaluate each one, alert once per crossover candle.
//!
//! One pass walks the symbol list sequentially:
//!
//! ```text
//! IDLE → LISTING → PER_SYMBOL_SCAN (loop) → SLEEP → IDLE
//! ```
//!
//! Failures inside a pass are reported as tagged outcomes and never stop the
//! loop.

use scanner_alerts::{format_alert_message, AlertSink};
use scanner_core::{Interval, QuoteCurrency, Symbol, MIN_CANDLES};
use scanner_engine::{compute_macd, AlertDeduplicator, CrossoverDetector, MacdParams};
use scanner_feeds::{FeedError, MarketData};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to list symbols: {0}")]
    Listing(#[from] FeedError),
}

/// Pass-level parameters.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub interval: Interval,
    pub kline_limit: u32,
    pub quote: QuoteCurrency,
    pub macd: MacdParams,
    pub symbol_pause: Duration,
    pub scan_cadence: Duration,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            interval: Interval::Min15,
            kline_limit: 200,
            quote: QuoteCurrency::USDT,
            macd: MacdParams::default(),
            symbol_pause: Duration::from_millis(150),
            scan_cadence: Duration::from_secs(60),
        }
    }
}

/// Result of scanning one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolOutcome {
    /// Exchange returned no candles.
    NoData,
    /// Fewer than `MIN_CANDLES` candles.
    InsufficientData { len: usize },
    /// Candle fetch failed after retries.
    FetchFailed,
    NoCrossover,
    /// Crossover already alerted for this candle.
    Suppressed,
    Alerted { delivered: bool },
}

/// Per-pass counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub symbols: usize,
    pub alerted: usize,
    pub delivered: usize,
    pub suppressed: usize,
    pub no_crossover: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl PassSummary {
    fn record(&mut self, outcome: SymbolOutcome) {
        self.symbols += 1;
        match outcome {
            SymbolOutcome::NoData | SymbolOutcome::InsufficientData { .. } => self.skipped += 1,
            SymbolOutcome::FetchFailed => self.failed += 1,
            SymbolOutcome::NoCrossover => self.no_crossover += 1,
            SymbolOutcome::Suppressed => self.suppressed += 1,
            SymbolOutcome::Alerted { delivered } => {
                self.alerted += 1;
                if delivered {
                    self.delivered += 1;
                }
            }
        }
    }
}

/// Owns the scan state: market data source, notifier, detector and the
/// alert memory.
pub struct Scanner<M, N> {
    market: M,
    notifier: N,
    detector: CrossoverDetector,
    dedup: AlertDeduplicator,
    settings: ScanSettings,
}

impl<M: MarketData, N: AlertSink> Scanner<M, N> {
    pub fn new(market: M, notifier: N, detector: CrossoverDetector, settings: ScanSettings) -> Self {
        Self {
            market,
            notifier,
            detector,
            dedup: AlertDeduplicator::new(),
            settings,
        }
    }

    pub fn market(&self) -> &M {
        &self.market
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn dedup(&self) -> &AlertDeduplicator {
        &self.dedup
    }

    /// Fetch, evaluate and, on a new crossover, alert for one symbol.
    pub async fn scan_symbol(&mut self, symbol: &Symbol) -> SymbolOutcome {
        let candles = match self
            .market
            .get_candles(symbol, self.settings.interval, self.settings.kline_limit)
            .await
        {
            Ok(Some(candles)) => candles,
            Ok(None) => return SymbolOutcome::NoData,
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "Failed to fetch candles");
                return SymbolOutcome::FetchFailed;
            }
        };

        if candles.len() < MIN_CANDLES {
            debug!(symbol = %symbol, len = candles.len(), "Not enough candles");
            return SymbolOutcome::InsufficientData { len: candles.len() };
        }

        let samples = compute_macd(&candles, self.settings.macd);
        let Some(crossover) = self.detector.evaluate(&candles, &samples) else {
            return SymbolOutcome::NoCrossover;
        };

        if !self.dedup.should_alert(symbol, crossover.open_time) {
            debug!(symbol = %symbol, open_time = %crossover.open_time, "Crossover already alerted");
            return SymbolOutcome::Suppressed;
        }

        let message = format_alert_message(
            symbol,
            crossover.close,
            crossover.volume_usd,
            self.settings.quote,
            crossover.open_time,
        );
        info!(
            symbol = %symbol,
            price = crossover.close,
            volume_usd = crossover.volume_usd,
            macd = crossover.sample.macd,
            signal = crossover.sample.signal,
            open_time = %crossover.open_time,
            "🚀 Bullish MACD crossover"
        );

        let delivered = self.notifier.notify(&message).await;
        self.dedup.record(symbol, crossover.open_time);

        SymbolOutcome::Alerted { delivered }
    }

    /// One full pass over the symbol list.
    pub async fn run_pass(&mut self) -> Result<PassSummary, ScanError> {
        let symbols = self.market.list_symbols(false).await?;
        info!(
            quote = %self.settings.quote,
            symbols = symbols.len(),
            "Scanning spot pairs"
        );

        let mut summary = PassSummary::default();
        for symbol in symbols.iter() {
            let outcome = self.scan_symbol(symbol).await;
            summary.record(outcome);

            if !self.settings.symbol_pause.is_zero() {
                tokio::time::sleep(self.settings.symbol_pause).await;
            }
        }

        Ok(summary)
    }

    /// Run passes forever, sleeping `scan_cadence` after each one.
    pub async fn run(&mut self) {
        info!(
            interval = %self.settings.interval,
            cadence_secs = self.settings.scan_cadence.as_secs(),
            "Starting scan loop"
        );

        loop {
            let started = Instant::now();
            match self.run_pass().await {
                Ok(summary) => info!(
                    symbols = summary.symbols,
                    alerted = summary.alerted,
                    delivered = summary.delivered,
                    suppressed = summary.suppressed,
                    skipped = summary.skipped,
                    failed = summary.failed,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Pass complete"
                ),
                Err(e) => error!(error = %e, "Pass failed"),
            }

            tokio::time::sleep(self.settings.scan_cadence).await;
        }
    }
}
