//! Market data client with retry and a process-lifetime symbol cache.

use crate::bybit::{self, InstrumentInfo};
use crate::error::FeedError;
use crate::retry::RetryPolicy;
use crate::transport::HttpTransport;
use async_trait::async_trait;
use scanner_core::{Candle, Interval, QuoteCurrency, Symbol};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

/// Upper bound on instrument pages followed through `nextPageCursor`.
const MAX_INSTRUMENT_PAGES: usize = 20;

/// Source of symbols and candle series.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Tradable symbols in the configured quote currency.
    ///
    /// Served from cache after the first successful fetch unless
    /// `force_refresh` is set.
    async fn list_symbols(&self, force_refresh: bool) -> Result<Arc<Vec<Symbol>>, FeedError>;

    /// The most recent `limit` candles in ascending open-time order, or
    /// `None` when the exchange has no data for this symbol and interval.
    async fn get_candles(
        &self,
        symbol: &Symbol,
        interval: Interval,
        limit: u32,
    ) -> Result<Option<Vec<Candle>>, FeedError>;
}

/// Bybit spot market data client.
pub struct BybitClient<T> {
    transport: T,
    retry: RetryPolicy,
    quote: QuoteCurrency,
    symbols: RwLock<Option<Arc<Vec<Symbol>>>>,
}

impl<T: HttpTransport> BybitClient<T> {
    pub fn new(transport: T, retry: RetryPolicy, quote: QuoteCurrency) -> Self {
        Self {
            transport,
            retry,
            quote,
            symbols: RwLock::new(None),
        }
    }

    fn cached_symbols(&self) -> Option<Arc<Vec<Symbol>>> {
        self.symbols
            .read()
            .ok()
            .and_then(|guard| guard.clone())
            .filter(|symbols| !symbols.is_empty())
    }

    /// GET with retry, parsing the envelope's `result` with `parse`.
    ///
    /// A body that fails `parse` counts as a failed attempt.
    async fn get_result<R, F>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        mut parse: F,
    ) -> Result<R, FeedError>
    where
        F: FnMut(serde_json::Value) -> Result<R, FeedError>,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let err = match self
                .transport
                .get_json(path, query)
                .await
                .and_then(bybit::unwrap_envelope)
                .and_then(&mut parse)
            {
                Ok(parsed) => return Ok(parsed),
                Err(e) => e,
            };

            if !err.is_transient() {
                return Err(err);
            }
            if !self.retry.should_retry(attempt) {
                return Err(FeedError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }

            let mut delay = self.retry.calculate_delay_duration(attempt);
            if let Some(min_delay) = err.suggested_retry_delay() {
                delay = delay.max(min_delay);
            }
            debug!(
                path = path,
                attempt = attempt,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Request failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn fetch_instruments(&self) -> Result<Vec<InstrumentInfo>, FeedError> {
        let mut instruments = Vec::new();
        let mut cursor = String::new();

        for _ in 0..MAX_INSTRUMENT_PAGES {
            let mut query = vec![("category", bybit::SPOT_CATEGORY)];
            if !cursor.is_empty() {
                query.push(("cursor", cursor.as_str()));
            }

            let page = self
                .get_result(bybit::INSTRUMENTS_PATH, &query, bybit::parse_instruments_page)
                .await?;
            instruments.extend(page.list);

            if page.next_page_cursor.is_empty() || page.next_page_cursor == cursor {
                return Ok(instruments);
            }
            cursor = page.next_page_cursor;
        }

        warn!(pages = MAX_INSTRUMENT_PAGES, "Instrument list truncated at page limit");
        Ok(instruments)
    }
}

#[async_trait]
impl<T: HttpTransport> MarketData for BybitClient<T> {
    async fn list_symbols(&self, force_refresh: bool) -> Result<Arc<Vec<Symbol>>, FeedError> {
        if !force_refresh {
            if let Some(symbols) = self.cached_symbols() {
                return Ok(symbols);
            }
        }

        let instruments = self.fetch_instruments().await?;
        let symbols = Arc::new(bybit::filter_symbols(&instruments, self.quote));
        info!(
            quote = %self.quote,
            instruments = instruments.len(),
            symbols = symbols.len(),
            "Fetched spot symbol list"
        );

        if let Ok(mut cache) = self.symbols.write() {
            *cache = Some(Arc::clone(&symbols));
        }
        Ok(symbols)
    }

    async fn get_candles(
        &self,
        symbol: &Symbol,
        interval: Interval,
        limit: u32,
    ) -> Result<Option<Vec<Candle>>, FeedError> {
        let limit = limit.to_string();
        let query = [
            ("category", bybit::SPOT_CATEGORY),
            ("symbol", symbol.as_str()),
            ("interval", interval.as_api_str()),
            ("limit", limit.as_str()),
        ];

        self.get_result(bybit::KLINE_PATH, &query, bybit::parse_klines)
            .await
    }
}
