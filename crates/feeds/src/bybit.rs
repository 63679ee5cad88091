//! Bybit v5 public market data: response envelope and payload parsing.
//!
//! Every v5 response is wrapped as
//! `{"retCode":0,"retMsg":"OK","result":{...},"time":1700000000000}`.
//! Only `retCode == 0` counts as success.

use crate::error::FeedError;
use scanner_core::{datetime_from_millis, normalize_series, Candle, QuoteCurrency, Symbol};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

pub const INSTRUMENTS_PATH: &str = "/v5/market/instruments-info";
pub const KLINE_PATH: &str = "/v5/market/kline";
pub const SPOT_CATEGORY: &str = "spot";

/// Instrument status for pairs open for trading.
pub const TRADING_STATUS: &str = "Trading";

/// Validate the envelope and return its `result` payload.
pub fn unwrap_envelope(mut body: Value) -> Result<Value, FeedError> {
    let code = body["retCode"]
        .as_i64()
        .ok_or_else(|| FeedError::ParseError("missing retCode".to_string()))?;

    if code != 0 {
        let message = body["retMsg"].as_str().unwrap_or_default().to_string();
        return Err(FeedError::Api { code, message });
    }

    match body.get_mut("result") {
        Some(result) if result.is_object() => Ok(result.take()),
        _ => Err(FeedError::ParseError("missing result object".to_string())),
    }
}

/// One entry of the instruments-info list.
#[derive(Debug, Clone, Deserialize)]
pub struct InstrumentInfo {
    pub symbol: String,
    #[serde(rename = "quoteCoin")]
    pub quote_coin: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct InstrumentsPage {
    #[serde(default)]
    pub list: Vec<InstrumentInfo>,
    #[serde(rename = "nextPageCursor", default)]
    pub next_page_cursor: String,
}

impl InstrumentInfo {
    /// Whether this instrument is an actively traded pair in `quote`.
    pub fn is_tradable_in(&self, quote: QuoteCurrency) -> bool {
        quote.matches(&self.quote_coin) && self.status == TRADING_STATUS
    }
}

pub fn parse_instruments_page(result: Value) -> Result<InstrumentsPage, FeedError> {
    Ok(serde_json::from_value(result)?)
}

/// Keep tradable instruments in `quote`, sorted and without duplicates.
pub fn filter_symbols(instruments: &[InstrumentInfo], quote: QuoteCurrency) -> Vec<Symbol> {
    let mut symbols: Vec<Symbol> = instruments
        .iter()
        .filter(|i| i.is_tradable_in(quote))
        .map(|i| Symbol::new(&i.symbol))
        .collect();
    symbols.sort();
    symbols.dedup();
    symbols
}

#[derive(Debug, Deserialize)]
struct KlinePage {
    #[serde(default)]
    list: Vec<Vec<Value>>,
}

fn field_f64(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.parse::<f64>().ok().filter(|v| v.is_finite()),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

fn field_i64(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => s.parse::<i64>().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

/// Parse `[startTime, open, high, low, close, volume, turnover]`.
///
/// Rows without a usable start time, close or volume are rejected; other
/// unparsable prices become NaN.
pub fn parse_kline_row(row: &[Value]) -> Option<Candle> {
    let open_time = datetime_from_millis(field_i64(row.first()?)?)?;
    let close = field_f64(row.get(4)?)?;
    let volume = field_f64(row.get(5)?)?;
    let price = |idx: usize| row.get(idx).and_then(field_f64).unwrap_or(f64::NAN);

    Some(Candle::new(
        open_time,
        price(1),
        price(2),
        price(3),
        close,
        volume,
        price(6),
    ))
}

/// Parse a kline `result` into an ascending series.
///
/// Returns `None` when the upstream list is empty.
pub fn parse_klines(result: Value) -> Result<Option<Vec<Candle>>, FeedError> {
    let page: KlinePage = serde_json::from_value(result)?;
    if page.list.is_empty() {
        return Ok(None);
    }

    let total = page.list.len();
    let mut candles: Vec<Candle> = page.list.iter().filter_map(|row| parse_kline_row(row)).collect();
    if candles.len() < total {
        debug!(dropped = total - candles.len(), "Dropped malformed kline rows");
    }
    if candles.is_empty() {
        return Ok(None);
    }

    normalize_series(&mut candles);
    Ok(Some(candles))
}
