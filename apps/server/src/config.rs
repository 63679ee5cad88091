//! Scanner configuration from environment variables.

use scanner_alerts::TelegramConfig;
use scanner_core::{Interval, QuoteCurrency, MIN_CANDLES};
use scanner_engine::{VolumeBasis, DEFAULT_MIN_VOLUME_USD};
use scanner_feeds::RetryPolicy;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MARKET_DATA_BASE_URL: &str = "https://api.bybit.com";

/// Bybit caps kline requests at 1000 rows.
const MAX_KLINE_LIMIT: u32 = 1_000;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid {key}={value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Runtime configuration for the scanner.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Telegram destination; alerts are computed but undelivered when unset.
    pub telegram: TelegramConfig,
    /// Candle interval to scan.
    pub interval: Interval,
    /// Minimum current-candle volume in quote currency.
    pub min_volume_usd: f64,
    /// How candle volume is measured against the threshold.
    pub volume_basis: VolumeBasis,
    /// Market data REST base URL.
    pub market_data_base_url: String,
    /// Pause between passes.
    pub scan_cadence: Duration,
    /// Quote currency of the scanned pairs.
    pub quote: QuoteCurrency,
    /// Candles requested per symbol.
    pub kline_limit: u32,
    /// Pause after each symbol.
    pub symbol_pause: Duration,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    /// Retry policy for market data requests.
    pub retry: RetryPolicy,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        let request_timeout = Duration::from_secs(20);
        let mut telegram = TelegramConfig::new(None, None);
        telegram.timeout = request_timeout;

        Self {
            telegram,
            interval: Interval::Min15,
            min_volume_usd: DEFAULT_MIN_VOLUME_USD,
            volume_basis: VolumeBasis::CloseTimesVolume,
            market_data_base_url: DEFAULT_MARKET_DATA_BASE_URL.to_string(),
            scan_cadence: Duration::from_secs(60),
            quote: QuoteCurrency::USDT,
            kline_limit: 200,
            symbol_pause: Duration::from_millis(150),
            request_timeout,
            retry: RetryPolicy::default(),
        }
    }
}

impl ScannerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from a key lookup. Unset or blank keys use defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        config.telegram.bot_token = get("TELEGRAM_TOKEN");
        config.telegram.chat_id = get("TELEGRAM_CHAT_ID");
        if let Some(base) = get("TELEGRAM_API_BASE") {
            config.telegram.api_base = parse_url("TELEGRAM_API_BASE", &base)?;
        }

        if let Some(v) = get("INTERVAL_MIN") {
            config.interval =
                Interval::parse(&v).map_err(|e| invalid("INTERVAL_MIN", &v, e.to_string()))?;
        }

        if let Some(v) = get("MIN_VOLUME_USD") {
            let min_volume: f64 = parse_number("MIN_VOLUME_USD", &v)?;
            if !min_volume.is_finite() || min_volume < 0.0 {
                return Err(invalid("MIN_VOLUME_USD", &v, "must be a non-negative number"));
            }
            config.min_volume_usd = min_volume;
        }

        if let Some(v) = get("VOLUME_BASIS") {
            config.volume_basis = VolumeBasis::from_str(&v)
                .ok_or_else(|| invalid("VOLUME_BASIS", &v, "expected close_x_volume or turnover"))?;
        }

        if let Some(v) = get("MARKET_DATA_BASE_URL") {
            config.market_data_base_url = parse_url("MARKET_DATA_BASE_URL", &v)?;
        }

        if let Some(v) = get("SCAN_CADENCE_SECS") {
            let secs: u64 = parse_number("SCAN_CADENCE_SECS", &v)?;
            if secs == 0 {
                return Err(invalid("SCAN_CADENCE_SECS", &v, "must be at least 1"));
            }
            config.scan_cadence = Duration::from_secs(secs);
        }

        if let Some(v) = get("QUOTE_COIN") {
            config.quote = QuoteCurrency::from_str(&v)
                .ok_or_else(|| invalid("QUOTE_COIN", &v, "expected USDT, USDC or USD"))?;
        }

        if let Some(v) = get("KLINE_LIMIT") {
            let limit: u32 = parse_number("KLINE_LIMIT", &v)?;
            if !(MIN_CANDLES as u32..=MAX_KLINE_LIMIT).contains(&limit) {
                return Err(invalid(
                    "KLINE_LIMIT",
                    &v,
                    format!("must be between {MIN_CANDLES} and {MAX_KLINE_LIMIT}"),
                ));
            }
            config.kline_limit = limit;
        }

        if let Some(v) = get("SYMBOL_PAUSE_MS") {
            config.symbol_pause = Duration::from_millis(parse_number("SYMBOL_PAUSE_MS", &v)?);
        }

        if let Some(v) = get("REQUEST_TIMEOUT_SECS") {
            let secs: u64 = parse_number("REQUEST_TIMEOUT_SECS", &v)?;
            if secs == 0 {
                return Err(invalid("REQUEST_TIMEOUT_SECS", &v, "must be at least 1"));
            }
            config.request_timeout = Duration::from_secs(secs);
            config.telegram.timeout = config.request_timeout;
        }

        let mut attempts = config.retry.max_attempts();
        let mut initial_delay_ms = config.retry.initial_delay_ms();
        if let Some(v) = get("RETRY_MAX_ATTEMPTS") {
            attempts = parse_number("RETRY_MAX_ATTEMPTS", &v)?;
            if attempts == 0 {
                return Err(invalid("RETRY_MAX_ATTEMPTS", &v, "must be at least 1"));
            }
        }
        if let Some(v) = get("RETRY_INITIAL_DELAY_MS") {
            initial_delay_ms = parse_number("RETRY_INITIAL_DELAY_MS", &v)?;
        }
        let max_delay_ms = config.retry.max_delay_ms().max(initial_delay_ms);
        config.retry = RetryPolicy::new(initial_delay_ms, max_delay_ms, attempts);

        Ok(config)
    }
}

fn parse_number<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| invalid(key, value, e.to_string()))
}

fn parse_url(key: &'static str, value: &str) -> Result<String, ConfigError> {
    let url = url::Url::parse(value).map_err(|e| invalid(key, value, e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(value.trim_end_matches('/').to_string()),
        other => Err(invalid(key, value, format!("unsupported scheme {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<ScannerConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ScannerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.interval, Interval::Min15);
        assert_eq!(config.min_volume_usd, 500_000.0);
        assert_eq!(config.market_data_base_url, "https://api.bybit.com");
        assert_eq!(config.scan_cadence, Duration::from_secs(60));
        assert_eq!(config.quote, QuoteCurrency::USDT);
        assert_eq!(config.kline_limit, 200);
        assert_eq!(config.symbol_pause, Duration::from_millis(150));
        assert_eq!(config.volume_basis, VolumeBasis::CloseTimesVolume);
        assert_eq!(config.retry.max_attempts(), 3);
        assert!(!config.telegram.is_configured());
        assert_eq!(config.telegram.api_base, scanner_alerts::telegram::DEFAULT_API_BASE);
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("TELEGRAM_TOKEN", "123:abc"),
            ("TELEGRAM_CHAT_ID", "618962376"),
            ("INTERVAL_MIN", "5"),
            ("MIN_VOLUME_USD", "250000.5"),
            ("MARKET_DATA_BASE_URL", "https://api-testnet.bybit.com/"),
            ("SCAN_CADENCE_SECS", "30"),
            ("QUOTE_COIN", "usdc"),
            ("KLINE_LIMIT", "100"),
            ("SYMBOL_PAUSE_MS", "0"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("RETRY_MAX_ATTEMPTS", "4"),
            ("RETRY_INITIAL_DELAY_MS", "250"),
            ("VOLUME_BASIS", "turnover"),
        ])
        .unwrap();

        assert!(config.telegram.is_configured());
        assert_eq!(config.telegram.chat_id.as_deref(), Some("618962376"));
        assert_eq!(config.interval, Interval::Min5);
        assert_eq!(config.min_volume_usd, 250_000.5);
        assert_eq!(config.market_data_base_url, "https://api-testnet.bybit.com");
        assert_eq!(config.scan_cadence, Duration::from_secs(30));
        assert_eq!(config.quote, QuoteCurrency::USDC);
        assert_eq!(config.kline_limit, 100);
        assert_eq!(config.symbol_pause, Duration::ZERO);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.telegram.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_attempts(), 4);
        assert_eq!(config.retry.initial_delay_ms(), 250);
        assert_eq!(config.volume_basis, VolumeBasis::Turnover);
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = from_pairs(&[("TELEGRAM_TOKEN", "  "), ("INTERVAL_MIN", "")]).unwrap();
        assert_eq!(config.telegram.bot_token, None);
        assert_eq!(config.interval, Interval::Min15);
    }

    #[test]
    fn test_invalid_interval() {
        let err = from_pairs(&[("INTERVAL_MIN", "7")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "INTERVAL_MIN", .. }));
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(from_pairs(&[("MIN_VOLUME_USD", "lots")]).is_err());
        assert!(from_pairs(&[("MIN_VOLUME_USD", "-1")]).is_err());
        assert!(from_pairs(&[("SCAN_CADENCE_SECS", "0")]).is_err());
        assert!(from_pairs(&[("KLINE_LIMIT", "34")]).is_err());
        assert!(from_pairs(&[("KLINE_LIMIT", "1001")]).is_err());
        assert!(from_pairs(&[("RETRY_MAX_ATTEMPTS", "0")]).is_err());
    }

    #[test]
    fn test_invalid_urls() {
        assert!(from_pairs(&[("MARKET_DATA_BASE_URL", "api.bybit.com")]).is_err());
        assert!(from_pairs(&[("MARKET_DATA_BASE_URL", "ftp://api.bybit.com")]).is_err());
        assert!(from_pairs(&[("TELEGRAM_API_BASE", "nope")]).is_err());
    }

    #[test]
    fn test_error_message_names_key() {
        let err = from_pairs(&[("QUOTE_COIN", "KRW")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid QUOTE_COIN=\"KRW\": expected USDT, USDC or USD"
        );
    }
}
