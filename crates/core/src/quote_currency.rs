//! Quote currencies a scanned pair can be denominated in.

use serde::{Deserialize, Serialize};

/// Stable quote currency used to filter the spot symbol list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum QuoteCurrency {
    /// Tether (the exchange's deepest spot quote)
    #[default]
    USDT,
    /// USD Coin
    USDC,
    /// US Dollar
    USD,
}

impl QuoteCurrency {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "USDT" => Some(QuoteCurrency::USDT),
            "USDC" => Some(QuoteCurrency::USDC),
            "USD" => Some(QuoteCurrency::USD),
            _ => None,
        }
    }

    /// Coin code as reported in the instrument's `quoteCoin` field.
    pub fn as_str(self) -> &'static str {
        match self {
            QuoteCurrency::USDT => "USDT",
            QuoteCurrency::USDC => "USDC",
            QuoteCurrency::USD => "USD",
        }
    }

    /// Check whether an upstream quote coin code refers to this currency.
    pub fn matches(self, quote_coin: &str) -> bool {
        quote_coin.eq_ignore_ascii_case(self.as_str())
    }
}

impl std::fmt::Display for QuoteCurrency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_currency_from_str() {
        assert_eq!(QuoteCurrency::from_str("USDT"), Some(QuoteCurrency::USDT));
        assert_eq!(QuoteCurrency::from_str("usdc"), Some(QuoteCurrency::USDC));
        assert_eq!(QuoteCurrency::from_str(" USD "), Some(QuoteCurrency::USD));
        assert_eq!(QuoteCurrency::from_str("KRW"), None);
    }

    #[test]
    fn test_quote_currency_matches() {
        assert!(QuoteCurrency::USDT.matches("USDT"));
        assert!(QuoteCurrency::USDT.matches("usdt"));
        assert!(!QuoteCurrency::USDT.matches("USDC"));
    }

    #[test]
    fn test_quote_currency_default_is_usdt() {
        assert_eq!(QuoteCurrency::default(), QuoteCurrency::USDT);
        assert_eq!(QuoteCurrency::default().to_string(), "USDT");
    }
}
