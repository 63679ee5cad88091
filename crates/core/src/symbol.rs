//! Exchange symbol identifiers.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Exchange-traded pair identifier (e.g., "BTCUSDT").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(CompactString);

impl Symbol {
    pub fn new(symbol: &str) -> Self {
        Self(CompactString::new(symbol))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self(CompactString::from(s))
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_symbol_display() {
        let symbol = Symbol::new("BTCUSDT");
        assert_eq!(symbol.to_string(), "BTCUSDT");
        assert_eq!(symbol.as_str(), "BTCUSDT");
    }

    #[test]
    fn test_symbol_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(Symbol::from("ETHUSDT"), 1);
        assert_eq!(map.get("ETHUSDT"), Some(&1));
    }

    #[test]
    fn test_symbol_ordering() {
        let mut symbols = vec![Symbol::new("XRPUSDT"), Symbol::new("ADAUSDT")];
        symbols.sort();
        assert_eq!(symbols[0].as_str(), "ADAUSDT");
    }
}
