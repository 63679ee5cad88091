//! Candle granularities supported by the exchange kline endpoint.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported candle interval: {0}")]
pub struct IntervalParseError(pub String);

/// Candle interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Interval {
    Min1,
    Min3,
    Min5,
    #[default]
    Min15,
    Min30,
    Hour1,
    Hour2,
    Hour4,
    Hour6,
    Hour12,
    Day,
    Week,
    Month,
}

impl Interval {
    /// Parse from minutes (`"15"`) or a letter code (`"D"`, `"W"`, `"M"`).
    pub fn parse(s: &str) -> Result<Self, IntervalParseError> {
        let interval = match s.trim() {
            "1" => Interval::Min1,
            "3" => Interval::Min3,
            "5" => Interval::Min5,
            "15" => Interval::Min15,
            "30" => Interval::Min30,
            "60" => Interval::Hour1,
            "120" => Interval::Hour2,
            "240" => Interval::Hour4,
            "360" => Interval::Hour6,
            "720" => Interval::Hour12,
            "D" | "d" | "1440" => Interval::Day,
            "W" | "w" => Interval::Week,
            "M" => Interval::Month,
            other => return Err(IntervalParseError(other.to_string())),
        };
        Ok(interval)
    }

    /// Value of the `interval` query parameter.
    pub fn as_api_str(self) -> &'static str {
        match self {
            Interval::Min1 => "1",
            Interval::Min3 => "3",
            Interval::Min5 => "5",
            Interval::Min15 => "15",
            Interval::Min30 => "30",
            Interval::Hour1 => "60",
            Interval::Hour2 => "120",
            Interval::Hour4 => "240",
            Interval::Hour6 => "360",
            Interval::Hour12 => "720",
            Interval::Day => "D",
            Interval::Week => "W",
            Interval::Month => "M",
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_api_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_parse_minutes() {
        assert_eq!(Interval::parse("15"), Ok(Interval::Min15));
        assert_eq!(Interval::parse("60"), Ok(Interval::Hour1));
        assert_eq!(Interval::parse(" 5 "), Ok(Interval::Min5));
    }

    #[test]
    fn test_interval_parse_letter_codes() {
        assert_eq!(Interval::parse("D"), Ok(Interval::Day));
        assert_eq!(Interval::parse("W"), Ok(Interval::Week));
        assert_eq!(Interval::parse("M"), Ok(Interval::Month));
    }

    #[test]
    fn test_interval_parse_rejects_unsupported() {
        assert_eq!(
            Interval::parse("7"),
            Err(IntervalParseError("7".to_string()))
        );
        assert!(Interval::parse("").is_err());
    }

    #[test]
    fn test_interval_api_str_roundtrips() {
        for interval in [Interval::Min1, Interval::Hour4, Interval::Day, Interval::Month] {
            assert_eq!(Interval::parse(interval.as_api_str()), Ok(interval));
        }
    }
}
