//! Alert message formatting.

use chrono::{DateTime, Utc};
use scanner_core::{QuoteCurrency, Symbol};

/// Group an integer's digits in thousands: 1000000 → "1,000,000".
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a bullish crossover alert.
///
/// Volume is rounded to whole quote units; price uses the shortest exact
/// decimal form.
pub fn format_alert_message(
    symbol: &Symbol,
    price: f64,
    volume: f64,
    quote: QuoteCurrency,
    open_time: DateTime<Utc>,
) -> String {
    let volume = if volume.is_finite() && volume > 0.0 {
        volume.round() as u64
    } else {
        0
    };

    format!(
        "🚀 Buy signal (MACD)\n\
         Symbol: {}\n\
         Price: {}\n\
         Volume: {} {}\n\
         Time: {}",
        symbol,
        price,
        format_thousands(volume),
        quote,
        open_time.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scanner_core::datetime_from_millis;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(500_000), "500,000");
        assert_eq!(format_thousands(1_000_000), "1,000,000");
        assert_eq!(format_thousands(12_345_678), "12,345,678");
    }

    #[test]
    fn test_format_alert_message() {
        let t = datetime_from_millis(1_700_000_000_000).unwrap();
        let msg = format_alert_message(
            &Symbol::new("ABCUSDT"),
            50.0,
            1_000_000.0,
            QuoteCurrency::USDT,
            t,
        );

        assert_eq!(
            msg,
            "🚀 Buy signal (MACD)\n\
             Symbol: ABCUSDT\n\
             Price: 50\n\
             Volume: 1,000,000 USDT\n\
             Time: 2023-11-14 22:13:20 UTC"
        );
    }

    #[test]
    fn test_format_alert_message_rounds_volume_and_keeps_small_prices() {
        let t = datetime_from_millis(1_700_000_000_000).unwrap();
        let msg = format_alert_message(&Symbol::new("PEPEUSDT"), 0.00001234, 749_999.6, QuoteCurrency::USDT, t);
        assert!(msg.contains("Price: 0.00001234"));
        assert!(msg.contains("Volume: 750,000 USDT"));
    }
}
