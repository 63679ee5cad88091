//! Core data types for the MACD scanner.

pub mod candle;
pub mod interval;
pub mod quote_currency;
pub mod symbol;

pub use candle::*;
pub use interval::*;
pub use quote_currency::*;
pub use symbol::*;
