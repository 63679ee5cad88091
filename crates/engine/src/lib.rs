//! MACD crossover detection engine.
//!
//! This crate contains the pure logic of a scan: indicator computation,
//! bullish crossover detection with a volume gate, and per-symbol alert
//! deduplication.

pub mod crossover;
pub mod dedup;
pub mod indicator;

pub use crossover::*;
pub use dedup::*;
pub use indicator::*;
