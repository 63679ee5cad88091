//! Market data collection from the exchange's public REST API.
//!
//! ## Architecture
//!
//! - `transport` - HTTP seam (`HttpTransport`) with the reqwest implementation
//! - `retry` - Bounded exponential backoff policy
//! - `bybit` - Response envelope and row parsing
//! - `client` - `MarketData` trait and the cached `BybitClient`

pub mod bybit;
pub mod client;
pub mod error;
pub mod retry;
pub mod transport;

pub use client::{BybitClient, MarketData};
pub use error::*;
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, ReqwestTransport};
