//! FRED (Federal Reserve Economic Data) API client
//!
//! FRED is a database maintained by the Federal Reserve Bank of St. Louis
//! containing over 800,000 economic time series. This crate provides the
//! retrieval side of econ-rs: full-text series search, series metadata,
//! and observation history, with rate limiting and response caching.
//!
//! API Key: free registration at https://fred.stlouisfed.org/docs/api/api_key.html
//! Rate Limit: 120 requests per minute

pub mod cache;
pub mod client;
pub mod config;
pub mod error;

pub use cache::{CacheKey, SeriesCache};
pub use client::{FredClient, RawObservation, SeriesData, SeriesInfo, series};
pub use config::{EconConfig, EconConfigBuilder};
pub use error::{FredError, Result};
