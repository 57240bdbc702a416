//! Chart analysis and market sentiment backend for the crypto dashboard.

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;

pub use error::{AnalysisError, MarketDataError};
