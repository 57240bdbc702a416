//! Environment-driven configuration
//!
//! Values are read once at startup and injected into the services that need
//! them. Nothing below the binary reads the process environment directly.

use std::env;

use crate::error::AnalysisError;
use crate::models::MacdSettings;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-flash-latest";
pub const DEFAULT_SENTIMENT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_COINGECKO_API_BASE: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_WATCHLIST: [&str; 3] = ["sui", "solana", "berachain"];
pub const DEFAULT_TOP_COINS_LIMIT: usize = 10;
pub const DEFAULT_PORT: u16 = 8080;

/// Deployment environment name (`production`, `sandbox`, ...)
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn normalize_base(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn validate_base(key: &str, raw: &str) -> Result<String, AnalysisError> {
    let base = normalize_base(raw);
    url::Url::parse(&base)
        .map_err(|e| AnalysisError::Config(format!("{key} is not a valid URL ({base}): {e}")))?;
    Ok(base)
}

/// Settings for the generative model transport.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub api_base: String,
    pub analysis_model: String,
    pub sentiment_model: String,
    pub macd: MacdSettings,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            analysis_model: DEFAULT_ANALYSIS_MODEL.to_string(),
            sentiment_model: DEFAULT_SENTIMENT_MODEL.to_string(),
            macd: MacdSettings::default(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl AsRef<str>) -> Self {
        self.api_base = normalize_base(api_base.as_ref());
        self
    }

    /// Read the credential from `GEMINI_API_KEY` (or the legacy `API_KEY`).
    ///
    /// A missing credential is a configuration error, raised here before any
    /// request can be attempted.
    pub fn from_env() -> Result<Self, AnalysisError> {
        let api_key = non_empty_env("GEMINI_API_KEY")
            .or_else(|| non_empty_env("API_KEY"))
            .ok_or_else(|| {
                AnalysisError::Config("API key not found in environment variables".to_string())
            })?;

        let mut config = Self::new(api_key);
        if let Some(base) = non_empty_env("GEMINI_API_BASE") {
            config.api_base = validate_base("GEMINI_API_BASE", &base)?;
        }
        if let Some(model) = non_empty_env("GEMINI_ANALYSIS_MODEL") {
            config.analysis_model = model;
        }
        if let Some(model) = non_empty_env("GEMINI_SENTIMENT_MODEL") {
            config.sentiment_model = model;
        }
        Ok(config)
    }
}

/// Settings for the market data lists shown on the dashboard.
#[derive(Debug, Clone)]
pub struct MarketConfig {
    pub api_base: String,
    pub watchlist: Vec<String>,
    pub top_coins_limit: usize,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_COINGECKO_API_BASE.to_string(),
            watchlist: DEFAULT_WATCHLIST.iter().map(|id| id.to_string()).collect(),
            top_coins_limit: DEFAULT_TOP_COINS_LIMIT,
        }
    }
}

impl MarketConfig {
    pub fn from_env() -> Result<Self, AnalysisError> {
        let mut config = Self::default();
        if let Some(base) = non_empty_env("COINGECKO_API_BASE") {
            config.api_base = validate_base("COINGECKO_API_BASE", &base)?;
        }
        if let Some(list) = non_empty_env("WATCHLIST_COINS") {
            config.watchlist = parse_watchlist(&list);
        }
        if let Some(limit) = non_empty_env("TOP_COINS_LIMIT") {
            config.top_coins_limit = limit.parse().map_err(|_| {
                AnalysisError::Config(format!("TOP_COINS_LIMIT must be a positive integer, got {limit}"))
            })?;
        }
        Ok(config)
    }
}

/// Split a comma separated list of CoinGecko ids, dropping blanks.
pub fn parse_watchlist(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|id| id.trim().to_ascii_lowercase())
        .filter(|id| !id.is_empty())
        .collect()
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub gemini: GeminiConfig,
    pub market: MarketConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AnalysisError> {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            port,
            gemini: GeminiConfig::from_env()?,
            market: MarketConfig::from_env()?,
        })
    }
}
