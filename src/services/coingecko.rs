//! CoinGecko REST market data provider

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::MarketDataError;
use crate::models::MarketCoin;
use crate::services::market_data::MarketDataProvider;

pub struct CoinGeckoClient {
    http: Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    async fn fetch_markets(&self, query: &[(&str, String)]) -> Result<Vec<MarketCoin>, MarketDataError> {
        let url = format!("{}/coins/markets", self.base_url);
        let response = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "CoinGecko request rejected");
            return Err(MarketDataError::Status {
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await?;
        if !body.is_array() {
            return Err(MarketDataError::InvalidResponse(
                "expected a JSON array of coins".to_string(),
            ));
        }

        let coins: Vec<MarketCoin> = serde_json::from_value(body)
            .map_err(|e| MarketDataError::InvalidResponse(e.to_string()))?;
        debug!(count = coins.len(), "Fetched market rows from CoinGecko");
        Ok(coins)
    }
}

fn base_query() -> Vec<(&'static str, String)> {
    vec![
        ("vs_currency", "usd".to_string()),
        ("order", "market_cap_desc".to_string()),
        ("page", "1".to_string()),
        ("sparkline", "false".to_string()),
    ]
}

#[async_trait]
impl MarketDataProvider for CoinGeckoClient {
    async fn top_coins(&self, limit: usize) -> Result<Vec<MarketCoin>, MarketDataError> {
        let mut query = base_query();
        query.push(("per_page", limit.to_string()));
        self.fetch_markets(&query).await
    }

    async fn coins_by_ids(&self, ids: &[String]) -> Result<Vec<MarketCoin>, MarketDataError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut query = base_query();
        query.push(("ids", ids.join(",")));
        self.fetch_markets(&query).await
    }
}
