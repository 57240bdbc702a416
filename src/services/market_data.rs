//! Market data provider interface for the dashboard lists.

use async_trait::async_trait;

use crate::error::MarketDataError;
use crate::models::MarketCoin;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Largest coins by market cap, at most `limit` of them
    async fn top_coins(&self, limit: usize) -> Result<Vec<MarketCoin>, MarketDataError>;

    /// Coins for the given provider ids, ordered by market cap
    async fn coins_by_ids(&self, ids: &[String]) -> Result<Vec<MarketCoin>, MarketDataError>;
}
