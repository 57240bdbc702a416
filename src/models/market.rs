use serde::{Deserialize, Serialize};

use super::lenient;

/// One row of the CoinGecko `/coins/markets` listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketCoin {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub current_price: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub market_cap: f64,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub price_change_percentage_24h: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_volume: f64,
}
