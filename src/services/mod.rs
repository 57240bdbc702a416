//! Model-backed analysis services and market data clients.

pub mod chart_analyzer;
pub mod coingecko;
pub mod gemini;
pub mod image;
pub mod market_data;
pub mod parsing;
pub mod prompts;
pub mod sentiment;

pub use chart_analyzer::{ChartAnalyzer, ChartImages};
pub use coingecko::CoinGeckoClient;
pub use gemini::{GeminiClient, GenerativeModel};
pub use image::EncodedImage;
pub use market_data::MarketDataProvider;
pub use sentiment::SentimentFetcher;
