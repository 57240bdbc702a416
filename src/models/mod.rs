//! Shared data models spanning the service layers.

pub mod analysis;
pub mod indicators;
mod lenient;
pub mod market;
pub mod sentiment;

pub use analysis::{
    AnalysisResult, AnalysisTrend, PositionDirection, RawRecommendation, Timeframe,
    TradeRecommendation,
};
pub use indicators::MacdSettings;
pub use market::MarketCoin;
pub use sentiment::{RawSentiment, Sentiment, SentimentData};
