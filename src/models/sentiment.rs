//! Market sentiment summary models

use serde::{Deserialize, Serialize};

use super::lenient;

pub const FALLBACK_SUMMARY: &str = "Unable to fetch sentiment data due to an error.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl Sentiment {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "bullish" => Some(Sentiment::Bullish),
            "bearish" => Some(Sentiment::Bearish),
            "neutral" => Some(Sentiment::Neutral),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentData {
    pub sentiment: Sentiment,
    pub summary: String,
    pub key_points: Vec<String>,
}

impl SentimentData {
    /// Record served whenever the sentiment request cannot be completed
    pub fn fallback() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            summary: FALLBACK_SUMMARY.to_string(),
            key_points: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSentiment {
    #[serde(default, deserialize_with = "lenient::text")]
    pub sentiment: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub key_points: Option<Vec<String>>,
}

impl RawSentiment {
    pub fn from_value(value: serde_json::Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_default()
    }
}

impl From<RawSentiment> for SentimentData {
    fn from(raw: RawSentiment) -> Self {
        Self {
            sentiment: raw
                .sentiment
                .as_deref()
                .and_then(Sentiment::parse)
                .unwrap_or(Sentiment::Neutral),
            summary: raw.summary.unwrap_or_else(|| FALLBACK_SUMMARY.to_string()),
            key_points: raw.key_points.unwrap_or_default(),
        }
    }
}
