//! Chart analysis result models

use serde::{Deserialize, Serialize};
use std::fmt;

use super::lenient;

pub const NOT_AVAILABLE: &str = "N/A";
pub const DEFAULT_REASONING: &str = "Analysis failed to produce reasoning.";
pub const DEFAULT_CONFIDENCE: &str = "Low";
pub const DEFAULT_MACD_STATUS: &str = "Unknown";
pub const COMBINED_ANALYSIS_LABEL: &str = "Combined Analysis";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AnalysisTrend {
    Up,
    Down,
    Neutral,
}

impl AnalysisTrend {
    /// Case-insensitive match on the wire names; anything else is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "UP" => Some(AnalysisTrend::Up),
            "DOWN" => Some(AnalysisTrend::Down),
            "NEUTRAL" => Some(AnalysisTrend::Neutral),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionDirection {
    Long,
    Short,
    Wait,
}

impl PositionDirection {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "LONG" => Some(PositionDirection::Long),
            "SHORT" => Some(PositionDirection::Short),
            "WAIT" => Some(PositionDirection::Wait),
            _ => None,
        }
    }
}

/// Chart timeframe an uploaded screenshot belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1h")]
    OneHour,
}

impl Timeframe {
    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::FifteenMinutes => "15-minute",
            Timeframe::OneHour => "1-hour",
        }
    }

    /// What the strategy uses this timeframe for
    pub fn role(&self) -> &'static str {
        match self {
            Timeframe::FifteenMinutes => "entry",
            Timeframe::OneHour => "trend",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecommendation {
    pub trend: AnalysisTrend,
    pub direction: PositionDirection,
    pub entry_price: String,
    pub target_price: String,
    pub stop_loss: String,
    pub pnl_projection: String,
    pub reasoning: String,
    pub confidence: String,
    pub macd_status: String,
}

/// Model reply as decoded, before defaults are applied
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecommendation {
    #[serde(default, deserialize_with = "lenient::text")]
    pub trend: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub direction: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub entry_price: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub target_price: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub stop_loss: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub pnl_projection: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub reasoning: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub confidence: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub macd_status: Option<String>,
}

impl RawRecommendation {
    /// Decode a parsed reply. Non-object replies carry no usable fields.
    pub fn from_value(value: serde_json::Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_default()
    }
}

impl From<RawRecommendation> for TradeRecommendation {
    /// The one place where missing fields are replaced by their defaults.
    fn from(raw: RawRecommendation) -> Self {
        let or_na = |field: Option<String>| field.unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Self {
            trend: raw
                .trend
                .as_deref()
                .and_then(AnalysisTrend::parse)
                .unwrap_or(AnalysisTrend::Neutral),
            direction: raw
                .direction
                .as_deref()
                .and_then(PositionDirection::parse)
                .unwrap_or(PositionDirection::Wait),
            entry_price: or_na(raw.entry_price),
            target_price: or_na(raw.target_price),
            stop_loss: or_na(raw.stop_loss),
            pnl_projection: or_na(raw.pnl_projection),
            reasoning: raw
                .reasoning
                .unwrap_or_else(|| DEFAULT_REASONING.to_string()),
            confidence: raw
                .confidence
                .unwrap_or_else(|| DEFAULT_CONFIDENCE.to_string()),
            macd_status: raw
                .macd_status
                .unwrap_or_else(|| DEFAULT_MACD_STATUS.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub file_name: String,
    /// ISO-8601 creation instant
    pub timestamp: String,
    pub recommendation: TradeRecommendation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding_urls: Option<Vec<String>>,
}
