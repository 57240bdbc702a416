//! Grounded market sentiment summary

use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::GeminiConfig;
use crate::error::AnalysisError;
use crate::models::{RawSentiment, SentimentData};
use crate::services::gemini::{GenerateContentRequest, GenerativeModel, Part};
use crate::services::parsing::{parse_reply_json, strip_code_fences};
use crate::services::prompts::SENTIMENT_PROMPT;

pub struct SentimentFetcher {
    model: Arc<dyn GenerativeModel>,
    model_name: String,
}

impl SentimentFetcher {
    pub fn new(model: Arc<dyn GenerativeModel>, config: &GeminiConfig) -> Self {
        Self {
            model,
            model_name: config.sentiment_model.clone(),
        }
    }

    pub fn build_request(&self) -> GenerateContentRequest {
        GenerateContentRequest::new(self.model_name.clone(), vec![Part::text(SENTIMENT_PROMPT)])
            .with_google_search()
            .with_json_output()
    }

    /// Never fails: every error is logged and replaced by the neutral fallback.
    pub async fn fetch_market_sentiment(&self) -> SentimentData {
        match self.try_fetch().await {
            Ok(data) => {
                debug!(sentiment = ?data.sentiment, key_points = data.key_points.len(), "Market sentiment fetched");
                data
            }
            Err(e) => {
                warn!(error = %e, model = %self.model_name, "Sentiment fetch failed, serving neutral fallback");
                SentimentData::fallback()
            }
        }
    }

    async fn try_fetch(&self) -> Result<SentimentData, AnalysisError> {
        let reply = self.model.generate(&self.build_request()).await?;
        parse_sentiment(&reply.text)
    }
}

/// Direct parse first; on failure strip fences and try once more.
pub fn parse_sentiment(text: &str) -> Result<SentimentData, AnalysisError> {
    let value = match parse_reply_json(text) {
        Ok(value) => value,
        Err(_) => parse_reply_json(&strip_code_fences(text))?,
    };
    Ok(RawSentiment::from_value(value).into())
}
