//! HTTP transport for the Gemini REST API

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::messages::{GenerateContentRequest, GenerateContentResponse, ModelReply};
use crate::config::GeminiConfig;
use crate::error::AnalysisError;

const ERROR_BODY_LIMIT: usize = 512;

/// Seam between the analysis services and the model vendor
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, request: &GenerateContentRequest) -> Result<ModelReply, AnalysisError>;
}

pub struct GeminiClient {
    http: Client,
    api_base: String,
    api_key: String,
}

impl GeminiClient {
    /// Fails with a configuration error when the credential is blank.
    pub fn new(config: &GeminiConfig) -> Result<Self, AnalysisError> {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: &GeminiConfig, http: Client) -> Result<Self, AnalysisError> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(AnalysisError::Config(
                "API key not found in environment variables".to_string(),
            ));
        }

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn endpoint_for_model(&self, model: &str) -> String {
        let trimmed = model.trim();
        let model_path = if trimmed.starts_with("models/") {
            trimmed.to_string()
        } else {
            format!("models/{trimmed}")
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }
}

fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: &GenerateContentRequest) -> Result<ModelReply, AnalysisError> {
        let endpoint = self.endpoint_for_model(&request.model);
        debug!(model = %request.model, endpoint = %endpoint, "Sending generateContent request");

        let response = self
            .http
            .post(&endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(model = %request.model, status = status.as_u16(), "Gemini request rejected");
            return Err(AnalysisError::Transport(format!(
                "Gemini request failed ({}): {}",
                status.as_u16(),
                truncate_text(&body, ERROR_BODY_LIMIT)
            )));
        }

        let payload: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            AnalysisError::Transport(format!("Gemini returned an invalid response envelope: {e}"))
        })?;

        let reply = ModelReply::from(payload);
        debug!(
            model = %request.model,
            text_len = reply.text.len(),
            sources = reply.grounding_urls.len(),
            "Received generateContent response"
        );
        Ok(reply)
    }
}
