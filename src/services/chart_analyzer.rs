//! Chart screenshot analysis through the multimodal model

use chrono::{SecondsFormat, Utc};
use futures_util::future::try_join_all;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::GeminiConfig;
use crate::error::AnalysisError;
use crate::models::analysis::COMBINED_ANALYSIS_LABEL;
use crate::models::{AnalysisResult, MacdSettings, RawRecommendation, Timeframe, TradeRecommendation};
use crate::services::gemini::{GenerateContentRequest, GenerativeModel, Part};
use crate::services::image::{encode_file, EncodedImage};
use crate::services::parsing::{parse_reply_json, strip_code_fences};
use crate::services::prompts;

/// The one or two screenshots of an analysis, keyed by timeframe
#[derive(Debug, Clone, Default)]
pub struct ChartImages {
    images: BTreeMap<Timeframe, EncodedImage>,
}

impl ChartImages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(timeframe: Timeframe, image: EncodedImage) -> Self {
        Self::new().with(timeframe, image)
    }

    /// Replaces any image already held for the timeframe
    pub fn with(mut self, timeframe: Timeframe, image: EncodedImage) -> Self {
        self.images.insert(timeframe, image);
        self
    }

    pub fn insert(&mut self, timeframe: Timeframe, image: EncodedImage) {
        self.images.insert(timeframe, image);
    }

    /// Read and encode files concurrently
    pub async fn load(files: Vec<(Timeframe, PathBuf)>) -> Result<Self, AnalysisError> {
        let encoded = try_join_all(files.into_iter().map(|(timeframe, path)| async move {
            encode_file(&path).await.map(|image| (timeframe, image))
        }))
        .await?;

        Ok(Self {
            images: encoded.into_iter().collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn timeframes(&self) -> Vec<Timeframe> {
        self.images.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Timeframe, &EncodedImage)> {
        self.images.iter()
    }

    /// Literal file name for a single chart, the combined label otherwise
    pub fn result_label(&self) -> String {
        match self.images.values().next() {
            Some(image) if self.images.len() == 1 => image.file_name.clone(),
            _ => COMBINED_ANALYSIS_LABEL.to_string(),
        }
    }
}

pub struct ChartAnalyzer {
    model: Arc<dyn GenerativeModel>,
    model_name: String,
    macd: MacdSettings,
}

impl ChartAnalyzer {
    pub fn new(model: Arc<dyn GenerativeModel>, config: &GeminiConfig) -> Self {
        Self {
            model,
            model_name: config.analysis_model.clone(),
            macd: config.macd,
        }
    }

    /// Image parts, each preceded by its timeframe tag, then the instruction.
    pub fn build_request(&self, images: &ChartImages, context: &str) -> GenerateContentRequest {
        let mut parts = Vec::with_capacity(images.len() * 2 + 1);
        for (timeframe, image) in images.iter() {
            parts.push(Part::text(prompts::timeframe_tag(*timeframe)));
            parts.push(image.to_part());
        }
        parts.push(Part::text(prompts::analysis_prompt(
            &self.macd,
            &images.timeframes(),
            context,
        )));

        GenerateContentRequest::new(self.model_name.clone(), parts).with_json_output()
    }

    /// Run one analysis. Transport failures and unparsable replies are
    /// returned to the caller; missing fields are not errors.
    pub async fn analyze(
        &self,
        images: &ChartImages,
        context: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        if images.is_empty() {
            return Err(AnalysisError::NoImages);
        }

        let label = images.result_label();
        info!(
            label = %label,
            images = images.len(),
            model = %self.model_name,
            "Starting chart analysis"
        );

        let request = self.build_request(images, context);
        let reply = self.model.generate(&request).await.map_err(|e| {
            warn!(label = %label, error = %e, "Chart analysis request failed");
            e
        })?;

        let recommendation = parse_recommendation(&reply.text).map_err(|e| {
            warn!(label = %label, error = %e, "Chart analysis reply was not valid JSON");
            e
        })?;

        debug!(
            label = %label,
            trend = ?recommendation.trend,
            direction = ?recommendation.direction,
            confidence = %recommendation.confidence,
            "Chart analysis complete"
        );

        Ok(AnalysisResult {
            file_name: label,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            recommendation,
            grounding_urls: Some(reply.grounding_urls).filter(|urls| !urls.is_empty()),
        })
    }
}

/// Fences are stripped before the first and only parse attempt.
pub fn parse_recommendation(text: &str) -> Result<TradeRecommendation, AnalysisError> {
    let value = parse_reply_json(&strip_code_fences(text))?;
    Ok(RawRecommendation::from_value(value).into())
}
