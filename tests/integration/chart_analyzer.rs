//! Chart analysis against a mocked Gemini endpoint

use std::sync::Arc;

use chartscope::config::GeminiConfig;
use chartscope::models::analysis::{COMBINED_ANALYSIS_LABEL, NOT_AVAILABLE};
use chartscope::models::{AnalysisTrend, PositionDirection, Timeframe, TradeRecommendation};
use chartscope::services::image::encode_bytes;
use chartscope::services::{ChartAnalyzer, ChartImages, GeminiClient};
use chartscope::AnalysisError;
use chrono::DateTime;
use serde_json::json;
use wiremock::MockServer;

use crate::test_utils::{
    gemini_config, gemini_model, mock_gemini_json, mock_gemini_status, mock_gemini_text,
    received_bodies, FULL_REPLY,
};

const MODEL: &str = "gemini-flash-latest";

fn analyzer(server: &MockServer) -> ChartAnalyzer {
    ChartAnalyzer::new(gemini_model(server), &gemini_config(server))
}

fn chart_15m() -> ChartImages {
    ChartImages::single(
        Timeframe::FifteenMinutes,
        encode_bytes(b"fifteen", Some("image/png"), "btc-15m.png"),
    )
}

fn both_charts() -> ChartImages {
    chart_15m().with(
        Timeframe::OneHour,
        encode_bytes(b"hourly", Some("image/jpeg"), "btc-1h.jpg"),
    )
}

#[tokio::test]
async fn test_single_chart_full_reply_maps_field_for_field() {
    let server = MockServer::start().await;
    mock_gemini_text(&server, MODEL, FULL_REPLY).await;

    let result = analyzer(&server)
        .analyze(&chart_15m(), "watching BTC")
        .await
        .expect("analysis succeeds");

    assert_eq!(result.file_name, "btc-15m.png");
    assert!(DateTime::parse_from_rfc3339(&result.timestamp).is_ok());
    assert!(result.timestamp.ends_with('Z'));
    assert_eq!(result.grounding_urls, None);
    assert_eq!(
        result.recommendation,
        TradeRecommendation {
            trend: AnalysisTrend::Up,
            direction: PositionDirection::Long,
            entry_price: "100".to_string(),
            target_price: "120".to_string(),
            stop_loss: "90".to_string(),
            pnl_projection: "1:2".to_string(),
            reasoning: "uptrend confirmed".to_string(),
            confidence: "High".to_string(),
            macd_status: "second half red zone".to_string(),
        }
    );
}

#[tokio::test]
async fn test_request_carries_image_then_instruction_with_json_output() {
    let server = MockServer::start().await;
    mock_gemini_text(&server, MODEL, FULL_REPLY).await;

    analyzer(&server)
        .analyze(&chart_15m(), "funding flipped negative")
        .await
        .expect("analysis succeeds");

    let bodies = received_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    let body = &bodies[0];
    let parts = body["contents"][0]["parts"].as_array().expect("parts");

    assert_eq!(parts.len(), 3);
    assert!(parts[0]["text"].as_str().unwrap().contains("15-minute"));
    assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
    assert_eq!(parts[1]["inlineData"]["data"], "ZmlmdGVlbg==");
    let instruction = parts[2]["text"].as_str().unwrap();
    assert!(instruction.ends_with("\"funding flipped negative\""));
    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    assert!(body.get("tools").is_none());
}

#[tokio::test]
async fn test_combined_analysis_sends_two_labelled_images() {
    let server = MockServer::start().await;
    mock_gemini_text(&server, MODEL, FULL_REPLY).await;

    let result = analyzer(&server)
        .analyze(&both_charts(), "")
        .await
        .expect("analysis succeeds");
    assert_eq!(result.file_name, COMBINED_ANALYSIS_LABEL);

    let bodies = received_bodies(&server).await;
    let parts = bodies[0]["contents"][0]["parts"].as_array().expect("parts");
    let inline: Vec<(usize, &serde_json::Value)> = parts
        .iter()
        .enumerate()
        .filter(|(_, part)| part.get("inlineData").is_some())
        .collect();

    assert_eq!(inline.len(), 2);
    let (first_idx, first) = inline[0];
    let (second_idx, second) = inline[1];
    assert!(parts[first_idx - 1]["text"].as_str().unwrap().contains("15-minute"));
    assert_eq!(first["inlineData"]["mimeType"], "image/png");
    assert!(parts[second_idx - 1]["text"].as_str().unwrap().contains("1-hour"));
    assert_eq!(second["inlineData"]["mimeType"], "image/jpeg");
    assert_ne!(first["inlineData"]["data"], second["inlineData"]["data"]);
}

#[tokio::test]
async fn test_fenced_reply_is_recovered() {
    let server = MockServer::start().await;
    mock_gemini_text(&server, MODEL, &format!("```json\n{}\n```", FULL_REPLY)).await;

    let result = analyzer(&server)
        .analyze(&chart_15m(), "")
        .await
        .expect("analysis succeeds");
    assert_eq!(result.recommendation.trend, AnalysisTrend::Up);
    assert_eq!(result.recommendation.macd_status, "second half red zone");
}

#[tokio::test]
async fn test_partial_reply_is_repaired_with_defaults() {
    let server = MockServer::start().await;
    mock_gemini_text(
        &server,
        MODEL,
        r#"{"trend":"DOWN","direction":"SHORT","targetPrice":null,"confidence":"Medium"}"#,
    )
    .await;

    let rec = analyzer(&server)
        .analyze(&chart_15m(), "")
        .await
        .expect("partial data is not an error")
        .recommendation;

    assert_eq!(rec.trend, AnalysisTrend::Down);
    assert_eq!(rec.direction, PositionDirection::Short);
    assert_eq!(rec.entry_price, NOT_AVAILABLE);
    assert_eq!(rec.target_price, NOT_AVAILABLE);
    assert_eq!(rec.confidence, "Medium");
    assert_eq!(rec.macd_status, "Unknown");
}

#[tokio::test]
async fn test_empty_reply_yields_all_defaults() {
    let server = MockServer::start().await;
    mock_gemini_json(&server, MODEL, json!({"candidates": []})).await;

    let rec = analyzer(&server)
        .analyze(&chart_15m(), "")
        .await
        .expect("empty reply decodes as {}")
        .recommendation;

    assert_eq!(rec.trend, AnalysisTrend::Neutral);
    assert_eq!(rec.direction, PositionDirection::Wait);
    assert_eq!(rec.reasoning, "Analysis failed to produce reasoning.");
    assert_eq!(rec.confidence, "Low");
}

#[tokio::test]
async fn test_unparsable_reply_fails_visibly() {
    let server = MockServer::start().await;
    mock_gemini_text(&server, MODEL, "```\nI think it goes up.\n```").await;

    let err = analyzer(&server)
        .analyze(&chart_15m(), "")
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_transport_error_fails_visibly() {
    let server = MockServer::start().await;
    mock_gemini_status(&server, MODEL, 429).await;

    let err = analyzer(&server)
        .analyze(&chart_15m(), "")
        .await
        .unwrap_err();
    match err {
        AnalysisError::Transport(message) => assert!(message.contains("429")),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_image_set_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    mock_gemini_text(&server, MODEL, FULL_REPLY).await;

    let err = analyzer(&server)
        .analyze(&ChartImages::new(), "context only")
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::NoImages));
    assert!(received_bodies(&server).await.is_empty());
}

#[tokio::test]
async fn test_grounding_sources_are_attached_when_present() {
    let server = MockServer::start().await;
    mock_gemini_json(
        &server,
        MODEL,
        json!({
            "candidates": [{
                "content": {"parts": [{"text": FULL_REPLY}]},
                "groundingMetadata": {"groundingChunks": [{"web": {"uri": "https://news.example/btc"}}]}
            }]
        }),
    )
    .await;

    let result = analyzer(&server)
        .analyze(&chart_15m(), "")
        .await
        .expect("analysis succeeds");
    assert_eq!(
        result.grounding_urls,
        Some(vec!["https://news.example/btc".to_string()])
    );
}

#[tokio::test]
async fn test_charts_load_from_disk_concurrently() {
    let dir = std::env::temp_dir();
    let pid = std::process::id();
    let fifteen = dir.join(format!("chartscope-load-{pid}-15m.png"));
    let hourly = dir.join(format!("chartscope-load-{pid}-1h.webp"));
    std::fs::write(&fifteen, b"fifteen").unwrap();
    std::fs::write(&hourly, b"hourly").unwrap();

    let images = ChartImages::load(vec![
        (Timeframe::OneHour, hourly.clone()),
        (Timeframe::FifteenMinutes, fifteen.clone()),
    ])
    .await
    .expect("both files readable");
    std::fs::remove_file(&fifteen).ok();
    std::fs::remove_file(&hourly).ok();

    assert_eq!(images.timeframes(), vec![Timeframe::FifteenMinutes, Timeframe::OneHour]);
    assert_eq!(images.result_label(), COMBINED_ANALYSIS_LABEL);

    let missing = ChartImages::load(vec![(
        Timeframe::OneHour,
        dir.join(format!("chartscope-load-{pid}-missing.png")),
    )])
    .await;
    assert!(matches!(missing, Err(AnalysisError::ImageRead { .. })));
}

#[tokio::test]
async fn test_transport_error_does_not_expose_api_key() {
    let secret = "SUPERSECRET123";
    let config = GeminiConfig::new(secret).with_api_base("http://127.0.0.1:1/v1beta");
    let model = Arc::new(GeminiClient::new(&config).expect("client"));

    let err = ChartAnalyzer::new(model, &config)
        .analyze(&chart_15m(), "")
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::Transport(_)));
    assert!(!err.to_string().contains(secret));
}
