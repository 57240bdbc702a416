//! Unit tests for reply cleanup and the per-service parse policies

use chartscope::models::{AnalysisTrend, PositionDirection, Sentiment};
use chartscope::services::chart_analyzer::parse_recommendation;
use chartscope::services::parsing::{parse_reply_json, strip_code_fences};
use chartscope::services::sentiment::parse_sentiment;
use chartscope::AnalysisError;

const RECOMMENDATION: &str = r#"{"trend":"UP","direction":"LONG","entryPrice":"100","targetPrice":"120","stopLoss":"90","pnlProjection":"1:2","reasoning":"uptrend confirmed","confidence":"High","macdStatus":"second half red zone"}"#;

#[test]
fn test_strip_json_fence() {
    let fenced = format!("```json\n{}\n```", RECOMMENDATION);
    assert_eq!(strip_code_fences(&fenced), RECOMMENDATION);
}

#[test]
fn test_strip_bare_fence() {
    let fenced = format!("```\n{}\n```\n", RECOMMENDATION);
    assert_eq!(strip_code_fences(&fenced), RECOMMENDATION);
}

#[test]
fn test_strip_leaves_plain_json_alone() {
    assert_eq!(strip_code_fences(RECOMMENDATION), RECOMMENDATION);
}

#[test]
fn test_blank_reply_parses_as_empty_object() {
    let value = parse_reply_json("  \n").unwrap();
    assert!(value.as_object().map(|o| o.is_empty()).unwrap_or(false));
}

#[test]
fn test_fenced_recommendation_matches_unfenced() {
    let plain = parse_recommendation(RECOMMENDATION).unwrap();
    for fenced in [
        format!("```json\n{}\n```", RECOMMENDATION),
        format!("```\n{}\n```", RECOMMENDATION),
        format!("```json{}```", RECOMMENDATION),
    ] {
        assert_eq!(parse_recommendation(&fenced).unwrap(), plain);
    }
    assert_eq!(plain.trend, AnalysisTrend::Up);
    assert_eq!(plain.direction, PositionDirection::Long);
}

#[test]
fn test_recommendation_empty_reply_is_all_defaults() {
    let rec = parse_recommendation("").unwrap();
    assert_eq!(rec.trend, AnalysisTrend::Neutral);
    assert_eq!(rec.direction, PositionDirection::Wait);
    assert_eq!(rec.entry_price, "N/A");
}

#[test]
fn test_recommendation_garbage_is_malformed() {
    let err = parse_recommendation("```json\nThe chart looks bullish\n```").unwrap_err();
    assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    assert!(err.is_retryable());
}

#[test]
fn test_sentiment_direct_then_fenced() {
    let plain = r#"{"sentiment":"Bearish","summary":"Risk off.","keyPoints":["Outflows"]}"#;
    let direct = parse_sentiment(plain).unwrap();
    let fenced = parse_sentiment(&format!("```json\n{}\n```", plain)).unwrap();

    assert_eq!(direct, fenced);
    assert_eq!(direct.sentiment, Sentiment::Bearish);
}

#[test]
fn test_sentiment_garbage_is_error() {
    assert!(parse_sentiment("no json here").is_err());
}

#[test]
fn test_fence_inside_string_value_is_kept() {
    let reply = r#"{"reasoning":"see ```json block","entryPrice":"1"}"#;
    assert_eq!(strip_code_fences(reply), reply);

    let rec = parse_recommendation(reply).unwrap();
    assert_eq!(rec.reasoning, "see ```json block");
    assert_eq!(rec.entry_price, "1");

    let fenced = parse_recommendation(&format!("```json\n{}\n```", reply)).unwrap();
    assert_eq!(fenced, rec);
}

#[test]
fn test_fenced_sentiment_keeps_inner_fence() {
    let plain = r#"{"sentiment":"Neutral","summary":"Quoted ``` in text","keyPoints":[]}"#;
    let data = parse_sentiment(&format!("```\n{}\n```", plain)).unwrap();
    assert_eq!(data.summary, "Quoted ``` in text");
}
