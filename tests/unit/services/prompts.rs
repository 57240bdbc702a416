//! Unit tests for instruction text

use chartscope::models::{MacdSettings, Timeframe};
use chartscope::services::prompts::{analysis_prompt, timeframe_tag, SENTIMENT_PROMPT};

#[test]
fn test_analysis_prompt_ends_with_user_context() {
    let context = "BTC looks heavy, \"funding\" is negative";
    let prompt = analysis_prompt(&MacdSettings::default(), &[Timeframe::FifteenMinutes], context);

    assert!(prompt.contains("MACD indicator (12, 26, 9)"));
    assert!(prompt.contains("second half of the red zone"));
    assert!(prompt.ends_with(&format!("\"{}\"", context)));
}

#[test]
fn test_analysis_prompt_lists_all_output_fields() {
    let prompt = analysis_prompt(&MacdSettings::default(), &[Timeframe::OneHour], "");
    for field in [
        "\"trend\"",
        "\"direction\"",
        "\"entryPrice\"",
        "\"targetPrice\"",
        "\"stopLoss\"",
        "\"pnlProjection\"",
        "\"reasoning\"",
        "\"confidence\"",
        "\"macdStatus\"",
    ] {
        assert!(prompt.contains(field), "missing {field}");
    }
}

#[test]
fn test_combined_prompt_mentions_both_timeframes() {
    let prompt = analysis_prompt(
        &MacdSettings::default(),
        &[Timeframe::FifteenMinutes, Timeframe::OneHour],
        "",
    );
    assert!(prompt.contains("15-minute and 1-hour"));
}

#[test]
fn test_custom_macd_periods() {
    let macd = MacdSettings {
        fast: 8,
        slow: 21,
        signal: 5,
    };
    let prompt = analysis_prompt(&macd, &[Timeframe::FifteenMinutes], "");
    assert!(prompt.contains("(8, 21, 5)"));
}

#[test]
fn test_timeframe_tag() {
    assert!(timeframe_tag(Timeframe::FifteenMinutes).contains("15-minute"));
    assert!(timeframe_tag(Timeframe::OneHour).contains("1-hour"));
}

#[test]
fn test_sentiment_prompt_requests_shape() {
    assert!(SENTIMENT_PROMPT.contains("\"keyPoints\""));
    assert!(SENTIMENT_PROMPT.contains("Thuan Capital"));
}
