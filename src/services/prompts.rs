//! Instruction text sent to the model

use crate::models::{MacdSettings, Timeframe};

pub const SENTIMENT_PROMPT: &str = r#"Search for the latest crypto market sentiment from major sources like CoinMarketCap news and "Thuan Capital" youtube channel updates.

Return a JSON object with the following structure:
{
    "sentiment": "Bullish" | "Bearish" | "Neutral",
    "summary": "A concise summary of the market mood (max 2-3 sentences).",
    "keyPoints": ["Key point 1", "Key point 2", "Key point 3"]
}"#;

/// Short tag placed before each chart image
pub fn timeframe_tag(timeframe: Timeframe) -> String {
    format!(
        "Chart for the {} timeframe ({} timeframe):",
        timeframe.label(),
        timeframe.role()
    )
}

/// Full analysis instruction; the user context goes last, verbatim.
pub fn analysis_prompt(macd: &MacdSettings, timeframes: &[Timeframe], user_context: &str) -> String {
    let charts = match timeframes {
        [single] => format!("this {} chart screenshot", single.label()),
        _ => {
            let labels: Vec<&str> = timeframes.iter().map(|t| t.label()).collect();
            format!(
                "these chart screenshots ({}) together; use the higher timeframe for trend and the lower one for entry",
                labels.join(" and ")
            )
        }
    };

    format!(
        r#"You are an expert technical analyst for cryptocurrency trading.
Analyze {charts} (likely Binance).

CRITICAL INSTRUCTION:
Focus specifically on the MACD indicator {macd} at the bottom of the chart.

THE TRADING STRATEGY:
- We are looking for a specific pattern: "MACD entering the second half of the red zone".
- This means the MACD histogram bars are red (negative) but are starting to get shorter (lighter color in some themes), indicating bearish momentum is weakening and a potential reversal to the upside is coming.
- If this pattern is detected on a 15-minute or 1-hour timeframe, it is a strong signal for a LONG position.

TASK:
1. Identify the coin symbol and timeframe from the image if possible.
2. Analyze the price trend.
3. Analyze the MACD histogram state closely.
4. Provide a trading recommendation based on the strategy above.

OUTPUT FORMAT:
Return valid JSON adhering to this schema:
{{
  "trend": "UP" | "DOWN" | "NEUTRAL",
  "direction": "LONG" | "SHORT" | "WAIT",
  "entryPrice": "Suggest specific price or 'Current Market Price'",
  "targetPrice": "Suggest specific target based on resistance",
  "stopLoss": "Suggest stop loss based on recent support",
  "pnlProjection": "Estimated Risk/Reward ratio (e.g., 1:3)",
  "reasoning": "Detailed technical analysis explanation focusing on MACD",
  "confidence": "High" | "Medium" | "Low",
  "macdStatus": "Describe the specific look of the MACD histogram"
}}

CONTEXT PROVIDED BY USER:
"{user_context}""#,
        macd = macd.label(),
    )
}
