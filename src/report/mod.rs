//! Plain-text market reports.

use rust_decimal::Decimal;

use crate::analysis::EnhancedAnalysis;
use crate::models::market_data::MarketDataSet;

const NOT_AVAILABLE: &str = "N/A";

fn fixed(value: Decimal, places: u32) -> String {
    format!("{:.*}", places as usize, value.round_dp(places))
}

fn price(value: Decimal) -> String {
    fixed(value, 2)
}

fn optional(value: Option<Decimal>, places: u32) -> String {
    value
        .map(|v| fixed(v, places))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn render_basic_report(data: &MarketDataSet) -> String {
    let lines = [
        format!("=== MARKET DATA: {} ===", data.symbol()),
        format!("Timestamp: {} UTC", data.timestamp().format("%Y-%m-%d %H:%M:%S")),
        String::new(),
        "PRICE & INDICATORS:".to_string(),
        format!("Current Price: {}", price(data.current_price())),
        format!("RSI(14): {}", price(data.rsi_14())),
        format!("MACD Signal: {}", data.macd_signal()),
        format!("MA(20): {}", price(data.ma_20())),
        format!("MA(50): {}", price(data.ma_50())),
        format!("MA Trend: {}", data.ma_trend()),
        format!("Volume Profile: {}", data.volume_profile()),
        format!("BTC Correlation: {}", optional(data.btc_correlation(), 3)),
        format!(
            "Fear & Greed Index: {}",
            data.fear_greed_index()
                .map(|v| v.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        ),
        String::new(),
        "SUPPORT/RESISTANCE:".to_string(),
        format!("Support: {}", optional(data.support_level(), 2)),
        format!("Resistance: {}", optional(data.resistance_level(), 2)),
    ];
    lines.join("\n")
}

/// Basic report followed by the candlestick analysis block.
pub fn render_enhanced_report(data: &MarketDataSet, analysis: &EnhancedAnalysis) -> String {
    format!(
        "{}\n\nCANDLESTICK ANALYSIS:\n{}",
        render_basic_report(data),
        analysis.render()
    )
}
