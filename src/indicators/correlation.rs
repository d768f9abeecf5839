//! Cross-asset correlation against the BTC pair.

use rust_decimal::Decimal;
use tracing::debug;

use crate::common::math;
use crate::errors::{Feature, ProcessingError};
use crate::models::candle::CandleFrame;

const OPERATION: &str = "btc_correlation";

/// Pearson correlation of close-to-close returns of `symbol` against `btc_symbol`.
///
/// Both return series are aligned on their most recent `min(len)` points. Returns
/// `Ok(None)` when the symbol is the BTC pair itself. The result is clamped to
/// [-1, 1] and rounded to 3 decimal places.
pub fn calculate_btc_correlation(
    symbol: &str,
    frame: &CandleFrame,
    btc_symbol: &str,
    btc_frame: &CandleFrame,
    min_periods: usize,
) -> Result<Option<Decimal>, ProcessingError> {
    if symbol == btc_symbol {
        debug!(symbol, "Skipping BTC correlation for the BTC pair itself");
        return Ok(None);
    }

    let symbol_returns = math::returns(&frame.closes());
    let btc_returns = math::returns(&btc_frame.closes());
    let aligned = symbol_returns.len().min(btc_returns.len());

    if aligned < min_periods {
        return Err(ProcessingError::insufficient_data(
            OPERATION,
            min_periods,
            aligned,
            format!(
                "BTC correlation for {} requires {} aligned periods, {} available",
                symbol, min_periods, aligned
            ),
        )
        .for_feature(Feature::BtcCorrelation));
    }

    let xs = &symbol_returns[symbol_returns.len() - aligned..];
    let ys = &btc_returns[btc_returns.len() - aligned..];

    let r = math::pearson(xs, ys).clamp(-1.0, 1.0);
    let correlation = math::to_decimal(r)
        .ok_or_else(|| {
            ProcessingError::calculation(OPERATION, format!("correlation {} is not representable", r))
                .for_feature(Feature::BtcCorrelation)
        })?
        .round_dp(3)
        .clamp(Decimal::NEGATIVE_ONE, Decimal::ONE);

    debug!(symbol, periods = aligned, correlation = %correlation, "Computed BTC correlation");
    Ok(Some(correlation))
}
