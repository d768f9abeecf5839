//! Fixed-point helpers shared by the indicators.
//!
//! Everything monetary stays in `Decimal`. Statistics that need square roots
//! (correlation) convert to `f64` internally and back at the boundary.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Sum that reports overflow instead of panicking.
pub fn checked_sum(values: &[Decimal]) -> Option<Decimal> {
    values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
}

/// Arithmetic mean. `None` for an empty slice or on overflow.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    checked_sum(values)?.checked_div(Decimal::from(values.len() as u64))
}

/// Simple moving average over the last `period` values.
pub fn sma(values: &[Decimal], period: usize) -> Option<Decimal> {
    if period == 0 || values.len() < period {
        return None;
    }
    mean(&values[values.len() - period..])
}

/// Exponential moving average series.
///
/// Multiplier `k = 2 / (period + 1)`, seeded with the SMA of the first `period`
/// values. The first element corresponds to index `period - 1` of the input.
/// Returns an empty `Vec` if there is not enough data.
pub fn ema_series(values: &[Decimal], period: usize) -> Vec<Decimal> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let k = dec!(2) / Decimal::from(period as u64 + 1);
    let one_minus_k = Decimal::ONE - k;

    let Some(seed) = mean(&values[..period]) else {
        return Vec::new();
    };

    let mut result = Vec::with_capacity(values.len() - period + 1);
    result.push(seed);

    let mut prev = seed;
    for &value in &values[period..] {
        prev = value * k + prev * one_minus_k;
        result.push(prev);
    }

    result
}

/// Close-to-close fractional returns. Pairs with a zero previous value are skipped.
pub fn returns(values: &[Decimal]) -> Vec<f64> {
    values
        .windows(2)
        .filter_map(|w| {
            let change = (w[1] - w[0]).checked_div(w[0])?;
            change.to_f64()
        })
        .collect()
}

/// Pearson correlation coefficient of two equally long series.
///
/// Zero variance in either series yields `0.0`.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return 0.0;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);

    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }

    let r = cov / denominator;
    if r.is_finite() {
        r
    } else {
        0.0
    }
}

/// Convert back to `Decimal`; non-finite input has no fixed-point representation.
pub fn to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
}

/// Percentage change from `from` to `to`. `None` if `from` is zero.
pub fn pct_change(from: Decimal, to: Decimal) -> Option<Decimal> {
    (to - from)
        .checked_div(from)?
        .checked_mul(Decimal::ONE_HUNDRED)
}
