//! Selection of the candles worth narrating.

use std::fmt;

use crate::models::candle::Candle;

pub const RECENT_CANDLES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCandleReason {
    Recent,
    Extreme,
    Inflection,
}

impl fmt::Display for KeyCandleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            KeyCandleReason::Recent => "recent",
            KeyCandleReason::Extreme => "extreme",
            KeyCandleReason::Inflection => "inflection",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyCandle {
    pub index: usize,
    pub candle: Candle,
    pub reason: KeyCandleReason,
}

/// Pick up to `max` key candles from an ordered frame.
///
/// Candidates are the most recent candles, the global high and low, and close-direction
/// inflection points (local peaks and troughs). When the cap bites, recent candles win over
/// extrema and extrema over inflections; among inflections the latest are kept. The result
/// is deduplicated and in chronological order. Empty input, or any candle with `high < low`,
/// yields an empty selection.
pub fn select_key_candles(candles: &[Candle], max: usize) -> Vec<KeyCandle> {
    if candles.is_empty() || max == 0 || candles.iter().any(|c| c.high < c.low) {
        return Vec::new();
    }

    let n = candles.len();
    let mut chosen: Vec<(usize, KeyCandleReason)> = Vec::with_capacity(max);

    for index in (n.saturating_sub(RECENT_CANDLES)..n).rev() {
        add(&mut chosen, max, index, KeyCandleReason::Recent);
    }

    if let Some((index, _)) = candles.iter().enumerate().max_by_key(|(_, c)| c.high) {
        add(&mut chosen, max, index, KeyCandleReason::Extreme);
    }
    if let Some((index, _)) = candles.iter().enumerate().min_by_key(|(_, c)| c.low) {
        add(&mut chosen, max, index, KeyCandleReason::Extreme);
    }

    if n >= 3 {
        for index in (1..n - 1).rev() {
            if is_inflection(candles, index) {
                add(&mut chosen, max, index, KeyCandleReason::Inflection);
            }
        }
    }

    chosen.sort_by_key(|(index, _)| *index);
    chosen
        .into_iter()
        .map(|(index, reason)| KeyCandle {
            index,
            candle: candles[index].clone(),
            reason,
        })
        .collect()
}

fn add(chosen: &mut Vec<(usize, KeyCandleReason)>, max: usize, index: usize, reason: KeyCandleReason) {
    if chosen.len() < max && !chosen.iter().any(|(i, _)| *i == index) {
        chosen.push((index, reason));
    }
}

/// A close that is strictly above (peak) or below (trough) both neighbours.
fn is_inflection(candles: &[Candle], index: usize) -> bool {
    let prev = candles[index - 1].close;
    let curr = candles[index].close;
    let next = candles[index + 1].close;
    (curr > prev && curr > next) || (curr < prev && curr < next)
}
