//! Technical indicators.
//!
//! Every indicator is a pure function of a bar slice: bars in, one value per
//! bar out. Rows inside an indicator's warm-up window hold `f64::NAN`, never
//! zero. Multi-line indicators (MACD, Bollinger, KDJ) are exposed as one
//! `Indicator` instance per line plus a `*_columns` function that computes
//! every line in a single pass for the aggregate engine.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod kdj;
pub mod macd;
pub mod obv;
pub mod rsi;
pub mod sma;

pub use atr::Atr;
pub use bollinger::{Bollinger, BollingerBand, BollingerColumns};
pub use ema::Ema;
pub use kdj::{Kdj, KdjColumns, KdjLine};
pub use macd::{Macd, MacdColumns, MacdLine};
pub use obv::Obv;
pub use rsi::Rsi;
pub use sma::{PriceField, Sma};

use crate::domain::PriceBar;

/// Trait for indicators.
///
/// `compute` returns a `Vec<f64>` of the same length as `bars`. The first
/// `lookback()` values are `f64::NAN`.
///
/// No value at row t may depend on bars after t: computing on a truncated
/// series must reproduce the same leading rows as the full series.
pub trait Indicator: Send + Sync {
    /// Output column name (e.g. "MA20", "RSI", "BOLL_UPPER").
    fn name(&self) -> &str;

    /// Number of leading rows that are undefined.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[PriceBar]) -> Vec<f64>;
}

/// Rolling extremum over a trailing window; NaN until `window` rows exist
/// or when the window contains a NaN.
pub(crate) fn rolling_extreme(values: &[f64], window: usize, pick: fn(f64, f64) -> f64) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if window == 0 || n < window {
        return result;
    }

    for i in (window - 1)..n {
        let slice = &values[(i + 1 - window)..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = slice.iter().copied().reduce(pick).unwrap_or(f64::NAN);
    }

    result
}

/// Rolling minimum (`min_periods == window`).
pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    rolling_extreme(values, window, f64::min)
}

/// Rolling maximum (`min_periods == window`).
pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    rolling_extreme(values, window, f64::max)
}

/// Create synthetic bars from close prices for testing.
///
/// open = prev_close (or close for first bar), high = max(open,close) + 1.0,
/// low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceBar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
