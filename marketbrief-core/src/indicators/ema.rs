//! Exponential Moving Average (EMA).
//!
//! Recursive form: EMA[0] = close[0], EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1]
//! with alpha = 2 / (span + 1).
//! Lookback: 0. The recursion is seeded from the first value, not from an SMA
//! and not from a weighted average over all history.

use super::Indicator;
use crate::domain::PriceBar;

#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    name: String,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "EMA span must be >= 1");
        Self {
            span,
            name: format!("EMA{span}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ema_of_series(&closes, self.span)
    }
}

/// Smoothing factor for a span: 2 / (span + 1).
pub fn span_alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// EMA of an arbitrary series by span.
pub fn ema_of_series(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return vec![f64::NAN; values.len()];
    }
    ewm_recursive(values, span_alpha(span))
}

/// Recursive exponential smoothing with a fixed alpha.
///
/// Leading NaN rows stay NaN; the first defined value seeds the recursion.
/// A NaN after the seed holds the previous smoothed value and is skipped by
/// the recursion.
pub fn ewm_recursive(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];
    let mut prev: Option<f64> = None;

    for (i, &v) in values.iter().enumerate() {
        prev = match (prev, v.is_nan()) {
            (None, true) => None,
            (None, false) => Some(v),
            (Some(p), true) => Some(p),
            (Some(p), false) => Some(alpha * v + (1.0 - alpha) * p),
        };
        if let Some(p) = prev {
            result[i] = p;
        }
    }

    result
}
