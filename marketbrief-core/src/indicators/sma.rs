//! Simple Moving Average (SMA).
//!
//! Rolling mean over a lookback window, applied to close (`MA{w}`) or
//! volume (`VOL_MA{w}`).
//! Lookback: window - 1 (first valid value at index window-1).

use super::Indicator;
use crate::domain::PriceBar;

/// Which bar field a moving average reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    Close,
    Volume,
}

impl PriceField {
    pub fn extract(self, bars: &[PriceBar]) -> Vec<f64> {
        match self {
            PriceField::Close => bars.iter().map(|b| b.close).collect(),
            PriceField::Volume => bars.iter().map(|b| b.volume as f64).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Sma {
    window: usize,
    field: PriceField,
    name: String,
}

impl Sma {
    /// Moving average of close, named `MA{window}`.
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "SMA window must be >= 1");
        Self {
            window,
            field: PriceField::Close,
            name: format!("MA{window}"),
        }
    }

    /// Moving average of volume, named `VOL_MA{window}`.
    pub fn volume(window: usize) -> Self {
        assert!(window >= 1, "SMA window must be >= 1");
        Self {
            window,
            field: PriceField::Volume,
            name: format!("VOL_MA{window}"),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window.saturating_sub(1)
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        rolling_mean(&self.field.extract(bars), self.window)
    }
}

/// Rolling mean of an arbitrary series.
///
/// A row is NaN until `window` values exist, and whenever the trailing
/// window contains a NaN. Each window is summed afresh, so a run of zeros
/// averages to exactly zero.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
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
        result[i] = slice.iter().sum::<f64>() / window as f64;
    }

    result
}
