//! Support/resistance levels and trend-strength classification.

use serde::{Deserialize, Serialize};

use crate::domain::PriceBar;

/// Default trailing window for support/resistance.
pub const DEFAULT_LEVEL_WINDOW: usize = 20;

/// Bars needed for a trend classification.
pub const TREND_WINDOW: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupportResistance {
    /// Lowest low in the window.
    pub support: f64,
    /// Highest high in the window.
    pub resistance: f64,
}

/// Windowed extrema over the trailing `window` bars.
///
/// Uses the whole series when it is shorter than `window`. `None` for empty
/// input or a zero window.
pub fn support_resistance(bars: &[PriceBar], window: usize) -> Option<SupportResistance> {
    if bars.is_empty() || window == 0 {
        return None;
    }
    let recent = &bars[bars.len().saturating_sub(window)..];
    let support = recent.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let resistance = recent.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    Some(SupportResistance {
        support,
        resistance,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendStrength {
    #[serde(rename = "strong uptrend")]
    StrongUp,
    #[serde(rename = "mild uptrend")]
    MildUp,
    #[serde(rename = "strong downtrend")]
    StrongDown,
    #[serde(rename = "mild downtrend")]
    MildDown,
    #[serde(rename = "range-bound")]
    RangeBound,
    #[serde(rename = "insufficient data")]
    InsufficientData,
}

impl TrendStrength {
    pub fn label(self) -> &'static str {
        match self {
            TrendStrength::StrongUp => "strong uptrend",
            TrendStrength::MildUp => "mild uptrend",
            TrendStrength::StrongDown => "strong downtrend",
            TrendStrength::MildDown => "mild downtrend",
            TrendStrength::RangeBound => "range-bound",
            TrendStrength::InsufficientData => "insufficient data",
        }
    }
}

impl std::fmt::Display for TrendStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Least-squares slope of `ys` against x = 0, 1, 2, ...
pub fn linear_slope(ys: &[f64]) -> f64 {
    let n = ys.len();
    if n < 2 {
        return 0.0;
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = ys.iter().sum::<f64>() / n as f64;
    let (num, den) = ys.iter().enumerate().fold((0.0, 0.0), |(num, den), (i, &y)| {
        let dx = i as f64 - x_mean;
        (num + dx * (y - y_mean), den + dx * dx)
    });
    num / den
}

/// Classify the trend of the trailing 20 closes.
pub fn trend_strength(bars: &[PriceBar]) -> TrendStrength {
    if bars.len() < TREND_WINDOW {
        return TrendStrength::InsufficientData;
    }
    let closes: Vec<f64> = bars[bars.len() - TREND_WINDOW..]
        .iter()
        .map(|b| b.close)
        .collect();
    let mean = closes.iter().sum::<f64>() / closes.len() as f64;
    let latest = closes[closes.len() - 1];
    let slope = linear_slope(&closes);

    if slope > 0.0 && latest > mean {
        TrendStrength::StrongUp
    } else if slope > 0.0 {
        TrendStrength::MildUp
    } else if slope < 0.0 && latest < mean {
        TrendStrength::StrongDown
    } else if slope < 0.0 {
        TrendStrength::MildDown
    } else {
        TrendStrength::RangeBound
    }
}
