//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! - BOLL_MID: SMA(close, period)
//! - BOLL_STD: rolling SAMPLE stddev (divide by N-1) over the same window
//! - BOLL_UPPER / BOLL_LOWER: mid +/- mult * std
//! - BOLL_WIDTH: (upper - lower) / mid
//!
//! Lookback: period - 1.

use super::sma::rolling_mean;
use super::Indicator;
use crate::domain::PriceBar;

/// Which Bollinger line to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Middle,
    StdDev,
    Upper,
    Lower,
    Width,
}

impl BollingerBand {
    pub fn column_name(self) -> &'static str {
        match self {
            BollingerBand::Middle => "BOLL_MID",
            BollingerBand::StdDev => "BOLL_STD",
            BollingerBand::Upper => "BOLL_UPPER",
            BollingerBand::Lower => "BOLL_LOWER",
            BollingerBand::Width => "BOLL_WIDTH",
        }
    }
}

/// Every Bollinger line, aligned with the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BollingerColumns {
    pub mid: Vec<f64>,
    pub std: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
    pub width: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
}

impl Bollinger {
    pub fn new(period: usize, multiplier: f64, band: BollingerBand) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        Self {
            period,
            multiplier,
            band,
        }
    }

    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Upper)
    }

    pub fn middle(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Middle)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Lower)
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        self.band.column_name()
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let columns = bollinger_columns(&closes, self.period, self.multiplier);
        match self.band {
            BollingerBand::Middle => columns.mid,
            BollingerBand::StdDev => columns.std,
            BollingerBand::Upper => columns.upper,
            BollingerBand::Lower => columns.lower,
            BollingerBand::Width => columns.width,
        }
    }
}

/// Rolling sample standard deviation (ddof = 1).
///
/// NaN until `window` values exist, when the window holds a NaN, and
/// always for `window < 2`.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if window < 2 || n < window {
        return result;
    }

    for i in (window - 1)..n {
        let slice = &values[(i + 1 - window)..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = slice.iter().sum::<f64>() / window as f64;
        let variance = slice
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / (window - 1) as f64;
        result[i] = variance.sqrt();
    }

    result
}

/// Compute every Bollinger line in one pass.
pub fn bollinger_columns(closes: &[f64], period: usize, multiplier: f64) -> BollingerColumns {
    let mid = rolling_mean(closes, period);
    let std = rolling_std(closes, period);

    let upper: Vec<f64> = mid.iter().zip(&std).map(|(m, s)| m + multiplier * s).collect();
    let lower: Vec<f64> = mid.iter().zip(&std).map(|(m, s)| m - multiplier * s).collect();
    let width = upper
        .iter()
        .zip(&lower)
        .zip(&mid)
        .map(|((u, l), m)| (u - l) / m)
        .collect();

    BollingerColumns {
        mid,
        std,
        upper,
        lower,
        width,
    }
}
