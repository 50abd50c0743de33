//! On-Balance Volume (OBV).
//!
//! Running total over the whole series: +volume on an up close, -volume on a
//! down close, 0 when unchanged. Row 0 contributes 0. Never reset per window.
//! Lookback: 0.

use super::Indicator;
use crate::domain::PriceBar;

#[derive(Debug, Clone, Default)]
pub struct Obv;

impl Obv {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for Obv {
    fn name(&self) -> &str {
        "OBV"
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let mut result = Vec::with_capacity(bars.len());
        let mut total = 0.0;

        for (i, bar) in bars.iter().enumerate() {
            if i > 0 {
                let prev = bars[i - 1].close;
                let volume = bar.volume as f64;
                if bar.close > prev {
                    total += volume;
                } else if bar.close < prev {
                    total -= volume;
                }
            }
            result.push(total);
        }

        result
    }
}
