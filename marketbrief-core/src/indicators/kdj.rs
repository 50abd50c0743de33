//! KDJ stochastic oscillator.
//!
//! RSV[t] = (close[t] - LL) / (HH - LL) * 100, where LL / HH are the rolling
//! min(low) / max(high) over the trailing `n` bars (undefined until `n` bars).
//! K = recursive smoothing of RSV with alpha = 1/m1, seeded from the first RSV.
//! D = the same smoothing of K with alpha = 1/m2.
//! J = 3K - 2D.
//!
//! A zero trading range (HH == LL) sets RSV to 50.
//! K, D and J are unbounded; J regularly leaves [0, 100].
//! Lookback: n - 1.

use super::ema::ewm_recursive;
use super::{rolling_max, rolling_min, Indicator};
use crate::domain::PriceBar;

/// RSV used when the lookback window has no range.
pub const FLAT_RANGE_RSV: f64 = 50.0;

/// Which KDJ line to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdjLine {
    K,
    D,
    J,
}

impl KdjLine {
    pub fn column_name(self) -> &'static str {
        match self {
            KdjLine::K => "K",
            KdjLine::D => "D",
            KdjLine::J => "J",
        }
    }
}

/// K, D and J lines, aligned with the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KdjColumns {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
    pub j: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Kdj {
    n: usize,
    m1: usize,
    m2: usize,
    line: KdjLine,
}

impl Kdj {
    pub fn new(n: usize, m1: usize, m2: usize, line: KdjLine) -> Self {
        assert!(n >= 1 && m1 >= 1 && m2 >= 1, "KDJ periods must be >= 1");
        Self { n, m1, m2, line }
    }

    pub fn k(n: usize, m1: usize, m2: usize) -> Self {
        Self::new(n, m1, m2, KdjLine::K)
    }

    pub fn d(n: usize, m1: usize, m2: usize) -> Self {
        Self::new(n, m1, m2, KdjLine::D)
    }

    pub fn j(n: usize, m1: usize, m2: usize) -> Self {
        Self::new(n, m1, m2, KdjLine::J)
    }
}

impl Indicator for Kdj {
    fn name(&self) -> &str {
        self.line.column_name()
    }

    fn lookback(&self) -> usize {
        self.n.saturating_sub(1)
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let columns = kdj_columns(bars, self.n, self.m1, self.m2);
        match self.line {
            KdjLine::K => columns.k,
            KdjLine::D => columns.d,
            KdjLine::J => columns.j,
        }
    }
}

/// Raw stochastic value per bar.
pub fn rsv(bars: &[PriceBar], n: usize) -> Vec<f64> {
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lowest = rolling_min(&lows, n);
    let highest = rolling_max(&highs, n);

    bars.iter()
        .zip(lowest.iter().zip(&highest))
        .map(|(bar, (&ll, &hh))| {
            if ll.is_nan() || hh.is_nan() || bar.close.is_nan() {
                f64::NAN
            } else if hh == ll {
                FLAT_RANGE_RSV
            } else {
                (bar.close - ll) / (hh - ll) * 100.0
            }
        })
        .collect()
}

/// Compute K, D and J in one pass.
pub fn kdj_columns(bars: &[PriceBar], n: usize, m1: usize, m2: usize) -> KdjColumns {
    let raw = rsv(bars, n);
    let k = ewm_recursive(&raw, 1.0 / m1 as f64);
    let d = ewm_recursive(&k, 1.0 / m2 as f64);
    let j = k.iter().zip(&d).map(|(k, d)| 3.0 * k - 2.0 * d).collect();
    KdjColumns { k, d, j }
}
