//! MACD: fast EMA minus slow EMA, with a signal line and histogram.
//!
//! MACD = EMA(close, fast) - EMA(close, slow)
//! MACD_Signal = EMA(MACD, signal)
//! MACD_Histogram = MACD - MACD_Signal
//!
//! All EMAs use the recursive form seeded from row 0, so every line is
//! defined from the first row. Early rows are numerically unsettled.
//! Lookback: 0.

use super::ema::ema_of_series;
use super::Indicator;
use crate::domain::PriceBar;

/// Which MACD line to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Macd,
    Signal,
    Histogram,
}

impl MacdLine {
    pub fn column_name(self) -> &'static str {
        match self {
            MacdLine::Macd => "MACD",
            MacdLine::Signal => "MACD_Signal",
            MacdLine::Histogram => "MACD_Histogram",
        }
    }
}

/// All three MACD lines, aligned with the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdColumns {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    line: MacdLine,
}

impl Macd {
    fn with_line(fast: usize, slow: usize, signal: usize, line: MacdLine) -> Self {
        assert!(
            fast >= 1 && slow >= 1 && signal >= 1,
            "MACD spans must be >= 1"
        );
        Self {
            fast,
            slow,
            signal,
            line,
        }
    }

    pub fn line(fast: usize, slow: usize, signal: usize) -> Self {
        Self::with_line(fast, slow, signal, MacdLine::Macd)
    }

    pub fn signal(fast: usize, slow: usize, signal: usize) -> Self {
        Self::with_line(fast, slow, signal, MacdLine::Signal)
    }

    pub fn histogram(fast: usize, slow: usize, signal: usize) -> Self {
        Self::with_line(fast, slow, signal, MacdLine::Histogram)
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        self.line.column_name()
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let columns = macd_columns(&closes, self.fast, self.slow, self.signal);
        match self.line {
            MacdLine::Macd => columns.macd,
            MacdLine::Signal => columns.signal,
            MacdLine::Histogram => columns.histogram,
        }
    }
}

/// Compute the MACD, signal and histogram lines in one pass.
pub fn macd_columns(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdColumns {
    let fast_ema = ema_of_series(closes, fast);
    let slow_ema = ema_of_series(closes, slow);

    let macd: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_of_series(&macd, signal);
    let histogram = macd
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    MacdColumns {
        macd,
        signal: signal_line,
        histogram,
    }
}
