//! Market data provider trait and structured error types.
//!
//! The MarketDataProvider trait abstracts over data sources (CSV files,
//! synthetic generators, anything a caller plugs in) so the analysis code
//! never knows where bars came from.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::frame::SchemaError;
use crate::domain::{PriceSeries, SeriesError};

/// Structured error types for data operations.
///
/// These are displayable as-is in CLI output and report placeholders.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("invalid series: {0}")]
    Series(#[from] SeriesError),

    #[error("parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("frame error: {0}")]
    Frame(#[from] polars::error::PolarsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// How much history to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lookback {
    /// Bars dated within this many calendar days of the most recent bar.
    CalendarDays(u32),
    /// The most recent `n` bars.
    Bars(usize),
}

impl Lookback {
    /// Trim a full series down to this lookback.
    pub fn apply(self, series: &PriceSeries) -> PriceSeries {
        match self {
            Lookback::Bars(n) => series.tail(n),
            Lookback::CalendarDays(days) => match series.last() {
                // a start before the representable calendar keeps everything
                Some(last) => match last.date.checked_sub_signed(chrono::Duration::days(days as i64)) {
                    Some(start) => series.since(start),
                    None => series.clone(),
                },
                None => PriceSeries::empty(),
            },
        }
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookback::CalendarDays(d) => write!(f, "{d} calendar days"),
            Lookback::Bars(n) => write!(f, "{n} bars"),
        }
    }
}

/// Source of daily bars for an instrument.
///
/// Implementations return a series ordered ascending by date. An empty
/// series is a valid answer meaning "nothing available".
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars for an instrument over a lookback window.
    fn fetch(&self, instrument: &str, lookback: Lookback) -> Result<PriceSeries, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceBar;
    use chrono::NaiveDate;

    fn daily(n: usize) -> PriceSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = (0..n)
            .map(|i| {
                let c = 100.0 + i as f64;
                PriceBar::new(base + chrono::Duration::days(i as i64), c, c + 1.0, c - 1.0, c, 10)
            })
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    #[test]
    fn bars_lookback_takes_tail() {
        let series = daily(10);
        let trimmed = Lookback::Bars(3).apply(&series);
        assert_eq!(trimmed.len(), 3);
        assert_eq!(trimmed.last(), series.last());
    }

    #[test]
    fn calendar_lookback_counts_from_last_bar() {
        let series = daily(10);
        // last bar is Jan 10; 4 days back is Jan 6 inclusive
        let trimmed = Lookback::CalendarDays(4).apply(&series);
        assert_eq!(trimmed.len(), 5);
        assert_eq!(
            trimmed.first().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 1, 6).unwrap()
        );
    }

    #[test]
    fn calendar_lookback_past_min_date_keeps_everything() {
        let series = daily(10);
        let trimmed = Lookback::CalendarDays(u32::MAX).apply(&series);
        assert_eq!(trimmed, series);
    }

    #[test]
    fn lookback_on_empty_series() {
        assert!(Lookback::CalendarDays(30).apply(&PriceSeries::empty()).is_empty());
        assert!(Lookback::Bars(30).apply(&PriceSeries::empty()).is_empty());
    }

    #[test]
    fn errors_display() {
        let err = DataError::SymbolNotFound {
            symbol: "XYZ".into(),
        };
        assert_eq!(err.to_string(), "symbol not found: XYZ");
        let err = DataError::from(SchemaError::MissingColumn("close".into()));
        assert_eq!(err.to_string(), "missing required column: close");
    }
}
