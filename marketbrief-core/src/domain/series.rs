//! PriceSeries: an ordered, validated sequence of daily bars.

use super::bar::PriceBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use thiserror::Error;

/// Reasons a bar sequence cannot form a `PriceSeries`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("bars out of order: {later} follows {earlier}")]
    OutOfOrder { earlier: NaiveDate, later: NaiveDate },

    #[error("duplicate bar for {0}")]
    DuplicateDate(NaiveDate),

    #[error("invalid bar on {date}: {reason}")]
    InvalidBar { date: NaiveDate, reason: String },
}

/// Bars ordered ascending by date with no duplicate dates.
///
/// Missing trading days are simply absent; nothing is gap-filled.
/// The series is never mutated by the indicator engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PriceBar>", into = "Vec<PriceBar>")]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Validate and wrap a bar sequence.
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        for bar in &bars {
            if !bar.is_sane() {
                let reason = if bar.is_void() {
                    "NaN price".to_string()
                } else {
                    format!(
                        "o={} h={} l={} c={} violates low <= open,close <= high",
                        bar.open, bar.high, bar.low, bar.close
                    )
                };
                return Err(SeriesError::InvalidBar {
                    date: bar.date,
                    reason,
                });
            }
        }

        for pair in bars.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.date == prev.date {
                return Err(SeriesError::DuplicateDate(next.date));
            }
            if next.date < prev.date {
                return Err(SeriesError::OutOfOrder {
                    earlier: prev.date,
                    later: next.date,
                });
            }
        }

        Ok(Self { bars })
    }

    /// Sort by date first, then validate. Duplicates are still rejected.
    pub fn from_unsorted(mut bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        bars.sort_by_key(|b| b.date);
        Self::new(bars)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }

    /// The last `n` bars as a new series (the whole series if shorter).
    pub fn tail(&self, n: usize) -> Self {
        let start = self.bars.len().saturating_sub(n);
        Self {
            bars: self.bars[start..].to_vec(),
        }
    }

    /// Bars dated on or after `date`.
    pub fn since(&self, date: NaiveDate) -> Self {
        let start = self.bars.partition_point(|b| b.date < date);
        Self {
            bars: self.bars[start..].to_vec(),
        }
    }
}

impl Deref for PriceSeries {
    type Target = [PriceBar];

    fn deref(&self) -> &Self::Target {
        &self.bars
    }
}

impl AsRef<[PriceBar]> for PriceSeries {
    fn as_ref(&self) -> &[PriceBar] {
        &self.bars
    }
}

impl TryFrom<Vec<PriceBar>> for PriceSeries {
    type Error = SeriesError;

    fn try_from(bars: Vec<PriceBar>) -> Result<Self, Self::Error> {
        Self::new(bars)
    }
}

impl From<PriceSeries> for Vec<PriceBar> {
    fn from(series: PriceSeries) -> Self {
        series.bars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar::new(
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            close,
            close + 1.0,
            close - 1.0,
            close,
            1_000,
        )
    }

    #[test]
    fn accepts_ascending_bars() {
        let series = PriceSeries::new(vec![bar(2, 10.0), bar(3, 11.0), bar(5, 12.0)]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn rejects_out_of_order() {
        let err = PriceSeries::new(vec![bar(3, 10.0), bar(2, 11.0)]).unwrap_err();
        assert!(matches!(err, SeriesError::OutOfOrder { .. }));
    }

    #[test]
    fn rejects_duplicate_dates() {
        let err = PriceSeries::new(vec![bar(2, 10.0), bar(2, 11.0)]).unwrap_err();
        assert!(matches!(err, SeriesError::DuplicateDate(_)));
    }

    #[test]
    fn rejects_insane_bar() {
        let mut b = bar(2, 10.0);
        b.high = 5.0;
        let err = PriceSeries::new(vec![b]).unwrap_err();
        assert!(matches!(err, SeriesError::InvalidBar { .. }));
    }

    #[test]
    fn from_unsorted_sorts() {
        let series = PriceSeries::from_unsorted(vec![bar(4, 12.0), bar(2, 10.0)]).unwrap();
        assert_eq!(series.closes(), vec![10.0, 12.0]);
    }

    #[test]
    fn tail_and_since() {
        let series =
            PriceSeries::new(vec![bar(2, 10.0), bar(3, 11.0), bar(4, 12.0), bar(5, 13.0)]).unwrap();
        assert_eq!(series.tail(2).closes(), vec![12.0, 13.0]);
        assert_eq!(series.tail(10).len(), 4);
        let since = series.since(NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        assert_eq!(since.closes(), vec![12.0, 13.0]);
    }

    #[test]
    fn empty_series_is_valid() {
        let series = PriceSeries::new(Vec::new()).unwrap();
        assert!(series.is_empty());
        assert!(series.last().is_none());
    }

    #[test]
    fn deserialization_validates() {
        let json = r#"[
            {"date":"2024-01-03","open":10.0,"high":11.0,"low":9.0,"close":10.0,"volume":1},
            {"date":"2024-01-02","open":10.0,"high":11.0,"low":9.0,"close":10.0,"volume":1}
        ]"#;
        assert!(serde_json::from_str::<PriceSeries>(json).is_err());
    }
}
