//! Polars frame conversion for price series.
//!
//! Canonical layout: `date` (Date), `open`/`high`/`low`/`close` (Float64),
//! `volume` (UInt64). Frames coming from elsewhere may carry any numeric
//! type in the price and volume columns; they are cast on the way in.

use chrono::NaiveDate;
use polars::prelude::*;

use super::provider::DataError;
use crate::domain::{PriceBar, PriceSeries};

/// Columns every bar frame must carry.
pub const REQUIRED_COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("type mismatch in column {column}: expected {expected}, got {actual:?}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        actual: DataType,
    },

    #[error("null value in column {column} at row {row}")]
    NullValue { column: String, row: usize },
}

/// Expected schema for bar frames.
pub struct BarSchema;

impl BarSchema {
    /// Check that every required column exists with a usable type.
    ///
    /// Presence is checked for all columns before any type, so a frame
    /// missing `close` reports the missing column even if `open` is a string.
    pub fn validate(df: &DataFrame) -> Result<(), SchemaError> {
        let actual = df.schema();

        for name in REQUIRED_COLUMNS {
            if !actual.contains(name) {
                return Err(SchemaError::MissingColumn(name.to_string()));
            }
        }

        for name in REQUIRED_COLUMNS {
            let dtype = actual
                .get(name)
                .ok_or_else(|| SchemaError::MissingColumn(name.to_string()))?;
            let (ok, expected) = if name == "date" {
                (*dtype == DataType::Date, "Date")
            } else {
                (is_numeric(dtype), "numeric")
            };
            if !ok {
                return Err(SchemaError::TypeMismatch {
                    column: name.to_string(),
                    expected,
                    actual: dtype.clone(),
                });
            }
        }

        Ok(())
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

fn epoch() -> NaiveDate {
    // chrono's default date is 1970-01-01
    NaiveDate::default()
}

/// The six canonical bar columns, ready to extend with more columns.
pub(crate) fn bar_columns(bars: &[PriceBar]) -> PolarsResult<Vec<Column>> {
    let dates: Vec<i32> = bars
        .iter()
        .map(|b| (b.date - epoch()).num_days() as i32)
        .collect();
    let opens: Vec<f64> = bars.iter().map(|b| b.open).collect();
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let volumes: Vec<u64> = bars.iter().map(|b| b.volume).collect();

    Ok(vec![
        Column::new("date".into(), dates).cast(&DataType::Date)?,
        Column::new("open".into(), opens),
        Column::new("high".into(), highs),
        Column::new("low".into(), lows),
        Column::new("close".into(), closes),
        Column::new("volume".into(), volumes),
    ])
}

/// Convert a price series to a bar frame.
pub fn series_to_frame(series: &PriceSeries) -> Result<DataFrame, DataError> {
    Ok(DataFrame::new(bar_columns(series.bars())?)?)
}

fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, DataError> {
    let cast = df.column(name)?.cast(&DataType::Float64)?;
    let ca = cast.f64()?;
    (0..ca.len())
        .map(|row| {
            ca.get(row).ok_or_else(|| {
                DataError::from(SchemaError::NullValue {
                    column: name.to_string(),
                    row,
                })
            })
        })
        .collect()
}

/// Convert a bar frame to a validated price series.
///
/// Rows are sorted by date before validation, so an unsorted frame is fine;
/// duplicate dates and insane bars are rejected.
pub fn frame_to_series(df: &DataFrame) -> Result<PriceSeries, DataError> {
    BarSchema::validate(df)?;

    let date_ca = df.column("date")?.date()?;
    let opens = f64_values(df, "open")?;
    let highs = f64_values(df, "high")?;
    let lows = f64_values(df, "low")?;
    let closes = f64_values(df, "close")?;
    let volume_col = df.column("volume")?.cast(&DataType::UInt64)?;
    let volume_ca = volume_col.u64()?;

    let mut bars = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let days = date_ca.get(row).ok_or_else(|| SchemaError::NullValue {
            column: "date".into(),
            row,
        })?;
        let volume = volume_ca.get(row).ok_or_else(|| SchemaError::NullValue {
            column: "volume".into(),
            row,
        })?;
        bars.push(PriceBar::new(
            epoch() + chrono::Duration::days(days as i64),
            opens[row],
            highs[row],
            lows[row],
            closes[row],
            volume,
        ));
    }

    Ok(PriceSeries::from_unsorted(bars)?)
}
