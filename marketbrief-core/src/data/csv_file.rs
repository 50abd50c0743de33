//! CSV file provider.
//!
//! One file per instrument: `{data_dir}/{SYMBOL}.csv` with a header row that
//! names at least `date,open,high,low,close,volume` (any order, any case,
//! extra columns ignored). Dates are `YYYY-MM-DD`.

use std::fs::File;
use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::debug;

use super::frame::{SchemaError, REQUIRED_COLUMNS};
use super::provider::{DataError, Lookback, MarketDataProvider};
use crate::domain::{PriceBar, PriceSeries};

pub struct CsvProvider {
    data_dir: PathBuf,
}

impl CsvProvider {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn path_for(&self, instrument: &str) -> PathBuf {
        self.data_dir.join(format!("{instrument}.csv"))
    }

    /// Read every bar in the instrument's file.
    pub fn load_all(&self, instrument: &str) -> Result<PriceSeries, DataError> {
        let path = self.path_for(instrument);
        if !path.exists() {
            return Err(DataError::SymbolNotFound {
                symbol: instrument.to_string(),
            });
        }
        let file = File::open(&path)?;
        let series = read_bars(file)?;
        debug!(instrument, path = %path.display(), bars = series.len(), "loaded csv");
        Ok(series)
    }
}

impl MarketDataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, instrument: &str, lookback: Lookback) -> Result<PriceSeries, DataError> {
        Ok(lookback.apply(&self.load_all(instrument)?))
    }
}

fn parse_err(line: usize, reason: impl Into<String>) -> DataError {
    DataError::Parse {
        line,
        reason: reason.into(),
    }
}

fn parse_price(field: &str, name: &str, line: usize) -> Result<f64, DataError> {
    field
        .trim()
        .parse::<f64>()
        .map_err(|e| parse_err(line, format!("{name} '{field}': {e}")))
}

fn parse_volume(field: &str, line: usize) -> Result<u64, DataError> {
    let field = field.trim();
    if let Ok(v) = field.parse::<u64>() {
        return Ok(v);
    }
    // Some exports write volume as a float ("1234.0").
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v.trunc() as u64),
        _ => Err(parse_err(line, format!("volume '{field}' is not a non-negative number"))),
    }
}

/// Parse CSV bars from any reader. Rows are sorted by date.
pub fn read_bars<R: std::io::Read>(reader: R) -> Result<PriceSeries, DataError> {
    let mut rdr = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(::csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| parse_err(1, e.to_string()))?
        .clone();
    let mut index = [0usize; 6];
    for (slot, name) in index.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| SchemaError::MissingColumn(name.to_string()))?;
    }
    let [date_i, open_i, high_i, low_i, close_i, volume_i] = index;

    let mut bars = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        // header is line 1
        let line = row + 2;
        let record = record.map_err(|e| parse_err(line, e.to_string()))?;
        let field = |i: usize| record.get(i).unwrap_or("");

        let date = NaiveDate::parse_from_str(field(date_i), "%Y-%m-%d")
            .map_err(|e| parse_err(line, format!("date '{}': {e}", field(date_i))))?;
        bars.push(PriceBar::new(
            date,
            parse_price(field(open_i), "open", line)?,
            parse_price(field(high_i), "high", line)?,
            parse_price(field(low_i), "low", line)?,
            parse_price(field(close_i), "close", line)?,
            parse_volume(field(volume_i), line)?,
        ));
    }

    Ok(PriceSeries::from_unsorted(bars)?)
}
