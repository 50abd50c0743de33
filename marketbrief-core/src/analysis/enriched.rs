//! The enriched series: source bars plus every derived indicator column.

use chrono::NaiveDate;
use polars::prelude::*;

use crate::domain::PriceBar;
use crate::indicators::{BollingerColumns, KdjColumns, MacdColumns};

/// One column of a windowed indicator family (`MA20`, `EMA12`, `VOL_MA5`).
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedColumn {
    pub name: String,
    pub window: usize,
    pub values: Vec<f64>,
}

impl WindowedColumn {
    pub fn new(prefix: &str, window: usize, values: Vec<f64>) -> Self {
        Self {
            name: format!("{prefix}{window}"),
            window,
            values,
        }
    }
}

/// Bars plus indicator columns, all aligned by row.
///
/// Every column has exactly `len()` values. Warm-up rows hold `f64::NAN`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedSeries {
    pub bars: Vec<PriceBar>,
    pub ma: Vec<WindowedColumn>,
    pub ema: Vec<WindowedColumn>,
    pub rsi: Vec<f64>,
    pub macd: MacdColumns,
    pub bollinger: BollingerColumns,
    pub kdj: KdjColumns,
    pub volume_ma: Vec<WindowedColumn>,
    pub atr: Vec<f64>,
    pub obv: Vec<f64>,
}

impl EnrichedSeries {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// Every indicator column in output order, paired with its name.
    pub fn columns(&self) -> Vec<(&str, &[f64])> {
        let mut out: Vec<(&str, &[f64])> = Vec::new();
        out.extend(self.ma.iter().map(|c| (c.name.as_str(), c.values.as_slice())));
        out.extend(self.ema.iter().map(|c| (c.name.as_str(), c.values.as_slice())));
        out.push(("RSI", &self.rsi));
        out.push(("MACD", &self.macd.macd));
        out.push(("MACD_Signal", &self.macd.signal));
        out.push(("MACD_Histogram", &self.macd.histogram));
        out.push(("BOLL_MID", &self.bollinger.mid));
        out.push(("BOLL_STD", &self.bollinger.std));
        out.push(("BOLL_UPPER", &self.bollinger.upper));
        out.push(("BOLL_LOWER", &self.bollinger.lower));
        out.push(("BOLL_WIDTH", &self.bollinger.width));
        out.push(("K", &self.kdj.k));
        out.push(("D", &self.kdj.d));
        out.push(("J", &self.kdj.j));
        out.extend(self.volume_ma.iter().map(|c| (c.name.as_str(), c.values.as_slice())));
        out.push(("ATR", &self.atr));
        out.push(("OBV", &self.obv));
        out
    }

    /// Indicator column names in output order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns().into_iter().map(|(name, _)| name).collect()
    }

    /// Look up an indicator column by name.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, values)| values)
    }

    /// Defined value of a column at a row; `None` when out of range or in warm-up.
    pub fn value(&self, name: &str, row: usize) -> Option<f64> {
        self.column(name)
            .and_then(|values| values.get(row).copied())
            .filter(|v| !v.is_nan())
    }

    /// Defined value of a column on the last row.
    pub fn latest(&self, name: &str) -> Option<f64> {
        self.len().checked_sub(1).and_then(|row| self.value(name, row))
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// Convert to a polars DataFrame: `date`, OHLCV, then every indicator
    /// column. Warm-up rows become nulls.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let mut columns = crate::data::frame::bar_columns(&self.bars)?;
        for (name, values) in self.columns() {
            let nullable: Vec<Option<f64>> = values
                .iter()
                .map(|&v| if v.is_nan() { None } else { Some(v) })
                .collect();
            columns.push(Column::new(name.into(), nullable));
        }
        DataFrame::new(columns)
    }
}
