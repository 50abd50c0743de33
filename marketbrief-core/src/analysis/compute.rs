//! Aggregate entry points: compute every indicator over a series.

use polars::prelude::DataFrame;
use thiserror::Error;
use tracing::debug;

use super::config::{ConfigError, IndicatorConfig};
use super::enriched::{EnrichedSeries, WindowedColumn};
use crate::data::frame::{frame_to_series, BarSchema, SchemaError};
use crate::data::DataError;
use crate::domain::PriceSeries;
use crate::indicators::atr::Atr;
use crate::indicators::bollinger::bollinger_columns;
use crate::indicators::ema::ema_of_series;
use crate::indicators::kdj::kdj_columns;
use crate::indicators::macd::macd_columns;
use crate::indicators::obv::Obv;
use crate::indicators::rsi::rsi_of_series;
use crate::indicators::sma::rolling_mean;
use crate::indicators::Indicator;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("input frame rejected: {0}")]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),
}

/// Compute every indicator with default parameters.
pub fn compute_all_indicators(series: &PriceSeries) -> EnrichedSeries {
    compute_all_indicators_with(series, &IndicatorConfig::default())
}

/// Compute every indicator with the given parameters.
///
/// The output has exactly one row per input bar. The input is not modified.
///
/// # Panics
///
/// Panics on a zero period; run `IndicatorConfig::validate` on configs that
/// come from outside the program.
pub fn compute_all_indicators_with(series: &PriceSeries, config: &IndicatorConfig) -> EnrichedSeries {
    let bars = series.bars();
    let closes = series.closes();
    let volumes = series.volumes();

    let windowed = |prefix: &str, windows: &[usize], values: &[f64], f: fn(&[f64], usize) -> Vec<f64>| {
        windows
            .iter()
            .map(|&w| {
                assert!(w >= 1, "{prefix} window must be >= 1");
                WindowedColumn::new(prefix, w, f(values, w))
            })
            .collect::<Vec<_>>()
    };

    let ma = windowed("MA", &config.ma_windows, &closes, rolling_mean);
    let ema = windowed("EMA", &config.ema_spans, &closes, ema_of_series);
    let volume_ma = windowed("VOL_MA", &config.volume_ma_windows, &volumes, rolling_mean);

    let macd = &config.macd;
    let boll = &config.bollinger;
    let kdj = &config.kdj;

    let enriched = EnrichedSeries {
        bars: bars.to_vec(),
        ma,
        ema,
        rsi: rsi_of_series(&closes, config.rsi_period),
        macd: macd_columns(&closes, macd.fast, macd.slow, macd.signal),
        bollinger: bollinger_columns(&closes, boll.period, boll.multiplier),
        kdj: kdj_columns(bars, kdj.n, kdj.m1, kdj.m2),
        volume_ma,
        atr: Atr::new(config.atr_period).compute(bars),
        obv: Obv::new().compute(bars),
    };

    debug!(
        rows = enriched.len(),
        columns = enriched.column_names().len(),
        "computed indicators"
    );
    enriched
}

/// Compute every indicator from an untyped bar frame.
///
/// The frame must carry `date`, `open`, `high`, `low`, `close` and `volume`;
/// a missing column fails before anything is computed.
pub fn compute_all_from_frame(
    df: &DataFrame,
    config: &IndicatorConfig,
) -> Result<EnrichedSeries, AnalysisError> {
    BarSchema::validate(df)?;
    config.validate()?;
    let series = frame_to_series(df)?;
    Ok(compute_all_indicators_with(&series, config))
}
