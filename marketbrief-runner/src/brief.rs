//! Brief orchestration: fetch, analyse, and collect every instrument.
//!
//! Each instrument is analysed independently with its own series, so the
//! batch runs on the rayon pool. A failing instrument never aborts the
//! batch; it becomes an `Unavailable` entry that the report renders as a
//! placeholder.

use chrono::{DateTime, NaiveDate, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use marketbrief_core::analysis::{
    compute_all_indicators_with, latest_signals_with, support_resistance, trend_strength,
    EnrichedSeries, SignalSummary, SupportResistance, TrendStrength,
};
use marketbrief_core::data::{DataError, Lookback, MarketDataProvider};
use marketbrief_core::domain::{PriceBar, PriceSeries};

use crate::config::{BriefConfig, InstrumentConfig};
use crate::format::change_pct;

/// Single-valued columns reported alongside the moving averages.
pub const KEY_COLUMNS: [&str; 13] = [
    "RSI",
    "MACD",
    "MACD_Signal",
    "MACD_Histogram",
    "BOLL_UPPER",
    "BOLL_MID",
    "BOLL_LOWER",
    "K",
    "D",
    "J",
    "ATR",
    "OBV",
    "BOLL_WIDTH",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Ok,
    Unavailable { reason: String },
}

/// Latest value of one indicator column; `None` while undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorValue {
    pub name: String,
    pub value: Option<f64>,
}

/// Everything the report says about one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentAnalysis {
    pub symbol: String,
    pub name: String,
    pub status: AnalysisStatus,
    /// Date of the last bar analysed.
    pub as_of: Option<NaiveDate>,
    pub bars: usize,
    pub last_close: Option<f64>,
    /// Day-over-day change of the close, in percent.
    pub change_pct: Option<f64>,
    pub trend: TrendStrength,
    pub levels: Option<SupportResistance>,
    pub signals: SignalSummary,
    pub indicators: Vec<IndicatorValue>,
    /// BLAKE3 of the bars analysed.
    pub data_hash: Option<String>,
}

impl InstrumentAnalysis {
    /// Placeholder entry for an instrument with nothing to analyse.
    pub fn unavailable(symbol: &str, name: &str, reason: impl Into<String>) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            status: AnalysisStatus::Unavailable {
                reason: reason.into(),
            },
            as_of: None,
            bars: 0,
            last_close: None,
            change_pct: None,
            trend: TrendStrength::InsufficientData,
            levels: None,
            signals: SignalSummary::default(),
            indicators: Vec::new(),
            data_hash: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == AnalysisStatus::Ok
    }

    /// Latest value of a reported indicator.
    pub fn indicator(&self, name: &str) -> Option<f64> {
        self.indicators
            .iter()
            .find(|v| v.name == name)
            .and_then(|v| v.value)
    }
}

/// The collected analyses of one brief run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBrief {
    pub title: String,
    pub date: NaiveDate,
    pub generated_at: DateTime<Utc>,
    /// Name of the data provider used.
    pub source: String,
    pub instruments: Vec<InstrumentAnalysis>,
    /// BLAKE3 over every instrument's bars, symbols sorted.
    pub data_hash: String,
}

impl DailyBrief {
    pub fn available_count(&self) -> usize {
        self.instruments.iter().filter(|a| a.is_available()).count()
    }
}

/// Deterministic hash of a symbol's bars.
pub fn compute_dataset_hash(symbol: &str, bars: &[PriceBar]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(symbol.as_bytes());
    for bar in bars {
        hasher.update(bar.date.to_string().as_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// Combine per-instrument hashes. Unavailable instruments hash as their
/// symbol alone.
pub fn combine_hashes(instruments: &[InstrumentAnalysis]) -> String {
    let mut entries: Vec<(&str, &str)> = instruments
        .iter()
        .map(|a| (a.symbol.as_str(), a.data_hash.as_deref().unwrap_or("")))
        .collect();
    entries.sort();

    let mut hasher = blake3::Hasher::new();
    for (symbol, hash) in entries {
        hasher.update(symbol.as_bytes());
        hasher.update(hash.as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

fn latest_value(enriched: &EnrichedSeries, name: &str) -> IndicatorValue {
    IndicatorValue {
        name: name.to_string(),
        value: enriched.latest(name),
    }
}

/// Every moving average, then `KEY_COLUMNS`.
fn key_values(enriched: &EnrichedSeries) -> Vec<IndicatorValue> {
    let mut values: Vec<IndicatorValue> = enriched
        .ma
        .iter()
        .map(|c| latest_value(enriched, &c.name))
        .collect();
    values.extend(KEY_COLUMNS.iter().map(|name| latest_value(enriched, name)));
    values
}

/// Analyse an already-loaded series.
///
/// An empty series yields an `Unavailable` entry rather than an error.
pub fn analyze_series(
    symbol: &str,
    name: &str,
    series: &PriceSeries,
    config: &BriefConfig,
) -> InstrumentAnalysis {
    if series.is_empty() {
        return InstrumentAnalysis::unavailable(symbol, name, "no bars in the lookback window");
    }

    let enriched = compute_all_indicators_with(series, &config.indicators);
    let signals = latest_signals_with(&enriched, config.indicators.ma_ordering);

    let last_close = enriched.latest_close();
    let previous_close = series.len().checked_sub(2).map(|i| series[i].close);
    let change = last_close.map(|close| previous_close.map_or(0.0, |prev| change_pct(close, prev)));

    debug!(
        symbol,
        bars = series.len(),
        signals = signals.len(),
        "analysed instrument"
    );

    InstrumentAnalysis {
        symbol: symbol.to_string(),
        name: name.to_string(),
        status: AnalysisStatus::Ok,
        as_of: enriched.latest_date(),
        bars: series.len(),
        last_close,
        change_pct: change,
        trend: trend_strength(series),
        levels: support_resistance(series, config.support_window),
        signals,
        indicators: key_values(&enriched),
        data_hash: Some(compute_dataset_hash(symbol, series)),
    }
}

/// Fetch the configured lookback, optionally cut off at `as_of`.
///
/// The cut-off is applied before the lookback so a brief for a past date
/// never sees later bars.
pub fn fetch_series(
    provider: &dyn MarketDataProvider,
    instrument: &InstrumentConfig,
    config: &BriefConfig,
    as_of: Option<NaiveDate>,
) -> Result<PriceSeries, DataError> {
    let lookback = Lookback::CalendarDays(config.lookback_days);
    match as_of {
        None => provider.fetch(&instrument.symbol, lookback),
        Some(date) => {
            let full = provider.fetch(&instrument.symbol, Lookback::Bars(usize::MAX))?;
            let cutoff = full.partition_point(|b| b.date <= date);
            let trimmed = PriceSeries::new(full[..cutoff].to_vec())?;
            Ok(lookback.apply(&trimmed))
        }
    }
}

/// Fetch and analyse one instrument; failures become `Unavailable`.
pub fn analyze_instrument(
    provider: &dyn MarketDataProvider,
    instrument: &InstrumentConfig,
    config: &BriefConfig,
) -> InstrumentAnalysis {
    analyze_instrument_as_of(provider, instrument, config, None)
}

pub fn analyze_instrument_as_of(
    provider: &dyn MarketDataProvider,
    instrument: &InstrumentConfig,
    config: &BriefConfig,
    as_of: Option<NaiveDate>,
) -> InstrumentAnalysis {
    let symbol = instrument.symbol.as_str();
    let name = instrument.display_name();
    let analysis = match fetch_series(provider, instrument, config, as_of) {
        Ok(series) => analyze_series(symbol, name, &series, config),
        Err(e) => InstrumentAnalysis::unavailable(symbol, name, e.to_string()),
    };
    if let AnalysisStatus::Unavailable { reason } = &analysis.status {
        warn!(symbol, provider = provider.name(), %reason, "instrument unavailable");
    }
    analysis
}

/// Analyse every configured instrument for `date`, in parallel.
///
/// Output order follows the configured instrument order.
pub fn run_brief(
    provider: &dyn MarketDataProvider,
    config: &BriefConfig,
    date: NaiveDate,
) -> DailyBrief {
    info!(
        instruments = config.instruments.len(),
        provider = provider.name(),
        %date,
        "running brief"
    );

    let instruments: Vec<InstrumentAnalysis> = config
        .instruments
        .par_iter()
        .map(|instrument| analyze_instrument_as_of(provider, instrument, config, Some(date)))
        .collect();

    let brief = DailyBrief {
        title: config.title.clone(),
        date,
        generated_at: Utc::now(),
        source: provider.name().to_string(),
        data_hash: combine_hashes(&instruments),
        instruments,
    };
    info!(
        available = brief.available_count(),
        total = brief.instruments.len(),
        "brief complete"
    );
    brief
}
