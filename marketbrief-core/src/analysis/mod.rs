//! Aggregate indicator engine.
//!
//! Pure functions over an in-memory series: no I/O, no state kept between
//! calls. Safe to run for many instruments in parallel, one series each.

pub mod compute;
pub mod config;
pub mod enriched;
pub mod levels;
pub mod signals;

pub use compute::{compute_all_from_frame, compute_all_indicators, compute_all_indicators_with, AnalysisError};
pub use config::{BollingerParams, ConfigError, IndicatorConfig, KdjParams, MaOrdering, MacdParams};
pub use enriched::{EnrichedSeries, WindowedColumn};
pub use levels::{support_resistance, trend_strength, SupportResistance, TrendStrength, DEFAULT_LEVEL_WINDOW};
pub use signals::{
    latest_signals, latest_signals_with, BandPosition, KdjSignal, KdjZone, MaAlignment, MacdLabel,
    MacdSignal, RsiLabel, RsiSignal, SignalSummary,
};
