//! MarketBrief Core: price series, technical indicators, signal summary, data providers.
//!
//! This crate contains the computational heart of the daily brief:
//! - Domain types (bars, validated price series)
//! - Per-indicator modules behind the `Indicator` trait
//! - The aggregate engine producing an enriched series and a signal summary
//! - Support/resistance and trend-strength helpers
//! - The market data provider trait with CSV and synthetic implementations

pub mod analysis;
pub mod data;
pub mod domain;
pub mod indicators;

pub use analysis::{
    compute_all_from_frame, compute_all_indicators, compute_all_indicators_with, latest_signals,
    latest_signals_with, support_resistance, trend_strength, EnrichedSeries, IndicatorConfig,
    SignalSummary, TrendStrength,
};
pub use domain::{PriceBar, PriceSeries};
