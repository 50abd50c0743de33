//! MarketBrief Runner: brief orchestration, Markdown reports, artifacts.
//!
//! This crate builds on `marketbrief-core` to provide:
//! - TOML brief configuration (instruments, data source, indicator params)
//! - Per-instrument analysis with failures isolated per instrument
//! - Parallel batch analysis over every configured instrument
//! - The `ReportRenderer` seam with a local Markdown template
//! - Report and JSON sidecar writing

pub mod brief;
pub mod config;
pub mod format;
pub mod report;

pub use brief::{
    analyze_instrument, analyze_instrument_as_of, analyze_series, compute_dataset_hash,
    run_brief, AnalysisStatus, DailyBrief, IndicatorValue, InstrumentAnalysis,
};
pub use config::{BriefConfig, BriefConfigError, DataSourceKind, InstrumentConfig};
pub use format::{change_pct, format_number, format_percent};
pub use report::{
    render_and_write, write_report, MarkdownRenderer, ReportError, ReportPaths, ReportRenderer,
};
