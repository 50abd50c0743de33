//! Serializable brief configuration.
//!
//! A brief is described by one TOML file: the instrument list, where data
//! comes from, where reports go, and the indicator parameters shared by every
//! instrument. Every field has a default so a minimal file only names the
//! instruments.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use marketbrief_core::analysis::{ConfigError, IndicatorConfig, DEFAULT_LEVEL_WINDOW};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TITLE: &str = "Daily Market Brief";
pub const DEFAULT_LOOKBACK_DAYS: u32 = 120;
pub const DEFAULT_SYNTHETIC_SEED: u64 = 42;

#[derive(Debug, Error)]
pub enum BriefConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid brief config: {0}")]
    Parse(String),

    #[error("brief config lists no instruments")]
    NoInstruments,

    #[error("instrument listed twice: {0}")]
    DuplicateInstrument(String),

    #[error("instrument symbol must not be blank")]
    BlankSymbol,

    #[error("lookback_days must be at least 1")]
    ZeroLookback,

    #[error("support_window must be at least 1")]
    ZeroSupportWindow,

    #[error(transparent)]
    Indicators(#[from] ConfigError),
}

/// Where bars come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    /// `{data_dir}/{SYMBOL}.csv`
    #[default]
    Csv,
    /// Seeded random walk, for demos.
    Synthetic,
}

/// One instrument in the brief.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentConfig {
    pub symbol: String,
    /// Display name; the symbol is used when absent.
    #[serde(default)]
    pub name: Option<String>,
}

impl InstrumentConfig {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: Some(name.into()),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.symbol)
    }
}

/// Configuration of a daily brief run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BriefConfig {
    pub title: String,
    pub output_dir: PathBuf,
    pub data_dir: PathBuf,
    /// Calendar days of history requested per instrument.
    pub lookback_days: u32,
    /// Trailing bars used for support/resistance.
    pub support_window: usize,
    pub source: DataSourceKind,
    /// Master seed for the synthetic source.
    pub synthetic_seed: u64,
    pub instruments: Vec<InstrumentConfig>,
    pub indicators: IndicatorConfig,
}

impl Default for BriefConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            output_dir: PathBuf::from("reports"),
            data_dir: PathBuf::from("data"),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            support_window: DEFAULT_LEVEL_WINDOW,
            source: DataSourceKind::Csv,
            synthetic_seed: DEFAULT_SYNTHETIC_SEED,
            instruments: vec![
                InstrumentConfig::new("SPY", "S&P 500"),
                InstrumentConfig::new("QQQ", "Nasdaq 100"),
                InstrumentConfig::new("DIA", "Dow Jones"),
            ],
            indicators: IndicatorConfig::default(),
        }
    }
}

impl BriefConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, BriefConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| BriefConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BriefConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| BriefConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), BriefConfigError> {
        if self.instruments.is_empty() {
            return Err(BriefConfigError::NoInstruments);
        }
        let mut seen = HashSet::new();
        for instrument in &self.instruments {
            if instrument.symbol.trim().is_empty() {
                return Err(BriefConfigError::BlankSymbol);
            }
            if !seen.insert(instrument.symbol.as_str()) {
                return Err(BriefConfigError::DuplicateInstrument(
                    instrument.symbol.clone(),
                ));
            }
        }
        if self.lookback_days == 0 {
            return Err(BriefConfigError::ZeroLookback);
        }
        if self.support_window == 0 {
            return Err(BriefConfigError::ZeroSupportWindow);
        }
        self.indicators.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketbrief_core::analysis::MaOrdering;

    #[test]
    fn default_config_is_valid() {
        let config = BriefConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lookback_days, 120);
        assert_eq!(config.support_window, 20);
        assert_eq!(config.output_dir, PathBuf::from("reports"));
    }

    #[test]
    fn minimal_toml_fills_defaults() {
        let config = BriefConfig::from_toml_str(
            r#"
            [[instruments]]
            symbol = "AAPL"
            "#,
        )
        .unwrap();
        assert_eq!(config.instruments.len(), 1);
        assert_eq!(config.instruments[0].display_name(), "AAPL");
        assert_eq!(config.title, DEFAULT_TITLE);
        assert_eq!(config.source, DataSourceKind::Csv);
        assert_eq!(config.indicators, IndicatorConfig::default());
    }

    #[test]
    fn full_toml() {
        let config = BriefConfig::from_toml_str(
            r#"
            title = "Morning Notes"
            output_dir = "out"
            lookback_days = 200
            source = "synthetic"
            synthetic_seed = 9

            [[instruments]]
            symbol = "SPY"
            name = "S&P 500"

            [[instruments]]
            symbol = "GLD"
            name = "Gold"

            [indicators]
            ma_windows = [5, 10, 20, 60, 120]
            ma_ordering = "numeric"
            "#,
        )
        .unwrap();
        assert_eq!(config.title, "Morning Notes");
        assert_eq!(config.source, DataSourceKind::Synthetic);
        assert_eq!(config.synthetic_seed, 9);
        assert_eq!(config.instruments[1].display_name(), "Gold");
        assert_eq!(config.indicators.ma_ordering, MaOrdering::Numeric);
        assert_eq!(config.indicators.ma_windows.len(), 5);
    }

    #[test]
    fn rejects_duplicate_symbols() {
        let err = BriefConfig::from_toml_str(
            r#"
            [[instruments]]
            symbol = "SPY"
            [[instruments]]
            symbol = "SPY"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, BriefConfigError::DuplicateInstrument(s) if s == "SPY"));
    }

    #[test]
    fn rejects_empty_instrument_list() {
        let err = BriefConfig::from_toml_str("instruments = []").unwrap_err();
        assert!(matches!(err, BriefConfigError::NoInstruments));
    }

    #[test]
    fn rejects_bad_indicator_params() {
        let err = BriefConfig::from_toml_str(
            r#"
            [[instruments]]
            symbol = "SPY"
            [indicators]
            rsi_period = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, BriefConfigError::Indicators(_)));
    }

    #[test]
    fn rejects_unknown_source() {
        let err = BriefConfig::from_toml_str(
            r#"
            source = "http"
            [[instruments]]
            symbol = "SPY"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, BriefConfigError::Parse(_)));
    }

    #[test]
    fn workspace_sample_config_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../marketbrief.toml");
        let config = BriefConfig::from_file(path).unwrap();
        assert_eq!(config.instruments.len(), 4);
        assert_eq!(config.indicators, IndicatorConfig::default());
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = BriefConfig::from_file("/nonexistent/marketbrief.toml").unwrap_err();
        assert!(matches!(err, BriefConfigError::Read { .. }));
    }
}
