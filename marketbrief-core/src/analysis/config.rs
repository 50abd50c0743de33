//! Indicator parameters.
//!
//! Every field has a default matching the standard daily-chart settings, so
//! an empty TOML table (or `IndicatorConfig::default()`) is a complete config.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid period for {field}: {value} (must be >= {min})")]
    InvalidPeriod {
        field: &'static str,
        value: usize,
        min: usize,
    },

    #[error("{0} must list at least one window")]
    EmptyWindows(&'static str),

    #[error("{field} lists window {window} more than once")]
    DuplicateWindow { field: &'static str, window: usize },

    #[error("invalid Bollinger multiplier: {0} (must be finite and > 0)")]
    InvalidMultiplier(f64),

    #[error("parse indicator config: {0}")]
    Parse(String),
}

/// How the moving-average alignment signal picks its three columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaOrdering {
    /// First three `MA{w}` column names in string order ("MA10" < "MA20" < "MA5").
    #[default]
    Lexicographic,
    /// Three shortest windows, shortest first.
    Numeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerParams {
    pub period: usize,
    pub multiplier: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            period: 20,
            multiplier: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdjParams {
    pub n: usize,
    pub m1: usize,
    pub m2: usize,
}

impl Default for KdjParams {
    fn default() -> Self {
        Self { n: 9, m1: 3, m2: 3 }
    }
}

/// Parameters for every indicator the aggregate engine computes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub ma_windows: Vec<usize>,
    pub ema_spans: Vec<usize>,
    pub rsi_period: usize,
    pub macd: MacdParams,
    pub bollinger: BollingerParams,
    pub kdj: KdjParams,
    pub volume_ma_windows: Vec<usize>,
    pub atr_period: usize,
    pub ma_ordering: MaOrdering,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ma_windows: vec![5, 10, 20, 60],
            ema_spans: vec![5, 12, 26],
            rsi_period: 14,
            macd: MacdParams::default(),
            bollinger: BollingerParams::default(),
            kdj: KdjParams::default(),
            volume_ma_windows: vec![5, 10, 20],
            atr_period: 14,
            ma_ordering: MaOrdering::default(),
        }
    }
}

fn check_period(field: &'static str, value: usize, min: usize) -> Result<(), ConfigError> {
    if value < min {
        return Err(ConfigError::InvalidPeriod { field, value, min });
    }
    Ok(())
}

fn check_windows(field: &'static str, windows: &[usize]) -> Result<(), ConfigError> {
    if windows.is_empty() {
        return Err(ConfigError::EmptyWindows(field));
    }
    windows.iter().try_for_each(|&w| check_period(field, w, 1))?;
    // each window names one output column
    let mut seen = HashSet::new();
    match windows.iter().find(|&&w| !seen.insert(w)) {
        Some(&window) => Err(ConfigError::DuplicateWindow { field, window }),
        None => Ok(()),
    }
}

impl IndicatorConfig {
    /// Parse from a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameters the indicator constructors would refuse.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_windows("ma_windows", &self.ma_windows)?;
        check_windows("ema_spans", &self.ema_spans)?;
        check_windows("volume_ma_windows", &self.volume_ma_windows)?;
        check_period("rsi_period", self.rsi_period, 1)?;
        check_period("atr_period", self.atr_period, 1)?;
        check_period("macd.fast", self.macd.fast, 1)?;
        check_period("macd.slow", self.macd.slow, 1)?;
        check_period("macd.signal", self.macd.signal, 1)?;
        // sample std needs two observations
        check_period("bollinger.period", self.bollinger.period, 2)?;
        check_period("kdj.n", self.kdj.n, 1)?;
        check_period("kdj.m1", self.kdj.m1, 1)?;
        check_period("kdj.m2", self.kdj.m2, 1)?;

        let mult = self.bollinger.multiplier;
        if !mult.is_finite() || mult <= 0.0 {
            return Err(ConfigError::InvalidMultiplier(mult));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_standard() {
        let config = IndicatorConfig::default();
        assert_eq!(config.ma_windows, vec![5, 10, 20, 60]);
        assert_eq!(config.ema_spans, vec![5, 12, 26]);
        assert_eq!(config.rsi_period, 14);
        assert_eq!(config.macd, MacdParams { fast: 12, slow: 26, signal: 9 });
        assert_eq!(config.bollinger.period, 20);
        assert_eq!(config.kdj, KdjParams { n: 9, m1: 3, m2: 3 });
        assert_eq!(config.volume_ma_windows, vec![5, 10, 20]);
        assert_eq!(config.atr_period, 14);
        assert_eq!(config.ma_ordering, MaOrdering::Lexicographic);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = IndicatorConfig::from_toml_str("").unwrap();
        assert_eq!(config, IndicatorConfig::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let config = IndicatorConfig::from_toml_str(
            r#"
            ma_windows = [10, 30, 50]
            ma_ordering = "numeric"

            [bollinger]
            multiplier = 2.5
            "#,
        )
        .unwrap();
        assert_eq!(config.ma_windows, vec![10, 30, 50]);
        assert_eq!(config.ma_ordering, MaOrdering::Numeric);
        assert_eq!(config.bollinger.period, 20);
        assert_eq!(config.bollinger.multiplier, 2.5);
    }

    #[test]
    fn rejects_zero_period() {
        let mut config = IndicatorConfig::default();
        config.rsi_period = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPeriod { field: "rsi_period", .. })
        ));
    }

    #[test]
    fn rejects_empty_windows() {
        let mut config = IndicatorConfig::default();
        config.ema_spans.clear();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyWindows("ema_spans"))));
    }

    #[test]
    fn rejects_duplicate_windows() {
        let mut config = IndicatorConfig::default();
        config.ma_windows = vec![5, 10, 5];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateWindow { field: "ma_windows", window: 5 })
        ));

        let err = IndicatorConfig::from_toml_str("volume_ma_windows = [20, 20]").unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateWindow { field: "volume_ma_windows", .. }));
    }

    #[test]
    fn rejects_bad_multiplier() {
        let mut config = IndicatorConfig::default();
        config.bollinger.multiplier = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidMultiplier(_))));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = IndicatorConfig::from_toml_str("rsi_period = \"fourteen\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
