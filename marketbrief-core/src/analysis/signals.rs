//! Discrete signal summary built from the last row of an enriched series.
//!
//! Thresholds are fixed. An indicator whose inputs are undefined on the last
//! row is left out of the summary entirely; there are no placeholder entries.

use serde::{Deserialize, Serialize};

use super::config::MaOrdering;
use super::enriched::{EnrichedSeries, WindowedColumn};

pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;
pub const BAND_NEAR_UPPER: f64 = 0.8;
pub const BAND_NEAR_LOWER: f64 = 0.2;
pub const KDJ_J_OVERBOUGHT: f64 = 100.0;
pub const KDJ_J_OVERSOLD: f64 = 0.0;

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsiLabel {
    #[serde(rename = "overbought")]
    Overbought,
    #[serde(rename = "oversold")]
    Oversold,
    #[serde(rename = "neutral")]
    Neutral,
}

impl RsiLabel {
    pub fn classify(rsi: f64) -> Self {
        if rsi > RSI_OVERBOUGHT {
            RsiLabel::Overbought
        } else if rsi < RSI_OVERSOLD {
            RsiLabel::Oversold
        } else {
            RsiLabel::Neutral
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RsiLabel::Overbought => "overbought",
            RsiLabel::Oversold => "oversold",
            RsiLabel::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MacdLabel {
    #[serde(rename = "bullish")]
    Bullish,
    #[serde(rename = "bearish")]
    Bearish,
}

impl MacdLabel {
    /// Strict comparison: a tie is bearish.
    pub fn classify(macd: f64, signal: f64) -> Self {
        if macd > signal {
            MacdLabel::Bullish
        } else {
            MacdLabel::Bearish
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MacdLabel::Bullish => "bullish",
            MacdLabel::Bearish => "bearish",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaAlignment {
    #[serde(rename = "bullish alignment")]
    Bullish,
    #[serde(rename = "bearish alignment")]
    Bearish,
    #[serde(rename = "choppy/consolidating")]
    Choppy,
}

impl MaAlignment {
    pub fn classify(a: f64, b: f64, c: f64) -> Self {
        if a > b && b > c {
            MaAlignment::Bullish
        } else if a < b && b < c {
            MaAlignment::Bearish
        } else {
            MaAlignment::Choppy
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MaAlignment::Bullish => "bullish alignment",
            MaAlignment::Bearish => "bearish alignment",
            MaAlignment::Choppy => "choppy/consolidating",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandPosition {
    #[serde(rename = "broke above upper band")]
    AboveUpper,
    #[serde(rename = "broke below lower band")]
    BelowLower,
    #[serde(rename = "near upper band")]
    NearUpper,
    #[serde(rename = "near lower band")]
    NearLower,
    #[serde(rename = "near midline")]
    NearMid,
}

impl BandPosition {
    pub fn classify(close: f64, upper: f64, lower: f64) -> Self {
        if close > upper {
            return BandPosition::AboveUpper;
        }
        if close < lower {
            return BandPosition::BelowLower;
        }
        let width = upper - lower;
        if width <= 0.0 {
            // constant window: close sits on the collapsed band
            return BandPosition::NearMid;
        }
        let pct = (close - lower) / width;
        if pct > BAND_NEAR_UPPER {
            BandPosition::NearUpper
        } else if pct < BAND_NEAR_LOWER {
            BandPosition::NearLower
        } else {
            BandPosition::NearMid
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BandPosition::AboveUpper => "broke above upper band",
            BandPosition::BelowLower => "broke below lower band",
            BandPosition::NearUpper => "near upper band",
            BandPosition::NearLower => "near lower band",
            BandPosition::NearMid => "near midline",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KdjZone {
    #[serde(rename = "overbought zone")]
    Overbought,
    #[serde(rename = "oversold zone")]
    Oversold,
    #[serde(rename = "consolidating zone")]
    Consolidating,
}

impl KdjZone {
    pub fn classify(j: f64) -> Self {
        if j > KDJ_J_OVERBOUGHT {
            KdjZone::Overbought
        } else if j < KDJ_J_OVERSOLD {
            KdjZone::Oversold
        } else {
            KdjZone::Consolidating
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            KdjZone::Overbought => "overbought zone",
            KdjZone::Oversold => "oversold zone",
            KdjZone::Consolidating => "consolidating zone",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiSignal {
    pub label: RsiLabel,
    /// Rounded to 2 decimals.
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdSignal {
    pub label: MacdLabel,
    /// Rounded to 4 decimals.
    pub macd: f64,
    /// Rounded to 4 decimals.
    pub signal: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KdjSignal {
    pub label: KdjZone,
    /// Rounded to 2 decimals.
    pub j: f64,
}

/// Classification of the most recent row, one optional entry per indicator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalSummary {
    #[serde(rename = "RSI", default, skip_serializing_if = "Option::is_none")]
    pub rsi: Option<RsiSignal>,
    #[serde(rename = "MACD", default, skip_serializing_if = "Option::is_none")]
    pub macd: Option<MacdSignal>,
    #[serde(rename = "MA_TREND", default, skip_serializing_if = "Option::is_none")]
    pub ma_trend: Option<MaAlignment>,
    #[serde(rename = "BOLLINGER", default, skip_serializing_if = "Option::is_none")]
    pub bollinger: Option<BandPosition>,
    #[serde(rename = "KDJ", default, skip_serializing_if = "Option::is_none")]
    pub kdj: Option<KdjSignal>,
}

impl SignalSummary {
    /// `(name, label)` for each present entry.
    pub fn entries(&self) -> Vec<(&'static str, &'static str)> {
        let mut out = Vec::new();
        if let Some(s) = &self.rsi {
            out.push(("RSI", s.label.label()));
        }
        if let Some(s) = &self.macd {
            out.push(("MACD", s.label.label()));
        }
        if let Some(s) = &self.ma_trend {
            out.push(("MA_TREND", s.label()));
        }
        if let Some(s) = &self.bollinger {
            out.push(("BOLLINGER", s.label()));
        }
        if let Some(s) = &self.kdj {
            out.push(("KDJ", s.label.label()));
        }
        out
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Summarise the last row with the default (lexicographic) MA ordering.
pub fn latest_signals(enriched: &EnrichedSeries) -> SignalSummary {
    latest_signals_with(enriched, MaOrdering::default())
}

/// The three MA columns the alignment signal compares.
pub fn alignment_columns(ma: &[WindowedColumn], ordering: MaOrdering) -> Vec<&WindowedColumn> {
    let mut cols: Vec<&WindowedColumn> = ma.iter().collect();
    match ordering {
        MaOrdering::Lexicographic => cols.sort_by(|a, b| a.name.cmp(&b.name)),
        MaOrdering::Numeric => cols.sort_by_key(|c| c.window),
    }
    cols.truncate(3);
    cols
}

pub fn latest_signals_with(enriched: &EnrichedSeries, ordering: MaOrdering) -> SignalSummary {
    let Some(row) = enriched.len().checked_sub(1) else {
        return SignalSummary::default();
    };
    let at = |values: &[f64]| values.get(row).copied().filter(|v| !v.is_nan());

    let rsi = at(&enriched.rsi).map(|v| RsiSignal {
        label: RsiLabel::classify(v),
        value: round_to(v, 2),
    });

    let macd = at(&enriched.macd.macd)
        .zip(at(&enriched.macd.signal))
        .map(|(m, s)| MacdSignal {
            label: MacdLabel::classify(m, s),
            macd: round_to(m, 4),
            signal: round_to(s, 4),
        });

    let ma_trend = {
        let cols = alignment_columns(&enriched.ma, ordering);
        let values: Vec<f64> = cols.iter().filter_map(|c| at(&c.values)).collect();
        match values.as_slice() {
            [a, b, c] => Some(MaAlignment::classify(*a, *b, *c)),
            _ => None,
        }
    };

    let bollinger = match (
        enriched.latest_close(),
        at(&enriched.bollinger.upper),
        at(&enriched.bollinger.lower),
    ) {
        (Some(close), Some(upper), Some(lower)) => Some(BandPosition::classify(close, upper, lower)),
        _ => None,
    };

    let kdj = at(&enriched.kdj.j).map(|j| KdjSignal {
        label: KdjZone::classify(j),
        j: round_to(j, 2),
    });

    SignalSummary {
        rsi,
        macd,
        ma_trend,
        bollinger,
        kdj,
    }
}
