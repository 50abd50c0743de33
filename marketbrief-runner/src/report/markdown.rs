//! Markdown report template.

use std::fmt::Write;

use super::{ReportError, ReportRenderer};
use crate::brief::{AnalysisStatus, DailyBrief, InstrumentAnalysis};
use crate::format::{format_number, format_percent, NOT_AVAILABLE};

pub const DEFAULT_DISCLAIMER: &str =
    "This report is for reference only and does not constitute investment advice. \
Markets carry risk; invest with caution.";

/// Local template renderer: overview table, one section per instrument,
/// disclaimer footer.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    pub disclaimer: String,
    /// Decimals for prices and indicator values.
    pub decimals: usize,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self {
            disclaimer: DEFAULT_DISCLAIMER.to_string(),
            decimals: 2,
        }
    }
}

fn heading(a: &InstrumentAnalysis) -> String {
    if a.name == a.symbol {
        a.symbol.clone()
    } else {
        format!("{} ({})", a.name, a.symbol)
    }
}

impl MarkdownRenderer {
    fn overview(&self, out: &mut String, brief: &DailyBrief) -> Result<(), ReportError> {
        out.push_str("## Overview\n\n");
        out.push_str("| Instrument | Close | Change | Trend |\n");
        out.push_str("|------------|-------|--------|-------|\n");
        for a in &brief.instruments {
            let trend = match a.status {
                AnalysisStatus::Ok => a.trend.label(),
                AnalysisStatus::Unavailable { .. } => "unavailable",
            };
            writeln!(
                out,
                "| {} | {} | {} | {} |",
                heading(a),
                format_number(a.last_close, self.decimals),
                format_percent(a.change_pct),
                trend
            )?;
        }
        Ok(())
    }

    fn signal_table(&self, out: &mut String, a: &InstrumentAnalysis) -> Result<(), ReportError> {
        out.push_str("### Signals\n\n");
        if a.signals.is_empty() {
            out.push_str("Not enough history for a signal summary.\n");
            return Ok(());
        }
        out.push_str("| Indicator | Signal | Value |\n");
        out.push_str("|-----------|--------|-------|\n");
        let s = &a.signals;
        if let Some(rsi) = &s.rsi {
            writeln!(out, "| RSI | {} | {:.2} |", rsi.label.label(), rsi.value)?;
        }
        if let Some(macd) = &s.macd {
            writeln!(
                out,
                "| MACD | {} | {:.4} / {:.4} |",
                macd.label.label(),
                macd.macd,
                macd.signal
            )?;
        }
        if let Some(ma) = &s.ma_trend {
            writeln!(out, "| MA_TREND | {} | |", ma.label())?;
        }
        if let Some(band) = &s.bollinger {
            writeln!(out, "| BOLLINGER | {} | |", band.label())?;
        }
        if let Some(kdj) = &s.kdj {
            writeln!(out, "| KDJ | {} | J = {:.2} |", kdj.label.label(), kdj.j)?;
        }
        Ok(())
    }

    fn instrument(&self, out: &mut String, a: &InstrumentAnalysis) -> Result<(), ReportError> {
        writeln!(out, "## {}\n", heading(a))?;

        if let AnalysisStatus::Unavailable { reason } = &a.status {
            writeln!(out, "> Data unavailable: {reason}")?;
            return Ok(());
        }

        if let Some(date) = a.as_of {
            writeln!(
                out,
                "Close {} ({}) as of {}, {} bars analysed. Trend: {}.\n",
                format_number(a.last_close, self.decimals),
                format_percent(a.change_pct),
                date,
                a.bars,
                a.trend
            )?;
        }

        self.signal_table(out, a)?;

        out.push_str("\n### Levels\n\n");
        match &a.levels {
            Some(levels) => {
                writeln!(
                    out,
                    "- Support: {}",
                    format_number(Some(levels.support), self.decimals)
                )?;
                writeln!(
                    out,
                    "- Resistance: {}",
                    format_number(Some(levels.resistance), self.decimals)
                )?;
            }
            None => writeln!(out, "- {NOT_AVAILABLE}")?,
        }

        out.push_str("\n### Key Indicators\n\n");
        out.push_str("| Indicator | Value |\n");
        out.push_str("|-----------|-------|\n");
        for v in &a.indicators {
            writeln!(out, "| {} | {} |", v.name, format_number(v.value, self.decimals))?;
        }
        Ok(())
    }
}

impl ReportRenderer for MarkdownRenderer {
    fn render(&self, brief: &DailyBrief) -> Result<String, ReportError> {
        let mut out = String::new();
        writeln!(out, "# {} {}\n", brief.date, brief.title)?;
        writeln!(out, "**Data source:** {}  ", brief.source)?;
        writeln!(
            out,
            "**Generated:** {}\n",
            brief.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        out.push_str("---\n\n");

        self.overview(&mut out, brief)?;

        for a in &brief.instruments {
            out.push_str("\n---\n\n");
            self.instrument(&mut out, a)?;
        }

        out.push_str("\n---\n\n");
        writeln!(out, "**Disclaimer:** {}\n", self.disclaimer)?;
        writeln!(out, "*Data hash: `{}`*", brief.data_hash)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brief::analyze_series;
    use crate::config::BriefConfig;
    use chrono::{NaiveDate, TimeZone, Utc};
    use marketbrief_core::domain::{PriceBar, PriceSeries};

    fn series(n: usize) -> PriceSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let bars = (0..n)
            .map(|i| {
                let close = 1_000.0 + (i as f64 * 0.4).sin() * 40.0 + i as f64;
                PriceBar::new(
                    base + chrono::Duration::days(i as i64),
                    close - 2.0,
                    close + 5.0,
                    close - 5.0,
                    close,
                    50_000,
                )
            })
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    fn brief(instruments: Vec<InstrumentAnalysis>) -> DailyBrief {
        DailyBrief {
            title: "Daily Market Brief".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 4, 10).unwrap(),
            generated_at: Utc.with_ymd_and_hms(2024, 4, 10, 18, 30, 0).unwrap(),
            source: "csv".to_string(),
            data_hash: "abc123".to_string(),
            instruments,
        }
    }

    #[test]
    fn renders_header_overview_and_footer() {
        let config = BriefConfig::default();
        let a = analyze_series("IDX", "Index", &series(100), &config);
        let text = MarkdownRenderer::default().render(&brief(vec![a])).unwrap();

        assert!(text.starts_with("# 2024-04-10 Daily Market Brief\n"));
        assert!(text.contains("**Generated:** 2024-04-10 18:30:00 UTC"));
        assert!(text.contains("| Instrument | Close | Change | Trend |"));
        assert!(text.contains("| Index (IDX) | 1,"));
        assert!(text.contains("## Index (IDX)"));
        assert!(text.contains("| RSI |"));
        assert!(text.contains("- Support: "));
        assert!(text.contains("| MA60 |"));
        assert!(text.contains("**Disclaimer:**"));
        assert!(text.trim_end().ends_with("*Data hash: `abc123`*"));
    }

    #[test]
    fn unavailable_instrument_renders_placeholder() {
        let a = InstrumentAnalysis::unavailable("ZZZ", "ZZZ", "symbol not found: ZZZ");
        let text = MarkdownRenderer::default().render(&brief(vec![a])).unwrap();
        assert!(text.contains("| ZZZ | N/A | N/A | unavailable |"));
        assert!(text.contains("> Data unavailable: symbol not found: ZZZ"));
        assert!(!text.contains("### Signals"));
    }

    #[test]
    fn short_history_skips_signal_table() {
        let a = analyze_series("NEW", "Newco", &series(3), &BriefConfig::default());
        let text = MarkdownRenderer::default().render(&brief(vec![a])).unwrap();
        // MACD and KDJ are defined from the first row
        assert!(text.contains("| MACD |"));
        // only the key-indicator row mentions RSI
        let rsi_rows: Vec<&str> = text.lines().filter(|l| l.starts_with("| RSI |")).collect();
        assert_eq!(rsi_rows, vec!["| RSI | N/A |"]);
    }

    #[test]
    fn instruments_keep_their_order() {
        let config = BriefConfig::default();
        let a = analyze_series("BBB", "BBB", &series(30), &config);
        let b = analyze_series("AAA", "AAA", &series(30), &config);
        let text = MarkdownRenderer::default().render(&brief(vec![a, b])).unwrap();
        let first = text.find("## BBB").unwrap();
        let second = text.find("## AAA").unwrap();
        assert!(first < second);
    }
}
