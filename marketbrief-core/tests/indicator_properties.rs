//! End-to-end checks of the indicator engine against hand-computed values.

use chrono::NaiveDate;
use marketbrief_core::analysis::{BandPosition, MaAlignment, MaOrdering, RsiLabel};
use marketbrief_core::domain::{PriceBar, PriceSeries};
use marketbrief_core::{
    compute_all_indicators, latest_signals, latest_signals_with, support_resistance, trend_strength,
    TrendStrength,
};

const EPS: f64 = 1e-10;

/// Bars whose open/high/low bracket each close by one point.
fn series_from(closes: &[f64], volumes: &[u64]) -> PriceSeries {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let bars = closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&close, &volume))| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceBar::new(
                base + chrono::Duration::days(i as i64),
                open,
                open.max(close) + 1.0,
                open.min(close) - 1.0,
                close,
                volume,
            )
        })
        .collect();
    PriceSeries::new(bars).unwrap()
}

fn series(closes: &[f64]) -> PriceSeries {
    series_from(closes, &vec![1_000; closes.len()])
}

fn wave(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + (i as f64 * 0.35).sin() * 6.0 + i as f64 * 0.05)
        .collect()
}

#[test]
fn row_count_is_preserved() {
    for n in [0, 1, 8, 15, 19, 20, 60, 250] {
        let enriched = compute_all_indicators(&series(&wave(n)));
        assert_eq!(enriched.len(), n);
        for (name, values) in enriched.columns() {
            assert_eq!(values.len(), n, "{name} at n={n}");
        }
    }
}

#[test]
fn sma_warmup_example() {
    let enriched = compute_all_indicators(&series(&[10.0, 11.0, 12.0, 13.0, 14.0]));
    // Default windows start at 5: MA5 row 4 is the mean of all five closes
    let ma5 = enriched.column("MA5").unwrap();
    assert!(ma5[..4].iter().all(|v| v.is_nan()));
    assert!((ma5[4] - 12.0).abs() < EPS);
    assert!(enriched.column("MA10").unwrap().iter().all(|v| v.is_nan()));
}

#[test]
fn ema_recursive_example() {
    use marketbrief_core::indicators::{Ema, Indicator};
    let s = series(&[10.0, 12.0]);
    let ema = Ema::new(2).compute(s.bars());
    assert!((ema[0] - 10.0).abs() < EPS);
    assert!((ema[1] - (10.0 + 2.0 / 3.0 * 2.0)).abs() < EPS);
}

#[test]
fn rsi_pure_gain_run_is_100() {
    let closes: Vec<f64> = (0..15).map(|i| 50.0 + i as f64).collect();
    let enriched = compute_all_indicators(&series(&closes));
    let rsi = enriched.column("RSI").unwrap();
    assert!(rsi[..14].iter().all(|v| v.is_nan()));
    assert_eq!(rsi[14], 100.0);

    let summary = latest_signals(&enriched);
    let entry = summary.rsi.unwrap();
    assert_eq!(entry.label, RsiLabel::Overbought);
    assert_eq!(entry.value, 100.0);
}

#[test]
fn macd_histogram_identity() {
    let enriched = compute_all_indicators(&series(&wave(120)));
    for i in 0..120 {
        let expected = enriched.macd.macd[i] - enriched.macd.signal[i];
        assert!((enriched.macd.histogram[i] - expected).abs() < EPS);
    }
}

#[test]
fn bollinger_contains_mid() {
    let enriched = compute_all_indicators(&series(&wave(80)));
    let b = &enriched.bollinger;
    for i in 19..80 {
        assert!(b.lower[i] <= b.mid[i] && b.mid[i] <= b.upper[i], "row {i}");
    }
}

#[test]
fn obv_accumulates_over_whole_series() {
    let s = series_from(&[10.0, 11.0, 10.0, 10.0, 12.0], &[100, 200, 150, 150, 300]);
    let enriched = compute_all_indicators(&s);
    assert_eq!(enriched.obv, vec![0.0, 200.0, 50.0, 50.0, 350.0]);
}

#[test]
fn short_series_omits_rsi_but_keeps_kdj() {
    let closes: Vec<f64> = (0..10).map(|i| 20.0 + (i % 3) as f64).collect();
    let summary = latest_signals(&compute_all_indicators(&series(&closes)));
    assert!(summary.rsi.is_none());
    assert!(summary.kdj.is_some());
    assert!(summary.macd.is_some());
    // MA10 is defined on row 9 but MA20 is not
    assert!(summary.ma_trend.is_none());
    assert!(summary.bollinger.is_none());

    let json = serde_json::to_value(&summary).unwrap();
    assert!(json.get("RSI").is_none());
    assert!(json.get("KDJ").is_some());
}

#[test]
fn empty_series_has_empty_summary() {
    let enriched = compute_all_indicators(&PriceSeries::empty());
    assert!(enriched.is_empty());
    assert!(latest_signals(&enriched).is_empty());
    assert_eq!(support_resistance(enriched.bars(), 20), None);
    assert_eq!(trend_strength(enriched.bars()), TrendStrength::InsufficientData);
}

#[test]
fn computation_is_idempotent() {
    let s = series(&wave(90));
    let a = compute_all_indicators(&s);
    let b = compute_all_indicators(&s);
    for ((name, x), (_, y)) in a.columns().into_iter().zip(b.columns()) {
        let xb: Vec<u64> = x.iter().map(|v| v.to_bits()).collect();
        let yb: Vec<u64> = y.iter().map(|v| v.to_bits()).collect();
        assert_eq!(xb, yb, "{name}");
    }
    assert_eq!(latest_signals(&a), latest_signals(&b));
}

#[test]
fn trend_needs_twenty_rows() {
    let closes: Vec<f64> = (0..19).map(|i| 10.0 + i as f64).collect();
    assert_eq!(trend_strength(series(&closes).bars()), TrendStrength::InsufficientData);
    let closes: Vec<f64> = (0..20).map(|i| 10.0 + i as f64).collect();
    assert_eq!(trend_strength(series(&closes).bars()), TrendStrength::StrongUp);
}

#[test]
fn ma_alignment_ordering_matters() {
    // Steady rally: MA5 > MA10 > MA20 > MA60 on the last row
    let closes: Vec<f64> = (0..80).map(|i| 100.0 + i as f64).collect();
    let enriched = compute_all_indicators(&series(&closes));

    // Lexicographic picks MA10, MA20, MA5: MA10 > MA20 but MA20 < MA5
    assert_eq!(latest_signals(&enriched).ma_trend, Some(MaAlignment::Choppy));
    assert_eq!(
        latest_signals_with(&enriched, MaOrdering::Numeric).ma_trend,
        Some(MaAlignment::Bullish)
    );
}

#[test]
fn constant_prices_sit_on_the_midline() {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let bars = (0..30)
        .map(|i| PriceBar::new(base + chrono::Duration::days(i), 10.0, 10.0, 10.0, 10.0, 500))
        .collect();
    let enriched = compute_all_indicators(&PriceSeries::new(bars).unwrap());
    let summary = latest_signals(&enriched);
    assert_eq!(summary.bollinger, Some(BandPosition::NearMid));
    assert_eq!(summary.rsi.unwrap().value, 50.0);
    assert_eq!(summary.kdj.unwrap().j, 50.0);
}
