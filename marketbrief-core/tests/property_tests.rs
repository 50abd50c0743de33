//! Property tests for indicator engine invariants.
//!
//! Uses proptest to verify, over random price paths:
//! 1. Row count: every column has one value per input bar
//! 2. RSI bounds: defined RSI values lie in [0, 100]
//! 3. MACD identity: histogram equals MACD minus signal on every row
//! 4. Bollinger ordering: lower <= mid <= upper on every defined row
//! 5. Idempotence: two runs over the same input are bit-identical

use chrono::NaiveDate;
use marketbrief_core::domain::{PriceBar, PriceSeries};
use marketbrief_core::{compute_all_indicators, latest_signals};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_start_price() -> impl Strategy<Value = f64> {
    (10.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_returns(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-0.06..0.06_f64, 0..max_len)
}

fn arb_series() -> impl Strategy<Value = PriceSeries> {
    (arb_start_price(), arb_returns(160), 1_000u64..1_000_000).prop_map(|(start, returns, vol)| {
        let base = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let mut close = start;
        let bars = returns
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let open = close;
                close = open * (1.0 + r);
                PriceBar::new(
                    base + chrono::Duration::days(i as i64),
                    open,
                    open.max(close) * 1.01,
                    open.min(close) * 0.99,
                    close,
                    vol + (i as u64 * 37) % 5_000,
                )
            })
            .collect();
        PriceSeries::new(bars).unwrap()
    })
}

// ── 1. Row count ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn every_column_has_one_value_per_bar(series in arb_series()) {
        let enriched = compute_all_indicators(&series);
        prop_assert_eq!(enriched.len(), series.len());
        for (name, values) in enriched.columns() {
            prop_assert_eq!(values.len(), series.len(), "column {}", name);
        }
    }
}

// ── 2. RSI bounds ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn rsi_within_bounds(series in arb_series()) {
        let enriched = compute_all_indicators(&series);
        for &v in enriched.rsi.iter().filter(|v| !v.is_nan()) {
            prop_assert!((0.0..=100.0).contains(&v), "RSI out of bounds: {}", v);
        }
        if let Some(entry) = latest_signals(&enriched).rsi {
            prop_assert!((0.0..=100.0).contains(&entry.value));
        }
    }

    #[test]
    fn rsi_defined_after_warmup(series in arb_series()) {
        let enriched = compute_all_indicators(&series);
        for (i, v) in enriched.rsi.iter().enumerate() {
            prop_assert_eq!(v.is_nan(), i < 14, "row {}", i);
        }
    }
}

// ── 3. MACD identity ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn macd_histogram_is_difference(series in arb_series()) {
        let macd = compute_all_indicators(&series).macd;
        for i in 0..series.len() {
            let expected = macd.macd[i] - macd.signal[i];
            prop_assert!((macd.histogram[i] - expected).abs() < 1e-9);
        }
    }
}

// ── 4. Bollinger ordering ────────────────────────────────────────────

proptest! {
    #[test]
    fn bollinger_lower_mid_upper(series in arb_series()) {
        let b = compute_all_indicators(&series).bollinger;
        for i in 0..series.len() {
            if b.mid[i].is_nan() {
                prop_assert!(i < 19);
                continue;
            }
            prop_assert!(b.lower[i] <= b.mid[i], "row {}: lower {} > mid {}", i, b.lower[i], b.mid[i]);
            prop_assert!(b.mid[i] <= b.upper[i], "row {}: mid {} > upper {}", i, b.mid[i], b.upper[i]);
        }
    }
}

// ── 5. Idempotence ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn recomputation_is_bit_identical(series in arb_series()) {
        let a = compute_all_indicators(&series);
        let b = compute_all_indicators(&series);
        for ((name, x), (_, y)) in a.columns().into_iter().zip(b.columns()) {
            let xb: Vec<u64> = x.iter().map(|v| v.to_bits()).collect();
            let yb: Vec<u64> = y.iter().map(|v| v.to_bits()).collect();
            prop_assert_eq!(xb, yb, "column {}", name);
        }
        prop_assert_eq!(latest_signals(&a), latest_signals(&b));
    }
}
