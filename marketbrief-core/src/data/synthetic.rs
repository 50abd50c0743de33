//! Deterministic synthetic market data.
//!
//! Each instrument gets its own random walk seeded from `(master_seed,
//! symbol)` via BLAKE3, so the bars for a symbol never depend on which other
//! symbols were requested or in what order. Only business days (Mon-Fri) are
//! produced; holidays are not modelled.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{DataError, Lookback, MarketDataProvider};
use crate::domain::{PriceBar, PriceSeries};

/// Default number of bars generated per instrument before lookback trimming.
pub const DEFAULT_HISTORY_BARS: usize = 500;

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    master_seed: u64,
    end: NaiveDate,
    history_bars: usize,
    daily_vol: f64,
}

impl SyntheticProvider {
    /// Bars end on the last business day on or before `end`.
    pub fn new(master_seed: u64, end: NaiveDate) -> Self {
        Self {
            master_seed,
            end,
            history_bars: DEFAULT_HISTORY_BARS,
            daily_vol: 0.02,
        }
    }

    pub fn with_daily_vol(mut self, vol: f64) -> Self {
        self.daily_vol = vol;
        self
    }

    /// Derive the per-symbol seed. Independent of request order.
    pub fn sub_seed(&self, symbol: &str) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(symbol.as_bytes());
        let hash = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(head)
    }

    /// The full generated history for a symbol.
    pub fn generate(&self, symbol: &str) -> Result<PriceSeries, DataError> {
        let mut rng = StdRng::seed_from_u64(self.sub_seed(symbol));
        let dates = business_days_ending(self.end, self.history_bars);

        let mut close: f64 = rng.gen_range(20.0..200.0);
        let mut bars = Vec::with_capacity(dates.len());
        for date in dates {
            let open = close * (1.0 + rng.gen_range(-0.25..0.25) * self.daily_vol);
            close = open * (1.0 + rng.gen_range(-1.0..1.0) * self.daily_vol);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.5) * self.daily_vol);
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.5) * self.daily_vol);
            let volume = rng.gen_range(200_000..5_000_000u64);
            bars.push(PriceBar::new(date, open, high, low, close, volume));
        }

        Ok(PriceSeries::new(bars)?)
    }
}

impl MarketDataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, instrument: &str, lookback: Lookback) -> Result<PriceSeries, DataError> {
        Ok(lookback.apply(&self.generate(instrument)?))
    }
}

fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// `count` weekdays ending on or before `end`, ascending.
fn business_days_ending(end: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(count);
    let mut day = end;
    while dates.len() < count {
        if is_business_day(day) {
            dates.push(day);
        }
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    dates.reverse();
    dates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> SyntheticProvider {
        // 2024-06-16 is a Sunday
        SyntheticProvider::new(42, NaiveDate::from_ymd_opt(2024, 6, 16).unwrap())
    }

    #[test]
    fn same_seed_same_bars() {
        let a = provider().generate("SPY").unwrap();
        let b = provider().generate("SPY").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn symbols_differ() {
        let p = provider();
        assert_ne!(p.sub_seed("SPY"), p.sub_seed("QQQ"));
        assert_ne!(p.generate("SPY").unwrap(), p.generate("QQQ").unwrap());
    }

    #[test]
    fn only_business_days() {
        let series = provider().generate("SPY").unwrap();
        assert_eq!(series.len(), DEFAULT_HISTORY_BARS);
        assert!(series.iter().all(|b| is_business_day(b.date)));
        assert_eq!(
            series.last().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
        );
    }

    #[test]
    fn bars_are_sane() {
        let series = provider().with_daily_vol(0.05).generate("VOLATILE").unwrap();
        assert!(series.iter().all(|b| b.is_sane()));
    }

    #[test]
    fn fetch_applies_lookback() {
        let p = provider();
        let full = p.generate("SPY").unwrap();
        let recent = p.fetch("SPY", Lookback::Bars(60)).unwrap();
        assert_eq!(recent.len(), 60);
        assert_eq!(recent.last(), full.last());

        // 14 calendar days back from Friday 2024-06-14 covers 11 weekdays
        let two_weeks = p.fetch("SPY", Lookback::CalendarDays(14)).unwrap();
        assert_eq!(two_weeks.len(), 11);
    }
}
