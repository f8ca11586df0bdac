#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use std::collections::HashMap;
use tradeassist::domain::error::TradeAssistError;
pub use tradeassist::domain::price_series::{PriceBar, PriceSeries};
use tradeassist::ports::price_source::PriceSource;

pub struct MockPriceSource {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockPriceSource {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl PriceSource for MockPriceSource {
    fn fetch(&self, symbol: &str, lookback_days: u32) -> Result<PriceSeries, TradeAssistError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TradeAssistError::SourceUnavailable {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        let bars = self.data.get(symbol).cloned().unwrap_or_default();
        if bars.is_empty() {
            return Err(TradeAssistError::SourceUnavailable {
                symbol: symbol.to_string(),
                reason: "no price rows".to_string(),
            });
        }
        let skip = bars.len().saturating_sub(lookback_days as usize);
        PriceSeries::new(symbol, bars.into_iter().skip(skip).collect())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive calendar days starting 2024-01-01.
pub fn day(i: usize) -> NaiveDate {
    date(2024, 1, 1)
        .checked_add_days(Days::new(i as u64))
        .unwrap()
}

pub fn close_bars(closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PriceBar::close_only(day(i), c))
        .collect()
}

/// OHLCV bars with a fixed 2% range around each close.
pub fn ohlcv_bars(closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PriceBar::ohlcv(day(i), c, c * 1.01, c * 0.99, c, 10_000))
        .collect()
}

pub fn series(symbol: &str, closes: &[f64]) -> PriceSeries {
    PriceSeries::new(symbol, close_bars(closes)).unwrap()
}

/// Crash early in the RSI window, flat stretch, then a rebound above the
/// lagging EMA while RSI stays oversold. Evaluates to Buy with defaults.
pub fn rebound_closes() -> Vec<f64> {
    let mut closes = vec![200.0; 16];
    closes.extend([100.0; 13]);
    closes.push(130.0);
    closes
}

/// Mirror of [`rebound_closes`]: a spike, a plateau, then a drop below the
/// lagging EMA while RSI stays overbought. Evaluates to Sell with defaults.
pub fn pullback_closes() -> Vec<f64> {
    let mut closes = vec![100.0; 16];
    closes.extend([200.0; 13]);
    closes.push(170.0);
    closes
}
