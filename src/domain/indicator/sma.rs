//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = (C[i-n+1] + ... + C[i]) / n
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price_series::PriceBar;

pub const DEFAULT_PERIOD: usize = 20;

pub fn calculate_sma(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries::empty(IndicatorType::Sma(period));
    }

    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        if i + 1 < period {
            values.push(IndicatorPoint::invalid(bar.date, IndicatorValue::EMPTY));
            continue;
        }
        let window = &bars[i + 1 - period..=i];
        let mean = window.iter().map(|b| b.close).sum::<f64>() / period as f64;
        values.push(IndicatorPoint::simple(bar.date, mean));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Days, NaiveDate};

    fn make_bars(prices: &[f64]) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                PriceBar::close_only(start.checked_add_days(Days::new(i as u64)).unwrap(), close)
            })
            .collect()
    }

    #[test]
    fn sma_warmup() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_sma(&bars, 3);

        assert_eq!(series.values.len(), 5);
        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[4].valid);
    }

    #[test]
    fn sma_trailing_mean() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_sma(&bars, 3);

        assert_relative_eq!(series.values[2].value.primary(), 20.0);
        assert_relative_eq!(series.values[3].value.primary(), 30.0);
        assert_relative_eq!(series.values[4].value.primary(), 40.0);
    }

    #[test]
    fn sma_dates_aligned_with_bars() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        let series = calculate_sma(&bars, 2);
        for (bar, point) in bars.iter().zip(&series.values) {
            assert_eq!(bar.date, point.date);
        }
    }

    #[test]
    fn sma_period_longer_than_series() {
        let bars = make_bars(&[1.0, 2.0]);
        let series = calculate_sma(&bars, 5);
        assert_eq!(series.values.len(), 2);
        assert_eq!(series.valid_count(), 0);
    }

    #[test]
    fn sma_period_1_is_close() {
        let bars = make_bars(&[7.0, 8.0]);
        let series = calculate_sma(&bars, 1);
        assert_eq!(series.primary_values(), vec![Some(7.0), Some(8.0)]);
    }

    #[test]
    fn sma_period_0() {
        let bars = make_bars(&[10.0, 20.0]);
        let series = calculate_sma(&bars, 0);
        assert!(series.values.is_empty());
    }

    #[test]
    fn sma_indicator_type() {
        let series = calculate_sma(&[], 20);
        assert_eq!(series.indicator_type, IndicatorType::Sma(20));
    }
}
