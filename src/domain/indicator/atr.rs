//! Average True Range indicator.
//!
//! TR[0] = H[0] - L[0], TR[i] = max(H-L, |H-C[i-1]|, |L-C[i-1]|)
//! ATR(n)[i] = simple mean of TR over the trailing n bars.
//! Warmup: first (n-1) bars are invalid.
//!
//! Needs high/low on every bar; close-only series yield `None`.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price_series::PriceBar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_atr(bars: &[PriceBar], period: usize) -> Option<IndicatorSeries> {
    let mut tr_values: Vec<f64> = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let prev_close = i.checked_sub(1).map(|p| bars[p].close);
        tr_values.push(bar.true_range(prev_close)?);
    }

    if period == 0 {
        return Some(IndicatorSeries::empty(IndicatorType::Atr(period)));
    }

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i + 1 < period {
                IndicatorPoint::invalid(bar.date, IndicatorValue::EMPTY)
            } else {
                let window = &tr_values[i + 1 - period..=i];
                IndicatorPoint::simple(bar.date, window.iter().sum::<f64>() / period as f64)
            }
        })
        .collect();

    Some(IndicatorSeries {
        indicator_type: IndicatorType::Atr(period),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_bar(day: u32, high: f64, low: f64, close: f64) -> PriceBar {
        PriceBar::ohlcv(
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            close,
            high,
            low,
            close,
            1000,
        )
    }

    #[test]
    fn atr_warmup() {
        let bars: Vec<PriceBar> = (1..=5).map(|d| make_bar(d, 110.0, 90.0, 100.0)).collect();

        let series = calculate_atr(&bars, 3).unwrap();
        assert_eq!(series.values.len(), 5);

        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[4].valid);
    }

    #[test]
    fn atr_is_mean_of_true_ranges() {
        let bars = vec![
            make_bar(1, 110.0, 100.0, 105.0),
            make_bar(2, 115.0, 105.0, 110.0),
            make_bar(3, 120.0, 110.0, 115.0),
        ];

        let series = calculate_atr(&bars, 3).unwrap();
        assert_relative_eq!(series.values[2].value.primary(), 10.0);
    }

    #[test]
    fn atr_handles_gaps() {
        let bars = vec![
            make_bar(1, 110.0, 100.0, 105.0),
            // gap up: |130 - 105| = 25 dominates the 10-point range
            make_bar(2, 130.0, 120.0, 125.0),
            // gap down: |110 - 125| = 15
            make_bar(3, 120.0, 110.0, 115.0),
        ];

        let series = calculate_atr(&bars, 2).unwrap();
        assert!(!series.values[0].valid);
        assert_relative_eq!(series.values[1].value.primary(), (10.0 + 25.0) / 2.0);
        assert_relative_eq!(series.values[2].value.primary(), (25.0 + 15.0) / 2.0);
    }

    #[test]
    fn atr_trailing_window_drops_old_ranges() {
        let bars = vec![
            make_bar(1, 140.0, 100.0, 120.0),
            make_bar(2, 125.0, 115.0, 120.0),
            make_bar(3, 125.0, 115.0, 120.0),
        ];

        let series = calculate_atr(&bars, 2).unwrap();
        assert_relative_eq!(series.values[2].value.primary(), 10.0);
    }

    #[test]
    fn atr_insufficient_bars() {
        let bars: Vec<PriceBar> = (1..=2).map(|d| make_bar(d, 110.0, 90.0, 100.0)).collect();

        let series = calculate_atr(&bars, 5).unwrap();
        assert_eq!(series.values.len(), 2);
        assert_eq!(series.valid_count(), 0);
    }

    #[test]
    fn atr_close_only_not_computable() {
        let bars = vec![
            PriceBar::close_only(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 100.0),
            PriceBar::close_only(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 101.0),
        ];
        assert!(calculate_atr(&bars, 14).is_none());
    }

    #[test]
    fn atr_zero_period() {
        let bars = vec![make_bar(1, 110.0, 90.0, 100.0)];
        assert!(calculate_atr(&bars, 0).unwrap().values.is_empty());
    }
}
