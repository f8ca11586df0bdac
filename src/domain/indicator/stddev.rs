//! Standard Deviation indicator.
//!
//! Sample standard deviation over n closing prices (divides by n-1).
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n-1) / (n-1))
//! Warmup: first (n-1) bars are invalid. Needs n >= 2.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price_series::PriceBar;

pub fn calculate_stddev(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    if period < 2 {
        let values = bars
            .iter()
            .map(|b| IndicatorPoint::invalid(b.date, IndicatorValue::EMPTY))
            .collect();
        return IndicatorSeries {
            indicator_type: IndicatorType::Stddev(period),
            values,
        };
    }

    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        if i + 1 < period {
            values.push(IndicatorPoint::invalid(bar.date, IndicatorValue::EMPTY));
            continue;
        }

        let window = &bars[i + 1 - period..=i];
        let mean: f64 = window.iter().map(|b| b.close).sum::<f64>() / period as f64;
        let variance: f64 = window
            .iter()
            .map(|b| {
                let diff = b.close - mean;
                diff * diff
            })
            .sum::<f64>()
            / (period - 1) as f64;

        values.push(IndicatorPoint::simple(bar.date, variance.sqrt()));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Stddev(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<PriceBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                PriceBar::close_only(NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(), close)
            })
            .collect()
    }

    #[test]
    fn stddev_warmup() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_stddev(&bars, 3);

        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[4].valid);
    }

    #[test]
    fn stddev_constant_values() {
        let bars = make_bars(&[100.0; 5]);
        let series = calculate_stddev(&bars, 3);
        assert_eq!(series.values[2].value.primary(), 0.0);
    }

    #[test]
    fn stddev_sample_divisor() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_stddev(&bars, 3);
        // deviations -10, 0, 10 → 200 / 2 = 100 → 10
        assert_relative_eq!(series.values[2].value.primary(), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn stddev_known_values() {
        let bars = make_bars(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let series = calculate_stddev(&bars, 8);
        // sum of squared deviations is 32
        assert_relative_eq!(
            series.values[7].value.primary(),
            (32.0_f64 / 7.0).sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn stddev_period_below_two_is_undefined() {
        let bars = make_bars(&[10.0, 20.0]);
        assert_eq!(calculate_stddev(&bars, 1).valid_count(), 0);
        assert_eq!(calculate_stddev(&bars, 0).valid_count(), 0);
    }

    #[test]
    fn stddev_indicator_type() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_stddev(&bars, 5);
        assert_eq!(series.indicator_type, IndicatorType::Stddev(5));
    }
}
