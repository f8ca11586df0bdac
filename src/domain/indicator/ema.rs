//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the first close, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! No warmup: every bar is valid, although early values lean on the seed.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price_series::PriceBar;

pub const DEFAULT_PERIOD: usize = 20;

pub fn calculate_ema(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    if period == 0 || bars.is_empty() {
        return IndicatorSeries::empty(IndicatorType::Ema(period));
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let values = bars
        .iter()
        .zip(ema_values(&closes, period))
        .map(|(bar, ema)| IndicatorPoint::simple(bar.date, ema))
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values,
    }
}

/// EMA over an arbitrary input sequence, `out[0] == input[0]`.
pub fn ema_values(input: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(input.len());
    let mut iter = input.iter();

    if let Some(&first) = iter.next() {
        let mut ema = first;
        out.push(ema);
        for &x in iter {
            // same as x*k + ema*(1-k), but exact on flat input
            ema += k * (x - ema);
            out.push(ema);
        }
    }

    out
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
    fn ema_no_warmup() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_ema(&bars, 3);

        assert_eq!(series.values.len(), 5);
        assert!(series.values.iter().all(|p| p.valid));
    }

    #[test]
    fn ema_seed_is_first_close() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_ema(&bars, 20);
        assert_eq!(series.values[0].value.primary(), 10.0);
    }

    #[test]
    fn ema_recursive_calculation() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0]);
        let series = calculate_ema(&bars, 3);

        let k = 2.0 / 4.0;
        let e1 = 20.0 * k + 10.0 * (1.0 - k);
        let e2 = 30.0 * k + e1 * (1.0 - k);
        let e3 = 40.0 * k + e2 * (1.0 - k);

        assert_relative_eq!(series.values[1].value.primary(), e1);
        assert_relative_eq!(series.values[2].value.primary(), e2);
        assert_relative_eq!(series.values[3].value.primary(), e3);
    }

    #[test]
    fn ema_period_1_tracks_close() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_ema(&bars, 1);
        assert_eq!(
            series.primary_values(),
            vec![Some(10.0), Some(20.0), Some(30.0)]
        );
    }

    #[test]
    fn ema_equal_prices() {
        let bars = make_bars(&[100.0; 5]);
        let series = calculate_ema(&bars, 3);

        for point in &series.values {
            assert_relative_eq!(point.value.primary(), 100.0);
        }
    }

    #[test]
    fn ema_indicator_type() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_ema(&bars, 5);
        assert_eq!(series.indicator_type, IndicatorType::Ema(5));
    }

    #[test]
    fn ema_empty_bars() {
        let series = calculate_ema(&[], 3);
        assert!(series.values.is_empty());
    }

    #[test]
    fn ema_period_0() {
        let bars = make_bars(&[10.0, 20.0]);
        assert!(calculate_ema(&bars, 0).values.is_empty());
        assert!(ema_values(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn ema_values_on_raw_input() {
        let out = ema_values(&[2.0, 4.0], 1);
        assert_eq!(out, vec![2.0, 4.0]);
    }
}
