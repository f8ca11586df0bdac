//! RSI (Relative Strength Index) indicator implementation.
//!
//! Uses trailing simple means of gains and losses over the last n price changes:
//! - delta[i] = C[i] - C[i-1], gain = max(delta, 0), loss = max(-delta, 0)
//! - avg_gain, avg_loss = mean of the last n gains / losses
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100 (also for a flat window)
//!
//! Warmup: first n bars are invalid (need n price changes to compute the averages).

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price_series::PriceBar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    if period == 0 || bars.len() < 2 {
        let values = bars
            .iter()
            .map(|b| IndicatorPoint::invalid(b.date, IndicatorValue::EMPTY))
            .collect();

        return IndicatorSeries {
            indicator_type: IndicatorType::Rsi(period),
            values,
        };
    }

    let mut gains: Vec<f64> = Vec::with_capacity(bars.len() - 1);
    let mut losses: Vec<f64> = Vec::with_capacity(bars.len() - 1);

    for pair in bars.windows(2) {
        let change = pair[1].close - pair[0].close;
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let mut values = Vec::with_capacity(bars.len());
    values.push(IndicatorPoint::invalid(bars[0].date, IndicatorValue::EMPTY));

    for (i, bar) in bars.iter().enumerate().skip(1) {
        // gains[i - 1] is the change into bar i
        if i < period {
            values.push(IndicatorPoint::invalid(bar.date, IndicatorValue::EMPTY));
            continue;
        }

        let window = i - period..i;
        let avg_gain = gains[window.clone()].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[window].iter().sum::<f64>() / period as f64;

        values.push(IndicatorPoint::simple(bar.date, rsi_from_averages(avg_gain, avg_loss)));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rsi = 100.0 - (100.0 / (1.0 + avg_gain / avg_loss));
    rsi.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_bar(date: &str, close: f64) -> PriceBar {
        PriceBar::close_only(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(), close)
    }

    fn make_series(closes: impl IntoIterator<Item = f64>) -> Vec<PriceBar> {
        closes
            .into_iter()
            .enumerate()
            .map(|(i, close)| make_bar(&format!("2024-01-{:02}", i + 1), close))
            .collect()
    }

    #[test]
    fn rsi_empty_bars() {
        let series = calculate_rsi(&[], 14);
        assert_eq!(series.values.len(), 0);
    }

    #[test]
    fn rsi_single_bar() {
        let bars = vec![make_bar("2024-01-01", 100.0)];
        let series = calculate_rsi(&bars, 14);
        assert_eq!(series.values.len(), 1);
        assert!(!series.values[0].valid);
    }

    #[test]
    fn rsi_warmup_period() {
        let bars = make_series((1..=15).map(|i| 100.0 + (i as f64 % 5.0) * 2.0));
        let series = calculate_rsi(&bars, 14);

        assert_eq!(series.values.len(), 15);
        for i in 0..14 {
            assert!(!series.values[i].valid, "Bar {} should be invalid", i);
        }
        assert!(series.values[14].valid, "Bar 14 should be valid");
    }

    #[test]
    fn rsi_all_gains_no_losses() {
        let bars = make_series((0..15).map(|i| 100.0 + i as f64));
        let series = calculate_rsi(&bars, 14);
        assert_eq!(series.values[14].value.primary(), 100.0);
    }

    #[test]
    fn rsi_all_losses_no_gains() {
        let bars = make_series((0..15).map(|i| 100.0 - i as f64));
        let series = calculate_rsi(&bars, 14);
        assert_eq!(series.values[14].value.primary(), 0.0);
    }

    #[test]
    fn rsi_constant_prices_saturate_at_100() {
        let bars = make_series(std::iter::repeat_n(42.0, 20));
        let series = calculate_rsi(&bars, 14);

        for point in series.values.iter().skip(14) {
            assert!(point.valid);
            assert_eq!(point.value.primary(), 100.0);
        }
    }

    #[test]
    fn rsi_uses_trailing_window_only() {
        // Two early losses drop out of a 2-change window once gains follow.
        let bars = make_series([10.0, 9.0, 8.0, 9.0, 10.0]);
        let series = calculate_rsi(&bars, 2);

        assert_relative_eq!(series.values[2].value.primary(), 0.0);
        // changes into bars 2,3: -1, +1 → RS = 1 → 50
        assert_relative_eq!(series.values[3].value.primary(), 50.0);
        assert_relative_eq!(series.values[4].value.primary(), 100.0);
    }

    #[test]
    fn rsi_known_ratio() {
        // changes: +2, -1, +2 over a window of 3 → avg_gain 4/3, avg_loss 1/3, RS 4
        let bars = make_series([10.0, 12.0, 11.0, 13.0]);
        let series = calculate_rsi(&bars, 3);
        assert_relative_eq!(series.values[3].value.primary(), 80.0, epsilon = 1e-12);
    }

    #[test]
    fn rsi_in_range() {
        let bars = make_series((1..=20).map(|i| 100.0 + (i as f64 % 7.0 - 3.0) * 2.0));
        let series = calculate_rsi(&bars, 14);

        for rsi in series.primary_values().into_iter().flatten() {
            assert!((0.0..=100.0).contains(&rsi), "RSI {} out of range", rsi);
        }
    }

    #[test]
    fn rsi_indicator_type() {
        let bars = vec![make_bar("2024-01-01", 100.0)];
        let series = calculate_rsi(&bars, 14);
        assert_eq!(series.indicator_type, IndicatorType::Rsi(14));
    }

    #[test]
    fn rsi_zero_period() {
        let bars = vec![make_bar("2024-01-01", 100.0), make_bar("2024-01-02", 101.0)];
        let series = calculate_rsi(&bars, 0);
        assert_eq!(series.values.len(), 2);
        assert_eq!(series.valid_count(), 0);
    }
}
