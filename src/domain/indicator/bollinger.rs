//! Bollinger Bands indicator.
//!
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//! - Width: (Upper - Lower) / Middle
//!
//! StdDev is the sample standard deviation (divides by N-1).
//! Invalid wherever the SMA or StdDev is invalid, or the middle band is zero.

use crate::domain::indicator::{
    calculate_sma, calculate_stddev, IndicatorPoint, IndicatorSeries, IndicatorType,
    IndicatorValue,
};
use crate::domain::price_series::PriceBar;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_STDDEV_MULT_X100: u32 = 200;

pub fn calculate_bollinger(
    bars: &[PriceBar],
    period: usize,
    stddev_mult_x100: u32,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Bollinger {
        period,
        stddev_mult_x100,
    };
    let mult = stddev_mult_x100 as f64 / 100.0;

    let sma = calculate_sma(bars, period);
    let stddev = calculate_stddev(bars, period);
    if sma.values.len() != bars.len() || stddev.values.len() != bars.len() {
        return IndicatorSeries::empty(indicator_type);
    }

    let empty = IndicatorValue::Bollinger {
        upper: 0.0,
        middle: 0.0,
        lower: 0.0,
        width: 0.0,
    };

    let values = bars
        .iter()
        .zip(sma.values.iter().zip(&stddev.values))
        .map(|(bar, (mid, sd))| {
            let middle = mid.value.primary();
            if !mid.valid || !sd.valid || middle == 0.0 {
                return IndicatorPoint::invalid(bar.date, empty.clone());
            }
            let upper = middle + mult * sd.value.primary();
            let lower = middle - mult * sd.value.primary();
            IndicatorPoint {
                date: bar.date,
                valid: true,
                value: IndicatorValue::Bollinger {
                    upper,
                    middle,
                    lower,
                    width: (upper - lower) / middle,
                },
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}
