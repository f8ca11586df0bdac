//! Indicator columns computed over a whole price series, and the snapshot of
//! their latest values.

use crate::domain::indicator::{
    calculate_atr, calculate_bollinger, calculate_ema, calculate_macd, calculate_rsi,
    calculate_sma, IndicatorConfig, IndicatorSeries, IndicatorValue,
};
use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;
use tracing::debug;

/// Every indicator column for one series. Column `i` of each indicator lines
/// up with bar `i` of the source series.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    pub symbol: String,
    pub dates: Vec<NaiveDate>,
    pub closes: Vec<f64>,
    pub rsi: IndicatorSeries,
    pub sma: IndicatorSeries,
    pub ema: IndicatorSeries,
    pub macd: IndicatorSeries,
    /// `None` for close-only series.
    pub atr: Option<IndicatorSeries>,
    pub bollinger: IndicatorSeries,
}

impl IndicatorFrame {
    pub fn compute(series: &PriceSeries, config: &IndicatorConfig) -> Self {
        let bars = series.bars();

        let atr = if series.has_ranges() {
            calculate_atr(bars, config.atr_period)
        } else {
            None
        };

        let frame = Self {
            symbol: series.symbol().to_string(),
            dates: series.dates(),
            closes: series.closes(),
            rsi: calculate_rsi(bars, config.rsi_period),
            sma: calculate_sma(bars, config.sma_period),
            ema: calculate_ema(bars, config.ema_period),
            macd: calculate_macd(
                bars,
                config.macd_fast,
                config.macd_slow,
                config.macd_signal,
            ),
            atr,
            bollinger: calculate_bollinger(
                bars,
                config.bollinger_period,
                config.bollinger_stddev_mult_x100,
            ),
        };

        debug!(
            symbol = %frame.symbol,
            bars = frame.len(),
            rsi_valid = frame.rsi.valid_count(),
            sma_valid = frame.sma.valid_count(),
            atr = frame.atr.is_some(),
            "computed indicator frame"
        );
        frame
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn snapshot(&self) -> IndicatorSnapshot {
        let latest = |series: &IndicatorSeries| series.latest_valid().map(|p| p.value.primary());

        let (macd, macd_signal) = match self.macd.latest_valid().map(|p| &p.value) {
            Some(&IndicatorValue::Macd { line, signal, .. }) => (Some(line), Some(signal)),
            _ => (None, None),
        };

        IndicatorSnapshot {
            date: self.dates.last().copied(),
            close: self.closes.last().copied(),
            rsi: latest(&self.rsi),
            sma: latest(&self.sma),
            ema: latest(&self.ema),
            macd,
            macd_signal,
            atr: self.atr.as_ref().and_then(latest),
            bollinger_width: latest(&self.bollinger),
        }
    }
}

/// The most recent defined value of each indicator plus the latest close.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndicatorSnapshot {
    pub date: Option<NaiveDate>,
    pub close: Option<f64>,
    pub rsi: Option<f64>,
    pub sma: Option<f64>,
    pub ema: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub atr: Option<f64>,
    pub bollinger_width: Option<f64>,
}
