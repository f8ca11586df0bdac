//! Daily price bars and the validated, date-ordered series built from them.

use crate::domain::error::TradeAssistError;
use chrono::NaiveDate;

/// One daily observation. Close-only sources leave `open`, `high`, `low`
/// and `volume` empty.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: Option<u64>,
}

impl PriceBar {
    pub fn close_only(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
        }
    }

    pub fn ohlcv(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close,
            volume: Some(volume),
        }
    }

    pub fn has_range(&self) -> bool {
        self.high.is_some() && self.low.is_some()
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    ///
    /// Without a previous close only the bar's own range is used.
    pub fn true_range(&self, prev_close: Option<f64>) -> Option<f64> {
        let (high, low) = (self.high?, self.low?);
        let hl = high - low;
        Some(match prev_close {
            Some(pc) => hl.max((high - pc).abs()).max((low - pc).abs()),
            None => hl,
        })
    }
}

/// An immutable, strictly date-increasing sequence of bars for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Validates and wraps `bars`. Gaps between dates are allowed.
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, TradeAssistError> {
        let symbol = symbol.into();

        for (i, bar) in bars.iter().enumerate() {
            if !bar.close.is_finite() || bar.close <= 0.0 {
                return Err(TradeAssistError::invalid_input(format!(
                    "{symbol}: close on {} must be positive, got {}",
                    bar.date, bar.close
                )));
            }
            for (name, value) in [("open", bar.open), ("high", bar.high), ("low", bar.low)] {
                if let Some(v) = value {
                    if !v.is_finite() || v <= 0.0 {
                        return Err(TradeAssistError::invalid_input(format!(
                            "{symbol}: {name} on {} must be positive, got {v}",
                            bar.date
                        )));
                    }
                }
            }
            if let (Some(high), Some(low)) = (bar.high, bar.low) {
                if high < low {
                    return Err(TradeAssistError::invalid_input(format!(
                        "{symbol}: high {high} below low {low} on {}",
                        bar.date
                    )));
                }
            }
            if i > 0 && bars[i - 1].date >= bar.date {
                return Err(TradeAssistError::invalid_input(format!(
                    "{symbol}: dates must be strictly increasing ({} followed by {})",
                    bars[i - 1].date, bar.date
                )));
            }
        }

        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn latest(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// Fails with `InsufficientData` when the series holds fewer than
    /// `minimum` bars.
    pub fn require_bars(&self, minimum: usize) -> Result<(), TradeAssistError> {
        if self.bars.len() < minimum {
            return Err(TradeAssistError::InsufficientData {
                symbol: self.symbol.clone(),
                bars: self.bars.len(),
                minimum,
            });
        }
        Ok(())
    }

    /// True when every bar carries high and low, so ATR is computable.
    pub fn has_ranges(&self) -> bool {
        !self.bars.is_empty() && self.bars.iter().all(PriceBar::has_range)
    }
}
