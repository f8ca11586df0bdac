//! Trading signals and the policies that classify an indicator snapshot.
//!
//! A policy only ever sees the latest snapshot. When a value it depends on is
//! missing (too few bars) or not a finite number, classification degrades to
//! [`Signal::Stop`] rather than [`Signal::Hold`], so callers can tell "no
//! data" apart from "indicators disagree".

use crate::domain::indicator_frame::IndicatorSnapshot;
use std::fmt;
use tracing::debug;

pub const DEFAULT_OVERSOLD: f64 = 30.0;
pub const DEFAULT_OVERBOUGHT: f64 = 70.0;
pub const DEFAULT_SPLIT_THRESHOLD: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
    Stop(StopReason),
}

impl Signal {
    pub fn is_buy(&self) -> bool {
        matches!(self, Signal::Buy)
    }

    pub fn is_stop(&self) -> bool {
        matches!(self, Signal::Stop(_))
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "Buy"),
            Signal::Sell => write!(f, "Sell"),
            Signal::Hold => write!(f, "Hold"),
            Signal::Stop(reason) => write!(f, "Stop ({})", reason),
        }
    }
}

/// Why no recommendation could be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TooFewBars { bars: usize, required: usize },
    MissingValue(&'static str),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::TooFewBars { bars, required } => {
                write!(f, "insufficient data: {} bars, need {}", bars, required)
            }
            StopReason::MissingValue(name) => write!(f, "insufficient data: no {}", name),
        }
    }
}

/// Named classification policies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClassificationPolicy {
    /// RSI oversold/overbought, confirmed by close against EMA.
    TrendConfirmed { oversold: f64, overbought: f64 },
    /// Bare RSI split with no trend confirmation: below the threshold buys,
    /// anything else sells.
    RsiSplit { threshold: f64 },
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        ClassificationPolicy::TrendConfirmed {
            oversold: DEFAULT_OVERSOLD,
            overbought: DEFAULT_OVERBOUGHT,
        }
    }
}

impl fmt::Display for ClassificationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassificationPolicy::TrendConfirmed {
                oversold,
                overbought,
            } => write!(f, "trend_confirmed({}/{})", oversold, overbought),
            ClassificationPolicy::RsiSplit { threshold } => write!(f, "rsi_split({})", threshold),
        }
    }
}

/// Inputs every policy requires, all present and finite.
struct Inputs {
    rsi: f64,
    ema: f64,
    close: f64,
}

fn required_inputs(snapshot: &IndicatorSnapshot) -> Result<Inputs, StopReason> {
    let field = |value: Option<f64>, name: &'static str| match value {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(StopReason::MissingValue(name)),
    };

    let close = field(snapshot.close, "close")?;
    let rsi = field(snapshot.rsi, "RSI")?;
    field(snapshot.sma, "SMA")?;
    let ema = field(snapshot.ema, "EMA")?;

    Ok(Inputs { rsi, ema, close })
}

impl ClassificationPolicy {
    pub fn classify(&self, snapshot: &IndicatorSnapshot) -> Signal {
        let inputs = match required_inputs(snapshot) {
            Ok(inputs) => inputs,
            Err(reason) => {
                debug!(%reason, "classification stopped");
                return Signal::Stop(reason);
            }
        };

        let signal = match *self {
            ClassificationPolicy::TrendConfirmed {
                oversold,
                overbought,
            } => {
                if inputs.rsi < oversold && inputs.close > inputs.ema {
                    Signal::Buy
                } else if inputs.rsi > overbought && inputs.close < inputs.ema {
                    Signal::Sell
                } else {
                    Signal::Hold
                }
            }
            ClassificationPolicy::RsiSplit { threshold } => {
                if inputs.rsi < threshold {
                    Signal::Buy
                } else {
                    Signal::Sell
                }
            }
        };

        debug!(
            policy = %self,
            rsi = inputs.rsi,
            ema = inputs.ema,
            close = inputs.close,
            %signal,
            "classified snapshot"
        );
        signal
    }
}
