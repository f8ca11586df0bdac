//! Single-symbol evaluation pipeline and the per-symbol loop over a source.
//!
//! PriceSeries → IndicatorFrame → IndicatorSnapshot → Signal → PositionSuggestion.
//! Nothing here holds state between calls; symbols can be evaluated
//! concurrently by the caller.

use crate::domain::error::TradeAssistError;
use crate::domain::indicator::IndicatorConfig;
use crate::domain::indicator_frame::{IndicatorFrame, IndicatorSnapshot};
use crate::domain::price_series::PriceSeries;
use crate::domain::signal::{ClassificationPolicy, Signal, StopReason};
use crate::domain::sizing::{PositionSizer, PositionSuggestion};
use crate::ports::price_source::PriceSource;
use tracing::{info, warn};

pub const DEFAULT_CAPITAL: f64 = 500.0;
pub const DEFAULT_LOOKBACK_DAYS: u32 = 60;

/// Everything a single evaluation needs, passed explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationConfig {
    pub indicators: IndicatorConfig,
    pub policy: ClassificationPolicy,
    pub sizer: PositionSizer,
    pub capital: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            indicators: IndicatorConfig::default(),
            policy: ClassificationPolicy::default(),
            sizer: PositionSizer::default(),
            capital: DEFAULT_CAPITAL,
        }
    }
}

/// What the presentation layer gets for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub symbol: String,
    pub bars: usize,
    pub snapshot: IndicatorSnapshot,
    pub signal: Signal,
    /// Present only for a Buy.
    pub suggestion: Option<PositionSuggestion>,
}

pub fn evaluate(
    series: &PriceSeries,
    config: &EvaluationConfig,
) -> Result<Evaluation, TradeAssistError> {
    let frame = IndicatorFrame::compute(series, &config.indicators);
    evaluate_frame(&frame, config)
}

/// Classification and sizing over an already computed frame.
pub fn evaluate_frame(
    frame: &IndicatorFrame,
    config: &EvaluationConfig,
) -> Result<Evaluation, TradeAssistError> {
    let snapshot = frame.snapshot();
    let required = config.indicators.required_bars();

    let signal = if frame.len() < required {
        Signal::Stop(StopReason::TooFewBars {
            bars: frame.len(),
            required,
        })
    } else {
        config.policy.classify(&snapshot)
    };

    let price = snapshot.close.unwrap_or(f64::NAN);
    let suggestion = config.sizer.suggest(&signal, config.capital, price)?;

    Ok(Evaluation {
        symbol: frame.symbol.clone(),
        bars: frame.len(),
        snapshot,
        signal,
        suggestion,
    })
}

/// Result of one symbol in a multi-symbol run.
#[derive(Debug, PartialEq)]
pub enum SymbolOutcome {
    Evaluated(Evaluation),
    /// The source had no data for the symbol.
    Unavailable { symbol: String, reason: String },
    /// The source returned data that failed validation.
    Rejected { symbol: String, reason: String },
}

impl SymbolOutcome {
    pub fn symbol(&self) -> &str {
        match self {
            SymbolOutcome::Evaluated(e) => &e.symbol,
            SymbolOutcome::Unavailable { symbol, .. } | SymbolOutcome::Rejected { symbol, .. } => {
                symbol
            }
        }
    }

    pub fn evaluation(&self) -> Option<&Evaluation> {
        match self {
            SymbolOutcome::Evaluated(e) => Some(e),
            _ => None,
        }
    }
}

/// Fetches and evaluates each symbol in order. A symbol the source cannot
/// supply is reported and skipped; only configuration errors (bad capital)
/// abort the run.
pub fn evaluate_symbols(
    source: &dyn PriceSource,
    symbols: &[String],
    lookback_days: u32,
    config: &EvaluationConfig,
) -> Result<Vec<SymbolOutcome>, TradeAssistError> {
    if !config.capital.is_finite() || config.capital <= 0.0 {
        return Err(TradeAssistError::invalid_input(format!(
            "capital must be positive, got {}",
            config.capital
        )));
    }

    let mut outcomes = Vec::with_capacity(symbols.len());

    for symbol in symbols {
        let series = match source.fetch(symbol, lookback_days) {
            Ok(series) => series,
            Err(e @ TradeAssistError::SourceUnavailable { .. }) => {
                warn!(%symbol, error = %e, "skipping symbol");
                outcomes.push(SymbolOutcome::Unavailable {
                    symbol: symbol.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
            Err(e) => {
                warn!(%symbol, error = %e, "rejecting symbol data");
                outcomes.push(SymbolOutcome::Rejected {
                    symbol: symbol.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let evaluation = evaluate(&series, config)?;
        info!(
            %symbol,
            bars = evaluation.bars,
            as_of = ?series.latest().map(|bar| bar.date),
            signal = %evaluation.signal,
            "evaluated symbol"
        );
        outcomes.push(SymbolOutcome::Evaluated(evaluation));
    }

    Ok(outcomes)
}
