//! Position sizing for Buy signals.

use crate::domain::error::TradeAssistError;
use crate::domain::signal::Signal;

pub const DEFAULT_ALLOCATION_FRACTION: f64 = 0.25;

/// Suggested order for a Buy: how much capital to commit and how many units
/// that buys at the current price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSuggestion {
    pub notional: f64,
    pub quantity: f64,
}

/// Commits a fixed fraction of capital to every Buy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSizer {
    pub allocation_fraction: f64,
}

impl Default for PositionSizer {
    fn default() -> Self {
        Self {
            allocation_fraction: DEFAULT_ALLOCATION_FRACTION,
        }
    }
}

impl PositionSizer {
    pub fn new(allocation_fraction: f64) -> Self {
        Self {
            allocation_fraction,
        }
    }

    /// Returns `Ok(None)` for anything but a Buy. Capital is checked on every
    /// call; the price only matters for a Buy.
    pub fn suggest(
        &self,
        signal: &Signal,
        capital: f64,
        current_price: f64,
    ) -> Result<Option<PositionSuggestion>, TradeAssistError> {
        if !capital.is_finite() || capital <= 0.0 {
            return Err(TradeAssistError::invalid_input(format!(
                "capital must be positive, got {capital}"
            )));
        }

        if !signal.is_buy() {
            return Ok(None);
        }

        if !current_price.is_finite() || current_price <= 0.0 {
            return Err(TradeAssistError::invalid_input(format!(
                "current price must be positive, got {current_price}"
            )));
        }

        let notional = capital * self.allocation_fraction;
        Ok(Some(PositionSuggestion {
            notional,
            quantity: notional / current_price,
        }))
    }
}
