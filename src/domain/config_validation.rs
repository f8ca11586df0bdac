//! Configuration validation.
//!
//! Validates all config fields before any symbol is evaluated.

use crate::domain::error::TradeAssistError;
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;

pub const POLICY_TREND_CONFIRMED: &str = "trend_confirmed";
pub const POLICY_RSI_SPLIT: &str = "rsi_split";

const PERIOD_KEYS: [&str; 8] = [
    "rsi_period",
    "sma_period",
    "ema_period",
    "macd_fast",
    "macd_slow",
    "macd_signal",
    "atr_period",
    "bollinger_period",
];

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), TradeAssistError> {
    validate_data(config)?;
    validate_universe(config)?;
    validate_indicators(config)?;
    validate_signal(config)?;
    validate_sizing(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> TradeAssistError {
    TradeAssistError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Reads an integer key, failing when the key is set to something that
/// does not parse rather than letting the default stand in for it.
fn int_value(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<i64, TradeAssistError> {
    match config.get_string(section, key) {
        Some(raw) if !raw.trim().is_empty() => {
            let raw = raw.trim();
            raw.parse::<i64>()
                .map_err(|_| invalid(section, key, format!("{key} must be an integer, got '{raw}'")))
        }
        _ => Ok(default),
    }
}

fn double_value(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, TradeAssistError> {
    match config.get_string(section, key) {
        Some(raw) if !raw.trim().is_empty() => {
            let raw = raw.trim();
            raw.parse::<f64>()
                .map_err(|_| invalid(section, key, format!("{key} must be a number, got '{raw}'")))
        }
        _ => Ok(default),
    }
}

fn validate_data(config: &dyn ConfigPort) -> Result<(), TradeAssistError> {
    match config.get_string("data", "dir") {
        Some(s) if !s.trim().is_empty() => {}
        _ => {
            return Err(TradeAssistError::ConfigMissing {
                section: "data".to_string(),
                key: "dir".to_string(),
            })
        }
    }

    let lookback = int_value(config, "data", "lookback_days", 60)?;
    if lookback < 1 || lookback > u32::MAX as i64 {
        return Err(invalid("data", "lookback_days", "lookback_days must be at least 1"));
    }

    let attempts = int_value(config, "data", "max_attempts", 3)?;
    if attempts < 1 || attempts > u32::MAX as i64 {
        return Err(invalid("data", "max_attempts", "max_attempts must be at least 1"));
    }

    if int_value(config, "data", "retry_backoff_ms", 500)? < 0 {
        return Err(invalid(
            "data",
            "retry_backoff_ms",
            "retry_backoff_ms must be non-negative",
        ));
    }
    Ok(())
}

fn validate_universe(config: &dyn ConfigPort) -> Result<(), TradeAssistError> {
    let symbols = config
        .get_string("universe", "symbols")
        .ok_or_else(|| TradeAssistError::ConfigMissing {
            section: "universe".to_string(),
            key: "symbols".to_string(),
        })?;
    parse_symbols(&symbols).map_err(|e| invalid("universe", "symbols", e.to_string()))?;
    Ok(())
}

fn validate_indicators(config: &dyn ConfigPort) -> Result<(), TradeAssistError> {
    for key in PERIOD_KEYS {
        let value = int_value(config, "indicators", key, 1)?;
        if value < 1 {
            return Err(invalid("indicators", key, format!("{key} must be at least 1")));
        }
    }

    let fast = int_value(config, "indicators", "macd_fast", 12)?;
    let slow = int_value(config, "indicators", "macd_slow", 26)?;
    if fast >= slow {
        return Err(invalid(
            "indicators",
            "macd_fast",
            "macd_fast must be shorter than macd_slow",
        ));
    }

    if int_value(config, "indicators", "bollinger_period", 20)? < 2 {
        return Err(invalid(
            "indicators",
            "bollinger_period",
            "bollinger_period must be at least 2",
        ));
    }

    let mult = double_value(config, "indicators", "bollinger_stddev", 2.0)?;
    if !(mult > 0.0 && mult <= 10.0) {
        return Err(invalid(
            "indicators",
            "bollinger_stddev",
            "bollinger_stddev must be in (0, 10]",
        ));
    }
    Ok(())
}

fn validate_signal(config: &dyn ConfigPort) -> Result<(), TradeAssistError> {
    let policy = config
        .get_string("signal", "policy")
        .unwrap_or_else(|| POLICY_TREND_CONFIRMED.to_string());

    match policy.trim().to_lowercase().as_str() {
        POLICY_TREND_CONFIRMED => {
            let oversold = double_value(config, "signal", "oversold", 30.0)?;
            let overbought = double_value(config, "signal", "overbought", 70.0)?;
            if !(0.0..=100.0).contains(&oversold) {
                return Err(invalid("signal", "oversold", "oversold must be between 0 and 100"));
            }
            if !(0.0..=100.0).contains(&overbought) {
                return Err(invalid(
                    "signal",
                    "overbought",
                    "overbought must be between 0 and 100",
                ));
            }
            if oversold >= overbought {
                return Err(invalid(
                    "signal",
                    "oversold",
                    "oversold must be below overbought",
                ));
            }
        }
        POLICY_RSI_SPLIT => {
            let threshold = double_value(config, "signal", "split_threshold", 60.0)?;
            if !(0.0..=100.0).contains(&threshold) {
                return Err(invalid(
                    "signal",
                    "split_threshold",
                    "split_threshold must be between 0 and 100",
                ));
            }
        }
        other => {
            return Err(invalid(
                "signal",
                "policy",
                format!(
                    "unknown policy '{other}' (expected {POLICY_TREND_CONFIRMED} or {POLICY_RSI_SPLIT})"
                ),
            ))
        }
    }
    Ok(())
}

fn validate_sizing(config: &dyn ConfigPort) -> Result<(), TradeAssistError> {
    let capital = double_value(config, "sizing", "capital", 500.0)?;
    if !(capital > 0.0 && capital.is_finite()) {
        return Err(invalid("sizing", "capital", "capital must be positive"));
    }

    let fraction = double_value(config, "sizing", "allocation_fraction", 0.25)?;
    if !(fraction > 0.0 && fraction <= 1.0) {
        return Err(invalid(
            "sizing",
            "allocation_fraction",
            "allocation_fraction must be between 0 and 1",
        ));
    }
    Ok(())
}
