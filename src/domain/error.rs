//! Domain error types.

/// Top-level error type for tradeassist.
#[derive(Debug, thiserror::Error)]
pub enum TradeAssistError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("no data available for {symbol}: {reason}")]
    SourceUnavailable { symbol: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TradeAssistError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        TradeAssistError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// True for failures a data source may recover from on a later attempt.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, TradeAssistError::SourceUnavailable { .. })
    }
}

impl From<&TradeAssistError> for std::process::ExitCode {
    fn from(err: &TradeAssistError) -> Self {
        let code: u8 = match err {
            TradeAssistError::Io(_) => 1,
            TradeAssistError::ConfigParse { .. }
            | TradeAssistError::ConfigMissing { .. }
            | TradeAssistError::ConfigInvalid { .. } => 2,
            TradeAssistError::InvalidInput { .. } => 3,
            TradeAssistError::SourceUnavailable { .. }
            | TradeAssistError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
