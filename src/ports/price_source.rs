//! Price data source port trait.

use crate::domain::error::TradeAssistError;
use crate::domain::price_series::PriceSeries;

pub trait PriceSource {
    /// Daily bars for `symbol` covering roughly the last `lookback_days`
    /// calendar days, oldest first.
    ///
    /// A source that cannot supply any data reports
    /// [`TradeAssistError::SourceUnavailable`]; it never returns an empty series.
    fn fetch(&self, symbol: &str, lookback_days: u32) -> Result<PriceSeries, TradeAssistError>;
}
