//! CSV file price source.
//!
//! One file per symbol, `<dir>/<SYMBOL>.csv`, with a header row. Columns are
//! found by name: `date` and `close` are required; `open`, `high`, `low` and
//! `volume` are read when present, so the same adapter serves equities
//! (OHLCV) and close-only coin prices.

use crate::domain::error::TradeAssistError;
use crate::domain::price_series::{PriceBar, PriceSeries};
use crate::ports::price_source::PriceSource;
use chrono::{Days, NaiveDate};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvPriceSource {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    close: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord, path: &str) -> Result<Self, TradeAssistError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let required = |name: &str| {
            find(name).ok_or_else(|| {
                TradeAssistError::invalid_input(format!("{path}: missing {name} column"))
            })
        };

        Ok(Self {
            date: required("date")?,
            close: required("close")?,
            open: find("open"),
            high: find("high"),
            low: find("low"),
            volume: find("volume"),
        })
    }
}

impl CsvPriceSource {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_bars(&self, symbol: &str) -> Result<Vec<PriceBar>, TradeAssistError> {
        let path = self.csv_path(symbol);
        let display = path.display().to_string();
        let content =
            fs::read_to_string(&path).map_err(|e| TradeAssistError::SourceUnavailable {
                symbol: symbol.to_string(),
                reason: format!("failed to read {}: {}", display, e),
            })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| TradeAssistError::invalid_input(format!("{display}: {e}")))?
            .clone();
        let columns = Columns::from_headers(&headers, &display)?;

        let mut bars = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| {
                TradeAssistError::invalid_input(format!("{display}: CSV parse error: {e}"))
            })?;
            bars.push(parse_record(&record, &columns, &display, row + 2)?);
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

fn field<'a>(
    record: &'a csv::StringRecord,
    index: usize,
    name: &str,
    path: &str,
    line: usize,
) -> Result<&'a str, TradeAssistError> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| TradeAssistError::invalid_input(format!("{path}:{line}: missing {name}")))
}

fn parse_price(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    path: &str,
    line: usize,
) -> Result<f64, TradeAssistError> {
    field(record, index, name, path, line)?
        .parse::<f64>()
        .map_err(|e| TradeAssistError::invalid_input(format!("{path}:{line}: invalid {name}: {e}")))
}

fn parse_optional_price(
    record: &csv::StringRecord,
    index: Option<usize>,
    name: &str,
    path: &str,
    line: usize,
) -> Result<Option<f64>, TradeAssistError> {
    match index {
        Some(i) if !field(record, i, name, path, line)?.is_empty() => {
            parse_price(record, i, name, path, line).map(Some)
        }
        _ => Ok(None),
    }
}

fn parse_record(
    record: &csv::StringRecord,
    columns: &Columns,
    path: &str,
    line: usize,
) -> Result<PriceBar, TradeAssistError> {
    let date_str = field(record, columns.date, "date", path, line)?;
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
        TradeAssistError::invalid_input(format!("{path}:{line}: invalid date format: {e}"))
    })?;

    let volume = match columns.volume {
        Some(i) if !field(record, i, "volume", path, line)?.is_empty() => Some(
            field(record, i, "volume", path, line)?
                .parse::<f64>()
                .map_err(|e| {
                    TradeAssistError::invalid_input(format!("{path}:{line}: invalid volume: {e}"))
                })?
                .max(0.0) as u64,
        ),
        _ => None,
    };

    Ok(PriceBar {
        date,
        open: parse_optional_price(record, columns.open, "open", path, line)?,
        high: parse_optional_price(record, columns.high, "high", path, line)?,
        low: parse_optional_price(record, columns.low, "low", path, line)?,
        close: parse_price(record, columns.close, "close", path, line)?,
        volume,
    })
}

/// Keeps bars dated within `lookback_days` calendar days of the newest bar.
fn trim_to_lookback(bars: Vec<PriceBar>, lookback_days: u32) -> Vec<PriceBar> {
    let Some(latest) = bars.last().map(|b| b.date) else {
        return bars;
    };
    let Some(cutoff) = latest.checked_sub_days(Days::new(lookback_days as u64)) else {
        return bars;
    };
    bars.into_iter().filter(|b| b.date > cutoff).collect()
}

impl PriceSource for CsvPriceSource {
    fn fetch(&self, symbol: &str, lookback_days: u32) -> Result<PriceSeries, TradeAssistError> {
        let bars = trim_to_lookback(self.read_bars(symbol)?, lookback_days);
        if bars.is_empty() {
            return Err(TradeAssistError::SourceUnavailable {
                symbol: symbol.to_string(),
                reason: "no price rows".to_string(),
            });
        }

        debug!(%symbol, bars = bars.len(), lookback_days, "loaded csv prices");
        PriceSeries::new(symbol, bars)
    }
}
