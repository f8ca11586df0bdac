//! CSV export of a full indicator frame.

use crate::domain::error::TradeAssistError;
use crate::domain::indicator::{IndicatorSeries, IndicatorValue};
use crate::domain::indicator_frame::IndicatorFrame;
use crate::ports::export_port::ExportPort;
use std::path::Path;
use tracing::info;

pub const HEADER: [&str; 13] = [
    "date",
    "close",
    "rsi",
    "sma",
    "ema",
    "macd",
    "macd_signal",
    "macd_histogram",
    "atr",
    "bb_upper",
    "bb_middle",
    "bb_lower",
    "bb_width",
];

/// Writes one row per bar. Cells where an indicator is undefined are empty.
pub struct CsvExporter;

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn simple_at(series: &IndicatorSeries, i: usize) -> Option<f64> {
    series
        .values
        .get(i)
        .filter(|p| p.valid)
        .map(|p| p.value.primary())
}

fn row(frame: &IndicatorFrame, i: usize) -> Vec<String> {
    let macd = frame.macd.values.get(i).filter(|p| p.valid);
    let (line, signal, histogram) = match macd.map(|p| &p.value) {
        Some(&IndicatorValue::Macd {
            line,
            signal,
            histogram,
        }) => (Some(line), Some(signal), Some(histogram)),
        _ => (None, None, None),
    };

    let bands = frame.bollinger.values.get(i).filter(|p| p.valid);
    let (upper, middle, lower, width) = match bands.map(|p| &p.value) {
        Some(&IndicatorValue::Bollinger {
            upper,
            middle,
            lower,
            width,
        }) => (Some(upper), Some(middle), Some(lower), Some(width)),
        _ => (None, None, None, None),
    };

    vec![
        frame.dates[i].format("%Y-%m-%d").to_string(),
        frame.closes[i].to_string(),
        cell(simple_at(&frame.rsi, i)),
        cell(simple_at(&frame.sma, i)),
        cell(simple_at(&frame.ema, i)),
        cell(line),
        cell(signal),
        cell(histogram),
        cell(frame.atr.as_ref().and_then(|atr| simple_at(atr, i))),
        cell(upper),
        cell(middle),
        cell(lower),
        cell(width),
    ]
}

impl ExportPort for CsvExporter {
    fn write(&self, frame: &IndicatorFrame, output_path: &Path) -> Result<(), TradeAssistError> {
        let mut wtr =
            csv::Writer::from_path(output_path).map_err(|e| TradeAssistError::Io(e.into()))?;

        wtr.write_record(HEADER)
            .map_err(|e| TradeAssistError::Io(e.into()))?;
        for i in 0..frame.len() {
            wtr.write_record(row(frame, i))
                .map_err(|e| TradeAssistError::Io(e.into()))?;
        }
        wtr.flush()?;

        info!(
            symbol = %frame.symbol,
            rows = frame.len(),
            path = %output_path.display(),
            "exported indicator frame"
        );
        Ok(())
    }
}
