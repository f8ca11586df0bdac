//! Indicator export port trait.

use crate::domain::error::TradeAssistError;
use crate::domain::indicator_frame::IndicatorFrame;
use std::path::Path;

/// Port for writing the full indicator frame of one symbol, for charting
/// outside this crate.
pub trait ExportPort {
    fn write(&self, frame: &IndicatorFrame, output_path: &Path) -> Result<(), TradeAssistError>;
}
