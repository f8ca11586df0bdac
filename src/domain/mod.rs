//! Core domain types and logic.

pub mod price_series;
pub mod indicator;
pub mod indicator_frame;
pub mod signal;
pub mod sizing;
pub mod evaluation;
pub mod universe;
pub mod config_validation;
pub mod error;
