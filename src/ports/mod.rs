//! Port traits for hexagonal architecture.

pub mod config_port;
pub mod export_port;
pub mod price_source;
