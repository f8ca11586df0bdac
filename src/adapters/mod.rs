//! Adapters implementing the port traits.

pub mod csv_export;
pub mod csv_source;
pub mod file_config_adapter;
pub mod retrying_source;
