//! Resident column table, persistence policy, and background generation.
#![forbid(unsafe_code)]

pub mod config;
mod stats;
mod store;
mod workers;

pub use config::{StoreConfig, StrataConfig, WorldConfig, load_config_from_path};
pub use stats::StoreStats;
pub use store::{ColumnHandle, StoreError, TickReport, WorldStore};
