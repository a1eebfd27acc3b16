//! Common utilities and types shared across ecplan

pub mod config;
pub mod error;
pub mod units;

pub use config::{PlacementConfig, ReportConfig, ReportFormat, SimConfig, TopologyConfig, TrafficConfig};
pub use error::{Error, Result};
pub use units::{format_volume, DisplayUnit};
