//! Configuration for ecplan simulations
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `ECPLAN_` environment variables (`ECPLAN_PLACEMENT__PARITY_CHUNKS=3`).
//! The binary applies command-line overrides on top.

use crate::common::units::DisplayUnit;
use crate::placement::{LocalityMode, PlacementRequest};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENV_PREFIX: &str = "ECPLAN";

/// Global configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub topology: TopologyConfig,
    pub placement: PlacementConfig,
    pub traffic: TrafficConfig,
    pub report: ReportConfig,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            topology: TopologyConfig::default(),
            placement: PlacementConfig::default(),
            traffic: TrafficConfig::default(),
            report: ReportConfig::default(),
            log_level: default_log_level(),
        }
    }
}

/// Physical hierarchy sizes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    pub datacenters: usize,
    pub racks_per_datacenter: usize,
    pub machines_per_rack: usize,
    pub disks_per_machine: usize,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            datacenters: 3,
            racks_per_datacenter: 4,
            machines_per_rack: 4,
            disks_per_machine: 35,
        }
    }
}

/// Cluster placement policy, applied to every cluster the driver allocates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Number of storage clusters to allocate
    pub cluster_count: usize,

    /// Machines per cluster, also the EC stripe width
    pub stripe_width: usize,

    pub parity_chunks: usize,

    /// Datacenters each cluster is spread across
    pub datacenters: usize,

    /// Pack each datacenter's share of a cluster into a single rack
    pub rack_locality: bool,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            cluster_count: 4,
            stripe_width: 12,
            parity_chunks: 4,
            datacenters: 3,
            rack_locality: false,
        }
    }
}

impl PlacementConfig {
    pub fn request(&self) -> PlacementRequest {
        PlacementRequest {
            stripe_width: self.stripe_width,
            datacenter_count: self.datacenters,
            parity: self.parity_chunks,
            locality: if self.rack_locality {
                LocalityMode::Rack
            } else {
                LocalityMode::Spread
            },
        }
    }
}

/// Aggregate user traffic, in gigabits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficConfig {
    pub upload: f64,
    pub download: f64,

    /// Seed for egress chunk selection. Entropy-seeded when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            upload: 600.0,
            download: 300.0,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub unit: DisplayUnit,
    pub format: ReportFormat,
}

impl SimConfig {
    /// Load configuration from defaults, an optional TOML file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(true),
            );
        }
        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: SimConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.placement.cluster_count == 0 {
            return Err(Error::InvalidConfig(
                "cluster_count must be at least 1".into(),
            ));
        }
        for (name, volume) in [
            ("upload", self.traffic.upload),
            ("download", self.traffic.download),
        ] {
            if !volume.is_finite() || volume < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{} volume must be a non-negative number, got {}",
                    name, volume
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_reference_run() {
        let config = SimConfig::default();
        assert_eq!(config.topology.datacenters, 3);
        assert_eq!(config.topology.racks_per_datacenter, 4);
        assert_eq!(config.topology.machines_per_rack, 4);
        assert_eq!(config.topology.disks_per_machine, 35);
        assert_eq!(config.placement.cluster_count, 4);
        assert_eq!(config.placement.stripe_width, 12);
        assert_eq!(config.placement.parity_chunks, 4);
        assert!(!config.placement.rack_locality);
        assert_eq!(config.traffic.upload, 600.0);
        assert_eq!(config.traffic.download, 300.0);
        assert_eq!(config.report.unit, DisplayUnit::Bit);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[topology]
datacenters = 2
racks_per_datacenter = 1

[placement]
stripe_width = 8
parity_chunks = 2
datacenters = 2
rack_locality = true

[traffic]
upload = 80.0
seed = 7

[report]
unit = "byte"
"#
        )
        .unwrap();

        let config = SimConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.topology.datacenters, 2);
        assert_eq!(config.topology.racks_per_datacenter, 1);
        // untouched keys keep their defaults
        assert_eq!(config.topology.machines_per_rack, 4);
        assert_eq!(config.placement.stripe_width, 8);
        assert!(config.placement.rack_locality);
        assert_eq!(config.traffic.upload, 80.0);
        assert_eq!(config.traffic.download, 300.0);
        assert_eq!(config.traffic.seed, Some(7));
        assert_eq!(config.report.unit, DisplayUnit::Byte);
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = SimConfig::load(Some(Path::new("/nonexistent/ecplan.toml")));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_validate() {
        let mut config = SimConfig::default();
        assert!(config.validate().is_ok());

        config.traffic.download = -1.0;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.traffic.upload = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.placement.cluster_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_placement_request() {
        let mut placement = PlacementConfig::default();
        let request = placement.request();
        assert_eq!(request.stripe_width, 12);
        assert_eq!(request.datacenter_count, 3);
        assert_eq!(request.parity, 4);
        assert_eq!(request.locality, LocalityMode::Spread);

        placement.rack_locality = true;
        assert_eq!(placement.request().locality, LocalityMode::Rack);
    }
}
