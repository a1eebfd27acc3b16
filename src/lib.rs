//! # ecplan
//!
//! Capacity planning for erasure-coded storage clusters:
//! - Fixed region → datacenter → rack → machine topology
//! - All-or-nothing cluster placement with rack-local or spread policies
//! - Per-machine network and disk accounting for EC writes and reads
//! - Text and JSON reports in bits or bytes
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                    Region                    │
//! │   ┌────────┐      ┌────────┐      ┌────────┐ │
//! │   │  DC0   │      │  DC1   │      │  DC2   │ │
//! │   │ RACK.. │      │ RACK.. │      │ RACK.. │ │
//! │   │ MACH.. │      │ MACH.. │      │ MACH.. │ │
//! │   └───┬────┘      └───┬────┘      └───┬────┘ │
//! └───────┼───────────────┼───────────────┼──────┘
//!         └─────── StorageCluster ────────┘
//!            (stripe_width machines, parity p)
//! ```
//!
//! ## Usage
//!
//! ```bash
//! ecplan simulate --config ./ecplan.toml --seed 42
//! ecplan simulate --rack-locality true --unit byte --json
//! ecplan config --config ./ecplan.toml
//! ```
//!
//! ```
//! use ecplan::placement::{LocalityMode, PlacementRequest};
//! use ecplan::{Region, TrafficEngine};
//!
//! let mut region = Region::build(3, 1, 4);
//! let id = region
//!     .allocate_cluster(&PlacementRequest {
//!         stripe_width: 12,
//!         datacenter_count: 3,
//!         parity: 4,
//!         locality: LocalityMode::Spread,
//!     })
//!     .unwrap();
//!
//! let mut engine = TrafficEngine::seeded(42);
//! region.upload(120.0, &mut engine).unwrap();
//! assert_eq!(region.cluster(id).unwrap().stripe_width(), 12);
//! ```

pub mod cluster;
pub mod common;
pub mod placement;
pub mod report;
pub mod sim;
pub mod topology;
pub mod traffic;

// Re-export commonly used types
pub use cluster::{ErasureScheme, StorageCluster};
pub use common::{DisplayUnit, Error, Result, SimConfig};
pub use placement::{LocalityMode, PlacementRequest};
pub use report::RegionReport;
pub use sim::{Simulation, SimulationOutcome};
pub use topology::{ClusterId, MachineAddr, Region};
pub use traffic::{IoCounters, TrafficEngine};

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
