//! Error types for ecplan

use crate::topology::{ClusterId, DatacenterId, MachineId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === Request Errors ===
    #[error("Invalid placement request: {reason}")]
    InvalidRequest { reason: String },

    // === Placement Errors ===
    #[error(
        "Insufficient rack capacity in {datacenter}: need {requested} machines in one rack, largest rack has {largest_free} free"
    )]
    InsufficientRackCapacity {
        datacenter: DatacenterId,
        requested: usize,
        largest_free: usize,
    },

    #[error("Insufficient capacity in {datacenter}: need {requested} machines, allocated {allocated}")]
    InsufficientCapacity {
        datacenter: DatacenterId,
        requested: usize,
        allocated: usize,
    },

    // === Traffic Errors ===
    #[error("Degenerate erasure scheme: stripe width {stripe_width} must exceed parity {parity}")]
    DegenerateErasureScheme { stripe_width: usize, parity: usize },

    #[error("Invalid traffic volume: {volume} (must be finite and non-negative)")]
    InvalidVolume { volume: f64 },

    #[error("Cluster not found: {0}")]
    ClusterNotFound(ClusterId),

    #[error("{machine} is not held by {cluster}")]
    StalePlacement {
        cluster: ClusterId,
        machine: MachineId,
    },

    #[error("No storage clusters registered in region")]
    NoClusters,

    // === Config Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === Output Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_request(reason: impl Into<String>) -> Self {
        Error::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Did the topology lack room for the requested placement?
    pub fn is_placement_failure(&self) -> bool {
        matches!(
            self,
            Error::InsufficientRackCapacity { .. } | Error::InsufficientCapacity { .. }
        )
    }

    /// Was the request rejected before any machine was touched?
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Error::InvalidRequest { .. })
    }
}

impl From<::config::ConfigError> for Error {
    fn from(e: ::config::ConfigError) -> Self {
        Error::InvalidConfig(e.to_string())
    }
}
