//! Storage clusters: logical erasure-coded groups bound to placed machines

use crate::common::{Error, Result};
use crate::topology::{ClusterId, MachineAddr, MachineId};
use serde::{Deserialize, Serialize};

/// Erasure-coding shape of a stripe.
///
/// A stripe of `stripe_width` chunks carries `stripe_width - parity` data
/// chunks. Any `data_chunks()` of them reconstruct the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErasureScheme {
    stripe_width: usize,
    parity: usize,
}

impl ErasureScheme {
    /// # Errors
    ///
    /// `DegenerateErasureScheme` when the stripe has no data chunks.
    pub fn new(stripe_width: usize, parity: usize) -> Result<Self> {
        if stripe_width <= parity {
            return Err(Error::DegenerateErasureScheme {
                stripe_width,
                parity,
            });
        }
        Ok(Self {
            stripe_width,
            parity,
        })
    }

    pub const fn stripe_width(&self) -> usize {
        self.stripe_width
    }

    pub const fn parity(&self) -> usize {
        self.parity
    }

    pub const fn data_chunks(&self) -> usize {
        self.stripe_width - self.parity
    }

    /// Bytes stored per byte of user data: stripe_width / data_chunks.
    /// For 12 wide with 4 parity this is 1.5.
    pub fn storage_overhead(&self) -> f64 {
        self.stripe_width as f64 / self.data_chunks() as f64
    }
}

/// One stripe member: where it lives and which machine it is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedMachine {
    pub addr: MachineAddr,
    pub machine: MachineId,
}

#[derive(Debug, Clone)]
pub struct StorageCluster {
    id: ClusterId,
    parity: usize,
    placement: Vec<PlacedMachine>,
}

impl StorageCluster {
    pub(crate) fn new(id: ClusterId, parity: usize, placement: Vec<PlacedMachine>) -> Self {
        Self {
            id,
            parity,
            placement,
        }
    }

    pub fn id(&self) -> ClusterId {
        self.id
    }

    pub fn parity(&self) -> usize {
        self.parity
    }

    /// Placed machines in stripe order
    pub fn placement(&self) -> &[PlacedMachine] {
        &self.placement
    }

    pub fn stripe_width(&self) -> usize {
        self.placement.len()
    }

    /// Erasure scheme implied by the placement
    pub fn scheme(&self) -> Result<ErasureScheme> {
        ErasureScheme::new(self.placement.len(), self.parity)
    }

    pub fn contains(&self, machine: MachineId) -> bool {
        self.placement.iter().any(|p| p.machine == machine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme() {
        let scheme = ErasureScheme::new(12, 4).unwrap();
        assert_eq!(scheme.data_chunks(), 8);
        assert_eq!(scheme.stripe_width(), 12);
        assert_eq!(scheme.parity(), 4);
        assert!((scheme.storage_overhead() - 1.5).abs() < 0.001);

        let scheme = ErasureScheme::new(3, 0).unwrap();
        assert_eq!(scheme.data_chunks(), 3);
        assert!((scheme.storage_overhead() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_degenerate_scheme() {
        assert!(matches!(
            ErasureScheme::new(4, 4),
            Err(Error::DegenerateErasureScheme {
                stripe_width: 4,
                parity: 4
            })
        ));
        assert!(ErasureScheme::new(2, 3).is_err());
        assert!(ErasureScheme::new(0, 0).is_err());
    }

    #[test]
    fn test_cluster_scheme_follows_placement() {
        let placed = |i: u64| PlacedMachine {
            addr: MachineAddr {
                datacenter: 0,
                rack: 0,
                slot: i as usize,
            },
            machine: MachineId(i),
        };
        let cluster = StorageCluster::new(ClusterId(0), 1, (0..3).map(placed).collect());
        assert_eq!(cluster.stripe_width(), 3);
        assert_eq!(cluster.scheme().unwrap().data_chunks(), 2);
        assert!(cluster.contains(MachineId(2)));
        assert!(!cluster.contains(MachineId(3)));

        let empty = StorageCluster::new(ClusterId(1), 0, Vec::new());
        assert!(empty.scheme().is_err());
    }
}
