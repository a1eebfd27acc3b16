//! Traffic accounting: turns a logical transfer aimed at a cluster into
//! network and disk deltas on every machine of its stripe.
//!
//! Each call computes a full [`TrafficLedger`] and checks every stripe member
//! before any counter moves, so a failed call leaves the region untouched.

pub mod counters;
pub mod model;

pub use counters::IoCounters;
pub use model::TrafficLedger;

use crate::common::{Error, Result};
use crate::topology::{ClusterId, Region};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Applies ingress/egress to clusters. Owns the random source used for
/// egress chunk selection.
pub struct TrafficEngine<R> {
    rng: R,
}

impl TrafficEngine<StdRng> {
    /// Reproducible engine
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> TrafficEngine<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Write `volume` into `cluster`
    pub fn apply_ingress(
        &mut self,
        region: &mut Region,
        cluster: ClusterId,
        volume: f64,
    ) -> Result<TrafficLedger> {
        let (stripe_width, parity) = stripe_shape(region, cluster)?;
        let ledger = model::ingress(stripe_width, parity, volume)?;
        commit(region, cluster, &ledger)?;
        tracing::debug!(%cluster, volume, chunk_size = ledger.chunk_size(), "Applied ingress");
        Ok(ledger)
    }

    /// Read `volume` back out of `cluster`
    pub fn apply_egress(
        &mut self,
        region: &mut Region,
        cluster: ClusterId,
        volume: f64,
    ) -> Result<TrafficLedger> {
        let (stripe_width, parity) = stripe_shape(region, cluster)?;
        let ledger = model::egress(stripe_width, parity, volume, &mut self.rng)?;
        commit(region, cluster, &ledger)?;
        tracing::debug!(%cluster, volume, chunk_size = ledger.chunk_size(), "Applied egress");
        Ok(ledger)
    }
}

fn stripe_shape(region: &Region, cluster: ClusterId) -> Result<(usize, usize)> {
    let cluster = region
        .cluster(cluster)
        .ok_or(Error::ClusterNotFound(cluster))?;
    Ok((cluster.stripe_width(), cluster.parity()))
}

/// Apply a ledger to the cluster's machines, all or nothing
fn commit(region: &mut Region, cluster: ClusterId, ledger: &TrafficLedger) -> Result<()> {
    let placement = region
        .cluster(cluster)
        .ok_or(Error::ClusterNotFound(cluster))?
        .placement()
        .to_vec();

    for placed in &placement {
        let held = region
            .machine(placed.addr)
            .is_some_and(|m| m.id() == placed.machine && m.cluster() == Some(cluster));
        if !held {
            return Err(Error::StalePlacement {
                cluster,
                machine: placed.machine,
            });
        }
    }

    for (placed, delta) in placement.iter().zip(ledger.deltas()) {
        if let Some(machine) = region.machine_mut(placed.addr) {
            machine.record(delta);
        }
    }
    Ok(())
}
