//! Simulation driver
//!
//! Builds the topology, places clusters until the configured count is
//! reached or a placement fails, then applies the aggregate upload followed
//! by the aggregate download.

use crate::common::{Error, Result, SimConfig};
use crate::report::RegionReport;
use crate::topology::{ClusterId, Region};
use crate::traffic::TrafficEngine;
use rand::Rng;

pub struct Simulation {
    config: SimConfig,
}

/// Region state after a run
#[derive(Debug)]
pub struct SimulationOutcome {
    pub region: Region,
    pub placed: Vec<ClusterId>,
    /// First placement failure; later clusters were not attempted
    pub allocation_error: Option<Error>,
}

impl SimulationOutcome {
    pub fn report(&self, unit: crate::common::DisplayUnit) -> RegionReport {
        RegionReport::from_region(&self.region, unit)
            .with_allocation_error(self.allocation_error.as_ref().map(|e| e.to_string()))
    }
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn run(&self) -> Result<SimulationOutcome> {
        let mut engine = match self.config.traffic.seed {
            Some(seed) => TrafficEngine::seeded(seed),
            None => TrafficEngine::from_entropy(),
        };
        self.run_with(&mut engine)
    }

    /// Run with a caller-supplied engine
    pub fn run_with<R: Rng>(&self, engine: &mut TrafficEngine<R>) -> Result<SimulationOutcome> {
        self.config.validate()?;

        let mut region = Region::from_config(&self.config.topology);
        let request = self.config.placement.request();

        let mut placed = Vec::with_capacity(self.config.placement.cluster_count);
        let mut allocation_error = None;
        for attempt in 0..self.config.placement.cluster_count {
            match region.allocate_cluster(&request) {
                Ok(id) => placed.push(id),
                Err(e) => {
                    tracing::warn!(attempt, "Halting cluster allocation: {}", e);
                    allocation_error = Some(e);
                    break;
                }
            }
        }

        if placed.is_empty() {
            return Err(allocation_error.unwrap_or(Error::NoClusters));
        }

        tracing::info!(
            clusters = placed.len(),
            upload = self.config.traffic.upload,
            download = self.config.traffic.download,
            "Applying traffic"
        );
        region.upload(self.config.traffic.upload, engine)?;
        region.download(self.config.traffic.download, engine)?;

        Ok(SimulationOutcome {
            region,
            placed,
            allocation_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_run_places_all_clusters() {
        let mut config = SimConfig::default();
        config.traffic.seed = Some(1);
        let outcome = Simulation::new(config).run().unwrap();

        // 3 DCs × 4 racks × 4 machines fit exactly 4 clusters of 12
        assert_eq!(outcome.placed.len(), 4);
        assert!(outcome.allocation_error.is_none());
        assert_eq!(outcome.region.allocated_machine_count(), 48);
    }

    #[test]
    fn test_halts_on_first_failure() {
        let mut config = SimConfig::default();
        config.placement.cluster_count = 6;
        config.traffic.seed = Some(1);
        let outcome = Simulation::new(config).run().unwrap();

        assert_eq!(outcome.placed.len(), 4);
        assert!(outcome
            .allocation_error
            .as_ref()
            .is_some_and(Error::is_placement_failure));
        assert_eq!(outcome.region.clusters().len(), 4);

        let report = outcome.report(crate::common::DisplayUnit::Bit);
        assert!(report.allocation_error.is_some());
    }

    #[test]
    fn test_no_cluster_placed_is_an_error() {
        let mut config = SimConfig::default();
        config.placement.stripe_width = 10;
        assert!(matches!(
            Simulation::new(config).run(),
            Err(Error::InvalidRequest { .. })
        ));
    }

    #[test]
    fn test_seeded_runs_match() {
        let mut config = SimConfig::default();
        config.traffic.seed = Some(99);
        let a = Simulation::new(config.clone()).run().unwrap();
        let b = Simulation::new(config).run().unwrap();

        let io_a: Vec<_> = a.region.machines().map(|(_, m)| *m.io()).collect();
        let io_b: Vec<_> = b.region.machines().map(|(_, m)| *m.io()).collect();
        assert_eq!(io_a, io_b);
    }
}
