//! Region: root of the topology and registry of storage clusters

use crate::cluster::StorageCluster;
use crate::common::{Error, Result, TopologyConfig};
use crate::topology::datacenter::Datacenter;
use crate::topology::ids::{ClusterId, RegionIds};
use crate::topology::machine::Machine;
use crate::topology::rack::Rack;
use crate::traffic::{IoCounters, TrafficEngine};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Position of a machine in the topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MachineAddr {
    pub datacenter: usize,
    pub rack: usize,
    pub slot: usize,
}

#[derive(Debug)]
pub struct Region {
    datacenters: Vec<Datacenter>,
    clusters: Vec<StorageCluster>,
    ids: RegionIds,
}

impl Region {
    /// Build a region of `datacenters × racks_per_datacenter × machines_per_rack`
    /// machines with the default disk count per machine.
    pub fn build(datacenters: usize, racks_per_datacenter: usize, machines_per_rack: usize) -> Self {
        Self::from_config(&TopologyConfig {
            datacenters,
            racks_per_datacenter,
            machines_per_rack,
            ..Default::default()
        })
    }

    /// Instantiate the tree leaf-first: machines, then their rack, then the
    /// datacenter once all its racks exist.
    pub fn from_config(config: &TopologyConfig) -> Self {
        let mut ids = RegionIds::default();
        let mut datacenters = Vec::with_capacity(config.datacenters);

        for _ in 0..config.datacenters {
            let mut racks = Vec::with_capacity(config.racks_per_datacenter);
            for _ in 0..config.racks_per_datacenter {
                let machines = (0..config.machines_per_rack)
                    .map(|_| Machine::new(ids.machines.allocate(), config.disks_per_machine))
                    .collect();
                racks.push(Rack::new(ids.racks.allocate(), machines));
            }
            datacenters.push(Datacenter::new(ids.datacenters.allocate(), racks));
        }

        tracing::info!(
            datacenters = config.datacenters,
            racks_per_datacenter = config.racks_per_datacenter,
            machines_per_rack = config.machines_per_rack,
            "Built region topology"
        );

        Self {
            datacenters,
            clusters: Vec::new(),
            ids,
        }
    }

    pub fn datacenters(&self) -> &[Datacenter] {
        &self.datacenters
    }

    pub fn datacenter_count(&self) -> usize {
        self.datacenters.len()
    }

    pub(crate) fn datacenter_mut(&mut self, idx: usize) -> Option<&mut Datacenter> {
        self.datacenters.get_mut(idx)
    }

    /// Registered (fully placed) clusters, in allocation order
    pub fn clusters(&self) -> &[StorageCluster] {
        &self.clusters
    }

    pub fn cluster(&self, id: ClusterId) -> Option<&StorageCluster> {
        self.clusters.iter().find(|c| c.id() == id)
    }

    pub(crate) fn register_cluster(&mut self, cluster: StorageCluster) {
        self.clusters.push(cluster);
    }

    pub(crate) fn ids_mut(&mut self) -> &mut RegionIds {
        &mut self.ids
    }

    pub fn machine(&self, addr: MachineAddr) -> Option<&Machine> {
        self.datacenters
            .get(addr.datacenter)?
            .racks()
            .get(addr.rack)?
            .machine(addr.slot)
    }

    pub(crate) fn machine_mut(&mut self, addr: MachineAddr) -> Option<&mut Machine> {
        self.datacenters
            .get_mut(addr.datacenter)?
            .racks_mut()
            .get_mut(addr.rack)?
            .machine_mut(addr.slot)
    }

    /// Release the machine at `addr` if it is held by `cluster`
    pub(crate) fn release(&mut self, addr: MachineAddr, cluster: ClusterId) -> bool {
        self.datacenters
            .get_mut(addr.datacenter)
            .and_then(|dc| dc.racks_mut().get_mut(addr.rack))
            .map(|rack| rack.release(addr.slot, cluster))
            .unwrap_or(false)
    }

    /// Every machine with its address, in topology order
    pub fn machines(&self) -> impl Iterator<Item = (MachineAddr, &Machine)> + '_ {
        self.datacenters.iter().enumerate().flat_map(|(d, dc)| {
            dc.racks().iter().enumerate().flat_map(move |(r, rack)| {
                rack.machines().iter().enumerate().map(move |(s, machine)| {
                    (
                        MachineAddr {
                            datacenter: d,
                            rack: r,
                            slot: s,
                        },
                        machine,
                    )
                })
            })
        })
    }

    pub fn machine_count(&self) -> usize {
        self.datacenters.iter().map(Datacenter::machine_count).sum()
    }

    pub fn allocated_machine_count(&self) -> usize {
        self.machines().filter(|(_, m)| m.is_allocated()).count()
    }

    pub fn io_totals(&self) -> IoCounters {
        self.datacenters.iter().map(Datacenter::io_totals).sum()
    }

    /// Spread an aggregate upload evenly over every registered cluster
    pub fn upload<R: Rng>(&mut self, volume: f64, engine: &mut TrafficEngine<R>) -> Result<()> {
        let share = self.share_per_cluster(volume)?;
        for id in self.cluster_ids() {
            engine.apply_ingress(self, id, share)?;
        }
        Ok(())
    }

    /// Spread an aggregate download evenly over every registered cluster
    pub fn download<R: Rng>(&mut self, volume: f64, engine: &mut TrafficEngine<R>) -> Result<()> {
        let share = self.share_per_cluster(volume)?;
        for id in self.cluster_ids() {
            engine.apply_egress(self, id, share)?;
        }
        Ok(())
    }

    fn share_per_cluster(&self, volume: f64) -> Result<f64> {
        crate::traffic::model::check_volume(volume)?;
        if self.clusters.is_empty() {
            return Err(Error::NoClusters);
        }
        Ok(volume / self.clusters.len() as f64)
    }

    fn cluster_ids(&self) -> Vec<ClusterId> {
        self.clusters.iter().map(StorageCluster::id).collect()
    }
}
