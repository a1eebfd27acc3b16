//! Cluster placement under a datacenter/rack locality policy
//!
//! A placement spreads a stripe evenly over the first `datacenter_count`
//! datacenters of the region. Within each datacenter the machines come
//! either from a single rack ([`LocalityMode::Rack`]) or one per rack in
//! round-robin passes ([`LocalityMode::Spread`]). Selection always follows
//! creation order.
//!
//! Allocation is all-or-nothing: if any datacenter cannot be satisfied,
//! every machine taken for the attempt is released before the error is
//! returned, and the cluster is never registered.

use crate::cluster::{PlacedMachine, StorageCluster};
use crate::common::{Error, Result};
use crate::topology::{ClusterId, MachineAddr, Region};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalityMode {
    /// All of a datacenter's share in one rack
    Rack,
    /// One machine per rack per pass
    Spread,
}

/// Desired shape of one cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRequest {
    pub stripe_width: usize,
    pub datacenter_count: usize,
    pub parity: usize,
    pub locality: LocalityMode,
}

impl PlacementRequest {
    /// Check the request against a region with `available_datacenters`.
    /// Returns the number of hosts each datacenter must supply.
    pub fn hosts_per_datacenter(&self, available_datacenters: usize) -> Result<usize> {
        if self.datacenter_count == 0 {
            return Err(Error::invalid_request("datacenter count must be at least 1"));
        }
        if self.stripe_width == 0 {
            return Err(Error::invalid_request("stripe width must be at least 1"));
        }
        if self.stripe_width % self.datacenter_count != 0 {
            return Err(Error::invalid_request(
                "stripe width not divisible by datacenter count",
            ));
        }
        if self.stripe_width <= self.parity {
            return Err(Error::invalid_request(format!(
                "stripe width {} must exceed parity {}",
                self.stripe_width, self.parity
            )));
        }
        if self.datacenter_count > available_datacenters {
            return Err(Error::invalid_request(format!(
                "requested {} datacenters but region has {}",
                self.datacenter_count, available_datacenters
            )));
        }
        Ok(self.stripe_width / self.datacenter_count)
    }
}

/// Machines taken so far by one placement attempt
struct PlacementJournal {
    cluster: ClusterId,
    placed: Vec<PlacedMachine>,
}

impl PlacementJournal {
    fn new(cluster: ClusterId) -> Self {
        Self {
            cluster,
            placed: Vec::new(),
        }
    }

    fn record(&mut self, addr: MachineAddr, machine: crate::topology::MachineId) {
        tracing::debug!(cluster = %self.cluster, %machine, "Allocated machine");
        self.placed.push(PlacedMachine { addr, machine });
    }

    /// Release every recorded machine. Returns how many were released.
    fn rollback(self, region: &mut Region) -> usize {
        let mut released = 0;
        for placed in &self.placed {
            if region.release(placed.addr, self.cluster) {
                released += 1;
            }
        }
        released
    }
}

impl Region {
    /// Place a new storage cluster and register it.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` before any machine is touched
    /// - `InsufficientRackCapacity` / `InsufficientCapacity` after rolling
    ///   back every machine taken for this attempt
    pub fn allocate_cluster(&mut self, request: &PlacementRequest) -> Result<ClusterId> {
        let hosts_per_dc = request.hosts_per_datacenter(self.datacenter_count())?;

        let cluster = self.ids_mut().clusters.allocate();
        let mut journal = PlacementJournal::new(cluster);

        for dc in 0..request.datacenter_count {
            let placed = match request.locality {
                LocalityMode::Rack => self.place_rack_local(dc, hosts_per_dc, &mut journal),
                LocalityMode::Spread => self.place_spread(dc, hosts_per_dc, &mut journal),
            };
            if let Err(e) = placed {
                let released = journal.rollback(self);
                tracing::warn!(%cluster, released, "Placement failed, rolled back: {}", e);
                return Err(e);
            }
        }

        tracing::info!(
            %cluster,
            stripe_width = request.stripe_width,
            parity = request.parity,
            "Placed storage cluster"
        );
        self.register_cluster(StorageCluster::new(cluster, request.parity, journal.placed));
        Ok(cluster)
    }

    /// Take `hosts` machines from the first rack that can hold all of them
    fn place_rack_local(
        &mut self,
        dc: usize,
        hosts: usize,
        journal: &mut PlacementJournal,
    ) -> Result<()> {
        let datacenter = self
            .datacenter_mut(dc)
            .ok_or_else(|| Error::invalid_request(format!("datacenter {} out of range", dc)))?;
        let dc_id = datacenter.id();

        let Some(rack_idx) = datacenter.racks().iter().position(|r| r.capacity() >= hosts) else {
            return Err(Error::InsufficientRackCapacity {
                datacenter: dc_id,
                requested: hosts,
                largest_free: datacenter.largest_rack_capacity(),
            });
        };

        let allocated = datacenter.racks_mut()[rack_idx].allocate_machines(journal.cluster, hosts);
        let count = allocated.len();
        for (slot, machine) in allocated {
            journal.record(
                MachineAddr {
                    datacenter: dc,
                    rack: rack_idx,
                    slot,
                },
                machine,
            );
        }

        if count < hosts {
            return Err(Error::InsufficientRackCapacity {
                datacenter: dc_id,
                requested: hosts,
                largest_free: count,
            });
        }
        Ok(())
    }

    /// Take one machine per rack per pass until `hosts` are placed or every
    /// rack is full
    fn place_spread(
        &mut self,
        dc: usize,
        hosts: usize,
        journal: &mut PlacementJournal,
    ) -> Result<()> {
        let datacenter = self
            .datacenter_mut(dc)
            .ok_or_else(|| Error::invalid_request(format!("datacenter {} out of range", dc)))?;
        let dc_id = datacenter.id();

        let mut allocated = 0;
        while allocated < hosts {
            let mut progressed = false;
            for (rack_idx, rack) in datacenter.racks_mut().iter_mut().enumerate() {
                if allocated == hosts {
                    break;
                }
                if rack.capacity() == 0 {
                    continue;
                }
                for (slot, machine) in rack.allocate_machines(journal.cluster, 1) {
                    journal.record(
                        MachineAddr {
                            datacenter: dc,
                            rack: rack_idx,
                            slot,
                        },
                        machine,
                    );
                    allocated += 1;
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }

        if allocated < hosts {
            return Err(Error::InsufficientCapacity {
                datacenter: dc_id,
                requested: hosts,
                allocated,
            });
        }
        Ok(())
    }
}
