//! Read-only view of a region for reporting
//!
//! [`RegionReport`] snapshots every counter, scaled to a display unit. It
//! serializes to JSON and renders as an indented text tree.

use crate::common::{format_volume, DisplayUnit};
use crate::topology::{ClusterId, DatacenterId, MachineId, RackId, Region};
use crate::traffic::IoCounters;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
pub struct RegionReport {
    pub unit: DisplayUnit,
    pub totals: IoCounters,
    pub machines: usize,
    pub allocated_machines: usize,
    pub clusters: Vec<ClusterSummary>,
    pub datacenters: Vec<DatacenterReport>,
    /// Why the driver stopped placing clusters, if it did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocation_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusterSummary {
    pub id: ClusterId,
    pub stripe_width: usize,
    pub parity: usize,
    /// Bytes stored per byte of user data
    pub storage_overhead: f64,
    pub machines: Vec<MachineId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatacenterReport {
    pub id: DatacenterId,
    pub free: usize,
    pub totals: IoCounters,
    pub racks: Vec<RackReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RackReport {
    pub id: RackId,
    pub free: usize,
    pub totals: IoCounters,
    pub machines: Vec<MachineReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MachineReport {
    pub id: MachineId,
    /// None when unallocated
    pub cluster: Option<ClusterId>,
    pub io: IoCounters,
    pub disks: usize,
    pub per_disk: IoCounters,
}

impl RegionReport {
    pub fn from_region(region: &Region, unit: DisplayUnit) -> Self {
        let datacenters = region
            .datacenters()
            .iter()
            .map(|dc| DatacenterReport {
                id: dc.id(),
                free: dc.capacity(),
                totals: dc.io_totals().scaled(unit),
                racks: dc
                    .racks()
                    .iter()
                    .map(|rack| RackReport {
                        id: rack.id(),
                        free: rack.capacity(),
                        totals: rack.io_totals().scaled(unit),
                        machines: rack
                            .machines()
                            .iter()
                            .map(|m| MachineReport {
                                id: m.id(),
                                cluster: m.cluster(),
                                io: m.io().scaled(unit),
                                disks: m.disks(),
                                per_disk: m.per_disk().scaled(unit),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        let clusters = region
            .clusters()
            .iter()
            .map(|c| ClusterSummary {
                id: c.id(),
                stripe_width: c.stripe_width(),
                parity: c.parity(),
                storage_overhead: c.scheme().map_or(0.0, |s| s.storage_overhead()),
                machines: c.placement().iter().map(|p| p.machine).collect(),
            })
            .collect();

        Self {
            unit,
            totals: region.io_totals().scaled(unit),
            machines: region.machine_count(),
            allocated_machines: region.allocated_machine_count(),
            clusters,
            datacenters,
            allocation_error: None,
        }
    }

    pub fn with_allocation_error(mut self, error: Option<String>) -> Self {
        self.allocation_error = error;
        self
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn io_fields(io: &IoCounters) -> String {
    format!(
        "tx={} rx={} disk_write={} disk_read={}",
        format_volume(io.net_tx),
        format_volume(io.net_rx),
        format_volume(io.disk_write),
        format_volume(io.disk_read)
    )
}

impl fmt::Display for RegionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Region ({}): {} allocated={}/{}",
            self.unit.suffix(),
            io_fields(&self.totals),
            self.allocated_machines,
            self.machines
        )?;
        for dc in &self.datacenters {
            writeln!(f, "  {}: free={} {}", dc.id, dc.free, io_fields(&dc.totals))?;
            for rack in &dc.racks {
                writeln!(f, "     {}: free={} {}", rack.id, rack.free, io_fields(&rack.totals))?;
                for machine in &rack.machines {
                    let cluster = match machine.cluster {
                        Some(id) => id.index().to_string(),
                        None => "unalloc".to_string(),
                    };
                    writeln!(
                        f,
                        "        {}: cluster={} {} per_disk_write={} per_disk_read={}",
                        machine.id,
                        cluster,
                        io_fields(&machine.io),
                        format_volume(machine.per_disk.disk_write),
                        format_volume(machine.per_disk.disk_read)
                    )?;
                }
            }
        }
        for cluster in &self.clusters {
            writeln!(
                f,
                "{}: width={} parity={} overhead={:.2}",
                cluster.id, cluster.stripe_width, cluster.parity, cluster.storage_overhead
            )?;
        }
        if let Some(err) = &self.allocation_error {
            writeln!(f, "error allocating storage cluster: {}", err)?;
        }
        Ok(())
    }
}
