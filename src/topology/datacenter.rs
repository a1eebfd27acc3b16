//! Datacenters own an ordered row of racks

use crate::topology::ids::DatacenterId;
use crate::topology::rack::Rack;
use crate::traffic::IoCounters;

#[derive(Debug, Clone)]
pub struct Datacenter {
    id: DatacenterId,
    racks: Vec<Rack>,
}

impl Datacenter {
    pub(crate) fn new(id: DatacenterId, racks: Vec<Rack>) -> Self {
        Self { id, racks }
    }

    pub fn id(&self) -> DatacenterId {
        self.id
    }

    pub fn racks(&self) -> &[Rack] {
        &self.racks
    }

    pub(crate) fn racks_mut(&mut self) -> &mut [Rack] {
        &mut self.racks
    }

    /// Free machines across all racks
    pub fn capacity(&self) -> usize {
        self.racks.iter().map(Rack::capacity).sum()
    }

    /// Largest free count of any single rack
    pub fn largest_rack_capacity(&self) -> usize {
        self.racks.iter().map(Rack::capacity).max().unwrap_or(0)
    }

    pub fn machine_count(&self) -> usize {
        self.racks.iter().map(|r| r.machines().len()).sum()
    }

    pub fn io_totals(&self) -> IoCounters {
        self.racks.iter().map(Rack::io_totals).sum()
    }
}
