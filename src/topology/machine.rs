//! Machines: the leaf resource of the topology

use crate::topology::ids::{ClusterId, MachineId};
use crate::traffic::IoCounters;

#[derive(Debug, Clone)]
pub struct Machine {
    id: MachineId,
    disks: usize,
    /// Cluster this machine is allocated to, if any
    cluster: Option<ClusterId>,
    io: IoCounters,
}

impl Machine {
    pub(crate) fn new(id: MachineId, disks: usize) -> Self {
        Self {
            id,
            disks,
            cluster: None,
            io: IoCounters::default(),
        }
    }

    pub fn id(&self) -> MachineId {
        self.id
    }

    pub fn disks(&self) -> usize {
        self.disks
    }

    pub fn cluster(&self) -> Option<ClusterId> {
        self.cluster
    }

    pub fn is_allocated(&self) -> bool {
        self.cluster.is_some()
    }

    pub fn io(&self) -> &IoCounters {
        &self.io
    }

    pub fn net_rx(&self) -> f64 {
        self.io.net_rx
    }

    pub fn net_tx(&self) -> f64 {
        self.io.net_tx
    }

    pub fn disk_write(&self) -> f64 {
        self.io.disk_write
    }

    pub fn disk_read(&self) -> f64 {
        self.io.disk_read
    }

    /// Average I/O per disk. Zero for a diskless machine.
    pub fn per_disk(&self) -> IoCounters {
        if self.disks == 0 {
            return IoCounters::default();
        }
        let disks = self.disks as f64;
        IoCounters {
            disk_write: self.io.disk_write / disks,
            disk_read: self.io.disk_read / disks,
            ..Default::default()
        }
    }

    /// Returns false if the machine already belongs to a cluster
    pub(crate) fn allocate(&mut self, cluster: ClusterId) -> bool {
        if self.cluster.is_some() {
            return false;
        }
        self.cluster = Some(cluster);
        true
    }

    pub(crate) fn deallocate(&mut self) -> Option<ClusterId> {
        self.cluster.take()
    }

    pub(crate) fn record(&mut self, delta: &IoCounters) {
        self.io += *delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_state() {
        let mut machine = Machine::new(MachineId(3), 35);
        assert!(!machine.is_allocated());
        assert_eq!(machine.cluster(), None);

        assert!(machine.allocate(ClusterId(1)));
        assert!(machine.is_allocated());
        assert!(!machine.allocate(ClusterId(2)));
        assert_eq!(machine.cluster(), Some(ClusterId(1)));

        assert_eq!(machine.deallocate(), Some(ClusterId(1)));
        assert!(!machine.is_allocated());
        assert_eq!(machine.deallocate(), None);
    }

    #[test]
    fn test_record_accumulates() {
        let mut machine = Machine::new(MachineId(0), 4);
        let delta = IoCounters {
            net_rx: 1.5,
            net_tx: 0.5,
            disk_write: 8.0,
            disk_read: 4.0,
        };
        machine.record(&delta);
        machine.record(&delta);

        assert_eq!(machine.net_rx(), 3.0);
        assert_eq!(machine.net_tx(), 1.0);
        assert_eq!(machine.disk_write(), 16.0);
        assert_eq!(machine.disk_read(), 8.0);

        let per_disk = machine.per_disk();
        assert_eq!(per_disk.disk_write, 4.0);
        assert_eq!(per_disk.disk_read, 2.0);
    }

    #[test]
    fn test_diskless_per_disk_is_zero() {
        let mut machine = Machine::new(MachineId(0), 0);
        machine.record(&IoCounters {
            disk_write: 10.0,
            ..Default::default()
        });
        assert!(machine.per_disk().is_zero());
    }
}
