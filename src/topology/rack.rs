//! Racks own an ordered row of machines and cache their free count

use crate::topology::ids::{ClusterId, MachineId, RackId};
use crate::topology::machine::Machine;
use crate::traffic::IoCounters;

#[derive(Debug, Clone)]
pub struct Rack {
    id: RackId,
    machines: Vec<Machine>,
    /// Count of unallocated machines. Always equals the number of machines
    /// with no cluster.
    capacity: usize,
}

impl Rack {
    pub(crate) fn new(id: RackId, machines: Vec<Machine>) -> Self {
        let capacity = machines.iter().filter(|m| !m.is_allocated()).count();
        Self {
            id,
            machines,
            capacity,
        }
    }

    pub fn id(&self) -> RackId {
        self.id
    }

    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    pub fn machine(&self, slot: usize) -> Option<&Machine> {
        self.machines.get(slot)
    }

    pub(crate) fn machine_mut(&mut self, slot: usize) -> Option<&mut Machine> {
        self.machines.get_mut(slot)
    }

    /// Free machines in this rack
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn allocated_count(&self) -> usize {
        self.machines.len() - self.capacity
    }

    pub fn io_totals(&self) -> IoCounters {
        self.machines.iter().map(|m| *m.io()).sum()
    }

    /// Allocate up to `count` free machines to `cluster`, first free slot first.
    ///
    /// Returns the `(slot, id)` of every machine allocated; fewer than
    /// `count` only when the rack runs out.
    pub(crate) fn allocate_machines(
        &mut self,
        cluster: ClusterId,
        count: usize,
    ) -> Vec<(usize, MachineId)> {
        let mut allocated = Vec::with_capacity(count);
        for (slot, machine) in self.machines.iter_mut().enumerate() {
            if allocated.len() == count {
                break;
            }
            if machine.allocate(cluster) {
                self.capacity -= 1;
                allocated.push((slot, machine.id()));
            }
        }
        allocated
    }

    /// Return the machine in `slot` to the free pool if `cluster` holds it
    pub(crate) fn release(&mut self, slot: usize, cluster: ClusterId) -> bool {
        let Some(machine) = self.machines.get_mut(slot) else {
            return false;
        };
        if machine.cluster() != Some(cluster) {
            return false;
        }
        machine.deallocate();
        self.capacity += 1;
        true
    }
}
