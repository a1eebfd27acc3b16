//! Entity identifiers and their per-region allocators

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub fn index(&self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(idx: u64) -> Self {
                Self(idx)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    };
}

entity_id!(
    /// Datacenter index, unique within a region
    DatacenterId,
    "DC"
);
entity_id!(
    /// Rack index, unique within a region
    RackId,
    "RACK"
);
entity_id!(
    /// Machine index, unique within a region
    MachineId,
    "MACHINE"
);
entity_id!(
    /// Storage cluster index. One is consumed per placement attempt that
    /// passes request validation, successful or not.
    ClusterId,
    "CLUSTER"
);

/// Monotonic counter handing out ids of one kind, starting at 0
#[derive(Debug)]
pub struct IdAllocator<T> {
    next: u64,
    _kind: PhantomData<fn() -> T>,
}

impl<T: From<u64>> IdAllocator<T> {
    pub fn new() -> Self {
        Self {
            next: 0,
            _kind: PhantomData,
        }
    }

    pub fn allocate(&mut self) -> T {
        let val = self.next;
        self.next += 1;
        T::from(val)
    }
}

impl<T: From<u64>> Default for IdAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// One allocator per entity kind, owned by a single region
#[derive(Debug, Default)]
pub struct RegionIds {
    pub datacenters: IdAllocator<DatacenterId>,
    pub racks: IdAllocator<RackId>,
    pub machines: IdAllocator<MachineId>,
    pub clusters: IdAllocator<ClusterId>,
}
