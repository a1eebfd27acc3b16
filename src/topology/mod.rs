//! Physical topology: region → datacenter → rack → machine
//!
//! The tree is built once and never changes shape. Only machine allocation
//! state and traffic counters mutate afterwards.

pub mod datacenter;
pub mod ids;
pub mod machine;
pub mod rack;
pub mod region;

pub use datacenter::Datacenter;
pub use ids::{ClusterId, DatacenterId, IdAllocator, MachineId, RackId, RegionIds};
pub use machine::Machine;
pub use rack::Rack;
pub use region::{MachineAddr, Region};
