//! Topology-aware round-robin endpoint selection for cluster clients.
//!
//! Cluster membership is refreshed out-of-band; every selection re-checks the
//! cached rotation against the latest snapshot and rebuilds it when membership
//! actually changed, so callers always rotate over live members.

pub mod configuration;
pub mod resolver;
pub mod selection_method;
pub mod supplier;
pub mod topology;
pub mod utils;

pub mod prelude {
    pub use crate::configuration::Settings;
    pub use crate::resolver::{AddressResolver, SystemResolver};
    pub use crate::selection_method::round_robin::RoundRobin;
    pub use crate::supplier::{
        primaries_by_node_id, sort_by_node_id, RoundRobinAddrSupplier, SupplyError,
    };
    pub use crate::topology::{Member, NodeRole, SharedTopology, Snapshot, TopologySource};
}
