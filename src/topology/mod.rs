pub mod member;
pub mod snapshot;
pub mod source;

pub use member::{Member, NodeRole};
pub use snapshot::Snapshot;
pub use source::{SharedTopology, TopologySource};
