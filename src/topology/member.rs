use serde::Deserialize;

/// Replication role a cluster member advertises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum NodeRole {
    #[serde(rename = "primary")]
    Primary,
    #[serde(rename = "replica")]
    Replica,
}

/// One cluster participant. `addr` is the logical `host:port` peers reach it
/// under; it may be absent while a node is still joining the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub node_id: String,
    pub addr: Option<String>,
    pub role: NodeRole,
}

impl Member {
    pub fn new(node_id: impl Into<String>, addr: Option<String>, role: NodeRole) -> Member {
        Member {
            node_id: node_id.into(),
            addr,
            role,
        }
    }

    /// Whether `self` and `other` denote the same logical endpoint: equal
    /// logical addresses, with two absent addresses counting as equal. Node id
    /// and role do not participate in the comparison; snapshots are freshly
    /// built value copies on every refresh, so the address is what identifies
    /// an endpoint across them.
    pub fn is_same_endpoint(&self, other: &Member) -> bool {
        self.addr == other.addr
    }
}
