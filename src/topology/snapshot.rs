use super::member::Member;

/// Point-in-time view of cluster membership.
///
/// A snapshot is immutable once obtained. Topology refresh never edits an
/// existing snapshot in place; it publishes a wholly new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub members: Vec<Member>,
}

impl Snapshot {
    pub fn new(members: Vec<Member>) -> Snapshot {
        Snapshot { members }
    }
}
