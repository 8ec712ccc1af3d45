use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::info;

use super::snapshot::Snapshot;

/// Supplies the latest membership snapshot.
///
/// Implementations must always return a snapshot; an empty cluster is a
/// snapshot with zero members, never an absent one. Callers may invoke this
/// from any thread and on every selection, so it should stay cheap.
pub trait TopologySource: Send + Sync {
    fn snapshot(&self) -> Arc<Snapshot>;
}

/// Holder for the current snapshot, readable without blocking.
///
/// Refresh paths publish replacement snapshots at their own pace while
/// selection paths keep loading whichever snapshot is current. A reader that
/// loaded a snapshot just before a publish keeps its (now superseded) copy
/// alive until it drops the `Arc`.
#[derive(Debug)]
pub struct SharedTopology {
    current: ArcSwap<Snapshot>,
}

impl SharedTopology {
    pub fn new(initial: Snapshot) -> SharedTopology {
        SharedTopology {
            current: ArcSwap::from_pointee(initial),
        }
    }

    /// Atomically replaces the current snapshot.
    pub fn publish(&self, snapshot: Snapshot) {
        info!(members = snapshot.members.len(), "Publishing topology snapshot");
        self.current.store(Arc::new(snapshot));
    }

    pub fn current(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }
}

impl TopologySource for SharedTopology {
    fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }
}
