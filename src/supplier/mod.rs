//! Round-robin supply of connectable cluster addresses.
//!
//! [`RoundRobinAddrSupplier`] glues a topology source, an ordering function,
//! and an address resolver around a shared rotation. Every call to
//! [`RoundRobinAddrSupplier::get`] re-checks the rotation against the current
//! snapshot before advancing, so membership changes take effect on the very
//! next selection.

use std::fmt;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::debug;

use crate::resolver::{AddressResolver, ResolveError};
use crate::selection_method::RoundRobin;
use crate::topology::{Member, NodeRole, TopologySource};

/// Stored form of the injected ordering (and optional filtering) applied to
/// raw snapshot members before they enter a rotation.
pub type SortFn = Box<dyn Fn(&[Member]) -> Vec<Member> + Send + Sync>;

#[derive(Debug, Error)]
pub enum SupplyError {
    #[error("No eligible cluster members to select from")]
    NoEligibleEndpoint,
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Stable rotation order: members sorted by node id.
pub fn sort_by_node_id() -> impl Fn(&[Member]) -> Vec<Member> + Send + Sync {
    |members: &[Member]| {
        let mut sorted = members.to_vec();
        sorted.sort_by(|a, b| a.node_id.cmp(&b.node_id));
        sorted
    }
}

/// Primaries only, sorted by node id.
///
/// Staleness is judged against the raw snapshot, so whenever this filter
/// actually removes a replica the rotation never matches the snapshot and
/// every selection rebuilds it, restarting from the first primary.
pub fn primaries_by_node_id() -> impl Fn(&[Member]) -> Vec<Member> + Send + Sync {
    |members: &[Member]| {
        let mut primaries: Vec<Member> = members
            .iter()
            .filter(|member| member.role == NodeRole::Primary)
            .cloned()
            .collect();
        primaries.sort_by(|a, b| a.node_id.cmp(&b.node_id));
        primaries
    }
}

/// Hands out cluster member addresses one at a time, in rotation order.
///
/// The held rotation is a value copy of the members it was built from. When a
/// selection finds the rotation out of step with the current snapshot it
/// rebuilds before advancing; check-rebuild-advance runs as one critical
/// section, so concurrent callers never interleave with a rebuild.
pub struct RoundRobinAddrSupplier {
    topology: Arc<dyn TopologySource>,
    sort: SortFn,
    resolver: Arc<dyn AddressResolver>,
    selector: Mutex<RoundRobin<Member>>,
}

impl RoundRobinAddrSupplier {
    pub fn new(
        topology: Arc<dyn TopologySource>,
        sort: impl Fn(&[Member]) -> Vec<Member> + Send + Sync + 'static,
        resolver: Arc<dyn AddressResolver>,
    ) -> RoundRobinAddrSupplier {
        let sort: SortFn = Box::new(sort);
        let mut selector = RoundRobin::new(Member::is_same_endpoint);
        let snapshot = topology.snapshot();
        selector.rebuild(sort(&snapshot.members));

        RoundRobinAddrSupplier {
            topology,
            sort,
            resolver,
            selector: Mutex::new(selector),
        }
    }

    /// Selects the next member and resolves it to a socket address.
    ///
    /// The snapshot fetch and the resolver call run outside the rotation lock;
    /// only check-rebuild-advance holds it.
    #[tracing::instrument(name = "Supply endpoint", skip_all, err(Debug))]
    pub fn get(&self) -> Result<SocketAddr, SupplyError> {
        let snapshot = self.topology.snapshot();

        let member = {
            let mut selector = self.selector.lock().unwrap();
            if !selector.is_consistent(&snapshot.members) {
                debug!(
                    members = snapshot.members.len(),
                    "Topology changed, rebuilding rotation"
                );
                selector.rebuild((self.sort)(&snapshot.members));
            }
            selector.next().cloned()
        };

        let member = member.ok_or(SupplyError::NoEligibleEndpoint)?;
        let addr = self.resolver.resolve(&member)?;
        debug!(node_id = %member.node_id, %addr, "Selected endpoint");

        Ok(addr)
    }
}

impl fmt::Debug for RoundRobinAddrSupplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundRobinAddrSupplier")
            .field("selector", &self.selector)
            .finish_non_exhaustive()
    }
}
