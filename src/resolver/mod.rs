use std::io;
use std::net::{SocketAddr, ToSocketAddrs};

use thiserror::Error;

use crate::topology::Member;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Member {node_id} has no advertised address")]
    MissingAddress { node_id: String },
    #[error("Failed to look up {addr}")]
    Lookup {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("Lookup for {addr} returned no addresses")]
    NoRecords { addr: String },
}

/// Turns a selected member into a connectable socket address.
///
/// Resolution runs on every selection, after the member has been chosen, so a
/// slow resolver delays only the caller that triggered it.
pub trait AddressResolver: Send + Sync {
    fn resolve(&self, member: &Member) -> Result<SocketAddr, ResolveError>;
}

/// Resolver backed by the operating system's name lookup.
///
/// Accepts `host:port` with either a hostname or an IP literal on the host
/// side. When a name maps to several addresses the first one wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

impl AddressResolver for SystemResolver {
    fn resolve(&self, member: &Member) -> Result<SocketAddr, ResolveError> {
        let addr = member
            .addr
            .as_deref()
            .ok_or_else(|| ResolveError::MissingAddress {
                node_id: member.node_id.clone(),
            })?;

        let mut candidates = addr
            .to_socket_addrs()
            .map_err(|source| ResolveError::Lookup {
                addr: addr.to_string(),
                source,
            })?;

        candidates.next().ok_or_else(|| ResolveError::NoRecords {
            addr: addr.to_string(),
        })
    }
}
