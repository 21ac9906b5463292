use std::collections::{BTreeMap, BTreeSet};
use std::net::Ipv4Addr;

use super::net::{IpWildcard, Prefix};
use crate::diagnostic::Span;

/// The one BGP process a device runs.
#[derive(Debug, Clone, PartialEq)]
pub struct BgpProcess {
    pub asn: u32,
    pub span: Span,
    pub router_id: Option<Ipv4Addr>,
    pub networks: Vec<Prefix>,
    pub neighbors: BTreeMap<Ipv4Addr, BgpNeighbor>,
}

impl BgpProcess {
    pub fn new(asn: u32, span: Span) -> Self {
        Self {
            asn,
            span,
            router_id: None,
            networks: Vec::new(),
            neighbors: BTreeMap::new(),
        }
    }

    /// The neighbor record for `address`, created on first mention; the
    /// dialects let any `neighbor` line appear before the `remote-as` one.
    pub fn neighbor_mut(&mut self, address: Ipv4Addr, span: Span) -> &mut BgpNeighbor {
        self.neighbors
            .entry(address)
            .or_insert_with(|| BgpNeighbor::new(address, span))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BgpNeighbor {
    pub address: Ipv4Addr,
    pub span: Span,
    pub remote_as: Option<u32>,
    pub description: Option<String>,
    /// Interface cross-reference, resolved after the walk.
    pub update_source: Option<String>,
    /// Route-map cross-references, resolved after the walk.
    pub route_map_in: Option<String>,
    pub route_map_out: Option<String>,
    pub shutdown: bool,
}

impl BgpNeighbor {
    pub fn new(address: Ipv4Addr, span: Span) -> Self {
        Self {
            address,
            span,
            remote_as: None,
            description: None,
            update_source: None,
            route_map_in: None,
            route_map_out: None,
            shutdown: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OspfProcess {
    pub process_id: u32,
    pub span: Span,
    pub router_id: Option<Ipv4Addr>,
    pub networks: Vec<OspfNetwork>,
    /// Interface cross-references, resolved after the walk.
    pub passive_interfaces: BTreeSet<String>,
}

impl OspfProcess {
    pub fn new(process_id: u32, span: Span) -> Self {
        Self {
            process_id,
            span,
            router_id: None,
            networks: Vec::new(),
            passive_interfaces: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OspfNetwork {
    pub network: IpWildcard,
    pub area: u32,
}

pub const DEFAULT_STATIC_ROUTE_DISTANCE: u8 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct StaticRoute {
    pub prefix: Prefix,
    pub next_hop: NextHop,
    pub distance: u8,
    pub vrf: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextHop {
    Address(Ipv4Addr),
    /// Egress interface; a cross-reference resolved after the walk.
    Interface(String),
}
