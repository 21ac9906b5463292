use std::net::Ipv4Addr;

use crate::diagnostic::Span;

/// Canonical spellings of the interface-name prefixes the dialects
/// abbreviate. A typed prefix expands to the unique canonical entry it is an
/// abbreviation of (`gi0/1` -> `GigabitEthernet0/1`); ambiguous or unknown
/// prefixes are kept as typed.
const CANONICAL_PREFIXES: &[&str] = &[
    "Bundle-Ether",
    "Ethernet",
    "FastEthernet",
    "FortyGigE",
    "GigabitEthernet",
    "HundredGigE",
    "Loopback",
    "Management",
    "Port-channel",
    "Serial",
    "TenGigabitEthernet",
    "Tunnel",
    "Vlan",
    "mgmt",
];

/// Splits an interface name into its leading alphabetic (plus `-`) part and
/// the unit/slot remainder, e.g. `"gi0/1"` -> `("gi", "0/1")`.
pub fn split_name(name: &str) -> (&str, &str) {
    let alpha_len = name
        .find(|c: char| !c.is_ascii_alphabetic() && c != '-')
        .unwrap_or(name.len());
    name.split_at(alpha_len)
}

/// Expands an abbreviated interface-name prefix to its canonical spelling.
pub fn canonicalize_name(typed: &str) -> String {
    let (alpha, rest) = split_name(typed);
    if alpha.is_empty() {
        return typed.to_owned();
    }
    let lower = alpha.to_ascii_lowercase();
    let mut candidates = CANONICAL_PREFIXES
        .iter()
        .filter(|c| c.to_ascii_lowercase().starts_with(&lower));
    match (candidates.next(), candidates.next()) {
        (Some(canonical), None) => format!("{canonical}{rest}"),
        _ => typed.to_owned(),
    }
}

/// Default link bandwidth in bits per second, keyed on the canonical name
/// prefix. Used until an explicit `bandwidth` line overrides it.
pub fn default_bandwidth(canonical_name: &str) -> u64 {
    let (alpha, _) = split_name(canonical_name);
    match alpha {
        "Ethernet" => 10_000_000,
        "FastEthernet" => 100_000_000,
        "TenGigabitEthernet" => 10_000_000_000,
        "FortyGigE" => 40_000_000_000,
        "HundredGigE" => 100_000_000_000,
        "Serial" => 1_544_000,
        "Loopback" => 8_000_000_000,
        _ => 1_000_000_000,
    }
}

pub const DEFAULT_MTU: u32 = 1500;

/// Management-plane interfaces are placed in the management VRF instead of
/// the default one.
pub fn is_management(canonical_name: &str) -> bool {
    let (alpha, _) = split_name(canonical_name);
    alpha == "Management" || alpha == "mgmt"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceAddress {
    pub address: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub secondary: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    /// Canonical name; also the registry key.
    pub name: String,
    pub span: Span,
    pub description: Option<String>,
    pub shutdown: bool,
    pub bandwidth: u64,
    pub mtu: u32,
    pub vrf: String,
    pub addresses: Vec<InterfaceAddress>,
    pub incoming_access_group: Option<String>,
    pub outgoing_access_group: Option<String>,
    pub access_vlan: Option<u16>,
}

impl Interface {
    /// A new interface with the prefix-derived defaults. `vrf` starts out as
    /// the dialect default (or management) VRF and may be reassigned by a
    /// `vrf forwarding` line.
    pub fn new(name: impl Into<String>, span: Span, vrf: impl Into<String>) -> Self {
        let name = name.into();
        let bandwidth = default_bandwidth(&name);
        Self {
            name,
            span,
            description: None,
            shutdown: false,
            bandwidth,
            mtu: DEFAULT_MTU,
            vrf: vrf.into(),
            addresses: Vec::new(),
            incoming_access_group: None,
            outgoing_access_group: None,
            access_vlan: None,
        }
    }

    /// The primary (first non-secondary) address, if one was configured.
    pub fn primary_address(&self) -> Option<&InterfaceAddress> {
        self.addresses.iter().find(|a| !a.secondary)
    }
}
