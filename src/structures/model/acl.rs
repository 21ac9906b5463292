use std::net::Ipv4Addr;

use super::net::IpWildcard;
use super::LineAction;
use crate::diagnostic::Span;

/// IP protocol selector of an extended ACL line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Ip,
    Icmp,
    Tcp,
    Udp,
    Gre,
    Esp,
    Ospf,
    Eigrp,
    Other(u8),
}

impl Protocol {
    /// Accepts the keyword forms of the dialects plus a raw protocol number.
    pub fn parse(text: &str) -> Option<Protocol> {
        let p = match text.to_ascii_lowercase().as_str() {
            "ip" => Protocol::Ip,
            "icmp" => Protocol::Icmp,
            "tcp" => Protocol::Tcp,
            "udp" => Protocol::Udp,
            "gre" => Protocol::Gre,
            "esp" => Protocol::Esp,
            "ospf" => Protocol::Ospf,
            "eigrp" => Protocol::Eigrp,
            other => Protocol::Other(other.parse().ok()?),
        };
        Some(p)
    }
}

/// Source or destination of an ACL line or object-group member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressSpec {
    Any,
    Host(Ipv4Addr),
    Wildcard(IpWildcard),
    /// Named indirection, resolved against the object-group registry after
    /// the walk.
    ObjectGroup(String),
}

/// Port constraint following an address spec in an extended ACL line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PortSpec {
    #[default]
    Any,
    Eq(u16),
    Gt(u16),
    Lt(u16),
    Range(u16, u16),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandardAccessList {
    pub name: String,
    pub span: Span,
    pub lines: Vec<StandardAclLine>,
    pub remarks: Vec<String>,
}

impl StandardAccessList {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
            lines: Vec::new(),
            remarks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandardAclLine {
    pub action: LineAction,
    pub source: AddressSpec,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedAccessList {
    pub name: String,
    pub span: Span,
    pub lines: Vec<ExtendedAclLine>,
    pub remarks: Vec<String>,
}

impl ExtendedAccessList {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
            lines: Vec::new(),
            remarks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedAclLine {
    pub action: LineAction,
    pub protocol: Protocol,
    pub source: AddressSpec,
    pub source_ports: PortSpec,
    pub destination: AddressSpec,
    pub destination_ports: PortSpec,
    /// TCP lines only: match established connections (ACK or RST set).
    pub established: bool,
    pub log: bool,
    pub span: Span,
}

/// ASA-style named collection of network members, referenced from ACL lines.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectGroup {
    pub name: String,
    pub span: Span,
    pub members: Vec<ObjectGroupMember>,
}

impl ObjectGroup {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
            members: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectGroupMember {
    Host(Ipv4Addr),
    Network(Ipv4Addr, Ipv4Addr),
    /// Nested `group-object`, resolved after the walk.
    Group(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_keywords_and_numbers() {
        assert_eq!(Protocol::parse("tcp"), Some(Protocol::Tcp));
        assert_eq!(Protocol::parse("TCP"), Some(Protocol::Tcp));
        assert_eq!(Protocol::parse("47"), Some(Protocol::Other(47)));
        assert_eq!(Protocol::parse("sctp"), None);
        assert_eq!(Protocol::parse("300"), None);
    }
}
