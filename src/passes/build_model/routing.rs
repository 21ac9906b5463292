use std::net::Ipv4Addr;

use super::util::{parse_area, parse_asn, TokenCursor};
use super::{ConfigurationBuilder, ContextFrame};
use crate::diagnostic::{Diagnostic, DiagnosticBuilder};
use crate::structures::model::interface::canonicalize_name;
use crate::structures::model::net::{IpWildcard, Prefix};
use crate::structures::model::routing::{
    BgpProcess, NextHop, OspfNetwork, OspfProcess, StaticRoute, DEFAULT_STATIC_ROUTE_DISTANCE,
};
use crate::structures::model::{DefinitionKind, PendingReference};
use crate::structures::tree::ParseNode;

impl ConfigurationBuilder {
    pub(super) fn enter_router_bgp(&mut self, node: &ParseNode) {
        self.push_frame(ContextFrame::Bgp);
        let mut cursor = TokenCursor::new("router bgp", node);
        let asn = match cursor.expect("an autonomous-system number") {
            Ok(token) => match parse_asn(token.text()).filter(|asn| *asn != 0) {
                Some(asn) => asn,
                None => {
                    self.model
                        .add_diagnostic(cursor.malformed("an autonomous-system number"));
                    return;
                }
            },
            Err(d) => {
                self.model.add_diagnostic(d);
                return;
            }
        };
        match self.model.bgp() {
            None => self.model.set_bgp(BgpProcess::new(asn, node.span())),
            Some(existing) if existing.asn == asn => {}
            Some(existing) => {
                let d = DiagnosticBuilder::new(node.span()).build_redefinition(
                    "BGP process",
                    &asn.to_string(),
                    existing.span,
                );
                self.model.add_diagnostic(d);
                self.model.set_bgp(BgpProcess::new(asn, node.span()));
            }
        }
    }

    pub(super) fn exit_router_bgp(&mut self) {
        if !matches!(self.pop_frame("router bgp"), ContextFrame::Bgp) {
            panic!("ICE: context stack out of balance at `router bgp` exit");
        }
    }

    pub(super) fn exit_router_ospf(&mut self) {
        if !matches!(self.pop_frame("router ospf"), ContextFrame::Ospf) {
            panic!("ICE: context stack out of balance at `router ospf` exit");
        }
    }

    fn assert_bgp_context(&self, line: &'static str) {
        if !matches!(self.context.last(), Some(ContextFrame::Bgp)) {
            panic!("ICE: `{line}` line outside a `router bgp` stanza");
        }
    }

    pub(super) fn exit_bgp_router_id(&mut self, node: &ParseNode) -> Result<(), Diagnostic> {
        self.assert_bgp_context("bgp router-id");
        let mut cursor = TokenCursor::new("bgp router-id", node);
        let (id, _) = cursor.expect_ip("a router id")?;
        if let Some(process) = self.model.bgp_opt_mut() {
            process.router_id = Some(id);
        }
        Ok(())
    }

    pub(super) fn exit_bgp_network(&mut self, node: &ParseNode) -> Result<(), Diagnostic> {
        self.assert_bgp_context("network");
        let mut cursor = TokenCursor::new("network", node);
        let (address, _) = cursor.expect_ip("a network address")?;
        let prefix = if cursor.eat("mask") {
            let (mask, _) = cursor.expect_ip("a netmask")?;
            Prefix::from_address_mask(address, mask)
                .ok_or_else(|| cursor.malformed("a contiguous netmask"))?
        } else {
            Prefix::classful(address)
        };
        if let Some(process) = self.model.bgp_opt_mut() {
            process.networks.push(prefix);
        }
        Ok(())
    }

    pub(super) fn exit_bgp_neighbor_remote_as(
        &mut self,
        node: &ParseNode,
    ) -> Result<(), Diagnostic> {
        self.assert_bgp_context("neighbor remote-as");
        let mut cursor = TokenCursor::new("neighbor remote-as", node);
        let (address, addr_span) = cursor.expect_ip("a neighbor address")?;
        let token = cursor.expect("an autonomous-system number")?;
        let asn = parse_asn(token.text())
            .filter(|asn| *asn != 0)
            .ok_or_else(|| cursor.malformed("an autonomous-system number"))?;
        if let Some(process) = self.model.bgp_opt_mut() {
            process.neighbor_mut(address, addr_span).remote_as = Some(asn);
        }
        Ok(())
    }

    pub(super) fn exit_bgp_neighbor_description(
        &mut self,
        node: &ParseNode,
    ) -> Result<(), Diagnostic> {
        self.assert_bgp_context("neighbor description");
        let mut cursor = TokenCursor::new("neighbor description", node);
        let (address, addr_span) = cursor.expect_ip("a neighbor address")?;
        let text = cursor.rest_text();
        if let Some(process) = self.model.bgp_opt_mut() {
            process.neighbor_mut(address, addr_span).description = Some(text);
        }
        Ok(())
    }

    pub(super) fn exit_bgp_neighbor_update_source(
        &mut self,
        node: &ParseNode,
    ) -> Result<(), Diagnostic> {
        self.assert_bgp_context("neighbor update-source");
        let mut cursor = TokenCursor::new("neighbor update-source", node);
        let (address, addr_span) = cursor.expect_ip("a neighbor address")?;
        let name = canonicalize_name(cursor.expect("an interface name")?.text());
        if let Some(process) = self.model.bgp_opt_mut() {
            process.neighbor_mut(address, addr_span).update_source = Some(name.clone());
        }
        self.model.defer_reference(PendingReference {
            kind: DefinitionKind::Interface,
            name,
            span: node.span(),
            context: format!("neighbor `{address}` update-source"),
            required: false,
        });
        Ok(())
    }

    pub(super) fn exit_bgp_neighbor_route_map(
        &mut self,
        node: &ParseNode,
    ) -> Result<(), Diagnostic> {
        self.assert_bgp_context("neighbor route-map");
        let mut cursor = TokenCursor::new("neighbor route-map", node);
        let (address, addr_span) = cursor.expect_ip("a neighbor address")?;
        let name = cursor.expect("a route-map name")?.text().to_owned();
        let direction = cursor.expect("`in` or `out`")?;
        let incoming = match direction.text().to_ascii_lowercase().as_str() {
            "in" => true,
            "out" => false,
            _ => return Err(cursor.malformed("`in` or `out`")),
        };
        if let Some(process) = self.model.bgp_opt_mut() {
            let neighbor = process.neighbor_mut(address, addr_span);
            if incoming {
                neighbor.route_map_in = Some(name.clone());
            } else {
                neighbor.route_map_out = Some(name.clone());
            }
        }
        self.model.defer_reference(PendingReference {
            kind: DefinitionKind::RouteMap,
            name,
            span: node.span(),
            context: format!("neighbor `{address}` route-map"),
            required: true,
        });
        Ok(())
    }

    pub(super) fn exit_bgp_neighbor_shutdown(
        &mut self,
        node: &ParseNode,
    ) -> Result<(), Diagnostic> {
        self.assert_bgp_context("neighbor shutdown");
        let mut cursor = TokenCursor::new("neighbor shutdown", node);
        let (address, addr_span) = cursor.expect_ip("a neighbor address")?;
        if let Some(process) = self.model.bgp_opt_mut() {
            process.neighbor_mut(address, addr_span).shutdown = true;
        }
        Ok(())
    }

    pub(super) fn enter_router_ospf(&mut self, node: &ParseNode) {
        self.push_frame(ContextFrame::Ospf);
        let mut cursor = TokenCursor::new("router ospf", node);
        let process_id = match cursor.expect_int_in("a process id", 1, 65535) {
            Ok((pid, _)) => pid as u32,
            Err(d) => {
                self.model.add_diagnostic(d);
                return;
            }
        };
        match self.model.ospf() {
            None => self
                .model
                .set_ospf(OspfProcess::new(process_id, node.span())),
            Some(existing) if existing.process_id == process_id => {}
            Some(existing) => {
                let d = DiagnosticBuilder::new(node.span()).build_redefinition(
                    "OSPF process",
                    &process_id.to_string(),
                    existing.span,
                );
                self.model.add_diagnostic(d);
                self.model
                    .set_ospf(OspfProcess::new(process_id, node.span()));
            }
        }
    }

    fn assert_ospf_context(&self, line: &'static str) {
        if !matches!(self.context.last(), Some(ContextFrame::Ospf)) {
            panic!("ICE: `{line}` line outside a `router ospf` stanza");
        }
    }

    pub(super) fn exit_ospf_router_id(&mut self, node: &ParseNode) -> Result<(), Diagnostic> {
        self.assert_ospf_context("router-id");
        let mut cursor = TokenCursor::new("router-id", node);
        let (id, _) = cursor.expect_ip("a router id")?;
        if let Some(process) = self.model.ospf_opt_mut() {
            process.router_id = Some(id);
        }
        Ok(())
    }

    pub(super) fn exit_ospf_network(&mut self, node: &ParseNode) -> Result<(), Diagnostic> {
        self.assert_ospf_context("network");
        let mut cursor = TokenCursor::new("network", node);
        let (address, _) = cursor.expect_ip("a network address")?;
        let (wildcard, _) = cursor.expect_ip("a wildcard")?;
        let area_token = cursor.expect("an area")?;
        let area =
            parse_area(area_token.text()).ok_or_else(|| cursor.malformed("an area"))?;
        if let Some(process) = self.model.ospf_opt_mut() {
            process.networks.push(OspfNetwork {
                network: IpWildcard::new(address, wildcard),
                area,
            });
        }
        Ok(())
    }

    pub(super) fn exit_ospf_passive_interface(
        &mut self,
        node: &ParseNode,
    ) -> Result<(), Diagnostic> {
        self.assert_ospf_context("passive-interface");
        let mut cursor = TokenCursor::new("passive-interface", node);
        let name = canonicalize_name(cursor.expect("an interface name")?.text());
        if let Some(process) = self.model.ospf_opt_mut() {
            process.passive_interfaces.insert(name.clone());
        }
        self.model.defer_reference(PendingReference {
            kind: DefinitionKind::Interface,
            name,
            span: node.span(),
            context: "router ospf passive-interface".to_owned(),
            required: false,
        });
        Ok(())
    }

    pub(super) fn exit_ip_route(&mut self, node: &ParseNode) -> Result<(), Diagnostic> {
        let mut cursor = TokenCursor::new("ip route", node);
        let vrf = if cursor.eat("vrf") {
            Some(cursor.expect("a vrf name")?.text().to_owned())
        } else {
            None
        };
        let (address, _) = cursor.expect_ip("a destination network")?;
        let (mask, _) = cursor.expect_ip("a netmask")?;
        let prefix = Prefix::from_address_mask(address, mask)
            .ok_or_else(|| cursor.malformed("a contiguous netmask"))?;
        let hop = cursor.expect("a next hop")?;
        let next_hop = match hop.text().parse::<Ipv4Addr>() {
            Ok(ip) => NextHop::Address(ip),
            Err(_) => {
                let name = canonicalize_name(hop.text());
                self.model.defer_reference(PendingReference {
                    kind: DefinitionKind::Interface,
                    name: name.clone(),
                    span: hop.span(),
                    context: format!("ip route {prefix}"),
                    required: false,
                });
                NextHop::Interface(name)
            }
        };
        let distance = if cursor.at_end() {
            DEFAULT_STATIC_ROUTE_DISTANCE
        } else {
            cursor.expect_int_in("an administrative distance", 1, 255)?.0 as u8
        };
        self.model.add_static_route(StaticRoute {
            prefix,
            next_hop,
            distance,
            vrf,
            span: node.span(),
        });
        Ok(())
    }
}
