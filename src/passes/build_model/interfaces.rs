use super::util::TokenCursor;
use super::{ConfigurationBuilder, ContextFrame};
use crate::diagnostic::Diagnostic;
use crate::structures::model::interface::{
    canonicalize_name, is_management, Interface, InterfaceAddress,
};
use crate::structures::model::{Definition, DefinitionKind, PendingReference, Vlan};
use crate::structures::tree::ParseNode;

/// Expands the stanza header to the member names it declares: a single
/// canonicalized name, or `name - N` covering the trailing unit numbers.
fn interface_member_names(node: &ParseNode) -> Result<Vec<String>, Diagnostic> {
    let mut cursor = TokenCursor::new("interface", node);
    let first = cursor.expect("an interface name")?;
    let canonical = canonicalize_name(first.text());
    if !cursor.eat("-") {
        if !cursor.at_end() {
            return Err(cursor.malformed("nothing after the interface name"));
        }
        return Ok(vec![canonical]);
    }
    let (end, _) = cursor.expect_int_in("a range end", 0, 4096)?;
    let unit_at = canonical
        .rfind(|c: char| !c.is_ascii_digit())
        .map_or(0, |i| i + 1);
    let (prefix, unit) = canonical.split_at(unit_at);
    let start: u64 = unit
        .parse()
        .map_err(|_| cursor.malformed("a numbered interface before `-`"))?;
    if end < start {
        return Err(cursor.malformed("an ascending interface range"));
    }
    Ok((start..=end).map(|i| format!("{prefix}{i}")).collect())
}

impl ConfigurationBuilder {
    pub(super) fn enter_interface(&mut self, node: &ParseNode) {
        let names = match interface_member_names(node) {
            Ok(names) => names,
            Err(d) => {
                self.model.add_diagnostic(d);
                Vec::new()
            }
        };
        let members = names
            .into_iter()
            .map(|name| {
                let vrf = if is_management(&name) {
                    self.dialect.management_vrf()
                } else {
                    self.dialect.default_vrf()
                };
                Interface::new(name, node.span(), vrf)
            })
            .collect();
        self.push_frame(ContextFrame::Interfaces(members));
    }

    pub(super) fn exit_interface(&mut self) {
        match self.pop_frame("interface") {
            ContextFrame::Interfaces(members) => {
                for iface in members {
                    self.model.define(Definition::Interface(iface));
                }
            }
            _ => panic!("ICE: context stack out of balance at `interface` exit"),
        }
    }

    fn current_interfaces(&mut self) -> &mut Vec<Interface> {
        match self.context.last_mut() {
            Some(ContextFrame::Interfaces(members)) => members,
            _ => panic!("ICE: interface body line outside an `interface` stanza"),
        }
    }

    /// Name quoted in diagnostics about the enclosing stanza; ranges are
    /// attributed to their first member.
    fn current_interface_name(&mut self) -> String {
        self.current_interfaces()
            .first()
            .map_or_else(|| "?".to_owned(), |i| i.name.clone())
    }

    pub(super) fn exit_if_description(&mut self, node: &ParseNode) -> Result<(), Diagnostic> {
        let mut cursor = TokenCursor::new("description", node);
        let text = cursor.rest_text();
        for iface in self.current_interfaces() {
            iface.description = Some(text.clone());
        }
        Ok(())
    }

    pub(super) fn exit_if_ip_address(&mut self, node: &ParseNode) -> Result<(), Diagnostic> {
        let mut cursor = TokenCursor::new("ip address", node);
        let (address, _) = cursor.expect_ip("an address")?;
        let (mask, _) = cursor.expect_ip("a netmask")?;
        let secondary = cursor.eat("secondary");
        for iface in self.current_interfaces() {
            iface.addresses.push(InterfaceAddress {
                address,
                mask,
                secondary,
            });
        }
        Ok(())
    }

    pub(super) fn exit_if_shutdown(&mut self, shutdown: bool) -> Result<(), Diagnostic> {
        for iface in self.current_interfaces() {
            iface.shutdown = shutdown;
        }
        Ok(())
    }

    pub(super) fn exit_if_bandwidth(&mut self, node: &ParseNode) -> Result<(), Diagnostic> {
        let mut cursor = TokenCursor::new("bandwidth", node);
        // The line's operand is in kilobits per second.
        let (kbps, _) = cursor.expect_int_in("a bandwidth in kbit/s", 1, 10_000_000)?;
        for iface in self.current_interfaces() {
            iface.bandwidth = kbps * 1000;
        }
        Ok(())
    }

    pub(super) fn exit_if_mtu(&mut self, node: &ParseNode) -> Result<(), Diagnostic> {
        let mut cursor = TokenCursor::new("mtu", node);
        let (mtu, _) = cursor.expect_int_in("an mtu", 64, 9216)?;
        for iface in self.current_interfaces() {
            iface.mtu = mtu as u32;
        }
        Ok(())
    }

    pub(super) fn exit_if_vrf_forwarding(&mut self, node: &ParseNode) -> Result<(), Diagnostic> {
        let mut cursor = TokenCursor::new("vrf forwarding", node);
        let vrf = cursor.expect("a vrf name")?.text().to_owned();
        for iface in self.current_interfaces() {
            iface.vrf = vrf.clone();
        }
        Ok(())
    }

    pub(super) fn exit_if_ip_access_group(&mut self, node: &ParseNode) -> Result<(), Diagnostic> {
        let mut cursor = TokenCursor::new("ip access-group", node);
        let acl = cursor.expect("an access-list name")?.text().to_owned();
        let direction = cursor.expect("`in` or `out`")?;
        let incoming = match direction.text().to_ascii_lowercase().as_str() {
            "in" => true,
            "out" => false,
            _ => return Err(cursor.malformed("`in` or `out`")),
        };
        let iface_name = self.current_interface_name();
        for iface in self.current_interfaces() {
            let slot = if incoming {
                &mut iface.incoming_access_group
            } else {
                &mut iface.outgoing_access_group
            };
            *slot = Some(acl.clone());
        }
        self.model.defer_reference(PendingReference {
            kind: DefinitionKind::AccessList,
            name: acl,
            span: node.span(),
            context: format!("interface `{iface_name}` ip access-group"),
            required: true,
        });
        Ok(())
    }

    pub(super) fn exit_if_switchport_access_vlan(
        &mut self,
        node: &ParseNode,
    ) -> Result<(), Diagnostic> {
        let mut cursor = TokenCursor::new("switchport access vlan", node);
        let (id, id_span) = cursor.expect_int_in("a vlan id", 1, 4094)?;
        for iface in self.current_interfaces() {
            iface.access_vlan = Some(id as u16);
        }
        let iface_name = self.current_interface_name();
        self.model.defer_reference(PendingReference {
            kind: DefinitionKind::Vlan,
            name: id.to_string(),
            span: id_span,
            context: format!("interface `{iface_name}` switchport access vlan"),
            required: false,
        });
        Ok(())
    }

    pub(super) fn enter_vlan(&mut self, node: &ParseNode) {
        let mut cursor = TokenCursor::new("vlan", node);
        let vlan = match cursor.expect_int_in("a vlan id", 1, 4094) {
            Ok((id, _)) => Vlan {
                id: id as u16,
                name: None,
                span: node.span(),
            },
            Err(d) => {
                self.model.add_diagnostic(d);
                // Sentinel frame so the matching exit still pops; never
                // committed.
                Vlan {
                    id: 0,
                    name: None,
                    span: node.span(),
                }
            }
        };
        self.push_frame(ContextFrame::Vlan(vlan));
    }

    pub(super) fn exit_vlan(&mut self) {
        match self.pop_frame("vlan") {
            ContextFrame::Vlan(vlan) => {
                if vlan.id != 0 {
                    self.model.define(Definition::Vlan(vlan));
                }
            }
            _ => panic!("ICE: context stack out of balance at `vlan` exit"),
        }
    }

    pub(super) fn exit_vlan_name(&mut self, node: &ParseNode) -> Result<(), Diagnostic> {
        let mut cursor = TokenCursor::new("vlan name", node);
        let name = cursor.expect("a vlan name")?.text().to_owned();
        match self.context.last_mut() {
            Some(ContextFrame::Vlan(vlan)) => {
                vlan.name = Some(name);
                Ok(())
            }
            _ => panic!("ICE: `name` line outside a `vlan` stanza"),
        }
    }
}
