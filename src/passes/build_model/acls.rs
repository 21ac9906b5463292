use super::util::TokenCursor;
use super::{ConfigurationBuilder, ContextFrame};
use crate::diagnostic::Diagnostic;
use crate::structures::model::acl::{
    AddressSpec, ExtendedAclLine, ObjectGroup, ObjectGroupMember, PortSpec, Protocol,
    StandardAclLine,
};
use crate::structures::model::net::IpWildcard;
use crate::structures::model::{Definition, DefinitionKind, PendingReference};
use crate::structures::tree::{ParseNode, Rule};

/// `any`, `host <ip>`, `object-group <name>`, or address-plus-wildcard.
/// Standard ACL lines allow a bare address meaning host; extended lines
/// require the wildcard.
fn parse_address_spec(
    cursor: &mut TokenCursor<'_>,
    wildcard_required: bool,
) -> Result<AddressSpec, Diagnostic> {
    if cursor.eat("any") {
        return Ok(AddressSpec::Any);
    }
    if cursor.eat("host") {
        let (ip, _) = cursor.expect_ip("a host address")?;
        return Ok(AddressSpec::Host(ip));
    }
    if cursor.eat("object-group") {
        let name = cursor.expect("an object-group name")?;
        return Ok(AddressSpec::ObjectGroup(name.text().to_owned()));
    }
    let (address, _) = cursor.expect_ip("an address")?;
    if wildcard_required {
        let (wildcard, _) = cursor.expect_ip("a wildcard")?;
        return Ok(AddressSpec::Wildcard(IpWildcard::new(address, wildcard)));
    }
    match cursor.peek().and_then(|t| t.text().parse().ok()) {
        Some(wildcard) => {
            cursor.advance();
            Ok(AddressSpec::Wildcard(IpWildcard::new(address, wildcard)))
        }
        None => Ok(AddressSpec::Host(address)),
    }
}

fn parse_port_spec(cursor: &mut TokenCursor<'_>) -> Result<PortSpec, Diagnostic> {
    let spec = if cursor.eat("eq") {
        PortSpec::Eq(cursor.expect_int_in("a port", 0, 65535)?.0 as u16)
    } else if cursor.eat("gt") {
        PortSpec::Gt(cursor.expect_int_in("a port", 0, 65535)?.0 as u16)
    } else if cursor.eat("lt") {
        PortSpec::Lt(cursor.expect_int_in("a port", 0, 65535)?.0 as u16)
    } else if cursor.eat("range") {
        let (low, _) = cursor.expect_int_in("a port", 0, 65535)?;
        let (high, _) = cursor.expect_int_in("a port", 0, 65535)?;
        if high < low {
            return Err(cursor.malformed("an ascending port range"));
        }
        PortSpec::Range(low as u16, high as u16)
    } else {
        PortSpec::Any
    };
    Ok(spec)
}

impl ConfigurationBuilder {
    fn acl_header_name(&mut self, stanza: &'static str, node: &ParseNode) -> String {
        let mut cursor = TokenCursor::new(stanza, node);
        match cursor.expect("an access-list name") {
            Ok(t) => t.text().to_owned(),
            Err(d) => {
                self.model.add_diagnostic(d);
                // Sentinel so the matching exit still pops.
                String::new()
            }
        }
    }

    pub(super) fn enter_standard_acl(&mut self, node: &ParseNode) {
        let name = self.acl_header_name("ip access-list standard", node);
        if !name.is_empty() {
            self.model.standard_acl_mut(&name, node.span());
        }
        self.push_frame(ContextFrame::StandardAcl { name });
    }

    pub(super) fn enter_extended_acl(&mut self, node: &ParseNode) {
        let name = self.acl_header_name("ip access-list extended", node);
        if !name.is_empty() {
            self.model.extended_acl_mut(&name, node.span());
        }
        self.push_frame(ContextFrame::ExtendedAcl { name });
    }

    pub(super) fn exit_acl(&mut self, rule: Rule) {
        let frame = self.pop_frame("ip access-list");
        let balanced = matches!(
            (&frame, rule),
            (ContextFrame::StandardAcl { .. }, Rule::StandardAcl)
                | (ContextFrame::ExtendedAcl { .. }, Rule::ExtendedAcl)
        );
        if !balanced {
            panic!("ICE: context stack out of balance at `ip access-list` exit");
        }
    }

    fn defer_object_group_refs(&mut self, spec: &AddressSpec, node: &ParseNode, acl: &str) {
        if let AddressSpec::ObjectGroup(group) = spec {
            self.model.defer_reference(PendingReference {
                kind: DefinitionKind::ObjectGroup,
                name: group.clone(),
                span: node.span(),
                context: format!("access-list `{acl}`"),
                required: true,
            });
        }
    }

    pub(super) fn exit_standard_acl_line(&mut self, node: &ParseNode) -> Result<(), Diagnostic> {
        let name = match self.context.last() {
            Some(ContextFrame::StandardAcl { name }) => name.clone(),
            _ => panic!("ICE: access-list line outside an `ip access-list standard` stanza"),
        };
        if name.is_empty() {
            return Ok(());
        }
        let mut cursor = TokenCursor::new("access-list line", node);
        let action = cursor.expect_action()?;
        let source = parse_address_spec(&mut cursor, false)?;
        self.defer_object_group_refs(&source, node, &name);
        self.model
            .standard_acl_mut(&name, node.span())
            .lines
            .push(StandardAclLine {
                action,
                source,
                span: node.span(),
            });
        Ok(())
    }

    pub(super) fn exit_extended_acl_line(&mut self, node: &ParseNode) -> Result<(), Diagnostic> {
        let name = match self.context.last() {
            Some(ContextFrame::ExtendedAcl { name }) => name.clone(),
            _ => panic!("ICE: access-list line outside an `ip access-list extended` stanza"),
        };
        if name.is_empty() {
            return Ok(());
        }
        let mut cursor = TokenCursor::new("access-list line", node);
        let action = cursor.expect_action()?;
        let protocol_token = cursor.expect("a protocol")?;
        let protocol = Protocol::parse(protocol_token.text())
            .ok_or_else(|| cursor.malformed("a protocol"))?;
        let source = parse_address_spec(&mut cursor, true)?;
        let source_ports = parse_port_spec(&mut cursor)?;
        let destination = parse_address_spec(&mut cursor, true)?;
        let destination_ports = parse_port_spec(&mut cursor)?;
        let mut established = false;
        let mut log = false;
        while !cursor.at_end() {
            if cursor.eat("established") {
                established = true;
            } else if cursor.eat("log") {
                log = true;
            } else {
                return Err(cursor.malformed("`established` or `log`"));
            }
        }
        self.defer_object_group_refs(&source, node, &name);
        self.defer_object_group_refs(&destination, node, &name);
        self.model
            .extended_acl_mut(&name, node.span())
            .lines
            .push(ExtendedAclLine {
                action,
                protocol,
                source,
                source_ports,
                destination,
                destination_ports,
                established,
                log,
                span: node.span(),
            });
        Ok(())
    }

    pub(super) fn exit_acl_remark(&mut self, node: &ParseNode) -> Result<(), Diagnostic> {
        let mut cursor = TokenCursor::new("remark", node);
        let text = cursor.rest_text();
        match self.context.last() {
            Some(ContextFrame::StandardAcl { name }) => {
                let name = name.clone();
                if !name.is_empty() {
                    self.model
                        .standard_acl_mut(&name, node.span())
                        .remarks
                        .push(text);
                }
            }
            Some(ContextFrame::ExtendedAcl { name }) => {
                let name = name.clone();
                if !name.is_empty() {
                    self.model
                        .extended_acl_mut(&name, node.span())
                        .remarks
                        .push(text);
                }
            }
            _ => panic!("ICE: `remark` line outside an `ip access-list` stanza"),
        }
        Ok(())
    }

    pub(super) fn enter_object_group(&mut self, node: &ParseNode) {
        let mut cursor = TokenCursor::new("object-group network", node);
        let group = match cursor.expect("an object-group name") {
            Ok(t) => ObjectGroup::new(t.text(), node.span()),
            Err(d) => {
                self.model.add_diagnostic(d);
                ObjectGroup::new("", node.span())
            }
        };
        self.push_frame(ContextFrame::ObjectGroup(group));
    }

    pub(super) fn exit_object_group(&mut self) {
        match self.pop_frame("object-group") {
            ContextFrame::ObjectGroup(group) => {
                if !group.name.is_empty() {
                    self.model.define(Definition::ObjectGroup(group));
                }
            }
            _ => panic!("ICE: context stack out of balance at `object-group` exit"),
        }
    }

    fn current_object_group(&mut self) -> &mut ObjectGroup {
        match self.context.last_mut() {
            Some(ContextFrame::ObjectGroup(group)) => group,
            _ => panic!("ICE: member line outside an `object-group` stanza"),
        }
    }

    pub(super) fn exit_network_object(&mut self, node: &ParseNode) -> Result<(), Diagnostic> {
        let mut cursor = TokenCursor::new("network-object", node);
        let member = if cursor.eat("host") {
            ObjectGroupMember::Host(cursor.expect_ip("a host address")?.0)
        } else {
            let (address, _) = cursor.expect_ip("an address")?;
            let (mask, _) = cursor.expect_ip("a netmask")?;
            ObjectGroupMember::Network(address, mask)
        };
        self.current_object_group().members.push(member);
        Ok(())
    }

    pub(super) fn exit_group_object(&mut self, node: &ParseNode) -> Result<(), Diagnostic> {
        let mut cursor = TokenCursor::new("group-object", node);
        let name = cursor.expect("an object-group name")?.text().to_owned();
        let group = self.current_object_group();
        let context = format!("object-group `{}`", group.name);
        group.members.push(ObjectGroupMember::Group(name.clone()));
        self.model.defer_reference(PendingReference {
            kind: DefinitionKind::ObjectGroup,
            name,
            span: node.span(),
            context,
            required: true,
        });
        Ok(())
    }
}
