use super::util::TokenCursor;
use super::ConfigurationBuilder;
use crate::diagnostic::{Diagnostic, DiagnosticBuilder};
use crate::structures::model::{DefinitionKind, PendingReference, SnmpAccess, SnmpCommunity};
use crate::structures::tree::ParseNode;

impl ConfigurationBuilder {
    pub(super) fn exit_hostname(&mut self, node: &ParseNode) -> Result<(), Diagnostic> {
        let mut cursor = TokenCursor::new("hostname", node);
        let name = cursor.expect("a hostname")?.text().to_owned();
        self.model.set_hostname(name);
        Ok(())
    }

    pub(super) fn exit_ntp_server(&mut self, node: &ParseNode) -> Result<(), Diagnostic> {
        let mut cursor = TokenCursor::new("ntp server", node);
        let host = cursor.expect("a host")?.text().to_owned();
        self.model.add_ntp_server(host);
        Ok(())
    }

    pub(super) fn exit_logging_host(&mut self, node: &ParseNode) -> Result<(), Diagnostic> {
        let mut cursor = TokenCursor::new("logging", node);
        let explicit = cursor.eat("host");
        let host = cursor.expect("a host")?.text().to_owned();
        if !explicit {
            let d = DiagnosticBuilder::new(node.span())
                .build_deprecated_form("logging <host>", "logging host <host>");
            self.model.add_diagnostic(d);
        }
        self.model.add_logging_host(host);
        Ok(())
    }

    pub(super) fn exit_snmp_community(&mut self, node: &ParseNode) -> Result<(), Diagnostic> {
        let mut cursor = TokenCursor::new("snmp-server community", node);
        let name = cursor.expect("a community name")?.text().to_owned();
        let access = if cursor.eat("rw") {
            SnmpAccess::ReadWrite
        } else {
            cursor.eat("ro");
            SnmpAccess::ReadOnly
        };
        let acl = cursor.advance().map(|t| t.text().to_owned());
        if let Some(acl) = &acl {
            self.model.defer_reference(PendingReference {
                kind: DefinitionKind::AccessList,
                name: acl.clone(),
                span: node.span(),
                context: format!("snmp-server community `{name}`"),
                required: true,
            });
        }
        self.model.add_snmp_community(SnmpCommunity {
            name,
            access,
            acl,
            span: node.span(),
        });
        Ok(())
    }
}
