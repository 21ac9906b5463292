mod acls;
mod interfaces;
mod route_maps;
mod routing;
mod system;
mod util;

use crate::diagnostic::DiagnosticBuilder;
use crate::extract::ExtractOpts;
use crate::passes::walk::{walk, ParseTreeListener};
use crate::settings::Dialect;
use crate::structures::model::acl::ObjectGroup;
use crate::structures::model::interface::Interface;
use crate::structures::model::route_map::RouteMapClause;
use crate::structures::model::{ConfigurationModel, Vlan};
use crate::structures::tree::{ParseNode, Rule, Token};

/// Walks a parse tree and accumulates the configuration model.
///
/// Cross-references noted along the way stay deferred; the caller runs
/// [`ConfigurationModel::resolve_pending`] once the walk is done.
pub fn build_model(tree: &ParseNode, opts: &ExtractOpts) -> ConfigurationModel {
    let mut builder = ConfigurationBuilder::new(opts);
    walk(tree, &mut builder);
    builder.finish()
}

/// One entry of the context stack: the enclosing stanza a body line belongs
/// to. Pushed by the stanza's `enter`, popped and committed by its `exit`.
enum ContextFrame {
    /// All interfaces named by the stanza header; ranges expand to several.
    Interfaces(Vec<Interface>),
    /// Lines accumulate straight into the model's ACL of this name.
    StandardAcl { name: String },
    ExtendedAcl { name: String },
    ObjectGroup(ObjectGroup),
    /// Clause under construction; merged into the named map at exit.
    RouteMapClause {
        map: String,
        clause: RouteMapClause,
    },
    Bgp,
    Ospf,
    Vlan(Vlan),
}

impl ContextFrame {
    fn describe(&self) -> &'static str {
        match self {
            ContextFrame::Interfaces(_) => "interface",
            ContextFrame::StandardAcl { .. } => "ip access-list standard",
            ContextFrame::ExtendedAcl { .. } => "ip access-list extended",
            ContextFrame::ObjectGroup(_) => "object-group",
            ContextFrame::RouteMapClause { .. } => "route-map",
            ContextFrame::Bgp => "router bgp",
            ContextFrame::Ospf => "router ospf",
            ContextFrame::Vlan(_) => "vlan",
        }
    }
}

pub struct ConfigurationBuilder {
    model: ConfigurationModel,
    context: Vec<ContextFrame>,
    dialect: Dialect,
    note_ignored: bool,
}

impl ConfigurationBuilder {
    pub fn new(opts: &ExtractOpts) -> Self {
        Self {
            model: ConfigurationModel::new(opts.dialect()),
            context: Vec::new(),
            dialect: opts.dialect(),
            note_ignored: opts.note_ignored_stanzas(),
        }
    }

    /// Hands the accumulated model back. Panics if any context frame is
    /// still open: a walked tree always balances enters and exits, so a
    /// leftover frame is a listener bug, not bad input.
    pub fn finish(self) -> ConfigurationModel {
        if let Some(frame) = self.context.last() {
            panic!(
                "ICE: `{}` context frame still open after walk",
                frame.describe()
            );
        }
        self.model
    }

    fn push_frame(&mut self, frame: ContextFrame) {
        self.context.push(frame);
    }

    fn pop_frame(&mut self, stanza: &'static str) -> ContextFrame {
        self.context
            .pop()
            .unwrap_or_else(|| panic!("ICE: exiting `{stanza}` stanza with no open context frame"))
    }

    fn exit_null(&mut self, node: &ParseNode) {
        if !self.note_ignored {
            return;
        }
        let keyword = node.first_token().map_or("?", Token::text);
        let d = DiagnosticBuilder::new(node.span()).build_ignored_stanza(keyword);
        self.model.add_diagnostic(d);
    }
}

impl ParseTreeListener for ConfigurationBuilder {
    fn enter(&mut self, node: &ParseNode) {
        match node.rule() {
            Rule::Interface => self.enter_interface(node),
            Rule::Vlan => self.enter_vlan(node),
            Rule::StandardAcl => self.enter_standard_acl(node),
            Rule::ExtendedAcl => self.enter_extended_acl(node),
            Rule::ObjectGroupNetwork => self.enter_object_group(node),
            Rule::RouteMapClause => self.enter_route_map_clause(node),
            Rule::RouterBgp => self.enter_router_bgp(node),
            Rule::RouterOspf => self.enter_router_ospf(node),
            _ => {}
        }
    }

    fn exit(&mut self, node: &ParseNode) {
        // Composite stanzas commit their frame; line rules extract a single
        // fact. A line's shape problem becomes a diagnostic here and the
        // walk moves on.
        let result = match node.rule() {
            Rule::Interface => {
                self.exit_interface();
                Ok(())
            }
            Rule::Vlan => {
                self.exit_vlan();
                Ok(())
            }
            Rule::StandardAcl | Rule::ExtendedAcl => {
                self.exit_acl(node.rule());
                Ok(())
            }
            Rule::ObjectGroupNetwork => {
                self.exit_object_group();
                Ok(())
            }
            Rule::RouteMapClause => {
                self.exit_route_map_clause();
                Ok(())
            }
            Rule::RouterBgp => {
                self.exit_router_bgp();
                Ok(())
            }
            Rule::RouterOspf => {
                self.exit_router_ospf();
                Ok(())
            }

            Rule::Hostname => self.exit_hostname(node),
            Rule::VlanName => self.exit_vlan_name(node),

            Rule::IfDescription => self.exit_if_description(node),
            Rule::IfIpAddress => self.exit_if_ip_address(node),
            Rule::IfShutdown => self.exit_if_shutdown(true),
            Rule::IfNoShutdown => self.exit_if_shutdown(false),
            Rule::IfBandwidth => self.exit_if_bandwidth(node),
            Rule::IfMtu => self.exit_if_mtu(node),
            Rule::IfVrfForwarding => self.exit_if_vrf_forwarding(node),
            Rule::IfIpAccessGroup => self.exit_if_ip_access_group(node),
            Rule::IfSwitchportAccessVlan => self.exit_if_switchport_access_vlan(node),

            Rule::StandardAclLine => self.exit_standard_acl_line(node),
            Rule::ExtendedAclLine => self.exit_extended_acl_line(node),
            Rule::AclRemark => self.exit_acl_remark(node),
            Rule::NetworkObject => self.exit_network_object(node),
            Rule::GroupObject => self.exit_group_object(node),
            Rule::PrefixListLine => self.exit_prefix_list_line(node),

            Rule::RmMatchIpAccessList => self.exit_rm_match_ip_access_list(node),
            Rule::RmMatchIpPrefixList => self.exit_rm_match_ip_prefix_list(node),
            Rule::RmSetMetric => self.exit_rm_set_metric(node),
            Rule::RmSetLocalPreference => self.exit_rm_set_local_preference(node),
            Rule::RmSetCommunity => self.exit_rm_set_community(node),

            Rule::BgpRouterId => self.exit_bgp_router_id(node),
            Rule::BgpNetwork => self.exit_bgp_network(node),
            Rule::BgpNeighborRemoteAs => self.exit_bgp_neighbor_remote_as(node),
            Rule::BgpNeighborDescription => self.exit_bgp_neighbor_description(node),
            Rule::BgpNeighborUpdateSource => self.exit_bgp_neighbor_update_source(node),
            Rule::BgpNeighborRouteMap => self.exit_bgp_neighbor_route_map(node),
            Rule::BgpNeighborShutdown => self.exit_bgp_neighbor_shutdown(node),

            Rule::OspfRouterId => self.exit_ospf_router_id(node),
            Rule::OspfNetwork => self.exit_ospf_network(node),
            Rule::OspfPassiveInterface => self.exit_ospf_passive_interface(node),

            Rule::IpRoute => self.exit_ip_route(node),
            Rule::NtpServer => self.exit_ntp_server(node),
            Rule::LoggingHost => self.exit_logging_host(node),
            Rule::SnmpCommunity => self.exit_snmp_community(node),

            Rule::Null => {
                self.exit_null(node);
                Ok(())
            }
            Rule::Configuration => Ok(()),
        };

        if let Err(d) = result {
            self.model.add_diagnostic(d);
        }
    }

    fn visit_error_node(&mut self, token: &Token) {
        let d = DiagnosticBuilder::new(token.span()).build_syntax_error(token.text());
        self.model.add_diagnostic(d);
    }
}
