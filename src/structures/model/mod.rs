pub mod acl;
pub mod interface;
pub mod net;
pub mod route_map;
pub mod routing;

use std::collections::{BTreeMap, BTreeSet};

use crate::diagnostic::{Diagnostic, DiagnosticBuilder, Severity, Span};
use crate::settings::Dialect;

use acl::{ExtendedAccessList, ObjectGroup, StandardAccessList};
use interface::Interface;
use route_map::{PrefixList, RouteMap};
use routing::{BgpProcess, OspfProcess, StaticRoute};

/// Permit/deny disposition shared by ACL lines, prefix-list lines and
/// route-map clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction {
    Permit,
    Deny,
}

impl std::fmt::Display for LineAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineAction::Permit => write!(f, "permit"),
            LineAction::Deny => write!(f, "deny"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vlan {
    pub id: u16,
    pub name: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnmpAccess {
    ReadOnly,
    ReadWrite,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnmpCommunity {
    pub name: String,
    pub access: SnmpAccess,
    /// ACL guarding the community; a cross-reference resolved after the walk.
    pub acl: Option<String>,
    pub span: Span,
}

/// The kinds of named entities the registry indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DefinitionKind {
    Interface,
    StandardAcl,
    ExtendedAcl,
    /// Query-only kind: an ACL reference is satisfied by either flavor,
    /// since the dialects use one namespace for both. Never produced by
    /// [`Definition::kind`].
    AccessList,
    ObjectGroup,
    PrefixList,
    RouteMap,
    Vlan,
}

impl DefinitionKind {
    pub fn describe(&self) -> &'static str {
        match self {
            DefinitionKind::Interface => "interface",
            DefinitionKind::StandardAcl => "standard access-list",
            DefinitionKind::ExtendedAcl => "extended access-list",
            DefinitionKind::AccessList => "access-list",
            DefinitionKind::ObjectGroup => "object-group",
            DefinitionKind::PrefixList => "prefix-list",
            DefinitionKind::RouteMap => "route-map",
            DefinitionKind::Vlan => "vlan",
        }
    }
}

/// An owned definition handed to [`ConfigurationModel::define`].
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    Interface(Interface),
    StandardAcl(StandardAccessList),
    ExtendedAcl(ExtendedAccessList),
    ObjectGroup(ObjectGroup),
    PrefixList(PrefixList),
    RouteMap(RouteMap),
    Vlan(Vlan),
}

impl Definition {
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Definition::Interface(_) => DefinitionKind::Interface,
            Definition::StandardAcl(_) => DefinitionKind::StandardAcl,
            Definition::ExtendedAcl(_) => DefinitionKind::ExtendedAcl,
            Definition::ObjectGroup(_) => DefinitionKind::ObjectGroup,
            Definition::PrefixList(_) => DefinitionKind::PrefixList,
            Definition::RouteMap(_) => DefinitionKind::RouteMap,
            Definition::Vlan(_) => DefinitionKind::Vlan,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Definition::Interface(v) => v.name.clone(),
            Definition::StandardAcl(v) => v.name.clone(),
            Definition::ExtendedAcl(v) => v.name.clone(),
            Definition::ObjectGroup(v) => v.name.clone(),
            Definition::PrefixList(v) => v.name.clone(),
            Definition::RouteMap(v) => v.name.clone(),
            Definition::Vlan(v) => v.id.to_string(),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Definition::Interface(v) => v.span,
            Definition::StandardAcl(v) => v.span,
            Definition::ExtendedAcl(v) => v.span,
            Definition::ObjectGroup(v) => v.span,
            Definition::PrefixList(v) => v.span,
            Definition::RouteMap(v) => v.span,
            Definition::Vlan(v) => v.span,
        }
    }
}

/// Borrowed view returned by [`ConfigurationModel::lookup`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefinitionRef<'a> {
    Interface(&'a Interface),
    StandardAcl(&'a StandardAccessList),
    ExtendedAcl(&'a ExtendedAccessList),
    ObjectGroup(&'a ObjectGroup),
    PrefixList(&'a PrefixList),
    RouteMap(&'a RouteMap),
    Vlan(&'a Vlan),
}

/// A name mentioned before (or without) its definition. Collected during the
/// walk, checked by [`ConfigurationModel::resolve_pending`].
#[derive(Debug, Clone, PartialEq)]
pub struct PendingReference {
    pub kind: DefinitionKind,
    pub name: String,
    pub span: Span,
    /// Human description of the referencing site, quoted in diagnostics.
    pub context: String,
    /// Required references escalate to error severity when unresolved.
    pub required: bool,
}

macro_rules! define_entry {
    ($self:ident, $map:ident, $kind:expr, $name:expr, $span:expr, $value:expr) => {{
        if let Some(old) = $self.$map.get(&$name) {
            let d = DiagnosticBuilder::new($span)
                .build_redefinition($kind.describe(), &$name.to_string(), old.span);
            $self.diagnostics.push(d);
        }
        $self.$map.insert($name, $value);
    }};
}

/// The extraction output: name-indexed definitions, routing processes,
/// system settings and the diagnostics the walk produced. Purely additive
/// while the walk runs; [`resolve_pending`](Self::resolve_pending) is the
/// only finalization step.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationModel {
    dialect: Dialect,
    hostname: Option<String>,
    interfaces: BTreeMap<String, Interface>,
    standard_acls: BTreeMap<String, StandardAccessList>,
    extended_acls: BTreeMap<String, ExtendedAccessList>,
    object_groups: BTreeMap<String, ObjectGroup>,
    prefix_lists: BTreeMap<String, PrefixList>,
    route_maps: BTreeMap<String, RouteMap>,
    vlans: BTreeMap<u16, Vlan>,
    bgp: Option<BgpProcess>,
    ospf: Option<OspfProcess>,
    static_routes: Vec<StaticRoute>,
    ntp_servers: BTreeSet<String>,
    logging_hosts: BTreeSet<String>,
    snmp_communities: BTreeMap<String, SnmpCommunity>,
    pending: Vec<PendingReference>,
    diagnostics: Vec<Diagnostic>,
}

impl ConfigurationModel {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            hostname: None,
            interfaces: BTreeMap::new(),
            standard_acls: BTreeMap::new(),
            extended_acls: BTreeMap::new(),
            object_groups: BTreeMap::new(),
            prefix_lists: BTreeMap::new(),
            route_maps: BTreeMap::new(),
            vlans: BTreeMap::new(),
            bgp: None,
            ospf: None,
            static_routes: Vec::new(),
            ntp_servers: BTreeSet::new(),
            logging_hosts: BTreeSet::new(),
            snmp_communities: BTreeMap::new(),
            pending: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    pub fn interfaces(&self) -> &BTreeMap<String, Interface> {
        &self.interfaces
    }

    pub fn standard_acls(&self) -> &BTreeMap<String, StandardAccessList> {
        &self.standard_acls
    }

    pub fn extended_acls(&self) -> &BTreeMap<String, ExtendedAccessList> {
        &self.extended_acls
    }

    pub fn object_groups(&self) -> &BTreeMap<String, ObjectGroup> {
        &self.object_groups
    }

    pub fn prefix_lists(&self) -> &BTreeMap<String, PrefixList> {
        &self.prefix_lists
    }

    pub fn route_maps(&self) -> &BTreeMap<String, RouteMap> {
        &self.route_maps
    }

    pub fn vlans(&self) -> &BTreeMap<u16, Vlan> {
        &self.vlans
    }

    pub fn bgp(&self) -> Option<&BgpProcess> {
        self.bgp.as_ref()
    }

    pub fn ospf(&self) -> Option<&OspfProcess> {
        self.ospf.as_ref()
    }

    pub fn static_routes(&self) -> &[StaticRoute] {
        &self.static_routes
    }

    pub fn ntp_servers(&self) -> &BTreeSet<String> {
        &self.ntp_servers
    }

    pub fn logging_hosts(&self) -> &BTreeSet<String> {
        &self.logging_hosts
    }

    pub fn snmp_communities(&self) -> &BTreeMap<String, SnmpCommunity> {
        &self.snmp_communities
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity() == Severity::Error)
    }

    /// Registers a definition under its `(kind, name)` key. Defining a key
    /// that already exists replaces the earlier value and records exactly one
    /// redefinition diagnostic citing the original span; it never fails.
    pub fn define(&mut self, def: Definition) {
        let kind = def.kind();
        let span = def.span();
        match def {
            Definition::Interface(v) => {
                define_entry!(self, interfaces, kind, v.name.clone(), span, v)
            }
            Definition::StandardAcl(v) => {
                define_entry!(self, standard_acls, kind, v.name.clone(), span, v)
            }
            Definition::ExtendedAcl(v) => {
                define_entry!(self, extended_acls, kind, v.name.clone(), span, v)
            }
            Definition::ObjectGroup(v) => {
                define_entry!(self, object_groups, kind, v.name.clone(), span, v)
            }
            Definition::PrefixList(v) => {
                define_entry!(self, prefix_lists, kind, v.name.clone(), span, v)
            }
            Definition::RouteMap(v) => {
                define_entry!(self, route_maps, kind, v.name.clone(), span, v)
            }
            Definition::Vlan(v) => define_entry!(self, vlans, kind, v.id, span, v),
        }
    }

    /// Looks a definition up by kind and name. `None` means not defined;
    /// repeated lookups without intervening `define` calls return the same
    /// result.
    pub fn lookup(&self, kind: DefinitionKind, name: &str) -> Option<DefinitionRef<'_>> {
        match kind {
            DefinitionKind::Interface => self.interfaces.get(name).map(DefinitionRef::Interface),
            DefinitionKind::StandardAcl => {
                self.standard_acls.get(name).map(DefinitionRef::StandardAcl)
            }
            DefinitionKind::ExtendedAcl => {
                self.extended_acls.get(name).map(DefinitionRef::ExtendedAcl)
            }
            DefinitionKind::AccessList => self
                .standard_acls
                .get(name)
                .map(DefinitionRef::StandardAcl)
                .or_else(|| self.extended_acls.get(name).map(DefinitionRef::ExtendedAcl)),
            DefinitionKind::ObjectGroup => {
                self.object_groups.get(name).map(DefinitionRef::ObjectGroup)
            }
            DefinitionKind::PrefixList => {
                self.prefix_lists.get(name).map(DefinitionRef::PrefixList)
            }
            DefinitionKind::RouteMap => self.route_maps.get(name).map(DefinitionRef::RouteMap),
            DefinitionKind::Vlan => {
                let id: u16 = name.parse().ok()?;
                self.vlans.get(&id).map(DefinitionRef::Vlan)
            }
        }
    }

    pub fn contains(&self, kind: DefinitionKind, name: &str) -> bool {
        self.lookup(kind, name).is_some()
    }

    /// Checks every deferred cross-reference against the registry, recording
    /// one diagnostic per reference that is still unresolved. Runs the
    /// deferred list down to empty, so calling it again is a no-op.
    pub fn resolve_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for r in pending {
            if !self.contains(r.kind, &r.name) {
                let d = DiagnosticBuilder::new(r.span).build_unresolved_reference(
                    r.kind.describe(),
                    &r.name,
                    &r.context,
                    r.required,
                );
                self.diagnostics.push(d);
            }
        }
    }

    pub(crate) fn set_hostname(&mut self, hostname: String) {
        self.hostname = Some(hostname);
    }

    pub(crate) fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn defer_reference(&mut self, reference: PendingReference) {
        self.pending.push(reference);
    }

    /// The ACL under construction, created on first mention. Dialects whose
    /// grammar emits one stanza per ACL line (numbered `access-list` forms)
    /// accumulate through this instead of `define`.
    pub(crate) fn standard_acl_mut(&mut self, name: &str, span: Span) -> &mut StandardAccessList {
        self.standard_acls
            .entry(name.to_owned())
            .or_insert_with(|| StandardAccessList::new(name, span))
    }

    pub(crate) fn extended_acl_mut(&mut self, name: &str, span: Span) -> &mut ExtendedAccessList {
        self.extended_acls
            .entry(name.to_owned())
            .or_insert_with(|| ExtendedAccessList::new(name, span))
    }

    pub(crate) fn prefix_list_mut(&mut self, name: &str, span: Span) -> &mut PrefixList {
        self.prefix_lists
            .entry(name.to_owned())
            .or_insert_with(|| PrefixList::new(name, span))
    }

    pub(crate) fn route_map_mut(&mut self, name: &str, span: Span) -> &mut RouteMap {
        self.route_maps
            .entry(name.to_owned())
            .or_insert_with(|| RouteMap::new(name, span))
    }

    pub(crate) fn set_bgp(&mut self, process: BgpProcess) {
        self.bgp = Some(process);
    }

    pub(crate) fn bgp_opt_mut(&mut self) -> Option<&mut BgpProcess> {
        self.bgp.as_mut()
    }

    pub(crate) fn set_ospf(&mut self, process: OspfProcess) {
        self.ospf = Some(process);
    }

    pub(crate) fn ospf_opt_mut(&mut self) -> Option<&mut OspfProcess> {
        self.ospf.as_mut()
    }

    pub(crate) fn add_static_route(&mut self, route: StaticRoute) {
        self.static_routes.push(route);
    }

    pub(crate) fn add_ntp_server(&mut self, host: String) {
        self.ntp_servers.insert(host);
    }

    pub(crate) fn add_logging_host(&mut self, host: String) {
        self.logging_hosts.insert(host);
    }

    pub(crate) fn add_snmp_community(&mut self, community: SnmpCommunity) {
        self.snmp_communities
            .insert(community.name.clone(), community);
    }
}
