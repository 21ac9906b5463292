use std::net::Ipv4Addr;
use std::ops::Range;

use confmodel::diagnostic::{Code, Severity, Span};
use confmodel::extract::{extract, ExtractOptsBuilder};
use confmodel::settings::Dialect;
use confmodel::structures::model::acl::{AddressSpec, ObjectGroupMember, PortSpec, Protocol};
use confmodel::structures::model::net::Prefix;
use confmodel::structures::model::route_map::{Community, RouteMapMatch, RouteMapSet};
use confmodel::structures::model::routing::NextHop;
use confmodel::structures::model::{
    ConfigurationModel, DefinitionKind, DefinitionRef, LineAction, SnmpAccess,
};
use confmodel::structures::tree::{ParseChild, ParseNode, Rule, Token};

use pretty_assertions::assert_eq;

fn rule(r: Rule, span: Range<usize>, children: Vec<ParseChild>) -> ParseChild {
    ParseChild::Rule(ParseNode::new(r, span, children))
}

fn tok(text: &str, span: Range<usize>) -> ParseChild {
    ParseChild::Token(Token::new(text, span))
}

fn config(children: Vec<ParseChild>) -> ParseNode {
    ParseNode::new(Rule::Configuration, 0..1000, children)
}

fn extract_ios(tree: &ParseNode) -> ConfigurationModel {
    extract(tree, ExtractOptsBuilder::new().dialect(Dialect::Ios).build())
}

fn codes(model: &ConfigurationModel) -> Vec<Code> {
    model.diagnostics().iter().map(|d| *d.code()).collect()
}

fn ip(text: &str) -> Ipv4Addr {
    text.parse().unwrap()
}

#[test]
fn extracts_system_lines() {
    let tree = config(vec![
        rule(Rule::Hostname, 0..14, vec![tok("edge1", 9..14)]),
        rule(Rule::NtpServer, 20..41, vec![tok("192.0.2.10", 31..41)]),
        rule(
            Rule::LoggingHost,
            50..73,
            vec![tok("host", 58..62), tok("192.0.2.20", 63..73)],
        ),
        rule(
            Rule::SnmpCommunity,
            80..111,
            vec![tok("s3cr3t", 102..108), tok("ro", 109..111)],
        ),
    ]);
    let model = extract_ios(&tree);

    assert_eq!(model.dialect(), Dialect::Ios);
    assert_eq!(model.hostname(), Some("edge1"));
    assert!(model.ntp_servers().contains("192.0.2.10"));
    assert!(model.logging_hosts().contains("192.0.2.20"));
    assert_eq!(
        model.snmp_communities()["s3cr3t"].access,
        SnmpAccess::ReadOnly
    );
    assert!(model.diagnostics().is_empty());
}

#[test]
fn interface_names_canonicalize_and_defaults_apply() {
    let tree = config(vec![
        rule(
            Rule::Interface,
            0..120,
            vec![
                tok("gi0/1", 10..15),
                rule(
                    Rule::IfDescription,
                    20..40,
                    vec![tok("uplink", 33..39), tok("north", 40..45)],
                ),
                rule(
                    Rule::IfIpAddress,
                    50..80,
                    vec![tok("10.0.0.1", 61..69), tok("255.255.255.0", 70..83)],
                ),
                rule(Rule::IfShutdown, 90..98, vec![]),
            ],
        ),
        rule(Rule::Interface, 130..150, vec![tok("mgmt0", 140..145)]),
    ]);
    let model = extract_ios(&tree);

    let iface = &model.interfaces()["GigabitEthernet0/1"];
    assert_eq!(iface.description.as_deref(), Some("uplink north"));
    assert_eq!(iface.bandwidth, 1_000_000_000);
    assert_eq!(iface.mtu, 1500);
    assert_eq!(iface.vrf, "default");
    assert!(iface.shutdown);
    let addr = iface.primary_address().unwrap();
    assert_eq!(addr.address, ip("10.0.0.1"));
    assert_eq!(addr.mask, ip("255.255.255.0"));

    assert_eq!(model.interfaces()["mgmt0"].vrf, "management");
    assert!(model.diagnostics().is_empty());
}

#[test]
fn interface_overrides_beat_prefix_defaults() {
    let tree = config(vec![rule(
        Rule::Interface,
        0..100,
        vec![
            tok("fa0/3", 10..15),
            rule(Rule::IfBandwidth, 20..35, vec![tok("50000", 30..35)]),
            rule(Rule::IfMtu, 40..50, vec![tok("9000", 44..48)]),
            rule(
                Rule::IfVrfForwarding,
                55..75,
                vec![tok("CUSTOMER-A", 70..80)],
            ),
            rule(Rule::IfShutdown, 80..88, vec![]),
            rule(Rule::IfNoShutdown, 89..99, vec![]),
        ],
    )]);
    let model = extract_ios(&tree);

    let iface = &model.interfaces()["FastEthernet0/3"];
    assert_eq!(iface.bandwidth, 50_000_000);
    assert_eq!(iface.mtu, 9000);
    assert_eq!(iface.vrf, "CUSTOMER-A");
    assert!(!iface.shutdown);
}

#[test]
fn interface_range_expands_and_body_applies_to_all_members() {
    let tree = config(vec![rule(
        Rule::Interface,
        0..80,
        vec![
            tok("gi0/1", 10..15),
            tok("-", 16..17),
            tok("3", 18..19),
            rule(Rule::IfDescription, 25..45, vec![tok("access", 38..44)]),
        ],
    )]);
    let model = extract_ios(&tree);

    assert_eq!(
        model.interfaces().keys().collect::<Vec<_>>(),
        [
            "GigabitEthernet0/1",
            "GigabitEthernet0/2",
            "GigabitEthernet0/3"
        ]
    );
    for iface in model.interfaces().values() {
        assert_eq!(iface.description.as_deref(), Some("access"));
    }
}

#[test]
fn forward_reference_resolves_without_diagnostics() {
    // The ACL is referenced before the file defines it.
    let tree = config(vec![
        rule(
            Rule::Interface,
            0..60,
            vec![
                tok("gi0/1", 10..15),
                rule(
                    Rule::IfIpAccessGroup,
                    20..55,
                    vec![tok("EDGE_IN", 36..43), tok("in", 44..46)],
                ),
            ],
        ),
        rule(
            Rule::ExtendedAcl,
            70..140,
            vec![
                tok("EDGE_IN", 95..102),
                rule(
                    Rule::ExtendedAclLine,
                    105..140,
                    vec![
                        tok("permit", 105..111),
                        tok("ip", 112..114),
                        tok("any", 115..118),
                        tok("any", 119..122),
                    ],
                ),
            ],
        ),
    ]);
    let model = extract_ios(&tree);

    assert!(model.diagnostics().is_empty());
    assert!(!model.has_errors());
    assert!(model.contains(DefinitionKind::AccessList, "EDGE_IN"));
    assert_eq!(
        model.interfaces()["GigabitEthernet0/1"]
            .incoming_access_group
            .as_deref(),
        Some("EDGE_IN")
    );
}

#[test]
fn undefined_reference_yields_exactly_one_error_diagnostic() {
    let tree = config(vec![rule(
        Rule::Interface,
        0..60,
        vec![
            tok("gi0/1", 10..15),
            rule(
                Rule::IfIpAccessGroup,
                20..55,
                vec![tok("EDGE_IN", 36..43), tok("in", 44..46)],
            ),
        ],
    )]);
    let model = extract_ios(&tree);

    // The model is still fully populated.
    assert!(model.interfaces().contains_key("GigabitEthernet0/1"));
    assert!(model.has_errors());
    assert_eq!(codes(&model), [Code::UnresolvedReference]);
    let d = &model.diagnostics()[0];
    assert_eq!(d.severity(), Severity::Error);
    assert!(d.message().contains("EDGE_IN"));
    assert!(d.message().contains("GigabitEthernet0/1"));
}

#[test]
fn error_nodes_become_diagnostics_and_the_walk_continues() {
    let tree = config(vec![
        ParseChild::Error(Token::new("%malformed line", 5..20)),
        rule(Rule::Hostname, 25..39, vec![tok("edge1", 34..39)]),
    ]);
    let model = extract_ios(&tree);

    assert_eq!(model.hostname(), Some("edge1"));
    assert_eq!(codes(&model), [Code::SyntaxError]);
    let d = &model.diagnostics()[0];
    assert_eq!(d.severity(), Severity::Error);
    assert_eq!(*d.main_span(), Span::from(5..20));
}

#[test]
fn self_contained_definition_resolves_clean() {
    let tree = config(vec![rule(
        Rule::StandardAcl,
        0..90,
        vec![
            tok("MGMT", 25..29),
            rule(
                Rule::StandardAclLine,
                35..65,
                vec![
                    tok("permit", 35..41),
                    tok("10.0.0.0", 42..50),
                    tok("0.0.0.255", 51..60),
                ],
            ),
            rule(
                Rule::StandardAclLine,
                66..85,
                vec![tok("deny", 66..70), tok("any", 71..74)],
            ),
        ],
    )]);
    let mut model = extract_ios(&tree);

    assert!(model.diagnostics().is_empty());
    let acl = &model.standard_acls()["MGMT"];
    assert_eq!(acl.lines.len(), 2);
    assert_eq!(acl.lines[0].action, LineAction::Permit);
    assert_eq!(
        acl.lines[0].source,
        AddressSpec::Wildcard(confmodel::structures::model::net::IpWildcard::new(
            ip("10.0.0.0"),
            ip("0.0.0.255"),
        ))
    );
    assert_eq!(acl.lines[1].source, AddressSpec::Any);

    // Resolution already ran and drained the deferred list; running it
    // again adds nothing.
    model.resolve_pending();
    assert!(model.diagnostics().is_empty());
}

#[test]
fn standard_acl_bare_address_means_host() {
    let tree = config(vec![rule(
        Rule::StandardAcl,
        0..60,
        vec![
            tok("ONE", 25..28),
            rule(
                Rule::StandardAclLine,
                30..55,
                vec![tok("permit", 30..36), tok("192.0.2.7", 37..46)],
            ),
        ],
    )]);
    let model = extract_ios(&tree);
    assert_eq!(
        model.standard_acls()["ONE"].lines[0].source,
        AddressSpec::Host(ip("192.0.2.7"))
    );
}

#[test]
fn extended_acl_lines_carry_ports_and_flags() {
    let tree = config(vec![rule(
        Rule::ExtendedAcl,
        0..160,
        vec![
            tok("EDGE_IN", 25..32),
            rule(
                Rule::ExtendedAclLine,
                40..120,
                vec![
                    tok("permit", 40..46),
                    tok("tcp", 47..50),
                    tok("10.0.1.0", 51..59),
                    tok("0.0.0.255", 60..69),
                    tok("any", 70..73),
                    tok("eq", 74..76),
                    tok("443", 77..80),
                    tok("established", 81..92),
                    tok("log", 93..96),
                ],
            ),
            rule(
                Rule::AclRemark,
                125..155,
                vec![tok("web", 132..135), tok("traffic", 136..143)],
            ),
        ],
    )]);
    let model = extract_ios(&tree);

    let acl = &model.extended_acls()["EDGE_IN"];
    let line = &acl.lines[0];
    assert_eq!(line.protocol, Protocol::Tcp);
    assert_eq!(line.source_ports, PortSpec::Any);
    assert_eq!(line.destination, AddressSpec::Any);
    assert_eq!(line.destination_ports, PortSpec::Eq(443));
    assert!(line.established);
    assert!(line.log);
    assert_eq!(acl.remarks, ["web traffic"]);
    assert!(model.diagnostics().is_empty());
}

#[test]
fn object_groups_define_members_and_nested_references_resolve() {
    let tree = config(vec![
        rule(
            Rule::ObjectGroupNetwork,
            0..90,
            vec![
                tok("DMZ", 25..28),
                rule(
                    Rule::NetworkObject,
                    35..60,
                    vec![tok("host", 35..39), tok("203.0.113.9", 40..51)],
                ),
                rule(
                    Rule::GroupObject,
                    65..85,
                    vec![tok("SERVERS", 78..85)],
                ),
            ],
        ),
        rule(
            Rule::ObjectGroupNetwork,
            100..160,
            vec![
                tok("SERVERS", 125..132),
                rule(
                    Rule::NetworkObject,
                    140..160,
                    vec![tok("10.10.0.0", 140..149), tok("255.255.0.0", 150..161)],
                ),
            ],
        ),
    ]);
    let model = extract(
        &tree,
        ExtractOptsBuilder::new().dialect(Dialect::Asa).build(),
    );

    assert!(model.diagnostics().is_empty());
    let dmz = &model.object_groups()["DMZ"];
    assert_eq!(
        dmz.members,
        [
            ObjectGroupMember::Host(ip("203.0.113.9")),
            ObjectGroupMember::Group("SERVERS".to_owned()),
        ]
    );
}

#[test]
fn prefix_list_lines_accumulate_across_stanzas() {
    let tree = config(vec![
        rule(
            Rule::PrefixListLine,
            0..60,
            vec![
                tok("PL-OUT", 15..21),
                tok("seq", 22..25),
                tok("5", 26..27),
                tok("permit", 28..34),
                tok("10.0.0.0/8", 35..45),
                tok("le", 46..48),
                tok("24", 49..51),
            ],
        ),
        rule(
            Rule::PrefixListLine,
            70..120,
            vec![
                tok("PL-OUT", 85..91),
                tok("deny", 92..96),
                tok("0.0.0.0/0", 97..106),
            ],
        ),
    ]);
    let model = extract_ios(&tree);

    let pl = &model.prefix_lists()["PL-OUT"];
    assert_eq!(pl.lines.len(), 2);
    assert_eq!(pl.lines[0].seq, 5);
    // The second line wrote no `seq`; the next multiple of five is assigned.
    assert_eq!(pl.lines[1].seq, 10);
    assert_eq!(pl.lines[0].le, Some(24));
    assert_eq!(pl.lines[0].prefix, Prefix::new(ip("10.0.0.0"), 8));
    assert_eq!(pl.lines[1].action, LineAction::Deny);
    // No redefinition chatter for the per-line stanza form.
    assert!(model.diagnostics().is_empty());
}

#[test]
fn route_map_clauses_order_by_sequence_and_duplicates_merge() {
    let tree = config(vec![
        rule(
            Rule::RouteMapClause,
            0..60,
            vec![
                tok("RM", 10..12),
                tok("permit", 13..19),
                tok("20", 20..22),
                rule(Rule::RmSetMetric, 30..50, vec![tok("100", 41..44)]),
            ],
        ),
        rule(
            Rule::RouteMapClause,
            70..120,
            vec![
                tok("RM", 80..82),
                tok("deny", 83..87),
                tok("10", 88..90),
            ],
        ),
        rule(
            Rule::RouteMapClause,
            130..200,
            vec![
                tok("RM", 140..142),
                tok("permit", 143..149),
                tok("20", 150..152),
                rule(
                    Rule::RmSetLocalPreference,
                    160..190,
                    vec![tok("200", 181..184)],
                ),
            ],
        ),
    ]);
    let model = extract_ios(&tree);

    let rm = &model.route_maps()["RM"];
    assert_eq!(rm.clauses.keys().copied().collect::<Vec<_>>(), [10, 20]);
    assert_eq!(rm.clauses[&10].action, LineAction::Deny);
    // The duplicate clause 20 merged its set lines into the original.
    assert_eq!(
        rm.clauses[&20].sets,
        [
            RouteMapSet::Metric(100),
            RouteMapSet::LocalPreference(200),
        ]
    );
    assert_eq!(codes(&model), [Code::DuplicateClause]);
    assert_eq!(model.diagnostics()[0].severity(), Severity::Warning);
}

#[test]
fn route_map_matches_and_community_sets() {
    let tree = config(vec![
        rule(
            Rule::RouteMapClause,
            0..150,
            vec![
                tok("RM", 10..12),
                tok("permit", 13..19),
                tok("10", 20..22),
                rule(
                    Rule::RmMatchIpAccessList,
                    30..60,
                    vec![tok("MGMT", 51..55)],
                ),
                rule(
                    Rule::RmMatchIpPrefixList,
                    65..100,
                    vec![tok("PL-OUT", 93..99)],
                ),
                rule(
                    Rule::RmSetCommunity,
                    105..145,
                    vec![
                        tok("65000:100", 119..128),
                        tok("no-export", 129..138),
                        tok("additive", 139..147),
                    ],
                ),
            ],
        ),
        rule(
            Rule::StandardAcl,
            160..200,
            vec![tok("MGMT", 185..189)],
        ),
        rule(
            Rule::PrefixListLine,
            210..260,
            vec![
                tok("PL-OUT", 225..231),
                tok("permit", 232..238),
                tok("10.0.0.0/8", 239..249),
            ],
        ),
    ]);
    let model = extract_ios(&tree);

    assert!(model.diagnostics().is_empty());
    let clause = &model.route_maps()["RM"].clauses[&10];
    assert_eq!(
        clause.matches,
        [
            RouteMapMatch::IpAccessList(vec!["MGMT".to_owned()]),
            RouteMapMatch::IpPrefixList(vec!["PL-OUT".to_owned()]),
        ]
    );
    assert_eq!(
        clause.sets,
        [RouteMapSet::Communities(vec![
            Community::Value((65000 << 16) | 100),
            Community::NoExport,
        ])]
    );
}

#[test]
fn bgp_process_neighbors_and_networks() {
    let tree = config(vec![
        rule(
            Rule::RouterBgp,
            0..300,
            vec![
                tok("65000", 11..16),
                rule(Rule::BgpRouterId, 20..45, vec![tok("10.0.0.1", 35..43)]),
                rule(
                    Rule::BgpNetwork,
                    50..95,
                    vec![
                        tok("203.0.113.0", 58..69),
                        tok("mask", 70..74),
                        tok("255.255.255.0", 75..88),
                    ],
                ),
                rule(Rule::BgpNetwork, 100..120, vec![tok("10.0.0.0", 108..116)]),
                // Any neighbor line may appear before the remote-as one.
                rule(
                    Rule::BgpNeighborDescription,
                    130..170,
                    vec![
                        tok("198.51.100.2", 139..151),
                        tok("transit", 164..171),
                        tok("peer", 172..176),
                    ],
                ),
                rule(
                    Rule::BgpNeighborRemoteAs,
                    180..215,
                    vec![tok("198.51.100.2", 189..201), tok("64512", 212..217)],
                ),
                rule(
                    Rule::BgpNeighborRouteMap,
                    220..260,
                    vec![
                        tok("198.51.100.2", 229..241),
                        tok("RM-OUT", 252..258),
                        tok("out", 259..262),
                    ],
                ),
                rule(
                    Rule::BgpNeighborShutdown,
                    265..295,
                    vec![tok("198.51.100.2", 274..286)],
                ),
            ],
        ),
        rule(
            Rule::RouteMapClause,
            310..350,
            vec![
                tok("RM-OUT", 320..326),
                tok("permit", 327..333),
                tok("10", 334..336),
            ],
        ),
    ]);
    let model = extract_ios(&tree);

    assert!(model.diagnostics().is_empty());
    let bgp = model.bgp().unwrap();
    assert_eq!(bgp.asn, 65000);
    assert_eq!(bgp.router_id, Some(ip("10.0.0.1")));
    assert_eq!(
        bgp.networks,
        [
            Prefix::new(ip("203.0.113.0"), 24),
            Prefix::new(ip("10.0.0.0"), 8),
        ]
    );
    let neighbor = &bgp.neighbors[&ip("198.51.100.2")];
    assert_eq!(neighbor.description.as_deref(), Some("transit peer"));
    assert_eq!(neighbor.remote_as, Some(64512));
    assert_eq!(neighbor.route_map_out.as_deref(), Some("RM-OUT"));
    assert!(neighbor.shutdown);
}

#[test]
fn bgp_asdot_notation_is_accepted() {
    let tree = config(vec![rule(
        Rule::RouterBgp,
        0..20,
        vec![tok("1.10", 11..15)],
    )]);
    let model = extract_ios(&tree);
    assert_eq!(model.bgp().unwrap().asn, (1 << 16) | 10);
}

#[test]
fn bgp_missing_route_map_is_error_missing_update_source_is_warning() {
    let tree = config(vec![rule(
        Rule::RouterBgp,
        0..150,
        vec![
            tok("65000", 11..16),
            rule(
                Rule::BgpNeighborRouteMap,
                20..60,
                vec![
                    tok("198.51.100.2", 29..41),
                    tok("RM-MISSING", 52..62),
                    tok("in", 63..65),
                ],
            ),
            rule(
                Rule::BgpNeighborUpdateSource,
                70..120,
                vec![tok("198.51.100.2", 79..91), tok("lo0", 106..109)],
            ),
        ],
    )]);
    let model = extract_ios(&tree);

    assert_eq!(codes(&model), [Code::UnresolvedReference, Code::UnresolvedReference]);
    let mut severities: Vec<_> = model.diagnostics().iter().map(|d| d.severity()).collect();
    severities.sort();
    assert_eq!(severities, [Severity::Warning, Severity::Error]);
    // The facts themselves are still in the model.
    let neighbor = &model.bgp().unwrap().neighbors[&ip("198.51.100.2")];
    assert_eq!(neighbor.route_map_in.as_deref(), Some("RM-MISSING"));
    assert_eq!(neighbor.update_source.as_deref(), Some("Loopback0"));
}

#[test]
fn ospf_networks_and_passive_interfaces() {
    let tree = config(vec![
        rule(Rule::Interface, 0..25, vec![tok("gi0/1", 10..15)]),
        rule(
            Rule::RouterOspf,
            30..150,
            vec![
                tok("1", 42..43),
                rule(Rule::OspfRouterId, 50..75, vec![tok("10.0.0.1", 60..68)]),
                rule(
                    Rule::OspfNetwork,
                    80..120,
                    vec![
                        tok("10.0.0.0", 88..96),
                        tok("0.255.255.255", 97..110),
                        tok("0.0.0.51", 116..124),
                    ],
                ),
                rule(
                    Rule::OspfPassiveInterface,
                    125..148,
                    vec![tok("gi0/1", 143..148)],
                ),
            ],
        ),
    ]);
    let model = extract_ios(&tree);

    assert!(model.diagnostics().is_empty());
    let ospf = model.ospf().unwrap();
    assert_eq!(ospf.process_id, 1);
    assert_eq!(ospf.router_id, Some(ip("10.0.0.1")));
    assert_eq!(ospf.networks[0].area, 51);
    assert!(ospf.passive_interfaces.contains("GigabitEthernet0/1"));
}

#[test]
fn static_routes_with_vrf_interface_hop_and_distance() {
    let tree = config(vec![
        rule(Rule::Interface, 0..25, vec![tok("lo0", 10..13)]),
        rule(
            Rule::IpRoute,
            30..80,
            vec![
                tok("10.20.0.0", 39..48),
                tok("255.255.0.0", 49..60),
                tok("192.0.2.1", 61..70),
            ],
        ),
        rule(
            Rule::IpRoute,
            90..160,
            vec![
                tok("vrf", 99..102),
                tok("CUSTOMER-A", 103..113),
                tok("0.0.0.0", 114..121),
                tok("0.0.0.0", 122..129),
                tok("lo0", 130..133),
                tok("250", 134..137),
            ],
        ),
    ]);
    let model = extract_ios(&tree);

    assert!(model.diagnostics().is_empty());
    let routes = model.static_routes();
    assert_eq!(routes[0].prefix, Prefix::new(ip("10.20.0.0"), 16));
    assert_eq!(routes[0].next_hop, NextHop::Address(ip("192.0.2.1")));
    assert_eq!(routes[0].distance, 1);
    assert_eq!(routes[0].vrf, None);

    assert_eq!(routes[1].prefix, Prefix::new(ip("0.0.0.0"), 0));
    assert_eq!(
        routes[1].next_hop,
        NextHop::Interface("Loopback0".to_owned())
    );
    assert_eq!(routes[1].distance, 250);
    assert_eq!(routes[1].vrf.as_deref(), Some("CUSTOMER-A"));
}

#[test]
fn interface_redefinition_warns_and_later_definition_wins() {
    let tree = config(vec![
        rule(
            Rule::Interface,
            0..60,
            vec![
                tok("gi0/1", 10..15),
                rule(
                    Rule::IfIpAddress,
                    20..55,
                    vec![tok("10.0.0.1", 31..39), tok("255.255.255.0", 40..53)],
                ),
            ],
        ),
        rule(
            Rule::Interface,
            70..130,
            vec![
                tok("GigabitEthernet0/1", 80..98),
                rule(Rule::IfDescription, 100..125, vec![tok("replaced", 113..121)]),
            ],
        ),
    ]);
    let model = extract_ios(&tree);

    assert_eq!(codes(&model), [Code::Redefinition]);
    assert_eq!(model.diagnostics()[0].severity(), Severity::Warning);
    let iface = &model.interfaces()["GigabitEthernet0/1"];
    assert_eq!(iface.description.as_deref(), Some("replaced"));
    assert!(iface.addresses.is_empty());
}

#[test]
fn vlan_definitions_and_redefinition_diagnostic() {
    let tree = config(vec![
        rule(
            Rule::Vlan,
            0..40,
            vec![
                tok("100", 5..8),
                rule(Rule::VlanName, 10..30, vec![tok("users", 17..22)]),
            ],
        ),
        rule(
            Rule::Vlan,
            50..95,
            vec![
                tok("100", 55..58),
                rule(Rule::VlanName, 60..85, vec![tok("servers", 67..74)]),
            ],
        ),
    ]);
    let model = extract_ios(&tree);

    assert_eq!(codes(&model), [Code::Redefinition]);
    match model.lookup(DefinitionKind::Vlan, "100") {
        Some(DefinitionRef::Vlan(vlan)) => assert_eq!(vlan.name.as_deref(), Some("servers")),
        other => panic!("expected vlan 100, got {other:?}"),
    }
}

#[test]
fn out_of_range_values_warn_and_are_not_committed() {
    let tree = config(vec![
        rule(Rule::Vlan, 0..12, vec![tok("9999", 5..9)]),
        rule(
            Rule::Interface,
            20..80,
            vec![
                tok("gi0/1", 30..35),
                rule(
                    Rule::IfSwitchportAccessVlan,
                    40..75,
                    vec![tok("0", 71..72)],
                ),
            ],
        ),
    ]);
    let model = extract_ios(&tree);

    assert_eq!(codes(&model), [Code::ValueOutOfRange, Code::ValueOutOfRange]);
    assert!(model.vlans().is_empty());
    assert_eq!(model.interfaces()["GigabitEthernet0/1"].access_vlan, None);
}

#[test]
fn malformed_stanzas_are_diagnosed_not_fatal() {
    let tree = config(vec![
        rule(Rule::Hostname, 0..9, vec![]),
        rule(Rule::NtpServer, 15..37, vec![tok("192.0.2.10", 26..36)]),
    ]);
    let model = extract_ios(&tree);

    assert_eq!(codes(&model), [Code::MalformedStanza]);
    assert_eq!(model.hostname(), None);
    // Extraction carried on past the bad stanza.
    assert!(model.ntp_servers().contains("192.0.2.10"));
}

#[test]
fn ignored_stanzas_are_noted_only_on_request() {
    let tree = config(vec![rule(
        Rule::Null,
        0..30,
        vec![tok("aaa", 0..3), tok("new-model", 4..13)],
    )]);

    let quiet = extract_ios(&tree);
    assert!(quiet.diagnostics().is_empty());

    let noted = extract(
        &tree,
        ExtractOptsBuilder::new()
            .dialect(Dialect::Ios)
            .note_ignored_stanzas(true)
            .build(),
    );
    assert_eq!(codes(&noted), [Code::IgnoredStanza]);
    assert_eq!(noted.diagnostics()[0].severity(), Severity::Info);
    assert!(noted.diagnostics()[0].message().contains("aaa"));
}

#[test]
fn bare_logging_form_is_deprecated_but_still_extracted() {
    let tree = config(vec![rule(
        Rule::LoggingHost,
        0..20,
        vec![tok("192.0.2.20", 8..18)],
    )]);
    let model = extract_ios(&tree);

    assert_eq!(codes(&model), [Code::DeprecatedForm]);
    assert!(model.logging_hosts().contains("192.0.2.20"));
}

#[test]
fn snmp_community_acl_reference_is_required() {
    let tree = config(vec![rule(
        Rule::SnmpCommunity,
        0..40,
        vec![tok("s3cr3t", 22..28), tok("rw", 29..31), tok("SNMP_ACL", 32..40)],
    )]);
    let model = extract_ios(&tree);

    assert_eq!(codes(&model), [Code::UnresolvedReference]);
    assert_eq!(model.diagnostics()[0].severity(), Severity::Error);
    let community = &model.snmp_communities()["s3cr3t"];
    assert_eq!(community.access, SnmpAccess::ReadWrite);
    assert_eq!(community.acl.as_deref(), Some("SNMP_ACL"));
}

#[test]
fn conflicting_bgp_asn_warns_and_later_process_wins() {
    let tree = config(vec![
        rule(Rule::RouterBgp, 0..20, vec![tok("65000", 11..16)]),
        rule(Rule::RouterBgp, 30..50, vec![tok("65001", 41..46)]),
    ]);
    let model = extract_ios(&tree);

    assert_eq!(codes(&model), [Code::Redefinition]);
    assert_eq!(model.bgp().unwrap().asn, 65001);
}

#[test]
#[should_panic(expected = "ICE")]
fn body_line_outside_its_stanza_is_a_contract_violation() {
    let tree = config(vec![rule(
        Rule::IfDescription,
        0..20,
        vec![tok("stray", 12..17)],
    )]);
    extract_ios(&tree);
}
