use super::util::{parse_community, parse_prefix, TokenCursor};
use super::{ConfigurationBuilder, ContextFrame};
use crate::diagnostic::{Diagnostic, DiagnosticBuilder};
use crate::structures::model::route_map::{PrefixListLine, RouteMapClause, RouteMapMatch, RouteMapSet};
use crate::structures::model::{DefinitionKind, LineAction, PendingReference};
use crate::structures::tree::ParseNode;

impl ConfigurationBuilder {
    pub(super) fn enter_route_map_clause(&mut self, node: &ParseNode) {
        let mut cursor = TokenCursor::new("route-map", node);
        let header = (|| {
            let map = cursor.expect("a route-map name")?.text().to_owned();
            let action = cursor.expect_action()?;
            let (seq, _) = cursor.expect_int_in("a sequence number", 0, 65535)?;
            Ok((map, RouteMapClause::new(seq as u16, action, node.span())))
        })();
        let (map, clause) = match header {
            Ok(header) => header,
            Err(d) => {
                self.model.add_diagnostic(d);
                // Sentinel frame; dropped at exit.
                (
                    String::new(),
                    RouteMapClause::new(0, LineAction::Permit, node.span()),
                )
            }
        };
        self.push_frame(ContextFrame::RouteMapClause { map, clause });
    }

    pub(super) fn exit_route_map_clause(&mut self) {
        let (map, clause) = match self.pop_frame("route-map") {
            ContextFrame::RouteMapClause { map, clause } => (map, clause),
            _ => panic!("ICE: context stack out of balance at `route-map` exit"),
        };
        if map.is_empty() {
            return;
        }
        let seq = clause.seq;
        let span = clause.span;
        let route_map = self.model.route_map_mut(&map, span);
        let duplicate = match route_map.clauses.get_mut(&seq) {
            Some(existing) => {
                let original = existing.span;
                existing.matches.extend(clause.matches);
                existing.sets.extend(clause.sets);
                Some(original)
            }
            None => {
                route_map.clauses.insert(seq, clause);
                None
            }
        };
        if let Some(original) = duplicate {
            let d = DiagnosticBuilder::new(span).build_duplicate_clause(&map, seq, original);
            self.model.add_diagnostic(d);
        }
    }

    /// Map name and sequence number of the enclosing clause, for diagnostic
    /// context. An empty name marks the sentinel frame of a malformed header.
    fn current_clause_id(&self) -> (String, u16) {
        match self.context.last() {
            Some(ContextFrame::RouteMapClause { map, clause }) => (map.clone(), clause.seq),
            _ => panic!("ICE: route-map line outside a `route-map` stanza"),
        }
    }

    fn current_clause_mut(&mut self) -> &mut RouteMapClause {
        match self.context.last_mut() {
            Some(ContextFrame::RouteMapClause { clause, .. }) => clause,
            _ => panic!("ICE: route-map line outside a `route-map` stanza"),
        }
    }

    fn exit_rm_match_names(
        &mut self,
        node: &ParseNode,
        stanza: &'static str,
        kind: DefinitionKind,
    ) -> Result<Vec<String>, Diagnostic> {
        let (map, seq) = self.current_clause_id();
        let mut cursor = TokenCursor::new(stanza, node);
        let mut names = Vec::new();
        while let Some(token) = cursor.advance() {
            names.push(token.text().to_owned());
        }
        if names.is_empty() {
            return Err(cursor.malformed("one or more list names"));
        }
        if map.is_empty() {
            return Ok(Vec::new());
        }
        for name in &names {
            self.model.defer_reference(PendingReference {
                kind,
                name: name.clone(),
                span: node.span(),
                context: format!("route-map `{map}` clause {seq} {stanza}"),
                required: true,
            });
        }
        Ok(names)
    }

    pub(super) fn exit_rm_match_ip_access_list(
        &mut self,
        node: &ParseNode,
    ) -> Result<(), Diagnostic> {
        let names = self.exit_rm_match_names(node, "match ip address", DefinitionKind::AccessList)?;
        if !names.is_empty() {
            self.current_clause_mut()
                .matches
                .push(RouteMapMatch::IpAccessList(names));
        }
        Ok(())
    }

    pub(super) fn exit_rm_match_ip_prefix_list(
        &mut self,
        node: &ParseNode,
    ) -> Result<(), Diagnostic> {
        let names = self.exit_rm_match_names(
            node,
            "match ip address prefix-list",
            DefinitionKind::PrefixList,
        )?;
        if !names.is_empty() {
            self.current_clause_mut()
                .matches
                .push(RouteMapMatch::IpPrefixList(names));
        }
        Ok(())
    }

    pub(super) fn exit_rm_set_metric(&mut self, node: &ParseNode) -> Result<(), Diagnostic> {
        let mut cursor = TokenCursor::new("set metric", node);
        let (metric, _) = cursor.expect_int_in("a metric", 0, u32::MAX as u64)?;
        self.current_clause_mut()
            .sets
            .push(RouteMapSet::Metric(metric as u32));
        Ok(())
    }

    pub(super) fn exit_rm_set_local_preference(
        &mut self,
        node: &ParseNode,
    ) -> Result<(), Diagnostic> {
        let mut cursor = TokenCursor::new("set local-preference", node);
        let (preference, _) = cursor.expect_int_in("a local preference", 0, u32::MAX as u64)?;
        self.current_clause_mut()
            .sets
            .push(RouteMapSet::LocalPreference(preference as u32));
        Ok(())
    }

    pub(super) fn exit_rm_set_community(&mut self, node: &ParseNode) -> Result<(), Diagnostic> {
        let mut cursor = TokenCursor::new("set community", node);
        let mut communities = Vec::new();
        while !cursor.at_end() {
            // `additive` changes how the device merges the attribute, not
            // which communities are named; it carries no model fact.
            if cursor.eat("additive") {
                continue;
            }
            let token = cursor.expect("a community value")?;
            let community =
                parse_community(token.text()).ok_or_else(|| cursor.malformed("a community value"))?;
            communities.push(community);
        }
        if communities.is_empty() {
            return Err(cursor.malformed("one or more community values"));
        }
        self.current_clause_mut()
            .sets
            .push(RouteMapSet::Communities(communities));
        Ok(())
    }

    pub(super) fn exit_prefix_list_line(&mut self, node: &ParseNode) -> Result<(), Diagnostic> {
        let mut cursor = TokenCursor::new("ip prefix-list", node);
        let name = cursor.expect("a prefix-list name")?.text().to_owned();
        let seq = if cursor.eat("seq") {
            Some(cursor.expect_int_in("a sequence number", 1, 4294967294)?.0 as u32)
        } else {
            None
        };
        let action = cursor.expect_action()?;
        let prefix_token = cursor.expect("a prefix")?;
        let prefix = parse_prefix(prefix_token.text())
            .ok_or_else(|| cursor.malformed("a prefix in address/length form"))?;
        let mut ge = None;
        let mut le = None;
        if cursor.eat("ge") {
            ge = Some(cursor.expect_int_in("a ge length", prefix.length as u64, 32)?.0 as u8);
        }
        if cursor.eat("le") {
            le = Some(cursor.expect_int_in("a le length", prefix.length as u64, 32)?.0 as u8);
        }
        if !cursor.at_end() {
            return Err(cursor.malformed("nothing after the length bounds"));
        }
        let prefix_list = self.model.prefix_list_mut(&name, node.span());
        let seq = seq.unwrap_or_else(|| prefix_list.next_seq());
        prefix_list.lines.push(PrefixListLine {
            seq,
            action,
            prefix,
            ge,
            le,
            span: node.span(),
        });
        Ok(())
    }
}
