use std::net::Ipv4Addr;

use crate::diagnostic::{Diagnostic, DiagnosticBuilder, Span};
use crate::structures::model::net::Prefix;
use crate::structures::model::route_map::Community;
use crate::structures::model::LineAction;
use crate::structures::tree::{ParseNode, Token};

/// Reader over a node's direct token children. Keywords in the dialects are
/// case-insensitive; names and values are taken verbatim. A shape mismatch
/// produces a malformed-stanza diagnostic for the caller to record — the
/// grammar normally rules these out, but trees also arrive from the
/// [`TreeBuilder`](crate::structures::tree::TreeBuilder).
pub(super) struct TokenCursor<'a> {
    stanza: &'static str,
    node_span: Span,
    tokens: Vec<&'a Token>,
    index: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(stanza: &'static str, node: &'a ParseNode) -> Self {
        Self {
            stanza,
            node_span: node.span(),
            tokens: node.tokens().collect(),
            index: 0,
        }
    }

    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.index).copied()
    }

    pub fn advance(&mut self) -> Option<&'a Token> {
        let token = self.peek()?;
        self.index += 1;
        Some(token)
    }

    pub fn at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    /// Consumes the next token if it equals `keyword` (ASCII case-insensitive).
    pub fn eat(&mut self, keyword: &str) -> bool {
        match self.peek() {
            Some(t) if t.text().eq_ignore_ascii_case(keyword) => {
                self.index += 1;
                true
            }
            _ => false,
        }
    }

    pub fn malformed(&self, expected: &str) -> Diagnostic {
        DiagnosticBuilder::new(self.node_span).build_malformed_stanza(self.stanza, expected)
    }

    pub fn expect(&mut self, what: &str) -> Result<&'a Token, Diagnostic> {
        self.advance().ok_or_else(|| self.malformed(what))
    }

    pub fn expect_ip(&mut self, what: &str) -> Result<(Ipv4Addr, Span), Diagnostic> {
        let token = self.expect(what)?;
        match token.text().parse() {
            Ok(ip) => Ok((ip, token.span())),
            Err(_) => Err(self.malformed(what)),
        }
    }

    /// An integer within `low..=high`. A non-integer is a malformed stanza;
    /// an integer outside the range is an out-of-range warning, and either
    /// way the caller skips committing the fact.
    pub fn expect_int_in(
        &mut self,
        what: &str,
        low: u64,
        high: u64,
    ) -> Result<(u64, Span), Diagnostic> {
        let token = self.expect(what)?;
        let value: u64 = token
            .text()
            .parse()
            .map_err(|_| self.malformed(what))?;
        if value < low || value > high {
            return Err(DiagnosticBuilder::new(token.span())
                .build_value_out_of_range(what, token.text(), low, high));
        }
        Ok((value, token.span()))
    }

    pub fn expect_action(&mut self) -> Result<LineAction, Diagnostic> {
        let token = self.expect("`permit` or `deny`")?;
        match token.text().to_ascii_lowercase().as_str() {
            "permit" => Ok(LineAction::Permit),
            "deny" => Ok(LineAction::Deny),
            _ => Err(self.malformed("`permit` or `deny`")),
        }
    }

    /// The remaining tokens joined by single spaces (description texts,
    /// remarks).
    pub fn rest_text(&mut self) -> String {
        let words: Vec<&str> = self.tokens[self.index..].iter().map(|t| t.text()).collect();
        self.index = self.tokens.len();
        words.join(" ")
    }
}

/// An AS number in asplain (`65000`) or asdot (`64512.42`) notation. Both
/// halves of the asdot form are 16-bit.
pub(super) fn parse_asn(text: &str) -> Option<u32> {
    match text.split_once('.') {
        None => text.parse().ok(),
        Some((high, low)) => {
            let high: u32 = high.parse().ok().filter(|v| *v <= 0xffff)?;
            let low: u32 = low.parse().ok().filter(|v| *v <= 0xffff)?;
            Some((high << 16) | low)
        }
    }
}

/// `a.b.c.d/len` notation.
pub(super) fn parse_prefix(text: &str) -> Option<Prefix> {
    let (address, length) = text.split_once('/')?;
    let address: Ipv4Addr = address.parse().ok()?;
    let length: u8 = length.parse().ok().filter(|l| *l <= 32)?;
    Some(Prefix::new(address, length))
}

/// An OSPF area, written decimal (`0`) or dotted-quad (`0.0.0.0`).
pub(super) fn parse_area(text: &str) -> Option<u32> {
    if let Ok(ip) = text.parse::<Ipv4Addr>() {
        return Some(u32::from(ip));
    }
    text.parse().ok()
}

/// A community value: `asn:value` or one of the well-known names.
pub(super) fn parse_community(text: &str) -> Option<Community> {
    match text.to_ascii_lowercase().as_str() {
        "no-export" => return Some(Community::NoExport),
        "no-advertise" => return Some(Community::NoAdvertise),
        _ => {}
    }
    let (high, low) = text.split_once(':')?;
    let high: u32 = high.parse().ok().filter(|v| *v <= 0xffff)?;
    let low: u32 = low.parse().ok().filter(|v| *v <= 0xffff)?;
    Some(Community::Value((high << 16) | low))
}
