use crate::diagnostic::Span;
use thiserror::Error;

/// Production-kind tag for a parse-tree node.
///
/// The generated grammars this core consumes define one context class per
/// production; here that finite set collapses into a single tag, so a `match`
/// in the listener shows at a glance which kinds are handled and the compiler
/// flags the rest. Constructs the grammar recognizes but the extraction does
/// not process arrive as [`Rule::Null`], with the introducing keyword as the
/// node's first token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Root of every tree.
    Configuration,

    Hostname,
    Vlan,
    VlanName,

    Interface,
    IfDescription,
    IfIpAddress,
    IfShutdown,
    IfNoShutdown,
    IfBandwidth,
    IfMtu,
    IfVrfForwarding,
    IfIpAccessGroup,
    IfSwitchportAccessVlan,

    StandardAcl,
    StandardAclLine,
    ExtendedAcl,
    ExtendedAclLine,
    AclRemark,
    ObjectGroupNetwork,
    NetworkObject,
    GroupObject,
    PrefixListLine,

    RouteMapClause,
    RmMatchIpAccessList,
    RmMatchIpPrefixList,
    RmSetMetric,
    RmSetLocalPreference,
    RmSetCommunity,

    RouterBgp,
    BgpRouterId,
    BgpNetwork,
    BgpNeighborRemoteAs,
    BgpNeighborDescription,
    BgpNeighborUpdateSource,
    BgpNeighborRouteMap,
    BgpNeighborShutdown,

    RouterOspf,
    OspfRouterId,
    OspfNetwork,
    OspfPassiveInterface,

    IpRoute,
    NtpServer,
    LoggingHost,
    SnmpCommunity,

    /// Recognized-but-unprocessed stanza (a null production).
    Null,
}

/// A terminal picked out of the token stream by the external parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    text: String,
    span: Span,
}

impl Token {
    pub fn new(text: impl Into<String>, span: impl Into<Span>) -> Self {
        Self {
            text: text.into(),
            span: span.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseChild {
    Rule(ParseNode),
    Token(Token),
    /// A terminal the parser emitted while recovering from a syntax error.
    Error(Token),
}

impl From<ParseNode> for ParseChild {
    fn from(node: ParseNode) -> Self {
        ParseChild::Rule(node)
    }
}

impl From<Token> for ParseChild {
    fn from(token: Token) -> Self {
        ParseChild::Token(token)
    }
}

/// One grammar-production instance. Built once by the upstream parser (or the
/// [`TreeBuilder`]), never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNode {
    rule: Rule,
    span: Span,
    children: Vec<ParseChild>,
}

impl ParseNode {
    pub fn new(rule: Rule, span: impl Into<Span>, children: Vec<ParseChild>) -> Self {
        Self {
            rule,
            span: span.into(),
            children,
        }
    }

    pub fn rule(&self) -> Rule {
        self.rule
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn children(&self) -> &[ParseChild] {
        &self.children
    }

    /// The node's direct token children, in source order. Rule children are
    /// not descended into; the walker owns recursion.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.children.iter().filter_map(|c| match c {
            ParseChild::Token(t) => Some(t),
            _ => None,
        })
    }

    pub fn first_token(&self) -> Option<&Token> {
        self.tokens().next()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeBuildError {
    #[error("close would pop the root node")]
    CloseOnRoot,
    #[error("finish called with {0} unclosed nodes")]
    UnclosedNodes(usize),
}

/// Stack-driven construction for [`ParseNode`] trees, for the upstream parser
/// integration and for tests. `open` starts a node, `token`/`error_token`
/// append terminals to the innermost open node, `close` finishes it.
#[derive(Debug)]
pub struct TreeBuilder {
    stack: Vec<ParseNode>,
}

impl TreeBuilder {
    pub fn new(root: Rule, span: impl Into<Span>) -> Self {
        Self {
            stack: vec![ParseNode::new(root, span, Vec::new())],
        }
    }

    pub fn open(&mut self, rule: Rule, span: impl Into<Span>) -> &mut Self {
        self.stack.push(ParseNode::new(rule, span, Vec::new()));
        self
    }

    pub fn token(&mut self, text: impl Into<String>, span: impl Into<Span>) -> &mut Self {
        self.push_child(ParseChild::Token(Token::new(text, span)));
        self
    }

    pub fn error_token(&mut self, text: impl Into<String>, span: impl Into<Span>) -> &mut Self {
        self.push_child(ParseChild::Error(Token::new(text, span)));
        self
    }

    pub fn close(&mut self) -> Result<&mut Self, TreeBuildError> {
        if self.stack.len() == 1 {
            return Err(TreeBuildError::CloseOnRoot);
        }
        let node = self.stack.pop().expect("stack holds at least the root");
        self.push_child(ParseChild::Rule(node));
        Ok(self)
    }

    pub fn finish(mut self) -> Result<ParseNode, TreeBuildError> {
        match self.stack.len() {
            1 => Ok(self.stack.pop().expect("stack holds exactly the root")),
            n => Err(TreeBuildError::UnclosedNodes(n - 1)),
        }
    }

    fn push_child(&mut self, child: ParseChild) {
        self.stack
            .last_mut()
            .expect("stack holds at least the root")
            .children
            .push(child);
    }
}
