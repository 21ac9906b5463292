use crate::structures::tree::{ParseChild, ParseNode, Token};

/// Hooks a tree walk drives. With the sum-typed [`Rule`] tag, the
/// one-method-pair-per-production surface of generated listener interfaces
/// collapses into `enter`/`exit` dispatched by a `match` in the
/// implementation; the `_` arm plays the role of the `enterAny`/`exitAny`
/// fallbacks.
///
/// [`Rule`]: crate::structures::tree::Rule
pub trait ParseTreeListener {
    fn enter(&mut self, _node: &ParseNode) {}
    fn exit(&mut self, _node: &ParseNode) {}
    fn visit_terminal(&mut self, _token: &Token) {}
    /// Called for terminals the external parser emitted while recovering
    /// from a syntax error.
    fn visit_error_node(&mut self, _token: &Token) {}
}

/// Depth-first traversal: `enter(N)`, then every child in source order
/// (rule children recursively, token children via `visit_terminal`, error
/// children via `visit_error_node`), then `exit(N)`.
///
/// The walker never touches the tree and has no failure path of its own; a
/// panicking listener hook propagates unchanged.
pub fn walk<L: ParseTreeListener + ?Sized>(node: &ParseNode, listener: &mut L) {
    listener.enter(node);
    for child in node.children() {
        match child {
            ParseChild::Rule(n) => walk(n, listener),
            ParseChild::Token(t) => listener.visit_terminal(t),
            ParseChild::Error(t) => listener.visit_error_node(t),
        }
    }
    listener.exit(node);
}
