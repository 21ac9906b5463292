use super::{Code, Diagnostic, Severity, Span};

pub struct DiagnosticBuilder {
    span: Span,
    additional_spans: Vec<(Span, Option<String>)>,
}

impl DiagnosticBuilder {
    pub fn new(span: impl Into<Span>) -> Self {
        Self {
            span: span.into(),
            additional_spans: Vec::new(),
        }
    }

    pub fn with_additional_span(mut self, span: impl Into<Span>, message: Option<String>) -> Self {
        self.add_additional_span(span, message);
        self
    }

    pub fn add_additional_span(&mut self, span: impl Into<Span>, message: Option<String>) {
        self.additional_spans.push((span.into(), message));
    }

    fn build_custom(self, code: Code, severity: Severity, message: String) -> Diagnostic {
        Diagnostic {
            code,
            severity,
            message,
            main_span: (self.span, None),
            additional_spans: self.additional_spans,
        }
    }

    /// For error nodes the external parser recovered from. The walk goes on;
    /// the offending text is only quoted back at the user.
    pub fn build_syntax_error(self, offending: &str) -> Diagnostic {
        let message = if offending.is_empty() {
            "unrecognized input".to_owned()
        } else {
            format!("unrecognized input: `{offending}`")
        };
        self.build_custom(Code::SyntaxError, Severity::Error, message)
    }

    /// A recognized stanza whose operands don't have the expected shape
    /// (missing operand, unparseable address, ...). The stanza's fact is not
    /// committed to the model.
    pub fn build_malformed_stanza(self, stanza: &str, expected: &str) -> Diagnostic {
        let message = format!("malformed `{stanza}`: expected {expected}");
        self.build_custom(Code::MalformedStanza, Severity::Error, message)
    }

    pub fn build_redefinition(mut self, kind: &str, name: &str, original: Span) -> Diagnostic {
        self.add_additional_span(original, Some("first defined here".to_owned()));
        let message = format!("{kind} `{name}` is defined more than once; the later definition replaces the earlier one");
        self.build_custom(Code::Redefinition, Severity::Warning, message)
    }

    pub fn build_duplicate_clause(mut self, map: &str, seq: u16, original: Span) -> Diagnostic {
        self.add_additional_span(original, Some("clause first opened here".to_owned()));
        let message =
            format!("route-map `{map}` already has a clause numbered {seq}; entries are merged into the original clause");
        self.build_custom(Code::DuplicateClause, Severity::Warning, message)
    }

    pub fn build_unresolved_reference(
        self,
        kind: &str,
        name: &str,
        context: &str,
        required: bool,
    ) -> Diagnostic {
        let severity = if required {
            Severity::Error
        } else {
            Severity::Warning
        };
        let message = format!("{context} references undefined {kind} `{name}`");
        self.build_custom(Code::UnresolvedReference, severity, message)
    }

    pub fn build_value_out_of_range(self, what: &str, value: &str, low: u64, high: u64) -> Diagnostic {
        let message = format!("{what} `{value}` is outside the legal range {low}..={high}");
        self.build_custom(Code::ValueOutOfRange, Severity::Warning, message)
    }

    pub fn build_deprecated_form(self, found: &str, replacement: &str) -> Diagnostic {
        let message = format!("`{found}` is a deprecated form; use `{replacement}`");
        self.build_custom(Code::DeprecatedForm, Severity::Warning, message)
    }

    pub fn build_ignored_stanza(self, keyword: &str) -> Diagnostic {
        let message = format!("`{keyword}` stanza is recognized but carries no configuration facts");
        self.build_custom(Code::IgnoredStanza, Severity::Info, message)
    }
}
