use codespan_reporting::{
    diagnostic::{Label, Severity},
    term,
};

use crate::diagnostic::{Code, Diagnostic, Severity as DiagnosticSeverity};

fn to_codespan(d: &Diagnostic) -> codespan_reporting::diagnostic::Diagnostic<()> {
    let severity = match d.severity() {
        DiagnosticSeverity::Info => Severity::Note,
        DiagnosticSeverity::Warning => Severity::Warning,
        DiagnosticSeverity::Error => Severity::Error,
    };

    let mut labels = Vec::with_capacity(1 + d.additional_spans_len());

    labels.push({
        let mut l = Label::primary((), *d.main_span());
        if let Some(m) = d.main_span_message() {
            l = l.with_message(m);
        }
        l
    });

    for (span, message) in d.additional_spans() {
        let mut l = Label::secondary((), *span);
        if let Some(m) = message {
            l = l.with_message(m);
        }
        labels.push(l);
    }

    let mut diagnostic = codespan_reporting::diagnostic::Diagnostic::new(severity)
        .with_message(d.message())
        .with_labels(labels);

    if d.code() != &Code::Unspecified {
        diagnostic = diagnostic.with_code(d.code().to_string())
    }

    diagnostic
}

/// Renders diagnostics to any [`WriteColor`] sink.
///
/// [`WriteColor`]: term::termcolor::WriteColor
pub fn write_diagnostics<'files, F>(
    writer: &mut dyn term::termcolor::WriteColor,
    diagnostics: &[Diagnostic],
    files: &'files F,
) where
    F: codespan_reporting::files::Files<'files, FileId = ()>,
{
    let config = term::Config {
        chars: term::Chars {
            single_primary_caret: '─',
            single_secondary_caret: '─',
            multi_primary_caret_start: '╯',
            multi_secondary_caret_start: '╯',
            multi_primary_caret_end: '╯',
            multi_secondary_caret_end: '╯',
            ..term::Chars::box_drawing()
        },

        ..Default::default()
    };

    for d in diagnostics {
        term::emit(writer, &config, files, &to_codespan(d)).unwrap();
    }
}

/// Renders diagnostics to stderr, colored when the terminal supports it.
pub fn eprint_diagnostics<'files, F>(diagnostics: &[Diagnostic], files: &'files F)
where
    F: codespan_reporting::files::Files<'files, FileId = ()>,
{
    let mut writer = term::termcolor::StandardStream::stderr(term::termcolor::ColorChoice::Auto);
    write_diagnostics(&mut writer, diagnostics, files);
}
