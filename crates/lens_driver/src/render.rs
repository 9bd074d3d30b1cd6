//! Terminal reports for lens diagnostics

use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};
use lens_check::LensDiagnostic;
use lens_parser::ParseError;

/// Print `diagnostic` against the path text it was found in.
///
/// `offset` is subtracted from the diagnostic span, undoing the shift into
/// host coordinates.
pub fn report_diagnostic(
    name: &str,
    source: &str,
    offset: usize,
    diagnostic: &LensDiagnostic,
) -> std::io::Result<()> {
    let range = match diagnostic.span() {
        Some(span) => clamp(span.start.saturating_sub(offset)..span.end.saturating_sub(offset), source),
        None => 0..source.len(),
    };
    let label = match diagnostic {
        LensDiagnostic::BlankPath => "path is empty",
        LensDiagnostic::PropertyNotFound { .. } => "no such property",
        LensDiagnostic::MethodNotFound { .. } => "no such method",
        LensDiagnostic::MethodNotAllowedAtWritePosition { .. } => "cannot assign through a method call",
    };

    Report::build(ReportKind::Error, name, range.start)
        .with_code(diagnostic.key())
        .with_message(diagnostic.message())
        .with_label(
            Label::new((name, range))
                .with_message(label)
                .with_color(Color::Red),
        )
        .finish()
        .eprint((name, Source::from(source.to_string())))
}

/// Warn that only a prefix of the input was usable
pub fn report_recovery(name: &str, source: &str, kept: &str, error: &ParseError) -> std::io::Result<()> {
    let range = clamp(error.span.range(), source);
    let note = if kept.is_empty() {
        "no segment could be parsed".to_string()
    } else {
        format!("only '{}' is used", kept)
    };

    Report::build(ReportKind::Warning, name, range.start)
        .with_message(&error.message)
        .with_label(
            Label::new((name, range))
                .with_message("path is not well-formed from here")
                .with_color(Color::Yellow),
        )
        .with_note(note)
        .finish()
        .eprint((name, Source::from(source.to_string())))
}

fn clamp(range: Range<usize>, source: &str) -> Range<usize> {
    let end = range.end.min(source.len());
    range.start.min(end)..end
}
