//! Syntax highlighting for lens path literals

use std::ops::ControlFlow;

use lens_ast::{Method, Path, PathVisitor, Property, Separator};
use lens_lexer::Span;
use lens_parser::parse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightKind {
    /// Property name
    Field,
    /// Method name
    Method,
    /// The `()` after a method name
    Call,
    Dot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub span: Span,
    pub kind: HighlightKind,
}

/// Highlights for `source`, shifted by `offset` into host coordinates
pub fn highlight(source: &str, offset: usize) -> Vec<Highlight> {
    if source.trim().is_empty() {
        return Vec::new();
    }
    highlight_path(&parse(source), offset)
}

pub fn highlight_path(path: &Path, offset: usize) -> Vec<Highlight> {
    let mut collector = HighlightCollector { offset, highlights: Vec::new() };
    let _ = path.walk(&mut collector);
    collector.highlights
}

struct HighlightCollector {
    offset: usize,
    highlights: Vec<Highlight>,
}

impl HighlightCollector {
    fn push(&mut self, span: Span, kind: HighlightKind) -> ControlFlow<()> {
        self.highlights.push(Highlight { span: span.shift(self.offset), kind });
        ControlFlow::Continue(())
    }
}

impl PathVisitor for HighlightCollector {
    fn visit_property(&mut self, property: &Property) -> ControlFlow<()> {
        self.push(property.name.span, HighlightKind::Field)
    }

    fn visit_method(&mut self, method: &Method) -> ControlFlow<()> {
        self.push(method.name.span, HighlightKind::Method)?;
        self.push(method.call_span(), HighlightKind::Call)
    }

    fn visit_separator(&mut self, separator: &Separator) -> ControlFlow<()> {
        self.push(separator.span, HighlightKind::Dot)
    }
}
