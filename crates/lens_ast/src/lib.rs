use std::ops::ControlFlow;

use lens_lexer::Span;

/// Identifier with its span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: String, span: Span) -> Self {
        Self { name, span }
    }
}

/// Plain property access: `city`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: Ident,
    pub span: Span,
}

/// Zero-argument method call: `total()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: Ident,
    /// Covers the name and the trailing `()`
    pub span: Span,
}

impl Method {
    /// Span of the `()` suffix
    pub fn call_span(&self) -> Span {
        Span::new(self.name.span.end, self.span.end)
    }
}

/// The `.` between two segments. Only used for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Separator {
    pub span: Span,
}

/// One step of a lens path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Property(Property),
    Method(Method),
}

impl PathSegment {
    pub fn property(name: &str, start: usize) -> Self {
        let span = Span::new(start, start + name.len());
        PathSegment::Property(Property { name: Ident::new(name.to_string(), span), span })
    }

    pub fn method(name: &str, start: usize) -> Self {
        let name_span = Span::new(start, start + name.len());
        PathSegment::Method(Method {
            name: Ident::new(name.to_string(), name_span),
            span: Span::new(start, name_span.end + 2),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            PathSegment::Property(p) => &p.name.name,
            PathSegment::Method(m) => &m.name.name,
        }
    }

    /// Full span of the segment, including `()` for methods
    pub fn span(&self) -> Span {
        match self {
            PathSegment::Property(p) => p.span,
            PathSegment::Method(m) => m.span,
        }
    }

    /// Span of the identifier only
    pub fn name_span(&self) -> Span {
        match self {
            PathSegment::Property(p) => p.name.span,
            PathSegment::Method(m) => m.name.span,
        }
    }

    pub fn is_method(&self) -> bool {
        matches!(self, PathSegment::Method(_))
    }

    /// Dispatch to the matching visitor method
    pub fn accept<V: PathVisitor + ?Sized>(&self, visitor: &mut V) -> ControlFlow<()> {
        match self {
            PathSegment::Property(p) => visitor.visit_property(p),
            PathSegment::Method(m) => visitor.visit_method(m),
        }
    }
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathSegment::Property(p) => write!(f, "{}", p.name.name),
            PathSegment::Method(m) => write!(f, "{}()", m.name.name),
        }
    }
}

/// Traversal over the segments of a path, in source order.
///
/// Returning `ControlFlow::Break` from any method stops the walk.
pub trait PathVisitor {
    fn visit_property(&mut self, property: &Property) -> ControlFlow<()>;

    fn visit_method(&mut self, method: &Method) -> ControlFlow<()>;

    fn visit_separator(&mut self, _separator: &Separator) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// A parsed lens path.
///
/// Holds the segments in order plus the separators between them, so a path
/// with `n` segments has `n - 1` separators. Paths are never mutated after
/// parsing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    segments: Vec<PathSegment>,
    separators: Vec<Separator>,
}

impl Path {
    /// `None` unless there is exactly one separator between each pair of
    /// segments
    pub fn new(segments: Vec<PathSegment>, separators: Vec<Separator>) -> Option<Self> {
        if separators.len() != segments.len().saturating_sub(1) {
            return None;
        }
        Some(Self { segments, separators })
    }

    /// Build a path from segments, placing a one-byte separator right after
    /// each segment but the last.
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        let separators = segments
            .iter()
            .take(segments.len().saturating_sub(1))
            .map(|s| Separator { span: Span::new(s.span().end, s.span().end + 1) })
            .collect();
        Self { segments, separators }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn separators(&self) -> &[Separator] {
        &self.separators
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn first(&self) -> Option<&PathSegment> {
        self.segments.first()
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathSegment> {
        self.segments.iter()
    }

    /// Span from the start of the first segment to the end of the last
    pub fn span(&self) -> Option<Span> {
        match (self.segments.first(), self.segments.last()) {
            (Some(first), Some(last)) => Some(first.span().to(last.span())),
            _ => None,
        }
    }

    /// Walk segments and separators in source order
    pub fn walk<V: PathVisitor + ?Sized>(&self, visitor: &mut V) -> ControlFlow<()> {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                visitor.visit_separator(&self.separators[i - 1])?;
            }
            segment.accept(visitor)?;
        }
        ControlFlow::Continue(())
    }

    pub fn pretty_print(&self) -> String {
        let mut out = format!("Path \"{}\"\n", self);
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                let sep = self.separators[i - 1].span;
                out.push_str(&format!("  Dot @{}..{}\n", sep.start, sep.end));
            }
            let span = segment.span();
            match segment {
                PathSegment::Property(p) => {
                    out.push_str(&format!("  Property {} @{}..{}\n", p.name.name, span.start, span.end));
                }
                PathSegment::Method(m) => {
                    out.push_str(&format!("  Method {}() @{}..{}\n", m.name.name, span.start, span.end));
                }
            }
        }
        out
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathSegment;
    type IntoIter = std::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
