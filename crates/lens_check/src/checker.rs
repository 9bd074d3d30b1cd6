use lens_ast::PathSegment;
use lens_parser::Parser;
use lens_resolve::{check_write_position, resolve, LensMode, ResolutionOutcome, TypeModel};
use serde::{Deserialize, Serialize};

use crate::diagnostic::LensDiagnostic;

/// A lens path as written on a declaration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LensDeclaration {
    pub path: String,
    #[serde(default)]
    pub mode: LensMode,
    /// Byte offset of the path's first character in the host document
    #[serde(default)]
    pub offset: usize,
}

impl LensDeclaration {
    pub fn read(path: impl Into<String>) -> Self {
        Self { path: path.into(), mode: LensMode::Read, offset: 0 }
    }

    pub fn write(path: impl Into<String>) -> Self {
        Self { path: path.into(), mode: LensMode::Write, offset: 0 }
    }

    pub fn at(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// Receives diagnostics as they are produced
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: LensDiagnostic);
}

impl DiagnosticSink for Vec<LensDiagnostic> {
    fn report(&mut self, diagnostic: LensDiagnostic) {
        self.push(diagnostic);
    }
}

/// Checks lens declarations against a type model
pub struct LensChecker<'m, M: TypeModel> {
    model: &'m M,
}

impl<'m, M: TypeModel> LensChecker<'m, M> {
    pub fn new(model: &'m M) -> Self {
        Self { model }
    }

    /// Check every declaration on `root`, one entry per declaration.
    ///
    /// `None` when `root` cannot host lenses, in which case nothing is checked.
    pub fn inspect(&self, root: &M::Type, lenses: &[LensDeclaration]) -> Option<Vec<Vec<LensDiagnostic>>> {
        if !self.model.is_lens_host(root) {
            tracing::debug!(root = ?root, "skipping lens checks on non-host type");
            return None;
        }
        Some(lenses.iter().map(|lens| self.check(root, lens)).collect())
    }

    pub fn check(&self, root: &M::Type, lens: &LensDeclaration) -> Vec<LensDiagnostic> {
        let mut diagnostics = Vec::new();
        self.check_into(root, lens, &mut diagnostics);
        diagnostics
    }

    /// Report at most one problem for `lens`: blank path, first missing
    /// member, or a method call in write position, in that order.
    pub fn check_into<S: DiagnosticSink + ?Sized>(&self, root: &M::Type, lens: &LensDeclaration, sink: &mut S) {
        if lens.path.trim().is_empty() {
            sink.report(LensDiagnostic::BlankPath);
            return;
        }

        let parsed = Parser::parse(&lens.path);
        let path = parsed.path;
        if path.is_empty() {
            return;
        }

        let outcome = resolve(&path, root.clone(), self.model);
        let diagnostic = match &outcome {
            ResolutionOutcome::Failed(failure) => {
                let containing_type_name = self.model.presentable_name(&failure.last_resolved_type);
                let segment_name = failure.failing_segment.name().to_string();
                let span = failure.failing_segment.span();
                match failure.failing_segment {
                    PathSegment::Property(_) => LensDiagnostic::PropertyNotFound {
                        segment_name,
                        span,
                        containing_type_name,
                    },
                    PathSegment::Method(_) => LensDiagnostic::MethodNotFound {
                        segment_name,
                        span,
                        containing_type_name,
                    },
                }
            }
            ResolutionOutcome::Resolved(_) => match check_write_position(&path, &outcome, lens.mode) {
                Some(violation) => LensDiagnostic::MethodNotAllowedAtWritePosition {
                    segment_name: violation.name,
                    span: violation.span,
                },
                None => return,
            },
        };

        sink.report(diagnostic.shifted(lens.offset));
    }
}
