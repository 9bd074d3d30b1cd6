mod checker;
mod diagnostic;
mod highlight;
pub mod messages;

pub use checker::{DiagnosticSink, LensChecker, LensDeclaration};
pub use diagnostic::LensDiagnostic;
pub use highlight::{highlight, highlight_path, Highlight, HighlightKind};
pub use lens_resolve::LensMode;
