use lens_lexer::Span;

use crate::messages::{self, message};

/// Problem found in a lens declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LensDiagnostic {
    BlankPath,
    PropertyNotFound {
        segment_name: String,
        span: Span,
        containing_type_name: String,
    },
    MethodNotFound {
        segment_name: String,
        span: Span,
        containing_type_name: String,
    },
    MethodNotAllowedAtWritePosition {
        segment_name: String,
        span: Span,
    },
}

impl LensDiagnostic {
    /// Where to point in the host document; `None` means the whole literal
    pub fn span(&self) -> Option<Span> {
        match self {
            LensDiagnostic::BlankPath => None,
            LensDiagnostic::PropertyNotFound { span, .. }
            | LensDiagnostic::MethodNotFound { span, .. }
            | LensDiagnostic::MethodNotAllowedAtWritePosition { span, .. } => Some(*span),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            LensDiagnostic::BlankPath => messages::PATH_BLANK,
            LensDiagnostic::PropertyNotFound { .. } => messages::PROPERTY_NOT_EXIST,
            LensDiagnostic::MethodNotFound { .. } => messages::METHOD_NOT_EXIST,
            LensDiagnostic::MethodNotAllowedAtWritePosition { .. } => messages::METHOD_AT_WRITE_POSITION,
        }
    }

    pub fn message(&self) -> String {
        match self {
            LensDiagnostic::BlankPath => message(self.key(), &[]),
            LensDiagnostic::PropertyNotFound { segment_name, containing_type_name, .. }
            | LensDiagnostic::MethodNotFound { segment_name, containing_type_name, .. } => {
                message(self.key(), &[segment_name, containing_type_name])
            }
            LensDiagnostic::MethodNotAllowedAtWritePosition { segment_name, .. } => {
                message(self.key(), &[segment_name])
            }
        }
    }

    /// Move the span by `offset` bytes
    pub fn shifted(self, offset: usize) -> Self {
        match self {
            LensDiagnostic::BlankPath => LensDiagnostic::BlankPath,
            LensDiagnostic::PropertyNotFound { segment_name, span, containing_type_name } => {
                LensDiagnostic::PropertyNotFound {
                    segment_name,
                    span: span.shift(offset),
                    containing_type_name,
                }
            }
            LensDiagnostic::MethodNotFound { segment_name, span, containing_type_name } => {
                LensDiagnostic::MethodNotFound {
                    segment_name,
                    span: span.shift(offset),
                    containing_type_name,
                }
            }
            LensDiagnostic::MethodNotAllowedAtWritePosition { segment_name, span } => {
                LensDiagnostic::MethodNotAllowedAtWritePosition { segment_name, span: span.shift(offset) }
            }
        }
    }
}

impl std::fmt::Display for LensDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.span() {
            Some(span) => write!(f, "{} at {}..{}", self.message(), span.start, span.end),
            None => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for LensDiagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let d = LensDiagnostic::PropertyNotFound {
            segment_name: "zip".into(),
            span: Span::new(5, 8),
            containing_type_name: "City".into(),
        };
        assert_eq!(d.to_string(), "Property 'zip' does not exist in type 'City' at 5..8");
        assert_eq!(LensDiagnostic::BlankPath.to_string(), "Lens path is blank");
    }

    #[test]
    fn test_shifted() {
        let d = LensDiagnostic::MethodNotAllowedAtWritePosition {
            segment_name: "get".into(),
            span: Span::new(2, 7),
        };
        assert_eq!(d.shifted(10).span(), Some(Span::new(12, 17)));
        assert_eq!(LensDiagnostic::BlankPath.shifted(10).span(), None);
    }
}
