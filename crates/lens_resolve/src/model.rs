//! The type model capability the resolver depends on

use serde::{Deserialize, Serialize};

/// Member lookup over the host's type system.
///
/// `Type` is an opaque handle: the resolver only clones it and hands it back.
pub trait TypeModel {
    type Type: Clone + std::fmt::Debug;
    type Field;
    type Method;

    /// Non-static field named `name` declared on `ty`
    fn find_field(&self, ty: &Self::Type, name: &str) -> Option<Self::Field>;

    /// Non-static, zero-argument method named `name` declared on `ty`
    fn find_method(&self, ty: &Self::Type, name: &str) -> Option<Self::Method>;

    fn type_of_field(&self, field: &Self::Field) -> Self::Type;

    fn type_of_method_return(&self, method: &Self::Method) -> Self::Type;

    /// The inspectable form of `ty`, or `None` when its members cannot be
    /// looked into (library, generic or otherwise foreign types).
    fn resolve_nested_type(&self, ty: &Self::Type) -> Option<Self::Type>;

    /// Name used in diagnostics
    fn presentable_name(&self, ty: &Self::Type) -> String;

    /// Whether lens declarations on `ty` should be checked at all
    fn is_lens_host(&self, _ty: &Self::Type) -> bool {
        true
    }
}

/// How a lens path is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LensMode {
    #[default]
    Read,
    /// The last segment is an assignment target
    Write,
}

impl LensMode {
    pub fn is_write(self) -> bool {
        self == LensMode::Write
    }
}

impl std::fmt::Display for LensMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LensMode::Read => write!(f, "read"),
            LensMode::Write => write!(f, "write"),
        }
    }
}
