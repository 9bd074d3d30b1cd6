mod model;
mod resolve;
mod table;

pub use model::{LensMode, TypeModel};
pub use resolve::{
    check_write_position, resolve, ResolutionFailure, ResolutionOutcome, ResolvedPath, ResolvedStep,
    WritePositionViolation,
};
pub use table::{FieldDef, MethodDef, TypeDef, TypeKind, TypeTable};
