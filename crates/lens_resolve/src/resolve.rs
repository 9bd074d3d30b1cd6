//! Path resolution - walks segments against the type model

use std::ops::ControlFlow;

use lens_ast::{Method, Path, PathSegment, PathVisitor, Property};
use lens_lexer::Span;

use crate::model::{LensMode, TypeModel};

/// A segment that resolved to a member
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStep<T> {
    pub segment_index: usize,
    /// Declared type of the field, or return type of the method
    pub member_type: T,
}

/// Successful resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPath<T> {
    pub steps: Vec<ResolvedStep<T>>,
    /// Index of the segment whose type could not be inspected further.
    /// Segments after it were not checked.
    pub opaque_at: Option<usize>,
}

impl<T> ResolvedPath<T> {
    /// Type of the last resolved member
    pub fn final_type(&self) -> Option<&T> {
        self.steps.last().map(|s| &s.member_type)
    }

    /// Whether every segment of `path` was looked up
    pub fn covers(&self, path: &Path) -> bool {
        self.steps.len() == path.len()
    }
}

/// First segment that does not exist
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionFailure<T> {
    pub failing_segment_index: usize,
    pub failing_segment: PathSegment,
    /// The type the missing member was looked up on
    pub last_resolved_type: T,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome<T> {
    Resolved(ResolvedPath<T>),
    Failed(ResolutionFailure<T>),
}

impl<T> ResolutionOutcome<T> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolutionOutcome::Resolved(_))
    }

    pub fn resolved(&self) -> Option<&ResolvedPath<T>> {
        match self {
            ResolutionOutcome::Resolved(r) => Some(r),
            ResolutionOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ResolutionFailure<T>> {
        match self {
            ResolutionOutcome::Resolved(_) => None,
            ResolutionOutcome::Failed(f) => Some(f),
        }
    }
}

/// A method call used as the target of a write lens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WritePositionViolation {
    pub segment_index: usize,
    pub name: String,
    pub span: Span,
}

/// Resolve `path` starting from `root`.
///
/// Stops at the first missing member. Stops successfully as soon as a member's
/// type is opaque to the model, since nothing past it can be proven wrong.
pub fn resolve<M: TypeModel>(path: &Path, root: M::Type, model: &M) -> ResolutionOutcome<M::Type> {
    let mut resolver = Resolver {
        model,
        current: root,
        index: 0,
        steps: Vec::with_capacity(path.len()),
        opaque_at: None,
        failure: None,
    };
    // Break only signals early exit; the reason is recorded on the resolver
    let _ = path.walk(&mut resolver);

    match resolver.failure {
        Some(failure) => ResolutionOutcome::Failed(failure),
        None => ResolutionOutcome::Resolved(ResolvedPath {
            steps: resolver.steps,
            opaque_at: resolver.opaque_at,
        }),
    }
}

/// Method calls cannot be assigned to, so a write lens must end in a property.
///
/// Only checked once every segment was looked up: a missing member is always
/// reported first, and a walk that stopped early at an opaque type never
/// reached the last segment.
pub fn check_write_position<T>(
    path: &Path,
    outcome: &ResolutionOutcome<T>,
    mode: LensMode,
) -> Option<WritePositionViolation> {
    if !mode.is_write() || !outcome.resolved().is_some_and(|r| r.covers(path)) {
        return None;
    }
    match path.last()? {
        PathSegment::Method(m) => Some(WritePositionViolation {
            segment_index: path.len() - 1,
            name: m.name.name.clone(),
            span: m.span,
        }),
        PathSegment::Property(_) => None,
    }
}

struct Resolver<'m, M: TypeModel> {
    model: &'m M,
    current: M::Type,
    index: usize,
    steps: Vec<ResolvedStep<M::Type>>,
    opaque_at: Option<usize>,
    failure: Option<ResolutionFailure<M::Type>>,
}

impl<M: TypeModel> Resolver<'_, M> {
    fn step(&mut self, segment: PathSegment, member_type: Option<M::Type>) -> ControlFlow<()> {
        let Some(member_type) = member_type else {
            tracing::debug!(
                segment = %segment,
                index = self.index,
                on = ?self.current,
                "lens path segment not found"
            );
            self.failure = Some(ResolutionFailure {
                failing_segment_index: self.index,
                failing_segment: segment,
                last_resolved_type: self.current.clone(),
            });
            return ControlFlow::Break(());
        };

        tracing::trace!(segment = %segment, ty = ?member_type, "lens path segment resolved");
        let nested = self.model.resolve_nested_type(&member_type);
        self.steps.push(ResolvedStep { segment_index: self.index, member_type });

        match nested {
            Some(ty) => {
                self.current = ty;
                self.index += 1;
                ControlFlow::Continue(())
            }
            None => {
                tracing::debug!(segment = %segment, index = self.index, "stopping at opaque type");
                self.opaque_at = Some(self.index);
                ControlFlow::Break(())
            }
        }
    }
}

impl<M: TypeModel> PathVisitor for Resolver<'_, M> {
    fn visit_property(&mut self, property: &Property) -> ControlFlow<()> {
        let member_type = self
            .model
            .find_field(&self.current, &property.name.name)
            .map(|field| self.model.type_of_field(&field));
        self.step(PathSegment::Property(property.clone()), member_type)
    }

    fn visit_method(&mut self, method: &Method) -> ControlFlow<()> {
        let member_type = self
            .model
            .find_method(&self.current, &method.name.name)
            .map(|m| self.model.type_of_method_return(&m));
        self.step(PathSegment::Method(method.clone()), member_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{TypeDef, TypeTable};
    use lens_parser::parse;

    fn model() -> TypeTable {
        TypeTable::new()
            .with_type(
                "Person",
                TypeDef::class()
                    .field("name", "String")
                    .field("address", "Address")
                    .field("tags", "java.util.List<String>")
                    .static_field("INSTANCES", "int")
                    .method("home", "Address")
                    .method_with_params("friend", "Person", &["int"])
                    .static_method("create", "Person"),
            )
            .with_type(
                "Address",
                TypeDef::class().field("city", "City").method("city", "City").method("street", "String"),
            )
            .with_type("City", TypeDef::class().field("zip", "String"))
    }

    fn root() -> String {
        "Person".to_string()
    }

    #[test]
    fn test_resolves_nested_properties() {
        let outcome = resolve(&parse("address.city.zip"), root(), &model());
        let resolved = outcome.resolved().unwrap();
        let types: Vec<_> = resolved.steps.iter().map(|s| s.member_type.as_str()).collect();
        assert_eq!(types, vec!["Address", "City", "String"]);
        assert_eq!(resolved.opaque_at, Some(2));
        assert_eq!(resolved.final_type().map(String::as_str), Some("String"));
    }

    #[test]
    fn test_missing_root_member_fails_at_first_segment() {
        let outcome = resolve(&parse("z"), root(), &model());
        let failure = outcome.failure().unwrap();
        assert_eq!(failure.failing_segment_index, 0);
        assert_eq!(failure.failing_segment.name(), "z");
        assert_eq!(failure.last_resolved_type, "Person");
    }

    #[test]
    fn test_missing_nested_member_reports_containing_type() {
        let outcome = resolve(&parse("address.country.code"), root(), &model());
        let failure = outcome.failure().unwrap();
        assert_eq!(failure.failing_segment_index, 1);
        assert_eq!(failure.last_resolved_type, "Address");
        assert_eq!(failure.failing_segment.span(), Span::new(8, 15));
    }

    #[test]
    fn test_methods_resolve_through_return_type() {
        let outcome = resolve(&parse("home().city().zip"), root(), &model());
        assert!(outcome.is_resolved());
    }

    #[test]
    fn test_property_and_method_lookups_are_separate() {
        // `street` is only a method on Address
        let outcome = resolve(&parse("address.street"), root(), &model());
        let failure = outcome.failure().unwrap();
        assert!(!failure.failing_segment.is_method());

        // `name` is only a field on Person
        let outcome = resolve(&parse("name()"), root(), &model());
        assert!(outcome.failure().unwrap().failing_segment.is_method());
    }

    #[test]
    fn test_static_and_parameterised_members_are_invisible() {
        for path in ["INSTANCES", "create()", "friend()"] {
            let outcome = resolve(&parse(path), root(), &model());
            assert!(!outcome.is_resolved(), "{path} should not resolve");
        }
    }

    #[test]
    fn test_opaque_type_stops_resolution() {
        // the List type is not in the table, so `whatever` is never checked
        let path = parse("tags.whatever.else");
        let outcome = resolve(&path, root(), &model());
        let resolved = outcome.resolved().unwrap();
        assert_eq!(resolved.opaque_at, Some(0));
        assert_eq!(resolved.steps.len(), 1);
        assert!(!resolved.covers(&path));
    }

    #[test]
    fn test_write_position_rejects_trailing_method() {
        let path = parse("address.city()");
        let outcome = resolve(&path, root(), &model());
        assert!(outcome.is_resolved());

        let violation = check_write_position(&path, &outcome, LensMode::Write).unwrap();
        assert_eq!(violation.segment_index, 1);
        assert_eq!(violation.name, "city");
        assert_eq!(violation.span, Span::new(8, 14));

        assert_eq!(check_write_position(&path, &outcome, LensMode::Read), None);
    }

    #[test]
    fn test_write_position_allows_method_before_property() {
        let path = parse("home().city");
        let outcome = resolve(&path, root(), &model());
        assert_eq!(check_write_position(&path, &outcome, LensMode::Write), None);
    }

    #[test]
    fn test_lookup_failure_takes_precedence_over_write_position() {
        let path = parse("address.missing()");
        let outcome = resolve(&path, root(), &model());
        assert!(outcome.failure().is_some());
        assert_eq!(check_write_position(&path, &outcome, LensMode::Write), None);
    }

    #[test]
    fn test_write_position_skipped_after_early_opaque_stop() {
        // `size()` is never looked up: the walk stops at the opaque `tags`
        let path = parse("tags.size()");
        let outcome = resolve(&path, root(), &model());
        assert!(outcome.is_resolved());
        assert_eq!(check_write_position(&path, &outcome, LensMode::Write), None);
    }

    #[test]
    fn test_write_position_checked_when_last_segment_is_opaque() {
        // `zip()` returns String, which is opaque, but it was looked up
        let model = model().with_type("City", TypeDef::class().method("zip", "String"));
        let path = parse("address.city.zip()");
        let outcome = resolve(&path, root(), &model);
        assert_eq!(outcome.resolved().and_then(|r| r.opaque_at), Some(2));

        let violation = check_write_position(&path, &outcome, LensMode::Write).unwrap();
        assert_eq!(violation.segment_index, 2);
        assert_eq!(violation.span, Span::new(13, 18));
    }

    #[test]
    fn test_empty_path_resolves_trivially() {
        let outcome = resolve(&Path::default(), root(), &model());
        assert_eq!(outcome.resolved().map(|r| r.steps.len()), Some(0));
    }
}
