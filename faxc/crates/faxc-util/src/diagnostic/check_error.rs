//! The checker's own error type: one variant per row of the error
//! taxonomy. The checker never prints or exits; it returns `Result<_,
//! CheckError>` and propagates with `?`. Only the driver renders one of
//! these to the user, via [`CheckError::render`].

use thiserror::Error;

use crate::span::SourceMap;
use crate::Span;

/// Every way the check pass can reject a unit.
///
/// The `#[error(...)]` message on each variant is the bare diagnostic
/// text; it deliberately excludes the file/line/column prefix, which
/// depends on a [`SourceMap`] the error itself doesn't carry. Use
/// [`CheckError::render`] to produce the full `error: <path>:<line>:<col>:
/// <message>` string.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("unresolved identifier `{name}`")]
    UnresolvedName { name: String, span: Span },

    #[error("type `{ty}` has no field `{field}`")]
    UnknownField { ty: String, field: String, span: Span },

    #[error("no label `{label}` in scope")]
    UnknownLabel { label: String, span: Span },

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String, span: Span },

    #[error("invalid cast from {from} to {to}")]
    InvalidCast { from: String, to: String, span: Span },

    #[error("condition must be of type bool, found {found}")]
    NonBooleanCondition { found: String, span: Span },

    #[error("argument {index} has type {found}, expected {expected}")]
    ArgumentMismatch { index: usize, expected: String, found: String, span: Span },

    #[error("type {ty} cannot be indexed")]
    NotIndexable { ty: String, span: Span },

    #[error("type {ty} has no fields")]
    NotFieldable { ty: String, span: Span },

    #[error("type {ty} cannot be dereferenced")]
    NotDereferenceable { ty: String, span: Span },

    #[error("type {ty} is not callable")]
    NotCallable { ty: String, span: Span },

    #[error("cannot dereference a nullable pointer without a null check")]
    NullableDeref { span: Span },

    #[error("cannot index through a nullable pointer without a null check")]
    NullableIndex { span: Span },

    #[error("cannot access a field through a nullable pointer without a null check")]
    NullableField { span: Span },

    #[error("cannot call through a nullable pointer without a null check")]
    NullableCall { span: Span },

    #[error("cannot assign to `{name}`, binding is const")]
    AssignToConst { name: String, span: Span },

    #[error("too many arguments: expected {expected}, found {found}")]
    TooManyArguments { expected: usize, found: usize, span: Span },

    #[error("too few arguments: expected {expected}, found {found}")]
    TooFewArguments { expected: usize, found: usize, span: Span },

    #[error("binding `{name}` has a zero-size type")]
    ZeroSizeBinding { name: String, span: Span },

    #[error("label `{label}` is already bound in this scope")]
    DuplicateLabel { label: String, span: Span },

    #[error("`{label}` does not label an enclosing loop")]
    UnknownLabelTarget { label: String, span: Span },

    #[error("constant expression could not be evaluated: {reason}")]
    ConstEvalFailed { reason: String, span: Span },

    #[error("attribute `@{attribute}` is not valid here: {reason}")]
    AttributeMisuse { attribute: String, reason: String, span: Span },

    #[error("tagged union member `{member}` misuse: {reason}")]
    TaggedUnionMisuse { member: String, reason: String, span: Span },

    #[error("switch case option has type {found}, expected exactly {expected}")]
    SwitchCaseTypeMismatch { expected: String, found: String, span: Span },

    #[error("a `defer` cannot be nested inside another `defer`")]
    NestedDefer { span: Span },

    #[error("`return` used outside of a function body")]
    ReturnOutsideFunction { span: Span },

    #[error("{feature} is not implemented")]
    Unimplemented { feature: String, span: Span },
}

impl CheckError {
    /// The span at which this error was detected.
    pub fn span(&self) -> Span {
        match self {
            CheckError::UnresolvedName { span, .. }
            | CheckError::UnknownField { span, .. }
            | CheckError::UnknownLabel { span, .. }
            | CheckError::TypeMismatch { span, .. }
            | CheckError::InvalidCast { span, .. }
            | CheckError::NonBooleanCondition { span, .. }
            | CheckError::ArgumentMismatch { span, .. }
            | CheckError::NotIndexable { span, .. }
            | CheckError::NotFieldable { span, .. }
            | CheckError::NotDereferenceable { span, .. }
            | CheckError::NotCallable { span, .. }
            | CheckError::NullableDeref { span }
            | CheckError::NullableIndex { span }
            | CheckError::NullableField { span }
            | CheckError::NullableCall { span }
            | CheckError::AssignToConst { span, .. }
            | CheckError::TooManyArguments { span, .. }
            | CheckError::TooFewArguments { span, .. }
            | CheckError::ZeroSizeBinding { span, .. }
            | CheckError::DuplicateLabel { span, .. }
            | CheckError::UnknownLabelTarget { span, .. }
            | CheckError::ConstEvalFailed { span, .. }
            | CheckError::AttributeMisuse { span, .. }
            | CheckError::TaggedUnionMisuse { span, .. }
            | CheckError::SwitchCaseTypeMismatch { span, .. }
            | CheckError::NestedDefer { span }
            | CheckError::ReturnOutsideFunction { span, .. }
            | CheckError::Unimplemented { span, .. } => *span,
        }
    }

    /// Render as `Error <path>:<line>:<col>: <message>`, the sole format
    /// the driver ever prints. Falls back to the numeric file id if the
    /// span's file isn't registered in `source_map` (shouldn't happen in
    /// practice, but this must never panic on the error-reporting path).
    pub fn render(&self, source_map: &SourceMap) -> String {
        let span = self.span();
        let location = match source_map.get(span.file_id) {
            Some(file) => format!("{}:{}:{}", file.name(), span.line, span.column),
            None => format!("<file {}>:{}:{}", span.file_id.index(), span.line, span.column),
        };
        format!("Error {location}: {self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_includes_path_line_and_column() {
        let mut map = SourceMap::new();
        let file_id = map.add_file("main.fax", "export fn main() void = {};");
        let err = CheckError::UnresolvedName {
            name: "foo".into(),
            span: Span::with_file(7, 10, file_id, 1, 8),
        };
        let rendered = err.render(&map);
        assert_eq!(rendered, "Error main.fax:1:8: unresolved identifier `foo`");
    }

    #[test]
    fn render_falls_back_for_unregistered_file() {
        let map = SourceMap::new();
        let err = CheckError::UnknownLabel { label: "loop".into(), span: Span::DUMMY };
        let rendered = err.render(&map);
        assert!(rendered.starts_with("Error <file 0>:"));
    }
}
