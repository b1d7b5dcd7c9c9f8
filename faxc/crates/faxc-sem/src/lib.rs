//! faxc-sem - semantic analysis: name resolution, type checking, and
//! constant folding over a parsed [`faxc_par::ast::Unit`].
//!
//! Checking a unit happens in two passes. [`scan`] walks every
//! declaration and populates the unit scope (`O_CONST`, `O_TYPE`,
//! `O_DECL`) without looking inside any function body or global
//! initializer — this is what lets one declaration forward-reference
//! another declared later in the same unit. [`check`] (the module,
//! re-exported here as the [`check`] function's neighbor) then walks
//! every declaration a second time and elaborates each one's body into
//! a [`typed::TypedUnit`], now that every name in the unit is bound.
//!
//! `const` declarations are fully handled in the scan pass: their value
//! is evaluated once and spliced at every use site, so pass 2 has
//! nothing left to do for them and they produce no [`typed::TypedDecl`].

mod check;
mod context;
mod decl;
mod resolve;
mod scan;
mod scope;
mod typed;
mod util;

pub use context::CheckCtx;
pub use scope::{ObjectKind, Scope, ScopeId, ScopeKind, ScopeObject, ScopeTree};
pub use typed::{
    TypedBinding, TypedDecl, TypedDeclKind, TypedExpr, TypedExprKind, TypedFunc, TypedGlobal, TypedMeasure, TypedStructField,
    TypedSwitchCase, TypedTypeDecl, TypedUnit,
};

use faxc_par::ast::Unit;
use faxc_util::CheckError;

/// Check an entire parsed unit, producing its typed form. Declarations
/// are scanned in file order first, then checked in the same order; a
/// unit with no declarations checks to an empty [`TypedUnit`].
pub fn check(ctx: &mut CheckCtx, unit: &Unit) -> Result<TypedUnit, CheckError> {
    tracing::debug!(subunits = unit.subunits.len(), "scanning unit");
    for subunit in &unit.subunits {
        for decl in &subunit.decls {
            scan::scan_decl(ctx, decl)?;
        }
    }

    tracing::debug!("checking unit");
    let mut decls = Vec::new();
    for subunit in &unit.subunits {
        for decl in &subunit.decls {
            if let Some(typed) = decl::check_decl(ctx, decl)? {
                decls.push(typed);
            }
        }
    }

    Ok(TypedUnit { decls })
}

#[cfg(test)]
mod tests {
    use super::*;
    use faxc_util::FileId;

    fn check_source(source: &str) -> Result<TypedUnit, CheckError> {
        let subunit = faxc_par::parse_subunit(source, FileId::DUMMY).expect("parses");
        let unit = Unit { subunits: vec![subunit] };
        let mut ctx = CheckCtx::new();
        check(&mut ctx, &unit)
    }

    #[test]
    fn empty_unit_checks_to_empty_typed_unit() {
        let unit = Unit::default();
        let mut ctx = CheckCtx::new();
        let typed = check(&mut ctx, &unit).expect("empty unit checks");
        assert!(typed.decls.is_empty());
    }

    #[test]
    fn const_declarations_produce_no_typed_decl() {
        let typed = check_source("const answer: int = 42;").expect("checks");
        assert!(typed.decls.is_empty());
    }

    #[test]
    fn function_forward_references_a_later_global() {
        let source = "fn get() int = { return counter; } let counter: int = 0;";
        let typed = check_source(source).expect("forward reference resolves");
        assert_eq!(typed.decls.len(), 2);
    }

    #[test]
    fn unresolved_name_is_rejected() {
        let err = check_source("fn get() int = { return missing; }").unwrap_err();
        assert!(matches!(err, CheckError::UnresolvedName { .. }));
    }

    #[test]
    fn self_referential_struct_type_checks() {
        let source = "type node = struct { next: nullable *node, value: int };\nlet head: node;";
        let typed = check_source(source).expect("self-referential struct resolves");
        assert_eq!(typed.decls.len(), 2);
    }

    #[test]
    fn two_identical_non_recursive_structs_intern_to_one_type() {
        let source = "\
            type a = struct { x: int };\n\
            type b = struct { x: int };\n\
            fn same(p: *a, q: *b) bool = { return p == q; }\n\
        ";
        // `a` and `b` share no self-reference, so they must hash-cons to
        // the same struct type; a pointer to one is directly comparable
        // to a pointer to the other without any cast.
        check_source(source).expect("structurally identical non-recursive types unify");
    }

    #[test]
    fn function_body_result_must_be_assignable_to_declared_return_type() {
        let err = check_source("fn f() int = { \"hello\"; }").unwrap_err();
        assert!(matches!(err, CheckError::TypeMismatch { .. }));
    }

    #[test]
    fn function_body_that_always_returns_skips_the_trailing_result_check() {
        let source = "fn f() int = { return 1; }";
        check_source(source).expect("a terminating body needs no trailing cast");
    }

    #[test]
    fn init_attribute_requires_void_return() {
        let err = check_source("@init fn setup() int = { return 1; }").unwrap_err();
        assert!(matches!(err, CheckError::AttributeMisuse { .. }));
    }

    #[test]
    fn init_attribute_requires_non_exported() {
        let err = check_source("export @init fn setup() void = {};").unwrap_err();
        assert!(matches!(err, CheckError::AttributeMisuse { .. }));
    }

    #[test]
    fn static_binding_initializer_must_be_assignable_to_its_type() {
        let err = check_source("fn f() void = { static x: int = \"hello\"; }").unwrap_err();
        assert!(matches!(err, CheckError::TypeMismatch { .. }));
    }

    #[test]
    fn if_with_no_else_terminates_when_its_then_branch_always_returns() {
        let source = "fn f(cond: bool) int = { if (cond) { return 1; } return 2; }";
        check_source(source).expect("the trailing call after the if is still reachable and checks fine");
    }

    #[test]
    fn switch_case_option_must_equal_the_scrutinee_type_exactly() {
        let source = "\
            fn f(p: nullable *int) int = {\n\
                switch p {\n\
                    case null => return 0;\n\
                };\n\
                return 1;\n\
            }\n\
        ";
        let err = check_source(source).unwrap_err();
        assert!(matches!(err, CheckError::SwitchCaseTypeMismatch { .. }));
    }

    #[test]
    fn switch_with_every_case_terminating_has_void_result() {
        let source = "\
            fn f(x: int) void = {\n\
                switch x {\n\
                    case 1 => return;\n\
                    case 2 => return;\n\
                };\n\
            }\n\
        ";
        check_source(source).expect("an all-terminating switch unifies to void, matching the void return");
    }
}
