//! `switch` (§4.4.o): each case's options must be compile-time constants
//! assignable to the value's type; the switch's own result type unifies
//! across every case body the way an `if`/`else` chain does, falling
//! back to `void` when the bodies disagree.

use faxc_par::ast::{Expr, ExprKind, SwitchCase};
use faxc_ty::{StorageClass, TypeId};
use faxc_util::{CheckError, Span};

use crate::context::CheckCtx;
use crate::scope::ScopeKind;
use crate::typed::{TypedExpr, TypedExprKind, TypedSwitchCase};
use crate::util::type_name;

pub fn check_switch(ctx: &mut CheckCtx, value: &Expr, cases: &[SwitchCase], span: Span) -> Result<TypedExpr, CheckError> {
    let value_checked = super::check_expression(ctx, value, None)?;
    let value_ty = value_checked.result;

    let mut typed_cases = Vec::with_capacity(cases.len());
    let mut result_ty: Option<TypeId> = None;
    let mut all_cases_terminate = !cases.is_empty();

    for case in cases {
        let mut options = Vec::with_capacity(case.options.len());
        for opt in &case.options {
            let checked = super::check_expression(ctx, opt, Some(value_ty))?;
            if checked.result != value_ty {
                return Err(CheckError::SwitchCaseTypeMismatch {
                    expected: type_name(&ctx.types, value_ty),
                    found: type_name(&ctx.types, checked.result),
                    span: opt.span,
                });
            }
            faxc_eval::eval_expr(ctx, opt, Some(value_ty))?;
            options.push(checked);
        }

        let body_checked = check_body_with_trailing_hint(ctx, &case.body, result_ty)?;
        all_cases_terminate &= body_checked.terminates;
        if !body_checked.terminates {
            result_ty = Some(match result_ty {
                Some(t) if ctx.types.is_assignable(t, body_checked.result) => t,
                Some(_) => ctx.types.builtin(StorageClass::Void, false),
                None => body_checked.result,
            });
        }

        typed_cases.push(TypedSwitchCase { options, body: body_checked });
    }

    let result = result_ty.unwrap_or_else(|| ctx.types.builtin(StorageClass::Void, false));
    let terminates = value_checked.terminates || all_cases_terminate;

    Ok(TypedExpr {
        kind: TypedExprKind::Switch { value: Box::new(value_checked), cases: typed_cases },
        result,
        terminates,
        span,
    })
}

/// Check a case body, propagating `hint` only to its own tail
/// expression — if the body is a `{ ... }` list, that's its last
/// statement; otherwise the body itself.
fn check_body_with_trailing_hint(ctx: &mut CheckCtx, body: &Expr, hint: Option<TypeId>) -> Result<TypedExpr, CheckError> {
    match &body.kind {
        ExprKind::List(exprs) => {
            let scope = ctx.scopes.push(ctx.current, ScopeKind::List, None);
            let previous = ctx.current;
            ctx.current = scope;
            let result = super::flow::check_body(ctx, exprs, hint, body.span);
            ctx.current = previous;
            result
        }
        _ => super::check_expression(ctx, body, hint),
    }
}
