//! Control flow: `{ ... }` lists, `if`/`else`, and `for` loops (§4.4.k,
//! §4.4.l, §4.4.n). Each introduces its own scope; `for` additionally
//! registers its label (if any) so `break`/`continue` inside the body
//! can target it.

use faxc_par::ast::Expr;
use faxc_ty::{StorageClass, TypeId};
use faxc_util::{CheckError, Span, Symbol};

use crate::context::CheckCtx;
use crate::scope::ScopeKind;
use crate::typed::{TypedExpr, TypedExprKind};
use crate::util::type_name;

pub fn check_list(ctx: &mut CheckCtx, exprs: &[Expr], span: Span) -> Result<TypedExpr, CheckError> {
    let scope = ctx.scopes.push(ctx.current, ScopeKind::List, None);
    let previous = ctx.current;
    ctx.current = scope;
    let result = check_body(ctx, exprs, None, span);
    ctx.current = previous;
    result
}

/// Check a sequence of statement-position expressions, applying
/// `trailing_hint` only to the final one — the value a `{ ... }` block
/// yields. Shared with `switch::check_body_with_trailing_hint`, which
/// needs the same "hint only the tail" behavior for a case body.
pub(crate) fn check_body(ctx: &mut CheckCtx, exprs: &[Expr], trailing_hint: Option<TypeId>, span: Span) -> Result<TypedExpr, CheckError> {
    if exprs.is_empty() {
        return Ok(TypedExpr {
            kind: TypedExprKind::List(Vec::new()),
            result: ctx.types.builtin(StorageClass::Void, false),
            terminates: false,
            span,
        });
    }

    let mut typed = Vec::with_capacity(exprs.len());
    let mut terminates = false;
    for e in &exprs[..exprs.len() - 1] {
        let checked = super::check_expression(ctx, e, None)?;
        terminates |= checked.terminates;
        typed.push(checked);
    }

    let last = exprs.last().unwrap();
    let last_checked = super::check_expression(ctx, last, trailing_hint)?;
    terminates |= last_checked.terminates;
    let result = last_checked.result;
    typed.push(last_checked);

    Ok(TypedExpr { kind: TypedExprKind::List(typed), result, terminates, span })
}

pub fn check_if(ctx: &mut CheckCtx, cond: &Expr, then_branch: &Expr, else_branch: Option<&Expr>, span: Span) -> Result<TypedExpr, CheckError> {
    let bool_ty = ctx.types.builtin(StorageClass::Bool, false);
    let cond_checked = super::check_expression(ctx, cond, Some(bool_ty))?;
    if ctx.types.storage(ctx.types.dealias(cond_checked.result)) != StorageClass::Bool {
        return Err(CheckError::NonBooleanCondition { found: type_name(&ctx.types, cond_checked.result), span: cond.span });
    }

    let then_checked = super::check_expression(ctx, then_branch, None)?;

    let (else_checked, result, terminates) = match else_branch {
        Some(e) => {
            let checked = super::check_expression(ctx, e, Some(then_checked.result))?;
            let result =
                if ctx.types.is_assignable(then_checked.result, checked.result) { then_checked.result } else { ctx.types.builtin(StorageClass::Void, false) };
            let terminates = cond_checked.terminates || (then_checked.terminates && checked.terminates);
            (Some(Box::new(checked)), result, terminates)
        }
        None => (None, ctx.types.builtin(StorageClass::Void, false), then_checked.terminates),
    };

    Ok(TypedExpr {
        kind: TypedExprKind::If { cond: Box::new(cond_checked), then_branch: Box::new(then_checked), else_branch: else_checked },
        result,
        terminates,
        span,
    })
}

pub fn check_for(
    ctx: &mut CheckCtx,
    label: Option<Symbol>,
    bindings: Option<&Expr>,
    cond: Option<&Expr>,
    afterthought: Option<&Expr>,
    body: &Expr,
    span: Span,
) -> Result<TypedExpr, CheckError> {
    if let Some(l) = label {
        if ctx.scopes.label_in_use(ctx.current, l) {
            return Err(CheckError::DuplicateLabel { label: l.as_str().to_string(), span });
        }
    }

    let scope = ctx.scopes.push(ctx.current, ScopeKind::For, label);
    let previous = ctx.current;
    ctx.current = scope;

    let result = check_for_body(ctx, bindings, cond, afterthought, body, label, span);

    ctx.current = previous;
    result
}

fn check_for_body(
    ctx: &mut CheckCtx,
    bindings: Option<&Expr>,
    cond: Option<&Expr>,
    afterthought: Option<&Expr>,
    body: &Expr,
    label: Option<Symbol>,
    span: Span,
) -> Result<TypedExpr, CheckError> {
    let bindings_checked = match bindings {
        Some(b) => Some(Box::new(super::check_expression(ctx, b, None)?)),
        None => None,
    };

    let bool_ty = ctx.types.builtin(StorageClass::Bool, false);
    let cond_checked = match cond {
        Some(c) => {
            let checked = super::check_expression(ctx, c, Some(bool_ty))?;
            if ctx.types.storage(ctx.types.dealias(checked.result)) != StorageClass::Bool {
                return Err(CheckError::NonBooleanCondition { found: type_name(&ctx.types, checked.result), span: c.span });
            }
            Some(Box::new(checked))
        }
        None => None,
    };

    let afterthought_checked = match afterthought {
        Some(a) => Some(Box::new(super::check_expression(ctx, a, None)?)),
        None => None,
    };

    let body_checked = super::check_expression(ctx, body, None)?;

    Ok(TypedExpr {
        kind: TypedExprKind::For {
            label,
            bindings: bindings_checked,
            cond: cond_checked,
            afterthought: afterthought_checked,
            body: Box::new(body_checked),
        },
        result: ctx.types.builtin(StorageClass::Void, false),
        terminates: false,
        span,
    })
}
