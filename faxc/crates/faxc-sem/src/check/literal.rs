//! Array and struct literal elaboration (§4.4.h / §4.4.q). Both build a
//! composite value out of arbitrary sub-expressions, so unlike a
//! `Constant` node their elements need full elaboration, not just
//! compile-time folding.

use faxc_par::ast::{self, ArrayElement, Ident, StructLiteralField};
use faxc_ty::{Field, FieldDescriptor, TypeFlags, TypePayload};
use faxc_util::{CheckError, Span};

use super::cast_to;
use crate::context::CheckCtx;
use crate::typed::{TypedExpr, TypedExprKind, TypedStructField};

fn hint_element_type(ctx: &CheckCtx, hint: Option<faxc_ty::TypeId>) -> Option<faxc_ty::TypeId> {
    let hint = hint?;
    let resolved = ctx.types.dealias(hint);
    match &ctx.types.data(resolved).payload {
        TypePayload::Array { elem, .. } => Some(*elem),
        TypePayload::Slice { elem } => Some(*elem),
        _ => None,
    }
}

pub fn check_array_literal(
    ctx: &mut CheckCtx,
    elements: &[ArrayElement],
    hint: Option<faxc_ty::TypeId>,
    span: Span,
) -> Result<TypedExpr, CheckError> {
    let expand_count = elements.iter().filter(|e| e.expand).count();
    if expand_count > 1 {
        return Err(CheckError::ConstEvalFailed { reason: "`...` is only allowed on the final array element".into(), span });
    }
    if expand_count == 1 && !elements.last().map(|e| e.expand).unwrap_or(false) {
        return Err(CheckError::ConstEvalFailed { reason: "`...` is only allowed on the final array element".into(), span });
    }

    let elem_hint = hint_element_type(ctx, hint);

    if elements.is_empty() {
        let elem_ty = elem_hint.ok_or_else(|| CheckError::TypeMismatch {
            expected: "an array element type".into(),
            found: "an empty array literal with no hint".into(),
            span,
        })?;
        let result = ctx.types.lookup_array(elem_ty, Some(0), TypeFlags::NONE);
        return Ok(TypedExpr { kind: TypedExprKind::ArrayLiteral(Vec::new()), result, terminates: false, span });
    }

    let elem_ty = match elem_hint {
        Some(t) => t,
        None => check_expression_elem(ctx, &elements[0].value, None)?.result,
    };

    let mut values = Vec::with_capacity(elements.len());
    let mut terminates = false;
    for element in &elements[..elements.len() - 1] {
        let checked = check_expression_elem(ctx, &element.value, Some(elem_ty))?;
        terminates |= checked.terminates;
        values.push(cast_to(ctx, checked, elem_ty, element.value.span)?);
    }

    let last = elements.last().unwrap();
    let last_checked = check_expression_elem(ctx, &last.value, Some(elem_ty))?;
    terminates |= last_checked.terminates;
    let last_cast = cast_to(ctx, last_checked, elem_ty, last.value.span)?;

    let result_len = if last.expand {
        let hinted = hint.and_then(|h| array_len(ctx, h));
        let hinted = hinted.ok_or_else(|| CheckError::ConstEvalFailed {
            reason: "`...` needs a sized array type to expand into".into(),
            span,
        })?;
        if hinted < elements.len() as u64 {
            return Err(CheckError::ConstEvalFailed {
                reason: "`...` hint length is shorter than the literal's element count".into(),
                span,
            });
        }
        for _ in 0..(hinted - elements.len() as u64 + 1) {
            values.push(last_cast.clone());
        }
        hinted
    } else {
        values.push(last_cast);
        elements.len() as u64
    };

    let result = ctx.types.lookup_array(elem_ty, Some(result_len), TypeFlags::NONE);
    Ok(TypedExpr { kind: TypedExprKind::ArrayLiteral(values), result, terminates, span })
}

fn array_len(ctx: &CheckCtx, id: faxc_ty::TypeId) -> Option<u64> {
    let resolved = ctx.types.dealias(id);
    match &ctx.types.data(resolved).payload {
        TypePayload::Array { len: Some(n), .. } => Some(*n),
        _ => None,
    }
}

fn check_expression_elem(ctx: &mut CheckCtx, expr: &ast::Expr, hint: Option<faxc_ty::TypeId>) -> Result<TypedExpr, CheckError> {
    super::check_expression(ctx, expr, hint)
}

pub fn check_struct_literal(
    ctx: &mut CheckCtx,
    name: Option<&Ident>,
    fields: &[StructLiteralField],
    span: Span,
) -> Result<TypedExpr, CheckError> {
    if name.is_some() {
        return Err(CheckError::Unimplemented { feature: "named struct literals".into(), span });
    }

    let mut checked_fields = Vec::with_capacity(fields.len());
    let mut terminates = false;
    for f in fields {
        let checked = super::check_expression(ctx, &f.value, None)?;
        terminates |= checked.terminates;
        checked_fields.push((f.name, checked));
    }

    let field_types: Vec<Field> = checked_fields.iter().map(|(name, v)| Field { name: *name, ty: v.result }).collect();
    let struct_ty = ctx.types.lookup_struct(field_types, TypeFlags::CONST);

    let mut typed_fields = Vec::with_capacity(checked_fields.len());
    for (index, (name, value)) in checked_fields.into_iter().enumerate() {
        let ty = value.result;
        typed_fields.push(TypedStructField { field: FieldDescriptor { name, ty, index }, value });
    }

    Ok(TypedExpr { kind: TypedExprKind::Struct(typed_fields), result: struct_ty, terminates, span })
}
