//! Slicing (§4.4.m): `object[start:end]`, either bound optional. Shares
//! its target-type resolution with indexing (`check::check_index`) — a
//! single level of pointer indirection, then array or slice — but always
//! yields a slice, never the element type.

use faxc_par::ast::Expr;
use faxc_ty::{Deref, TypeFlags, TypePayload};
use faxc_util::{CheckError, Span};

use crate::context::CheckCtx;
use crate::typed::{TypedExpr, TypedExprKind};
use crate::util::type_name;

pub fn check_slice(ctx: &mut CheckCtx, object: &Expr, start: Option<&Expr>, end: Option<&Expr>, span: Span) -> Result<TypedExpr, CheckError> {
    let object_checked = super::check_expression(ctx, object, None)?;
    let target = match ctx.types.dereference(object_checked.result) {
        Deref::Nullable => return Err(CheckError::NullableIndex { span }),
        Deref::Type(t) => t,
    };
    let resolved = ctx.types.dealias(target);
    let (elem, const_propagated) = match &ctx.types.data(resolved).payload {
        TypePayload::Array { elem, .. } => (*elem, ctx.types.is_const(target)),
        TypePayload::Slice { elem } => (*elem, ctx.types.is_const(target)),
        _ => return Err(CheckError::NotIndexable { ty: type_name(&ctx.types, target), span: object.span }),
    };

    let mut terminates = object_checked.terminates;
    let start_checked = match start {
        Some(s) => {
            let checked = super::check_expression(ctx, s, None)?;
            terminates |= checked.terminates;
            Some(Box::new(super::cast_index_to_size(ctx, checked, s.span)?))
        }
        None => None,
    };
    let end_checked = match end {
        Some(e) => {
            let checked = super::check_expression(ctx, e, None)?;
            terminates |= checked.terminates;
            Some(Box::new(super::cast_index_to_size(ctx, checked, e.span)?))
        }
        None => None,
    };

    let elem_ty = if const_propagated {
        let flags = ctx.types.flags(elem).with_const(true);
        ctx.types.lookup_with_flags(elem, flags)
    } else {
        elem
    };
    let result = ctx.types.lookup_slice(elem_ty, TypeFlags::NONE);

    Ok(TypedExpr {
        kind: TypedExprKind::Slice { object: Box::new(object_checked), start: start_checked, end: end_checked },
        result,
        terminates,
        span,
    })
}
