//! Function calls (§4.4.i). The interesting case is a natively variadic
//! callee: its last parameter is stored as a slice (see
//! `resolve::resolve_func_type`), and the trailing arguments at a call
//! site get packed into a synthetic array literal that's then cast to
//! that slice — array-to-slice isn't a general assignability, so this
//! goes through `wrap_cast` rather than `cast_to`.

use faxc_par::ast::Expr;
use faxc_ty::{Deref, TypeFlags, TypePayload};
use faxc_util::{CheckError, Span};

use crate::context::CheckCtx;
use crate::typed::{TypedExpr, TypedExprKind};
use crate::util::type_name;

pub fn check_call(ctx: &mut CheckCtx, callee: &Expr, args: &[Expr], span: Span) -> Result<TypedExpr, CheckError> {
    let callee_checked = super::check_expression(ctx, callee, None)?;
    let target = match ctx.types.dereference(callee_checked.result) {
        Deref::Nullable => return Err(CheckError::NullableCall { span }),
        Deref::Type(t) => t,
    };
    let resolved = ctx.types.dealias(target);
    let (params, variadic, result) = match &ctx.types.data(resolved).payload {
        TypePayload::Function { params, variadic, result } => (params.clone(), *variadic, *result),
        _ => return Err(CheckError::NotCallable { ty: type_name(&ctx.types, target), span: callee.span }),
    };

    let mut terminates = callee_checked.terminates;
    let mut typed_args = Vec::with_capacity(args.len().max(params.len()));

    if variadic {
        let fixed = &params[..params.len() - 1];
        let slice_ty = params[params.len() - 1];
        if args.len() < fixed.len() {
            return Err(CheckError::TooFewArguments { expected: fixed.len(), found: args.len(), span });
        }
        for (i, p) in fixed.iter().enumerate() {
            let checked = super::check_expression(ctx, &args[i], Some(*p))?;
            terminates |= checked.terminates;
            typed_args.push(super::cast_to(ctx, checked, *p, args[i].span)?);
        }

        let elem_ty = match &ctx.types.data(ctx.types.dealias(slice_ty)).payload {
            TypePayload::Slice { elem } => *elem,
            _ => unreachable!("native-variadic parameter is always resolved to a slice"),
        };
        let mut packed = Vec::with_capacity(args.len() - fixed.len());
        for a in &args[fixed.len()..] {
            let checked = super::check_expression(ctx, a, Some(elem_ty))?;
            terminates |= checked.terminates;
            packed.push(super::cast_to(ctx, checked, elem_ty, a.span)?);
        }
        let array_ty = ctx.types.lookup_array(elem_ty, Some(packed.len() as u64), TypeFlags::NONE);
        let array_literal = TypedExpr { kind: TypedExprKind::ArrayLiteral(packed), result: array_ty, terminates: false, span };
        typed_args.push(super::wrap_cast(array_literal, slice_ty, span));
    } else {
        if args.len() < params.len() {
            return Err(CheckError::TooFewArguments { expected: params.len(), found: args.len(), span });
        }
        if args.len() > params.len() {
            return Err(CheckError::TooManyArguments { expected: params.len(), found: args.len(), span });
        }
        for (i, p) in params.iter().enumerate() {
            let checked = super::check_expression(ctx, &args[i], Some(*p))?;
            terminates |= checked.terminates;
            if !ctx.types.is_assignable(*p, checked.result) {
                return Err(CheckError::ArgumentMismatch {
                    index: i,
                    expected: type_name(&ctx.types, *p),
                    found: type_name(&ctx.types, checked.result),
                    span: args[i].span,
                });
            }
            typed_args.push(super::wrap_cast(checked, *p, args[i].span));
        }
    }

    Ok(TypedExpr {
        kind: TypedExprKind::Call { callee: Box::new(callee_checked), args: typed_args },
        result,
        terminates,
        span,
    })
}
