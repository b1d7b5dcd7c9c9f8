//! Explicit casts (§4.4.j): `as` for any castable pair, `as!`/`as?` to
//! narrow a tagged union down to one of its members (the former
//! trapping, the latter testing and yielding a `bool`).

use faxc_par::ast::{CastKind, Expr, Type};
use faxc_ty::{StorageClass, TypePayload};
use faxc_util::{CheckError, Span};

use crate::context::CheckCtx;
use crate::resolve::resolve_type;
use crate::typed::{TypedExpr, TypedExprKind};
use crate::util::type_name;

pub fn check_cast(ctx: &mut CheckCtx, kind: CastKind, value: &Expr, ty: &Type, span: Span) -> Result<TypedExpr, CheckError> {
    let target = resolve_type(ctx, ty)?;
    let checked = super::check_expression(ctx, value, Some(target))?;
    let terminates = checked.terminates;

    match kind {
        CastKind::Plain => {
            if !ctx.types.is_castable(target, checked.result) {
                return Err(CheckError::InvalidCast {
                    from: type_name(&ctx.types, checked.result),
                    to: type_name(&ctx.types, target),
                    span,
                });
            }
            Ok(TypedExpr { kind: TypedExprKind::Cast { kind, value: Box::new(checked), ty: target }, result: target, terminates, span })
        }

        CastKind::Assertion | CastKind::Test => {
            let src_resolved = ctx.types.dealias(checked.result);
            let members = match &ctx.types.data(src_resolved).payload {
                TypePayload::TaggedUnion { members } => members.clone(),
                _ => {
                    return Err(CheckError::TaggedUnionMisuse {
                        member: type_name(&ctx.types, target),
                        reason: "this cast form only applies to a tagged union value".into(),
                        span,
                    })
                }
            };
            let target_resolved = ctx.types.dealias(target);
            if !members.iter().any(|&m| ctx.types.dealias(m) == target_resolved) {
                return Err(CheckError::TaggedUnionMisuse {
                    member: type_name(&ctx.types, target),
                    reason: "not a member of this tagged union".into(),
                    span,
                });
            }
            let result = if matches!(kind, CastKind::Test) { ctx.types.builtin(StorageClass::Bool, false) } else { target };
            Ok(TypedExpr { kind: TypedExprKind::Cast { kind, value: Box::new(checked), ty: target }, result, terminates, span })
        }
    }
}
