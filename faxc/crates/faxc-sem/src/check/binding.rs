//! `let`/`const`/`static` bindings in statement position (§4.4.f). Each
//! entry in a `Binding` list either takes its type from an explicit
//! annotation or infers it from the initializer; a `static` binding's
//! initializer additionally has to fold to a compile-time constant,
//! since it's emitted once rather than evaluated on every pass through
//! the enclosing scope.

use faxc_par::ast::{self, BindingDecl};
use faxc_util::{CheckError, Span};

use crate::context::CheckCtx;
use crate::resolve::{mangle, resolve_type};
use crate::scope::{ObjectKind, ScopeObject};
use crate::typed::{TypedBinding, TypedExpr, TypedExprKind};

pub fn check_binding(ctx: &mut CheckCtx, bindings: &[BindingDecl], span: Span) -> Result<TypedExpr, CheckError> {
    let mut typed = Vec::with_capacity(bindings.len());
    let mut terminates = false;

    for b in bindings {
        let declared = match &b.ty {
            Some(t) => Some(resolve_type(ctx, t)?),
            None => None,
        };
        let checked = super::check_expression(ctx, &b.init, declared)?;
        terminates |= checked.terminates;
        let ty = declared.unwrap_or(checked.result);

        let bound_size = ctx.types.size(ty);
        if bound_size == 0 || bound_size == faxc_ty::UNDEFINED {
            return Err(CheckError::ZeroSizeBinding { name: b.name.as_str().to_string(), span: b.span });
        }

        let (mangled, init) = if b.is_static {
            super::cast_to(ctx, checked, ty, b.init.span)?;
            let value = faxc_eval::eval_expr(ctx, &b.init, Some(ty))?;
            let init = TypedExpr { kind: TypedExprKind::Constant(value), result: ty, terminates: false, span: b.init.span };
            (ctx.next_static_name(), init)
        } else {
            let init = super::cast_to(ctx, checked, ty, b.init.span)?;
            (mangle(&ast::Ident::bare(b.name)), init)
        };

        let flags = ctx.types.flags(ty).with_const(b.is_const);
        let bound_ty = ctx.types.lookup_with_flags(ty, flags);

        ctx.scopes.insert(
            ctx.current,
            ScopeObject { kind: ObjectKind::Bind, ident: ast::Ident::bare(b.name), mangled, ty: bound_ty, value: None },
        );
        typed.push(TypedBinding { mangled, ty: bound_ty, is_static: b.is_static, init });
    }

    Ok(TypedExpr {
        kind: TypedExprKind::Binding(typed),
        result: ctx.types.builtin(faxc_ty::StorageClass::Void, false),
        terminates,
        span,
    })
}
