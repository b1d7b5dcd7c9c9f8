//! Pass 2: check every declaration's body against the scope pass 1
//! already populated. `const` has nothing left to do here — scan
//! already elaborated and spliced it — so it's the one `DeclKind` that
//! yields no [`TypedDecl`].

use faxc_par::ast::{self, Attr, Decl, DeclKind, Variadism};
use faxc_util::{CheckError, Symbol};

use crate::context::CheckCtx;
use crate::resolve::{mangle, resolve_func_type, resolve_type};
use crate::scope::{ObjectKind, ScopeKind, ScopeObject};
use crate::typed::{TypedDecl, TypedDeclKind, TypedFunc, TypedGlobal, TypedTypeDecl};

fn mangled_name(attrs: &[Attr], ident: ast::Ident) -> Symbol {
    for attr in attrs {
        if let Attr::Symbol(sym) = attr {
            return *sym;
        }
    }
    mangle(&ident)
}

pub fn check_decl(ctx: &mut CheckCtx, decl: &Decl) -> Result<Option<TypedDecl>, CheckError> {
    ctx.current = ctx.unit_scope;
    let kind = match &decl.kind {
        DeclKind::Const(_) => return Ok(None),
        DeclKind::Global(g) => TypedDeclKind::Global(check_global(ctx, g)?),
        DeclKind::Type(t) => TypedDeclKind::Type(check_type(ctx, t)?),
        DeclKind::Func(f) => TypedDeclKind::Func(check_func(ctx, f, decl.exported)?),
    };
    Ok(Some(TypedDecl { kind, exported: decl.exported }))
}

fn check_global(ctx: &mut CheckCtx, g: &ast::GlobalDecl) -> Result<TypedGlobal, CheckError> {
    let ty = resolve_type(ctx, &g.ty)?;
    let init = match &g.init {
        Some(init) => {
            let checked = crate::check::check_expression(ctx, init, Some(ty))?;
            Some(crate::check::cast_to(ctx, checked, ty, init.span)?)
        }
        None => None,
    };
    Ok(TypedGlobal { mangled: mangle(&ast::Ident::bare(g.name)), ty, init })
}

fn check_type(ctx: &mut CheckCtx, t: &ast::TypeDecl) -> Result<TypedTypeDecl, CheckError> {
    let ty = resolve_type(ctx, &t.ty)?;
    Ok(TypedTypeDecl { mangled: mangle(&ast::Ident::bare(t.name)), ty })
}

/// Reject `@init`/`@fini`/`@test` on a function that doesn't return `void`
/// or that's exported — per spec.md §4.5, these lifecycle attributes are
/// only valid on a private, void-returning function.
fn check_lifecycle_attrs(
    ctx: &CheckCtx,
    f: &ast::FuncDecl,
    exported: bool,
    result_ty: faxc_ty::TypeId,
) -> Result<(), CheckError> {
    let void_ty = ctx.types.builtin(faxc_ty::StorageClass::Void, false);
    for attr in &f.attrs {
        let name = match attr {
            Attr::Init => "init",
            Attr::Fini => "fini",
            Attr::Test => "test",
            Attr::Symbol(_) => continue,
        };
        if result_ty != void_ty {
            return Err(CheckError::AttributeMisuse {
                attribute: name.into(),
                reason: "must return void".into(),
                span: f.span,
            });
        }
        if exported {
            return Err(CheckError::AttributeMisuse {
                attribute: name.into(),
                reason: "must not be exported".into(),
                span: f.span,
            });
        }
    }
    Ok(())
}

fn check_func(ctx: &mut CheckCtx, f: &ast::FuncDecl, exported: bool) -> Result<TypedFunc, CheckError> {
    if f.variadism == Variadism::C {
        return Err(CheckError::Unimplemented { feature: "C-style variadic functions".into(), span: f.span });
    }

    let (fn_ty, param_ids) = resolve_func_type(ctx, &f.params, f.variadism, &f.result)?;
    let mangled = mangled_name(&f.attrs, ast::Ident::bare(f.name));
    let result_ty = param_ids_result(ctx, fn_ty);
    check_lifecycle_attrs(ctx, f, exported, result_ty)?;

    let scope = ctx.scopes.push(ctx.unit_scope, ScopeKind::Function, None);
    let previous_scope = ctx.current;
    let previous_function = ctx.current_function;
    ctx.current = scope;
    ctx.current_function = Some(result_ty);

    let mut param_names = Vec::with_capacity(f.params.len());
    for (p, ty) in f.params.iter().zip(param_ids.iter()) {
        let param_mangled = mangle(&ast::Ident::bare(p.name));
        ctx.scopes.insert(
            scope,
            ScopeObject { kind: ObjectKind::Bind, ident: ast::Ident::bare(p.name), mangled: param_mangled, ty: *ty, value: None },
        );
        param_names.push(param_mangled);
    }

    let body = match &f.body {
        Some(b) => {
            let checked = crate::check::check_expression(ctx, b, Some(result_ty))?;
            let checked = if checked.terminates { checked } else { crate::check::cast_to(ctx, checked, result_ty, b.span)? };
            Some(checked)
        }
        None => None,
    };

    ctx.current = previous_scope;
    ctx.current_function = previous_function;

    Ok(TypedFunc { mangled, ty: fn_ty, params: param_names, body })
}

fn param_ids_result(ctx: &CheckCtx, fn_ty: faxc_ty::TypeId) -> faxc_ty::TypeId {
    match &ctx.types.data(fn_ty).payload {
        faxc_ty::TypePayload::Function { result, .. } => *result,
        _ => unreachable!("resolve_func_type always interns a Function type"),
    }
}
