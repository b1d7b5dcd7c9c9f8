//! Pass 1: walk every declaration in the unit and populate the unit
//! scope, without checking any function body or global initializer.
//! This is what lets a declaration refer to another declared further
//! down the same unit — by the time pass 2 runs, every name is already
//! bound.

use faxc_par::ast::{self, Attr, Decl, DeclKind};
use faxc_ty::StorageClass;
use faxc_util::{CheckError, Symbol};

use crate::context::CheckCtx;
use crate::resolve::{mangle, resolve_func_type, resolve_type};
use crate::scope::{ObjectKind, ScopeObject};

/// Mangled name for a declaration, honoring a `@symbol("...")` override.
fn mangled_name(attrs: &[Attr], ident: ast::Ident) -> Symbol {
    for attr in attrs {
        if let Attr::Symbol(sym) = attr {
            return *sym;
        }
    }
    mangle(&ident)
}

pub fn scan_decl(ctx: &mut CheckCtx, decl: &Decl) -> Result<(), CheckError> {
    ctx.current = ctx.unit_scope;
    tracing::trace!(decl_kind = ?decl.kind, "scanning declaration");
    match &decl.kind {
        DeclKind::Const(c) => scan_const(ctx, c),
        DeclKind::Global(g) => scan_global(ctx, g),
        DeclKind::Type(t) => scan_type(ctx, t),
        DeclKind::Func(f) => scan_func(ctx, f),
    }
}

fn scan_const(ctx: &mut CheckCtx, c: &ast::ConstDecl) -> Result<(), CheckError> {
    let ty = resolve_type(ctx, &c.ty)?;
    let checked = crate::check::check_expression(ctx, &c.init, Some(ty))?;
    crate::check::cast_to(ctx, checked, ty, c.init.span)?;
    let value = faxc_eval::eval_expr(ctx, &c.init, Some(ty))?;
    let ident = ast::Ident::bare(c.name);
    ctx.scopes.insert(
        ctx.unit_scope,
        ScopeObject { kind: ObjectKind::Const, ident: ident.clone(), mangled: mangle(&ident), ty, value: Some(value) },
    );
    Ok(())
}

fn scan_global(ctx: &mut CheckCtx, g: &ast::GlobalDecl) -> Result<(), CheckError> {
    let ty = resolve_type(ctx, &g.ty)?;
    let ident = ast::Ident::bare(g.name);
    ctx.scopes.insert(
        ctx.unit_scope,
        ScopeObject { kind: ObjectKind::Decl, ident: ident.clone(), mangled: mangle(&ident), ty, value: None },
    );
    Ok(())
}

/// Resolve a named `type` declaration, tolerating a self-referential body
/// (`type Node = struct { next: *Node }`). The name is bound to a
/// reserved placeholder id *before* its definition is resolved, so a
/// nested reference to the name under construction resolves to that id
/// instead of failing as unresolved; once the body is fully resolved, the
/// placeholder is finalized in place if the body actually closed a cycle
/// through it, or discarded in favor of whatever already-canonical id the
/// body resolved to otherwise (the common, non-recursive case).
fn scan_type(ctx: &mut CheckCtx, t: &ast::TypeDecl) -> Result<(), CheckError> {
    let ident = ast::Ident::bare(t.name);
    let types_before = ctx.types.type_count();
    let reserved = ctx.types.reserve();
    ctx.scopes.insert(
        ctx.unit_scope,
        ScopeObject { kind: ObjectKind::Type, ident: ident.clone(), mangled: mangle(&ident), ty: reserved, value: None },
    );

    let resolved = resolve_type(ctx, &t.ty)?;
    let ty = if resolved != reserved && (resolved.0 as usize) > types_before {
        // `resolved` was minted fresh while resolving this body (it's
        // past every id that existed before we started) — the body
        // referred back to `reserved` somewhere inside itself, so make
        // `reserved` the real thing instead of leaving two ids for one
        // type.
        let data = ctx.types.data(resolved).clone();
        ctx.types.finalize(reserved, data);
        reserved
    } else {
        // No cycle: `resolved` is already some pre-existing canonical id
        // (a builtin, or an earlier declaration). Use it directly and let
        // `reserved` sit unreferenced.
        resolved
    };
    if ty != reserved {
        ctx.scopes.insert(
            ctx.unit_scope,
            ScopeObject { kind: ObjectKind::Type, ident: ident.clone(), mangled: mangle(&ident), ty, value: None },
        );
    }

    if ctx.types.storage(ctx.types.dealias(ty)) == StorageClass::Enum {
        scan_enum_values(ctx, t.name, ty);
    }
    Ok(())
}

/// Insert each enum value twice: once bare (`Red`) and once qualified by
/// the enum's own name (`Color::Red`), both as `O_CONST`.
fn scan_enum_values(ctx: &mut CheckCtx, enum_name: Symbol, enum_ty: faxc_ty::TypeId) {
    let (storage_ty, values) = match &ctx.types.data(enum_ty).payload {
        faxc_ty::TypePayload::Enum { storage, values } => (*storage, values.clone()),
        _ => unreachable!("scan_type only calls this for enum storage classes"),
    };
    let signed = ctx.types.is_signed(storage_ty);
    for (name, value) in values {
        let const_value =
            if signed { faxc_eval::ConstValue::Int(value as i64) } else { faxc_eval::ConstValue::UInt(value as u64) };
        let mangled = Symbol::intern(&format!("{}.{}", enum_name.as_str(), name.as_str()));

        ctx.scopes.insert(
            ctx.unit_scope,
            ScopeObject {
                kind: ObjectKind::Const,
                ident: ast::Ident::bare(name),
                mangled,
                ty: storage_ty,
                value: Some(const_value.clone()),
            },
        );
        let qualified = ast::Ident { name, namespace: Some(Box::new(ast::Ident::bare(enum_name))) };
        ctx.scopes.insert(
            ctx.unit_scope,
            ScopeObject { kind: ObjectKind::Const, ident: qualified, mangled, ty: storage_ty, value: Some(const_value) },
        );
    }
}

fn scan_func(ctx: &mut CheckCtx, f: &ast::FuncDecl) -> Result<(), CheckError> {
    let (fn_ty, _) = resolve_func_type(ctx, &f.params, f.variadism, &f.result)?;
    let ident = ast::Ident::bare(f.name);
    let mangled = mangled_name(&f.attrs, ident.clone());
    ctx.scopes.insert(ctx.unit_scope, ScopeObject { kind: ObjectKind::Decl, ident, mangled, ty: fn_ty, value: None });
    Ok(())
}
