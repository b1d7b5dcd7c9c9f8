//! Turns a `faxc_par::ast::Type` into an interned `TypeId`, resolving
//! `Alias` references against the current scope. This is the piece of
//! §4.2's `lookup_atype` that needs scope access, so it lives here
//! rather than in `faxc-ty` itself.

use faxc_eval::ConstValue;
use faxc_par::ast::{BuiltinType, Type, TypeKind, Variadism};
use faxc_ty::{Field, StorageClass, TypeId};
use faxc_util::{CheckError, Span, Symbol};

use crate::context::CheckCtx;
use crate::scope::ObjectKind;
use crate::util::ident_text;

fn builtin_storage(b: BuiltinType) -> StorageClass {
    match b {
        BuiltinType::Void => StorageClass::Void,
        BuiltinType::Bool => StorageClass::Bool,
        BuiltinType::Null => StorageClass::Null,
        BuiltinType::I8 => StorageClass::I8,
        BuiltinType::I16 => StorageClass::I16,
        BuiltinType::I32 => StorageClass::I32,
        BuiltinType::I64 => StorageClass::I64,
        BuiltinType::U8 => StorageClass::U8,
        BuiltinType::U16 => StorageClass::U16,
        BuiltinType::U32 => StorageClass::U32,
        BuiltinType::U64 => StorageClass::U64,
        BuiltinType::Int => StorageClass::Int,
        BuiltinType::Uint => StorageClass::Uint,
        BuiltinType::Rune => StorageClass::Rune,
        BuiltinType::F32 => StorageClass::F32,
        BuiltinType::F64 => StorageClass::F64,
        BuiltinType::Char => StorageClass::Char,
        BuiltinType::Uintptr => StorageClass::Uintptr,
        BuiltinType::Size => StorageClass::Size,
        BuiltinType::Str => StorageClass::String,
    }
}

fn const_to_u64(value: &ConstValue, span: Span) -> Result<u64, CheckError> {
    match value {
        ConstValue::Int(i) if *i >= 0 => Ok(*i as u64),
        ConstValue::UInt(u) => Ok(*u),
        _ => Err(CheckError::ConstEvalFailed { reason: "array length must be a non-negative integer constant".into(), span }),
    }
}

fn const_to_i128(value: &ConstValue, span: Span) -> Result<i128, CheckError> {
    match value {
        ConstValue::Int(i) => Ok(*i as i128),
        ConstValue::UInt(u) => Ok(*u as i128),
        _ => Err(CheckError::ConstEvalFailed { reason: "enum value must be an integer constant".into(), span }),
    }
}

pub fn resolve_type(ctx: &mut CheckCtx, ty: &Type) -> Result<TypeId, CheckError> {
    let base = resolve_type_kind(ctx, ty)?;
    if ty.flags.is_const {
        let flags = ctx.types.flags(base).with_const(true);
        Ok(ctx.types.lookup_with_flags(base, flags))
    } else {
        Ok(base)
    }
}

fn resolve_type_kind(ctx: &mut CheckCtx, ty: &Type) -> Result<TypeId, CheckError> {
    use faxc_ty::TypeFlags;
    match &ty.kind {
        TypeKind::Builtin(b) => Ok(ctx.types.builtin(builtin_storage(*b), false)),

        TypeKind::Pointer { nullable, referent } => {
            let r = resolve_type(ctx, referent)?;
            Ok(ctx.types.lookup_pointer(r, *nullable, TypeFlags::NONE))
        }

        TypeKind::Slice(elem) => {
            let e = resolve_type(ctx, elem)?;
            Ok(ctx.types.lookup_slice(e, TypeFlags::NONE))
        }

        TypeKind::Array { elem, len } => {
            let e = resolve_type(ctx, elem)?;
            let len_val = match len {
                None => None,
                Some(expr) => {
                    let size_ty = ctx.types.builtin(StorageClass::Size, false);
                    let v = faxc_eval::eval_expr(ctx, expr, Some(size_ty))?;
                    Some(const_to_u64(&v, expr.span)?)
                }
            };
            Ok(ctx.types.lookup_array(e, len_val, TypeFlags::NONE))
        }

        TypeKind::Struct(fields) => {
            let mut out = Vec::with_capacity(fields.len());
            for f in fields {
                out.push(Field { name: f.name, ty: resolve_type(ctx, &f.ty)? });
            }
            Ok(ctx.types.lookup_struct(out, TypeFlags::NONE))
        }

        TypeKind::Union(fields) => {
            let mut out = Vec::with_capacity(fields.len());
            for f in fields {
                out.push(Field { name: f.name, ty: resolve_type(ctx, &f.ty)? });
            }
            Ok(ctx.types.lookup_union(out, TypeFlags::NONE))
        }

        TypeKind::TaggedUnion(members) => {
            let mut out = Vec::with_capacity(members.len());
            for m in members {
                out.push(resolve_type(ctx, m)?);
            }
            Ok(ctx.types.lookup_tagged_union(out, TypeFlags::NONE))
        }

        TypeKind::Enum { storage, values } => {
            let storage_ty = match storage {
                Some(t) => resolve_type(ctx, t)?,
                None => ctx.types.builtin(StorageClass::Int, false),
            };
            let mut evaluated = Vec::with_capacity(values.len());
            let mut next_value: i128 = 0;
            for v in values {
                let value = match &v.value {
                    Some(expr) => {
                        let cv = faxc_eval::eval_expr(ctx, expr, Some(storage_ty))?;
                        const_to_i128(&cv, expr.span)?
                    }
                    None => next_value,
                };
                next_value = value + 1;
                evaluated.push((v.name, value));
            }
            Ok(ctx.types.lookup_enum(storage_ty, evaluated, TypeFlags::NONE))
        }

        TypeKind::Function { params, variadism, result } => {
            let native = matches!(variadism, Variadism::Native);
            let mut param_ids = Vec::with_capacity(params.len());
            for (i, p) in params.iter().enumerate() {
                let resolved = resolve_type(ctx, p)?;
                // The final parameter of a natively-variadic function is
                // declared with the element type; it's stored (and seen
                // by callers and the function body alike) as a slice.
                if native && i == params.len() - 1 {
                    param_ids.push(ctx.types.lookup_slice(resolved, TypeFlags::NONE));
                } else {
                    param_ids.push(resolved);
                }
            }
            let result_id = resolve_type(ctx, result)?;
            Ok(ctx.types.lookup_function(param_ids, native, result_id))
        }

        TypeKind::Alias(ident) => {
            let obj = ctx
                .scopes
                .lookup(ctx.current, ident)
                .ok_or_else(|| CheckError::UnresolvedName { name: ident_text(ident), span: ty.span })?;
            if obj.kind != ObjectKind::Type {
                return Err(CheckError::TypeMismatch {
                    expected: "type".into(),
                    found: format!("value `{}`", ident_text(ident)),
                    span: ty.span,
                });
            }
            Ok(obj.ty)
        }
    }
}

/// Mangle an identifier as `namespace::name`, or just `name` if it has
/// no namespace — the default mangling a `@symbol` attribute overrides.
pub fn mangle(ident: &faxc_par::ast::Ident) -> Symbol {
    Symbol::intern(&ident_text(ident))
}

/// Resolve a function prototype's parameter and result types, applying
/// the native-variadic tail-parameter-to-slice transform. Returns the
/// interned function type plus each parameter's stored type (the last
/// one already a slice, for a natively variadic function) so the caller
/// can bind parameters in the function's scope without re-deriving it.
pub fn resolve_func_type(
    ctx: &mut CheckCtx,
    params: &[faxc_par::ast::ParamDecl],
    variadism: Variadism,
    result: &Type,
) -> Result<(TypeId, Vec<TypeId>), CheckError> {
    use faxc_ty::TypeFlags;
    let native = matches!(variadism, Variadism::Native);
    let mut param_ids = Vec::with_capacity(params.len());
    for (i, p) in params.iter().enumerate() {
        let resolved = resolve_type(ctx, &p.ty)?;
        if native && i == params.len() - 1 {
            param_ids.push(ctx.types.lookup_slice(resolved, TypeFlags::NONE));
        } else {
            param_ids.push(resolved);
        }
    }
    let result_id = resolve_type(ctx, result)?;
    let fn_ty = ctx.types.lookup_function(param_ids.clone(), native, result_id);
    Ok((fn_ty, param_ids))
}
