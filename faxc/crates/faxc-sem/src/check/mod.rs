//! Pass 2's workhorse: `check_expression` elaborates one untyped
//! `ast::Expr` into a `TypedExpr`, given an optional contextual type
//! hint. Each expression kind gets its own function; the ones with
//! enough moving parts to deserve a file of their own live in this
//! module's submodules, the rest are implemented directly below.

mod binding;
mod call;
mod cast;
mod flow;
mod literal;
mod slice;
mod switch;

use faxc_par::ast::{self, BinOp, ControlKind, Expr, ExprKind, UnOp};
use faxc_ty::{Deref, StorageClass, TypeId, TypePayload};
use faxc_util::{CheckError, Span, Symbol};

use crate::context::CheckCtx;
use crate::scope::ObjectKind;
use crate::typed::{TypedExpr, TypedExprKind, TypedMeasure};
use crate::util::{ident_text, type_name};

pub fn check_expression(ctx: &mut CheckCtx, expr: &Expr, hint: Option<TypeId>) -> Result<TypedExpr, CheckError> {
    match &expr.kind {
        ExprKind::Ident(ident) => check_ident(ctx, ident, expr.span),
        ExprKind::Index { array, index } => check_index(ctx, array, index, expr.span),
        ExprKind::Field { object, field } => check_field(ctx, object, *field, expr.span),
        ExprKind::Assert { cond, message } => check_assert(ctx, cond.as_deref(), message.as_deref(), expr.span),
        ExprKind::Assign { object, value, op, indirect } => check_assign(ctx, object, value, *op, *indirect, expr.span),
        ExprKind::Binarithm { op, lhs, rhs } => check_binarithm(ctx, *op, lhs, rhs, expr.span),
        ExprKind::Binding(bindings) => binding::check_binding(ctx, bindings, expr.span),
        ExprKind::Call { callee, args } => call::check_call(ctx, callee, args, expr.span),
        ExprKind::Cast { kind, value, ty } => cast::check_cast(ctx, *kind, value, ty, expr.span),
        ExprKind::ConstantInt(i) => Ok(constant(ctx, faxc_eval::ConstValue::Int(*i), StorageClass::Int, expr.span)),
        ExprKind::ConstantUInt(u) => Ok(constant(ctx, faxc_eval::ConstValue::UInt(*u), StorageClass::Uint, expr.span)),
        ExprKind::ConstantFloat(f) => Ok(constant(ctx, faxc_eval::ConstValue::Float(*f), StorageClass::F64, expr.span)),
        ExprKind::ConstantBool(b) => Ok(constant(ctx, faxc_eval::ConstValue::Bool(*b), StorageClass::Bool, expr.span)),
        ExprKind::ConstantRune(c) => Ok(constant(ctx, faxc_eval::ConstValue::Rune(*c), StorageClass::Rune, expr.span)),
        ExprKind::ConstantStr(s) => Ok(constant(ctx, faxc_eval::ConstValue::Str(*s), StorageClass::String, expr.span)),
        ExprKind::ConstantNull => Ok(constant(ctx, faxc_eval::ConstValue::Null, StorageClass::Null, expr.span)),
        ExprKind::ArrayLiteral(elements) => literal::check_array_literal(ctx, elements, hint, expr.span),
        ExprKind::Control { kind, label } => check_control(ctx, *kind, *label, expr.span),
        ExprKind::Defer(inner) => check_defer(ctx, inner, expr.span),
        ExprKind::For { label, bindings, cond, afterthought, body } => {
            flow::check_for(ctx, *label, bindings.as_deref(), cond.as_deref(), afterthought.as_deref(), body, expr.span)
        }
        ExprKind::If { cond, then_branch, else_branch } => {
            flow::check_if(ctx, cond, then_branch, else_branch.as_deref(), expr.span)
        }
        ExprKind::List(exprs) => flow::check_list(ctx, exprs, expr.span),
        ExprKind::Measure { op, operand } => check_measure(ctx, *op, operand, expr.span),
        ExprKind::Return(value) => check_return(ctx, value.as_deref(), expr.span),
        ExprKind::Slice { object, start, end } => slice::check_slice(ctx, object, start.as_deref(), end.as_deref(), expr.span),
        ExprKind::StructLiteral { name, fields } => literal::check_struct_literal(ctx, name.as_ref(), fields, expr.span),
        ExprKind::Switch { value, cases } => switch::check_switch(ctx, value, cases, expr.span),
        ExprKind::Unarithm { op, operand } => check_unarithm(ctx, *op, operand, expr.span),
    }
}

fn constant(ctx: &mut CheckCtx, value: faxc_eval::ConstValue, storage: StorageClass, span: Span) -> TypedExpr {
    let result = ctx.types.builtin(storage, false);
    TypedExpr { kind: TypedExprKind::Constant(value), result, terminates: false, span }
}

/// Insert an implicit cast materializing `value`'s coercion to `target`,
/// or return `value` unchanged if it's already of that type. Errors if
/// `target` isn't assignable from `value`'s type — this is the single
/// choke point every assignability-gated coercion in the check pass goes
/// through, satisfying the "every coercion is an explicit node" property.
pub(crate) fn cast_to(ctx: &mut CheckCtx, value: TypedExpr, target: TypeId, span: Span) -> Result<TypedExpr, CheckError> {
    if value.result == target {
        return Ok(value);
    }
    if !ctx.types.is_assignable(target, value.result) {
        return Err(CheckError::TypeMismatch {
            expected: type_name(&ctx.types, target),
            found: type_name(&ctx.types, value.result),
            span,
        });
    }
    Ok(wrap_cast(value, target, span))
}

/// Unconditionally wrap `value` in a `Cast` node targeting `target`,
/// without checking assignability. Used at the handful of sites the
/// grammar allows a conversion general assignability doesn't cover (the
/// variadic array-to-slice pack, and the index/slice bound narrowing to
/// `size`).
pub(crate) fn wrap_cast(value: TypedExpr, target: TypeId, span: Span) -> TypedExpr {
    if value.result == target {
        return value;
    }
    let terminates = value.terminates;
    TypedExpr {
        kind: TypedExprKind::Cast { kind: ast::CastKind::Plain, value: Box::new(value), ty: target },
        result: target,
        terminates,
        span,
    }
}

/// Cast an already-checked integer-typed index/bound expression down to
/// `size`, rejecting non-integer operands outright.
pub(crate) fn cast_index_to_size(ctx: &mut CheckCtx, value: TypedExpr, span: Span) -> Result<TypedExpr, CheckError> {
    if !ctx.types.is_integer(value.result) {
        return Err(CheckError::TypeMismatch {
            expected: "an integer".into(),
            found: type_name(&ctx.types, value.result),
            span,
        });
    }
    let size_ty = ctx.types.builtin(StorageClass::Size, false);
    Ok(wrap_cast(value, size_ty, span))
}

fn check_ident(ctx: &mut CheckCtx, ident: &ast::Ident, span: Span) -> Result<TypedExpr, CheckError> {
    let obj = ctx
        .scopes
        .lookup(ctx.current, ident)
        .ok_or_else(|| CheckError::UnresolvedName { name: ident_text(ident), span })?;
    match obj.kind {
        ObjectKind::Const => {
            let value = obj.value.clone().expect("O_CONST always carries a value");
            Ok(TypedExpr { kind: TypedExprKind::Constant(value), result: obj.ty, terminates: false, span })
        }
        ObjectKind::Type => Err(CheckError::TypeMismatch {
            expected: "a value".into(),
            found: format!("type `{}`", ident_text(ident)),
            span,
        }),
        ObjectKind::Bind | ObjectKind::Decl => {
            Ok(TypedExpr { kind: TypedExprKind::Ident { ident: ident.clone(), mangled: obj.mangled }, result: obj.ty, terminates: false, span })
        }
    }
}

fn check_index(ctx: &mut CheckCtx, array: &Expr, index: &Expr, span: Span) -> Result<TypedExpr, CheckError> {
    let array_checked = check_expression(ctx, array, None)?;
    let index_checked = check_expression(ctx, index, None)?;

    let target = match ctx.types.dereference(array_checked.result) {
        Deref::Nullable => return Err(CheckError::NullableIndex { span }),
        Deref::Type(t) => t,
    };
    let resolved = ctx.types.dealias(target);
    let (elem, const_propagated) = match &ctx.types.data(resolved).payload {
        TypePayload::Array { elem, .. } => (*elem, ctx.types.is_const(target)),
        TypePayload::Slice { elem } => (*elem, ctx.types.is_const(target)),
        _ => return Err(CheckError::NotIndexable { ty: type_name(&ctx.types, target), span: array.span }),
    };

    let index_cast = cast_index_to_size(ctx, index_checked, index.span)?;
    let result = if const_propagated {
        let flags = ctx.types.flags(elem).with_const(true);
        ctx.types.lookup_with_flags(elem, flags)
    } else {
        elem
    };
    let terminates = array_checked.terminates || index_cast.terminates;
    Ok(TypedExpr {
        kind: TypedExprKind::Index { array: Box::new(array_checked), index: Box::new(index_cast) },
        result,
        terminates,
        span,
    })
}

fn check_field(ctx: &mut CheckCtx, object: &Expr, field: Symbol, span: Span) -> Result<TypedExpr, CheckError> {
    let object_checked = check_expression(ctx, object, None)?;
    let target = match ctx.types.dereference(object_checked.result) {
        Deref::Nullable => return Err(CheckError::NullableField { span }),
        Deref::Type(t) => t,
    };
    let resolved = ctx.types.dealias(target);
    let fields = match &ctx.types.data(resolved).payload {
        TypePayload::Struct { fields } | TypePayload::Union { fields } => fields,
        _ => return Err(CheckError::NotFieldable { ty: type_name(&ctx.types, target), span: object.span }),
    };
    let found = fields.iter().position(|f| f.name == field).map(|index| (fields[index].ty, index));
    let (ty, index) = found.ok_or_else(|| CheckError::UnknownField {
        ty: type_name(&ctx.types, target),
        field: field.as_str().to_string(),
        span,
    })?;
    let terminates = object_checked.terminates;
    Ok(TypedExpr {
        kind: TypedExprKind::Field {
            object: Box::new(object_checked),
            field: faxc_ty::FieldDescriptor { name: field, ty, index },
        },
        result: ty,
        terminates,
        span,
    })
}

fn check_assert(ctx: &mut CheckCtx, cond: Option<&Expr>, message: Option<&Expr>, span: Span) -> Result<TypedExpr, CheckError> {
    let bool_ty = ctx.types.builtin(StorageClass::Bool, false);
    let cond_checked = match cond {
        Some(c) => {
            let checked = check_expression(ctx, c, Some(bool_ty))?;
            if ctx.types.storage(ctx.types.dealias(checked.result)) != StorageClass::Bool {
                return Err(CheckError::NonBooleanCondition { found: type_name(&ctx.types, checked.result), span: c.span });
            }
            Some(Box::new(checked))
        }
        None => None,
    };
    let str_ty = ctx.types.builtin(StorageClass::String, false);
    let message_checked = match message {
        Some(m) => {
            let checked = check_expression(ctx, m, Some(str_ty))?;
            cast_to(ctx, checked, str_ty, m.span)?
        }
        None => {
            let text = format!("Assertion failed: {}:{}", span.line, span.column);
            TypedExpr {
                kind: TypedExprKind::Constant(faxc_eval::ConstValue::Str(Symbol::intern(&text))),
                result: str_ty,
                terminates: false,
                span,
            }
        }
    };
    Ok(TypedExpr {
        kind: TypedExprKind::Assert { cond: cond_checked, message: Box::new(message_checked) },
        result: ctx.types.builtin(StorageClass::Void, false),
        terminates: false,
        span,
    })
}

fn assign_target_name(kind: &TypedExprKind) -> String {
    match kind {
        TypedExprKind::Ident { ident, .. } => ident_text(ident),
        TypedExprKind::Field { field, .. } => field.name.as_str().to_string(),
        TypedExprKind::Index { .. } => "<index expression>".to_string(),
        _ => "<expression>".to_string(),
    }
}

fn check_assign(
    ctx: &mut CheckCtx,
    object: &Expr,
    value: &Expr,
    op: Option<BinOp>,
    indirect: bool,
    span: Span,
) -> Result<TypedExpr, CheckError> {
    let object_checked = check_expression(ctx, object, None)?;
    let void_ty = ctx.types.builtin(StorageClass::Void, false);

    if indirect {
        let resolved = ctx.types.dealias(object_checked.result);
        let referent = match &ctx.types.data(resolved).payload {
            TypePayload::Pointer { referent, nullable: false } => *referent,
            TypePayload::Pointer { nullable: true, .. } => return Err(CheckError::NullableDeref { span }),
            _ => return Err(CheckError::NotDereferenceable { ty: type_name(&ctx.types, object_checked.result), span: object.span }),
        };
        let value_checked = check_expression(ctx, value, Some(referent))?;
        let value_cast = cast_to(ctx, value_checked, referent, value.span)?;
        let terminates = object_checked.terminates || value_cast.terminates;
        return Ok(TypedExpr {
            kind: TypedExprKind::Assign { object: Box::new(object_checked), value: Box::new(value_cast), op, indirect },
            result: void_ty,
            terminates,
            span,
        });
    }

    if ctx.types.is_const(object_checked.result) {
        return Err(CheckError::AssignToConst { name: assign_target_name(&object_checked.kind), span });
    }
    let value_checked = check_expression(ctx, value, Some(object_checked.result))?;
    let value_cast = cast_to(ctx, value_checked, object_checked.result, value.span)?;
    let terminates = object_checked.terminates || value_cast.terminates;
    Ok(TypedExpr {
        kind: TypedExprKind::Assign { object: Box::new(object_checked), value: Box::new(value_cast), op, indirect },
        result: void_ty,
        terminates,
        span,
    })
}

fn check_binarithm(ctx: &mut CheckCtx, op: BinOp, lhs: &Expr, rhs: &Expr, span: Span) -> Result<TypedExpr, CheckError> {
    let lhs_checked = check_expression(ctx, lhs, None)?;
    let rhs_checked = check_expression(ctx, rhs, None)?;
    let lhs_storage = ctx.types.storage(ctx.types.dealias(lhs_checked.result));
    let rhs_storage = ctx.types.storage(ctx.types.dealias(rhs_checked.result));
    if lhs_storage != rhs_storage {
        return Err(CheckError::TypeMismatch {
            expected: type_name(&ctx.types, lhs_checked.result),
            found: type_name(&ctx.types, rhs_checked.result),
            span,
        });
    }
    let result = if op.is_relational() { ctx.types.builtin(StorageClass::Bool, false) } else { lhs_checked.result };
    let terminates = lhs_checked.terminates || rhs_checked.terminates;
    Ok(TypedExpr {
        kind: TypedExprKind::Binarithm { op, lhs: Box::new(lhs_checked), rhs: Box::new(rhs_checked) },
        result,
        terminates,
        span,
    })
}

fn is_signed_numeric(ctx: &CheckCtx, id: TypeId) -> bool {
    ctx.types.is_float(id) || ctx.types.is_signed(id)
}

fn check_unarithm(ctx: &mut CheckCtx, op: UnOp, operand: &Expr, span: Span) -> Result<TypedExpr, CheckError> {
    match op {
        UnOp::Address => {
            let checked = check_expression(ctx, operand, None)?;
            let terminates = checked.terminates;
            let result = ctx.types.lookup_pointer(checked.result, false, faxc_ty::TypeFlags::NONE);
            Ok(TypedExpr { kind: TypedExprKind::Unarithm { op, operand: Box::new(checked) }, result, terminates, span })
        }
        UnOp::Deref => {
            let checked = check_expression(ctx, operand, None)?;
            let resolved = ctx.types.dealias(checked.result);
            let referent = match &ctx.types.data(resolved).payload {
                TypePayload::Pointer { referent, nullable: false } => *referent,
                TypePayload::Pointer { nullable: true, .. } => return Err(CheckError::NullableDeref { span }),
                _ => return Err(CheckError::NotDereferenceable { ty: type_name(&ctx.types, checked.result), span: operand.span }),
            };
            let terminates = checked.terminates;
            Ok(TypedExpr { kind: TypedExprKind::Unarithm { op, operand: Box::new(checked) }, result: referent, terminates, span })
        }
        UnOp::Not => {
            let bool_ty = ctx.types.builtin(StorageClass::Bool, false);
            let checked = check_expression(ctx, operand, Some(bool_ty))?;
            if ctx.types.storage(ctx.types.dealias(checked.result)) != StorageClass::Bool {
                return Err(CheckError::TypeMismatch {
                    expected: "bool".into(),
                    found: type_name(&ctx.types, checked.result),
                    span: operand.span,
                });
            }
            let terminates = checked.terminates;
            Ok(TypedExpr { kind: TypedExprKind::Unarithm { op, operand: Box::new(checked) }, result: bool_ty, terminates, span })
        }
        UnOp::BitNot => {
            let checked = check_expression(ctx, operand, None)?;
            if !ctx.types.is_integer(checked.result) || ctx.types.is_signed(checked.result) {
                return Err(CheckError::TypeMismatch {
                    expected: "an unsigned integer".into(),
                    found: type_name(&ctx.types, checked.result),
                    span: operand.span,
                });
            }
            let result = checked.result;
            let terminates = checked.terminates;
            Ok(TypedExpr { kind: TypedExprKind::Unarithm { op, operand: Box::new(checked) }, result, terminates, span })
        }
        UnOp::Neg | UnOp::Plus => {
            let checked = check_expression(ctx, operand, None)?;
            if !is_signed_numeric(ctx, checked.result) {
                return Err(CheckError::TypeMismatch {
                    expected: "a signed numeric type".into(),
                    found: type_name(&ctx.types, checked.result),
                    span: operand.span,
                });
            }
            let result = checked.result;
            let terminates = checked.terminates;
            Ok(TypedExpr { kind: TypedExprKind::Unarithm { op, operand: Box::new(checked) }, result, terminates, span })
        }
    }
}

fn check_control(ctx: &mut CheckCtx, kind: ControlKind, label: Option<Symbol>, span: Span) -> Result<TypedExpr, CheckError> {
    if ctx.scopes.lookup_label(ctx.current, label).is_none() {
        return match label {
            Some(l) => Err(CheckError::UnknownLabel { label: l.as_str().to_string(), span }),
            None => Err(CheckError::UnknownLabelTarget { label: "<unlabeled>".to_string(), span }),
        };
    }
    Ok(TypedExpr {
        kind: TypedExprKind::Control { kind, label },
        result: ctx.types.builtin(StorageClass::Void, false),
        terminates: true,
        span,
    })
}

fn check_defer(ctx: &mut CheckCtx, inner: &Expr, span: Span) -> Result<TypedExpr, CheckError> {
    if ctx.deferring {
        return Err(CheckError::NestedDefer { span });
    }
    ctx.deferring = true;
    let result = check_expression(ctx, inner, None);
    ctx.deferring = false;
    let inner_checked = result?;
    Ok(TypedExpr {
        kind: TypedExprKind::Defer(Box::new(inner_checked)),
        result: ctx.types.builtin(StorageClass::Void, false),
        terminates: false,
        span,
    })
}

fn check_measure(ctx: &mut CheckCtx, op: ast::MeasureOp, operand: &ast::MeasureOperand, span: Span) -> Result<TypedExpr, CheckError> {
    let size_ty = ctx.types.builtin(StorageClass::Size, false);
    match (op, operand) {
        (ast::MeasureOp::Len, ast::MeasureOperand::Expr(e)) => {
            let checked = check_expression(ctx, e, None)?;
            let resolved = ctx.types.dealias(checked.result);
            let sized = match (&ctx.types.data(resolved).payload, ctx.types.storage(resolved)) {
                (TypePayload::Array { len: Some(_), .. }, StorageClass::Array) => true,
                (_, StorageClass::Slice) | (_, StorageClass::String) => true,
                _ => false,
            };
            if !sized {
                return Err(CheckError::TypeMismatch {
                    expected: "a sized array, slice, or string".into(),
                    found: type_name(&ctx.types, checked.result),
                    span: e.span,
                });
            }
            let terminates = checked.terminates;
            Ok(TypedExpr { kind: TypedExprKind::Measure(TypedMeasure::Len(Box::new(checked))), result: size_ty, terminates, span })
        }
        (ast::MeasureOp::Len, ast::MeasureOperand::Type(_)) => {
            Err(CheckError::TypeMismatch { expected: "an expression".into(), found: "a type".into(), span })
        }
        (ast::MeasureOp::Size, ast::MeasureOperand::Type(t)) => {
            let ty = crate::resolve::resolve_type(ctx, t)?;
            Ok(TypedExpr { kind: TypedExprKind::Measure(TypedMeasure::Size(ty)), result: size_ty, terminates: false, span })
        }
        (ast::MeasureOp::Size, ast::MeasureOperand::Expr(_)) => {
            Err(CheckError::TypeMismatch { expected: "a type".into(), found: "an expression".into(), span })
        }
        (ast::MeasureOp::Offset, _) => Err(CheckError::Unimplemented { feature: "offset measurement".into(), span }),
    }
}

fn check_return(ctx: &mut CheckCtx, value: Option<&Expr>, span: Span) -> Result<TypedExpr, CheckError> {
    let result_ty = ctx.current_function.ok_or(CheckError::ReturnOutsideFunction { span })?;
    let void_ty = ctx.types.builtin(StorageClass::Void, false);
    let value_checked = match value {
        Some(v) => {
            let checked = check_expression(ctx, v, Some(result_ty))?;
            Some(Box::new(cast_to(ctx, checked, result_ty, v.span)?))
        }
        None => {
            if result_ty != void_ty {
                return Err(CheckError::TypeMismatch {
                    expected: type_name(&ctx.types, result_ty),
                    found: "void (no return value)".into(),
                    span,
                });
            }
            None
        }
    };
    Ok(TypedExpr { kind: TypedExprKind::Return(value_checked), result: void_ty, terminates: true, span })
}
