//! faxc-eval - the compile-time constant evaluator.
//!
//! Const declarations, static binding initializers, enum member values,
//! switch case options and the trailing `...` fill count of an array
//! literal all need a value at check time, not just a type. This crate
//! folds the subset of expressions that can produce one; everything else
//! is rejected with [`CheckError::ConstEvalFailed`].
//!
//! Evaluation never touches scopes directly — `faxc-sem` implements
//! [`ConstContext`] over its own scope tree and hands it in, so this
//! crate stays a leaf with no dependency on the checker.

use faxc_par::ast::{ArrayElement, BinOp, CastKind, Expr, ExprKind, Ident, UnOp};
use faxc_ty::{StorageClass, TypeId, TypeStore};
use faxc_util::{CheckError, Symbol};

/// A folded compile-time constant.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Rune(char),
    Str(Symbol),
    Null,
    Array(Vec<ConstValue>),
}

/// What `eval_expr` needs from the checker: the type store (to read an
/// array-type hint's length) and a way to resolve an already-checked
/// const declaration by name.
pub trait ConstContext {
    fn types(&self) -> &TypeStore;
    fn lookup_const(&self, ident: &Ident) -> Option<&ConstValue>;
}

fn ident_text(ident: &Ident) -> String {
    let mut parts = vec![ident.name.as_str()];
    let mut cur = ident.namespace.as_deref();
    while let Some(ns) = cur {
        parts.push(ns.name.as_str());
        cur = ns.namespace.as_deref();
    }
    parts.reverse();
    parts.join("::")
}

fn fail(reason: impl Into<String>, expr: &Expr) -> CheckError {
    CheckError::ConstEvalFailed { reason: reason.into(), span: expr.span }
}

pub fn eval_expr(ctx: &dyn ConstContext, expr: &Expr, hint: Option<TypeId>) -> Result<ConstValue, CheckError> {
    match &expr.kind {
        ExprKind::ConstantInt(i) => Ok(ConstValue::Int(*i)),
        ExprKind::ConstantUInt(u) => Ok(ConstValue::UInt(*u)),
        ExprKind::ConstantFloat(f) => Ok(ConstValue::Float(*f)),
        ExprKind::ConstantBool(b) => Ok(ConstValue::Bool(*b)),
        ExprKind::ConstantRune(c) => Ok(ConstValue::Rune(*c)),
        ExprKind::ConstantStr(s) => Ok(ConstValue::Str(*s)),
        ExprKind::ConstantNull => Ok(ConstValue::Null),

        ExprKind::Ident(ident) => ctx
            .lookup_const(ident)
            .cloned()
            .ok_or_else(|| fail(format!("`{}` is not a compile-time constant", ident_text(ident)), expr)),

        ExprKind::Unarithm { op, operand } => eval_unary(ctx, *op, operand, expr),
        ExprKind::Binarithm { op, lhs, rhs } => eval_binary(ctx, *op, lhs, rhs, expr),

        ExprKind::Cast { kind: CastKind::Plain, value, ty } => eval_numeric_cast(ctx, value, ty, expr),

        ExprKind::ArrayLiteral(elements) => eval_array(ctx, elements, hint, expr),

        _ => Err(fail("expression is not a compile-time constant", expr)),
    }
}

fn eval_unary(ctx: &dyn ConstContext, op: UnOp, operand: &Expr, expr: &Expr) -> Result<ConstValue, CheckError> {
    let value = eval_expr(ctx, operand, None)?;
    match (op, value) {
        (UnOp::Neg, ConstValue::Int(i)) => Ok(ConstValue::Int(-i)),
        (UnOp::Neg, ConstValue::Float(f)) => Ok(ConstValue::Float(-f)),
        (UnOp::Plus, v @ ConstValue::Int(_)) | (UnOp::Plus, v @ ConstValue::Float(_)) | (UnOp::Plus, v @ ConstValue::UInt(_)) => {
            Ok(v)
        }
        (UnOp::BitNot, ConstValue::UInt(u)) => Ok(ConstValue::UInt(!u)),
        (UnOp::Not, ConstValue::Bool(b)) => Ok(ConstValue::Bool(!b)),
        _ => Err(fail("operator not applicable to this constant", expr)),
    }
}

fn eval_binary(ctx: &dyn ConstContext, op: BinOp, lhs: &Expr, rhs: &Expr, expr: &Expr) -> Result<ConstValue, CheckError> {
    let lv = eval_expr(ctx, lhs, None)?;
    let rv = eval_expr(ctx, rhs, None)?;

    if op.is_relational() {
        return eval_relational(op, &lv, &rv, expr);
    }

    match (lv, rv) {
        (ConstValue::Int(a), ConstValue::Int(b)) => eval_int_arith(op, a, b, expr),
        (ConstValue::UInt(a), ConstValue::UInt(b)) => eval_uint_arith(op, a, b, expr),
        (ConstValue::Float(a), ConstValue::Float(b)) => eval_float_arith(op, a, b, expr),
        _ => Err(fail("mismatched constant operand kinds", expr)),
    }
}

fn eval_int_arith(op: BinOp, a: i64, b: i64, expr: &Expr) -> Result<ConstValue, CheckError> {
    let result = match op {
        BinOp::Add => a.checked_add(b),
        BinOp::Sub => a.checked_sub(b),
        BinOp::Mul => a.checked_mul(b),
        BinOp::Div => a.checked_div(b),
        BinOp::Mod => a.checked_rem(b),
        BinOp::BitAnd => Some(a & b),
        BinOp::BitOr => Some(a | b),
        BinOp::BitXor => Some(a ^ b),
        BinOp::Shl => Some(a.wrapping_shl(b as u32)),
        BinOp::Shr => Some(a.wrapping_shr(b as u32)),
        _ => return Err(fail("operator not applicable to integer constants", expr)),
    };
    result.map(ConstValue::Int).ok_or_else(|| fail("constant arithmetic overflowed or divided by zero", expr))
}

fn eval_uint_arith(op: BinOp, a: u64, b: u64, expr: &Expr) -> Result<ConstValue, CheckError> {
    let result = match op {
        BinOp::Add => a.checked_add(b),
        BinOp::Sub => a.checked_sub(b),
        BinOp::Mul => a.checked_mul(b),
        BinOp::Div => a.checked_div(b),
        BinOp::Mod => a.checked_rem(b),
        BinOp::BitAnd => Some(a & b),
        BinOp::BitOr => Some(a | b),
        BinOp::BitXor => Some(a ^ b),
        BinOp::Shl => Some(a.wrapping_shl(b as u32)),
        BinOp::Shr => Some(a.wrapping_shr(b as u32)),
        _ => return Err(fail("operator not applicable to integer constants", expr)),
    };
    result.map(ConstValue::UInt).ok_or_else(|| fail("constant arithmetic overflowed or divided by zero", expr))
}

fn eval_float_arith(op: BinOp, a: f64, b: f64, expr: &Expr) -> Result<ConstValue, CheckError> {
    match op {
        BinOp::Add => Ok(ConstValue::Float(a + b)),
        BinOp::Sub => Ok(ConstValue::Float(a - b)),
        BinOp::Mul => Ok(ConstValue::Float(a * b)),
        BinOp::Div => Ok(ConstValue::Float(a / b)),
        _ => Err(fail("operator not applicable to floating-point constants", expr)),
    }
}

fn eval_relational(op: BinOp, lv: &ConstValue, rv: &ConstValue, expr: &Expr) -> Result<ConstValue, CheckError> {
    use std::cmp::Ordering;
    let ordering = match (lv, rv) {
        (ConstValue::Int(a), ConstValue::Int(b)) => Some(a.cmp(b)),
        (ConstValue::UInt(a), ConstValue::UInt(b)) => Some(a.cmp(b)),
        (ConstValue::Float(a), ConstValue::Float(b)) => a.partial_cmp(b),
        (ConstValue::Rune(a), ConstValue::Rune(b)) => Some(a.cmp(b)),
        (ConstValue::Bool(a), ConstValue::Bool(b)) if matches!(op, BinOp::Eq | BinOp::Ne | BinOp::LAnd | BinOp::LOr | BinOp::LXor) => {
            return eval_bool_relational(op, *a, *b, expr)
        }
        _ => None,
    };
    let ordering = ordering.ok_or_else(|| fail("mismatched constant operand kinds", expr))?;
    let result = match op {
        BinOp::Lt => ordering == Ordering::Less,
        BinOp::Le => ordering != Ordering::Greater,
        BinOp::Gt => ordering == Ordering::Greater,
        BinOp::Ge => ordering != Ordering::Less,
        BinOp::Eq => ordering == Ordering::Equal,
        BinOp::Ne => ordering != Ordering::Equal,
        _ => return Err(fail("operator not applicable to these constants", expr)),
    };
    Ok(ConstValue::Bool(result))
}

fn eval_bool_relational(op: BinOp, a: bool, b: bool, expr: &Expr) -> Result<ConstValue, CheckError> {
    let result = match op {
        BinOp::Eq => a == b,
        BinOp::Ne => a != b,
        BinOp::LAnd => a && b,
        BinOp::LOr => a || b,
        BinOp::LXor => a != b,
        _ => return Err(fail("operator not applicable to bool constants", expr)),
    };
    Ok(ConstValue::Bool(result))
}

fn eval_numeric_cast(
    ctx: &dyn ConstContext,
    value: &Expr,
    ty: &faxc_par::ast::Type,
    expr: &Expr,
) -> Result<ConstValue, CheckError> {
    use faxc_par::ast::{BuiltinType, TypeKind};
    let target = match &ty.kind {
        TypeKind::Builtin(b) => *b,
        _ => return Err(fail("only casts to a builtin numeric type are constant", expr)),
    };
    let folded = eval_expr(ctx, value, None)?;
    let as_i64 = |v: &ConstValue| -> Option<i64> {
        match v {
            ConstValue::Int(i) => Some(*i),
            ConstValue::UInt(u) => Some(*u as i64),
            ConstValue::Float(f) => Some(*f as i64),
            ConstValue::Rune(c) => Some(*c as i64),
            _ => None,
        }
    };
    match target {
        BuiltinType::I8 => Ok(ConstValue::Int(as_i64(&folded).ok_or_else(|| fail("not a numeric constant", expr))? as i8 as i64)),
        BuiltinType::I16 => Ok(ConstValue::Int(as_i64(&folded).ok_or_else(|| fail("not a numeric constant", expr))? as i16 as i64)),
        BuiltinType::I32 => Ok(ConstValue::Int(as_i64(&folded).ok_or_else(|| fail("not a numeric constant", expr))? as i32 as i64)),
        BuiltinType::I64 | BuiltinType::Int => {
            Ok(ConstValue::Int(as_i64(&folded).ok_or_else(|| fail("not a numeric constant", expr))?))
        }
        BuiltinType::U8 => Ok(ConstValue::UInt(as_i64(&folded).ok_or_else(|| fail("not a numeric constant", expr))? as u8 as u64)),
        BuiltinType::U16 => Ok(ConstValue::UInt(as_i64(&folded).ok_or_else(|| fail("not a numeric constant", expr))? as u16 as u64)),
        BuiltinType::U32 => Ok(ConstValue::UInt(as_i64(&folded).ok_or_else(|| fail("not a numeric constant", expr))? as u32 as u64)),
        BuiltinType::U64 | BuiltinType::Uint | BuiltinType::Uintptr | BuiltinType::Size => {
            Ok(ConstValue::UInt(as_i64(&folded).ok_or_else(|| fail("not a numeric constant", expr))? as u64))
        }
        BuiltinType::F32 | BuiltinType::F64 => {
            let f = match folded {
                ConstValue::Int(i) => i as f64,
                ConstValue::UInt(u) => u as f64,
                ConstValue::Float(f) => f,
                _ => return Err(fail("not a numeric constant", expr)),
            };
            Ok(ConstValue::Float(f))
        }
        _ => Err(fail("cast target is not a numeric type", expr)),
    }
}

fn eval_array(
    ctx: &dyn ConstContext,
    elements: &[ArrayElement],
    hint: Option<TypeId>,
    expr: &Expr,
) -> Result<ConstValue, CheckError> {
    let mut values = Vec::with_capacity(elements.len());
    for (i, element) in elements.iter().enumerate() {
        let value = eval_expr(ctx, &element.value, None)?;
        if element.expand {
            if i != elements.len() - 1 {
                return Err(fail("`...` is only allowed on the final array element", expr));
            }
            let target_len = hint.and_then(|t| array_len(ctx.types(), t));
            let target_len = target_len.ok_or_else(|| fail("`...` needs a sized array type to expand into", expr))?;
            while values.len() < target_len as usize {
                values.push(value.clone());
            }
        } else {
            values.push(value);
        }
    }
    Ok(ConstValue::Array(values))
}

fn array_len(types: &TypeStore, id: TypeId) -> Option<u64> {
    let resolved = types.dealias(id);
    match (&types.data(resolved).payload, types.storage(resolved)) {
        (faxc_ty::TypePayload::Array { len: Some(n), .. }, StorageClass::Array) => Some(*n),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faxc_par::ast::{Expr, ExprKind};
    use faxc_util::Span;

    struct EmptyCtx(TypeStore);
    impl ConstContext for EmptyCtx {
        fn types(&self) -> &TypeStore {
            &self.0
        }
        fn lookup_const(&self, _ident: &Ident) -> Option<&ConstValue> {
            None
        }
    }

    fn int(n: i64) -> Expr {
        Expr { kind: ExprKind::ConstantInt(n), span: Span::DUMMY }
    }

    fn binop(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr { kind: ExprKind::Binarithm { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }, span: Span::DUMMY }
    }

    #[test]
    fn folds_integer_arithmetic() {
        let ctx = EmptyCtx(TypeStore::new());
        let expr = binop(BinOp::Add, int(2), binop(BinOp::Mul, int(3), int(4)));
        assert_eq!(eval_expr(&ctx, &expr, None).unwrap(), ConstValue::Int(14));
    }

    #[test]
    fn division_by_zero_is_rejected() {
        let ctx = EmptyCtx(TypeStore::new());
        let expr = binop(BinOp::Div, int(1), int(0));
        assert!(eval_expr(&ctx, &expr, None).is_err());
    }

    #[test]
    fn relational_on_ints_yields_bool() {
        let ctx = EmptyCtx(TypeStore::new());
        let expr = binop(BinOp::Lt, int(1), int(2));
        assert_eq!(eval_expr(&ctx, &expr, None).unwrap(), ConstValue::Bool(true));
    }

    #[test]
    fn non_constant_expression_is_rejected() {
        let ctx = EmptyCtx(TypeStore::new());
        let expr = Expr {
            kind: ExprKind::Ident(Ident::bare(Symbol::intern("missing"))),
            span: Span::DUMMY,
        };
        assert!(eval_expr(&ctx, &expr, None).is_err());
    }
}
