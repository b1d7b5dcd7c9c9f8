//! The typed tree the check pass produces. Every node carries its
//! resolved `result` type and whether control can fall past it.
//!
//! Constants are spliced at the use site rather than referenced: when an
//! identifier resolves to an `O_CONST` object, `check_expression` clones
//! that object's already-evaluated [`ConstValue`] straight into the tree
//! (see `check::access::check_ident`), so after a successful check there
//! are no remaining references to `O_CONST` scope objects anywhere.

use faxc_eval::ConstValue;
use faxc_par::ast::{BinOp, CastKind, ControlKind, Ident, UnOp};
use faxc_ty::{FieldDescriptor, TypeId};
use faxc_util::{Span, Symbol};

#[derive(Debug, Clone)]
pub struct TypedExpr {
    pub kind: TypedExprKind,
    pub result: TypeId,
    pub terminates: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedBinding {
    pub mangled: Symbol,
    pub ty: TypeId,
    pub is_static: bool,
    pub init: TypedExpr,
}

#[derive(Debug, Clone)]
pub struct TypedStructField {
    pub field: FieldDescriptor,
    pub value: TypedExpr,
}

#[derive(Debug, Clone)]
pub struct TypedSwitchCase {
    pub options: Vec<TypedExpr>,
    pub body: TypedExpr,
}

#[derive(Debug, Clone)]
pub enum TypedMeasure {
    Len(Box<TypedExpr>),
    Size(TypeId),
    Offset(Box<TypedExpr>),
}

#[derive(Debug, Clone)]
pub enum TypedExprKind {
    /// A reference to a resolved `O_BIND`/`O_DECL` object. `O_CONST`
    /// references never reach this stage — see the module doc comment.
    Ident { ident: Ident, mangled: Symbol },
    Index { array: Box<TypedExpr>, index: Box<TypedExpr> },
    Field { object: Box<TypedExpr>, field: FieldDescriptor },
    Assert { cond: Option<Box<TypedExpr>>, message: Box<TypedExpr> },
    Assign { object: Box<TypedExpr>, value: Box<TypedExpr>, op: Option<BinOp>, indirect: bool },
    /// The elaborated elements of an array literal, already cast to the
    /// element type and expanded to their final length. Distinct from
    /// `Constant` since elements may be arbitrary runtime expressions.
    ArrayLiteral(Vec<TypedExpr>),
    Binarithm { op: BinOp, lhs: Box<TypedExpr>, rhs: Box<TypedExpr> },
    Binding(Vec<TypedBinding>),
    Call { callee: Box<TypedExpr>, args: Vec<TypedExpr> },
    Cast { kind: CastKind, value: Box<TypedExpr>, ty: TypeId },
    Constant(ConstValue),
    Control { kind: ControlKind, label: Option<Symbol> },
    Defer(Box<TypedExpr>),
    For {
        label: Option<Symbol>,
        bindings: Option<Box<TypedExpr>>,
        cond: Option<Box<TypedExpr>>,
        afterthought: Option<Box<TypedExpr>>,
        body: Box<TypedExpr>,
    },
    If { cond: Box<TypedExpr>, then_branch: Box<TypedExpr>, else_branch: Option<Box<TypedExpr>> },
    List(Vec<TypedExpr>),
    Measure(TypedMeasure),
    Return(Option<Box<TypedExpr>>),
    Slice { object: Box<TypedExpr>, start: Option<Box<TypedExpr>>, end: Option<Box<TypedExpr>> },
    Struct(Vec<TypedStructField>),
    Switch { value: Box<TypedExpr>, cases: Vec<TypedSwitchCase> },
    Unarithm { op: UnOp, operand: Box<TypedExpr> },
}

#[derive(Debug, Clone)]
pub struct TypedFunc {
    pub mangled: Symbol,
    pub ty: TypeId,
    pub params: Vec<Symbol>,
    pub body: Option<TypedExpr>,
}

#[derive(Debug, Clone)]
pub struct TypedGlobal {
    pub mangled: Symbol,
    pub ty: TypeId,
    pub init: Option<TypedExpr>,
}

#[derive(Debug, Clone)]
pub struct TypedTypeDecl {
    pub mangled: Symbol,
    pub ty: TypeId,
}

#[derive(Debug, Clone)]
pub enum TypedDeclKind {
    Func(TypedFunc),
    Global(TypedGlobal),
    Type(TypedTypeDecl),
}

#[derive(Debug, Clone)]
pub struct TypedDecl {
    pub kind: TypedDeclKind,
    pub exported: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TypedUnit {
    pub decls: Vec<TypedDecl>,
}
