//! Expression nodes.
//!
//! SNL expressions are integer constants, variable references and binary
//! operators. `<` and `=` produce booleans; the arithmetic operators
//! produce integers.

use std::fmt;

use snl_core::Span;

use crate::node::{Ident, NodeId};

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Integer constant
    Const(ConstExpr),
    /// Variable, array element or record field
    Var(VarRef<'ast>),
    /// Binary operation
    Binary(&'ast BinaryExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// The node id used for annotations.
    pub fn id(&self) -> NodeId {
        match self {
            Expr::Const(c) => c.id,
            Expr::Var(v) => v.id,
            Expr::Binary(b) => b.id,
        }
    }

    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Expr::Const(c) => c.span,
            Expr::Var(v) => v.span,
            Expr::Binary(b) => b.span,
        }
    }

    /// The variable reference, if this expression is one.
    pub fn as_var(&self) -> Option<&VarRef<'ast>> {
        match self {
            Expr::Var(v) => Some(v),
            _ => None,
        }
    }
}

/// An integer constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstExpr {
    pub id: NodeId,
    pub value: i64,
    pub span: Span,
}

/// A binary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    pub id: NodeId,
    /// Left operand
    pub left: &'ast Expr<'ast>,
    /// Operator
    pub op: BinaryOp,
    /// Right operand
    pub right: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A reference to variable storage: `x`, `a[i]`, `r.f` or `r.f[i]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarRef<'ast> {
    pub id: NodeId,
    /// The variable name
    pub name: Ident<'ast>,
    /// Selector applied to the variable
    pub access: VarAccess<'ast>,
    pub span: Span,
}

/// Selector of a [`VarRef`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VarAccess<'ast> {
    /// `x`
    Plain,
    /// `a[index]`
    Index(&'ast Expr<'ast>),
    /// `r.field` or `r.field[index]`
    Field {
        field: Ident<'ast>,
        index: Option<&'ast Expr<'ast>>,
    },
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `<`
    Less,
    /// `=`
    Equal,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

impl BinaryOp {
    /// Check if this operator is a comparison.
    pub fn is_comparison(&self) -> bool {
        matches!(self, BinaryOp::Less | BinaryOp::Equal)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Less => "<",
            BinaryOp::Equal => "=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        };
        write!(f, "{}", s)
    }
}
