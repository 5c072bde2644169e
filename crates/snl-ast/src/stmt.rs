//! Statement nodes.

use snl_core::Span;

use crate::expr::{Expr, VarRef};
use crate::node::{Ident, NodeId};

/// A statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    /// `target := value`
    Assign(AssignStmt<'ast>),
    /// `if c then ... else ... fi`
    If(&'ast IfStmt<'ast>),
    /// `while c do ... endwh`
    While(&'ast WhileStmt<'ast>),
    /// `read(target)`
    Read(ReadStmt<'ast>),
    /// `write(value)`
    Write(WriteStmt<'ast>),
    /// `p(args)`
    Call(CallStmt<'ast>),
    /// `return`
    Return(ReturnStmt),
}

impl Stmt<'_> {
    /// Get the span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Self::Assign(s) => s.span,
            Self::If(s) => s.span,
            Self::While(s) => s.span,
            Self::Read(s) => s.span,
            Self::Write(s) => s.span,
            Self::Call(s) => s.span,
            Self::Return(s) => s.span,
        }
    }
}

/// An assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignStmt<'ast> {
    pub target: VarRef<'ast>,
    pub value: &'ast Expr<'ast>,
    pub span: Span,
}

/// A conditional. An absent `else` is an empty slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfStmt<'ast> {
    pub condition: &'ast Expr<'ast>,
    pub then_branch: &'ast [Stmt<'ast>],
    pub else_branch: &'ast [Stmt<'ast>],
    pub span: Span,
}

/// A pre-tested loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhileStmt<'ast> {
    pub condition: &'ast Expr<'ast>,
    pub body: &'ast [Stmt<'ast>],
    pub span: Span,
}

/// Read one integer from input into a variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadStmt<'ast> {
    pub target: VarRef<'ast>,
    pub span: Span,
}

/// Write one value to output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WriteStmt<'ast> {
    pub value: &'ast Expr<'ast>,
    pub span: Span,
}

/// A procedure call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallStmt<'ast> {
    pub id: NodeId,
    pub callee: Ident<'ast>,
    pub args: &'ast [Expr<'ast>],
    pub span: Span,
}

/// Return from the current procedure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStmt {
    pub span: Span,
}
