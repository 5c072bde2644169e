//! Declaration nodes: program, sections, procedures and type expressions.
//!
//! An SNL declaration part is an ordered list of sections. The parser
//! emits type sections, then variable sections, then procedures; the
//! analyzer relies on that order when it freezes a procedure's frame.

use snl_core::Span;

use crate::node::{Ident, NodeId};
use crate::stmt::Stmt;

/// A complete program: `program name decls begin body end.`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Program<'ast> {
    /// Program name
    pub name: Ident<'ast>,
    /// Top-level declarations
    pub decls: &'ast [Decl<'ast>],
    /// Main statement list
    pub body: &'ast [Stmt<'ast>],
    /// Source location
    pub span: Span,
}

/// One entry of a declaration part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decl<'ast> {
    /// `type t1 = ...; t2 = ...;`
    Types(TypeSection<'ast>),
    /// `var integer a, b; char c;`
    Vars(VarSection<'ast>),
    /// `procedure p(...); ... begin ... end`
    Procedure(&'ast ProcDecl<'ast>),
}

impl Decl<'_> {
    /// Get the span of this declaration.
    pub fn span(&self) -> Span {
        match self {
            Decl::Types(s) => s.span,
            Decl::Vars(s) => s.span,
            Decl::Procedure(p) => p.span,
        }
    }
}

/// A `type` section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeSection<'ast> {
    pub decls: &'ast [TypeDecl<'ast>],
    pub span: Span,
}

/// A single `name = type` declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeDecl<'ast> {
    pub name: Ident<'ast>,
    pub ty: TypeExpr<'ast>,
    pub span: Span,
}

/// A `var` section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarSection<'ast> {
    pub decls: &'ast [VarDecl<'ast>],
    pub span: Span,
}

/// One declaration group: several names sharing one type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarDecl<'ast> {
    pub id: NodeId,
    pub names: &'ast [Ident<'ast>],
    pub ty: TypeExpr<'ast>,
    pub span: Span,
}

/// How a parameter is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamMode {
    /// Copied into the callee's frame.
    Value,
    /// `var` parameter: the callee receives the caller's storage address.
    Reference,
}

/// One parameter group of a procedure header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDecl<'ast> {
    pub id: NodeId,
    pub mode: ParamMode,
    pub names: &'ast [Ident<'ast>],
    pub ty: TypeExpr<'ast>,
    pub span: Span,
}

/// A procedure declaration with its nested declarations and body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcDecl<'ast> {
    pub id: NodeId,
    pub name: Ident<'ast>,
    pub params: &'ast [ParamDecl<'ast>],
    pub decls: &'ast [Decl<'ast>],
    pub body: &'ast [Stmt<'ast>],
    pub span: Span,
}

/// A type as written in a declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeExpr<'ast> {
    /// `integer`
    Integer(Span),
    /// `char`
    Char(Span),
    /// A previously declared type name
    Named(Ident<'ast>),
    /// `array [low..high] of element`
    Array(&'ast ArrayTypeExpr<'ast>),
    /// `record ... end`
    Record(&'ast RecordTypeExpr<'ast>),
}

impl TypeExpr<'_> {
    /// Get the span of this type expression.
    pub fn span(&self) -> Span {
        match self {
            TypeExpr::Integer(span) | TypeExpr::Char(span) => *span,
            TypeExpr::Named(ident) => ident.span,
            TypeExpr::Array(array) => array.span,
            TypeExpr::Record(record) => record.span,
        }
    }
}

/// `array [low..high] of element`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrayTypeExpr<'ast> {
    pub low: i64,
    pub high: i64,
    pub element: TypeExpr<'ast>,
    pub span: Span,
}

/// `record fields end`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordTypeExpr<'ast> {
    pub fields: &'ast [FieldDecl<'ast>],
    pub span: Span,
}

/// One field group of a record: several names sharing one type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDecl<'ast> {
    pub names: &'ast [Ident<'ast>],
    pub ty: TypeExpr<'ast>,
    pub span: Span,
}
