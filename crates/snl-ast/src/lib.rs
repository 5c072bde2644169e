//! Syntax tree for SNL, the small Pascal-like teaching language.
//!
//! The back end consumes a tree, it never parses text. Nodes live in a
//! [`bumpalo::Bump`] arena and borrow from it with the `'ast` lifetime.
//! Nodes the analyzer annotates (variable references, expressions, calls,
//! declarations with storage) carry a [`NodeId`]; annotations are kept in
//! side tables so the tree stays immutable.
//!
//! Use [`AstBuilder`] to construct trees.

mod builder;
pub mod decl;
pub mod expr;
mod node;
pub mod stmt;

pub use builder::AstBuilder;
pub use decl::{
    ArrayTypeExpr, Decl, FieldDecl, ParamDecl, ParamMode, ProcDecl, Program, RecordTypeExpr,
    TypeDecl, TypeExpr, TypeSection, VarDecl, VarSection,
};
pub use expr::{BinaryExpr, BinaryOp, ConstExpr, Expr, VarAccess, VarRef};
pub use node::{Ident, NodeId};
pub use stmt::{AssignStmt, CallStmt, IfStmt, ReadStmt, ReturnStmt, Stmt, WhileStmt, WriteStmt};
