//! Arena-backed tree construction.
//!
//! [`AstBuilder`] is the API a parser (or a test) uses to hand the back end
//! a tree. Every node is allocated in a [`Bump`] arena, every annotated node
//! receives a fresh [`NodeId`], and spans are stamped from the builder's
//! current line.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use snl_ast::AstBuilder;
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//!
//! let program = b.program(
//!     "p",
//!     [b.vars([b.var_decl(&["x"], b.integer())])],
//!     [
//!         b.assign(b.var_ref("x"), b.add(b.int(2), b.mul(b.int(3), b.int(4)))),
//!         b.write(b.var("x")),
//!     ],
//! );
//! assert_eq!(program.body.len(), 2);
//! ```

use std::cell::Cell;

use bumpalo::Bump;
use snl_core::Span;

use crate::decl::{
    ArrayTypeExpr, Decl, FieldDecl, ParamDecl, ParamMode, ProcDecl, Program, RecordTypeExpr,
    TypeDecl, TypeExpr, TypeSection, VarDecl, VarSection,
};
use crate::expr::{BinaryExpr, BinaryOp, ConstExpr, Expr, VarAccess, VarRef};
use crate::node::{Ident, NodeId};
use crate::stmt::{
    AssignStmt, CallStmt, IfStmt, ReadStmt, ReturnStmt, Stmt, WhileStmt, WriteStmt,
};

/// Builds tree nodes into an arena.
pub struct AstBuilder<'ast> {
    arena: &'ast Bump,
    next_id: Cell<u32>,
    line: Cell<u32>,
}

impl<'ast> AstBuilder<'ast> {
    /// Create a builder allocating into `arena`.
    pub fn new(arena: &'ast Bump) -> Self {
        Self {
            arena,
            next_id: Cell::new(0),
            line: Cell::new(1),
        }
    }

    /// Set the source line stamped on subsequently built nodes.
    pub fn set_line(&self, line: u32) {
        self.line.set(line);
    }

    /// Current source line.
    pub fn line(&self) -> u32 {
        self.line.get()
    }

    /// Number of node ids handed out so far.
    pub fn node_count(&self) -> u32 {
        self.next_id.get()
    }

    /// The arena nodes are allocated in.
    pub fn arena(&self) -> &'ast Bump {
        self.arena
    }

    fn fresh_id(&self) -> NodeId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        NodeId::new(id)
    }

    fn span(&self) -> Span {
        Span::line(self.line.get())
    }

    fn slice<T: Copy>(&self, items: impl IntoIterator<Item = T>) -> &'ast [T] {
        let items: Vec<T> = items.into_iter().collect();
        self.arena.alloc_slice_copy(&items)
    }

    // ==========================================================================
    // Names
    // ==========================================================================

    /// An identifier with its text copied into the arena.
    pub fn ident(&self, name: &str) -> Ident<'ast> {
        Ident::new(self.arena.alloc_str(name), self.span())
    }

    fn idents(&self, names: &[&str]) -> &'ast [Ident<'ast>] {
        self.slice(names.iter().map(|name| self.ident(name)))
    }

    // ==========================================================================
    // Type Expressions
    // ==========================================================================

    /// `integer`
    pub fn integer(&self) -> TypeExpr<'ast> {
        TypeExpr::Integer(self.span())
    }

    /// `char`
    pub fn char(&self) -> TypeExpr<'ast> {
        TypeExpr::Char(self.span())
    }

    /// A reference to a declared type name.
    pub fn named(&self, name: &str) -> TypeExpr<'ast> {
        TypeExpr::Named(self.ident(name))
    }

    /// `array [low..high] of element`
    pub fn array(&self, low: i64, high: i64, element: TypeExpr<'ast>) -> TypeExpr<'ast> {
        TypeExpr::Array(self.arena.alloc(ArrayTypeExpr {
            low,
            high,
            element,
            span: self.span(),
        }))
    }

    /// One record field group.
    pub fn field_decl(&self, names: &[&str], ty: TypeExpr<'ast>) -> FieldDecl<'ast> {
        FieldDecl {
            names: self.idents(names),
            ty,
            span: self.span(),
        }
    }

    /// `record fields end`
    pub fn record(&self, fields: impl IntoIterator<Item = FieldDecl<'ast>>) -> TypeExpr<'ast> {
        TypeExpr::Record(self.arena.alloc(RecordTypeExpr {
            fields: self.slice(fields),
            span: self.span(),
        }))
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    /// `name = ty`
    pub fn type_decl(&self, name: &str, ty: TypeExpr<'ast>) -> TypeDecl<'ast> {
        TypeDecl {
            name: self.ident(name),
            ty,
            span: self.span(),
        }
    }

    /// A `type` section.
    pub fn types(&self, decls: impl IntoIterator<Item = TypeDecl<'ast>>) -> Decl<'ast> {
        Decl::Types(TypeSection {
            decls: self.slice(decls),
            span: self.span(),
        })
    }

    /// One variable declaration group.
    pub fn var_decl(&self, names: &[&str], ty: TypeExpr<'ast>) -> VarDecl<'ast> {
        VarDecl {
            id: self.fresh_id(),
            names: self.idents(names),
            ty,
            span: self.span(),
        }
    }

    /// A `var` section.
    pub fn vars(&self, decls: impl IntoIterator<Item = VarDecl<'ast>>) -> Decl<'ast> {
        Decl::Vars(VarSection {
            decls: self.slice(decls),
            span: self.span(),
        })
    }

    /// A value parameter group.
    pub fn value_param(&self, names: &[&str], ty: TypeExpr<'ast>) -> ParamDecl<'ast> {
        self.param(ParamMode::Value, names, ty)
    }

    /// A `var` (by-reference) parameter group.
    pub fn ref_param(&self, names: &[&str], ty: TypeExpr<'ast>) -> ParamDecl<'ast> {
        self.param(ParamMode::Reference, names, ty)
    }

    fn param(&self, mode: ParamMode, names: &[&str], ty: TypeExpr<'ast>) -> ParamDecl<'ast> {
        ParamDecl {
            id: self.fresh_id(),
            mode,
            names: self.idents(names),
            ty,
            span: self.span(),
        }
    }

    /// A procedure declaration.
    pub fn procedure(
        &self,
        name: &str,
        params: impl IntoIterator<Item = ParamDecl<'ast>>,
        decls: impl IntoIterator<Item = Decl<'ast>>,
        body: impl IntoIterator<Item = Stmt<'ast>>,
    ) -> Decl<'ast> {
        let span = self.span();
        Decl::Procedure(self.arena.alloc(ProcDecl {
            id: self.fresh_id(),
            name: self.ident(name),
            params: self.slice(params),
            decls: self.slice(decls),
            body: self.slice(body),
            span,
        }))
    }

    /// The whole program.
    pub fn program(
        &self,
        name: &str,
        decls: impl IntoIterator<Item = Decl<'ast>>,
        body: impl IntoIterator<Item = Stmt<'ast>>,
    ) -> Program<'ast> {
        Program {
            name: self.ident(name),
            decls: self.slice(decls),
            body: self.slice(body),
            span: self.span(),
        }
    }

    // ==========================================================================
    // Variable References
    // ==========================================================================

    /// `name`
    pub fn var_ref(&self, name: &str) -> VarRef<'ast> {
        self.make_ref(name, VarAccess::Plain)
    }

    /// `name[index]`
    pub fn index_ref(&self, name: &str, index: &'ast Expr<'ast>) -> VarRef<'ast> {
        self.make_ref(name, VarAccess::Index(index))
    }

    /// `name.field`
    pub fn field_ref(&self, name: &str, field: &str) -> VarRef<'ast> {
        self.make_ref(
            name,
            VarAccess::Field {
                field: self.ident(field),
                index: None,
            },
        )
    }

    /// `name.field[index]`
    pub fn field_index_ref(
        &self,
        name: &str,
        field: &str,
        index: &'ast Expr<'ast>,
    ) -> VarRef<'ast> {
        self.make_ref(
            name,
            VarAccess::Field {
                field: self.ident(field),
                index: Some(index),
            },
        )
    }

    fn make_ref(&self, name: &str, access: VarAccess<'ast>) -> VarRef<'ast> {
        VarRef {
            id: self.fresh_id(),
            name: self.ident(name),
            access,
            span: self.span(),
        }
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    /// Integer constant.
    pub fn int(&self, value: i64) -> &'ast Expr<'ast> {
        self.arena.alloc(Expr::Const(ConstExpr {
            id: self.fresh_id(),
            value,
            span: self.span(),
        }))
    }

    /// Read of a plain variable.
    pub fn var(&self, name: &str) -> &'ast Expr<'ast> {
        self.arena.alloc(Expr::Var(self.var_ref(name)))
    }

    /// Read of an array element.
    pub fn index(&self, name: &str, index: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
        self.arena.alloc(Expr::Var(self.index_ref(name, index)))
    }

    /// Read of a record field.
    pub fn field(&self, name: &str, field: &str) -> &'ast Expr<'ast> {
        self.arena.alloc(Expr::Var(self.field_ref(name, field)))
    }

    /// Read of an element of an array field.
    pub fn field_index(
        &self,
        name: &str,
        field: &str,
        index: &'ast Expr<'ast>,
    ) -> &'ast Expr<'ast> {
        self.arena
            .alloc(Expr::Var(self.field_index_ref(name, field, index)))
    }

    /// Binary operation.
    pub fn binary(
        &self,
        op: BinaryOp,
        left: &'ast Expr<'ast>,
        right: &'ast Expr<'ast>,
    ) -> &'ast Expr<'ast> {
        let binary = self.arena.alloc(BinaryExpr {
            id: self.fresh_id(),
            left,
            op,
            right,
            span: self.span(),
        });
        self.arena.alloc(Expr::Binary(binary))
    }

    /// `left + right`
    pub fn add(&self, left: &'ast Expr<'ast>, right: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
        self.binary(BinaryOp::Add, left, right)
    }

    /// `left - right`
    pub fn sub(&self, left: &'ast Expr<'ast>, right: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
        self.binary(BinaryOp::Sub, left, right)
    }

    /// `left * right`
    pub fn mul(&self, left: &'ast Expr<'ast>, right: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
        self.binary(BinaryOp::Mul, left, right)
    }

    /// `left / right`
    pub fn div(&self, left: &'ast Expr<'ast>, right: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
        self.binary(BinaryOp::Div, left, right)
    }

    /// `left < right`
    pub fn lt(&self, left: &'ast Expr<'ast>, right: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
        self.binary(BinaryOp::Less, left, right)
    }

    /// `left = right`
    pub fn eq(&self, left: &'ast Expr<'ast>, right: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
        self.binary(BinaryOp::Equal, left, right)
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    /// `target := value`
    pub fn assign(&self, target: VarRef<'ast>, value: &'ast Expr<'ast>) -> Stmt<'ast> {
        Stmt::Assign(AssignStmt {
            target,
            value,
            span: self.span(),
        })
    }

    /// `if condition then ... else ... fi`
    pub fn if_else(
        &self,
        condition: &'ast Expr<'ast>,
        then_branch: impl IntoIterator<Item = Stmt<'ast>>,
        else_branch: impl IntoIterator<Item = Stmt<'ast>>,
    ) -> Stmt<'ast> {
        Stmt::If(self.arena.alloc(IfStmt {
            condition,
            then_branch: self.slice(then_branch),
            else_branch: self.slice(else_branch),
            span: self.span(),
        }))
    }

    /// `if condition then ... fi`
    pub fn if_then(
        &self,
        condition: &'ast Expr<'ast>,
        then_branch: impl IntoIterator<Item = Stmt<'ast>>,
    ) -> Stmt<'ast> {
        self.if_else(condition, then_branch, [])
    }

    /// `while condition do ... endwh`
    pub fn while_do(
        &self,
        condition: &'ast Expr<'ast>,
        body: impl IntoIterator<Item = Stmt<'ast>>,
    ) -> Stmt<'ast> {
        Stmt::While(self.arena.alloc(WhileStmt {
            condition,
            body: self.slice(body),
            span: self.span(),
        }))
    }

    /// `read(target)`
    pub fn read(&self, target: VarRef<'ast>) -> Stmt<'ast> {
        Stmt::Read(ReadStmt {
            target,
            span: self.span(),
        })
    }

    /// `write(value)`
    pub fn write(&self, value: &'ast Expr<'ast>) -> Stmt<'ast> {
        Stmt::Write(WriteStmt {
            value,
            span: self.span(),
        })
    }

    /// `callee(args)`
    pub fn call(
        &self,
        callee: &str,
        args: impl IntoIterator<Item = &'ast Expr<'ast>>,
    ) -> Stmt<'ast> {
        Stmt::Call(CallStmt {
            id: self.fresh_id(),
            callee: self.ident(callee),
            args: self.slice(args.into_iter().copied()),
            span: self.span(),
        })
    }

    /// `return`
    pub fn ret(&self) -> Stmt<'ast> {
        Stmt::Return(ReturnStmt { span: self.span() })
    }
}
