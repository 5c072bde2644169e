//! Expression type checking.

use snl_ast::{Expr, Ident, VarAccess, VarRef};
use snl_core::{SemanticError, Span};

use crate::symbols::SymbolKind;
use crate::types::{TypeDescriptor, TypeId};

use super::{Analyzer, Result};

impl Analyzer {
    /// Type-check an expression and record its type.
    ///
    /// Binary operands must have the identical type, and that type must
    /// also be scalar: two operands of one array or record type are still
    /// rejected.
    pub(super) fn check_expr(&mut self, expr: &Expr<'_>) -> Result<TypeId> {
        let ty = match expr {
            Expr::Const(_) => TypeId::INTEGER,
            Expr::Var(var) => return self.check_var_ref(var),
            Expr::Binary(binary) => {
                let left = self.check_expr(binary.left)?;
                let right = self.check_expr(binary.right)?;
                if left != right || !self.types.get(left).is_scalar() {
                    return Err(SemanticError::IncompatibleTypes { span: binary.span }.into());
                }
                if binary.op.is_comparison() {
                    TypeId::BOOLEAN
                } else {
                    TypeId::INTEGER
                }
            }
        };
        self.annotations.record_type(expr.id(), ty);
        Ok(ty)
    }

    /// Resolve a variable reference, check its selector and record both the
    /// symbol and the type of the selected storage.
    pub(super) fn check_var_ref(&mut self, var: &VarRef<'_>) -> Result<TypeId> {
        let symbol = self.scopes.resolve(var.name.name, var.name.span)?;
        let declared = match &self.symbols.get(symbol).kind {
            SymbolKind::Variable(info) => info.ty,
            _ => {
                return Err(SemanticError::NotAVariable {
                    name: var.name.name.to_string(),
                    span: var.name.span,
                }
                .into());
            }
        };

        let ty = match var.access {
            VarAccess::Plain => declared,
            VarAccess::Index(index) => self.check_index(declared, &var.name, index)?,
            VarAccess::Field { field, index } => {
                let field_ty = self.field_type(declared, &var.name, &field)?;
                match index {
                    None => field_ty,
                    Some(index) => self.check_index(field_ty, &field, index)?,
                }
            }
        };

        self.annotations.record_symbol(var.id, symbol);
        self.annotations.record_type(var.id, ty);
        Ok(ty)
    }

    /// Element type of `base[index]`.
    fn check_index(&mut self, base: TypeId, name: &Ident<'_>, index: &Expr<'_>) -> Result<TypeId> {
        let element = match self.types.get(base) {
            TypeDescriptor::Array { element, .. } => *element,
            _ => {
                return Err(SemanticError::NotAnArray {
                    name: name.name.to_string(),
                    span: name.span,
                }
                .into());
            }
        };
        if self.check_expr(index)? != TypeId::INTEGER {
            return Err(SemanticError::IncompatibleTypes {
                span: index.span(),
            }
            .into());
        }
        Ok(element)
    }

    /// Type of `record.field`.
    fn field_type(&self, base: TypeId, record: &Ident<'_>, field: &Ident<'_>) -> Result<TypeId> {
        let descriptor = self.types.get(base);
        if !matches!(descriptor, TypeDescriptor::Record { .. }) {
            return Err(SemanticError::NotARecord {
                name: record.name.to_string(),
                span: record.span,
            }
            .into());
        }
        descriptor
            .field(field.name)
            .map(|f| f.ty)
            .ok_or_else(|| {
                SemanticError::InvalidFieldName {
                    record: record.name.to_string(),
                    field: field.name.to_string(),
                    span: field.span,
                }
                .into()
            })
    }
}

/// Short text naming an argument expression in diagnostics.
pub(super) fn describe_expr(expr: &Expr<'_>) -> (String, Span) {
    match expr {
        Expr::Const(c) => (c.value.to_string(), c.span),
        Expr::Var(v) => (v.name.name.to_string(), v.span),
        Expr::Binary(b) => (format!("expression with '{}'", b.op), b.span),
    }
}
