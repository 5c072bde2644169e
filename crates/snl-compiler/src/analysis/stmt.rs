//! Statement checking.

use snl_ast::{CallStmt, Expr, Stmt};
use snl_core::{InternalError, SemanticError};

use crate::symbols::{AccessMode, SymbolKind};
use crate::types::TypeId;

use super::expr::describe_expr;
use super::{Analyzer, Result};

impl Analyzer {
    /// Check a statement list in order.
    pub(super) fn analyze_block(&mut self, stmts: &[Stmt<'_>]) -> Result<()> {
        for stmt in stmts {
            self.analyze_stmt(stmt)?;
        }
        Ok(())
    }

    fn analyze_stmt(&mut self, stmt: &Stmt<'_>) -> Result<()> {
        match stmt {
            Stmt::Assign(assign) => {
                let target = self.check_var_ref(&assign.target)?;
                let value = self.check_expr(assign.value)?;
                if target != value {
                    return Err(SemanticError::IncompatibleTypes { span: assign.span }.into());
                }
            }
            Stmt::If(if_stmt) => {
                self.check_condition(if_stmt.condition, "if")?;
                self.analyze_block(if_stmt.then_branch)?;
                self.analyze_block(if_stmt.else_branch)?;
            }
            Stmt::While(while_stmt) => {
                self.check_condition(while_stmt.condition, "while")?;
                self.analyze_block(while_stmt.body)?;
            }
            Stmt::Read(read) => {
                self.check_var_ref(&read.target)?;
            }
            Stmt::Write(write) => {
                if self.check_expr(write.value)? == TypeId::BOOLEAN {
                    return Err(SemanticError::CannotWriteBoolean { span: write.span }.into());
                }
            }
            Stmt::Call(call) => self.check_call(call)?,
            Stmt::Return(ret) => {
                if self.scopes.level() == 0 {
                    return Err(SemanticError::ReturnFromMain { span: ret.span }.into());
                }
            }
        }
        Ok(())
    }

    fn check_condition(&mut self, condition: &Expr<'_>, statement: &'static str) -> Result<()> {
        if self.check_expr(condition)? != TypeId::BOOLEAN {
            return Err(SemanticError::ConditionNotBoolean {
                statement,
                span: condition.span(),
            }
            .into());
        }
        Ok(())
    }

    /// Check a call against the callee's parameter list.
    ///
    /// Arguments are matched to formals left to right and each is checked
    /// as it is reached, so a bad leading argument is reported before a
    /// missing trailing one.
    fn check_call(&mut self, call: &CallStmt<'_>) -> Result<()> {
        let callee = call.callee;
        let symbol = self.scopes.resolve(callee.name, callee.span)?;
        let params = match &self.symbols.get(symbol).kind {
            SymbolKind::Procedure(info) => info.params.clone(),
            _ => {
                return Err(SemanticError::NotAProcedure {
                    name: callee.name.to_string(),
                    span: callee.span,
                }
                .into());
            }
        };
        self.annotations.record_symbol(call.id, symbol);

        for (position, &param) in params.iter().enumerate() {
            let Some(arg) = call.args.get(position) else {
                return Err(SemanticError::TooFewArguments {
                    procedure: callee.name.to_string(),
                    expected: params.len(),
                    found: call.args.len(),
                    span: call.span,
                }
                .into());
            };
            let entry = self.symbols.get(param);
            let Some(formal) = entry.as_var().copied() else {
                return Err(InternalError::UnexpectedSymbol {
                    name: entry.name.clone(),
                    expected: "variable",
                }
                .into());
            };
            let parameter = entry.name.clone();

            if formal.access == AccessMode::Indirect && arg.as_var().is_none() {
                let (name, span) = describe_expr(arg);
                return Err(SemanticError::NotAVariable { name, span }.into());
            }
            if self.check_expr(arg)? != formal.ty {
                return Err(SemanticError::IncompatibleParameterType {
                    procedure: callee.name.to_string(),
                    parameter,
                    span: arg.span(),
                }
                .into());
            }
        }
        if call.args.len() > params.len() {
            return Err(SemanticError::TooManyArguments {
                procedure: callee.name.to_string(),
                expected: params.len(),
                found: call.args.len(),
                span: call.span,
            }
            .into());
        }
        Ok(())
    }
}
