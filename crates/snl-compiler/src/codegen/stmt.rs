//! Statement code generation.

use snl_ast::{AssignStmt, Expr, IfStmt, Stmt, WhileStmt};
use snl_core::InternalError;
use snl_core::tm::{Opcode, Register};

use super::{CodeGenerator, RETURN_ADDRESS, Result};

impl<'a> CodeGenerator<'a> {
    pub(super) fn generate_block(&mut self, stmts: &[Stmt<'_>]) -> Result<()> {
        for stmt in stmts {
            self.generate_stmt(stmt)?;
        }
        Ok(())
    }

    fn generate_stmt(&mut self, stmt: &Stmt<'_>) -> Result<()> {
        match stmt {
            Stmt::Assign(assign) => self.generate_assign(assign)?,
            Stmt::If(if_stmt) => self.generate_if(if_stmt)?,
            Stmt::While(while_stmt) => self.generate_while(while_stmt)?,
            Stmt::Read(read) => {
                self.emitter.comment("-> read");
                self.find_address(&read.target)?;
                let e = &mut self.emitter;
                e.emit_rm(Opcode::Lda, Register::Ac2, 0, Register::Ac, "ac2 <- target");
                e.emit_ro(Opcode::In, Register::Ac, Register::Ac, Register::Ac, "read value");
                e.emit_rm(Opcode::St, Register::Ac, 0, Register::Ac2, "store value");
            }
            Stmt::Write(write) => {
                self.emitter.comment("-> write");
                self.generate_expr(write.value)?;
                self.emitter
                    .emit_ro(Opcode::Out, Register::Ac, Register::Ac, Register::Ac, "write ac");
            }
            Stmt::Call(call) => self.generate_call(call)?,
            Stmt::Return(_) => {
                self.emitter.emit_rm(
                    Opcode::Ld,
                    Register::Pc,
                    RETURN_ADDRESS,
                    Register::Sp,
                    "return",
                );
            }
        }

        if self.options.temp_base_check && self.tmp_offset != 0 {
            return Err(InternalError::UnbalancedTemporaries {
                offset: self.tmp_offset,
                span: stmt.span(),
            }
            .into());
        }
        Ok(())
    }

    /// `target := value`; aggregates are copied word by word.
    fn generate_assign(&mut self, assign: &AssignStmt<'_>) -> Result<()> {
        self.emitter.comment("-> assign");
        let ty = self.analysis.annotations.require_type(assign.target.id)?;
        let size = self.analysis.types.size(ty);

        self.find_address(&assign.target)?;
        self.emitter
            .emit_rm(Opcode::Lda, Register::Ac2, 0, Register::Ac, "ac2 <- target");

        if size == 1 {
            self.generate_expr(assign.value)?;
            self.emitter
                .emit_rm(Opcode::St, Register::Ac, 0, Register::Ac2, "assign: store value");
            return Ok(());
        }

        let Expr::Var(source) = assign.value else {
            return Err(InternalError::MalformedTree {
                message: "aggregate assignment from a non-variable".to_string(),
                span: assign.span,
            }
            .into());
        };
        self.find_address(source)?;
        for k in 0..size {
            self.emitter
                .emit_rm(Opcode::Ld, Register::Ac1, k, Register::Ac, "copy word");
            self.emitter
                .emit_rm(Opcode::St, Register::Ac1, k, Register::Ac2, "");
        }
        Ok(())
    }

    /// ```text
    ///         condition
    ///         JEQ ac,else      (patched)
    ///         then branch
    ///         LDA pc,end       (patched)
    /// else:   else branch
    /// end:
    /// ```
    fn generate_if(&mut self, if_stmt: &IfStmt<'_>) -> Result<()> {
        self.emitter.comment("-> if");
        self.generate_expr(if_stmt.condition)?;
        let to_else = self.emitter.reserve(1);

        self.generate_block(if_stmt.then_branch)?;
        let to_end = self.emitter.reserve(1);

        let else_start = self.emitter.current();
        self.generate_block(if_stmt.else_branch)?;
        let end = self.emitter.current();

        self.emitter.seek(to_else)?;
        self.emitter
            .emit_rm_abs(Opcode::Jeq, Register::Ac, else_start, "if: jmp to else");
        self.emitter.seek(to_end)?;
        self.emitter
            .emit_rm_abs(Opcode::Lda, Register::Pc, end, "jmp to end");
        self.emitter.resume();
        self.emitter.comment("<- if");
        Ok(())
    }

    /// ```text
    /// top:    condition
    ///         JEQ ac,end       (patched)
    ///         body
    ///         LDA pc,top
    /// end:
    /// ```
    fn generate_while(&mut self, while_stmt: &WhileStmt<'_>) -> Result<()> {
        self.emitter.comment("-> while");
        let top = self.emitter.current();
        self.generate_expr(while_stmt.condition)?;
        let to_end = self.emitter.reserve(1);

        self.generate_block(while_stmt.body)?;
        self.emitter
            .emit_rm_abs(Opcode::Lda, Register::Pc, top, "while: jmp back to test");
        let end = self.emitter.current();

        self.emitter.seek(to_end)?;
        self.emitter
            .emit_rm_abs(Opcode::Jeq, Register::Ac, end, "while: jmp to end");
        self.emitter.resume();
        self.emitter.comment("<- while");
        Ok(())
    }
}
