//! Expression code generation. Every expression leaves its value in `ac`.

use snl_ast::{BinaryExpr, BinaryOp, Expr};
use snl_core::tm::{Opcode, Register};

use super::{CodeGenerator, Result};

impl<'a> CodeGenerator<'a> {
    pub(super) fn generate_expr(&mut self, expr: &Expr<'_>) -> Result<()> {
        match expr {
            Expr::Const(c) => {
                self.emitter
                    .emit_rm(Opcode::Ldc, Register::Ac, c.value, Register::Ac, "load const");
            }
            Expr::Var(var) => {
                self.find_address(var)?;
                self.emitter.emit_rm(
                    Opcode::Ld,
                    Register::Ac,
                    0,
                    Register::Ac,
                    &format!("load {}", var.name.name),
                );
            }
            Expr::Binary(binary) => self.generate_binary(binary)?,
        }
        Ok(())
    }

    /// Left operand into a temporary, right operand into `ac`, left back
    /// into `ac1`, then `ac <- ac1 op ac`.
    fn generate_binary(&mut self, binary: &BinaryExpr<'_>) -> Result<()> {
        self.generate_expr(binary.left)?;
        self.push_ac("op: push left");
        self.generate_expr(binary.right)?;
        self.pop_into(Register::Ac1, "op: load left");

        let (l, r) = (Register::Ac1, Register::Ac);
        let e = &mut self.emitter;
        match binary.op {
            BinaryOp::Add => e.emit_ro(Opcode::Add, Register::Ac, l, r, "op +"),
            BinaryOp::Sub => e.emit_ro(Opcode::Sub, Register::Ac, l, r, "op -"),
            BinaryOp::Mul => e.emit_ro(Opcode::Mul, Register::Ac, l, r, "op *"),
            BinaryOp::Div => e.emit_ro(Opcode::Div, Register::Ac, l, r, "op /"),
            BinaryOp::Less | BinaryOp::Equal => {
                let jump = if binary.op == BinaryOp::Less {
                    Opcode::Jlt
                } else {
                    Opcode::Jeq
                };
                e.emit_ro(Opcode::Sub, Register::Ac, l, r, &format!("op {}", binary.op));
                e.emit_rm(jump, Register::Ac, 2, Register::Pc, "br if true");
                e.emit_rm(Opcode::Ldc, Register::Ac, 0, Register::Ac, "false case");
                e.emit_rm(Opcode::Lda, Register::Pc, 1, Register::Pc, "unconditional jmp");
                e.emit_rm(Opcode::Ldc, Register::Ac, 1, Register::Ac, "true case");
            }
        }
        Ok(())
    }
}
