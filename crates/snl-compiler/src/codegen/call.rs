//! The procedure call protocol.
//!
//! The caller builds the callee's frame at `top`:
//!
//! 1. arguments into the parameter slots
//! 2. saved registers, the callee level and the return address
//! 3. the callee's display: the caller's entries for every enclosing level,
//!    then the new frame base for the callee's own level
//!
//! then switches `sp`, `top` and `displayOff` to the new frame and jumps.
//! The callee returns with `LD pc,6(sp)` and the caller restores its state.

use snl_ast::{CallStmt, Expr};
use snl_core::InternalError;
use snl_core::tm::{Opcode, Register};
use tracing::trace;

use crate::symbols::{AccessMode, ProcInfo};

use super::{
    CodeGenerator, LEVEL_SLOT, RETURN_ADDRESS, Result, SAVED_AC, SAVED_AC1, SAVED_AC2,
    SAVED_DISPLAY, SAVED_SP,
};

impl<'a> CodeGenerator<'a> {
    pub(super) fn generate_call(&mut self, call: &CallStmt<'_>) -> Result<()> {
        let callee = self.analysis.annotations.require_symbol(call.id)?;
        let info = self.proc_info(callee)?;
        let entry = *self.entries.get(&callee).ok_or(InternalError::MissingAnnotation {
            node: call.id.raw(),
            what: "entry address",
        })?;
        let name = call.callee.name;
        trace!(procedure = name, entry, "call");

        self.emitter.comment(format!("-> call {name}"));
        self.store_arguments(call, info)?;
        self.save_registers(info);

        let return_slot = self.emitter.reserve(2);
        self.build_display(info);

        let e = &mut self.emitter;
        e.emit_rm(Opcode::Lda, Register::Sp, 0, Register::Top, "sp <- new frame");
        e.emit_rm(Opcode::Lda, Register::Top, info.frame_size, Register::Sp, "top <- end of frame");
        e.emit_rm(
            Opcode::Lda,
            Register::DisplayOff,
            info.display_base,
            Register::Sp,
            "displayOff <- callee display",
        );
        e.emit_rm_abs(Opcode::Lda, Register::Pc, entry, &format!("jump to {name}"));
        let return_address = e.current();

        self.emitter.seek(return_slot)?;
        self.emitter.emit_rm(
            Opcode::Ldc,
            Register::Ac,
            return_address as i64,
            Register::Ac,
            "return address",
        );
        self.emitter
            .emit_rm(Opcode::St, Register::Ac, RETURN_ADDRESS, Register::Top, "save return address");
        self.emitter.resume();

        self.restore_registers();
        self.emitter.comment(format!("<- call {name}"));
        Ok(())
    }

    /// Store each argument into its parameter slot above `top`.
    fn store_arguments(&mut self, call: &CallStmt<'_>, info: &ProcInfo) -> Result<()> {
        for (arg, &param) in call.args.iter().zip(&info.params) {
            let formal = self.var_info(param)?;
            let slot = formal.offset;

            if formal.access == AccessMode::Indirect {
                let var = arg.as_var().ok_or_else(|| InternalError::MalformedTree {
                    message: "reference argument is not a variable".to_string(),
                    span: arg.span(),
                })?;
                self.find_address(var)?;
                self.emitter
                    .emit_rm(Opcode::St, Register::Ac, slot, Register::Top, "pass address");
                continue;
            }

            let size = self.analysis.types.size(formal.ty);
            if size == 1 {
                self.generate_expr(arg)?;
                self.emitter
                    .emit_rm(Opcode::St, Register::Ac, slot, Register::Top, "pass value");
                continue;
            }

            let Expr::Var(var) = arg else {
                return Err(InternalError::MalformedTree {
                    message: "aggregate argument is not a variable".to_string(),
                    span: arg.span(),
                }
                .into());
            };
            self.find_address(var)?;
            for k in 0..size {
                self.emitter
                    .emit_rm(Opcode::Ld, Register::Ac1, k, Register::Ac, "copy argument word");
                self.emitter
                    .emit_rm(Opcode::St, Register::Ac1, slot + k, Register::Top, "");
            }
        }
        Ok(())
    }

    fn save_registers(&mut self, info: &ProcInfo) {
        let e = &mut self.emitter;
        e.emit_rm(Opcode::St, Register::Sp, SAVED_SP, Register::Top, "save sp");
        e.emit_rm(Opcode::St, Register::Ac, SAVED_AC, Register::Top, "save ac");
        e.emit_rm(Opcode::St, Register::Ac1, SAVED_AC1, Register::Top, "save ac1");
        e.emit_rm(Opcode::St, Register::Ac2, SAVED_AC2, Register::Top, "save ac2");
        e.emit_rm(
            Opcode::St,
            Register::DisplayOff,
            SAVED_DISPLAY,
            Register::Top,
            "save displayOff",
        );
        e.emit_rm(Opcode::Ldc, Register::Ac, i64::from(info.level), Register::Ac, "callee level");
        e.emit_rm(Opcode::St, Register::Ac, LEVEL_SLOT, Register::Top, "store level");
    }

    /// Copy the caller's display entries below the callee's level, then set
    /// the callee's own entry to the new frame base.
    fn build_display(&mut self, info: &ProcInfo) {
        let e = &mut self.emitter;
        let level = i64::from(info.level);
        for k in 0..level {
            e.emit_rm(Opcode::Ld, Register::Ac, k, Register::DisplayOff, "caller display entry");
            e.emit_rm(Opcode::St, Register::Ac, info.display_base + k, Register::Top, "copy to callee display");
        }
        e.emit_rm(
            Opcode::St,
            Register::Top,
            info.display_base + level,
            Register::Top,
            "callee display entry",
        );
    }

    fn restore_registers(&mut self) {
        let e = &mut self.emitter;
        e.emit_rm(Opcode::Ld, Register::Ac, SAVED_AC, Register::Sp, "restore ac");
        e.emit_rm(Opcode::Ld, Register::Ac1, SAVED_AC1, Register::Sp, "restore ac1");
        e.emit_rm(Opcode::Ld, Register::Ac2, SAVED_AC2, Register::Sp, "restore ac2");
        e.emit_rm(
            Opcode::Ld,
            Register::DisplayOff,
            SAVED_DISPLAY,
            Register::Sp,
            "restore displayOff",
        );
        e.emit_rm(Opcode::Lda, Register::Top, 0, Register::Sp, "top <- frame base");
        e.emit_rm(Opcode::Ld, Register::Sp, SAVED_SP, Register::Sp, "restore sp");
    }
}
