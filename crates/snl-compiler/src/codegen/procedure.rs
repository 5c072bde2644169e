//! Procedure bodies.

use snl_ast::{Decl, ProcDecl};
use snl_core::tm::{Opcode, Register};
use tracing::debug;

use super::{CodeGenerator, RETURN_ADDRESS, Result};

impl<'a> CodeGenerator<'a> {
    /// Generate a procedure and, before its body, its nested procedures.
    ///
    /// The entry address is recorded as soon as the procedure's code starts
    /// so the nested procedures and the body can call it. Each nested
    /// procedure sits behind a jump that skips over it.
    pub(super) fn generate_procedure(&mut self, procedure: &ProcDecl<'_>) -> Result<()> {
        let symbol = self.analysis.annotations.require_symbol(procedure.id)?;
        let info = self.proc_info(symbol)?;
        let name = procedure.name.name;

        let entry = self.emitter.current();
        self.entries.insert(symbol, entry);
        debug!(procedure = name, level = info.level, entry, "generating procedure");
        self.emitter.comment(format!("-> procedure {name}"));

        for decl in procedure.decls {
            if let Decl::Procedure(nested) = decl {
                let skip = self.emitter.reserve(1);
                self.generate_procedure(nested)?;
                let after = self.emitter.current();
                self.emitter.seek(skip)?;
                self.emitter.emit_rm_abs(
                    Opcode::Lda,
                    Register::Pc,
                    after,
                    &format!("skip procedure {}", nested.name.name),
                );
                self.emitter.resume();
            }
        }

        self.generate_block(procedure.body)?;
        self.emitter.emit_rm(
            Opcode::Ld,
            Register::Pc,
            RETURN_ADDRESS,
            Register::Sp,
            &format!("return from {name}"),
        );
        self.emitter.comment(format!("<- procedure {name}"));
        Ok(())
    }
}
