//! TM code generation.
//!
//! The [`CodeGenerator`] walks the analyzed tree once and emits code
//! directly, patching forward jumps through the [`InstructionEmitter`].
//!
//! ## Registers
//!
//! | register | role |
//! |---|---|
//! | `ac`, `ac1`, `ac2` | accumulators |
//! | `mp` | top of data memory; temporaries grow down from it |
//! | `displayOff` | address of the current frame's display block |
//! | `top` | first free word above the current frame |
//! | `sp` | base of the current frame |
//! | `pc` | program counter |
//!
//! ## Activation record
//!
//! ```text
//! sp+0   saved sp          sp+4   saved displayOff
//! sp+1   saved ac          sp+5   callee lexical level
//! sp+2   saved ac1         sp+6   return address
//! sp+3   saved ac2         sp+7.. parameters, then locals
//! sp+display_base..        display[0..=level]
//! ```
//!
//! A variable declared at level `L` lives at `display[L] + offset`, where
//! `display[L]` is read through `displayOff`. Each frame carries its own
//! copy of the display, so lookups follow the static nesting regardless of
//! the dynamic call path.

mod address;
mod call;
mod expr;
mod procedure;
mod stmt;

use rustc_hash::FxHashMap;
use snl_ast::{Decl, Program};
use snl_core::tm::{Opcode, Register, TmProgram};
use snl_core::{CompileError, InternalError};
use tracing::debug;

use crate::annotations::Analysis;
use crate::emit::InstructionEmitter;
use crate::options::CompileOptions;
use crate::symbols::{ProcInfo, SymbolId, VarInfo};

type Result<T> = std::result::Result<T, CompileError>;

/// Frame slot of the saved `sp`.
pub const SAVED_SP: i64 = 0;
/// Frame slot of the saved `ac`.
pub const SAVED_AC: i64 = 1;
/// Frame slot of the saved `ac1`.
pub const SAVED_AC1: i64 = 2;
/// Frame slot of the saved `ac2`.
pub const SAVED_AC2: i64 = 3;
/// Frame slot of the saved `displayOff`.
pub const SAVED_DISPLAY: i64 = 4;
/// Frame slot holding the callee's lexical level.
pub const LEVEL_SLOT: i64 = 5;
/// Frame slot holding the return address.
pub const RETURN_ADDRESS: i64 = 6;

/// Generates TM code for an analyzed program.
pub struct CodeGenerator<'a> {
    analysis: &'a Analysis,
    options: &'a CompileOptions,
    emitter: InstructionEmitter,
    /// Entry address of every procedure generated so far.
    entries: FxHashMap<SymbolId, usize>,
    /// Offset below `mp` of the most recent temporary; 0 when empty.
    tmp_offset: i64,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(analysis: &'a Analysis, options: &'a CompileOptions) -> Self {
        Self {
            analysis,
            options,
            emitter: InstructionEmitter::new(options.trace_code),
            entries: FxHashMap::default(),
            tmp_offset: 0,
        }
    }

    /// Generate the whole program.
    ///
    /// ```text
    /// LD  mp,0(ac)        mp <- highest data address
    /// ST  ac,0(ac)        clear location 0
    /// LDA pc,main         (patched)
    /// ...procedures...
    /// main: prologue, statements, HALT
    /// ```
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn generate_program(mut self, program: &Program<'_>) -> Result<TmProgram> {
        debug!(program = program.name.name, "generating program");
        let e = &mut self.emitter;
        e.comment(format!("TM code for program {}", program.name.name));
        e.comment("standard prelude");
        e.emit_rm(Opcode::Ld, Register::Mp, 0, Register::Ac, "load maxaddress from location 0");
        e.emit_rm(Opcode::St, Register::Ac, 0, Register::Ac, "clear location 0");

        let jump_to_main = self.emitter.reserve(1);
        for decl in program.decls {
            if let Decl::Procedure(procedure) = decl {
                self.generate_procedure(procedure)?;
            }
        }
        let main = self.emitter.current();
        self.emitter.seek(jump_to_main)?;
        self.emitter.emit_rm_abs(Opcode::Lda, Register::Pc, main, "jump to main");
        self.emitter.resume();

        self.generate_main_prologue();
        self.generate_block(program.body)?;

        self.emitter.comment("end of execution");
        self.emitter
            .emit_ro(Opcode::Halt, Register::Ac, Register::Ac, Register::Ac, "");
        Ok(self.emitter.finish()?)
    }

    /// Set up the main frame at address 0.
    ///
    /// The main frame has no header: its variables start at 0 and its
    /// one-entry display sits right after them.
    fn generate_main_prologue(&mut self) {
        let display_base = self.analysis.main_display_base;
        let e = &mut self.emitter;
        e.comment("main program");
        e.emit_rm(Opcode::Ldc, Register::Ac, 0, Register::Ac, "clear ac");
        e.emit_rm(Opcode::Ldc, Register::Ac1, 0, Register::Ac, "clear ac1");
        e.emit_rm(Opcode::Ldc, Register::Ac2, 0, Register::Ac, "clear ac2");
        e.emit_rm(Opcode::Ldc, Register::Sp, 0, Register::Ac, "main frame at 0");
        e.emit_rm(
            Opcode::Lda,
            Register::DisplayOff,
            display_base,
            Register::Sp,
            "displayOff <- main display",
        );
        e.emit_rm(Opcode::St, Register::Sp, 0, Register::DisplayOff, "display[0] <- sp");
        e.emit_rm(Opcode::Lda, Register::Top, 1, Register::DisplayOff, "top <- end of main frame");
    }

    // ==========================================================================
    // Annotation Access
    // ==========================================================================

    fn var_info(&self, symbol: SymbolId) -> Result<&'a VarInfo> {
        let entry = self.analysis.symbols.get(symbol);
        entry.as_var().ok_or_else(|| {
            InternalError::UnexpectedSymbol {
                name: entry.name.clone(),
                expected: "variable",
            }
            .into()
        })
    }

    fn proc_info(&self, symbol: SymbolId) -> Result<&'a ProcInfo> {
        let entry = self.analysis.symbols.get(symbol);
        entry.as_proc().ok_or_else(|| {
            InternalError::UnexpectedSymbol {
                name: entry.name.clone(),
                expected: "procedure",
            }
            .into()
        })
    }

    // ==========================================================================
    // Temporaries
    // ==========================================================================

    /// Push `ac` onto the temporary area below `mp`.
    fn push_ac(&mut self, comment: &str) {
        self.tmp_offset -= 1;
        self.emitter
            .emit_rm(Opcode::St, Register::Ac, self.tmp_offset, Register::Mp, comment);
    }

    /// Pop the most recent temporary into `reg`.
    fn pop_into(&mut self, reg: Register, comment: &str) {
        self.emitter
            .emit_rm(Opcode::Ld, reg, self.tmp_offset, Register::Mp, comment);
        self.tmp_offset += 1;
    }
}

/// Generate code for an analyzed program.
pub fn generate(
    program: &Program<'_>,
    analysis: &Analysis,
    options: &CompileOptions,
) -> Result<TmProgram> {
    CodeGenerator::new(analysis, options).generate_program(program)
}

// ============================================================================
// Tests
// ============================================================================
