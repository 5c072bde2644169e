//! Instruction emitter for the TM target.
//!
//! The [`InstructionEmitter`] is an append-only buffer with two cursors:
//! the write cursor (`emit_loc`) and the frontier (`high_emit_loc`), the
//! highest address written or reserved so far. Forward jumps are emitted by
//! reserving slots, generating the code they jump over, then seeking back to
//! fill the slots in and resuming at the frontier.
//!
//! # Example
//!
//! ```
//! use snl_compiler::emit::InstructionEmitter;
//! use snl_core::tm::{Opcode, Register};
//!
//! let mut emitter = InstructionEmitter::new(true);
//! let slot = emitter.reserve(1);
//! emitter.emit_ro(Opcode::Out, Register::Ac, Register::Ac, Register::Ac, "skipped");
//! let end = emitter.current();
//!
//! emitter.seek(slot).unwrap();
//! emitter.emit_rm_abs(Opcode::Lda, Register::Pc, end, "jump over");
//! emitter.resume();
//!
//! emitter.emit_ro(Opcode::Halt, Register::Ac, Register::Ac, Register::Ac, "");
//! let program = emitter.finish().unwrap();
//! assert_eq!(program.len(), 3);
//! ```

use snl_core::InternalError;
use snl_core::tm::{Instruction, Opcode, Register, TmProgram};
use tracing::trace;

/// Emits TM instructions at dense addresses.
#[derive(Debug)]
pub struct InstructionEmitter {
    /// One slot per address up to the frontier; `None` until written.
    code: Vec<Option<Instruction>>,
    /// Trace comment per address.
    comments: Vec<Option<String>>,
    /// Standalone comment lines and the address they precede.
    notes: Vec<(usize, String)>,
    /// Write cursor.
    emit_loc: usize,
    /// Whether comments are recorded.
    trace: bool,
}

impl InstructionEmitter {
    /// Create an empty emitter. With `trace` off, comments are dropped.
    pub fn new(trace: bool) -> Self {
        Self {
            code: Vec::new(),
            comments: Vec::new(),
            notes: Vec::new(),
            emit_loc: 0,
            trace,
        }
    }

    /// The write cursor.
    pub fn current(&self) -> usize {
        self.emit_loc
    }

    /// One past the highest address written or reserved.
    pub fn frontier(&self) -> usize {
        self.code.len()
    }

    // ==========================================================================
    // Emission
    // ==========================================================================

    /// Emit a register-form instruction `op dst,src1,src2`.
    pub fn emit_ro(
        &mut self,
        op: Opcode,
        dst: Register,
        src1: Register,
        src2: Register,
        comment: &str,
    ) {
        self.write(Instruction::ro(op, dst, src1, src2), comment);
    }

    /// Emit an offset-form instruction `op reg,offset(base)`.
    pub fn emit_rm(&mut self, op: Opcode, reg: Register, offset: i64, base: Register, comment: &str) {
        self.write(Instruction::rm(op, reg, offset, base), comment);
    }

    /// Emit an offset-form instruction that reaches the absolute address
    /// `target` relative to `pc`.
    ///
    /// `pc` already points past this instruction when it executes, so the
    /// offset is `target - (emit_loc + 1)`.
    pub fn emit_rm_abs(&mut self, op: Opcode, reg: Register, target: usize, comment: &str) {
        let offset = target as i64 - (self.emit_loc as i64 + 1);
        self.emit_rm(op, reg, offset, Register::Pc, comment);
    }

    fn write(&mut self, instruction: Instruction, comment: &str) {
        let comment = (self.trace && !comment.is_empty()).then(|| comment.to_string());
        if self.emit_loc == self.code.len() {
            self.code.push(Some(instruction));
            self.comments.push(comment);
        } else {
            self.code[self.emit_loc] = Some(instruction);
            self.comments[self.emit_loc] = comment;
        }
        self.emit_loc += 1;
    }

    /// Attach a standalone comment line before the next instruction.
    pub fn comment(&mut self, text: impl Into<String>) {
        if self.trace {
            self.notes.push((self.emit_loc, text.into()));
        }
    }

    // ==========================================================================
    // Backpatching
    // ==========================================================================

    /// Skip `count` slots to be filled in later and return the first one.
    pub fn reserve(&mut self, count: usize) -> usize {
        let start = self.emit_loc;
        for _ in 0..count {
            if self.emit_loc == self.code.len() {
                self.code.push(None);
                self.comments.push(None);
            }
            self.emit_loc += 1;
        }
        start
    }

    /// Move the write cursor back to `address`.
    ///
    /// Seeking past the frontier is a compiler defect and is reported, never
    /// clamped.
    pub fn seek(&mut self, address: usize) -> Result<(), InternalError> {
        if address > self.frontier() {
            return Err(InternalError::PatchOutOfRange {
                address,
                frontier: self.frontier(),
            });
        }
        trace!(address, "backpatch");
        self.emit_loc = address;
        Ok(())
    }

    /// Move the write cursor back to the frontier.
    pub fn resume(&mut self) {
        self.emit_loc = self.frontier();
    }

    /// Hand over the finished program.
    ///
    /// Every reserved slot must have been filled.
    pub fn finish(mut self) -> Result<TmProgram, InternalError> {
        self.notes.sort_by_key(|(address, _)| *address);
        let code = self
            .code
            .into_iter()
            .enumerate()
            .map(|(address, slot)| slot.ok_or(InternalError::UnfilledSlot { address }))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TmProgram::new(code, self.comments, self.notes))
    }
}
