//! A single TM instruction.

use std::fmt;

use super::{OpForm, Opcode, Register};

/// One instruction, occupying exactly one address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// Register form: `op dst,src1,src2`.
    Register {
        op: Opcode,
        dst: Register,
        src1: Register,
        src2: Register,
    },
    /// Offset form: `op reg,offset(base)`.
    Memory {
        op: Opcode,
        reg: Register,
        offset: i64,
        base: Register,
    },
}

impl Instruction {
    /// Build a register-form instruction.
    ///
    /// # Panics
    ///
    /// Panics if `op` is a register-memory opcode.
    pub fn ro(op: Opcode, dst: Register, src1: Register, src2: Register) -> Self {
        assert_eq!(op.form(), OpForm::Register, "{op} is not a register-form opcode");
        Instruction::Register {
            op,
            dst,
            src1,
            src2,
        }
    }

    /// Build an offset-form instruction.
    ///
    /// # Panics
    ///
    /// Panics if `op` is a register-only opcode.
    pub fn rm(op: Opcode, reg: Register, offset: i64, base: Register) -> Self {
        assert_eq!(op.form(), OpForm::Memory, "{op} is not an offset-form opcode");
        Instruction::Memory {
            op,
            reg,
            offset,
            base,
        }
    }

    /// The operation code.
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Register { op, .. } | Instruction::Memory { op, .. } => *op,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Register {
                op,
                dst,
                src1,
                src2,
            } => write!(f, "{op:>5}  {dst},{src1},{src2}"),
            Instruction::Memory {
                op,
                reg,
                offset,
                base,
            } => write!(f, "{op:>5}  {reg},{offset}({base})"),
        }
    }
}
