//! TM operation codes.
//!
//! The TM instruction set has two encodings: register-only (RO) instructions
//! name three registers, register-memory (RM) instructions name a register,
//! a signed offset and a base register.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Instruction encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpForm {
    /// `op r,s,t`
    Register,
    /// `op r,d(s)`
    Memory,
}

/// TM operation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Opcode {
    // =========================================================================
    // Register-only
    // =========================================================================
    /// Stop execution.
    Halt = 0,
    /// `reg[r] <- next input value`
    In,
    /// `output <- reg[r]`
    Out,
    /// `reg[r] <- reg[s] + reg[t]`
    Add,
    /// `reg[r] <- reg[s] - reg[t]`
    Sub,
    /// `reg[r] <- reg[s] * reg[t]`
    Mul,
    /// `reg[r] <- reg[s] / reg[t]`
    Div,

    // =========================================================================
    // Register-memory
    // =========================================================================
    /// `reg[r] <- dMem[d + reg[s]]`
    Ld,
    /// `dMem[d + reg[s]] <- reg[r]`
    St,
    /// `reg[r] <- d + reg[s]`
    Lda,
    /// `reg[r] <- d`
    Ldc,
    /// `if reg[r] < 0 then pc <- d + reg[s]`
    Jlt,
    /// `if reg[r] == 0 then pc <- d + reg[s]`
    Jeq,
}

impl Opcode {
    /// The assembler mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Halt => "HALT",
            Opcode::In => "IN",
            Opcode::Out => "OUT",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Ld => "LD",
            Opcode::St => "ST",
            Opcode::Lda => "LDA",
            Opcode::Ldc => "LDC",
            Opcode::Jlt => "JLT",
            Opcode::Jeq => "JEQ",
        }
    }

    /// The encoding this opcode uses.
    pub fn form(self) -> OpForm {
        match self {
            Opcode::Halt
            | Opcode::In
            | Opcode::Out
            | Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div => OpForm::Register,
            Opcode::Ld | Opcode::St | Opcode::Lda | Opcode::Ldc | Opcode::Jlt | Opcode::Jeq => {
                OpForm::Memory
            }
        }
    }

    /// Whether this opcode may transfer control.
    pub fn is_jump(self) -> bool {
        matches!(self, Opcode::Jlt | Opcode::Jeq)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forms() {
        assert_eq!(Opcode::Add.form(), OpForm::Register);
        assert_eq!(Opcode::Halt.form(), OpForm::Register);
        assert_eq!(Opcode::Lda.form(), OpForm::Memory);
        assert_eq!(Opcode::Jeq.form(), OpForm::Memory);
    }

    #[test]
    fn byte_encoding_round_trips() {
        let byte: u8 = Opcode::Ldc.into();
        assert_eq!(Opcode::try_from(byte), Ok(Opcode::Ldc));
        assert!(Opcode::try_from(200u8).is_err());
    }

    #[test]
    fn display_pads_mnemonic() {
        assert_eq!(format!("{:>5}", Opcode::Ld), "   LD");
        assert_eq!(format!("{}", Opcode::Halt), "HALT");
    }
}
