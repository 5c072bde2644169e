//! The TM ("Tiny Machine") instruction set.
//!
//! This module contains the target-machine types shared by the code
//! generator and the simulator:
//!
//! - [`Opcode`] and [`OpForm`] - operation codes and their encodings
//! - [`Register`] - the eight registers and their roles
//! - [`Instruction`] - one instruction at one address
//! - [`TmProgram`] - a compiled program and its listing

mod instruction;
mod opcode;
mod program;
mod register;

pub use instruction::Instruction;
pub use opcode::{OpForm, Opcode};
pub use program::TmProgram;
pub use register::{REGISTER_COUNT, Register};
