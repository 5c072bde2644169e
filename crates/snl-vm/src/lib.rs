//! Simulator for the TM ("Tiny Machine") target.
//!
//! Runs a [`TmProgram`](snl_core::tm::TmProgram) the way the classic TM
//! does: eight registers, a separate instruction memory and data memory,
//! `pc` advanced before each instruction executes and `dMem[0]` holding the
//! highest data address at start-up.
//!
//! # Example
//!
//! ```
//! use snl_core::tm::{Instruction, Opcode, Register, TmProgram};
//! use snl_vm::Machine;
//!
//! let program = TmProgram::from_instructions(vec![
//!     Instruction::ro(Opcode::In, Register::Ac, Register::Ac, Register::Ac),
//!     Instruction::ro(Opcode::Out, Register::Ac, Register::Ac, Register::Ac),
//!     Instruction::ro(Opcode::Halt, Register::Ac, Register::Ac, Register::Ac),
//! ]);
//!
//! let output = Machine::new(&program).with_input([42]).run().unwrap();
//! assert_eq!(output, [42]);
//! ```

mod machine;

pub use machine::{Machine, MachineConfig};
pub use snl_core::RuntimeError;
