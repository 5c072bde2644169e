//! TM registers and their roles in the SNL calling convention.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Number of machine registers.
pub const REGISTER_COUNT: usize = 8;

/// The eight TM registers.
///
/// The code generator assigns each a fixed role; only `Pc` has meaning to
/// the machine itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Register {
    /// Primary accumulator.
    Ac = 0,
    /// Secondary accumulator (left operand of binary operators).
    Ac1,
    /// Scratch (saved lvalue address).
    Ac2,
    /// Base of the temporary area, the top of data memory.
    Mp,
    /// Base of the current frame's display block.
    DisplayOff,
    /// First free word above the current frame.
    Top,
    /// Base of the current frame.
    Sp,
    /// Program counter.
    Pc,
}

impl Register {
    /// Register number as used in the instruction encoding.
    #[inline]
    pub fn index(self) -> usize {
        u8::from(self) as usize
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}
