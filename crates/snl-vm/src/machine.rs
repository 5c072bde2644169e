//! The TM machine state and its fetch-execute loop.

use std::collections::VecDeque;

use snl_core::RuntimeError;
use snl_core::tm::{Instruction, Opcode, REGISTER_COUNT, Register, TmProgram};
use tracing::{debug, trace};

type Result<T> = std::result::Result<T, RuntimeError>;

/// Simulator limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    /// Words of data memory.
    pub memory_size: usize,
    /// Instructions executed before the run is aborted.
    pub step_limit: u64,
}

impl MachineConfig {
    pub fn with_memory_size(mut self, memory_size: usize) -> Self {
        self.memory_size = memory_size;
        self
    }

    pub fn with_step_limit(mut self, step_limit: u64) -> Self {
        self.step_limit = step_limit;
        self
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            memory_size: 1024,
            step_limit: 1_000_000,
        }
    }
}

/// A TM loaded with one program.
#[derive(Debug)]
pub struct Machine<'p> {
    program: &'p TmProgram,
    config: MachineConfig,
    registers: [i64; REGISTER_COUNT],
    memory: Vec<i64>,
    input: VecDeque<i64>,
    output: Vec<i64>,
    steps: u64,
}

impl<'p> Machine<'p> {
    /// Load a program with the default configuration.
    pub fn new(program: &'p TmProgram) -> Self {
        Self::with_config(program, MachineConfig::default())
    }

    /// Load a program. Data memory is zeroed except `dMem[0]`, which holds
    /// the highest data address.
    pub fn with_config(program: &'p TmProgram, config: MachineConfig) -> Self {
        let mut memory = vec![0; config.memory_size.max(1)];
        memory[0] = memory.len() as i64 - 1;
        Self {
            program,
            config,
            registers: [0; REGISTER_COUNT],
            memory,
            input: VecDeque::new(),
            output: Vec::new(),
            steps: 0,
        }
    }

    /// Queue values for `IN`.
    pub fn with_input(mut self, input: impl IntoIterator<Item = i64>) -> Self {
        self.input.extend(input);
        self
    }

    /// Run to `HALT` and return everything written by `OUT`.
    pub fn run(mut self) -> Result<Vec<i64>> {
        self.execute()?;
        Ok(self.output)
    }

    /// Run to `HALT`, keeping the machine for inspection.
    pub fn execute(&mut self) -> Result<()> {
        while !self.step()? {}
        debug!(steps = self.steps, outputs = self.output.len(), "halted");
        Ok(())
    }

    /// Execute one instruction. Returns `true` once the machine halted.
    pub fn step(&mut self) -> Result<bool> {
        if self.steps >= self.config.step_limit {
            return Err(RuntimeError::StepLimitExceeded {
                limit: self.config.step_limit,
            });
        }
        self.steps += 1;

        let pc = self.registers[Register::Pc.index()];
        let instruction = usize::try_from(pc)
            .ok()
            .and_then(|address| self.program.get(address))
            .copied()
            .ok_or(RuntimeError::InstructionOutOfRange { pc })?;
        let pc = pc as usize;
        self.registers[Register::Pc.index()] += 1;
        trace!(pc, %instruction, "step");

        match instruction {
            Instruction::Register {
                op,
                dst,
                src1,
                src2,
            } => self.execute_register(pc, op, dst, src1, src2),
            Instruction::Memory {
                op,
                reg,
                offset,
                base,
            } => {
                self.execute_memory(pc, op, reg, offset, base)?;
                Ok(false)
            }
        }
    }

    fn execute_register(
        &mut self,
        pc: usize,
        op: Opcode,
        dst: Register,
        src1: Register,
        src2: Register,
    ) -> Result<bool> {
        let a = self.register(src1);
        let b = self.register(src2);
        let value = match op {
            Opcode::Halt => return Ok(true),
            Opcode::In => self
                .input
                .pop_front()
                .ok_or(RuntimeError::InputExhausted { pc })?,
            Opcode::Out => {
                self.output.push(self.register(dst));
                return Ok(false);
            }
            Opcode::Add => a.wrapping_add(b),
            Opcode::Sub => a.wrapping_sub(b),
            Opcode::Mul => a.wrapping_mul(b),
            Opcode::Div => {
                if b == 0 {
                    return Err(RuntimeError::DivisionByZero { pc });
                }
                a.wrapping_div(b)
            }
            _ => return Err(RuntimeError::IllegalInstruction { pc }),
        };
        self.registers[dst.index()] = value;
        Ok(false)
    }

    fn execute_memory(
        &mut self,
        pc: usize,
        op: Opcode,
        reg: Register,
        offset: i64,
        base: Register,
    ) -> Result<()> {
        let base = self.register(base);
        match op {
            Opcode::Ld => {
                let slot = self.data_address(offset, base, pc)?;
                self.registers[reg.index()] = self.memory[slot];
            }
            Opcode::St => {
                let slot = self.data_address(offset, base, pc)?;
                self.memory[slot] = self.register(reg);
            }
            Opcode::Lda => self.registers[reg.index()] = offset.wrapping_add(base),
            Opcode::Ldc => self.registers[reg.index()] = offset,
            Opcode::Jlt => {
                if self.register(reg) < 0 {
                    self.registers[Register::Pc.index()] = offset.wrapping_add(base);
                }
            }
            Opcode::Jeq => {
                if self.register(reg) == 0 {
                    self.registers[Register::Pc.index()] = offset.wrapping_add(base);
                }
            }
            _ => return Err(RuntimeError::IllegalInstruction { pc }),
        }
        Ok(())
    }

    /// Memory slot for `offset(base)`; an address past `i64` is out of range.
    fn data_address(&self, offset: i64, base: i64, pc: usize) -> Result<usize> {
        let address = offset.checked_add(base).ok_or(RuntimeError::DataOutOfRange {
            address: offset.saturating_add(base),
            pc,
        })?;
        self.data_slot(address, pc)
    }

    fn data_slot(&self, address: i64, pc: usize) -> Result<usize> {
        usize::try_from(address)
            .ok()
            .filter(|&slot| slot < self.memory.len())
            .ok_or(RuntimeError::DataOutOfRange { address, pc })
    }

    // ==========================================================================
    // Inspection
    // ==========================================================================

    /// Current value of a register.
    pub fn register(&self, reg: Register) -> i64 {
        self.registers[reg.index()]
    }

    /// A data word, if the address is in range.
    pub fn memory(&self, address: usize) -> Option<i64> {
        self.memory.get(address).copied()
    }

    /// Values written so far.
    pub fn output(&self) -> &[i64] {
        &self.output
    }

    /// Instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ro(op: Opcode, dst: Register, src1: Register, src2: Register) -> Instruction {
        Instruction::ro(op, dst, src1, src2)
    }

    fn rm(op: Opcode, reg: Register, offset: i64, base: Register) -> Instruction {
        Instruction::rm(op, reg, offset, base)
    }

    fn halt() -> Instruction {
        ro(Opcode::Halt, Register::Ac, Register::Ac, Register::Ac)
    }

    fn out() -> Instruction {
        ro(Opcode::Out, Register::Ac, Register::Ac, Register::Ac)
    }

    #[test]
    fn location_zero_holds_max_address() {
        let program = TmProgram::from_instructions(vec![
            rm(Opcode::Ld, Register::Mp, 0, Register::Ac),
            halt(),
        ]);
        let config = MachineConfig::default().with_memory_size(64);
        let mut machine = Machine::with_config(&program, config);
        machine.execute().unwrap();
        assert_eq!(machine.register(Register::Mp), 63);
    }

    #[test]
    fn arithmetic() {
        let program = TmProgram::from_instructions(vec![
            rm(Opcode::Ldc, Register::Ac, 7, Register::Ac),
            rm(Opcode::Ldc, Register::Ac1, 3, Register::Ac),
            ro(Opcode::Sub, Register::Ac2, Register::Ac, Register::Ac1),
            ro(Opcode::Out, Register::Ac2, Register::Ac, Register::Ac),
            ro(Opcode::Div, Register::Ac2, Register::Ac, Register::Ac1),
            ro(Opcode::Out, Register::Ac2, Register::Ac, Register::Ac),
            ro(Opcode::Mul, Register::Ac, Register::Ac, Register::Ac1),
            out(),
            halt(),
        ]);
        assert_eq!(Machine::new(&program).run().unwrap(), [4, 2, 21]);
    }

    #[test]
    fn pc_is_advanced_before_execution() {
        // LDA pc,1(pc) at 0 skips the OUT at 1
        let program = TmProgram::from_instructions(vec![
            rm(Opcode::Lda, Register::Pc, 1, Register::Pc),
            out(),
            halt(),
        ]);
        assert_eq!(Machine::new(&program).run().unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn conditional_jumps() {
        let program = TmProgram::from_instructions(vec![
            rm(Opcode::Ldc, Register::Ac, -1, Register::Ac),
            rm(Opcode::Jlt, Register::Ac, 1, Register::Pc),
            out(),
            rm(Opcode::Ldc, Register::Ac, 0, Register::Ac),
            rm(Opcode::Jeq, Register::Ac, 1, Register::Pc),
            out(),
            rm(Opcode::Ldc, Register::Ac, 5, Register::Ac),
            out(),
            halt(),
        ]);
        assert_eq!(Machine::new(&program).run().unwrap(), [5]);
    }

    #[test]
    fn load_and_store() {
        let program = TmProgram::from_instructions(vec![
            rm(Opcode::Ldc, Register::Ac, 9, Register::Ac),
            rm(Opcode::Ldc, Register::Ac1, 10, Register::Ac),
            rm(Opcode::St, Register::Ac, 2, Register::Ac1),
            rm(Opcode::Ld, Register::Ac2, 12, Register::Ac2),
            ro(Opcode::Out, Register::Ac2, Register::Ac, Register::Ac),
            halt(),
        ]);
        let mut machine = Machine::new(&program);
        machine.execute().unwrap();
        assert_eq!(machine.memory(12), Some(9));
        assert_eq!(machine.output(), [9]);
    }

    #[test]
    fn input_is_consumed_in_order() {
        let program = TmProgram::from_instructions(vec![
            ro(Opcode::In, Register::Ac, Register::Ac, Register::Ac),
            ro(Opcode::In, Register::Ac1, Register::Ac, Register::Ac),
            ro(Opcode::Sub, Register::Ac, Register::Ac, Register::Ac1),
            out(),
            halt(),
        ]);
        let output = Machine::new(&program).with_input([10, 4]).run().unwrap();
        assert_eq!(output, [6]);
    }

    #[test]
    fn faults() {
        let program = TmProgram::from_instructions(vec![
            ro(Opcode::In, Register::Ac, Register::Ac, Register::Ac),
            halt(),
        ]);
        assert_eq!(
            Machine::new(&program).run(),
            Err(RuntimeError::InputExhausted { pc: 0 })
        );

        let program = TmProgram::from_instructions(vec![
            ro(Opcode::Div, Register::Ac, Register::Ac, Register::Ac1),
            halt(),
        ]);
        assert_eq!(
            Machine::new(&program).run(),
            Err(RuntimeError::DivisionByZero { pc: 0 })
        );

        let program = TmProgram::from_instructions(vec![
            rm(Opcode::Ld, Register::Ac, -1, Register::Ac),
            halt(),
        ]);
        assert_eq!(
            Machine::new(&program).run(),
            Err(RuntimeError::DataOutOfRange { address: -1, pc: 0 })
        );

        let program = TmProgram::from_instructions(vec![rm(Opcode::Lda, Register::Pc, 5, Register::Pc)]);
        assert_eq!(
            Machine::new(&program).run(),
            Err(RuntimeError::InstructionOutOfRange { pc: 6 })
        );
    }

    #[test]
    fn address_overflow_is_out_of_range() {
        let program = TmProgram::from_instructions(vec![
            rm(Opcode::Ldc, Register::Ac1, i64::MAX, Register::Ac),
            rm(Opcode::Ld, Register::Ac, 1, Register::Ac1),
            halt(),
        ]);
        assert_eq!(
            Machine::new(&program).run(),
            Err(RuntimeError::DataOutOfRange {
                address: i64::MAX,
                pc: 1
            })
        );

        let program = TmProgram::from_instructions(vec![
            rm(Opcode::Ldc, Register::Ac1, i64::MIN, Register::Ac),
            rm(Opcode::St, Register::Ac, -1, Register::Ac1),
            halt(),
        ]);
        assert_eq!(
            Machine::new(&program).run(),
            Err(RuntimeError::DataOutOfRange {
                address: i64::MIN,
                pc: 1
            })
        );
    }

    #[test]
    fn load_address_wraps() {
        let program = TmProgram::from_instructions(vec![
            rm(Opcode::Ldc, Register::Ac, i64::MAX, Register::Ac),
            rm(Opcode::Lda, Register::Ac, 1, Register::Ac),
            halt(),
        ]);
        let mut machine = Machine::new(&program);
        machine.execute().unwrap();
        assert_eq!(machine.register(Register::Ac), i64::MIN);
    }

    #[test]
    fn opcode_in_wrong_form_is_illegal() {
        let program = TmProgram::from_instructions(vec![Instruction::Memory {
            op: Opcode::Add,
            reg: Register::Ac,
            offset: 0,
            base: Register::Ac,
        }]);
        assert_eq!(
            Machine::new(&program).run(),
            Err(RuntimeError::IllegalInstruction { pc: 0 })
        );
    }

    #[test]
    fn step_limit_stops_infinite_loops() {
        let program = TmProgram::from_instructions(vec![rm(Opcode::Lda, Register::Pc, -1, Register::Pc)]);
        let config = MachineConfig::default().with_step_limit(100);
        let mut machine = Machine::with_config(&program, config);

        assert_eq!(
            machine.execute(),
            Err(RuntimeError::StepLimitExceeded { limit: 100 })
        );
        assert_eq!(machine.steps(), 100);
    }
}
