//! Reference interpreter for generated programs.
//!
//! Values are booleans held as `0`/`1`, so `Not` is a logical complement.
//! Control flow (`Jump*`, `Call`, `Return`) is not supported; labels are
//! no-ops.

use std::collections::HashMap;

use crate::error::MachineError;
use crate::instruction::{Instruction, Opcode, Operand};
use crate::register::Register;

#[derive(Debug, Default, Clone)]
pub struct Machine {
    registers: [i64; 9],
    slots: HashMap<i32, i64>,
    stack: Vec<i64>,
    /// Set by `Compare` and `Test`.
    zero: bool,
}

impl Machine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, register: Register) -> i64 {
        self.registers[register.index()]
    }

    /// Value stored in the variable slot at frame `offset`.
    pub fn slot(&self, offset: i32) -> Option<i64> {
        self.slots.get(&offset).copied()
    }

    pub fn zero_flag(&self) -> bool {
        self.zero
    }

    pub fn run(&mut self, instructions: &[Instruction]) -> Result<(), MachineError> {
        for (index, instruction) in instructions.iter().enumerate() {
            self.step(index, instruction)?;
        }
        Ok(())
    }

    fn step(&mut self, index: usize, instruction: &Instruction) -> Result<(), MachineError> {
        let opcode = instruction.opcode;
        let invalid = MachineError::InvalidOperands { index, opcode };

        match (opcode, instruction.operands.as_slice()) {
            (Opcode::Label, _) => {}
            (Opcode::Move, [Operand::Register(dest), source]) => {
                let value = self.read(index, opcode, source)?;
                self.registers[dest.index()] = value;
            }
            (Opcode::Move, [Operand::Memory { offset, .. }, Operand::Register(source)]) => {
                let value = self.register(*source);
                self.slots.insert(*offset, value);
            }
            (
                Opcode::Or | Opcode::And | Opcode::Xor | Opcode::Add | Opcode::Sub,
                [Operand::Register(dest), source],
            ) => {
                let lhs = self.register(*dest);
                let rhs = self.read(index, opcode, source)?;
                self.registers[dest.index()] = match opcode {
                    Opcode::Or => lhs | rhs,
                    Opcode::And => lhs & rhs,
                    Opcode::Xor => lhs ^ rhs,
                    Opcode::Add => lhs.wrapping_add(rhs),
                    _ => lhs.wrapping_sub(rhs),
                };
            }
            (Opcode::Not, [Operand::Register(dest)]) => {
                let value = self.register(*dest);
                self.registers[dest.index()] = i64::from(value == 0);
            }
            (Opcode::Compare, [lhs, rhs]) => {
                self.zero = self.read(index, opcode, lhs)? == self.read(index, opcode, rhs)?;
            }
            (Opcode::Test, [lhs, rhs]) => {
                self.zero = self.read(index, opcode, lhs)? & self.read(index, opcode, rhs)? == 0;
            }
            (Opcode::Push, [source]) => {
                let value = self.read(index, opcode, source)?;
                self.stack.push(value);
            }
            (Opcode::Pop, [Operand::Register(dest)]) => {
                let value = self
                    .stack
                    .pop()
                    .ok_or(MachineError::StackUnderflow { index })?;
                self.registers[dest.index()] = value;
            }
            (
                Opcode::Jump | Opcode::JumpEq | Opcode::JumpNeq | Opcode::Call | Opcode::Return,
                _,
            ) => return Err(MachineError::UnsupportedOpcode { index, opcode }),
            _ => return Err(invalid),
        }

        Ok(())
    }

    fn read(&self, index: usize, opcode: Opcode, operand: &Operand) -> Result<i64, MachineError> {
        match operand {
            Operand::Register(register) => Ok(self.register(*register)),
            Operand::Immediate(value) => Ok(*value),
            Operand::Memory { offset, .. } => self
                .slot(*offset)
                .ok_or(MachineError::UninitializedSlot {
                    index,
                    offset: *offset,
                }),
            Operand::Label(_) => Err(MachineError::InvalidOperands { index, opcode }),
        }
    }
}
