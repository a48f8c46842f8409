use std::collections::HashMap;

use plc_core::Line;

use crate::error::Result;
use crate::instruction::{Instruction, Operand};
use crate::register::{Register, RegisterFile};
use crate::target::TargetArch;

/// Bytes reserved per variable.
pub const SLOT_SIZE: i32 = 8;

/// State of one code generation run.
#[derive(Debug)]
pub struct CodeGenContext {
    target: TargetArch,
    instructions: Vec<Instruction>,
    registers: RegisterFile,
    /// Variable name to frame offset, first reference wins.
    slots: HashMap<String, i32>,
    stack_size: i32,
    next_label: u32,
}

impl CodeGenContext {
    pub fn new(target: TargetArch) -> Self {
        Self {
            target,
            instructions: Vec::new(),
            registers: RegisterFile::new(),
            slots: HashMap::new(),
            stack_size: 0,
            next_label: 1,
        }
    }

    pub fn target(&self) -> TargetArch {
        self.target
    }

    pub fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    pub fn allocate(&mut self, line: Line) -> Result<Register> {
        self.registers.allocate(line)
    }

    pub fn release(&mut self, register: Register) {
        self.registers.release(register);
    }

    /// Frame offset of `name`, reserving the next slot on first reference.
    pub fn slot(&mut self, name: &str) -> i32 {
        if let Some(offset) = self.slots.get(name) {
            return *offset;
        }

        self.stack_size += SLOT_SIZE;
        let offset = -self.stack_size;
        tracing::trace!(name, offset, "reserved stack slot");
        self.slots.insert(name.to_string(), offset);
        offset
    }

    /// Memory operand addressing the slot of `name`.
    pub fn variable(&mut self, name: &str) -> Operand {
        Operand::Memory {
            base: Register::FRAME,
            offset: self.slot(name),
        }
    }

    /// Bytes of frame taken by variable slots.
    pub fn stack_size(&self) -> i32 {
        self.stack_size
    }

    /// `prefix_N`, unique within this run.
    pub fn fresh_label(&mut self, prefix: &str) -> String {
        let label = format!("{prefix}_{}", self.next_label);
        self.next_label += 1;
        label
    }
}
