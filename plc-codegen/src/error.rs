use plc_core::Line;
use thiserror::Error;

use crate::instruction::Opcode;

pub type Result<T, E = CodegenError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    #[error("line {line}: {construct} cannot be compiled")]
    UnsupportedConstruct { construct: &'static str, line: Line },
    #[error("line {line}: all {available} registers are in use")]
    RegisterPressureExceeded { line: Line, available: usize },
}

/// Failure while executing a program on the reference [`Machine`](crate::Machine).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("instruction {index}: '{opcode}' is not supported by the machine")]
    UnsupportedOpcode { index: usize, opcode: Opcode },
    #[error("instruction {index}: invalid operands for '{opcode}'")]
    InvalidOperands { index: usize, opcode: Opcode },
    #[error("instruction {index}: read of uninitialized stack slot {offset}")]
    UninitializedSlot { index: usize, offset: i32 },
    #[error("instruction {index}: pop from an empty stack")]
    StackUnderflow { index: usize },
}
