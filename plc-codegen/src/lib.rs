pub mod context;
pub mod error;
pub mod generator;
pub mod instruction;
pub mod machine;
pub mod register;
pub mod target;
pub mod writer;


pub use context::CodeGenContext;
pub use error::{CodegenError, MachineError, Result};
pub use generator::{CodeGenerator, GeneratedProgram, generate};
pub use instruction::{Instruction, Opcode, Operand};
pub use machine::Machine;
pub use register::{Register, RegisterFile};
pub use target::{TargetArch, UnknownTarget};
pub use writer::write_program;
