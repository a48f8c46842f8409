use plc_core::Line;

use crate::error::{CodegenError, Result};
use crate::target::TargetArch;

/// Registers of the abstract machine. Named after their x86-64 spelling;
/// other targets map them by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    Rax,
    Rbx,
    Rcx,
    Rdx,
    Rsi,
    Rdi,
    R8,
    R9,
    /// Base of the stack frame variables are addressed from. Never allocated.
    Rbp,
}

impl Register {
    /// Allocation order.
    pub const GENERAL: [Register; 8] = [
        Register::Rax,
        Register::Rbx,
        Register::Rcx,
        Register::Rdx,
        Register::Rsi,
        Register::Rdi,
        Register::R8,
        Register::R9,
    ];

    /// Register holding the program's exit status.
    pub const RESULT: Register = Register::Rax;

    pub const FRAME: Register = Register::Rbp;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self, target: TargetArch) -> &'static str {
        const X86_64: [&str; 9] = ["rax", "rbx", "rcx", "rdx", "rsi", "rdi", "r8", "r9", "rbp"];
        const ARM64: [&str; 9] = ["x0", "x1", "x2", "x3", "x4", "x5", "x6", "x7", "x29"];
        const MIPS: [&str; 9] = [
            "$t0", "$t1", "$t2", "$t3", "$t4", "$t5", "$t6", "$t7", "$fp",
        ];

        match target {
            TargetArch::X86_64 => X86_64[self.index()],
            TargetArch::Arm64 => ARM64[self.index()],
            TargetArch::Mips => MIPS[self.index()],
        }
    }
}

/// In-use bitmap over [`Register::GENERAL`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RegisterFile {
    in_use: u8,
}

impl RegisterFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the first free register in allocation order. Running out is
    /// an error; a busy register is never handed out twice.
    pub fn allocate(&mut self, line: Line) -> Result<Register> {
        let register = Register::GENERAL
            .into_iter()
            .find(|register| self.is_free(*register))
            .ok_or(CodegenError::RegisterPressureExceeded {
                line,
                available: Register::GENERAL.len(),
            })?;

        self.in_use |= Self::bit(register);
        tracing::trace!(
            register = register.name(TargetArch::X86_64),
            in_use = self.in_use_count(),
            "allocated register"
        );
        Ok(register)
    }

    pub fn release(&mut self, register: Register) {
        self.in_use &= !Self::bit(register);
    }

    pub fn is_free(&self, register: Register) -> bool {
        self.in_use & Self::bit(register) == 0
    }

    pub fn in_use_count(&self) -> usize {
        self.in_use.count_ones() as usize
    }

    fn bit(register: Register) -> u8 {
        match register {
            Register::Rbp => 0,
            general => 1 << general.index(),
        }
    }
}
