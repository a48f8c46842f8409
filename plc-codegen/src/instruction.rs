use std::fmt;

use crate::register::Register;
use crate::target::TargetArch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Move,
    Add,
    Sub,
    Compare,
    Jump,
    JumpEq,
    JumpNeq,
    Call,
    Return,
    Push,
    Pop,
    Or,
    And,
    Xor,
    Not,
    Test,
    Label,
}

impl Opcode {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Move => "mov",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Compare => "cmp",
            Opcode::Jump => "jmp",
            Opcode::JumpEq => "je",
            Opcode::JumpNeq => "jne",
            Opcode::Call => "call",
            Opcode::Return => "ret",
            Opcode::Push => "push",
            Opcode::Pop => "pop",
            Opcode::Or => "or",
            Opcode::And => "and",
            Opcode::Xor => "xor",
            Opcode::Not => "not",
            Opcode::Test => "test",
            Opcode::Label => "label",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Register(Register),
    Immediate(i64),
    /// `offset` bytes from `base`; variable slots use negative offsets.
    Memory { base: Register, offset: i32 },
    Label(String),
}

/// One machine instruction. At most three operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operands: Vec<Operand>,
    pub comment: Option<String>,
}

impl Instruction {
    pub const MAX_OPERANDS: usize = 3;

    pub fn new(opcode: Opcode, operands: impl IntoIterator<Item = Operand>) -> Self {
        let operands = operands
            .into_iter()
            .take(Self::MAX_OPERANDS)
            .collect::<Vec<_>>();

        Self {
            opcode,
            operands,
            comment: None,
        }
    }

    pub fn label(name: impl Into<String>) -> Self {
        Self::new(Opcode::Label, [Operand::Label(name.into())])
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Assembly text of the instruction for `target`, without its comment.
    pub fn display(&self, target: TargetArch) -> DisplayInstruction<'_> {
        DisplayInstruction {
            instruction: self,
            target,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DisplayInstruction<'inst> {
    instruction: &'inst Instruction,
    target: TargetArch,
}

impl fmt::Display for DisplayInstruction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Instruction {
            opcode, operands, ..
        } = self.instruction;

        if let (Opcode::Label, [Operand::Label(name)]) = (opcode, operands.as_slice()) {
            return write!(f, "{name}:");
        }

        f.write_str(opcode.mnemonic())?;
        for (index, operand) in operands.iter().enumerate() {
            f.write_str(if index == 0 { " " } else { ", " })?;
            write_operand(f, operand, self.target)?;
        }
        Ok(())
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, operand: &Operand, target: TargetArch) -> fmt::Result {
    match (operand, target) {
        (Operand::Register(register), _) => f.write_str(register.name(target)),
        (Operand::Immediate(value), TargetArch::Arm64) => write!(f, "#{value}"),
        (Operand::Immediate(value), _) => write!(f, "{value}"),
        (Operand::Memory { base, offset }, TargetArch::X86_64) => {
            write!(f, "[{}{offset:+}]", base.name(target))
        }
        (Operand::Memory { base, offset }, TargetArch::Arm64) => {
            write!(f, "[{}, #{offset}]", base.name(target))
        }
        (Operand::Memory { base, offset }, TargetArch::Mips) => {
            write!(f, "{offset}({})", base.name(target))
        }
        (Operand::Label(name), _) => f.write_str(name),
    }
}
