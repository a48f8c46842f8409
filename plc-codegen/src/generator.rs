//! Lowering of a tree onto the register machine.
//!
//! Every expression is generated into a destination register chosen by its
//! parent. A binary connective evaluates its left operand into that register
//! and its right operand into a freshly allocated one, which is released
//! right after the combining instruction. Right-nested operands therefore
//! hold one register per level until they are combined.

use plc_syntax::encode::boolean_keyword;
use plc_syntax::{AstNode, Connective, Program};

use crate::context::CodeGenContext;
use crate::error::{CodegenError, Result};
use crate::instruction::{Instruction, Opcode, Operand};
use crate::register::Register;
use crate::target::TargetArch;

/// Output of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedProgram {
    pub target: TargetArch,
    pub instructions: Vec<Instruction>,
    /// Bytes of stack used by variable slots.
    pub stack_size: i32,
}

#[derive(Debug)]
pub struct CodeGenerator {
    ctx: CodeGenContext,
}

impl CodeGenerator {
    pub fn new(target: TargetArch) -> Self {
        Self {
            ctx: CodeGenContext::new(target),
        }
    }

    pub fn generate(mut self, root: &AstNode) -> Result<GeneratedProgram> {
        let program = root.as_program().ok_or_else(|| unsupported(root))?;
        tracing::debug!(
            statements = program.len(),
            target = %self.ctx.target(),
            "starting code generation"
        );

        self.generate_program(program)?;

        let stack_size = self.ctx.stack_size();
        let target = self.ctx.target();
        let instructions = self.ctx.into_instructions();
        tracing::debug!(instructions = instructions.len(), stack_size, "code generation finished");

        Ok(GeneratedProgram {
            target,
            instructions,
            stack_size,
        })
    }

    fn generate_program(&mut self, program: &Program) -> Result<()> {
        for statement in &program.statements {
            let label = self.ctx.fresh_label("stmt");
            self.ctx
                .emit(Instruction::label(label).with_comment(format!("line {}", statement.line())));
            self.generate_statement(statement)?;
        }

        self.ctx.emit(
            Instruction::new(
                Opcode::Move,
                [Operand::Register(Register::RESULT), Operand::Immediate(0)],
            )
            .with_comment("exit status"),
        );
        Ok(())
    }

    fn generate_statement(&mut self, statement: &AstNode) -> Result<()> {
        match statement {
            AstNode::Assignment(assignment) => {
                let slot = self.ctx.variable(&assignment.variable);
                let value = self.ctx.allocate(assignment.line)?;
                self.generate_expression(&assignment.value, value)?;
                self.ctx.emit(
                    Instruction::new(Opcode::Move, [slot, Operand::Register(value)])
                        .with_comment(assignment.variable.clone()),
                );
                self.ctx.release(value);
                Ok(())
            }
            AstNode::ExpressionStmt(stmt) => {
                let result = self.ctx.allocate(stmt.line)?;
                self.generate_expression(&stmt.expr, result)?;
                self.ctx.release(result);
                Ok(())
            }
            other => Err(unsupported(other)),
        }
    }

    fn generate_expression(&mut self, node: &AstNode, dest: Register) -> Result<()> {
        match node {
            AstNode::Identifier(ident) => {
                let slot = self.ctx.variable(&ident.name);
                self.ctx.emit(
                    Instruction::new(Opcode::Move, [Operand::Register(dest), slot])
                        .with_comment(ident.name.clone()),
                );
            }
            AstNode::Boolean(literal) => {
                self.ctx.emit(
                    Instruction::new(
                        Opcode::Move,
                        [
                            Operand::Register(dest),
                            Operand::Immediate(i64::from(literal.value)),
                        ],
                    )
                    .with_comment(boolean_keyword(literal.value)),
                );
            }
            AstNode::Not(unary) => {
                self.generate_expression(&unary.operand, dest)?;
                self.ctx.emit(Instruction::new(Opcode::Not, [Operand::Register(dest)]));
            }
            AstNode::Binary(binary) => {
                self.generate_expression(&binary.lhs, dest)?;
                if binary.op == Connective::Implies {
                    self.ctx.emit(Instruction::new(Opcode::Not, [Operand::Register(dest)]));
                }

                let rhs = self.ctx.allocate(binary.line)?;
                self.generate_expression(&binary.rhs, rhs)?;

                let opcode = match binary.op {
                    Connective::And => Opcode::And,
                    Connective::Or | Connective::Implies => Opcode::Or,
                    Connective::Xor | Connective::Xnor | Connective::Iff | Connective::Equiv => {
                        Opcode::Xor
                    }
                };
                self.ctx.emit(
                    Instruction::new(opcode, [Operand::Register(dest), Operand::Register(rhs)])
                        .with_comment(binary.op.keyword()),
                );
                self.ctx.release(rhs);

                if matches!(
                    binary.op,
                    Connective::Xnor | Connective::Iff | Connective::Equiv
                ) {
                    self.ctx.emit(Instruction::new(Opcode::Not, [Operand::Register(dest)]));
                }
            }
            other => return Err(unsupported(other)),
        }

        Ok(())
    }
}

fn unsupported(node: &AstNode) -> CodegenError {
    CodegenError::UnsupportedConstruct {
        construct: node.kind().keyword(),
        line: node.line(),
    }
}

/// Generates `root`, which must be a program, for `target`.
pub fn generate(root: &AstNode, target: TargetArch) -> Result<GeneratedProgram> {
    CodeGenerator::new(target).generate(root)
}
