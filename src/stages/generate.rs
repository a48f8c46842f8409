use std::path::Path;

use plc_codegen::{GeneratedProgram, TargetArch, write_program};
use plc_core::{read_artifact, write_artifact};
use plc_semantic::read_annotated;
use plc_syntax::AstNode;

use crate::error::{Error, Result};
use crate::project::Project;

/// Compiles the program of an annotated AST and writes it out. Refuses
/// annotated ASTs whose analysis failed.
pub fn generate(project: &Project, input: Option<&Path>) -> Result<GeneratedProgram> {
    let config = &project.config;
    let target = config.target.parse::<TargetArch>()?;
    let input = input.map_or_else(|| project.path(&config.annotated_ast), Path::to_path_buf);
    tracing::info!(input = %input.display(), %target, "code generation started");

    let text = read_artifact(&input)?;
    let annotated = read_annotated(&text)?;
    if !annotated.analysis_passed {
        return Err(Error::SemanticFailed {
            errors: annotated.errors_found,
        });
    }

    let root = AstNode::Program(annotated.program);
    let program = plc_codegen::generate(&root, target)?;

    let output = project.path(&config.program);
    write_artifact(&output, |writer| write_program(writer, &program))?;

    tracing::info!(
        output = %output.display(),
        instructions = program.instructions.len(),
        "code generation finished"
    );
    Ok(program)
}
