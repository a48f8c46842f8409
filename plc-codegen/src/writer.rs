use std::io::{self, Write};

use crate::generator::GeneratedProgram;
use crate::instruction::Opcode;

/// Column trailing comments start at.
const COMMENT_COLUMN: usize = 28;

/// Writes `program` one instruction per line, labels flush left and
/// everything else indented, with comments in a common column.
pub fn write_program<W>(writer: &mut W, program: &GeneratedProgram) -> io::Result<()>
where
    W: Write + ?Sized,
{
    let target = program.target;
    let leader = target.comment_leader();

    writeln!(writer, "{leader} Program generated by the code generation stage")?;
    writeln!(writer, "{leader} Target: {target}")?;
    writeln!(writer, "{leader} Stack: {} bytes", program.stack_size)?;
    writeln!(writer, "{leader}")?;
    writeln!(writer)?;

    for instruction in &program.instructions {
        let text = match instruction.opcode {
            Opcode::Label => instruction.display(target).to_string(),
            _ => format!("    {}", instruction.display(target)),
        };

        match &instruction.comment {
            Some(comment) => writeln!(
                writer,
                "{text:<width$} {leader} {comment}",
                width = COMMENT_COLUMN - 1
            )?,
            None => writeln!(writer, "{text}")?,
        }
    }

    writeln!(writer)?;
    writeln!(writer, "{leader} End of program")
}
