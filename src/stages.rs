//! The two compiler stages driven by the CLI. Stages only talk to each other
//! through artifacts on disk.

mod analyze;
mod generate;


use std::path::Path;

pub use analyze::analyze;
pub use generate::generate;

use crate::error::Result;
use crate::project::Project;

/// Analysis followed by generation from the annotated AST it wrote.
/// Generation is not attempted when analysis fails.
pub fn run(project: &Project, input: Option<&Path>) -> Result<()> {
    analyze(project, input)?;
    generate(project, None)?;
    Ok(())
}
