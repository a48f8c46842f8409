pub mod artifact;
pub mod diagnostics;
pub mod location;

pub use artifact::{ArtifactError, read_artifact, write_artifact};
pub use diagnostics::{Diagnostic, Severity};
pub use location::Line;
