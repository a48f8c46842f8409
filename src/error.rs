use plc_codegen::{CodegenError, UnknownTarget};
use plc_core::ArtifactError;
use plc_semantic::AnnotatedError;
use plc_syntax::DecodeError;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    #[error("malformed AST dump: {0}")]
    Decode(#[from] DecodeError),
    #[error("malformed annotated AST: {0}")]
    Annotated(#[from] AnnotatedError),
    #[error("code generation failed: {0}")]
    Codegen(#[from] CodegenError),
    #[error(transparent)]
    InvalidTarget(#[from] UnknownTarget),
    #[error("semantic analysis failed with {errors} error(s)")]
    SemanticFailed { errors: usize },
}
