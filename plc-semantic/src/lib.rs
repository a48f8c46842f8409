pub mod analyzer;
pub mod annotated;
pub mod diagnostics;
pub mod report;
pub mod symbol_table;

#[cfg(test)]
mod tests;

pub use analyzer::{NodeAnnotation, SemanticAnalyzer, SemanticInfo, analyze};
pub use annotated::{AnnotatedError, AnnotatedProgram, read_annotated, write_annotated};
pub use diagnostics::{Diagnostics, SemanticDiagnostic, SemanticErrorKind};
pub use report::{write_diagnostics_report, write_symbol_table};
pub use symbol_table::{DEFAULT_BUCKETS, SymbolEntry, SymbolTable, SymbolType, hash_name};
