use std::path::Path;

use plc_core::{Diagnostic, Severity, read_artifact, write_artifact};
use plc_semantic::{
    SemanticAnalyzer, SemanticInfo, write_annotated, write_diagnostics_report,
    write_symbol_table,
};

use crate::error::{Error, Result};
use crate::project::Project;

/// Decodes an AST dump, analyzes it and writes the three analysis artifacts.
///
/// The artifacts are written whether or not analysis succeeds; a failed run
/// is recorded in the annotated AST so generation refuses it later.
pub fn analyze(project: &Project, input: Option<&Path>) -> Result<SemanticInfo> {
    let config = &project.config;
    let input = input.map_or_else(|| project.path(&config.ast), Path::to_path_buf);
    tracing::info!(input = %input.display(), "semantic analysis started");

    let text = read_artifact(&input)?;
    let root = plc_syntax::decode(&text)?;
    let info = SemanticAnalyzer::with_buckets(config.symbol_buckets).analyze(&root);

    write_artifact(project.path(&config.annotated_ast), |writer| {
        write_annotated(writer, &root, &info)
    })?;
    write_artifact(project.path(&config.symbol_table), |writer| {
        write_symbol_table(writer, &info.symbol_table)
    })?;
    write_artifact(project.path(&config.semantic_errors), |writer| {
        write_diagnostics_report(writer, &info)
    })?;

    for diagnostic in info.diagnostics.iter().map(Diagnostic::from) {
        match diagnostic.severity {
            Severity::Error => tracing::error!("{diagnostic}"),
            Severity::Warning => tracing::warn!("{diagnostic}"),
            Severity::Info => tracing::info!("{diagnostic}"),
        }
    }

    tracing::info!(
        symbols = info.symbol_table.len(),
        errors = info.error_count(),
        warnings = info.warning_count(),
        "semantic analysis finished"
    );

    match info.error_count() {
        0 => Ok(info),
        errors => Err(Error::SemanticFailed { errors }),
    }
}
