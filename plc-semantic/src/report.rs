//! Human-readable reports written at the end of semantic analysis.

use std::io::{self, Write};

use plc_syntax::encode::boolean_keyword;

use crate::analyzer::SemanticInfo;
use crate::diagnostics::SemanticDiagnostic;
use crate::symbol_table::SymbolTable;

const RULE: &str = "----------------------------------------------------------------";

fn yes_no(flag: bool) -> &'static str {
    match flag {
        true => "Yes",
        false => "No",
    }
}

/// Fixed-column dump of every symbol, in table iteration order.
pub fn write_symbol_table<W>(writer: &mut W, table: &SymbolTable) -> io::Result<()>
where
    W: Write + ?Sized,
{
    writeln!(writer, "# Symbol Table")?;
    writeln!(writer, "# Generated by the semantic analysis stage")?;
    writeln!(writer, "#")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "{:<12} {:<10} {:<8} {:<8} {:<6} {:<6} Value",
        "Name", "Type", "Defined", "Used", "Decl", "Use"
    )?;
    writeln!(writer, "{RULE}")?;

    if table.is_empty() {
        writeln!(writer, "(No symbols found)")?;
    }

    for entry in table.iter() {
        let value = match (entry.value, entry.defined) {
            (Some(value), true) => boolean_keyword(value),
            _ => "--",
        };

        writeln!(
            writer,
            "{:<12} {:<10} {:<8} {:<8} {:<6} {:<6} {value}",
            entry.name,
            entry.symbol_type,
            yes_no(entry.defined),
            yes_no(entry.used),
            entry.declared_line.get(),
            entry.used_line.map_or(0, |line| line.get()),
        )?;
    }

    writeln!(writer)?;
    writeln!(writer, "Total symbols: {}", table.len())
}

/// Either a no-errors summary or the numbered error list, followed by the
/// numbered warnings when there are any.
pub fn write_diagnostics_report<W>(writer: &mut W, info: &SemanticInfo) -> io::Result<()>
where
    W: Write + ?Sized,
{
    writeln!(writer, "# Semantic Analysis Errors")?;
    writeln!(writer, "# Generated by the semantic analysis stage")?;
    writeln!(writer, "#")?;
    writeln!(writer)?;

    let (errors, warnings): (Vec<_>, Vec<_>) =
        info.diagnostics.iter().partition(|d| d.is_error());

    if errors.is_empty() {
        writeln!(writer, "No semantic errors found.")?;
        writeln!(writer)?;
        writeln!(writer, "Analysis Summary:")?;
        writeln!(writer, "Symbols processed: {}", info.symbol_table.len())?;
        writeln!(writer, "Warnings issued: {}", warnings.len())?;
        writeln!(writer, "All semantic rules satisfied")?;
        writeln!(writer)?;
    } else {
        writeln!(writer, "Semantic Errors Found: {}", errors.len())?;
        writeln!(writer)?;
        write_numbered(writer, &errors)?;
    }

    if !warnings.is_empty() {
        writeln!(writer, "Warnings Issued: {}", warnings.len())?;
        writeln!(writer)?;
        write_numbered(writer, &warnings)?;
    }

    writeln!(writer, "# End of semantic analysis report")
}

fn write_numbered<W>(writer: &mut W, diagnostics: &[&SemanticDiagnostic]) -> io::Result<()>
where
    W: Write + ?Sized,
{
    for (index, diagnostic) in diagnostics.iter().enumerate() {
        write!(writer, "{}. {}", index + 1, diagnostic.kind)?;
        if diagnostic.line.is_known() {
            write!(writer, " (Line {})", diagnostic.line)?;
        }
        if let Some(symbol) = &diagnostic.symbol {
            write!(writer, " - Symbol: {symbol}")?;
        }
        writeln!(writer)?;
        writeln!(writer, "   Description: {}", diagnostic.message)?;
        writeln!(writer)?;
    }
    Ok(())
}
