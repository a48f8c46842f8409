use plc_core::Line;
use plc_syntax::{AstNode, NodeKind};

use crate::diagnostics::{Diagnostics, SemanticDiagnostic};
use crate::symbol_table::{SymbolTable, SymbolType};

/// Type facts recorded for one visited node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeAnnotation {
    pub kind: NodeKind,
    pub line: Line,
    pub semantic_type: SymbolType,
    pub is_constant: bool,
}

#[derive(Debug)]
pub struct SemanticInfo {
    pub symbol_table: SymbolTable,
    pub diagnostics: Vec<SemanticDiagnostic>,
    /// One entry per visited node, in pre-order.
    pub annotations: Vec<NodeAnnotation>,
    /// Inferred type of each top-level statement, in program order.
    pub statement_types: Vec<SymbolType>,
}

impl SemanticInfo {
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.error_count()
    }

    /// A run succeeds when it raised no errors; warnings do not count.
    pub fn is_success(&self) -> bool {
        self.error_count() == 0
    }
}

/// Walks a tree once, inferring node types and filling a fresh symbol table.
///
/// Statements are visited in program order and nothing else is assumed about
/// evaluation order: a name is undefined only if no assignment to it exists
/// anywhere in the program.
#[derive(Debug)]
pub struct SemanticAnalyzer {
    buckets: usize,
    symbol_table: SymbolTable,
    diagnostics: Diagnostics,
    annotations: Vec<NodeAnnotation>,
    statement_types: Vec<SymbolType>,
    /// Variables bound by the enclosing quantifiers, innermost last.
    bound: Vec<String>,
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self::with_buckets(crate::symbol_table::DEFAULT_BUCKETS)
    }

    pub fn with_buckets(buckets: usize) -> Self {
        Self {
            buckets,
            symbol_table: SymbolTable::with_buckets(buckets),
            diagnostics: Diagnostics::default(),
            annotations: Vec::new(),
            statement_types: Vec::new(),
            bound: Vec::new(),
        }
    }

    pub fn analyze(&mut self, root: &AstNode) -> SemanticInfo {
        tracing::debug!(nodes = root.node_count(), "starting semantic analysis");

        let root_type = self.analyze_node(root);
        if root.as_program().is_none() {
            self.statement_types.push(root_type);
        }

        self.validate_symbols();
        self.diagnostics.sort();

        let info = SemanticInfo {
            symbol_table: std::mem::replace(
                &mut self.symbol_table,
                SymbolTable::with_buckets(self.buckets),
            ),
            diagnostics: std::mem::take(&mut self.diagnostics).items(),
            annotations: std::mem::take(&mut self.annotations),
            statement_types: std::mem::take(&mut self.statement_types),
        };

        tracing::debug!(
            symbols = info.symbol_table.len(),
            errors = info.error_count(),
            warnings = info.warning_count(),
            "semantic analysis finished"
        );

        info
    }

    fn analyze_node(&mut self, node: &AstNode) -> SymbolType {
        let slot = self.annotations.len();
        self.annotations.push(NodeAnnotation {
            kind: node.kind(),
            line: node.line(),
            semantic_type: SymbolType::Unknown,
            is_constant: false,
        });

        let (semantic_type, is_constant) = match node {
            AstNode::Program(program) => {
                for statement in &program.statements {
                    let statement_type = self.analyze_node(statement);
                    self.statement_types.push(statement_type);
                }
                (SymbolType::Unknown, false)
            }
            AstNode::Identifier(ident) if self.bound.contains(&ident.name) => {
                (SymbolType::Boolean, false)
            }
            AstNode::Identifier(ident) => {
                self.symbol_table
                    .insert(&ident.name, SymbolType::Identifier, ident.line);
                self.symbol_table.mark_used(&ident.name, ident.line);
                (SymbolType::Boolean, false)
            }
            AstNode::Boolean(_) => (SymbolType::Boolean, true),
            AstNode::Binary(binary) => {
                self.analyze_node(&binary.lhs);
                self.analyze_node(&binary.rhs);
                // no folding, even when both operands are literals
                (SymbolType::Boolean, false)
            }
            AstNode::Not(unary) => {
                self.analyze_node(&unary.operand);
                (SymbolType::Boolean, false)
            }
            AstNode::Assignment(assignment) => {
                self.analyze_node(&assignment.value);

                let literal = match assignment.value.as_ref() {
                    AstNode::Boolean(literal) => Some(literal.value),
                    _ => None,
                };

                self.symbol_table
                    .insert(&assignment.variable, SymbolType::Boolean, assignment.line);
                self.symbol_table
                    .set_value(&assignment.variable, literal, assignment.line);
                (SymbolType::Boolean, false)
            }
            AstNode::ExpressionStmt(stmt) => {
                let expr_type = self.analyze_node(&stmt.expr);
                (expr_type, false)
            }
            AstNode::Quantifier(quantifier) => {
                // the body is walked for references only, never evaluated
                self.bound.push(quantifier.variable.clone());
                self.analyze_node(&quantifier.body);
                self.bound.pop();

                tracing::debug!(
                    quantifier = quantifier.kind.keyword(),
                    line = %quantifier.line,
                    "quantified formula left untyped"
                );
                (SymbolType::Unknown, false)
            }
        };

        let annotation = &mut self.annotations[slot];
        annotation.semantic_type = semantic_type;
        annotation.is_constant = is_constant;

        semantic_type
    }

    fn validate_symbols(&mut self) {
        for entry in self.symbol_table.iter() {
            if entry.is_undefined() {
                let line = entry.used_line.unwrap_or(entry.declared_line);
                self.diagnostics.undefined_variable(&entry.name, line);
            }

            if entry.is_unused() {
                self.diagnostics
                    .unused_variable(&entry.name, entry.declared_line);
            }
        }
    }
}

/// Analyzes `root` with a default-sized symbol table.
pub fn analyze(root: &AstNode) -> SemanticInfo {
    SemanticAnalyzer::new().analyze(root)
}
