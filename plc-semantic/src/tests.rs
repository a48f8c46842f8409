use plc_core::Line;
use plc_syntax::{AstNode, Connective};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use crate::{
    SemanticAnalyzer, SemanticErrorKind, SymbolType, analyze, read_annotated,
    write_annotated, write_diagnostics_report, write_symbol_table,
};

/// `B := TRUE; C := FALSE; B OR C;`, one statement per line.
fn defined_and_used() -> AstNode {
    AstNode::program(
        vec![
            AstNode::assignment("B", AstNode::boolean(true, Line(1)), Line(1)),
            AstNode::assignment("C", AstNode::boolean(false, Line(2)), Line(2)),
            AstNode::expression_stmt(
                AstNode::binary(
                    Connective::Or,
                    AstNode::identifier("B", Line(3)),
                    AstNode::identifier("C", Line(3)),
                    Line(3),
                ),
                Line(3),
            ),
        ],
        Line(1),
    )
}

/// `A := TRUE; A AND X;`
fn undefined_x() -> AstNode {
    AstNode::program(
        vec![
            AstNode::assignment("A", AstNode::boolean(true, Line(1)), Line(1)),
            AstNode::expression_stmt(
                AstNode::binary(
                    Connective::And,
                    AstNode::identifier("A", Line(2)),
                    AstNode::identifier("X", Line(2)),
                    Line(2),
                ),
                Line(2),
            ),
        ],
        Line(1),
    )
}

/// `Y := TRUE;`
fn unused_y() -> AstNode {
    AstNode::program(
        vec![AstNode::assignment(
            "Y",
            AstNode::boolean(true, Line(1)),
            Line(1),
        )],
        Line(1),
    )
}

fn render<F>(write: F) -> String
where
    F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>,
{
    let mut out = Vec::new();
    write(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_defined_and_used_symbols() {
    let info = analyze(&defined_and_used());

    for (name, line, value) in [("B", Line(1), true), ("C", Line(2), false)] {
        let entry = info.symbol_table.lookup(name).unwrap();
        assert_eq!(entry.symbol_type, SymbolType::Boolean);
        assert!(entry.defined);
        assert!(entry.used);
        assert_eq!(entry.declared_line, line);
        assert_eq!(entry.used_line, Some(Line(3)));
        assert_eq!(entry.value, Some(value));
    }

    assert_eq!(info.error_count(), 0);
    assert_eq!(info.warning_count(), 0);
    assert!(info.is_success());
    assert_eq!(
        info.statement_types,
        [SymbolType::Boolean, SymbolType::Boolean, SymbolType::Boolean]
    );
}

#[test]
fn test_undefined_variable_fails_analysis() {
    let info = analyze(&undefined_x());

    assert_eq!(info.symbol_table.undefined_count(), 1);
    assert_eq!(info.diagnostics.len(), 1);

    let diagnostic = &info.diagnostics[0];
    assert_eq!(diagnostic.kind, SemanticErrorKind::UndefinedVariable);
    assert_eq!(diagnostic.line, Line(2));
    assert_eq!(diagnostic.symbol.as_deref(), Some("X"));
    assert!(!info.is_success());

    let x = info.symbol_table.lookup("X").unwrap();
    assert_eq!(x.symbol_type, SymbolType::Identifier);
    insta::assert_yaml_snapshot!(x, @r"
    ---
    name: X
    symbol_type: Identifier
    defined: false
    used: true
    declared_line: 2
    used_line: 2
    value: ~
    ");
}

#[test]
fn test_unused_variable_is_a_warning() {
    let info = analyze(&unused_y());

    assert_eq!(info.symbol_table.unused_count(), 1);
    assert_eq!(info.error_count(), 0);
    assert_eq!(info.warning_count(), 1);
    assert_eq!(info.diagnostics[0].kind, SemanticErrorKind::UnusedVariable);
    assert_eq!(info.diagnostics[0].line, Line(1));
    assert!(info.is_success());
}

#[test]
fn test_use_before_assignment_is_not_undefined() {
    // `Z AND TRUE; Z := FALSE;`
    let tree = AstNode::program(
        vec![
            AstNode::expression_stmt(
                AstNode::binary(
                    Connective::And,
                    AstNode::identifier("Z", Line(1)),
                    AstNode::boolean(true, Line(1)),
                    Line(1),
                ),
                Line(1),
            ),
            AstNode::assignment("Z", AstNode::boolean(false, Line(2)), Line(2)),
        ],
        Line(1),
    );

    let info = analyze(&tree);
    let z = info.symbol_table.lookup("Z").unwrap();

    assert!(z.defined && z.used);
    assert_eq!(z.symbol_type, SymbolType::Identifier);
    assert_eq!(z.declared_line, Line(2));
    assert_eq!(z.value, None);
    assert!(info.diagnostics.is_empty());
}

#[test]
fn test_assignment_from_expression_stores_no_value() {
    let tree = AstNode::program(
        vec![
            AstNode::assignment("P", AstNode::boolean(true, Line(1)), Line(1)),
            AstNode::assignment(
                "Q",
                AstNode::not(AstNode::identifier("P", Line(2)), Line(2)),
                Line(2),
            ),
        ],
        Line(1),
    );

    let info = analyze(&tree);
    let q = info.symbol_table.lookup("Q").unwrap();
    assert!(q.defined);
    assert_eq!(q.value, None);
    assert_eq!(info.warning_count(), 1);
}

#[test]
fn test_diagnostics_are_ordered_by_line() {
    // `U := TRUE; V := FALSE; W;` with W used on line 3 and never defined
    let tree = AstNode::program(
        vec![
            AstNode::assignment("U", AstNode::boolean(true, Line(1)), Line(1)),
            AstNode::assignment("V", AstNode::boolean(false, Line(2)), Line(2)),
            AstNode::expression_stmt(AstNode::identifier("W", Line(3)), Line(3)),
        ],
        Line(1),
    );

    let info = analyze(&tree);
    let lines = info.diagnostics.iter().map(|d| d.line).collect::<Vec<_>>();
    assert_eq!(lines, [Line(1), Line(2), Line(3)]);
}

#[test]
fn test_analysis_is_deterministic() {
    let tree = undefined_x();
    let first = analyze(&tree);
    let second = SemanticAnalyzer::new().analyze(&tree);

    assert_eq!(first.diagnostics, second.diagnostics);
    assert_eq!(first.annotations, second.annotations);
    assert_eq!(
        render(|out| write_symbol_table(out, &first.symbol_table)),
        render(|out| write_symbol_table(out, &second.symbol_table)),
    );
}

#[test]
fn test_symbol_table_report() {
    let info = analyze(&defined_and_used());
    let report = render(|out| write_symbol_table(out, &info.symbol_table));

    insta::assert_snapshot!(report, @r"
    # Symbol Table
    # Generated by the semantic analysis stage
    #

    Name         Type       Defined  Used     Decl   Use    Value
    ----------------------------------------------------------------
    B            BOOLEAN    Yes      Yes      1      3      TRUE
    C            BOOLEAN    Yes      Yes      2      3      FALSE

    Total symbols: 2
    ");
}

#[test]
fn test_empty_symbol_table_report() {
    let info = analyze(&AstNode::program(vec![], Line(1)));
    let report = render(|out| write_symbol_table(out, &info.symbol_table));

    insta::assert_snapshot!(report, @r"
    # Symbol Table
    # Generated by the semantic analysis stage
    #

    Name         Type       Defined  Used     Decl   Use    Value
    ----------------------------------------------------------------
    (No symbols found)

    Total symbols: 0
    ");
}

#[test]
fn test_clean_diagnostics_report() {
    let info = analyze(&defined_and_used());
    let report = render(|out| write_diagnostics_report(out, &info));

    insta::assert_snapshot!(report, @r"
    # Semantic Analysis Errors
    # Generated by the semantic analysis stage
    #

    No semantic errors found.

    Analysis Summary:
    Symbols processed: 2
    Warnings issued: 0
    All semantic rules satisfied

    # End of semantic analysis report
    ");
}

#[test]
fn test_error_diagnostics_report() {
    let info = analyze(&undefined_x());
    let report = render(|out| write_diagnostics_report(out, &info));

    insta::assert_snapshot!(report, @r"
    # Semantic Analysis Errors
    # Generated by the semantic analysis stage
    #

    Semantic Errors Found: 1

    1. UNDEFINED_VARIABLE (Line 2) - Symbol: X
       Description: variable 'X' is used but never defined

    # End of semantic analysis report
    ");
}

#[test]
fn test_warning_diagnostics_report() {
    let info = analyze(&unused_y());
    let report = render(|out| write_diagnostics_report(out, &info));

    insta::assert_snapshot!(report, @r"
    # Semantic Analysis Errors
    # Generated by the semantic analysis stage
    #

    No semantic errors found.

    Analysis Summary:
    Symbols processed: 1
    Warnings issued: 1
    All semantic rules satisfied

    Warnings Issued: 1

    1. UNUSED_VARIABLE (Line 1) - Symbol: Y
       Description: variable 'Y' is defined but never used

    # End of semantic analysis report
    ");
}

#[test]
fn test_annotated_output() {
    let tree = defined_and_used();
    let info = analyze(&tree);
    let annotated = render(|out| write_annotated(out, &tree, &info));

    insta::assert_snapshot!(annotated, @r"
    # Semantically Annotated Abstract Syntax Tree
    # Generated by the semantic analysis stage
    #

    ANNOTATED_PROGRAM:
    Node_Type: PROGRAM
    Semantic_Type: PROGRAM_BLOCK
    Line: 1
    Statements: 3
    Analysis_Status: VALIDATED

    Statement_1:
    Node_Type: ASSIGNMENT
    Line: 1
    Semantic_Type: BOOLEAN
    Operation: VARIABLE_ASSIGNMENT
    Target: B
    Validation: PASSED
    Tree:
      ASSIGNMENT (line 1)
        Variable: B
        Value:
          BOOLEAN: TRUE (line 1)

    Statement_2:
    Node_Type: ASSIGNMENT
    Line: 2
    Semantic_Type: BOOLEAN
    Operation: VARIABLE_ASSIGNMENT
    Target: C
    Validation: PASSED
    Tree:
      ASSIGNMENT (line 2)
        Variable: C
        Value:
          BOOLEAN: FALSE (line 2)

    Statement_3:
    Node_Type: EXPRESSION_STMT
    Line: 3
    Semantic_Type: BOOLEAN
    Operation: EXPRESSION_EVALUATION
    Expression: OR
    Validation: PASSED
    Tree:
      EXPRESSION_STMT (line 3)
        Expression:
          OR (line 3)
            Left:
              IDENTIFIER: B (line 3)
            Right:
              IDENTIFIER: C (line 3)

    SEMANTIC_SUMMARY:
    Symbols_Processed: 2
    Errors_Found: 0
    Warnings_Issued: 0
    Type_Safety: GUARANTEED
    Analysis_Result: SUCCESS

    SYMBOL_REFERENCES:
    B:
    Type: BOOLEAN
    Defined: YES
    Used: YES
    Declaration_Line: 1
    Usage_Line: 3
    Value: TRUE

    C:
    Type: BOOLEAN
    Defined: YES
    Used: YES
    Declaration_Line: 2
    Usage_Line: 3
    Value: FALSE

    # End of Semantically Annotated AST
    ");
}

#[test]
fn test_annotated_marks_failing_statements() {
    let tree = undefined_x();
    let info = analyze(&tree);
    let annotated = render(|out| write_annotated(out, &tree, &info));

    let validations = annotated
        .lines()
        .filter(|line| line.starts_with("Validation: "))
        .collect::<Vec<_>>();
    assert_eq!(validations, ["Validation: PASSED", "Validation: FAILED"]);
    assert!(annotated.contains("Analysis_Status: FAILED"));
    assert!(annotated.contains("Type_Safety: VIOLATED"));

    let read = read_annotated(&annotated).unwrap();
    assert!(!read.analysis_passed);
    assert_eq!(read.errors_found, 1);
    assert_eq!(AstNode::Program(read.program), tree);
}

#[test]
fn test_every_statement_using_an_undefined_name_fails() {
    // `X;` on line 1, then `X; Z := TRUE;` both on line 2
    let tree = AstNode::program(
        vec![
            AstNode::expression_stmt(AstNode::identifier("X", Line(1)), Line(1)),
            AstNode::expression_stmt(AstNode::identifier("X", Line(2)), Line(2)),
            AstNode::assignment("Z", AstNode::boolean(true, Line(2)), Line(2)),
        ],
        Line(1),
    );
    let info = analyze(&tree);
    assert_eq!(info.error_count(), 1);

    let annotated = render(|out| write_annotated(out, &tree, &info));
    let validations = annotated
        .lines()
        .filter(|line| line.starts_with("Validation: "))
        .collect::<Vec<_>>();
    assert_eq!(
        validations,
        ["Validation: FAILED", "Validation: FAILED", "Validation: PASSED"]
    );
}

#[test]
fn test_read_annotated_rejects_missing_summary() {
    let tree = unused_y();
    let info = analyze(&tree);
    let annotated = render(|out| write_annotated(out, &tree, &info));
    let truncated = annotated
        .split("SEMANTIC_SUMMARY:")
        .next()
        .unwrap();

    let err = read_annotated(truncated).unwrap_err();
    insta::assert_snapshot!(err, @"annotated AST has no SEMANTIC_SUMMARY section");
}

#[test]
fn test_read_annotated_reports_tree_lines() {
    let tree = unused_y();
    let info = analyze(&tree);
    let annotated = render(|out| write_annotated(out, &tree, &info))
        .replace("BOOLEAN: TRUE (line 1)", "BOOLEAN: MAYBE (line 1)");

    let err = read_annotated(&annotated).unwrap_err();
    insta::assert_snapshot!(err, @"line 23: invalid boolean literal 'MAYBE'");
}

fn name() -> impl Strategy<Value = String> {
    "[a-e]"
}

fn expression() -> impl Strategy<Value = AstNode> {
    let leaf = prop_oneof![
        name().prop_map(|name| AstNode::identifier(name, Line(1))),
        any::<bool>().prop_map(|value| AstNode::boolean(value, Line(1))),
    ];

    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (
                proptest::sample::select(Connective::ALL.to_vec()),
                inner.clone(),
                inner.clone()
            )
                .prop_map(|(op, lhs, rhs)| AstNode::binary(op, lhs, rhs, Line(1))),
            inner.prop_map(|operand| AstNode::not(operand, Line(1))),
        ]
    })
}

fn program() -> impl Strategy<Value = AstNode> {
    let statement = prop_oneof![
        (name(), expression()).prop_map(|(name, value)| AstNode::assignment(name, value, Line(1))),
        expression().prop_map(|expr| AstNode::expression_stmt(expr, Line(1))),
    ];

    proptest::collection::vec(statement, 0..6).prop_map(|statements| {
        let statements = statements
            .into_iter()
            .enumerate()
            .map(|(index, statement)| relabel(statement, Line(index as u32 + 1)))
            .collect();
        AstNode::program(statements, Line(1))
    })
}

/// Moves every node of a statement onto `line`.
fn relabel(node: AstNode, line: Line) -> AstNode {
    match node {
        AstNode::Identifier(ident) => AstNode::identifier(ident.name, line),
        AstNode::Boolean(literal) => AstNode::boolean(literal.value, line),
        AstNode::Assignment(assignment) => {
            AstNode::assignment(assignment.variable, relabel(*assignment.value, line), line)
        }
        AstNode::Binary(binary) => AstNode::binary(
            binary.op,
            relabel(*binary.lhs, line),
            relabel(*binary.rhs, line),
            line,
        ),
        AstNode::Not(unary) => AstNode::not(relabel(*unary.operand, line), line),
        AstNode::ExpressionStmt(stmt) => AstNode::expression_stmt(relabel(*stmt.expr, line), line),
        other => other,
    }
}

proptest! {
    #[test]
    fn counts_partition_analyzed_tables(tree in program()) {
        let info = analyze(&tree);
        let table = &info.symbol_table;
        let defined_and_used = table.iter().filter(|e| e.defined && e.used).count();

        prop_assert_eq!(
            table.undefined_count() + defined_and_used + table.unused_count(),
            table.len()
        );
        prop_assert_eq!(
            info.error_count(),
            table.undefined_count()
        );
        prop_assert_eq!(info.warning_count(), table.unused_count());
    }

    #[test]
    fn annotated_artifact_preserves_the_program(tree in program()) {
        let info = analyze(&tree);
        let mut out = Vec::new();
        write_annotated(&mut out, &tree, &info)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let text = String::from_utf8(out).map_err(|err| TestCaseError::fail(err.to_string()))?;

        let read = read_annotated(&text).map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(read.analysis_passed, info.is_success());
        prop_assert_eq!(read.errors_found, info.error_count());
        prop_assert_eq!(AstNode::Program(read.program), tree);
    }
}
