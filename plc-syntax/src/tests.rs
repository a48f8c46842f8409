use plc_core::Line;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use crate::{AstNode, Connective, QuantifierKind, decode, encode_to_string};

/// Mostly identifier-class names, plus arbitrary strings that need quoting.
fn name() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[A-Za-z_][A-Za-z0-9_]{0,6}",
        1 => any::<String>(),
    ]
}

fn line() -> impl Strategy<Value = Line> {
    (1u32..500).prop_map(Line)
}

fn expression() -> impl Strategy<Value = AstNode> {
    let leaf = prop_oneof![
        (name(), line()).prop_map(|(name, line)| AstNode::identifier(name, line)),
        (any::<bool>(), line()).prop_map(|(value, line)| AstNode::boolean(value, line)),
    ];

    leaf.prop_recursive(6, 64, 2, |inner| {
        let quantifier_kind =
            prop_oneof![Just(QuantifierKind::Exists), Just(QuantifierKind::Forall)];

        prop_oneof![
            (
                proptest::sample::select(Connective::ALL.to_vec()),
                inner.clone(),
                inner.clone(),
                line()
            )
                .prop_map(|(op, lhs, rhs, line)| AstNode::binary(op, lhs, rhs, line)),
            (inner.clone(), line()).prop_map(|(operand, line)| AstNode::not(operand, line)),
            (quantifier_kind, name(), inner, line()).prop_map(|(kind, variable, body, line)| {
                AstNode::quantifier(kind, variable, body, line)
            }),
        ]
    })
}

fn statement() -> impl Strategy<Value = AstNode> {
    prop_oneof![
        (name(), expression(), line())
            .prop_map(|(variable, value, line)| AstNode::assignment(variable, value, line)),
        (expression(), line()).prop_map(|(expr, line)| AstNode::expression_stmt(expr, line)),
    ]
}

fn program() -> impl Strategy<Value = AstNode> {
    (proptest::collection::vec(statement(), 0..8), line())
        .prop_map(|(statements, line)| AstNode::program(statements, line))
}

proptest! {
    #[test]
    fn decode_inverts_encode_for_programs(tree in program()) {
        let text = encode_to_string(&tree);
        let decoded = decode(&text).map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(decoded, tree);
    }

    #[test]
    fn decode_inverts_encode_for_bare_expressions(tree in expression()) {
        let text = encode_to_string(&tree);
        let decoded = decode(&text).map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(decoded, tree);
    }
}
