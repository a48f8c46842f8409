use std::fmt;
use std::str::FromStr;

use plc_core::Line;

/// Binary logical connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connective {
    And,
    Or,
    Xor,
    Xnor,
    Implies,
    Iff,
    Equiv,
}

impl Connective {
    pub const ALL: [Connective; 7] = [
        Connective::And,
        Connective::Or,
        Connective::Xor,
        Connective::Xnor,
        Connective::Implies,
        Connective::Iff,
        Connective::Equiv,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
            Connective::Xor => "XOR",
            Connective::Xnor => "XNOR",
            Connective::Implies => "IMPLIES",
            Connective::Iff => "IFF",
            Connective::Equiv => "EQUIV",
        }
    }

    /// Truth table of the connective.
    pub fn apply(self, lhs: bool, rhs: bool) -> bool {
        match self {
            Connective::And => lhs && rhs,
            Connective::Or => lhs || rhs,
            Connective::Xor => lhs != rhs,
            Connective::Xnor | Connective::Iff | Connective::Equiv => lhs == rhs,
            Connective::Implies => !lhs || rhs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantifierKind {
    Exists,
    Forall,
}

impl QuantifierKind {
    pub fn keyword(self) -> &'static str {
        match self {
            QuantifierKind::Exists => "EXISTS",
            QuantifierKind::Forall => "FORALL",
        }
    }
}

/// Discriminant of an [`AstNode`], also the keyword a node is encoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Identifier,
    Boolean,
    Assignment,
    Binary(Connective),
    Not,
    Quantifier(QuantifierKind),
    Program,
    ExpressionStmt,
}

impl NodeKind {
    pub fn keyword(self) -> &'static str {
        match self {
            NodeKind::Identifier => "IDENTIFIER",
            NodeKind::Boolean => "BOOLEAN",
            NodeKind::Assignment => "ASSIGNMENT",
            NodeKind::Binary(op) => op.keyword(),
            NodeKind::Not => "NOT",
            NodeKind::Quantifier(kind) => kind.keyword(),
            NodeKind::Program => "PROGRAM",
            NodeKind::ExpressionStmt => "EXPRESSION_STMT",
        }
    }

    /// Whether the node header carries a literal payload (`KIND: payload`).
    pub fn has_payload(self) -> bool {
        matches!(self, NodeKind::Identifier | NodeKind::Boolean)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl FromStr for NodeKind {
    type Err = UnknownKind;

    fn from_str(keyword: &str) -> Result<Self, Self::Err> {
        let kind = match keyword {
            "IDENTIFIER" => NodeKind::Identifier,
            "BOOLEAN" => NodeKind::Boolean,
            "ASSIGNMENT" => NodeKind::Assignment,
            "NOT" => NodeKind::Not,
            "EXISTS" => NodeKind::Quantifier(QuantifierKind::Exists),
            "FORALL" => NodeKind::Quantifier(QuantifierKind::Forall),
            "PROGRAM" => NodeKind::Program,
            "EXPRESSION_STMT" => NodeKind::ExpressionStmt,
            other => {
                return Connective::ALL
                    .into_iter()
                    .find(|op| op.keyword() == other)
                    .map(NodeKind::Binary)
                    .ok_or_else(|| UnknownKind(other.to_string()));
            }
        };

        Ok(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub name: String,
    pub line: Line,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanLiteral {
    pub value: bool,
    pub line: Line,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub variable: String,
    pub value: Box<AstNode>,
    pub line: Line,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binary {
    pub op: Connective,
    pub lhs: Box<AstNode>,
    pub rhs: Box<AstNode>,
    pub line: Line,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unary {
    pub operand: Box<AstNode>,
    pub line: Line,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantifier {
    pub kind: QuantifierKind,
    pub variable: String,
    pub body: Box<AstNode>,
    pub line: Line,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub statements: Vec<AstNode>,
    pub line: Line,
}

impl Program {
    pub fn new(line: Line) -> Self {
        Self {
            statements: Vec::new(),
            line,
        }
    }

    /// Appends a statement; statement order is program order.
    pub fn push(&mut self, statement: AstNode) {
        self.statements.push(statement);
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionStmt {
    pub expr: Box<AstNode>,
    pub line: Line,
}

/// A node of the syntax tree. Every node exclusively owns its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
    Identifier(Identifier),
    Boolean(BooleanLiteral),
    Assignment(Assignment),
    Binary(Binary),
    Not(Unary),
    Quantifier(Quantifier),
    Program(Program),
    ExpressionStmt(ExpressionStmt),
}

impl AstNode {
    pub fn identifier(name: impl Into<String>, line: Line) -> Self {
        AstNode::Identifier(Identifier {
            name: name.into(),
            line,
        })
    }

    pub fn boolean(value: bool, line: Line) -> Self {
        AstNode::Boolean(BooleanLiteral { value, line })
    }

    pub fn assignment(variable: impl Into<String>, value: AstNode, line: Line) -> Self {
        AstNode::Assignment(Assignment {
            variable: variable.into(),
            value: Box::new(value),
            line,
        })
    }

    pub fn binary(op: Connective, lhs: AstNode, rhs: AstNode, line: Line) -> Self {
        AstNode::Binary(Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            line,
        })
    }

    pub fn not(operand: AstNode, line: Line) -> Self {
        AstNode::Not(Unary {
            operand: Box::new(operand),
            line,
        })
    }

    pub fn quantifier(
        kind: QuantifierKind,
        variable: impl Into<String>,
        body: AstNode,
        line: Line,
    ) -> Self {
        AstNode::Quantifier(Quantifier {
            kind,
            variable: variable.into(),
            body: Box::new(body),
            line,
        })
    }

    pub fn program(statements: Vec<AstNode>, line: Line) -> Self {
        AstNode::Program(Program { statements, line })
    }

    pub fn expression_stmt(expr: AstNode, line: Line) -> Self {
        AstNode::ExpressionStmt(ExpressionStmt {
            expr: Box::new(expr),
            line,
        })
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            AstNode::Identifier(_) => NodeKind::Identifier,
            AstNode::Boolean(_) => NodeKind::Boolean,
            AstNode::Assignment(_) => NodeKind::Assignment,
            AstNode::Binary(binary) => NodeKind::Binary(binary.op),
            AstNode::Not(_) => NodeKind::Not,
            AstNode::Quantifier(quantifier) => NodeKind::Quantifier(quantifier.kind),
            AstNode::Program(_) => NodeKind::Program,
            AstNode::ExpressionStmt(_) => NodeKind::ExpressionStmt,
        }
    }

    pub fn line(&self) -> Line {
        match self {
            AstNode::Identifier(ident) => ident.line,
            AstNode::Boolean(literal) => literal.line,
            AstNode::Assignment(assignment) => assignment.line,
            AstNode::Binary(binary) => binary.line,
            AstNode::Not(unary) => unary.line,
            AstNode::Quantifier(quantifier) => quantifier.line,
            AstNode::Program(program) => program.line,
            AstNode::ExpressionStmt(stmt) => stmt.line,
        }
    }

    pub fn as_program(&self) -> Option<&Program> {
        match self {
            AstNode::Program(program) => Some(program),
            _ => None,
        }
    }

    pub fn accept<V>(&self, visitor: &mut V)
    where
        V: AstVisitor,
    {
        traverse_tree(self, visitor);
    }

    pub fn node_count(&self) -> usize {
        let mut counter = NodeCounter::default();
        self.accept(&mut counter);
        counter.count
    }
}

/// Pre-order visitor over a tree. Children are walked after their parent's
/// `visit_*` call returns.
pub trait AstVisitor {
    fn visit_identifier(&mut self, _ident: &Identifier) {}
    fn visit_boolean(&mut self, _literal: &BooleanLiteral) {}
    fn visit_assignment(&mut self, _assignment: &Assignment) {}
    fn visit_binary(&mut self, _binary: &Binary) {}
    fn visit_not(&mut self, _unary: &Unary) {}
    fn visit_quantifier(&mut self, _quantifier: &Quantifier) {}
    fn visit_program(&mut self, _program: &Program) {}
    fn visit_expression_stmt(&mut self, _stmt: &ExpressionStmt) {}
}

fn traverse_tree<V>(node: &AstNode, visitor: &mut V)
where
    V: AstVisitor,
{
    match node {
        AstNode::Identifier(ident) => visitor.visit_identifier(ident),
        AstNode::Boolean(literal) => visitor.visit_boolean(literal),
        AstNode::Assignment(assignment) => {
            visitor.visit_assignment(assignment);
            traverse_tree(&assignment.value, visitor);
        }
        AstNode::Binary(binary) => {
            visitor.visit_binary(binary);
            traverse_tree(&binary.lhs, visitor);
            traverse_tree(&binary.rhs, visitor);
        }
        AstNode::Not(unary) => {
            visitor.visit_not(unary);
            traverse_tree(&unary.operand, visitor);
        }
        AstNode::Quantifier(quantifier) => {
            visitor.visit_quantifier(quantifier);
            traverse_tree(&quantifier.body, visitor);
        }
        AstNode::Program(program) => {
            visitor.visit_program(program);
            for statement in &program.statements {
                traverse_tree(statement, visitor);
            }
        }
        AstNode::ExpressionStmt(stmt) => {
            visitor.visit_expression_stmt(stmt);
            traverse_tree(&stmt.expr, visitor);
        }
    }
}

#[derive(Debug, Default)]
struct NodeCounter {
    count: usize,
}

impl AstVisitor for NodeCounter {
    fn visit_identifier(&mut self, _: &Identifier) {
        self.count += 1;
    }

    fn visit_boolean(&mut self, _: &BooleanLiteral) {
        self.count += 1;
    }

    fn visit_assignment(&mut self, _: &Assignment) {
        self.count += 1;
    }

    fn visit_binary(&mut self, _: &Binary) {
        self.count += 1;
    }

    fn visit_not(&mut self, _: &Unary) {
        self.count += 1;
    }

    fn visit_quantifier(&mut self, _: &Quantifier) {
        self.count += 1;
    }

    fn visit_program(&mut self, _: &Program) {
        self.count += 1;
    }

    fn visit_expression_stmt(&mut self, _: &ExpressionStmt) {
        self.count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_round_trip() {
        let kinds = [
            NodeKind::Identifier,
            NodeKind::Boolean,
            NodeKind::Assignment,
            NodeKind::Not,
            NodeKind::Quantifier(QuantifierKind::Exists),
            NodeKind::Quantifier(QuantifierKind::Forall),
            NodeKind::Program,
            NodeKind::ExpressionStmt,
        ]
        .into_iter()
        .chain(Connective::ALL.into_iter().map(NodeKind::Binary));

        for kind in kinds {
            assert_eq!(kind.keyword().parse::<NodeKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_keywords_match_exactly() {
        // substrings of real keywords must not classify as those keywords
        assert!("ORX".parse::<NodeKind>().is_err());
        assert!("XNO".parse::<NodeKind>().is_err());
        assert!("program".parse::<NodeKind>().is_err());
    }

    #[test]
    fn test_connective_truth_tables() {
        let table = [(false, false), (false, true), (true, false), (true, true)];
        let expected = [
            (Connective::And, [false, false, false, true]),
            (Connective::Or, [false, true, true, true]),
            (Connective::Xor, [false, true, true, false]),
            (Connective::Xnor, [true, false, false, true]),
            (Connective::Implies, [true, true, false, true]),
            (Connective::Iff, [true, false, false, true]),
            (Connective::Equiv, [true, false, false, true]),
        ];

        for (op, results) in expected {
            for ((lhs, rhs), result) in table.into_iter().zip(results) {
                assert_eq!(op.apply(lhs, rhs), result, "{lhs} {} {rhs}", op.keyword());
            }
        }
    }

    #[test]
    fn test_program_keeps_insertion_order() {
        let mut program = Program::new(Line(1));
        for index in 0..25 {
            program.push(AstNode::identifier(format!("v{index}"), Line(index + 1)));
        }

        assert_eq!(program.len(), 25);
        let names = program
            .statements
            .iter()
            .map(|stmt| match stmt {
                AstNode::Identifier(ident) => ident.name.clone(),
                other => panic!("unexpected node {other:?}"),
            })
            .collect::<Vec<_>>();
        assert_eq!(names.first().map(String::as_str), Some("v0"));
        assert_eq!(names.last().map(String::as_str), Some("v24"));
    }

    #[test]
    fn test_node_count_visits_every_node() {
        let tree = AstNode::program(
            vec![
                AstNode::assignment("B", AstNode::boolean(true, Line(1)), Line(1)),
                AstNode::expression_stmt(
                    AstNode::not(
                        AstNode::quantifier(
                            QuantifierKind::Forall,
                            "x",
                            AstNode::identifier("x", Line(2)),
                            Line(2),
                        ),
                        Line(2),
                    ),
                    Line(2),
                ),
            ],
            Line(1),
        );

        assert_eq!(tree.node_count(), 7);
    }
}
