use colored::Colorize;

/// An expression tree. Exactly three kinds of node exist; anything the
/// language grows later becomes a new variant here, never a side channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// An integer literal, stored as text. Constant folding rewrites nodes
    /// by writing new text into this variant, so the stored form is not
    /// guaranteed to re-parse as an integer (the code generator checks).
    NumberLiteral { text: String },
    /// A named variable. There are no declarations; naming a variable
    /// brings it into existence.
    VariableReference { name: String },
    Binary {
        lhs: Box<Expression>,
        operator: BinaryOperatorKind,
        rhs: Box<Expression>,
    },
}

impl Expression {
    pub fn number(text: impl Into<String>) -> Self {
        Self::NumberLiteral { text: text.into() }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::VariableReference { name: name.into() }
    }

    pub fn binary(operator: BinaryOperatorKind, lhs: Expression, rhs: Expression) -> Self {
        Self::Binary {
            lhs: Box::new(lhs),
            operator,
            rhs: Box::new(rhs),
        }
    }
}

impl core::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::NumberLiteral { text } => write!(f, "{}", text.purple()),
            Expression::VariableReference { name } => write!(f, "{}", name.yellow()),
            Expression::Binary { lhs, operator, rhs } => {
                write_operand(f, lhs)?;
                write!(f, " {operator} ")?;
                write_operand(f, rhs)
            }
        }
    }
}

// Compound operands are always parenthesized so the rendering is
// unambiguous without precedence bookkeeping.
fn write_operand(f: &mut std::fmt::Formatter<'_>, operand: &Expression) -> std::fmt::Result {
    if matches!(operand, Expression::Binary { .. }) {
        write!(f, "({operand})")
    } else {
        write!(f, "{operand}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperatorKind {
    Add,      // +
    Subtract, // -
    Multiply, // *
    Divide,   // /
}

impl core::fmt::Display for BinaryOperatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add => write!(f, "+"),
            Self::Subtract => write!(f, "-"),
            Self::Multiply => write!(f, "*"),
            Self::Divide => write!(f, "/"),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(expression: &Expression) -> String {
        strip_ansi_escapes::strip_str(expression.to_string())
    }

    #[test]
    fn leaves_render_bare() {
        assert_eq!(rendered(&Expression::number("42")), "42");
        assert_eq!(rendered(&Expression::variable("total")), "total");
    }

    #[test]
    fn compound_operands_are_parenthesized() {
        let tree = Expression::binary(
            BinaryOperatorKind::Add,
            Expression::variable("x"),
            Expression::binary(
                BinaryOperatorKind::Multiply,
                Expression::number("20"),
                Expression::binary(
                    BinaryOperatorKind::Add,
                    Expression::number("3"),
                    Expression::variable("y"),
                ),
            ),
        );

        assert_eq!(rendered(&tree), "x + (20 * (3 + y))");
    }

    #[test]
    fn every_operator_renders_its_symbol() {
        for (operator, symbol) in [
            (BinaryOperatorKind::Add, "1 + 2"),
            (BinaryOperatorKind::Subtract, "1 - 2"),
            (BinaryOperatorKind::Multiply, "1 * 2"),
            (BinaryOperatorKind::Divide, "1 / 2"),
        ] {
            let tree =
                Expression::binary(operator, Expression::number("1"), Expression::number("2"));
            assert_eq!(rendered(&tree), symbol);
        }
    }
}
