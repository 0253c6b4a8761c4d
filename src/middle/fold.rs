//! Constant folding over expression trees.
//!
//! Folding is a pure bottom-up rewrite: an operation over two literal
//! operands is computed outright, and a handful of 0/1 algebraic identities
//! collapse a node to its surviving operand. Arithmetic here is carried out
//! in `f64` while compiled programs run in wrapping 32-bit integers; the two
//! agree everywhere in 32-bit range but can part ways past it, and folded
//! division is real division while `idiv` truncates. Both divergences are
//! longstanding behavior, pinned by tests rather than corrected: a fold
//! result the target cannot represent is rejected later, at generation time.

use crate::frontend::ast::{BinaryOperatorKind, Expression};

/// Rewrites a tree bottom-up, computing constant subtrees and applying the
/// 0/1 identities. Pure and total: non-constant structure is preserved, and
/// a fully folded tree is a fixed point.
pub fn fold_constants(expression: Expression) -> Expression {
    match expression {
        Expression::NumberLiteral { .. } | Expression::VariableReference { .. } => expression,
        Expression::Binary { lhs, operator, rhs } => {
            let lhs = fold_constants(*lhs);
            let rhs = fold_constants(*rhs);

            let lhs_value = constant_value(&lhs);
            let rhs_value = constant_value(&rhs);

            if let (Some(left), Some(right)) = (lhs_value, rhs_value) {
                let result = match operator {
                    BinaryOperatorKind::Add => left + right,
                    BinaryOperatorKind::Subtract => left - right,
                    BinaryOperatorKind::Multiply => left * right,
                    BinaryOperatorKind::Divide => left / right,
                };

                return Expression::number(result.to_string());
            }

            // First match wins; each identity hands back a child that is
            // already folded.
            if operator == BinaryOperatorKind::Add && is_constant(lhs_value, 0.0) {
                return rhs;
            }
            if operator == BinaryOperatorKind::Add && is_constant(rhs_value, 0.0) {
                return lhs;
            }
            if operator == BinaryOperatorKind::Multiply && is_constant(lhs_value, 1.0) {
                return rhs;
            }
            if operator == BinaryOperatorKind::Multiply && is_constant(rhs_value, 1.0) {
                return lhs;
            }
            if operator == BinaryOperatorKind::Subtract && is_constant(rhs_value, 0.0) {
                return lhs;
            }
            if operator == BinaryOperatorKind::Divide && is_constant(rhs_value, 1.0) {
                return lhs;
            }

            Expression::Binary {
                lhs: Box::new(lhs),
                operator,
                rhs: Box::new(rhs),
            }
        }
    }
}

/// The numeric value of a literal node, or `None` for anything else.
/// Literal text that does not parse as a float (which neither the lexer nor
/// the folder produces) is treated as non-constant.
fn constant_value(expression: &Expression) -> Option<f64> {
    match expression {
        Expression::NumberLiteral { text } => text.parse().ok(),
        _ => None,
    }
}

fn is_constant(value: Option<f64>, target: f64) -> bool {
    value.is_some_and(|value| value == target)
}

// ── Tests ────────────────────────────────────────────────────────────────────
