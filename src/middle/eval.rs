//! Direct evaluation of expression trees, without generating code.
//!
//! Arithmetic matches the compiled program, not the folder: wrapping 32-bit
//! integers, truncating division, and a hard error on division by zero.

use hashbrown::HashMap;

use crate::frontend::ast::{BinaryOperatorKind, Expression};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A literal whose text does not parse as an `i32`. Folding can produce
    /// these (fractional quotients, out-of-range sums) even though the lexer
    /// cannot.
    InvalidLiteral(String),
    /// A variable reference with no entry in the bindings map.
    UnboundVariable(String),
    DivisionByZero,
}

impl core::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::InvalidLiteral(text) => {
                write!(f, "literal `{text}` is not a 32-bit integer")
            }
            EvalError::UnboundVariable(name) => {
                write!(f, "variable `{name}` has no value")
            }
            EvalError::DivisionByZero => f.write_str("division by zero"),
        }
    }
}

impl std::error::Error for EvalError {}

/// Evaluates a tree with the given variable bindings, using the same 32-bit
/// wrapping arithmetic the generated code performs at runtime.
pub fn evaluate(
    expression: &Expression,
    bindings: &HashMap<String, i32>,
) -> Result<i32, EvalError> {
    match expression {
        Expression::NumberLiteral { text } => text
            .parse()
            .map_err(|_| EvalError::InvalidLiteral(text.clone())),
        Expression::VariableReference { name } => bindings
            .get(name)
            .copied()
            .ok_or_else(|| EvalError::UnboundVariable(name.clone())),
        Expression::Binary { lhs, operator, rhs } => {
            let left = evaluate(lhs, bindings)?;
            let right = evaluate(rhs, bindings)?;

            match operator {
                BinaryOperatorKind::Add => Ok(left.wrapping_add(right)),
                BinaryOperatorKind::Subtract => Ok(left.wrapping_sub(right)),
                BinaryOperatorKind::Multiply => Ok(left.wrapping_mul(right)),
                BinaryOperatorKind::Divide => {
                    if right == 0 {
                        Err(EvalError::DivisionByZero)
                    } else {
                        Ok(left.wrapping_div(right))
                    }
                }
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
