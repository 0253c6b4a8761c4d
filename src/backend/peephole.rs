//! Peephole optimization over the generated line stream.
//!
//! One pattern is recognized: a push immediately followed by a pop fuses
//! into a single register move. Matching is textual and only instruction
//! lines participate; a fused move is never reconsidered, so rewriting is
//! greedy left-to-right over non-overlapping pairs. No data-flow analysis
//! happens here.

use crate::backend::Line;

/// Rewrites every adjacent `push X` / `pop R` pair to `mov R, X`.
pub fn fuse_push_pop_pairs(lines: Vec<Line>) -> Vec<Line> {
    let mut output = Vec::with_capacity(lines.len());
    let mut lines = lines.into_iter().peekable();

    while let Some(line) = lines.next() {
        if let Some(operand) = push_operand(&line)
            && let Some(register) = lines.peek().and_then(pop_register)
        {
            output.push(Line::Instruction(format!("mov {register}, {operand}")));
            lines.next();
            continue;
        }

        output.push(line);
    }

    output
}

fn push_operand(line: &Line) -> Option<&str> {
    instruction_operand(line, "push ")
}

fn pop_register(line: &Line) -> Option<&str> {
    instruction_operand(line, "pop ")
}

fn instruction_operand<'line>(line: &'line Line, mnemonic: &str) -> Option<&'line str> {
    let Line::Instruction(text) = line else {
        return None;
    };

    text.strip_prefix(mnemonic).filter(|rest| !rest.is_empty())
}

// ── Tests ────────────────────────────────────────────────────────────────────
