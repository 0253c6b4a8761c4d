//! Passes over the parsed expression tree: constant folding (the only
//! optimization at this level) and direct evaluation without code
//! generation.

pub mod eval;
pub mod fold;
