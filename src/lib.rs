//! A compiler from infix arithmetic expressions to 32-bit x86 assembly in
//! NASM syntax.
//!
//! The pipeline is tokenize, parse, fold constants, generate stack-machine
//! code, then fuse redundant push/pop pairs. [`compile`] runs the whole
//! thing over a [`frontend::SourceFile`] and returns the assembly text.

pub mod backend;
pub mod frontend;
pub mod middle;

use crate::{
    backend::codegen::{self, CodegenError},
    frontend::{SourceFile, SyntaxError, parser::Parser},
    middle::fold,
};

/// Switches for the optional pipeline stages. Both default to on.
#[derive(Debug, Clone, Copy)]
pub struct CompileOptions {
    pub fold: bool,
    pub peephole: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            fold: true,
            peephole: true,
        }
    }
}

#[derive(Debug)]
pub enum CompileError {
    Syntax(SyntaxError),
    Codegen(CodegenError),
}

impl From<SyntaxError> for CompileError {
    fn from(error: SyntaxError) -> Self {
        CompileError::Syntax(error)
    }
}

impl From<CodegenError> for CompileError {
    fn from(error: CodegenError) -> Self {
        CompileError::Codegen(error)
    }
}

impl core::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Syntax(error) => error.fmt(f),
            CompileError::Codegen(error) => error.fmt(f),
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Syntax(error) => Some(error),
            CompileError::Codegen(error) => Some(error),
        }
    }
}

/// Compiles a source expression to assembly text.
pub fn compile(source: &SourceFile, options: CompileOptions) -> Result<String, CompileError> {
    let mut expression = Parser::parse_expression(source)?;

    if options.fold {
        expression = fold::fold_constants(expression);
    }

    let program = codegen::generate(&expression)?;

    let lines = if options.peephole {
        backend::peephole::fuse_push_pop_pairs(program.lines)
    } else {
        program.lines
    };

    Ok(backend::render(&lines))
}
