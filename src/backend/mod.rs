//! Assembly generation for 32-bit x86 in NASM syntax.
//!
//! The backend works over a tagged line stream rather than flat text:
//! directives (sections, labels, data definitions) are kept apart from
//! instructions so the peephole pass can rewrite instruction pairs without
//! ever touching layout. [`render`] flattens the stream to the final text.

pub mod assembler;
pub mod codegen;
pub mod peephole;

use itertools::Itertools;

/// One line of generated assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A section header, label, data definition, or blank separator.
    /// Rendered flush left and never rewritten by instruction passes.
    Directive(String),
    /// An executable instruction or comment, rendered indented.
    Instruction(String),
}

impl core::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Line::Directive(text) => f.write_str(text),
            Line::Instruction(text) => write!(f, "    {text}"),
        }
    }
}

/// Renders a line stream to assembly text with a trailing newline.
pub fn render(lines: &[Line]) -> String {
    let mut output = lines.iter().join("\n");
    output.push('\n');
    output
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_render_flush_left_and_instructions_indent() {
        let lines = [
            Line::Directive("section .text".to_string()),
            Line::Instruction("push dword 5".to_string()),
            Line::Directive(String::new()),
            Line::Directive("section .bss".to_string()),
        ];

        assert_eq!(
            render(&lines),
            "section .text\n    push dword 5\n\nsection .bss\n"
        );
    }
}
