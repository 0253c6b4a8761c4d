use crate::backend::Line;

/// Collects generated lines in emission order.
#[derive(Debug, Default)]
pub struct Assembler {
    lines: Vec<Line>,
}

impl Assembler {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    pub fn into_lines(self) -> Vec<Line> {
        self.lines
    }

    /// A flush-left line: section header, label, or data definition.
    pub fn directive(&mut self, text: impl Into<String>) {
        self.lines.push(Line::Directive(text.into()));
    }

    /// An indented instruction line.
    pub fn emit(&mut self, text: impl Into<String>) {
        self.lines.push(Line::Instruction(text.into()));
    }

    pub fn comment(&mut self, comment: impl AsRef<str>) {
        self.emit(format!("; {}", comment.as_ref()));
    }

    /// A blank separator between sections.
    pub fn blank(&mut self) {
        self.directive("");
    }
}

/// The registers the stack-machine evaluator touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Register {
    Eax, // left operand and result
    Ebx, // right operand
    Edx, // zeroed before idiv
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_render_in_lowercase() {
        assert_eq!(Register::Eax.to_string(), "eax");
        assert_eq!(Register::Ebx.to_string(), "ebx");
        assert_eq!(Register::Edx.to_string(), "edx");
    }

    #[test]
    fn helpers_tag_lines_by_class() {
        let mut asm = Assembler::new();
        asm.directive("section .text");
        asm.emit("push dword 5");
        asm.comment("x + y");
        asm.blank();

        assert_eq!(
            asm.into_lines(),
            vec![
                Line::Directive("section .text".to_string()),
                Line::Instruction("push dword 5".to_string()),
                Line::Instruction("; x + y".to_string()),
                Line::Directive(String::new()),
            ]
        );
    }
}
