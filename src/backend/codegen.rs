//! Stack-machine code generation.
//!
//! Every node compiles to code that nets exactly one new value on the
//! runtime stack: leaves push directly, and a binary node pops its two
//! operands and pushes the result. The generated program prompts for each
//! variable, evaluates the tree, prints the result, and returns.

use hashbrown::HashSet;

use crate::{
    backend::{
        Line,
        assembler::{Assembler, Register},
    },
    frontend::ast::{BinaryOperatorKind, Expression},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodegenError {
    /// A literal whose value is not an exact signed 32-bit integer. Folding
    /// can produce these: fractional quotients, sums past the 32-bit range,
    /// and the infinities of a folded division by zero.
    UnrepresentableLiteral(String),
}

impl core::fmt::Display for CodegenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodegenError::UnrepresentableLiteral(text) => {
                write!(f, "literal `{text}` is not representable as a 32-bit integer")
            }
        }
    }
}

impl std::error::Error for CodegenError {}

/// A generated program: the assembly line stream plus the variables it
/// prompts for, in prompt order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub lines: Vec<Line>,
    pub variables: Vec<String>,
}

/// Collects the distinct variables of a tree in first-occurrence order,
/// visiting left operands before right. Prompts, prompt strings, and
/// storage cells all follow this order.
pub fn discover_variables(expression: &Expression) -> Vec<String> {
    fn walk(expression: &Expression, seen: &mut HashSet<String>, order: &mut Vec<String>) {
        match expression {
            Expression::NumberLiteral { .. } => {}
            Expression::VariableReference { name } => {
                if seen.insert(name.clone()) {
                    order.push(name.clone());
                }
            }
            Expression::Binary { lhs, rhs, .. } => {
                walk(lhs, seen, order);
                walk(rhs, seen, order);
            }
        }
    }

    let mut seen = HashSet::new();
    let mut order = Vec::new();
    walk(expression, &mut seen, &mut order);

    order
}

/// Generates the complete program for a tree: scaffold, one prompt-and-read
/// block per variable, the expression evaluation, the result printout, and
/// the data sections.
pub fn generate(expression: &Expression) -> Result<Program, CodegenError> {
    let variables = discover_variables(expression);
    let mut asm = Assembler::new();

    asm.directive("section .text");
    asm.emit("global _main");
    asm.emit("extern _printf");
    asm.emit("extern _scanf");
    asm.directive("_main:");

    for name in &variables {
        asm.emit(format!("push {name}@prompt"));
        asm.emit("call _printf");
        asm.emit(format!("pop {}", Register::Ebx));
        asm.emit(format!("push {name}"));
        asm.emit("push scanf_format");
        asm.emit("call _scanf");
        asm.emit(format!("pop {}", Register::Ebx));
        asm.emit(format!("pop {}", Register::Ebx));
    }

    asm.comment(strip_ansi_escapes::strip_str(expression.to_string()));
    compile_expression(&mut asm, expression)?;

    // The expression result is still on the stack: it is printf's second
    // argument.
    asm.emit("push message");
    asm.emit("call _printf");
    asm.emit(format!("pop {}", Register::Ebx));
    asm.emit(format!("pop {}", Register::Ebx));
    asm.emit("ret");

    asm.blank();
    asm.directive("section .rdata");
    asm.directive("message: db 'Result is %d', 10, 0");
    asm.directive("scanf_format: db '%d', 0");
    for name in &variables {
        asm.directive(format!("{name}@prompt: db 'Input {name}: ', 0"));
    }

    asm.blank();
    asm.directive("section .bss");
    for name in &variables {
        asm.directive(format!("{name}: resd 1"));
    }

    Ok(Program {
        lines: asm.into_lines(),
        variables,
    })
}

fn compile_expression(asm: &mut Assembler, expression: &Expression) -> Result<(), CodegenError> {
    match expression {
        Expression::NumberLiteral { text } => {
            asm.emit(format!("push dword {}", literal_value(text)?));
        }
        Expression::VariableReference { name } => {
            asm.emit(format!("push dword [{name}]"));
        }
        Expression::Binary { lhs, operator, rhs } => {
            compile_expression(asm, lhs)?;
            compile_expression(asm, rhs)?;

            // Right was pushed last, so it pops first.
            asm.emit(format!("pop {}", Register::Ebx));
            asm.emit(format!("pop {}", Register::Eax));

            match operator {
                BinaryOperatorKind::Add => {
                    asm.emit(format!("add {}, {}", Register::Eax, Register::Ebx));
                }
                BinaryOperatorKind::Subtract => {
                    asm.emit(format!("sub {}, {}", Register::Eax, Register::Ebx));
                }
                BinaryOperatorKind::Multiply => {
                    asm.emit(format!("imul {}, {}", Register::Eax, Register::Ebx));
                }
                BinaryOperatorKind::Divide => {
                    asm.emit(format!("mov {}, 0", Register::Edx));
                    asm.emit(format!("idiv {}", Register::Ebx));
                }
            }

            asm.emit(format!("push {}", Register::Eax));
        }
    }

    Ok(())
}

/// Re-parses literal text and checks it denotes an exact `i32`. The folder
/// writes float results back as text, so values like `0.5`, `inf`, or
/// `4000000000` can reach here even though the lexer only produces digits.
fn literal_value(text: &str) -> Result<i32, CodegenError> {
    let value: f64 = text
        .parse()
        .map_err(|_| CodegenError::UnrepresentableLiteral(text.to_string()))?;

    if value.fract() != 0.0 || value < i32::MIN as f64 || value > i32::MAX as f64 {
        return Err(CodegenError::UnrepresentableLiteral(text.to_string()));
    }

    Ok(value as i32)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::render,
        frontend::{SourceFile, SourceFileOrigin, parser::Parser},
    };

    fn parse(text: &str) -> Expression {
        let source = SourceFile {
            contents: text.to_string(),
            origin: SourceFileOrigin::Memory,
        };

        Parser::parse_expression(&source).unwrap()
    }

    fn evaluation_lines(expression: &Expression) -> Vec<Line> {
        let mut asm = Assembler::new();
        compile_expression(&mut asm, expression).unwrap();
        asm.into_lines()
    }

    fn assert_ordered(text: &str, needles: &[&str]) {
        let mut from = 0;
        for needle in needles {
            match text[from..].find(needle) {
                Some(position) => from += position + needle.len(),
                None => panic!("`{needle}` missing or out of order in:\n{text}"),
            }
        }
    }

    #[test]
    fn variables_are_discovered_in_first_occurrence_order() {
        assert_eq!(discover_variables(&parse("x + 20 * (3 + y)")), ["x", "y"]);
        assert_eq!(discover_variables(&parse("b * a + b")), ["b", "a"]);
    }

    #[test]
    fn repeated_variables_are_discovered_once() {
        assert_eq!(discover_variables(&parse("x + y * x + y")), ["x", "y"]);
    }

    #[test]
    fn literal_only_trees_discover_nothing() {
        assert_eq!(discover_variables(&parse("1 + 2 * 3")), Vec::<String>::new());
    }

    #[test]
    fn every_node_nets_one_pushed_value() {
        fn stack_effect(lines: &[Line]) -> i32 {
            lines
                .iter()
                .map(|line| match line {
                    Line::Instruction(text) if text.starts_with("push ") => 1,
                    Line::Instruction(text) if text.starts_with("pop ") => -1,
                    _ => 0,
                })
                .sum()
        }

        for text in ["7", "x", "x + y", "x + 20 * (3 + y)", "(a + b) / (c - d)"] {
            assert_eq!(stack_effect(&evaluation_lines(&parse(text))), 1, "for `{text}`");
        }
    }

    #[test]
    fn binary_nodes_pop_right_then_left() {
        assert_eq!(
            evaluation_lines(&parse("x - y")),
            vec![
                Line::Instruction("push dword [x]".to_string()),
                Line::Instruction("push dword [y]".to_string()),
                Line::Instruction("pop ebx".to_string()),
                Line::Instruction("pop eax".to_string()),
                Line::Instruction("sub eax, ebx".to_string()),
                Line::Instruction("push eax".to_string()),
            ]
        );
    }

    #[test]
    fn division_zeroes_edx_before_idiv() {
        assert_eq!(
            evaluation_lines(&parse("x / y")),
            vec![
                Line::Instruction("push dword [x]".to_string()),
                Line::Instruction("push dword [y]".to_string()),
                Line::Instruction("pop ebx".to_string()),
                Line::Instruction("pop eax".to_string()),
                Line::Instruction("mov edx, 0".to_string()),
                Line::Instruction("idiv ebx".to_string()),
                Line::Instruction("push eax".to_string()),
            ]
        );
    }

    #[test]
    fn literals_are_emitted_as_their_parsed_value() {
        assert_eq!(
            evaluation_lines(&parse("7")),
            vec![Line::Instruction("push dword 7".to_string())]
        );
        assert_eq!(
            evaluation_lines(&Expression::number("75")),
            vec![Line::Instruction("push dword 75".to_string())]
        );
    }

    #[test]
    fn the_32_bit_boundaries_are_representable() {
        // The lexer never produces a negative literal, but the folder can.
        assert_eq!(
            evaluation_lines(&Expression::number("2147483647")),
            vec![Line::Instruction("push dword 2147483647".to_string())]
        );
        assert_eq!(
            evaluation_lines(&Expression::number("-2147483648")),
            vec![Line::Instruction("push dword -2147483648".to_string())]
        );
    }

    #[test]
    fn a_negative_zero_literal_is_tolerated() {
        assert_eq!(
            evaluation_lines(&Expression::number("-0")),
            vec![Line::Instruction("push dword 0".to_string())]
        );
    }

    #[test]
    fn non_integral_literals_are_rejected() {
        let texts = [
            "0.5",
            "2.5",
            "inf",
            "-inf",
            "NaN",
            "4000000000",
            "9999999999",
            "-9999999999",
            "",
        ];

        for text in texts {
            assert_eq!(
                generate(&Expression::number(text)),
                Err(CodegenError::UnrepresentableLiteral(text.to_string())),
                "expected `{text}` to be rejected"
            );
        }
    }

    #[test]
    fn programs_prompt_for_each_variable_in_discovery_order() {
        for text in ["x + y", "x + 20 * (3 + y)"] {
            let program = generate(&parse(text)).unwrap();

            assert_eq!(program.variables, ["x", "y"]);
            assert_ordered(
                &render(&program.lines),
                &[
                    "push x@prompt",
                    "call _scanf",
                    "push y@prompt",
                    "call _scanf",
                    "x@prompt: db 'Input x: ', 0",
                    "y@prompt: db 'Input y: ', 0",
                    "x: resd 1",
                    "y: resd 1",
                ],
            );
        }
    }

    #[test]
    fn the_scaffold_precedes_prompts_and_data_sections_follow() {
        let program = generate(&parse("x + 1")).unwrap();

        assert_ordered(
            &render(&program.lines),
            &[
                "section .text",
                "global _main",
                "extern _printf",
                "extern _scanf",
                "_main:",
                "push x@prompt",
                "; x + 1",
                "push dword [x]",
                "push message",
                "ret",
                "section .rdata",
                "message: db 'Result is %d', 10, 0",
                "scanf_format: db '%d', 0",
                "section .bss",
            ],
        );
    }

    #[test]
    fn the_comment_line_carries_the_plain_infix_rendering() {
        let program = generate(&parse("x + 20 * (3 + y)")).unwrap();

        assert!(
            program
                .lines
                .contains(&Line::Instruction("; x + (20 * (3 + y))".to_string()))
        );
    }

    #[test]
    fn zero_variable_programs_skip_prompts_but_keep_every_phase() {
        let program = generate(&Expression::number("75")).unwrap();

        assert_eq!(program.variables, Vec::<String>::new());

        let text = render(&program.lines);
        assert!(!text.contains("call _scanf"));
        assert!(!text.contains("@prompt"));
        assert_ordered(
            &text,
            &[
                "section .text",
                "push dword 75",
                "push message",
                "section .rdata",
                "scanf_format: db '%d', 0",
                "section .bss",
            ],
        );
    }
}
