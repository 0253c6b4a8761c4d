use std::{io::Write, path::PathBuf};

use clap::{CommandFactory, Parser as ClapParser, error::ErrorKind};
use colored::Colorize;
use hashbrown::HashMap;
use indoc::indoc;

use rillc::{
    backend::{self, codegen, peephole},
    frontend::{SourceFile, SourceFileOrigin, SyntaxError, ast::Expression, parser::Parser},
    middle::{eval, fold},
};

/// Compiles an infix arithmetic expression to 32-bit x86 assembly in NASM
/// syntax.
#[derive(Debug, ClapParser)]
#[command(version, about, long_about = None, after_help = indoc! {"
    Examples:
      rillc 'x + 20 * (3 + y)'
      rillc -f input.rill -o out.asm
      rillc --eval '10 + 20 * (3 + 1)'
"})]
pub struct Args {
    /// The expression to compile.
    expression: Option<String>,

    /// Read the expression from a file instead.
    #[arg(short, long, conflicts_with = "expression")]
    file: Option<PathBuf>,

    /// Write the assembly to a file instead of standard output.
    #[arg(short, long, conflicts_with = "eval")]
    output: Option<PathBuf>,

    /// Evaluate the expression directly instead of compiling it.
    #[arg(long)]
    eval: bool,

    /// Skip constant folding.
    #[arg(long)]
    no_fold: bool,

    /// Skip the push/pop fusion pass.
    #[arg(long)]
    no_peephole: bool,

    /// Print the expression tree to standard error after folding.
    #[arg(long)]
    dump_ast: bool,
}

fn main() {
    let args = Args::parse();
    let source = read_source(&args);

    let expression = match Parser::parse_expression(&source) {
        Ok(expression) => expression,
        Err(error) => report_fatal_syntax_error(&source, &error),
    };

    let expression = if args.no_fold {
        expression
    } else {
        fold::fold_constants(expression)
    };

    if args.dump_ast {
        eprintln!("{expression}");
    }

    if args.eval {
        run_evaluator(&expression);
        return;
    }

    let program = match codegen::generate(&expression) {
        Ok(program) => program,
        Err(error) => fatal(&error.to_string()),
    };

    let lines = if args.no_peephole {
        program.lines
    } else {
        peephole::fuse_push_pop_pairs(program.lines)
    };

    let assembly = backend::render(&lines);

    match &args.output {
        Some(path) => std::fs::write(path, assembly).expect("Failed to write output file"),
        None => print!("{assembly}"),
    }
}

fn read_source(args: &Args) -> SourceFile {
    if let Some(path) = &args.file {
        if !path.exists() {
            Args::command()
                .error(
                    ErrorKind::InvalidValue,
                    format!("Source file '{}' does not exist!", path.display()),
                )
                .exit()
        }

        if !path.is_file() {
            Args::command()
                .error(
                    ErrorKind::InvalidValue,
                    format!("Input path '{}' is not a file!", path.display()),
                )
                .exit()
        }

        let contents =
            std::fs::read_to_string(path).expect("Failed to read input file (or invalid UTF-8)");

        return SourceFile {
            contents,
            origin: SourceFileOrigin::File(path.clone()),
        };
    }

    let Some(expression) = &args.expression else {
        Args::command()
            .error(ErrorKind::MissingRequiredArgument, "Missing an expression!")
            .exit()
    };

    SourceFile {
        contents: expression.clone(),
        origin: SourceFileOrigin::Memory,
    }
}

/// Prompts for each variable the way a compiled program would, then prints
/// the evaluated result.
fn run_evaluator(expression: &Expression) {
    let mut bindings = HashMap::new();

    for name in codegen::discover_variables(expression) {
        print!("Input {name}: ");
        std::io::stdout().flush().expect("Failed to flush stdout");

        let mut line = String::new();
        std::io::stdin()
            .read_line(&mut line)
            .expect("Failed to read from stdin");

        let Ok(value) = line.trim().parse() else {
            fatal(&format!("`{}` is not a 32-bit integer", line.trim()))
        };

        bindings.insert(name, value);
    }

    match eval::evaluate(expression, &bindings) {
        Ok(result) => println!("{result}"),
        Err(error) => fatal(&error.to_string()),
    }
}

fn report_fatal_syntax_error(source: &SourceFile, error: &SyntaxError) -> ! {
    eprintln!(
        "{}: {} ({}:{}:{})",
        "error".red().bold(),
        error,
        source.origin,
        source.row_for_position(error.span.start),
        source.column_for_position(error.span.start),
    );
    source.highlight_span(error.span);

    std::process::exit(1)
}

fn fatal(message: &str) -> ! {
    eprintln!("{}: {message}", "error".red().bold());

    std::process::exit(1)
}
