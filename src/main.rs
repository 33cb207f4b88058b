//! MathEngine - CLI
//!
//! Console calculator: evaluates one expression per line and prints the
//! result or the error text.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use mathengine::util::logger;
use mathengine::{render_postfix, Engine, NAME, VERSION};

/// Infix expression calculator with batched postfix evaluation
#[derive(Parser, Debug)]
#[command(name = "mathengine")]
#[command(version = VERSION)]
#[command(about = NAME, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Disable run compaction (plain scalar postfix)
    #[arg(long)]
    plain: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate an expression and print the result
    Eval {
        /// Expression to evaluate
        #[arg(value_name = "EXPR")]
        expr: String,
    },

    /// Print the postfix instruction stream for an expression
    Postfix {
        /// Expression to convert
        #[arg(value_name = "EXPR")]
        expr: String,
    },

    /// Start the interactive calculator (default)
    Repl,

    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose {
        logger::init_debug();
    } else {
        logger::init();
    }

    let engine = if args.plain {
        Engine::plain()
    } else {
        Engine::new()
    };

    match args.command {
        Some(Commands::Eval { expr }) => {
            let result = engine
                .calculate(&expr)
                .context("Failed to evaluate expression")?;
            println!("{result}");
        }
        Some(Commands::Postfix { expr }) => {
            let program = engine
                .to_postfix(&expr)
                .context("Failed to convert expression")?;
            println!("{}", render_postfix(&program));
        }
        Some(Commands::Repl) | None => repl(engine)?,
        Some(Commands::Version) => {
            println!("{NAME} {VERSION}");
        }
    }

    Ok(())
}

/// Interactive loop: one expression per line, empty lines ignored, `exit`
/// leaves the loop.
fn repl(engine: Engine) -> Result<()> {
    println!("Write 'exit' to close the calculator");

    let mut editor = DefaultEditor::new().context("Failed to initialize line editor")?;
    loop {
        match editor.readline(">> ") {
            Ok(line) => {
                let expression = line.trim();
                if expression.is_empty() {
                    continue;
                }
                if expression.eq_ignore_ascii_case("exit") {
                    break;
                }
                let _ = editor.add_history_entry(expression);
                match engine.calculate(expression) {
                    Ok(result) => println!("Result:= {result}"),
                    Err(e) => eprintln!("{}", e.red()),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("Failed to read line"),
        }
    }

    Ok(())
}
