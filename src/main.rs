use std::fs;
use std::io;

use anyhow::{Context, Result};
use clap::Parser;

use snakeex::render::{header, render_match};
use snakeex::{Error, Grid, Match, RunOptions, find, parse_program, scan};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Program file, or the program text itself with --expr
    #[arg(value_name = "PROGRAM")]
    program: String,

    /// Grid file (reads stdin when absent)
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    /// Treat PROGRAM as program text
    #[arg(short = 'e', long)]
    expr: bool,

    /// Matches with the same cells are duplicates wherever they start
    #[arg(short = 'o', long)]
    origin_insensitive: bool,

    /// Interpreter steps allowed per start cell (0 = unlimited)
    #[arg(long, value_name = "N", default_value_t = snakeex::DEFAULT_STEP_BUDGET)]
    step_budget: usize,

    /// Print only the number of matches
    #[arg(long)]
    count: bool,

    /// No terminal styling
    #[arg(long)]
    plain: bool,

    /// Print the scanned tokens to stderr
    #[arg(long)]
    dump_tokens: bool,

    /// Print the parsed program to stderr
    #[arg(long)]
    dump_ast: bool,
}

impl Args {
    fn options(&self) -> RunOptions {
        let budget = (self.step_budget > 0).then_some(self.step_budget);
        RunOptions::default()
            .origin_insensitive(self.origin_insensitive)
            .step_budget(budget)
    }
}

fn main() {
    let args = Args::parse();
    match try_main(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when the program itself reported errors.
fn try_main(args: &Args) -> Result<bool> {
    let code = if args.expr {
        args.program.clone()
    } else {
        fs::read_to_string(&args.program)
            .with_context(|| format!("Failed to read program {}", args.program))?
    };
    let input = match &args.input {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read input {}", path))?
        }
        None => io::read_to_string(io::stdin()).context("Failed to read stdin")?,
    };
    // A grid file's final line break does not start another row.
    let input = input.strip_suffix('\n').unwrap_or(&input);

    let matches = match search(args, &code, input) {
        Ok(matches) => matches,
        Err(errors) => {
            for err in errors {
                eprintln!("{}", err);
            }
            return Ok(false);
        }
    };

    if args.count {
        println!("{}", matches.len());
        return Ok(true);
    }
    let grid = Grid::new(input);
    for (index, m) in matches.iter().enumerate() {
        if index > 0 {
            println!();
        }
        println!("{}", header(m, index, matches.len()));
        print!("{}", render_match(&grid, m, !args.plain));
    }
    Ok(true)
}

fn search(args: &Args, code: &str, input: &str) -> Result<Vec<Match>, Vec<Error>> {
    let tokens = scan(code)?;
    if args.dump_tokens {
        for token in &tokens {
            eprintln!(
                "({},{} {:?} '{}')",
                token.line,
                token.col,
                token.kind,
                token.text.escape_debug()
            );
        }
    }
    let program = parse_program(tokens)?;
    if args.dump_ast {
        eprintln!("{:#?}", program);
    }
    find(&program, input, &args.options()).map_err(|err| vec![err.into()])
}
