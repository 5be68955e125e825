use std::io::{self, BufRead};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rpncalc::{eval, format_postfix, postfix, CalcError, EvalResult};

/// rpncalc converts arithmetic expressions to postfix notation and evaluates
/// them. Without expressions on the command line it reads one expression per
/// line from standard input.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Print the postfix form of every expression before its result.
    #[arg(short, long)]
    postfix: bool,

    /// Print bare results without the `result:` prefix.
    #[arg(short, long)]
    quiet: bool,

    expressions: Vec<String>,
}

fn process(expr: &str, args: &Args) -> Result<EvalResult, CalcError> {
    let rpn = postfix(expr)?;
    if args.postfix {
        println!("postfix: {}", format_postfix(&rpn));
    }
    Ok(eval(&rpn)?)
}

fn report(expr: &str, args: &Args) {
    match process(expr, args) {
        Ok(res) if args.quiet => println!("{}", res),
        Ok(res) => println!("result: {}", res),
        Err(e) => eprintln!("error: {}", e),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if !args.expressions.is_empty() {
        for expr in &args.expressions {
            report(expr, &args);
        }
        return;
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Failed to read the input: {}", e);
                std::process::exit(1);
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        report(&line, &args);
    }
}
