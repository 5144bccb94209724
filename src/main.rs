//! Command line front end for searchcalc.
//!
//! With no subcommand an interactive menu session is started on stdin/stdout.

use std::io;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use searchcalc::equation::{parse_equation, Equation, Side};
use searchcalc::menu::{format_number, Session};
use searchcalc::operator::{evaluate, Operator};
use searchcalc::search::{self, SearchDomain, DEFAULT_MAX, DEFAULT_MIN, DEFAULT_STEP, DEFAULT_TOLERANCE};

#[derive(Parser)]
#[command(name = "searchcalc")]
#[command(about = "A calculator that solves one-unknown equations by searching for the answer")]
struct Cli
{
    #[command(flatten)]
    domain: DomainArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args)]
struct DomainArgs
{
    /// Smallest value of the unknown to try
    #[arg(long, global = true, default_value_t = DEFAULT_MIN, allow_negative_numbers = true)]
    min: f64,
    /// Largest value of the unknown to try
    #[arg(long, global = true, default_value_t = DEFAULT_MAX, allow_negative_numbers = true)]
    max: f64,
    /// Distance between tried values
    #[arg(long, global = true, default_value_t = DEFAULT_STEP)]
    step: f64,
    /// Largest difference from the target counted as an exact match
    #[arg(long, global = true, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,
}

#[derive(Subcommand)]
enum Command
{
    /// Compute `A OP B`
    Eval
    {
        #[arg(allow_negative_numbers = true)]
        a: f64,
        op: String,
        #[arg(allow_negative_numbers = true)]
        b: f64,
    },
    /// Solve `x OP KNOWN = TARGET` (or `KNOWN OP x = TARGET` with `--side right`)
    Solve
    {
        #[arg(allow_negative_numbers = true)]
        target: f64,
        op: String,
        #[arg(allow_negative_numbers = true)]
        known: f64,
        #[arg(long, default_value = "left")]
        side: String,
    },
    /// Solve an equation written out, e.g. "x + 5 = 10"
    Equation
    {
        text: String,
    },
    /// Show the values a search tries on its way to the answer
    Probe
    {
        text: String,
    },
    /// Start the menu-driven calculator (the default)
    Interactive,
}

fn print_solution(var: &str, eqn: &Equation, soln: Option<f64>)
{
    match soln
    {
        Some(x) => println!("{var} = {}", format_number(x)),
        None => println!("{} has no solution in the search domain", eqn.display_with(var)),
    }
}

fn main() -> anyhow::Result<()>
{
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let DomainArgs { min, max, step, tolerance } = cli.domain;
    let domain = SearchDomain::new(min, max, step, tolerance).context("invalid search domain")?;

    match cli.command.unwrap_or(Command::Interactive)
    {
        Command::Eval { a, op, b } => {
            println!("{}", evaluate(&op, a, b)?);
        },
        Command::Solve { target, op, known, side } => {
            let op: Operator = op.parse()?;
            let side: Side = side.parse()?;
            let eqn = Equation::new(target, op, known, side);
            print_solution("x", &eqn, search::solve_within(&eqn, &domain));
        },
        Command::Equation { text } => {
            let (var, eqn) = parse_equation(&text)?;
            print_solution(&var, &eqn, search::solve_within(&eqn, &domain));
        },
        Command::Probe { text } => {
            let (var, eqn) = parse_equation(&text)?;
            println!("Goal: find {var} where {}", eqn.display_with(&var));
            for p in search::probe(&eqn)
            {
                match (p.result, p.distance)
                {
                    (Some(res), Some(dist)) => {
                        let mark = if p.is_exact() { " (exact match)" } else { "" };
                        println!("{var} = {:6.1} => {res:8.2} [off by {dist:.2}]{mark}", p.x);
                    },
                    _ => println!("{var} = {:6.1} => undefined", p.x),
                }
            }
            print_solution(&var, &eqn, search::solve_within(&eqn, &domain));
        },
        Command::Interactive => {
            let stdin = io::stdin();
            Session::new(stdin.lock(), io::stdout()).with_domain(domain).run()?;
        },
    }

    Ok(())
}
