/// Contains the `Equation` type and a parser for equations written as text.
pub mod equation;
/// Contains error types for different errors that this crate may throw.
pub mod errors;
/// Contains `extern "C"` function definitions for linking this library
/// against projects in different languages. Not intended for use in
/// other Rust projects.
mod ffi;
/// Contains the interactive calculator session driven by the binary.
pub mod menu;
/// Contains the five supported binary operators.
pub mod operator;
/// Contains the bounded linear search used to solve equations.
pub mod search;

use equation::{parse_equation, Equation, Side};
use operator::Operator;

pub use operator::evaluate;

/// Solves `x OP known = target` when `side` is `"left"`, or
/// `known OP x = target` when `side` is `"right"`, by searching
/// `[-100, 100]` in steps of `0.1`.
///
/// An `Ok(None)` means the equation was undefined at every sample.
///
/// # Example
/// ```
/// use searchcalc::solve;
///
/// // 10 - x = 7
/// let x = solve(7.0, "-", 10.0, "right").unwrap();
///
/// assert_eq!(x, Some(3.0));
/// ```
pub fn solve(target: f64, op: &str, known: f64, side: &str) -> anyhow::Result<Option<f64>>
{
    let operator: Operator = op.parse()?;
    let side: Side = side.parse()?;

    Ok(Equation::new(target, operator, known, side).solve())
}

/// Solves an equation given as a string for its SINGLE unknown variable,
/// returning the variable's name alongside the value found, if any.
///
/// # Example
/// ```
/// use searchcalc::solve_equation_from_str;
///
/// let (var, soln) = solve_equation_from_str("x + 4 = 12").unwrap();
///
/// assert_eq!(var, "x");
/// assert_eq!(soln, Some(8.0));
/// ```
pub fn solve_equation_from_str(equation: &str) -> anyhow::Result<(String, Option<f64>)>
{
    let (var, eqn) = parse_equation(equation)?;
    Ok((var, eqn.solve()))
}
