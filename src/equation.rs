use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::{EquationParseError, EvaluationError};
use crate::operator::Operator;
use crate::search::{self, SearchDomain};

/// Which operand of the operator the unknown occupies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Side
{
    /// `x OP known = target`
    #[default]
    Left,
    /// `known OP x = target`
    Right,
}

impl FromStr for Side
{
    type Err = EquationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.trim().to_ascii_lowercase().as_str()
        {
            "left"  | "l" => Ok(Side::Left),
            "right" | "r" => Ok(Side::Right),
            _ => Err(EquationParseError::InvalidSide(s.to_owned())),
        }
    }
}

impl fmt::Display for Side
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        match self
        {
            Side::Left  => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// A single-unknown equation `x OP known = target` (or `known OP x = target`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Equation
{
    pub target: f64,
    pub operator: Operator,
    pub known: f64,
    pub side: Side,
}

impl Equation
{
    pub fn new(target: f64, operator: Operator, known: f64, side: Side) -> Equation
    {
        Equation { target, operator, known, side }
    }

    /// Evaluates the operator side of the equation with `x` substituted
    /// for the unknown.
    ///
    /// # Example
    /// ```
    /// use searchcalc::equation::{Equation, Side};
    /// use searchcalc::operator::Operator;
    ///
    /// let eqn = Equation::new(7.0, Operator::Minus, 10.0, Side::Right);
    ///
    /// assert_eq!(eqn.evaluate_at(3.0), Ok(7.0));
    /// ```
    pub fn evaluate_at(&self, x: f64) -> Result<f64, EvaluationError>
    {
        match self.side
        {
            Side::Left  => self.operator.apply(x, self.known),
            Side::Right => self.operator.apply(self.known, x),
        }
    }

    /// Searches the default domain for the unknown. See `search::solve_within`.
    ///
    /// # Example
    /// ```
    /// use searchcalc::equation::{Equation, Side};
    /// use searchcalc::operator::Operator;
    ///
    /// let eqn = Equation::new(15.0, Operator::Mul, 3.0, Side::Left);
    ///
    /// assert_eq!(eqn.solve(), Some(5.0));
    /// ```
    pub fn solve(&self) -> Option<f64>
    {
        search::solve_within(self, &SearchDomain::default())
    }

    /// Formats the equation using `unknown` as the variable's name.
    pub fn display_with<'a>(&'a self, unknown: &'a str) -> impl fmt::Display + 'a
    {
        EquationDisplay { eqn: self, unknown }
    }
}

struct EquationDisplay<'a>
{
    eqn: &'a Equation,
    unknown: &'a str,
}

impl fmt::Display for EquationDisplay<'_>
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        let Equation { target, operator, known, side } = self.eqn;
        match side
        {
            Side::Left  => write!(f, "{} {operator} {known} = {target}", self.unknown),
            Side::Right => write!(f, "{known} {operator} {} = {target}", self.unknown),
        }
    }
}

impl fmt::Display for Equation
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        self.display_with("x").fmt(f)
    }
}

const NUMBER: &str = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";
const IDENTIFIER: &str = r"[A-Za-z_][A-Za-z0-9_]*";

/// One operand of `a OP b`: either the unknown's name or a number.
enum Operand<'a>
{
    Unknown(&'a str),
    Known(f64),
}

fn parse_operand(text: &str) -> Result<Operand<'_>, EquationParseError>
{
    lazy_static!
    {
        static ref IDENT_RE: Regex = Regex::new(&format!("^{IDENTIFIER}$")).unwrap();
    }

    if IDENT_RE.is_match(text)
    {
        return Ok(Operand::Unknown(text));
    }
    parse_number(text).map(Operand::Known)
}

fn parse_number(text: &str) -> Result<f64, EquationParseError>
{
    let text = text.trim();
    match text.parse::<f64>()
    {
        Ok(num) if num.is_finite() => Ok(num),
        _ => Err(EquationParseError::MalformedNumber(text.to_owned())),
    }
}

/// Splits `a OP b` into its operands and operator.
fn parse_binary_expression(expr: &str) -> Result<(&str, Operator, &str), EquationParseError>
{
    lazy_static!
    {
        static ref BINARY_RE: Regex = Regex::new(&format!(
            r"^\s*(?P<lhs>{IDENTIFIER}|{NUMBER})\s*(?P<op>[-+*/^])\s*(?P<rhs>{IDENTIFIER}|{NUMBER})\s*$"
        )).unwrap();
    }

    let caps = BINARY_RE
        .captures(expr)
        .ok_or_else(|| EquationParseError::MalformedExpression(expr.trim().to_owned()))?;

    // The pattern only admits the five operator characters.
    let op = caps["op"]
        .parse::<Operator>()
        .map_err(|_| EquationParseError::MalformedExpression(expr.trim().to_owned()))?;

    match (caps.name("lhs"), caps.name("rhs"))
    {
        (Some(lhs), Some(rhs)) => Ok((lhs.as_str(), op, rhs.as_str())),
        _ => Err(EquationParseError::MalformedExpression(expr.trim().to_owned())),
    }
}

/// Reads an equation such as `x + 5 = 10` or `4 = 20 / y`, returning the
/// name of the unknown and the equation it appears in.
///
/// # Example
/// ```
/// use searchcalc::equation::{parse_equation, Side};
/// use searchcalc::operator::Operator;
///
/// let (var, eqn) = parse_equation("20 / y = 4").unwrap();
///
/// assert_eq!(var, "y");
/// assert_eq!(eqn.operator, Operator::Div);
/// assert_eq!(eqn.side, Side::Right);
/// assert_eq!(eqn.known, 20.0);
/// assert_eq!(eqn.target, 4.0);
/// ```
pub fn parse_equation(text: &str) -> anyhow::Result<(String, Equation)>
{
    // Ensure that we're reading just one equation
    let sides: Vec<&str> = text.split('=').collect();
    match sides.len()
    {
        1 => return Err(EquationParseError::FoundExpression.into()),
        2 => (),
        _ => return Err(EquationParseError::FoundMultipleEquations.into()),
    }

    // Whichever side is a plain number is the target
    let (expr, target) = match (parse_number(sides[0]), parse_number(sides[1]))
    {
        (_, Ok(target)) => (sides[0], target),
        (Ok(target), Err(_)) => (sides[1], target),
        (Err(lhs_err), Err(rhs_err)) => {
            // Blame the side that doesn't look like `a OP b`
            let err = match parse_binary_expression(sides[1])
            {
                Ok(_) => lhs_err,
                Err(_) => rhs_err,
            };
            return Err(err.into());
        },
    };

    let (lhs, operator, rhs) = parse_binary_expression(expr)?;
    let (unknown, known, side) = match (parse_operand(lhs)?, parse_operand(rhs)?)
    {
        (Operand::Unknown(var), Operand::Known(num)) => (var, num, Side::Left),
        (Operand::Known(num), Operand::Unknown(var)) => (var, num, Side::Right),
        (Operand::Unknown(_), Operand::Unknown(_)) => return Err(EquationParseError::TooManyUnknowns.into()),
        (Operand::Known(_), Operand::Known(_)) => return Err(EquationParseError::UnknownNotFound.into()),
    };

    Ok((unknown.to_owned(), Equation::new(target, operator, known, side)))
}
