use std::fmt;
use std::str::FromStr;

use crate::errors::{EvaluationError, OperatorError};

/// One of the five binary operators the calculator understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator
{
    Plus,
    Minus,
    Mul,
    Div,
    Exp,
}

impl Operator
{
    /// Every supported operator, in the order they are listed to users.
    pub const ALL: [Operator; 5] = [
        Operator::Plus,
        Operator::Minus,
        Operator::Mul,
        Operator::Div,
        Operator::Exp,
    ];

    /// The text symbol for this operator.
    pub fn symbol(self) -> &'static str
    {
        match self
        {
            Operator::Plus  => "+",
            Operator::Minus => "-",
            Operator::Mul   => "*",
            Operator::Div   => "/",
            Operator::Exp   => "^",
        }
    }

    /// Computes `a OP b`. Division by a zero divisor is the only failure;
    /// other non-finite results (e.g. `0 ^ -1`) are returned as they are.
    ///
    /// # Example
    /// ```
    /// use searchcalc::operator::Operator;
    /// use searchcalc::errors::EvaluationError;
    ///
    /// assert_eq!(Operator::Exp.apply(2.0, 10.0), Ok(1024.0));
    /// assert_eq!(Operator::Div.apply(1.0, 0.0), Err(EvaluationError::DivisionByZero));
    /// ```
    pub fn apply(self, a: f64, b: f64) -> Result<f64, EvaluationError>
    {
        let res = match self
        {
            Operator::Plus  => a + b,
            Operator::Minus => a - b,
            Operator::Mul   => a * b,
            Operator::Div   => {
                if b == 0.0
                {
                    return Err(EvaluationError::DivisionByZero);
                }
                a / b
            },
            Operator::Exp   => a.powf(b),
        };
        Ok(res)
    }
}

impl FromStr for Operator
{
    type Err = OperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        let op = match s
        {
            "+" => Operator::Plus,
            "-" => Operator::Minus,
            "*" => Operator::Mul,
            "/" => Operator::Div,
            "^" => Operator::Exp,
            other => return Err(OperatorError::UnsupportedOperator(other.to_owned())),
        };
        Ok(op)
    }
}

impl fmt::Display for Operator
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        f.write_str(self.symbol())
    }
}

/// Evaluates `a op b` for an operator given as text.
///
/// # Example
/// ```
/// use searchcalc::operator::evaluate;
///
/// assert_eq!(evaluate("*", 6.0, 7.0).unwrap(), 42.0);
/// assert!(evaluate("%", 6.0, 7.0).is_err());
/// ```
pub fn evaluate(op: &str, a: f64, b: f64) -> anyhow::Result<f64>
{
    let op: Operator = op.parse()?;
    Ok(op.apply(a, b)?)
}
