use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum OperatorError
{
    #[error("found unsupported operator {0:?}, expected one of +, -, *, /, ^")]
    UnsupportedOperator(String),
}

/// Errors raised while applying an `Operator` to two operands. Inside the
/// search these mark a sample as undefined and the sample is skipped.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum EvaluationError
{
    #[error("tried to divide by zero")]
    DivisionByZero,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum EquationParseError
{
    #[error("found an expression with no '=' where an equation was expected")]
    FoundExpression,
    #[error("found more than one '=' in the given equation")]
    FoundMultipleEquations,
    #[error("expected `a OP b` on one side of the equation, found {0:?}")]
    MalformedExpression(String),
    #[error("failed to read {0:?} as a number")]
    MalformedNumber(String),
    #[error("failed to find an unknown variable in the equation")]
    UnknownNotFound,
    #[error("found an unknown on both sides of the operator")]
    TooManyUnknowns,
    #[error("expected the unknown's side to be \"left\" or \"right\", found {0:?}")]
    InvalidSide(String),
}

#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum SearchDomainError
{
    #[error("search bounds must be finite numbers")]
    NonFiniteBounds,
    #[error("search minimum {min} is greater than maximum {max}")]
    InvertedBounds { min: f64, max: f64 },
    #[error("search step must be greater than 0, found {0}")]
    NonPositiveStep(f64),
    #[error("match tolerance must not be negative, found {0}")]
    NegativeTolerance(f64),
    #[error("search domain holds more than {max_samples} samples")]
    TooManySamples { max_samples: usize },
}
