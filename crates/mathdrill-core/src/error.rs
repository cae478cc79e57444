//! Error types for the generation and evaluation core.
//!
//! Each concern gets its own enum so callers can tell a configuration
//! mistake apart from a malformed answer or a misused arithmetic operation.

use thiserror::Error;

/// Errors raised when a setting is mutated or configured incorrectly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingError {
    /// The absolute bounds of a range are inverted.
    #[error("invalid range bounds: min {min} is greater than max {max}")]
    InvalidBounds { min: i64, max: i64 },

    /// A low value fell below the absolute minimum.
    #[error("low value {low} is below the minimum {min}")]
    LowBelowMin { low: i64, min: i64 },

    /// A low value exceeded the configured high value.
    #[error("low value {low} is above the high value {high}")]
    LowAboveHigh { low: i64, high: i64 },

    /// A high value exceeded the absolute maximum.
    #[error("high value {high} is above the maximum {max}")]
    HighAboveMax { high: i64, max: i64 },

    /// A high value fell below the configured low value.
    #[error("high value {high} is below the low value {low}")]
    HighBelowLow { high: i64, low: i64 },

    /// A configured value has the wrong shape for the setting.
    #[error("setting '{name}' expects {expected}")]
    TypeMismatch { name: String, expected: &'static str },
}

/// Errors from the exact arithmetic layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivisionByZero,

    /// The operation is undefined for its operands.
    #[error("domain error: {0}")]
    Domain(String),

    /// Text could not be parsed as a number.
    #[error("invalid number format: '{0}'")]
    Format(String),

    /// An exact quotient has no terminating decimal expansion.
    #[error("non-terminating decimal expansion; no exact representable result")]
    NonTerminating,

    /// The value does not fit the requested integer type exactly.
    #[error("value {0} is not an exact 64-bit integer")]
    NotExact(String),

    #[error("invalid radix {0}; expected 2..=36")]
    InvalidRadix(u32),
}

/// Errors from parsing or evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected '{found}' at position {position}")]
    UnexpectedToken { position: usize, found: String },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unbalanced parenthesis at position {position}")]
    UnbalancedParenthesis { position: usize },

    #[error("invalid number '{text}' at position {position}")]
    InvalidNumber { position: usize, text: String },

    #[error("unknown function '{name}' at position {position}")]
    UnknownFunction { position: usize, name: String },

    #[error("exponent at position {position} is not an integer")]
    NonIntegerExponent { position: usize },

    #[error("exponent at position {position} exceeds the limit of {limit}")]
    ExponentTooLarge { position: usize, limit: i64 },

    #[error("power at position {position} exceeds {limit} bits")]
    PowerTooLarge { position: usize, limit: u64 },

    #[error("expression at position {position} nests deeper than {limit} levels")]
    TooDeep { position: usize, limit: usize },

    #[error("division by zero at position {position}")]
    DivisionByZero { position: usize },

    #[error("arithmetic error at position {position}: {source}")]
    Arithmetic {
        position: usize,
        #[source]
        source: ArithmeticError,
    },
}

/// Errors from assembling a [`Problem`](crate::problem::Problem).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProblemError {
    #[error("problem has no answer")]
    MissingAnswer,

    #[error("approximate problems need a numeric answer")]
    ToleranceRequiresNumber,

    #[error("problem display text is empty")]
    EmptyDisplay,
}

/// Errors from suppliers and the composite supplier.
#[derive(Debug, Error)]
pub enum SupplierError {
    /// A supplier with the same name is already registered.
    #[error("a supplier named '{0}' is already registered")]
    Duplicate(String),

    /// No suppliers are registered.
    #[error("no problem suppliers are registered")]
    Empty,

    #[error("unknown supplier: {0}")]
    Unknown(String),

    #[error("failed to build problem: {0}")]
    Problem(#[from] ProblemError),

    #[error("failed to evaluate generated expression: {0}")]
    Eval(#[from] EvalError),

    #[error("arithmetic failure while generating: {0}")]
    Arithmetic(#[from] ArithmeticError),

    #[error(transparent)]
    Setting(#[from] SettingError),
}

impl SupplierError {
    /// Returns `true` if the error means there is nothing to generate from.
    pub fn is_empty(&self) -> bool {
        matches!(self, SupplierError::Empty)
    }
}
