//! A generated problem and the logic that judges submitted answers.

use std::fmt;

use num_rational::BigRational;
use tracing::trace;

use crate::base;
use crate::complex::Complex;
use crate::decimal::{Decimal, MathContext, RoundingMode};
use crate::error::ProblemError;
use crate::eval::Evaluator;
use crate::fraction::BigFraction;
use crate::number::Number;

/// Significant digits shown for approximate answers.
const APPROXIMATE_DIGITS: u32 = 6;

/// The canonical answer of a problem.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Number(Number),
    Complex(Complex),
    /// Digits of a non-negative integer in `radix`.
    Radix { digits: String, radix: u32 },
    Text(String),
}

impl From<BigFraction> for Answer {
    fn from(value: BigFraction) -> Self {
        Answer::Number(Number::Exact(value))
    }
}

impl From<Number> for Answer {
    fn from(value: Number) -> Self {
        Answer::Number(value)
    }
}

impl From<Complex> for Answer {
    fn from(value: Complex) -> Self {
        Answer::Complex(value)
    }
}

/// How far a submitted value may stray from the canonical one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tolerance {
    /// Fraction of the canonical magnitude, `0.05` for 5%.
    Relative(BigFraction),
    Absolute(BigFraction),
}

impl Tolerance {
    pub fn percent(percent: i64) -> Self {
        Tolerance::Relative(BigFraction::from(BigRational::new(
            percent.into(),
            100.into(),
        )))
    }

    /// Whether `candidate` is close enough to `canonical`, exactly.
    pub fn accepts(&self, candidate: &BigFraction, canonical: &BigFraction) -> bool {
        let error = (candidate - canonical).abs();
        match self {
            Tolerance::Relative(fraction) => error <= fraction * &canonical.abs(),
            Tolerance::Absolute(bound) => &error <= bound,
        }
    }
}

impl fmt::Display for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tolerance::Relative(fraction) => {
                let percent = fraction * &BigFraction::from(100);
                match Decimal::from_fraction(&percent, &MathContext::new(4, RoundingMode::HalfUp)) {
                    Ok(value) => write!(f, "±{}%", value.normalized()),
                    Err(_) => write!(f, "±{percent}%"),
                }
            }
            Tolerance::Absolute(bound) => write!(f, "±{bound}"),
        }
    }
}

/// Whether answers are judged by equality or by closeness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerMode {
    Exact,
    Approximate(Tolerance),
}

/// A problem with display text and a canonical answer. Immutable once built.
#[derive(Debug, Clone)]
pub struct Problem {
    display: String,
    answer: Answer,
    mode: AnswerMode,
}

impl Problem {
    pub fn builder() -> ProblemBuilder {
        ProblemBuilder::default()
    }

    pub fn exact(display: impl Into<String>, answer: BigFraction) -> Result<Self, ProblemError> {
        Self::builder().display(display).answer(answer).build()
    }

    pub fn approximation(
        display: impl Into<String>,
        answer: Number,
        tolerance: Tolerance,
    ) -> Result<Self, ProblemError> {
        Self::builder()
            .display(display)
            .answer(answer)
            .tolerance(tolerance)
            .build()
    }

    pub fn radix(
        display: impl Into<String>,
        digits: impl Into<String>,
        radix: u32,
    ) -> Result<Self, ProblemError> {
        Self::builder()
            .display(display)
            .answer(Answer::Radix {
                digits: digits.into(),
                radix,
            })
            .build()
    }

    pub fn complex(display: impl Into<String>, answer: Complex) -> Result<Self, ProblemError> {
        Self::builder().display(display).answer(answer).build()
    }

    pub fn text(
        display: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<Self, ProblemError> {
        Self::builder()
            .display(display)
            .answer(Answer::Text(answer.into()))
            .build()
    }

    /// Display text, possibly with `<sup>`/`<sub>` markup.
    pub fn display_string(&self) -> &str {
        &self.display
    }

    pub fn answer(&self) -> &Answer {
        &self.answer
    }

    pub fn mode(&self) -> &AnswerMode {
        &self.mode
    }

    pub fn is_approximate(&self) -> bool {
        matches!(self.mode, AnswerMode::Approximate(_))
    }

    pub fn tolerance(&self) -> Option<&Tolerance> {
        match &self.mode {
            AnswerMode::Approximate(tolerance) => Some(tolerance),
            AnswerMode::Exact => None,
        }
    }

    /// Judge a submitted answer. Malformed input is simply incorrect.
    pub fn is_correct(&self, input: &str) -> bool {
        let input = input.trim();
        if input.is_empty() {
            return false;
        }
        match &self.answer {
            Answer::Number(canonical) => {
                let value = match Evaluator::default().evaluate(input) {
                    Ok(value) => value,
                    Err(err) => {
                        trace!(input, %err, "answer did not evaluate");
                        return false;
                    }
                };
                match &self.mode {
                    AnswerMode::Exact => value == *canonical,
                    AnswerMode::Approximate(tolerance) => {
                        tolerance.accepts(&value.to_fraction(), &canonical.to_fraction())
                    }
                }
            }
            Answer::Complex(canonical) => match input.parse::<Complex>() {
                Ok(value) => value == *canonical,
                Err(err) => {
                    trace!(input, %err, "answer is not a complex number");
                    false
                }
            },
            Answer::Radix { digits, radix } => {
                match (base::parse_radix(input, *radix), base::parse_radix(digits, *radix)) {
                    (Ok(value), Ok(expected)) => value == expected,
                    (Err(err), _) | (_, Err(err)) => {
                        trace!(input, %err, radix, "answer is not a valid base-{radix} number");
                        false
                    }
                }
            }
            Answer::Text(expected) => input == expected,
        }
    }

    /// The canonical answer as text a user could type back in.
    pub fn answer_as_string(&self) -> String {
        match (&self.answer, &self.mode) {
            (Answer::Number(value), AnswerMode::Approximate(tolerance)) => {
                let ctx = MathContext::new(APPROXIMATE_DIGITS, RoundingMode::HalfUp);
                let canonical = value.to_fraction();
                // Fall back to the exact value when rounding leaves the tolerance.
                match value.to_decimal(&ctx) {
                    Ok(rounded) if tolerance.accepts(&rounded.to_fraction(), &canonical) => {
                        rounded.normalized().to_string()
                    }
                    _ => value.to_string(),
                }
            }
            (Answer::Number(value), AnswerMode::Exact) => value.to_string(),
            (Answer::Complex(value), _) => value.to_string(),
            (Answer::Radix { digits, .. }, _) => digits.clone(),
            (Answer::Text(text), _) => text.clone(),
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// Assembles a [`Problem`], validating the combination of parts.
#[derive(Debug, Default)]
pub struct ProblemBuilder {
    display: String,
    answer: Option<Answer>,
    tolerance: Option<Tolerance>,
}

impl ProblemBuilder {
    pub fn display(mut self, display: impl Into<String>) -> Self {
        self.display = display.into();
        self
    }

    pub fn answer(mut self, answer: impl Into<Answer>) -> Self {
        self.answer = Some(answer.into());
        self
    }

    /// Switch to approximate mode.
    pub fn tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn build(self) -> Result<Problem, ProblemError> {
        if self.display.trim().is_empty() {
            return Err(ProblemError::EmptyDisplay);
        }
        let answer = self.answer.ok_or(ProblemError::MissingAnswer)?;
        let mode = match self.tolerance {
            Some(tolerance) if matches!(answer, Answer::Number(_)) => {
                AnswerMode::Approximate(tolerance)
            }
            Some(_) => return Err(ProblemError::ToleranceRequiresNumber),
            None => AnswerMode::Exact,
        };
        Ok(Problem {
            display: self.display,
            answer,
            mode,
        })
    }
}
