//! Values produced by the expression evaluator.

use std::fmt;

use crate::decimal::{Decimal, MathContext};
use crate::error::ArithmeticError;
use crate::fraction::BigFraction;

/// An exact rational, or a decimal approximation once an irrational step
/// (a square root) has been taken.
///
/// Combining an exact value with an approximate one yields an approximate
/// value rounded to the caller's context.
#[derive(Debug, Clone)]
pub enum Number {
    Exact(BigFraction),
    Approx(Decimal),
}

impl Number {
    pub fn is_exact(&self) -> bool {
        matches!(self, Number::Exact(_))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Exact(f) => f.is_zero(),
            Number::Approx(d) => d.is_zero(),
        }
    }

    /// The exact rational value. Approximations convert without loss.
    pub fn to_fraction(&self) -> BigFraction {
        match self {
            Number::Exact(f) => f.clone(),
            Number::Approx(d) => d.to_fraction(),
        }
    }

    pub fn to_decimal(&self, ctx: &MathContext) -> Result<Decimal, ArithmeticError> {
        match self {
            Number::Exact(f) => Decimal::from_fraction(f, ctx),
            Number::Approx(d) => Ok(d.round(ctx)),
        }
    }

    fn combine(
        &self,
        other: &Self,
        ctx: &MathContext,
        op: impl FnOnce(&BigFraction, &BigFraction) -> Result<BigFraction, ArithmeticError>,
    ) -> Result<Self, ArithmeticError> {
        let value = op(&self.to_fraction(), &other.to_fraction())?;
        if self.is_exact() && other.is_exact() {
            Ok(Number::Exact(value))
        } else {
            Ok(Number::Approx(Decimal::from_fraction(&value, ctx)?))
        }
    }

    pub fn add(&self, other: &Self, ctx: &MathContext) -> Result<Self, ArithmeticError> {
        self.combine(other, ctx, |a, b| Ok(a + b))
    }

    pub fn sub(&self, other: &Self, ctx: &MathContext) -> Result<Self, ArithmeticError> {
        self.combine(other, ctx, |a, b| Ok(a - b))
    }

    pub fn mul(&self, other: &Self, ctx: &MathContext) -> Result<Self, ArithmeticError> {
        self.combine(other, ctx, |a, b| Ok(a * b))
    }

    pub fn div(&self, other: &Self, ctx: &MathContext) -> Result<Self, ArithmeticError> {
        self.combine(other, ctx, |a, b| a.checked_div(b))
    }

    pub fn neg(&self) -> Self {
        match self {
            Number::Exact(f) => Number::Exact(-f),
            Number::Approx(d) => Number::Approx(-d),
        }
    }

    pub fn pow(&self, exponent: i32, ctx: &MathContext) -> Result<Self, ArithmeticError> {
        let value = self.to_fraction().pow(exponent)?;
        match self {
            Number::Exact(_) => Ok(Number::Exact(value)),
            Number::Approx(_) => Ok(Number::Approx(Decimal::from_fraction(&value, ctx)?)),
        }
    }

    /// Exact when the value is a rational perfect square, otherwise an
    /// approximation under `ctx`.
    pub fn sqrt(&self, ctx: &MathContext) -> Result<Self, ArithmeticError> {
        if let Number::Exact(f) = self {
            if let Some(root) = f.exact_sqrt() {
                return Ok(Number::Exact(root));
            }
        }
        Ok(Number::Approx(self.to_decimal(ctx)?.sqrt(ctx)?))
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.to_fraction() == other.to_fraction()
    }
}

impl From<BigFraction> for Number {
    fn from(value: BigFraction) -> Self {
        Number::Exact(value)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Exact(BigFraction::from(value))
    }
}

impl From<Decimal> for Number {
    fn from(value: Decimal) -> Self {
        Number::Approx(value)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Exact(value) => write!(f, "{value}"),
            Number::Approx(value) => write!(f, "{}", value.normalized()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTX: MathContext = MathContext::DECIMAL64;

    #[test]
    fn exact_stays_exact() {
        let a = Number::from(BigFraction::of(1, 3).unwrap());
        let b = Number::from(2);
        let sum = a.add(&b, &CTX).unwrap();
        assert!(sum.is_exact());
        assert_eq!(sum.to_string(), "7/3");
    }

    #[test]
    fn mixing_produces_approximation() {
        let a = Number::from(BigFraction::of(1, 3).unwrap());
        let b = Number::from("0.5".parse::<Decimal>().unwrap());
        let sum = a.add(&b, &MathContext::new(5, Default::default())).unwrap();
        assert!(!sum.is_exact());
        assert_eq!(sum.to_string(), "0.83333");
    }

    #[test]
    fn sqrt_of_perfect_square_is_exact() {
        let root = Number::from(BigFraction::of(9, 4).unwrap()).sqrt(&CTX).unwrap();
        assert_eq!(root, Number::from(BigFraction::of(3, 2).unwrap()));
        assert!(root.is_exact());
        let irrational = Number::from(2).sqrt(&CTX).unwrap();
        assert!(!irrational.is_exact());
        assert!(Number::from(-4).sqrt(&CTX).is_err());
    }

    #[test]
    fn division_by_zero_fails() {
        assert_eq!(
            Number::from(1).div(&Number::from(0), &CTX),
            Err(ArithmeticError::DivisionByZero)
        );
    }
}
