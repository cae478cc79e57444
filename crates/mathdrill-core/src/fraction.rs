//! Exact rational numbers in lowest terms.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::decimal::Decimal;
use crate::error::ArithmeticError;

/// A rational number stored in canonical form: the sign lives on the
/// numerator, the denominator is positive, and the two are coprime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BigFraction {
    inner: BigRational,
}

impl BigFraction {
    /// `numerator / denominator`, reduced. Fails on a zero denominator.
    pub fn new(numerator: BigInt, denominator: BigInt) -> Result<Self, ArithmeticError> {
        if denominator.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        Ok(Self {
            inner: BigRational::new(numerator, denominator),
        })
    }

    pub fn of(numerator: i64, denominator: i64) -> Result<Self, ArithmeticError> {
        Self::new(BigInt::from(numerator), BigInt::from(denominator))
    }

    pub fn zero() -> Self {
        Self {
            inner: BigRational::zero(),
        }
    }

    pub fn one() -> Self {
        Self {
            inner: BigRational::one(),
        }
    }

    pub fn numerator(&self) -> &BigInt {
        self.inner.numer()
    }

    pub fn denominator(&self) -> &BigInt {
        self.inner.denom()
    }

    pub fn is_zero(&self) -> bool {
        self.inner.is_zero()
    }

    pub fn is_integer(&self) -> bool {
        self.inner.is_integer()
    }

    pub fn is_negative(&self) -> bool {
        self.inner.is_negative()
    }

    pub fn abs(&self) -> Self {
        Self {
            inner: self.inner.abs(),
        }
    }

    pub fn recip(&self) -> Result<Self, ArithmeticError> {
        if self.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        Ok(Self {
            inner: self.inner.recip(),
        })
    }

    pub fn checked_div(&self, divisor: &Self) -> Result<Self, ArithmeticError> {
        if divisor.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        Ok(Self {
            inner: &self.inner / &divisor.inner,
        })
    }

    /// Integer power. A negative exponent inverts the base first, so
    /// `0^-n` is a division by zero.
    pub fn pow(&self, exponent: i32) -> Result<Self, ArithmeticError> {
        let base = if exponent < 0 { self.recip()? } else { self.clone() };
        let e = exponent.unsigned_abs();
        let numerator = base.numerator().pow(e);
        let denominator = base.denominator().pow(e);
        Self::new(numerator, denominator)
    }

    /// The exact square root, when numerator and denominator are both
    /// perfect squares.
    pub fn exact_sqrt(&self) -> Option<Self> {
        if self.is_negative() {
            return None;
        }
        let n = self.numerator().sqrt();
        let d = self.denominator().sqrt();
        if &(&n * &n) == self.numerator() && &(&d * &d) == self.denominator() {
            Self::new(n, d).ok()
        } else {
            None
        }
    }

    /// Truncate toward zero.
    pub fn trunc(&self) -> BigInt {
        self.inner.trunc().to_integer()
    }

    pub fn to_i64(&self) -> Option<i64> {
        if self.is_integer() {
            self.numerator().to_i64()
        } else {
            None
        }
    }

    pub fn to_f64(&self) -> Option<f64> {
        self.inner.to_f64()
    }

    pub fn as_rational(&self) -> &BigRational {
        &self.inner
    }
}

impl From<i64> for BigFraction {
    fn from(value: i64) -> Self {
        Self::from(BigInt::from(value))
    }
}

impl From<BigInt> for BigFraction {
    fn from(value: BigInt) -> Self {
        Self {
            inner: BigRational::from_integer(value),
        }
    }
}

impl From<BigRational> for BigFraction {
    fn from(inner: BigRational) -> Self {
        Self { inner }
    }
}

impl FromStr for BigFraction {
    type Err = ArithmeticError;

    /// Parse `"a/b"`, an integer, or a decimal such as `"-1.25"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('/') {
            Some((numerator, denominator)) => {
                let n = Decimal::from_str(numerator.trim())?.to_fraction();
                let d = Decimal::from_str(denominator.trim())?.to_fraction();
                n.checked_div(&d)
            }
            None => Ok(Decimal::from_str(s)?.to_fraction()),
        }
    }
}

impl fmt::Display for BigFraction {
    /// `n` for integers, `n/d` otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numerator())
        } else {
            write!(f, "{}/{}", self.numerator(), self.denominator())
        }
    }
}

macro_rules! forward_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait for BigFraction {
            type Output = BigFraction;
            fn $method(self, rhs: BigFraction) -> BigFraction {
                BigFraction { inner: self.inner $op rhs.inner }
            }
        }

        impl<'a> $trait<&'a BigFraction> for &'a BigFraction {
            type Output = BigFraction;
            fn $method(self, rhs: &'a BigFraction) -> BigFraction {
                BigFraction { inner: &self.inner $op &rhs.inner }
            }
        }
    };
}

forward_binop!(Add, add, +);
forward_binop!(Sub, sub, -);
forward_binop!(Mul, mul, *);

impl Neg for BigFraction {
    type Output = BigFraction;
    fn neg(self) -> BigFraction {
        BigFraction { inner: -self.inner }
    }
}

impl Neg for &BigFraction {
    type Output = BigFraction;
    fn neg(self) -> BigFraction {
        BigFraction {
            inner: -&self.inner,
        }
    }
}

impl PartialEq<i64> for BigFraction {
    fn eq(&self, other: &i64) -> bool {
        self.is_integer() && self.numerator() == &BigInt::from(*other)
    }
}

impl PartialOrd<i64> for BigFraction {
    fn partial_cmp(&self, other: &i64) -> Option<Ordering> {
        Some(self.inner.cmp(&BigRational::from_integer(BigInt::from(*other))))
    }
}
