//! Arbitrary-precision decimals with explicit rounding contexts.
//!
//! A [`Decimal`] is `unscaled × 10^-scale`. Addition, subtraction and
//! multiplication are exact. Anything that can produce an unbounded
//! expansion (division, square roots, rounded products) takes a
//! [`MathContext`]; there is no global precision.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::error::ArithmeticError;
use crate::fraction::BigFraction;

/// Largest decimal exponent accepted when parsing (`1e10000`).
const MAX_PARSE_EXPONENT: i64 = 10_000;

/// How to discard digits when a result is rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoundingMode {
    /// Away from zero.
    Up,
    /// Toward zero.
    Down,
    Ceiling,
    Floor,
    HalfUp,
    HalfDown,
    #[default]
    HalfEven,
}

/// Precision (significant digits, `0` = unlimited) and rounding mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MathContext {
    precision: u32,
    rounding: RoundingMode,
}

impl MathContext {
    pub const UNLIMITED: MathContext = MathContext::new(0, RoundingMode::HalfEven);
    pub const DECIMAL32: MathContext = MathContext::new(7, RoundingMode::HalfEven);
    pub const DECIMAL64: MathContext = MathContext::new(16, RoundingMode::HalfEven);
    pub const DECIMAL128: MathContext = MathContext::new(34, RoundingMode::HalfEven);

    pub const fn new(precision: u32, rounding: RoundingMode) -> Self {
        Self {
            precision,
            rounding,
        }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    pub fn is_unlimited(&self) -> bool {
        self.precision == 0
    }
}

impl Default for MathContext {
    fn default() -> Self {
        Self::DECIMAL128
    }
}

/// An arbitrary-precision decimal number.
///
/// Equality, ordering and hashing compare values, so `1.50 == 1.5`.
#[derive(Debug, Clone)]
pub struct Decimal {
    unscaled: BigInt,
    scale: i64,
}

impl Decimal {
    pub fn new(unscaled: BigInt, scale: i64) -> Self {
        Self { unscaled, scale }
    }

    pub fn zero() -> Self {
        Self::new(BigInt::zero(), 0)
    }

    pub fn one() -> Self {
        Self::new(BigInt::one(), 0)
    }

    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    pub fn scale(&self) -> i64 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.unscaled.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.unscaled.is_negative()
    }

    pub fn abs(&self) -> Self {
        Self::new(self.unscaled.abs(), self.scale)
    }

    /// Number of significant digits in the unscaled value (`1` for zero).
    pub fn precision(&self) -> u64 {
        digit_count(&self.unscaled)
    }

    /// Round to the context's precision. Unlimited contexts return `self`.
    pub fn round(&self, ctx: &MathContext) -> Self {
        if ctx.is_unlimited() {
            return self.clone();
        }
        let precision = u64::from(ctx.precision);
        let digits = self.precision();
        if digits <= precision {
            return self.clone();
        }
        let drop = digits - precision;
        let unscaled = div_rounded(&self.unscaled, &pow10(drop), ctx.rounding);
        Self::new(unscaled, self.scale - drop as i64).trim_carry(precision)
    }

    /// Rounding 999 up can produce 1000, one digit too many. The extra
    /// digit is always a trailing zero, so dropping it is exact.
    fn trim_carry(self, precision: u64) -> Self {
        if digit_count(&self.unscaled) > precision {
            Self::new(self.unscaled / BigInt::from(10), self.scale - 1)
        } else {
            self
        }
    }

    /// Strip trailing zeros from the unscaled value.
    pub fn normalized(&self) -> Self {
        if self.is_zero() {
            return Self::zero();
        }
        let ten = BigInt::from(10);
        let mut unscaled = self.unscaled.clone();
        let mut scale = self.scale;
        loop {
            let (q, r) = unscaled.div_rem(&ten);
            if !r.is_zero() {
                break;
            }
            unscaled = q;
            scale -= 1;
        }
        Self::new(unscaled, scale)
    }

    pub fn add_with(&self, other: &Self, ctx: &MathContext) -> Self {
        (self + other).round(ctx)
    }

    pub fn multiply_with(&self, other: &Self, ctx: &MathContext) -> Self {
        (self * other).round(ctx)
    }

    /// `self / divisor` rounded to `ctx`.
    ///
    /// With an unlimited context the quotient must terminate, otherwise
    /// this fails with [`ArithmeticError::NonTerminating`].
    pub fn divide(&self, divisor: &Self, ctx: &MathContext) -> Result<Self, ArithmeticError> {
        let quotient = self.to_fraction().checked_div(&divisor.to_fraction())?;
        Self::from_fraction(&quotient, ctx)
    }

    /// Convert a fraction to a decimal under `ctx`.
    pub fn from_fraction(value: &BigFraction, ctx: &MathContext) -> Result<Self, ArithmeticError> {
        let numerator = value.numerator();
        let denominator = value.denominator();
        if numerator.is_zero() {
            return Ok(Self::zero());
        }
        if ctx.is_unlimited() {
            let scale = terminating_scale(denominator).ok_or(ArithmeticError::NonTerminating)?;
            let unscaled = numerator * pow10(scale) / denominator;
            return Ok(Self::new(unscaled, scale as i64));
        }

        let precision = i64::from(ctx.precision);
        let estimate =
            precision + digit_count(denominator) as i64 - digit_count(numerator) as i64 + 1;
        let trial = scaled_quotient(&numerator.abs(), denominator, estimate, RoundingMode::Down);
        let scale = estimate + precision - digit_count(&trial) as i64;
        let unscaled = scaled_quotient(numerator, denominator, scale, ctx.rounding);
        Ok(Self::new(unscaled, scale).trim_carry(u64::from(ctx.precision)))
    }

    /// The exact rational value.
    pub fn to_fraction(&self) -> BigFraction {
        if self.scale >= 0 {
            // Denominator is a positive power of ten, never zero.
            BigFraction::from(num_rational::BigRational::new(
                self.unscaled.clone(),
                pow10(self.scale as u64),
            ))
        } else {
            BigFraction::from(&self.unscaled * pow10(self.scale.unsigned_abs()))
        }
    }

    /// Truncating remainder: `self - trunc(self / divisor) * divisor`.
    ///
    /// The result has the sign of `self`; this is not a modulo operation.
    pub fn remainder(&self, divisor: &Self) -> Result<Self, ArithmeticError> {
        if divisor.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        let (a, b, scale) = self.aligned(divisor);
        Ok(Self::new(a % b, scale))
    }

    /// Square root rounded to `ctx`.
    ///
    /// An unlimited context only succeeds for values with a terminating
    /// exact root.
    pub fn sqrt(&self, ctx: &MathContext) -> Result<Self, ArithmeticError> {
        if self.is_negative() {
            return Err(ArithmeticError::Domain(format!(
                "square root of negative value {self}"
            )));
        }
        if self.is_zero() {
            return Ok(Self::zero());
        }
        if ctx.is_unlimited() {
            let root = self
                .to_fraction()
                .exact_sqrt()
                .ok_or(ArithmeticError::NonTerminating)?;
            return Self::from_fraction(&root, ctx);
        }

        let working = i64::from(ctx.precision) + 2;
        let digits = digit_count(&self.unscaled) as i64;
        let k = (2 * working - digits + self.scale + 1)
            .div_euclid(2)
            .max((self.scale + 1).div_euclid(2));
        let shift = (2 * k - self.scale) as u64;
        let root = (&self.unscaled * pow10(shift)).sqrt();
        Ok(Self::new(root, k).round(ctx))
    }

    /// The value as an `i64`, failing if it has a fractional part or does
    /// not fit.
    pub fn to_i64_exact(&self) -> Result<i64, ArithmeticError> {
        let normalized = self.normalized();
        let not_exact = || ArithmeticError::NotExact(self.to_string());
        if normalized.scale > 0 {
            return Err(not_exact());
        }
        // i64 has at most 19 digits.
        if normalized.scale < -19 {
            return Err(not_exact());
        }
        let value = &normalized.unscaled * pow10(normalized.scale.unsigned_abs());
        value.to_i64().ok_or_else(not_exact)
    }

    pub fn to_f64(&self) -> Option<f64> {
        self.to_fraction().to_f64()
    }

    fn aligned(&self, other: &Self) -> (BigInt, BigInt, i64) {
        match self.scale.cmp(&other.scale) {
            Ordering::Equal => (self.unscaled.clone(), other.unscaled.clone(), self.scale),
            Ordering::Greater => {
                let shift = pow10((self.scale - other.scale) as u64);
                (self.unscaled.clone(), &other.unscaled * shift, self.scale)
            }
            Ordering::Less => {
                let shift = pow10((other.scale - self.scale) as u64);
                (&self.unscaled * shift, other.unscaled.clone(), other.scale)
            }
        }
    }
}

fn pow10(exponent: u64) -> BigInt {
    BigInt::from(10u32).pow(exponent as u32)
}

fn digit_count(value: &BigInt) -> u64 {
    value.magnitude().to_string().len() as u64
}

/// Scale needed to represent `1/denominator` exactly, or `None` when the
/// denominator has a prime factor other than 2 or 5.
fn terminating_scale(denominator: &BigInt) -> Option<u64> {
    fn strip(rest: &mut BigInt, factor: u32) -> u64 {
        let factor = BigInt::from(factor);
        let mut count = 0;
        loop {
            let (q, r) = rest.div_rem(&factor);
            if !r.is_zero() {
                return count;
            }
            *rest = q;
            count += 1;
        }
    }

    let mut rest = denominator.abs();
    let twos = strip(&mut rest, 2);
    let fives = strip(&mut rest, 5);
    rest.is_one().then_some(twos.max(fives))
}

/// `round(numerator × 10^scale / denominator)`.
fn scaled_quotient(
    numerator: &BigInt,
    denominator: &BigInt,
    scale: i64,
    mode: RoundingMode,
) -> BigInt {
    if scale >= 0 {
        div_rounded(&(numerator * pow10(scale as u64)), denominator, mode)
    } else {
        div_rounded(numerator, &(denominator * pow10(scale.unsigned_abs())), mode)
    }
}

/// Integer division with the given rounding. `divisor` must be non-zero.
fn div_rounded(numerator: &BigInt, divisor: &BigInt, mode: RoundingMode) -> BigInt {
    let (quotient, remainder) = numerator.div_rem(divisor);
    if remainder.is_zero() {
        return quotient;
    }
    let positive = numerator.is_negative() == divisor.is_negative();
    let half = (remainder.abs() * 2u32).cmp(&divisor.abs());
    let away = match mode {
        RoundingMode::Up => true,
        RoundingMode::Down => false,
        RoundingMode::Ceiling => positive,
        RoundingMode::Floor => !positive,
        RoundingMode::HalfUp => half != Ordering::Less,
        RoundingMode::HalfDown => half == Ordering::Greater,
        RoundingMode::HalfEven => {
            half == Ordering::Greater || (half == Ordering::Equal && quotient.is_odd())
        }
    };
    if !away {
        quotient
    } else if positive {
        quotient + BigInt::one()
    } else {
        quotient - BigInt::one()
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, _) = self.aligned(other);
        a.cmp(&b)
    }
}

impl Hash for Decimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let normalized = self.normalized();
        normalized.unscaled.hash(state);
        normalized.scale.hash(state);
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self::new(BigInt::from(value), 0)
    }
}

impl From<BigInt> for Decimal {
    fn from(value: BigInt) -> Self {
        Self::new(value, 0)
    }
}

impl FromStr for Decimal {
    type Err = ArithmeticError;

    /// Parse `[+-]digits[.digits][e[+-]digits]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let format_error = || ArithmeticError::Format(s.to_string());

        let (mantissa, exponent) = match text.find(['e', 'E']) {
            Some(i) => {
                let exponent: i64 = text[i + 1..].parse().map_err(|_| format_error())?;
                if exponent.abs() > MAX_PARSE_EXPONENT {
                    return Err(format_error());
                }
                (&text[..i], exponent)
            }
            None => (text, 0),
        };

        let (negative, digits) = match mantissa.as_bytes().first() {
            Some(b'-') => (true, &mantissa[1..]),
            Some(b'+') => (false, &mantissa[1..]),
            _ => (false, mantissa),
        };
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if int_part.len() + frac_part.len() == 0 || !all_digits(int_part) || !all_digits(frac_part)
        {
            return Err(format_error());
        }

        let joined = format!("{int_part}{frac_part}");
        let magnitude = BigInt::parse_bytes(joined.as_bytes(), 10).ok_or_else(format_error)?;
        let unscaled = if negative { -magnitude } else { magnitude };
        Ok(Self::new(unscaled, frac_part.len() as i64 - exponent))
    }
}

impl fmt::Display for Decimal {
    /// Plain notation, never scientific.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.unscaled.magnitude().to_string();
        let sign = if self.is_negative() { "-" } else { "" };
        if self.scale <= 0 {
            let zeros = if self.is_zero() {
                0
            } else {
                self.scale.unsigned_abs() as usize
            };
            return write!(f, "{sign}{digits}{}", "0".repeat(zeros));
        }
        let scale = self.scale as usize;
        if digits.len() > scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            write!(f, "{sign}{int_part}.{frac_part}")
        } else {
            write!(f, "{sign}0.{}{digits}", "0".repeat(scale - digits.len()))
        }
    }
}

impl Add for &Decimal {
    type Output = Decimal;
    fn add(self, rhs: &Decimal) -> Decimal {
        let (a, b, scale) = self.aligned(rhs);
        Decimal::new(a + b, scale)
    }
}

impl Sub for &Decimal {
    type Output = Decimal;
    fn sub(self, rhs: &Decimal) -> Decimal {
        let (a, b, scale) = self.aligned(rhs);
        Decimal::new(a - b, scale)
    }
}

impl Mul for &Decimal {
    type Output = Decimal;
    fn mul(self, rhs: &Decimal) -> Decimal {
        Decimal::new(&self.unscaled * &rhs.unscaled, self.scale + rhs.scale)
    }
}

impl Add for Decimal {
    type Output = Decimal;
    fn add(self, rhs: Decimal) -> Decimal {
        &self + &rhs
    }
}

impl Sub for Decimal {
    type Output = Decimal;
    fn sub(self, rhs: Decimal) -> Decimal {
        &self - &rhs
    }
}

impl Mul for Decimal {
    type Output = Decimal;
    fn mul(self, rhs: Decimal) -> Decimal {
        &self * &rhs
    }
}

impl Neg for Decimal {
    type Output = Decimal;
    fn neg(self) -> Decimal {
        Decimal::new(-self.unscaled, self.scale)
    }
}

impl Neg for &Decimal {
    type Output = Decimal;
    fn neg(self) -> Decimal {
        Decimal::new(-&self.unscaled, self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn parses_and_displays_plain() {
        assert_eq!(dec("1.50").to_string(), "1.50");
        assert_eq!(dec("-0.005").to_string(), "-0.005");
        assert_eq!(dec("12").to_string(), "12");
        assert_eq!(dec("1.2e3").to_string(), "1200");
        assert_eq!(dec("5E-3").to_string(), "0.005");
        assert_eq!(dec(".5").to_string(), "0.5");
        assert_eq!(dec("+7.").to_string(), "7");
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", "-", ".", "1.2.3", "abc", "1e", "1e99999", "--1", "1 2"] {
            assert!(bad.parse::<Decimal>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn equality_is_by_value() {
        assert_eq!(dec("1.50"), dec("1.5"));
        assert_eq!(dec("100"), dec("1e2"));
        assert!(dec("0.1") < dec("0.11"));
        assert!(dec("-2") < dec("-1.5"));
    }

    #[test]
    fn exact_arithmetic() {
        assert_eq!(&dec("0.1") + &dec("0.2"), dec("0.3"));
        assert_eq!(&dec("1") - &dec("0.001"), dec("0.999"));
        assert_eq!(&dec("1.5") * &dec("-2.5"), dec("-3.75"));
    }

    #[test]
    fn rounding_modes() {
        let ctx = |mode| MathContext::new(2, mode);
        assert_eq!(dec("1.25").round(&ctx(RoundingMode::HalfEven)), dec("1.2"));
        assert_eq!(dec("1.35").round(&ctx(RoundingMode::HalfEven)), dec("1.4"));
        assert_eq!(dec("1.25").round(&ctx(RoundingMode::HalfUp)), dec("1.3"));
        assert_eq!(dec("1.25").round(&ctx(RoundingMode::HalfDown)), dec("1.2"));
        assert_eq!(dec("1.21").round(&ctx(RoundingMode::Up)), dec("1.3"));
        assert_eq!(dec("-1.29").round(&ctx(RoundingMode::Down)), dec("-1.2"));
        assert_eq!(dec("-1.21").round(&ctx(RoundingMode::Floor)), dec("-1.3"));
        assert_eq!(dec("-1.29").round(&ctx(RoundingMode::Ceiling)), dec("-1.2"));
    }

    #[test]
    fn rounding_carry_keeps_precision() {
        let rounded = dec("9.99").round(&MathContext::new(2, RoundingMode::HalfUp));
        assert_eq!(rounded, dec("10"));
        assert_eq!(rounded.precision(), 2);
    }

    #[test]
    fn divide_with_context() {
        let third = dec("1")
            .divide(&dec("3"), &MathContext::new(5, RoundingMode::HalfEven))
            .unwrap();
        assert_eq!(third.to_string(), "0.33333");
        let two_thirds = dec("2")
            .divide(&dec("3"), &MathContext::new(3, RoundingMode::HalfUp))
            .unwrap();
        assert_eq!(two_thirds.to_string(), "0.667");
        let big = dec("20000")
            .divide(&dec("3"), &MathContext::new(3, RoundingMode::HalfUp))
            .unwrap();
        assert_eq!(big, dec("6670"));
    }

    #[test]
    fn divide_unlimited_requires_termination() {
        assert_eq!(
            dec("1").divide(&dec("8"), &MathContext::UNLIMITED).unwrap(),
            dec("0.125")
        );
        assert_eq!(
            dec("1").divide(&dec("3"), &MathContext::UNLIMITED),
            Err(ArithmeticError::NonTerminating)
        );
        assert_eq!(
            dec("1").divide(&Decimal::zero(), &MathContext::DECIMAL64),
            Err(ArithmeticError::DivisionByZero)
        );
    }

    #[test]
    fn remainder_truncates() {
        assert_eq!(dec("7").remainder(&dec("3")).unwrap(), dec("1"));
        assert_eq!(dec("-7").remainder(&dec("3")).unwrap(), dec("-1"));
        assert_eq!(dec("7.5").remainder(&dec("2")).unwrap(), dec("1.5"));
        assert!(dec("1").remainder(&Decimal::zero()).is_err());
    }

    #[test]
    fn square_roots() {
        let ctx = MathContext::new(10, RoundingMode::HalfEven);
        assert_eq!(dec("2").sqrt(&ctx).unwrap().to_string(), "1.414213562");
        assert_eq!(dec("0.0004").sqrt(&ctx).unwrap(), dec("0.02"));
        assert_eq!(dec("1e6").sqrt(&ctx).unwrap(), dec("1000"));
        assert_eq!(dec("2.25").sqrt(&MathContext::UNLIMITED).unwrap(), dec("1.5"));
        assert!(dec("2").sqrt(&MathContext::UNLIMITED).is_err());
        assert!(matches!(dec("-4").sqrt(&ctx), Err(ArithmeticError::Domain(_))));
    }

    #[test]
    fn exact_integer_conversion() {
        assert_eq!(dec("42.000").to_i64_exact(), Ok(42));
        assert_eq!(dec("-3e2").to_i64_exact(), Ok(-300));
        assert!(dec("1.5").to_i64_exact().is_err());
        assert!(dec("1e30").to_i64_exact().is_err());
    }

    #[test]
    fn fraction_round_trip() {
        assert_eq!(dec("-1.25").to_fraction(), BigFraction::of(-5, 4).unwrap());
        assert_eq!(dec("3e2").to_fraction(), BigFraction::from(300));
        let back = Decimal::from_fraction(&BigFraction::of(-5, 4).unwrap(), &MathContext::UNLIMITED)
            .unwrap();
        assert_eq!(back, dec("-1.25"));
    }

    #[test]
    fn normalized_strips_trailing_zeros() {
        let n = dec("12.3400").normalized();
        assert_eq!(n.scale(), 2);
        assert_eq!(n.to_string(), "12.34");
        assert_eq!(dec("1200").normalized().to_string(), "1200");
        assert_eq!(dec("0.000").normalized().to_string(), "0");
    }
}
