//! Complex numbers over arbitrary-precision decimals.

use std::fmt;
use std::str::FromStr;

use crate::decimal::{Decimal, MathContext};
use crate::error::ArithmeticError;

/// `re + im·i`. Equality compares both parts by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Complex {
    re: Decimal,
    im: Decimal,
}

impl Complex {
    pub fn new(re: Decimal, im: Decimal) -> Self {
        Self { re, im }
    }

    /// A value with no imaginary part.
    pub fn real(re: Decimal) -> Self {
        Self::new(re, Decimal::zero())
    }

    pub fn from_parts(re: i64, im: i64) -> Self {
        Self::new(Decimal::from(re), Decimal::from(im))
    }

    /// The imaginary unit.
    pub fn i() -> Self {
        Self::from_parts(0, 1)
    }

    pub fn real_part(&self) -> &Decimal {
        &self.re
    }

    pub fn imaginary_part(&self) -> &Decimal {
        &self.im
    }

    pub fn has_real_part(&self) -> bool {
        !self.re.is_zero()
    }

    pub fn has_imaginary_part(&self) -> bool {
        !self.im.is_zero()
    }

    /// Exact sum.
    pub fn sum(&self, other: &Self) -> Self {
        Self::new(&self.re + &other.re, &self.im + &other.im)
    }

    /// Sum with each part rounded to `ctx`.
    pub fn sum_with(&self, other: &Self, ctx: &MathContext) -> Self {
        Self::new(
            self.re.add_with(&other.re, ctx),
            self.im.add_with(&other.im, ctx),
        )
    }

    /// `(a+bi)(c+di) = (ac−bd) + (ad+bc)i`, each part rounded to `ctx`.
    pub fn multiply(&self, other: &Self, ctx: &MathContext) -> Self {
        let re = &(&self.re * &other.re) - &(&self.im * &other.im);
        let im = &(&self.re * &other.im) + &(&self.im * &other.re);
        Self::new(re.round(ctx), im.round(ctx))
    }

    /// Truncating remainder of two real values.
    pub fn remainder(&self, divisor: &Self) -> Result<Self, ArithmeticError> {
        if self.has_imaginary_part() || divisor.has_imaginary_part() {
            return Err(ArithmeticError::Domain(format!(
                "remainder is undefined for {self} and {divisor}"
            )));
        }
        Ok(Self::real(self.re.remainder(&divisor.re)?))
    }

    pub fn remainder_i64(&self, divisor: i64) -> Result<Self, ArithmeticError> {
        self.remainder(&Self::from(divisor))
    }

    /// The value as an `i64`. Fails on any imaginary part or a real part
    /// that is not an exact integer.
    pub fn long_value_exact(&self) -> Result<i64, ArithmeticError> {
        if self.has_imaginary_part() {
            return Err(ArithmeticError::NotExact(self.to_string()));
        }
        self.re.to_i64_exact()
    }
}

impl From<i64> for Complex {
    fn from(value: i64) -> Self {
        Self::real(Decimal::from(value))
    }
}

impl From<Decimal> for Complex {
    fn from(value: Decimal) -> Self {
        Self::real(value)
    }
}

fn parse_imaginary(part: &str, original: &str) -> Result<Decimal, ArithmeticError> {
    let coefficient = part
        .strip_suffix('i')
        .ok_or_else(|| ArithmeticError::Format(original.to_string()))?;
    match coefficient {
        "" | "+" => Ok(Decimal::one()),
        "-" => Ok(-Decimal::one()),
        _ => coefficient
            .parse()
            .map_err(|_| ArithmeticError::Format(original.to_string())),
    }
}

impl FromStr for Complex {
    type Err = ArithmeticError;

    /// Parse `a`, `bi` or `a±bi`. Whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(ArithmeticError::Format(s.to_string()));
        }
        let bytes = compact.as_bytes();
        let split = (1..bytes.len()).find(|&i| {
            matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E')
        });
        let real = |text: &str| -> Result<Decimal, ArithmeticError> {
            text.parse()
                .map_err(|_| ArithmeticError::Format(s.to_string()))
        };

        match split {
            Some(i) => Ok(Self::new(
                real(&compact[..i])?,
                parse_imaginary(&compact[i..], s)?,
            )),
            None if compact.ends_with('i') => {
                Ok(Self::new(Decimal::zero(), parse_imaginary(&compact, s)?))
            }
            None => Ok(Self::real(real(&compact)?)),
        }
    }
}

impl fmt::Display for Complex {
    /// `a`, `bi`, `a+bi` or `a-bi`, with a unit coefficient written as `i`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let re = self.re.normalized();
        let im = self.im.normalized();
        if im.is_zero() {
            return write!(f, "{re}");
        }
        let magnitude = im.abs();
        let coefficient = if magnitude == Decimal::one() {
            String::new()
        } else {
            magnitude.to_string()
        };
        let sign = if im.is_negative() { "-" } else { "+" };
        if re.is_zero() {
            let sign = if im.is_negative() { "-" } else { "" };
            write!(f, "{sign}{coefficient}i")
        } else {
            write!(f, "{re}{sign}{coefficient}i")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(s: &str) -> Complex {
        s.parse().unwrap()
    }

    #[test]
    fn parses_parts() {
        let z = c("3+4i");
        assert_eq!(z.real_part(), &Decimal::from(3));
        assert_eq!(z.imaginary_part(), &Decimal::from(4));
        assert_eq!(c("-2.5-i"), Complex::new("-2.5".parse().unwrap(), Decimal::from(-1)));
        assert_eq!(c("7i"), Complex::from_parts(0, 7));
        assert_eq!(c("-i"), Complex::from_parts(0, -1));
        assert_eq!(c(" 5 "), Complex::from(5));
        assert_eq!(c("1e2+3i"), Complex::from_parts(100, 3));
        assert_eq!(c("1e-2-1e1i"), Complex::new("0.01".parse().unwrap(), Decimal::from(-10)));
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", "3+4", "i3", "3+4j", "a+bi", "3++4i", "+"] {
            assert!(bad.parse::<Complex>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn real_values_have_no_imaginary_part() {
        let z = Complex::from(3);
        assert!(z.has_real_part());
        assert!(!z.has_imaginary_part());
        assert_eq!(z.long_value_exact(), Ok(3));
    }

    #[test]
    fn sum_is_exact() {
        assert_eq!(c("1+2i").sum(&c("3-2i")), c("4+0i"));
        assert_eq!(c("1+2i").sum(&c("3-2i")), Complex::from(4));
    }

    #[test]
    fn multiply_conjugates() {
        let product = c("1+i").multiply(&c("1-i"), &MathContext::DECIMAL64);
        assert_eq!(product, Complex::from(2));
        let product = c("2+3i").multiply(&c("4-5i"), &MathContext::DECIMAL64);
        assert_eq!(product, c("23+2i"));
    }

    #[test]
    fn remainder_needs_real_operands() {
        assert_eq!(Complex::from(103).remainder_i64(4), Ok(Complex::from(3)));
        assert!(matches!(
            c("1+i").remainder_i64(4),
            Err(ArithmeticError::Domain(_))
        ));
    }

    #[test]
    fn long_value_exact_rejects_imaginary_and_fractions() {
        assert!(c("2+i").long_value_exact().is_err());
        assert!(c("2.5").long_value_exact().is_err());
    }

    #[test]
    fn display_forms() {
        assert_eq!(Complex::from_parts(3, 4).to_string(), "3+4i");
        assert_eq!(Complex::from_parts(3, -4).to_string(), "3-4i");
        assert_eq!(Complex::from_parts(0, 1).to_string(), "i");
        assert_eq!(Complex::from_parts(0, -1).to_string(), "-i");
        assert_eq!(Complex::from_parts(-5, 0).to_string(), "-5");
        assert_eq!(Complex::from_parts(0, -6).to_string(), "-6i");
        assert_eq!(c("1.50+2.0i").to_string(), "1.5+2i");
    }

    #[test]
    fn display_parses_back() {
        for z in [c("3-4i"), c("i"), c("-7"), c("0.5-0.25i")] {
            assert_eq!(z.to_string().parse::<Complex>().unwrap(), z);
        }
    }
}
