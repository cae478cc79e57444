//! Exact conversion of non-negative integers between radices 2 to 36.

use num_bigint::BigUint;
use num_traits::Num;

use crate::error::ArithmeticError;

pub const MIN_RADIX: u32 = 2;
pub const MAX_RADIX: u32 = 36;

fn check_radix(radix: u32) -> Result<(), ArithmeticError> {
    if (MIN_RADIX..=MAX_RADIX).contains(&radix) {
        Ok(())
    } else {
        Err(ArithmeticError::InvalidRadix(radix))
    }
}

/// Parse `digits` in `radix`. Letters are case-insensitive and leading
/// zeros are allowed; signs and separators are not.
pub fn parse_radix(digits: &str, radix: u32) -> Result<BigUint, ArithmeticError> {
    check_radix(radix)?;
    let digits = digits.trim();
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(ArithmeticError::Format(digits.to_string()));
    }
    BigUint::from_str_radix(digits, radix).map_err(|_| ArithmeticError::Format(digits.to_string()))
}

/// Render `value` in `radix` with lowercase digits.
pub fn to_radix(value: &BigUint, radix: u32) -> Result<String, ArithmeticError> {
    check_radix(radix)?;
    Ok(value.to_str_radix(radix))
}

/// Convert a digit string from radix `from` to radix `to`.
pub fn convert_base(digits: &str, from: u32, to: u32) -> Result<String, ArithmeticError> {
    to_radix(&parse_radix(digits, from)?, to)
}
