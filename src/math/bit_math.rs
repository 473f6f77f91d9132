use ruint::aliases::U256;
use thiserror::Error;

/// Number of fractional bits in a Q64.64 sqrt price.
pub const Q64_RESOLUTION: usize = 64;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Error)]
pub enum ArithmeticError {
    #[error("arithmetic overflow")]
    Overflow,
    #[error("division by zero")]
    DivideByZero,
}

#[must_use]
pub fn is_over_limit(value: U256, bits: usize) -> bool {
    value.bit_len() > bits
}

/// Shifts `value` left without dropping any set bits.
pub fn checked_shift_left(value: U256, shift: usize) -> Result<U256, ArithmeticError> {
    if value.is_zero() {
        return Ok(value);
    }

    if value.bit_len() + shift > 256 {
        return Err(ArithmeticError::Overflow);
    }

    Ok(value << shift)
}

/// Computes `(a * b) >> shift`, rounding up when any of the shifted out bits is set.
pub fn mul_shift_right(
    a: U256,
    b: U256,
    shift: usize,
    round_up: bool,
) -> Result<U256, ArithmeticError> {
    let product = a.checked_mul(b).ok_or(ArithmeticError::Overflow)?;
    let shifted = product >> shift;

    if round_up && (shifted << shift) != product {
        shifted
            .checked_add(U256::ONE)
            .ok_or(ArithmeticError::Overflow)
    } else {
        Ok(shifted)
    }
}

pub fn div_round_up_if(
    numerator: U256,
    denominator: U256,
    round_up: bool,
) -> Result<U256, ArithmeticError> {
    if denominator.is_zero() {
        return Err(ArithmeticError::DivideByZero);
    }

    let (quotient, remainder) = numerator.div_rem(denominator);

    if round_up && !remainder.is_zero() {
        // a non-zero remainder implies a denominator of at least 2
        Ok(quotient + U256::ONE)
    } else {
        Ok(quotient)
    }
}

pub fn div_round_up(numerator: U256, denominator: U256) -> Result<U256, ArithmeticError> {
    div_round_up_if(numerator, denominator, true)
}

/// `a * b / d` over `u128` operands with a 256-bit intermediate.
pub fn checked_mul_div(
    a: u128,
    b: u128,
    denominator: u128,
    round_up: bool,
) -> Result<u128, ArithmeticError> {
    let product = U256::from(a) * U256::from(b);
    let result = div_round_up_if(product, U256::from(denominator), round_up)?;

    u128::try_from(result).map_err(|_| ArithmeticError::Overflow)
}
