use crate::math::bit_math::{
    checked_shift_left, div_round_up, div_round_up_if, ArithmeticError, Q64_RESOLUTION,
};
use crate::math::delta::FixedSide;
use crate::math::tick::{MAX_SQRT_PRICE, MIN_SQRT_PRICE};
use ruint::aliases::U256;
use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Error)]
pub enum PriceMathError {
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
    #[error("sqrt price out of bounds")]
    PriceBoundExceeded,
}

/// Price after adding (input) or removing (output) `amount` of token A, rounded up.
///
/// Computes `liquidity * sqrt_price / (liquidity ± amount * sqrt_price)` in Q64.64.
pub fn next_sqrt_price_from_a_round_up(
    sqrt_price: u128,
    liquidity: u128,
    amount: u64,
    amount_specified_is_input: bool,
) -> Result<u128, PriceMathError> {
    if amount == 0 {
        return Ok(sqrt_price);
    }

    let product = U256::from(sqrt_price) * U256::from(amount);
    let numerator = checked_shift_left(
        U256::from(liquidity) * U256::from(sqrt_price),
        Q64_RESOLUTION,
    )?;
    let liquidity_shifted = U256::from(liquidity) << Q64_RESOLUTION;

    let denominator = if amount_specified_is_input {
        liquidity_shifted + product
    } else {
        // removing at least the whole reserve of token A
        if liquidity_shifted <= product {
            return Err(ArithmeticError::DivideByZero.into());
        }
        liquidity_shifted - product
    };

    let price = div_round_up(numerator, denominator)?;

    match u128::try_from(price) {
        Ok(price) if (MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&price) => Ok(price),
        _ => Err(PriceMathError::PriceBoundExceeded),
    }
}

/// Price after adding (input) or removing (output) `amount` of token B, rounded down.
pub fn next_sqrt_price_from_b_round_down(
    sqrt_price: u128,
    liquidity: u128,
    amount: u64,
    amount_specified_is_input: bool,
) -> Result<u128, PriceMathError> {
    let amount_x64 = U256::from(amount) << Q64_RESOLUTION;

    // the price moves less on input and more on output
    let delta = div_round_up_if(
        amount_x64,
        U256::from(liquidity),
        !amount_specified_is_input,
    )?;
    let delta = u128::try_from(delta).map_err(|_| ArithmeticError::Overflow)?;

    if amount_specified_is_input {
        sqrt_price.checked_add(delta)
    } else {
        sqrt_price.checked_sub(delta)
    }
    .ok_or(PriceMathError::PriceBoundExceeded)
}

pub fn next_sqrt_price(
    sqrt_price: u128,
    liquidity: u128,
    amount: u64,
    amount_specified_is_input: bool,
    a_to_b: bool,
) -> Result<u128, PriceMathError> {
    match FixedSide::for_swap(a_to_b, amount_specified_is_input) {
        FixedSide::TokenA => next_sqrt_price_from_a_round_up(
            sqrt_price,
            liquidity,
            amount,
            amount_specified_is_input,
        ),
        FixedSide::TokenB => next_sqrt_price_from_b_round_down(
            sqrt_price,
            liquidity,
            amount,
            amount_specified_is_input,
        ),
    }
}
