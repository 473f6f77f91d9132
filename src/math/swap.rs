use crate::math::bit_math::{checked_mul_div, ArithmeticError};
use crate::math::delta::FixedSide;
use crate::math::sqrt_price::{next_sqrt_price, PriceMathError};
use num_traits::Zero;

/// Denominator of `fee_rate`, which is expressed in hundredths of a basis point.
pub const FEE_RATE_MUL_VALUE: u128 = 1_000_000;
/// Denominator of `protocol_fee_rate`, which is expressed in basis points of the fee.
pub const PROTOCOL_FEE_RATE_MUL_VALUE: u128 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapStepResult {
    pub amount_in: u64,
    pub amount_out: u64,
    pub next_sqrt_price: u128,
    pub fee_amount: u64,
}

fn to_u64(value: u128) -> Result<u64, ArithmeticError> {
    u64::try_from(value).map_err(|_| ArithmeticError::Overflow)
}

/// Trades `amount_remaining` against a single liquidity range, moving the price from
/// `sqrt_price_current` towards `sqrt_price_target` and stopping early when the amount runs out.
pub fn compute_swap_step(
    amount_remaining: u64,
    fee_rate: u16,
    liquidity: u128,
    sqrt_price_current: u128,
    sqrt_price_target: u128,
    amount_specified_is_input: bool,
    a_to_b: bool,
) -> Result<SwapStepResult, PriceMathError> {
    let fixed_side = FixedSide::for_swap(a_to_b, amount_specified_is_input);
    let fee_rate = u128::from(fee_rate);

    let mut amount_fixed_delta = fixed_side.fixed_delta(
        sqrt_price_current,
        sqrt_price_target,
        liquidity,
        amount_specified_is_input,
    )?;

    let amount_calc = if amount_specified_is_input {
        to_u64(checked_mul_div(
            u128::from(amount_remaining),
            FEE_RATE_MUL_VALUE - fee_rate,
            FEE_RATE_MUL_VALUE,
            false,
        )?)?
    } else {
        amount_remaining
    };

    let next_sqrt_price = if amount_calc >= amount_fixed_delta {
        sqrt_price_target
    } else {
        next_sqrt_price(
            sqrt_price_current,
            liquidity,
            amount_calc,
            amount_specified_is_input,
            a_to_b,
        )?
    };

    let is_max_swap = next_sqrt_price == sqrt_price_target;

    let amount_unfixed_delta = fixed_side.unfixed_delta(
        sqrt_price_current,
        next_sqrt_price,
        liquidity,
        amount_specified_is_input,
    )?;

    // a partial step only moves the fixed token up to the price actually reached
    if !is_max_swap {
        amount_fixed_delta = fixed_side.fixed_delta(
            sqrt_price_current,
            next_sqrt_price,
            liquidity,
            amount_specified_is_input,
        )?;
    }

    let (amount_in, mut amount_out) = if amount_specified_is_input {
        (amount_fixed_delta, amount_unfixed_delta)
    } else {
        (amount_unfixed_delta, amount_fixed_delta)
    };

    if !amount_specified_is_input && amount_out > amount_remaining {
        amount_out = amount_remaining;
    }

    let fee_amount = if amount_specified_is_input && !is_max_swap {
        amount_remaining
            .checked_sub(amount_in)
            .ok_or(ArithmeticError::Overflow)?
    } else {
        to_u64(checked_mul_div(
            u128::from(amount_in),
            fee_rate,
            FEE_RATE_MUL_VALUE - fee_rate,
            true,
        )?)?
    };

    Ok(SwapStepResult {
        amount_in,
        amount_out,
        next_sqrt_price,
        fee_amount,
    })
}

/// Splits a step fee into the protocol share and the fee growth per unit of liquidity.
///
/// Fee growth is left unchanged when there is no active liquidity.
#[must_use]
pub fn calculate_fees(
    fee_amount: u64,
    protocol_fee_rate: u16,
    liquidity: u128,
    fee_growth_global: u128,
) -> (u64, u128) {
    // protocol_fee_rate is at most PROTOCOL_FEE_RATE_MUL_VALUE so the share never exceeds the fee
    let protocol_fee =
        (u128::from(fee_amount) * u128::from(protocol_fee_rate) / PROTOCOL_FEE_RATE_MUL_VALUE)
            .min(u128::from(fee_amount));
    let lp_fee = u128::from(fee_amount) - protocol_fee;

    let fee_growth_global = if liquidity.is_zero() {
        fee_growth_global
    } else {
        fee_growth_global.wrapping_add((lp_fee << 64) / liquidity)
    };

    (protocol_fee as u64, fee_growth_global)
}
