use crate::math::bit_math::ArithmeticError;
use crate::math::sqrt_price::PriceMathError;
use crate::math::tick::{MAX_SQRT_PRICE, MIN_SQRT_PRICE};
use crate::quoting::constants::MAX_TICK_ARRAY_CROSSINGS;
use crate::quoting::sequence::{TickArraySequence, TickArraySequenceError};
use crate::quoting::simulation::{simulate_swap, SimulateSwapError};
use crate::quoting::slippage::adjust_for_slippage;
use crate::quoting::types::{SwapQuote, SwapQuoteParams};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Error)]
pub enum SwapQuoteError {
    #[error("sqrt price limit is out of bounds")]
    SqrtPriceOutOfBounds,
    #[error("sqrt price limit is in the opposite direction of the trade")]
    InvalidSqrtPriceLimitDirection,
    #[error("amount is zero")]
    ZeroTradableAmount,
    #[error("output amount is below the other amount threshold")]
    AmountOutBelowMinimum,
    #[error("input amount is above the other amount threshold")]
    AmountInAboveMaximum,
    #[error("swap traverses more tick arrays than a swap instruction accepts")]
    TickArrayCrossingAboveMax,
    #[error("tick array is not initialized")]
    TickArrayIndexNotInitialized,
    #[error("invalid tick array sequence")]
    InvalidTickArraySequence,
    #[error("swap runs past the supplied tick arrays")]
    OutOfSequenceBounds,
    #[error("arithmetic overflow")]
    ArithmeticOverflow,
    #[error("division by zero")]
    DivideByZero,
    #[error("sqrt price out of bounds")]
    PriceBoundExceeded,
}

impl From<ArithmeticError> for SwapQuoteError {
    fn from(err: ArithmeticError) -> Self {
        match err {
            ArithmeticError::Overflow => Self::ArithmeticOverflow,
            ArithmeticError::DivideByZero => Self::DivideByZero,
        }
    }
}

impl From<PriceMathError> for SwapQuoteError {
    fn from(err: PriceMathError) -> Self {
        match err {
            PriceMathError::Arithmetic(err) => err.into(),
            PriceMathError::PriceBoundExceeded => Self::PriceBoundExceeded,
        }
    }
}

impl From<TickArraySequenceError> for SwapQuoteError {
    fn from(err: TickArraySequenceError) -> Self {
        match err {
            TickArraySequenceError::ArrayNotInitialized(_) => Self::TickArrayIndexNotInitialized,
            TickArraySequenceError::OutOfSequenceBounds(_) => Self::OutOfSequenceBounds,
            TickArraySequenceError::Empty
            | TickArraySequenceError::TickSpacingCannotBeZero
            | TickArraySequenceError::NonSequentialArray(_) => Self::InvalidTickArraySequence,
        }
    }
}

impl From<SimulateSwapError> for SwapQuoteError {
    fn from(err: SimulateSwapError) -> Self {
        match err {
            SimulateSwapError::Sequence(err) => err.into(),
            SimulateSwapError::Math(err) => err.into(),
        }
    }
}

/// Price limit that lets a swap run as far as the protocol allows.
#[must_use]
pub fn default_sqrt_price_limit(a_to_b: bool) -> u128 {
    if a_to_b {
        MIN_SQRT_PRICE
    } else {
        MAX_SQRT_PRICE
    }
}

/// Quotes a swap from already fetched pool and tick array data.
///
/// The estimated amounts are adjusted up by the slippage tolerance. `other_amount_threshold` is
/// checked against the unadjusted amounts, and a zero threshold disables the check.
pub fn swap_quote_with_params<A: Clone>(
    params: &SwapQuoteParams<A>,
) -> Result<SwapQuote<A>, SwapQuoteError> {
    let SwapQuoteParams {
        ref pool,
        amount,
        other_amount_threshold,
        sqrt_price_limit,
        a_to_b,
        amount_specified_is_input,
        slippage_tolerance,
        ref tick_array_addresses,
        ref tick_arrays,
    } = *params;

    if !(MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&sqrt_price_limit) {
        return Err(SwapQuoteError::SqrtPriceOutOfBounds);
    }

    if (a_to_b && sqrt_price_limit > pool.sqrt_price)
        || (!a_to_b && sqrt_price_limit < pool.sqrt_price)
    {
        return Err(SwapQuoteError::InvalidSqrtPriceLimitDirection);
    }

    if amount == 0 {
        return Err(SwapQuoteError::ZeroTradableAmount);
    }

    if tick_array_addresses.len() != tick_arrays.len() {
        return Err(SwapQuoteError::InvalidTickArraySequence);
    }
    let last_address = tick_array_addresses
        .last()
        .ok_or(SwapQuoteError::InvalidTickArraySequence)?;

    let mut sequence = TickArraySequence::new(tick_arrays, pool.tick_spacing, a_to_b)?;

    let simulation = simulate_swap(
        pool,
        &mut sequence,
        amount,
        sqrt_price_limit,
        amount_specified_is_input,
        a_to_b,
    )?;

    let (amount_in, amount_out) = if a_to_b {
        (simulation.amount_a, simulation.amount_b)
    } else {
        (simulation.amount_b, simulation.amount_a)
    };

    if other_amount_threshold != 0 {
        if amount_specified_is_input && amount_out < other_amount_threshold {
            debug!(amount_out, other_amount_threshold, "quote below minimum output");
            return Err(SwapQuoteError::AmountOutBelowMinimum);
        }
        if !amount_specified_is_input && amount_in > other_amount_threshold {
            debug!(amount_in, other_amount_threshold, "quote above maximum input");
            return Err(SwapQuoteError::AmountInAboveMaximum);
        }
    }

    let estimated_amount_in = adjust_for_slippage(amount_in, slippage_tolerance, true)?;
    let estimated_amount_out = adjust_for_slippage(amount_out, slippage_tolerance, true)?;

    let touched = sequence.num_touched_arrays();
    if touched > MAX_TICK_ARRAY_CROSSINGS {
        debug!(touched, "quote crosses too many tick arrays");
        return Err(SwapQuoteError::TickArrayCrossingAboveMax);
    }

    debug!(
        amount_in,
        amount_out,
        fee_amount = simulation.fee_amount,
        end_tick_index = simulation.end_tick_index,
        touched,
        "quoted swap"
    );

    let instruction_tick_array =
        |slot: usize| tick_array_addresses.get(slot).unwrap_or(last_address).clone();

    Ok(SwapQuote {
        estimated_amount_in,
        estimated_amount_out,
        estimated_end_tick_index: simulation.end_tick_index,
        estimated_end_sqrt_price: simulation.end_sqrt_price,
        estimated_fee_amount: simulation.fee_amount,
        amount,
        other_amount_threshold,
        sqrt_price_limit,
        a_to_b,
        amount_specified_is_input,
        tick_arrays: [
            instruction_tick_array(0),
            instruction_tick_array(1),
            instruction_tick_array(2),
        ],
    })
}
