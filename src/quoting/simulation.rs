use crate::math::bit_math::ArithmeticError;
use crate::math::sqrt_price::PriceMathError;
use crate::math::swap::{calculate_fees, compute_swap_step, SwapStepResult};
use crate::math::tick::{sqrt_price_to_tick_index, tick_index_to_sqrt_price};
use crate::quoting::sequence::{TickArraySequence, TickArraySequenceError};
use crate::quoting::types::PoolState;
use thiserror::Error;
use tracing::trace;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Error)]
pub enum SimulateSwapError {
    #[error(transparent)]
    Sequence(#[from] TickArraySequenceError),
    #[error(transparent)]
    Math(#[from] PriceMathError),
}

impl From<ArithmeticError> for SimulateSwapError {
    fn from(err: ArithmeticError) -> Self {
        Self::Math(err.into())
    }
}

/// Outcome of running a swap to completion against a pool snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapSimulation {
    pub amount_a: u64,
    pub amount_b: u64,
    pub end_tick_index: i32,
    pub end_sqrt_price: u128,
    pub end_liquidity: u128,
    /// Total fee charged on the input token, protocol share included.
    pub fee_amount: u64,
    pub protocol_fee: u64,
    /// Global fee growth of the input token after the swap.
    pub fee_growth_global_input: u128,
}

/// Applies a tick's `liquidity_net` when the price crosses it in the given direction.
pub fn apply_liquidity_net(
    liquidity: u128,
    liquidity_net: i128,
    a_to_b: bool,
) -> Result<u128, ArithmeticError> {
    // liquidity_net is defined for upward crossings
    let delta = if a_to_b {
        liquidity_net
            .checked_neg()
            .ok_or(ArithmeticError::Overflow)?
    } else {
        liquidity_net
    };

    if delta >= 0 {
        liquidity.checked_add(delta.unsigned_abs())
    } else {
        liquidity.checked_sub(delta.unsigned_abs())
    }
    .ok_or(ArithmeticError::Overflow)
}

/// Step-by-step swap execution over a [`TickArraySequence`].
#[derive(Debug)]
pub struct SwapSimulator<'s, 'a> {
    sequence: &'s mut TickArraySequence<'a>,
    amount: u64,
    sqrt_price_limit: u128,
    amount_specified_is_input: bool,
    a_to_b: bool,
    fee_rate: u16,
    protocol_fee_rate: u16,
    amount_remaining: u64,
    amount_calculated: u64,
    sqrt_price: u128,
    tick_index: i32,
    liquidity: u128,
    fee_amount: u64,
    protocol_fee: u64,
    fee_growth_global_input: u128,
}

impl<'s, 'a> SwapSimulator<'s, 'a> {
    pub fn new(
        pool: &PoolState,
        sequence: &'s mut TickArraySequence<'a>,
        amount: u64,
        sqrt_price_limit: u128,
        amount_specified_is_input: bool,
        a_to_b: bool,
    ) -> Self {
        Self {
            sequence,
            amount,
            sqrt_price_limit,
            amount_specified_is_input,
            a_to_b,
            fee_rate: pool.fee_rate,
            protocol_fee_rate: pool.protocol_fee_rate,
            amount_remaining: amount,
            amount_calculated: 0,
            sqrt_price: pool.sqrt_price,
            tick_index: pool.tick_current_index,
            liquidity: pool.liquidity,
            fee_amount: 0,
            protocol_fee: 0,
            fee_growth_global_input: if a_to_b {
                pool.fee_growth_global_a
            } else {
                pool.fee_growth_global_b
            },
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.amount_remaining == 0 || self.sqrt_price == self.sqrt_price_limit
    }

    /// Trades up to the next initialized tick (or the price limit) and returns the step taken,
    /// or `None` once the swap is complete.
    pub fn next_step(&mut self) -> Result<Option<SwapStepResult>, SimulateSwapError> {
        if self.is_complete() {
            return Ok(None);
        }

        let (next_tick_index, next_tick) =
            self.sequence.find_next_initialized_tick_index(self.tick_index)?;
        let next_tick_sqrt_price = tick_index_to_sqrt_price(next_tick_index)
            .ok_or(PriceMathError::PriceBoundExceeded)?;

        let sqrt_price_target = if self.a_to_b {
            next_tick_sqrt_price.max(self.sqrt_price_limit)
        } else {
            next_tick_sqrt_price.min(self.sqrt_price_limit)
        };

        let step = compute_swap_step(
            self.amount_remaining,
            self.fee_rate,
            self.liquidity,
            self.sqrt_price,
            sqrt_price_target,
            self.amount_specified_is_input,
            self.a_to_b,
        )?;

        let amount_in_with_fee = step
            .amount_in
            .checked_add(step.fee_amount)
            .ok_or(ArithmeticError::Overflow)?;

        let (consumed, calculated) = if self.amount_specified_is_input {
            (amount_in_with_fee, step.amount_out)
        } else {
            (step.amount_out, amount_in_with_fee)
        };

        self.amount_remaining = self
            .amount_remaining
            .checked_sub(consumed)
            .ok_or(ArithmeticError::Overflow)?;
        self.amount_calculated = self
            .amount_calculated
            .checked_add(calculated)
            .ok_or(ArithmeticError::Overflow)?;
        self.fee_amount = self
            .fee_amount
            .checked_add(step.fee_amount)
            .ok_or(ArithmeticError::Overflow)?;

        let (protocol_fee, fee_growth_global_input) = calculate_fees(
            step.fee_amount,
            self.protocol_fee_rate,
            self.liquidity,
            self.fee_growth_global_input,
        );
        self.protocol_fee = self
            .protocol_fee
            .checked_add(protocol_fee)
            .ok_or(ArithmeticError::Overflow)?;
        self.fee_growth_global_input = fee_growth_global_input;

        if step.next_sqrt_price == next_tick_sqrt_price {
            if let Some(tick) = next_tick {
                self.liquidity =
                    apply_liquidity_net(self.liquidity, tick.liquidity_net, self.a_to_b)?;
                trace!(
                    tick_index = next_tick_index,
                    liquidity = self.liquidity,
                    "crossed initialized tick"
                );
            }

            self.tick_index = if self.a_to_b {
                next_tick_index - 1
            } else {
                next_tick_index
            };
        } else if step.next_sqrt_price != self.sqrt_price {
            self.tick_index = sqrt_price_to_tick_index(step.next_sqrt_price)
                .ok_or(PriceMathError::PriceBoundExceeded)?;
        }

        self.sqrt_price = step.next_sqrt_price;

        trace!(
            amount_in = step.amount_in,
            amount_out = step.amount_out,
            fee_amount = step.fee_amount,
            sqrt_price = self.sqrt_price,
            tick_index = self.tick_index,
            "swap step"
        );

        Ok(Some(step))
    }

    #[must_use]
    pub fn finish(self) -> SwapSimulation {
        // amount_remaining only ever decreases from amount
        let amount_swapped = self.amount - self.amount_remaining;

        let (amount_a, amount_b) = if self.a_to_b == self.amount_specified_is_input {
            (amount_swapped, self.amount_calculated)
        } else {
            (self.amount_calculated, amount_swapped)
        };

        SwapSimulation {
            amount_a,
            amount_b,
            end_tick_index: self.tick_index,
            end_sqrt_price: self.sqrt_price,
            end_liquidity: self.liquidity,
            fee_amount: self.fee_amount,
            protocol_fee: self.protocol_fee,
            fee_growth_global_input: self.fee_growth_global_input,
        }
    }
}

/// Runs the swap until the amount is exhausted or the price reaches `sqrt_price_limit`.
pub fn simulate_swap(
    pool: &PoolState,
    sequence: &mut TickArraySequence,
    amount: u64,
    sqrt_price_limit: u128,
    amount_specified_is_input: bool,
    a_to_b: bool,
) -> Result<SwapSimulation, SimulateSwapError> {
    let mut simulator = SwapSimulator::new(
        pool,
        sequence,
        amount,
        sqrt_price_limit,
        amount_specified_is_input,
        a_to_b,
    );

    while simulator.next_step()?.is_some() {}

    Ok(simulator.finish())
}
