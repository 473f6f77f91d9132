use crate::math::tick_index::TICK_ARRAY_SIZE;
use crate::quoting::slippage::SlippageTolerance;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde_big_array::BigArray;

/// Snapshot of the pool account fields read while quoting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolState {
    /// Q64.64 square root of the price of token A in token B.
    pub sqrt_price: u128,
    /// Tick whose price range contains `sqrt_price`.
    pub tick_current_index: i32,
    /// Liquidity active in the current tick range.
    pub liquidity: u128,
    /// Swap fee in hundredths of a basis point.
    pub fee_rate: u16,
    /// Share of the swap fee kept by the protocol, in basis points.
    pub protocol_fee_rate: u16,
    pub fee_growth_global_a: u128,
    pub fee_growth_global_b: u128,
    pub tick_spacing: u16,
}

/// Liquidity boundary stored at an initializable tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick {
    pub initialized: bool,
    /// Liquidity added when the price crosses this tick upwards.
    pub liquidity_net: i128,
    pub liquidity_gross: u128,
}

/// Fixed-size window of ticks beginning at `start_tick_index`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickArray {
    pub start_tick_index: i32,
    #[cfg_attr(feature = "serde", serde(with = "BigArray"))]
    pub ticks: [Tick; TICK_ARRAY_SIZE as usize],
}

impl TickArray {
    /// Creates an array with no initialized ticks.
    #[must_use]
    pub fn new(start_tick_index: i32) -> Self {
        Self {
            start_tick_index,
            ticks: [Tick::default(); TICK_ARRAY_SIZE as usize],
        }
    }

    #[must_use]
    pub fn tick(&self, offset_index: i32) -> Option<&Tick> {
        usize::try_from(offset_index)
            .ok()
            .and_then(|offset| self.ticks.get(offset))
    }
}

/// Everything needed to quote a swap against a pool without any I/O.
///
/// `tick_array_addresses` and `tick_arrays` are parallel lists ordered in the direction of the
/// trade, the first entry holding the array that contains the current tick.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapQuoteParams<A> {
    pub pool: PoolState,
    /// Amount of the specified token, an input if `amount_specified_is_input` and an output otherwise.
    pub amount: u64,
    /// Minimum output (exact input) or maximum input (exact output); zero disables the check.
    pub other_amount_threshold: u64,
    pub sqrt_price_limit: u128,
    pub a_to_b: bool,
    pub amount_specified_is_input: bool,
    pub slippage_tolerance: SlippageTolerance,
    pub tick_array_addresses: Vec<A>,
    pub tick_arrays: Vec<Option<TickArray>>,
}

/// Estimated result of a swap together with the arguments of the swap instruction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapQuote<A> {
    /// Input amount, adjusted up by the slippage tolerance.
    pub estimated_amount_in: u64,
    /// Output amount, adjusted up by the slippage tolerance.
    pub estimated_amount_out: u64,
    pub estimated_end_tick_index: i32,
    pub estimated_end_sqrt_price: u128,
    /// Total fee charged on the input token.
    pub estimated_fee_amount: u64,
    pub amount: u64,
    pub other_amount_threshold: u64,
    pub sqrt_price_limit: u128,
    pub a_to_b: bool,
    pub amount_specified_is_input: bool,
    /// Tick array accounts passed to the swap instruction, padded with the last supplied one.
    pub tick_arrays: [A; 3],
}
