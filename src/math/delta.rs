use crate::math::bit_math::{
    checked_shift_left, div_round_up_if, mul_shift_right, ArithmeticError, Q64_RESOLUTION,
};
use num_traits::Zero;
use ruint::aliases::U256;

fn increasing_price_order(sqrt_price_0: u128, sqrt_price_1: u128) -> (u128, u128) {
    if sqrt_price_0 > sqrt_price_1 {
        (sqrt_price_1, sqrt_price_0)
    } else {
        (sqrt_price_0, sqrt_price_1)
    }
}

fn to_token_amount(value: U256) -> Result<u64, ArithmeticError> {
    u64::try_from(value).map_err(|_| ArithmeticError::Overflow)
}

/// Amount of token A between two sqrt prices: `liquidity * (upper - lower) / (upper * lower)`.
pub fn amount_delta_a(
    sqrt_price_0: u128,
    sqrt_price_1: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u64, ArithmeticError> {
    let (lower, upper) = increasing_price_order(sqrt_price_0, sqrt_price_1);

    if liquidity.is_zero() || lower == upper {
        return Ok(0);
    }

    let numerator = checked_shift_left(
        U256::from(liquidity) * U256::from(upper - lower),
        Q64_RESOLUTION,
    )?;
    let denominator = U256::from(lower) * U256::from(upper);

    to_token_amount(div_round_up_if(numerator, denominator, round_up)?)
}

/// Amount of token B between two sqrt prices: `liquidity * (upper - lower)`.
pub fn amount_delta_b(
    sqrt_price_0: u128,
    sqrt_price_1: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u64, ArithmeticError> {
    let (lower, upper) = increasing_price_order(sqrt_price_0, sqrt_price_1);

    to_token_amount(mul_shift_right(
        U256::from(liquidity),
        U256::from(upper - lower),
        Q64_RESOLUTION,
        round_up,
    )?)
}

/// The token whose amount is pinned by the caller's `amount` during a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FixedSide {
    TokenA,
    TokenB,
}

impl FixedSide {
    /// Input A (selling A) and output A (buying A) both pin token A.
    #[must_use]
    pub fn for_swap(a_to_b: bool, amount_specified_is_input: bool) -> Self {
        if a_to_b == amount_specified_is_input {
            Self::TokenA
        } else {
            Self::TokenB
        }
    }

    /// Amount of the fixed token moved between two prices, rounded up for inputs.
    pub fn fixed_delta(
        self,
        current_sqrt_price: u128,
        target_sqrt_price: u128,
        liquidity: u128,
        amount_specified_is_input: bool,
    ) -> Result<u64, ArithmeticError> {
        match self {
            Self::TokenA => amount_delta_a(
                current_sqrt_price,
                target_sqrt_price,
                liquidity,
                amount_specified_is_input,
            ),
            Self::TokenB => amount_delta_b(
                current_sqrt_price,
                target_sqrt_price,
                liquidity,
                amount_specified_is_input,
            ),
        }
    }

    /// Amount of the other token moved between two prices, rounded against the trader.
    pub fn unfixed_delta(
        self,
        current_sqrt_price: u128,
        target_sqrt_price: u128,
        liquidity: u128,
        amount_specified_is_input: bool,
    ) -> Result<u64, ArithmeticError> {
        match self {
            Self::TokenA => amount_delta_b(
                current_sqrt_price,
                target_sqrt_price,
                liquidity,
                !amount_specified_is_input,
            ),
            Self::TokenB => amount_delta_a(
                current_sqrt_price,
                target_sqrt_price,
                liquidity,
                !amount_specified_is_input,
            ),
        }
    }
}
