use crate::math::bit_math::{checked_mul_div, ArithmeticError};
use derive_more::{From, Into};

/// Tolerated price movement as a `numerator / denominator` ratio, e.g. `(1, 100)` for 1%.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, From, Into)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlippageTolerance {
    pub numerator: u64,
    pub denominator: u64,
}

impl SlippageTolerance {
    pub const ZERO: Self = Self {
        numerator: 0,
        denominator: 1,
    };

    #[must_use]
    pub const fn new(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
}

impl Default for SlippageTolerance {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Scales `amount` by `(d + n) / d` when adjusting up or by `d / (d + n)` when adjusting down,
/// rounding down in both cases.
pub fn adjust_for_slippage(
    amount: u64,
    slippage_tolerance: SlippageTolerance,
    adjust_up: bool,
) -> Result<u64, ArithmeticError> {
    let SlippageTolerance {
        numerator,
        denominator,
    } = slippage_tolerance;

    if denominator == 0 {
        return Err(ArithmeticError::DivideByZero);
    }

    let widened = u128::from(denominator) + u128::from(numerator);
    let adjusted = if adjust_up {
        checked_mul_div(u128::from(amount), widened, u128::from(denominator), false)?
    } else {
        checked_mul_div(u128::from(amount), u128::from(denominator), widened, false)?
    };

    u64::try_from(adjusted).map_err(|_| ArithmeticError::Overflow)
}
