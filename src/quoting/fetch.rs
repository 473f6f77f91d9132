use crate::math::tick::{MAX_TICK_INDEX, MIN_TICK_INDEX};
use crate::math::tick_index::{start_tick_index, ticks_in_array};
use crate::quoting::constants::MAX_TICK_ARRAY_CROSSINGS;
use crate::quoting::slippage::SlippageTolerance;
use crate::quoting::swap_quote::{default_sqrt_price_limit, swap_quote_with_params, SwapQuoteError};
use crate::quoting::types::{PoolState, SwapQuote, SwapQuoteParams, TickArray};
use alloc::vec::Vec;
use core::fmt::Debug;
use thiserror::Error;
use tracing::debug;

/// Account access needed to quote a swap for one pool.
pub trait TickArraySource {
    type Address: Clone + Debug;
    type Error: Debug;

    /// Address of the pool's tick array account starting at `start_tick_index`.
    fn tick_array_address(&self, start_tick_index: i32) -> Self::Address;

    /// Loads the tick arrays at `addresses`, yielding `None` for accounts that do not exist.
    fn list_tick_arrays(
        &self,
        addresses: &[Self::Address],
        refresh: bool,
    ) -> Result<Vec<Option<TickArray>>, Self::Error>;
}

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum FetchSwapQuoteError<A: Debug, E: Debug> {
    #[error("failed to fetch tick arrays")]
    Fetch(E),
    #[error("tick arrays {0:?} need to be initialized")]
    /// The swap would traverse tick arrays that have no account yet.
    TickArraysNeedInitialization(Vec<A>),
    #[error(transparent)]
    Quote(#[from] SwapQuoteError),
}

/// Start tick indices of the tick arrays a swap from `tick_current_index` may traverse.
///
/// The first entry is the array containing the current tick, followed by its neighbours in the
/// direction of the trade. Arrays entirely outside the protocol tick range are left out.
#[must_use]
pub fn tick_array_start_indices_for_swap(
    tick_current_index: i32,
    tick_spacing: u16,
    a_to_b: bool,
) -> Vec<i32> {
    if tick_spacing == 0 {
        return Vec::new();
    }

    let span = ticks_in_array(tick_spacing);

    (0..MAX_TICK_ARRAY_CROSSINGS as i32)
        .map(|offset| {
            start_tick_index(
                tick_current_index,
                tick_spacing,
                if a_to_b { -offset } else { offset },
            )
        })
        .take_while(|start| *start <= MAX_TICK_INDEX && *start + span > MIN_TICK_INDEX)
        .collect()
}

/// Quotes a swap of `amount` of either pool token, fetching the tick arrays it needs.
///
/// The trade direction follows from which token is specified and whether it is the input. The
/// swap is quoted with the default price limit and no other amount threshold.
pub fn swap_quote_by_token<S: TickArraySource>(
    pool: &PoolState,
    specified_token_a: bool,
    amount: u64,
    amount_specified_is_input: bool,
    slippage_tolerance: SlippageTolerance,
    source: &S,
    refresh: bool,
) -> Result<SwapQuote<S::Address>, FetchSwapQuoteError<S::Address, S::Error>> {
    let a_to_b = specified_token_a == amount_specified_is_input;

    let tick_array_addresses: Vec<S::Address> =
        tick_array_start_indices_for_swap(pool.tick_current_index, pool.tick_spacing, a_to_b)
            .into_iter()
            .map(|start| source.tick_array_address(start))
            .collect();

    let tick_arrays = source
        .list_tick_arrays(&tick_array_addresses, refresh)
        .map_err(FetchSwapQuoteError::Fetch)?;

    let uninitialized: Vec<S::Address> = tick_array_addresses
        .iter()
        .zip(&tick_arrays)
        .filter(|(_, tick_array)| tick_array.is_none())
        .map(|(address, _)| address.clone())
        .collect();
    if !uninitialized.is_empty() {
        debug!(?uninitialized, "tick arrays need initialization");
        return Err(FetchSwapQuoteError::TickArraysNeedInitialization(
            uninitialized,
        ));
    }

    Ok(swap_quote_with_params(&SwapQuoteParams {
        pool: *pool,
        amount,
        other_amount_threshold: 0,
        sqrt_price_limit: default_sqrt_price_limit(a_to_b),
        a_to_b,
        amount_specified_is_input,
        slippage_tolerance,
        tick_array_addresses,
        tick_arrays,
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quoting::test_utils::{pool, tick_array};
    use alloc::collections::BTreeMap;
    use alloc::vec;
    use core::cell::Cell;

    #[derive(Default)]
    struct MockSource {
        tick_arrays: BTreeMap<i32, TickArray>,
        fail: bool,
        refreshed: Cell<bool>,
    }

    impl MockSource {
        fn with_arrays(tick_arrays: Vec<TickArray>) -> Self {
            Self {
                tick_arrays: tick_arrays
                    .into_iter()
                    .map(|tick_array| (tick_array.start_tick_index, tick_array))
                    .collect(),
                ..Self::default()
            }
        }
    }

    impl TickArraySource for MockSource {
        type Address = i32;
        type Error = &'static str;

        fn tick_array_address(&self, start_tick_index: i32) -> i32 {
            start_tick_index
        }

        fn list_tick_arrays(
            &self,
            addresses: &[i32],
            refresh: bool,
        ) -> Result<Vec<Option<TickArray>>, &'static str> {
            if self.fail {
                return Err("rpc unavailable");
            }
            self.refreshed.set(refresh);
            Ok(addresses
                .iter()
                .map(|address| self.tick_arrays.get(address).cloned())
                .collect())
        }
    }

    mod tick_array_start_indices_for_swap {
        use super::*;

        #[test]
        fn a_to_b_descends() {
            assert_eq!(
                tick_array_start_indices_for_swap(-1, 64, true),
                [-5632, -11264, -16896]
            );
        }

        #[test]
        fn b_to_a_ascends() {
            assert_eq!(
                tick_array_start_indices_for_swap(0, 64, false),
                [0, 5632, 11264]
            );
        }

        #[test]
        fn stops_at_protocol_range() {
            assert_eq!(
                tick_array_start_indices_for_swap(440000, 64, false),
                [439296]
            );
            assert_eq!(
                tick_array_start_indices_for_swap(-443000, 64, true),
                [-444928]
            );
        }

        #[test]
        fn zero_spacing() {
            assert!(tick_array_start_indices_for_swap(0, 0, true).is_empty());
        }
    }

    mod swap_quote_by_token {
        use super::*;

        fn source() -> MockSource {
            MockSource::with_arrays(vec![
                tick_array(-5632, &[0]),
                tick_array(-11264, &[]),
                tick_array(-16896, &[]),
            ])
        }

        #[test]
        fn exact_input_of_token_a() {
            let source = source();
            let quote = swap_quote_by_token(
                &pool(-1, 64),
                true,
                1_000_000,
                true,
                SlippageTolerance::ZERO,
                &source,
                true,
            )
            .unwrap();

            assert!(quote.a_to_b);
            assert_eq!(quote.estimated_amount_in, 1_000_000);
            assert_eq!(quote.estimated_amount_out, 996999);
            assert_eq!(quote.tick_arrays, [-5632, -11264, -16896]);
            assert!(source.refreshed.get());
        }

        #[test]
        fn exact_output_of_token_b() {
            let quote = swap_quote_by_token(
                &pool(-1, 64),
                false,
                1_000_000,
                false,
                SlippageTolerance::ZERO,
                &source(),
                false,
            )
            .unwrap();

            assert!(quote.a_to_b);
            assert_eq!(quote.estimated_amount_in, 1003012);
            assert_eq!(quote.estimated_amount_out, 1_000_000);
        }

        #[test]
        fn reports_missing_arrays() {
            let source = MockSource::with_arrays(vec![tick_array(-5632, &[0])]);
            assert_eq!(
                swap_quote_by_token(
                    &pool(-1, 64),
                    true,
                    1_000_000,
                    true,
                    SlippageTolerance::ZERO,
                    &source,
                    false,
                ),
                Err(FetchSwapQuoteError::TickArraysNeedInitialization(vec![
                    -11264, -16896
                ]))
            );
        }

        #[test]
        fn propagates_fetch_errors() {
            let source = MockSource {
                fail: true,
                ..MockSource::default()
            };
            assert_eq!(
                swap_quote_by_token(
                    &pool(-1, 64),
                    true,
                    1_000_000,
                    true,
                    SlippageTolerance::ZERO,
                    &source,
                    false,
                ),
                Err(FetchSwapQuoteError::Fetch("rpc unavailable"))
            );
        }

        #[test]
        fn propagates_quote_errors() {
            assert_eq!(
                swap_quote_by_token(
                    &pool(-1, 64),
                    true,
                    0,
                    true,
                    SlippageTolerance::ZERO,
                    &source(),
                    false,
                ),
                Err(FetchSwapQuoteError::Quote(SwapQuoteError::ZeroTradableAmount))
            );
        }
    }
}
