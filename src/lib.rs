#![no_std]
extern crate alloc;

pub use ruint::aliases::U256;

pub mod math;
pub mod quoting;

pub use quoting::fetch::{swap_quote_by_token, FetchSwapQuoteError, TickArraySource};
pub use quoting::slippage::SlippageTolerance;
pub use quoting::swap_quote::{default_sqrt_price_limit, swap_quote_with_params, SwapQuoteError};
pub use quoting::types::{PoolState, SwapQuote, SwapQuoteParams, Tick, TickArray};
