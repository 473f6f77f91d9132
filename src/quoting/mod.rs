pub mod constants;
pub mod fetch;
pub mod sequence;
pub mod simulation;
pub mod slippage;
pub mod swap_quote;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;
