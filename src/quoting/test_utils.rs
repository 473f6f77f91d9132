use crate::quoting::types::{PoolState, Tick, TickArray};

pub const ONE: u128 = 1 << 64;
pub const LIQUIDITY: u128 = 1_000_000_000_000;

/// Tick array whose ticks at `initialized_offsets` carry a zero liquidity delta.
pub fn tick_array(start_tick_index: i32, initialized_offsets: &[usize]) -> TickArray {
    let mut tick_array = TickArray::new(start_tick_index);
    for offset in initialized_offsets {
        tick_array.ticks[*offset] = Tick {
            initialized: true,
            liquidity_net: 0,
            liquidity_gross: 1,
        };
    }
    tick_array
}

pub fn set_liquidity_net(tick_array: &mut TickArray, offset: usize, liquidity_net: i128) {
    tick_array.ticks[offset] = Tick {
        initialized: true,
        liquidity_net,
        liquidity_gross: liquidity_net.unsigned_abs(),
    };
}

/// Pool at price 1 with 0.3% fees and a 3% protocol share.
pub fn pool(tick_current_index: i32, tick_spacing: u16) -> PoolState {
    PoolState {
        sqrt_price: ONE,
        tick_current_index,
        liquidity: LIQUIDITY,
        fee_rate: 3000,
        protocol_fee_rate: 300,
        fee_growth_global_a: 0,
        fee_growth_global_b: 0,
        tick_spacing,
    }
}
