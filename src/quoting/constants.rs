pub use crate::math::tick_index::TICK_ARRAY_SIZE;

/// Tick arrays a single swap instruction accepts, and therefore the most a quote may touch.
pub const MAX_TICK_ARRAY_CROSSINGS: usize = 3;
