pub mod bit_math;
pub mod delta;
pub mod sqrt_price;
pub mod swap;
pub mod tick;
pub mod tick_index;
