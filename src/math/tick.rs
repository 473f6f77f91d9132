use ruint::aliases::U256;

pub const MIN_TICK_INDEX: i32 = -443636;
pub const MAX_TICK_INDEX: i32 = 443636;

/// Q64.64 sqrt price of [`MIN_TICK_INDEX`].
pub const MIN_SQRT_PRICE: u128 = 4295048016;
/// Q64.64 sqrt price of [`MAX_TICK_INDEX`].
pub const MAX_SQRT_PRICE: u128 = 79226673515401279992447579055;

// sqrt(1.0001)^(2^i) in Q32.96 for positive ticks, starting at bit 1
const POSITIVE_TICK_FACTORS: [u128; 18] = [
    79236085330515764027303304731,
    79244008939048815603706035061,
    79259858533276714757314932305,
    79291567232598584799939703904,
    79355022692464371645785046466,
    79482085999252804386437311141,
    79736823300114093921829183326,
    80248749790819932309965073892,
    81282483887344747381513967011,
    83390072131320151908154831281,
    87770609709833776024991924138,
    97234110755111693312479820773,
    119332217159966728226237229890,
    179736315981702064433883588727,
    407748233172238350107850275304,
    2098478828474011932436660412517,
    55581415166113811149459800483533,
    38992368544603139932233054999993551,
];

// sqrt(1.0001)^(-2^i) in Q64.64 for negative ticks, starting at bit 1
const NEGATIVE_TICK_FACTORS: [u128; 18] = [
    18444899583751176498,
    18443055278223354162,
    18439367220385604838,
    18431993317065449817,
    18417254355718160513,
    18387811781193591352,
    18329067761203520168,
    18212142134806087854,
    17980523815641551639,
    17526086738831147013,
    16651378430235024244,
    15030750278693429944,
    12247334978882834399,
    8131365268884726200,
    3584323654723342297,
    696457651847595233,
    26294789957452057,
    37481735321082,
];

const BIT_PRECISION: u32 = 14;
// log_b(2) in Q32.32 where b = sqrt(1.0001)
const LOG_B_2_X32: i128 = 59543866431248;
const LOG_B_P_ERR_MARGIN_LOWER_X64: i128 = 184467440737095516;
const LOG_B_P_ERR_MARGIN_UPPER_X64: i128 = 15793534762490258745;

fn positive_tick_sqrt_price(tick: u32) -> u128 {
    let mut ratio: u128 = if tick & 1 != 0 {
        79232123823359799118286999567
    } else {
        79228162514264337593543950336
    };

    for (i, factor) in POSITIVE_TICK_FACTORS.iter().enumerate() {
        if tick & (2 << i) != 0 {
            ratio = mul_shift_96(ratio, *factor);
        }
    }

    ratio >> 32
}

// the Q32.96 ratio stays below 2^128 for every tick up to MAX_TICK_INDEX
fn mul_shift_96(a: u128, b: u128) -> u128 {
    let [low, high, ..] = ((U256::from(a) * U256::from(b)) >> 96_usize).into_limbs();
    (u128::from(high) << 64) | u128::from(low)
}

fn negative_tick_sqrt_price(tick: u32) -> u128 {
    let mut ratio: u128 = if tick & 1 != 0 {
        18445821805675392311
    } else {
        18446744073709551616
    };

    for (i, factor) in NEGATIVE_TICK_FACTORS.iter().enumerate() {
        if tick & (2 << i) != 0 {
            ratio = (ratio * factor) >> 64;
        }
    }

    ratio
}

/// Q64.64 sqrt price at `tick`, or `None` outside `[MIN_TICK_INDEX, MAX_TICK_INDEX]`.
#[must_use]
pub fn tick_index_to_sqrt_price(tick: i32) -> Option<u128> {
    if !(MIN_TICK_INDEX..=MAX_TICK_INDEX).contains(&tick) {
        return None;
    }

    Some(if tick >= 0 {
        positive_tick_sqrt_price(tick.unsigned_abs())
    } else {
        negative_tick_sqrt_price(tick.unsigned_abs())
    })
}

/// Greatest tick whose sqrt price is less than or equal to `sqrt_price`.
///
/// Returns `None` when the price lies outside `[MIN_SQRT_PRICE, MAX_SQRT_PRICE]`.
#[must_use]
pub fn sqrt_price_to_tick_index(sqrt_price: u128) -> Option<i32> {
    if !(MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&sqrt_price) {
        return None;
    }

    let msb = 127 - sqrt_price.leading_zeros();
    let log2p_integer_x32 = (i128::from(msb) - 64) << 32;

    // normalize into [2^63, 2^64) and square repeatedly to extract fraction bits
    let mut r = if msb >= 64 {
        sqrt_price >> (msb - 63)
    } else {
        sqrt_price << (63 - msb)
    };
    let mut bit: i128 = 0x8000_0000_0000_0000;
    let mut log2p_fraction_x64: i128 = 0;

    for _ in 0..BIT_PRECISION {
        r *= r;
        let is_r_more_than_two = r >> 127;
        r >>= 63 + is_r_more_than_two;
        log2p_fraction_x64 += bit * is_r_more_than_two as i128;
        bit >>= 1;
    }

    let log2p_x32 = log2p_integer_x32 + (log2p_fraction_x64 >> 32);
    let logbp_x64 = log2p_x32 * LOG_B_2_X32;

    let tick_low = ((logbp_x64 - LOG_B_P_ERR_MARGIN_LOWER_X64) >> 64) as i32;
    let tick_high = ((logbp_x64 + LOG_B_P_ERR_MARGIN_UPPER_X64) >> 64) as i32;

    if tick_low == tick_high {
        return Some(tick_low);
    }

    match tick_index_to_sqrt_price(tick_high) {
        Some(high_sqrt_price) if high_sqrt_price <= sqrt_price => Some(tick_high),
        _ => Some(tick_low),
    }
}
