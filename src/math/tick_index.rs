/// Number of ticks stored in one tick array account.
pub const TICK_ARRAY_SIZE: i32 = 88;

/// Location of a tick inside the sequence of tick arrays for a given spacing.
///
/// `array_index` is the floor of `tick / (tick_spacing * TICK_ARRAY_SIZE)` and `offset_index` is the
/// position of the tick within that array, so negative ticks land in negative arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickArrayIndex {
    pub array_index: i32,
    pub offset_index: i32,
    pub tick_spacing: u16,
}

#[must_use]
pub fn ticks_in_array(tick_spacing: u16) -> i32 {
    i32::from(tick_spacing) * TICK_ARRAY_SIZE
}

/// Start tick index of the array containing `tick_index`, moved by `offset` arrays.
///
/// `tick_spacing` must be non-zero.
#[must_use]
pub fn start_tick_index(tick_index: i32, tick_spacing: u16, offset: i32) -> i32 {
    let span = ticks_in_array(tick_spacing);
    (tick_index.div_euclid(span) + offset) * span
}

impl TickArrayIndex {
    /// Locates `tick_index` under `tick_spacing`, which must be non-zero.
    ///
    /// Ticks that are not a multiple of the spacing are floored to the initializable tick below.
    #[must_use]
    pub fn from_tick_index(tick_index: i32, tick_spacing: u16) -> Self {
        let spacing = i32::from(tick_spacing);

        Self {
            array_index: tick_index.div_euclid(ticks_in_array(tick_spacing)),
            offset_index: tick_index.div_euclid(spacing).rem_euclid(TICK_ARRAY_SIZE),
            tick_spacing,
        }
    }

    #[must_use]
    pub fn to_tick_index(&self) -> i32 {
        self.array_index * ticks_in_array(self.tick_spacing)
            + self.offset_index * i32::from(self.tick_spacing)
    }

    #[must_use]
    pub fn to_next_initializable_tick_index(&self) -> Self {
        if self.offset_index == TICK_ARRAY_SIZE - 1 {
            Self {
                array_index: self.array_index + 1,
                offset_index: 0,
                tick_spacing: self.tick_spacing,
            }
        } else {
            Self {
                offset_index: self.offset_index + 1,
                ..*self
            }
        }
    }

    #[must_use]
    pub fn to_prev_initializable_tick_index(&self) -> Self {
        if self.offset_index == 0 {
            Self {
                array_index: self.array_index - 1,
                offset_index: TICK_ARRAY_SIZE - 1,
                tick_spacing: self.tick_spacing,
            }
        } else {
            Self {
                offset_index: self.offset_index - 1,
                ..*self
            }
        }
    }
}
