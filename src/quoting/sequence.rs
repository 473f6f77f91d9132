use crate::math::tick::{MAX_TICK_INDEX, MIN_TICK_INDEX};
use crate::math::tick_index::{ticks_in_array, TickArrayIndex};
use crate::quoting::types::{Tick, TickArray};
use alloc::vec;
use alloc::vec::Vec;
use thiserror::Error;
use tracing::trace;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Error)]
pub enum TickArraySequenceError {
    #[error("no tick arrays supplied")]
    /// At least one tick array is needed to locate the current tick.
    Empty,
    #[error("tick spacing must be non-zero")]
    TickSpacingCannotBeZero,
    #[error("tick array {0} is not initialized")]
    /// The slot at this position of the sequence holds no data.
    ArrayNotInitialized(usize),
    #[error("tick array {0} does not start at the expected tick index")]
    /// The array in this slot is not the one the tick maps to.
    NonSequentialArray(usize),
    #[error("tick {0} lies outside the supplied tick arrays")]
    OutOfSequenceBounds(i32),
}

/// Direction-aware view over the tick arrays a swap may traverse.
///
/// Slot 0 holds the array containing the starting tick and later slots follow the direction of
/// the trade. Every slot read while quoting is recorded so that the number of accounts the swap
/// touches can be checked afterwards.
#[derive(Debug, Clone)]
pub struct TickArraySequence<'a> {
    tick_arrays: &'a [Option<TickArray>],
    tick_spacing: u16,
    a_to_b: bool,
    start_array_index: i32,
    touched: Vec<bool>,
}

impl<'a> TickArraySequence<'a> {
    pub fn new(
        tick_arrays: &'a [Option<TickArray>],
        tick_spacing: u16,
        a_to_b: bool,
    ) -> Result<Self, TickArraySequenceError> {
        if tick_spacing == 0 {
            return Err(TickArraySequenceError::TickSpacingCannotBeZero);
        }

        let first = tick_arrays
            .first()
            .ok_or(TickArraySequenceError::Empty)?
            .as_ref()
            .ok_or(TickArraySequenceError::ArrayNotInitialized(0))?;

        Ok(Self {
            tick_arrays,
            tick_spacing,
            a_to_b,
            start_array_index: TickArrayIndex::from_tick_index(
                first.start_tick_index,
                tick_spacing,
            )
            .array_index,
            touched: vec![false; tick_arrays.len()],
        })
    }

    /// Number of distinct slots read so far.
    #[must_use]
    pub fn num_touched_arrays(&self) -> usize {
        self.touched.iter().filter(|touched| **touched).count()
    }

    fn local_array_index(&self, array_index: i32) -> Option<usize> {
        let local = if self.a_to_b {
            self.start_array_index - array_index
        } else {
            array_index - self.start_array_index
        };

        usize::try_from(local)
            .ok()
            .filter(|local| *local < self.tick_arrays.len())
    }

    fn tick_at(&mut self, index: TickArrayIndex) -> Result<Tick, TickArraySequenceError> {
        let tick_index = index.to_tick_index();
        let slot = self
            .local_array_index(index.array_index)
            .ok_or(TickArraySequenceError::OutOfSequenceBounds(tick_index))?;

        self.touched[slot] = true;

        let tick_array = self.tick_arrays[slot]
            .as_ref()
            .ok_or(TickArraySequenceError::ArrayNotInitialized(slot))?;

        if tick_array.start_tick_index != index.array_index * ticks_in_array(self.tick_spacing) {
            return Err(TickArraySequenceError::NonSequentialArray(slot));
        }

        tick_array
            .tick(index.offset_index)
            .copied()
            .ok_or(TickArraySequenceError::OutOfSequenceBounds(tick_index))
    }

    /// Reads the tick at `tick_index` and marks its array as touched.
    pub fn get_tick(&mut self, tick_index: i32) -> Result<Tick, TickArraySequenceError> {
        self.tick_at(TickArrayIndex::from_tick_index(tick_index, self.tick_spacing))
    }

    // last tick the sequence covers in the direction of the trade
    fn boundary_tick_index(&self) -> i32 {
        let span = i64::from(ticks_in_array(self.tick_spacing));
        let start = i64::from(self.start_array_index);
        let len = i64::try_from(self.tick_arrays.len()).unwrap_or(i64::MAX);

        let boundary = if self.a_to_b {
            start
                .saturating_sub(len)
                .saturating_add(1)
                .saturating_mul(span)
        } else {
            start.saturating_add(len).saturating_mul(span).saturating_sub(1)
        };

        // in range after the clamp
        boundary.clamp(i64::from(MIN_TICK_INDEX), i64::from(MAX_TICK_INDEX)) as i32
    }

    /// Searches for the next initialized tick in the direction of the trade.
    ///
    /// Searching from `tick_index` includes that tick when trading A to B and starts one tick
    /// spacing above it otherwise. When the supplied arrays or the protocol tick range run out
    /// first, the farthest reachable tick index is returned without a tick.
    pub fn find_next_initialized_tick_index(
        &mut self,
        tick_index: i32,
    ) -> Result<(i32, Option<Tick>), TickArraySequenceError> {
        let search_start = if self.a_to_b {
            tick_index
        } else {
            tick_index + i32::from(self.tick_spacing)
        };
        let mut index = TickArrayIndex::from_tick_index(search_start, self.tick_spacing);

        if self.local_array_index(index.array_index).is_none() {
            return Err(TickArraySequenceError::OutOfSequenceBounds(search_start));
        }

        loop {
            let candidate = index.to_tick_index();
            if !(MIN_TICK_INDEX..=MAX_TICK_INDEX).contains(&candidate)
                || self.local_array_index(index.array_index).is_none()
            {
                break;
            }

            let tick = self.tick_at(index)?;
            if tick.initialized {
                trace!(tick_index = candidate, "found initialized tick");
                return Ok((candidate, Some(tick)));
            }

            index = if self.a_to_b {
                index.to_prev_initializable_tick_index()
            } else {
                index.to_next_initializable_tick_index()
            };
        }

        Ok((self.boundary_tick_index(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quoting::test_utils::tick_array;
    use alloc::vec;
    use alloc::vec::Vec;

    fn walk(sequence: &mut TickArraySequence, from: i32, a_to_b: bool) -> Vec<(i32, bool)> {
        let mut visited = Vec::new();
        let mut search = from;
        loop {
            let (tick_index, tick) = sequence.find_next_initialized_tick_index(search).unwrap();
            visited.push((tick_index, tick.is_some()));
            if tick.is_none() {
                return visited;
            }
            search = if a_to_b { tick_index - 1 } else { tick_index };
        }
    }

    mod construction {
        use super::*;

        #[test]
        fn empty() {
            assert_eq!(
                TickArraySequence::new(&[], 64, true).unwrap_err(),
                TickArraySequenceError::Empty
            );
        }

        #[test]
        fn first_slot_absent() {
            let arrays = [None, Some(tick_array(-5632, &[]))];
            assert_eq!(
                TickArraySequence::new(&arrays, 64, true).unwrap_err(),
                TickArraySequenceError::ArrayNotInitialized(0)
            );
        }

        #[test]
        fn zero_spacing() {
            let arrays = [Some(tick_array(0, &[]))];
            assert_eq!(
                TickArraySequence::new(&arrays, 0, true).unwrap_err(),
                TickArraySequenceError::TickSpacingCannotBeZero
            );
        }
    }

    mod get_tick {
        use super::*;

        #[test]
        fn reads_initialized_tick() {
            let arrays = [Some(tick_array(0, &[32]))];
            let mut sequence = TickArraySequence::new(&arrays, 64, true).unwrap();

            assert!(sequence.get_tick(2048).unwrap().initialized);
            assert!(!sequence.get_tick(1984).unwrap().initialized);
            assert_eq!(sequence.num_touched_arrays(), 1);
        }

        #[test]
        fn a_to_b_slots_descend() {
            let arrays = [Some(tick_array(0, &[])), Some(tick_array(-5632, &[50]))];
            let mut sequence = TickArraySequence::new(&arrays, 64, true).unwrap();

            assert!(sequence.get_tick(-5632 + 50 * 64).unwrap().initialized);
            assert_eq!(sequence.num_touched_arrays(), 1);
            assert_eq!(
                sequence.get_tick(5632),
                Err(TickArraySequenceError::OutOfSequenceBounds(5632))
            );
        }

        #[test]
        fn b_to_a_slots_ascend() {
            let arrays = [Some(tick_array(0, &[])), Some(tick_array(11264, &[0]))];
            let mut sequence = TickArraySequence::new(&arrays, 128, false).unwrap();

            assert!(sequence.get_tick(11264).unwrap().initialized);
            assert_eq!(
                sequence.get_tick(-128),
                Err(TickArraySequenceError::OutOfSequenceBounds(-128))
            );
        }

        #[test]
        fn absent_slot_is_touched() {
            let arrays = [Some(tick_array(0, &[])), None];
            let mut sequence = TickArraySequence::new(&arrays, 64, false).unwrap();

            assert_eq!(
                sequence.get_tick(5632),
                Err(TickArraySequenceError::ArrayNotInitialized(1))
            );
            assert_eq!(sequence.num_touched_arrays(), 1);
        }

        #[test]
        fn misplaced_array() {
            let arrays = [Some(tick_array(0, &[])), Some(tick_array(0, &[]))];
            let mut sequence = TickArraySequence::new(&arrays, 64, false).unwrap();

            assert_eq!(
                sequence.get_tick(5632),
                Err(TickArraySequenceError::NonSequentialArray(1))
            );
        }
    }

    mod find_next_initialized_tick_index {
        use super::*;

        #[test]
        fn a_to_b_walks_down_three_arrays() {
            let arrays = [
                Some(tick_array(0, &[0, 32, 63])),
                Some(tick_array(-5632, &[0, 50])),
                Some(tick_array(-11264, &[25, 50])),
            ];
            let mut sequence = TickArraySequence::new(&arrays, 64, true).unwrap();

            assert_eq!(
                walk(&mut sequence, 2048, true),
                [
                    (2048, true),
                    (0, true),
                    (-2432, true),
                    (-5632, true),
                    (-8064, true),
                    (-9664, true),
                    (-11264, false),
                ]
            );
            assert_eq!(sequence.num_touched_arrays(), 3);
        }

        #[test]
        fn b_to_a_walks_up_three_arrays() {
            let arrays = [
                Some(tick_array(0, &[0, 32, 63])),
                Some(tick_array(11264, &[0, 50])),
                Some(tick_array(22528, &[25, 50])),
            ];
            let mut sequence = TickArraySequence::new(&arrays, 128, false).unwrap();

            assert_eq!(
                walk(&mut sequence, 3200, false),
                [
                    (4096, true),
                    (8064, true),
                    (11264, true),
                    (17664, true),
                    (25728, true),
                    (28928, true),
                    (33791, false),
                ]
            );
            assert_eq!(sequence.num_touched_arrays(), 3);
        }

        #[test]
        fn a_to_b_search_is_inclusive() {
            let arrays = [Some(tick_array(0, &[10]))];
            let mut sequence = TickArraySequence::new(&arrays, 64, true).unwrap();

            assert_eq!(
                sequence.find_next_initialized_tick_index(640).unwrap().0,
                640
            );
            assert_eq!(
                sequence.find_next_initialized_tick_index(700).unwrap().0,
                640
            );
        }

        #[test]
        fn b_to_a_search_is_exclusive() {
            let arrays = [Some(tick_array(0, &[10, 11]))];
            let mut sequence = TickArraySequence::new(&arrays, 64, false).unwrap();

            assert_eq!(
                sequence.find_next_initialized_tick_index(640).unwrap().0,
                704
            );
            assert_eq!(
                sequence.find_next_initialized_tick_index(639).unwrap().0,
                640
            );
        }

        #[test]
        fn stops_at_absent_slot() {
            let arrays = [Some(tick_array(0, &[])), None];
            let mut sequence = TickArraySequence::new(&arrays, 64, false).unwrap();

            assert_eq!(
                sequence.find_next_initialized_tick_index(0),
                Err(TickArraySequenceError::ArrayNotInitialized(1))
            );
        }

        #[test]
        fn search_outside_sequence() {
            let arrays = [Some(tick_array(0, &[]))];
            let mut sequence = TickArraySequence::new(&arrays, 64, true).unwrap();

            assert_eq!(
                sequence.find_next_initialized_tick_index(-1),
                Err(TickArraySequenceError::OutOfSequenceBounds(-1))
            );
        }

        #[test]
        fn long_sequence_with_wide_spacing() {
            let span = 88 * 65535;
            let mut arrays = vec![Some(tick_array(0, &[])), Some(tick_array(-span, &[]))];
            arrays.resize(400, None);
            let mut sequence = TickArraySequence::new(&arrays, 65535, true).unwrap();

            assert_eq!(
                sequence.find_next_initialized_tick_index(0),
                Ok((MIN_TICK_INDEX, None))
            );

            let mut arrays = vec![Some(tick_array(0, &[]))];
            arrays.resize(400, None);
            let mut sequence = TickArraySequence::new(&arrays, 65535, false).unwrap();

            assert_eq!(
                sequence.find_next_initialized_tick_index(0),
                Ok((MAX_TICK_INDEX, None))
            );
        }

        #[test]
        fn clamps_to_protocol_range() {
            let arrays = [Some(tick_array(-444928, &[]))];
            let mut sequence = TickArraySequence::new(&arrays, 64, true).unwrap();

            assert_eq!(
                sequence.find_next_initialized_tick_index(MIN_TICK_INDEX),
                Ok((MIN_TICK_INDEX, None))
            );

            let arrays = [Some(tick_array(439296, &[]))];
            let mut sequence = TickArraySequence::new(&arrays, 64, false).unwrap();

            assert_eq!(
                sequence.find_next_initialized_tick_index(443520),
                Ok((MAX_TICK_INDEX, None))
            );
        }
    }
}
