use crate::TransitionIndex;

/// Half of the `u16` range. Two indices further apart than this are
/// interpreted as having wrapped around.
const HALF_RANGE: u16 = 32768;

/// Returns whether or not a wrapping number is greater than another
/// sequence_greater_than(2,1) will return true
/// sequence_greater_than(1,2) will return false
/// sequence_greater_than(1,1) will return false
pub fn sequence_greater_than(s1: u16, s2: u16) -> bool {
    ((s1 > s2) && (s1 - s2 <= HALF_RANGE)) || ((s1 < s2) && (s2 - s1 > HALF_RANGE))
}

/// Returns whether or not a wrapping number is less than another
/// sequence_less_than(1,2) will return true
/// sequence_less_than(2,1) will return false
/// sequence_less_than(1,1) will return false
pub fn sequence_less_than(s1: u16, s2: u16) -> bool {
    sequence_greater_than(s2, s1)
}

/// The index that follows `index` on a per-entity transition stream.
pub fn next_index(index: TransitionIndex) -> TransitionIndex {
    index.wrapping_add(1)
}
