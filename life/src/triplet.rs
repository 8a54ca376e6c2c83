//! Three horizontally adjacent cells packed into one 16-bit word

use std::fmt::Debug;

use crate::Delta;

/// Position of a cell inside a `Triplet`, west to east
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Slot {
    Left,
    Middle,
    Right,
}
impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Left, Slot::Middle, Slot::Right];

    /// slot of the cell at `index` in a row-major buffer of triplets
    pub fn of_index(index: usize) -> Self {
        Self::ALL[index % 3]
    }
    pub fn offset(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Middle => 1,
            Self::Right => 2,
        }
    }
    /// whether `a` and `b` are horizontal neighbors inside one word
    ///
    /// These pairs don't use the count field, their contribution is read
    /// straight from the state bits.
    pub fn shares_edge(a: Slot, b: Slot) -> bool {
        matches!(
            (a, b),
            (Slot::Left | Slot::Right, Slot::Middle) | (Slot::Middle, Slot::Left | Slot::Right)
        )
    }

    const fn next_shift(self) -> u16 {
        match self {
            Self::Left => 14,
            Self::Middle => 13,
            Self::Right => 12,
        }
    }
    const fn state_shift(self) -> u16 {
        match self {
            Self::Left => 11,
            Self::Middle => 10,
            Self::Right => 9,
        }
    }
    const fn count_shift(self) -> u16 {
        match self {
            Self::Left => 6,
            Self::Middle => 3,
            Self::Right => 0,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
/// # implementation details
/// ```text
/// 15 | 14 13 12  | 11 10 09 | 08 07 06 | 05 04 03 | 02 01 00
///  - | next L M R| state LMR| L count  | M count  | R count
/// ```
/// The counts are raw: the left and right counts leave out the middle cell,
/// the middle count leaves out both outer cells. `neighbors` adds those back
/// from the state bits, so a raw count never exceeds 7.
pub struct Triplet {
    bits: u16,
}
impl Triplet {
    const FLAG_MASK: u16 = 0b111;
    const COUNT_MASK: u16 = 0b111;
    const STATES_SHIFT: u16 = Slot::Right.state_shift();
    const NEXTS_SHIFT: u16 = Slot::Right.next_shift();

    pub fn empty() -> Self {
        Self { bits: 0 }
    }
    pub fn from_bits(bits: u16) -> Self {
        Self { bits }
    }
    pub fn to_bits(self) -> u16 {
        self.bits
    }

    pub fn is_alive(self, slot: Slot) -> bool {
        (self.bits >> slot.state_shift()) & 1 != 0
    }
    /// staged state for the next generation
    pub fn next(self, slot: Slot) -> bool {
        (self.bits >> slot.next_shift()) & 1 != 0
    }
    /// the three state bits, left most significant
    pub fn states(self) -> u16 {
        (self.bits >> Self::STATES_SHIFT) & Self::FLAG_MASK
    }
    /// the three staged next bits, left most significant
    pub fn nexts(self) -> u16 {
        (self.bits >> Self::NEXTS_SHIFT) & Self::FLAG_MASK
    }
    /// whether any staged next state differs from the current one
    pub fn changed(self) -> bool {
        self.states() != self.nexts()
    }

    #[allow(clippy::cast_possible_truncation)] // masked to 3 bits
    pub fn raw_neighbors(self, slot: Slot) -> u8 {
        ((self.bits >> slot.count_shift()) & Self::COUNT_MASK) as u8
    }
    pub fn neighbors(self, slot: Slot) -> u8 {
        let state = |slot| u8::from(self.is_alive(slot));
        let raw = self.raw_neighbors(slot);
        match slot {
            Slot::Left | Slot::Right => raw + state(Slot::Middle),
            Slot::Middle => raw + state(Slot::Left) + state(Slot::Right),
        }
    }

    pub fn with_alive(self, slot: Slot, alive: bool) -> Self {
        Self::from_bits(set_bit(self.bits, slot.state_shift(), alive))
    }
    pub fn with_next(self, slot: Slot, next: bool) -> Self {
        Self::from_bits(set_bit(self.bits, slot.next_shift(), next))
    }
    /// only touches the raw count of `slot`
    pub fn with_neighbor_delta(self, slot: Slot, delta: Delta) -> Self {
        let one = 1 << slot.count_shift();
        match delta {
            Delta::Increment => {
                assert!(
                    u16::from(self.raw_neighbors(slot)) < Self::COUNT_MASK,
                    "neighbor overflow"
                );
                Self::from_bits(self.bits + one)
            }
            Delta::Decrement => {
                assert!(self.raw_neighbors(slot) > 0, "neighbor underflow");
                Self::from_bits(self.bits - one)
            }
        }
    }
}
fn set_bit(bits: u16, shift: u16, value: bool) -> u16 {
    if value {
        bits | (1 << shift)
    } else {
        bits & !(1 << shift)
    }
}
impl Debug for Triplet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Triplet(")?;
        for slot in Slot::ALL {
            let state = if self.is_alive(slot) { 'o' } else { '.' };
            let next = if self.next(slot) { 'o' } else { '.' };
            write!(f, " {state}{next}{}", self.raw_neighbors(slot))?;
        }
        write!(f, " )")
    }
}
