use std::fmt::Debug;

/// Signed change applied to a neighbor count when an adjacent cell flips.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Delta {
    Increment,
    Decrement,
}
impl Delta {
    /// the delta neighbors see when a cell becomes `alive`
    pub fn toward(alive: bool) -> Self {
        if alive {
            Self::Increment
        } else {
            Self::Decrement
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
/// A single cell and its live neighbor count, packed into a byte
///
/// # implementation details
/// ```text
///  7 6 5 | 4     | 3 2 1 0
///  unused| alive | neighbors (0..=8)
/// ```
pub struct Cell {
    bits: u8,
}
impl Cell {
    const ALIVE_SHIFT: u8 = 4;
    const ALIVE_BIT: u8 = 1 << Self::ALIVE_SHIFT;
    const COUNT_MASK: u8 = Self::ALIVE_BIT - 1;
    pub const MAX_NEIGHBORS: u8 = 8;

    pub fn dead() -> Self {
        Self { bits: 0 }
    }
    pub fn from_bits(bits: u8) -> Self {
        Self { bits }
    }
    pub fn to_bits(self) -> u8 {
        self.bits
    }

    pub fn is_alive(self) -> bool {
        self.bits & Self::ALIVE_BIT != 0
    }
    pub fn neighbors(self) -> u8 {
        self.bits & Self::COUNT_MASK
    }
    /// dead and surrounded by dead cells, so it can't change next generation
    pub fn is_quiet(self) -> bool {
        self.bits == 0
    }

    /// only touches the state bit
    pub fn with_alive(self, alive: bool) -> Self {
        if alive {
            Self::from_bits(self.bits | Self::ALIVE_BIT)
        } else {
            Self::from_bits(self.bits & !Self::ALIVE_BIT)
        }
    }
    /// only touches the count field
    pub fn with_neighbor_delta(self, delta: Delta) -> Self {
        match delta {
            Delta::Increment => {
                assert!(self.neighbors() < Self::MAX_NEIGHBORS, "neighbor overflow");
                Self::from_bits(self.bits + 1)
            }
            Delta::Decrement => {
                assert!(self.neighbors() > 0, "neighbor underflow");
                Self::from_bits(self.bits - 1)
            }
        }
    }
}
impl Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.is_alive() { 'o' } else { '.' };
        write!(f, "Cell({state}{})", self.neighbors())
    }
}
