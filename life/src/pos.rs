use std::fmt::Debug;
use std::ops::Add;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
/// x increases to the east
/// y increases to the south
///
/// Signed so that neighbor offsets can step off the grid before being wrapped.
pub struct Pos {
    pub x: i64,
    pub y: i64,
}
impl Pos {
    /// offsets of the 8 neighbors of a cell, starting west and going clockwise
    pub const NEIGHBORHOOD: [Pos; 8] = [
        Pos::new(-1, 0),
        Pos::new(-1, -1),
        Pos::new(0, -1),
        Pos::new(1, -1),
        Pos::new(1, 0),
        Pos::new(1, 1),
        Pos::new(0, 1),
        Pos::new(-1, 1),
    ];

    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}
impl Add for Pos {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}
