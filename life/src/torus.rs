use crate::Pos;

/// Address arithmetic for a `width x height` grid stored row-major in one flat buffer,
/// with both axes wrapping around.
///
/// Addresses are `y * width + x` and always lie in `[0, width * height)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Torus {
    width: usize,
    height: usize,
}
impl Torus {
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "grid must not be empty");
        let len = width.checked_mul(height);
        assert!(
            len.is_some_and(|len| i64::try_from(len).is_ok()),
            "grid too large"
        );
        Self { width, height }
    }
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// address of an in-bounds cell
    pub fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "({x}, {y}) is outside of a {}x{} grid",
            self.width,
            self.height
        );
        y * self.width + x
    }
    /// address of any position, wrapping each axis independently
    pub fn wrap(&self, pos: Pos) -> usize {
        let (x, y) = self.wrap_xy(pos);
        y * self.width + x
    }
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)] // dims fit in i64, rem_euclid is non-negative
    pub fn wrap_xy(&self, pos: Pos) -> (usize, usize) {
        (
            pos.x.rem_euclid(self.width as i64) as usize,
            pos.y.rem_euclid(self.height as i64) as usize,
        )
    }
    /// wraps a signed linear offset into the flat buffer
    ///
    /// Unlike `abs(offset) % len` this maps `-1` to the last address.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn wrap_linear(&self, offset: i64) -> usize {
        offset.rem_euclid(self.len() as i64) as usize
    }
    #[allow(clippy::cast_possible_wrap)]
    pub fn pos(&self, index: usize) -> Pos {
        debug_assert!(index < self.len());
        Pos::new((index % self.width) as i64, (index / self.width) as i64)
    }
    /// addresses of the 8 neighbors, in `Pos::NEIGHBORHOOD` order
    ///
    /// On grids smaller than 3x3 some of these repeat (or are `index` itself).
    pub fn neighbors(&self, index: usize) -> [usize; 8] {
        let pos = self.pos(index);
        Pos::NEIGHBORHOOD.map(|offset| self.wrap(pos + offset))
    }
}

#[cfg(test)]
mod test {
    use super::Torus;
    use crate::Pos;

    #[test]
    fn wrap_negative() {
        let torus = Torus::new(4, 3);
        assert_eq!(torus.wrap(Pos::new(-1, 0)), 3);
        assert_eq!(torus.wrap(Pos::new(0, -1)), 8);
        assert_eq!(torus.wrap(Pos::new(-1, -1)), 11);
        assert_eq!(torus.wrap(Pos::new(4, 3)), 0);
        assert_eq!(torus.wrap(Pos::new(-5, -4)), 11);
        assert_eq!(torus.wrap_xy(Pos::new(-5, 7)), (3, 1));
    }

    #[test]
    fn wrap_linear() {
        let torus = Torus::new(4, 3);
        assert_eq!(torus.wrap_linear(-1), 11);
        assert_eq!(torus.wrap_linear(-12), 0);
        assert_eq!(torus.wrap_linear(-13), 11);
        assert_eq!(torus.wrap_linear(12), 0);
        assert_eq!(torus.wrap_linear(5), 5);
    }

    #[test]
    fn diagonal_corner() {
        let torus = Torus::new(5, 4);
        let origin = torus.index(0, 0);
        let corner = torus.index(4, 3);
        assert!(torus.neighbors(origin).contains(&corner));
        assert!(torus.neighbors(corner).contains(&origin));
    }

    #[test]
    fn pos_round_trip() {
        let torus = Torus::new(7, 5);
        for index in 0..torus.len() {
            assert_eq!(torus.wrap(torus.pos(index)), index);
        }
    }

    #[test]
    fn tiny_grid_repeats() {
        let torus = Torus::new(1, 1);
        assert_eq!(torus.neighbors(0), [0; 8]);
    }

    #[test]
    #[should_panic]
    fn out_of_range() {
        Torus::new(3, 3).index(3, 0);
    }
}
