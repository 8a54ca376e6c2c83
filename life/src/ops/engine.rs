use std::error::Error;
use std::fmt::{Debug, Display};
use std::str::FromStr;

use rand::{Rng, RngCore};
use tracing::debug;

use crate::{Bitwise, ChangeList, Naive, Population, Pos, Torus, Triplets};

/// A toroidal Life grid that can be stepped one generation at a time.
///
/// Every implementation steps with the same rule and the same wrapping, so any two
/// engines seeded alike stay cell-for-cell identical.
pub trait Engine: Population {
    fn algorithm(&self) -> Algorithm;
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// generations stepped since the last `clear`
    fn generation(&self) -> u64;

    /// panics if `(x, y)` is outside the grid
    fn get(&self, x: usize, y: usize) -> bool;
    /// panics if `(x, y)` is outside the grid
    fn set(&mut self, x: usize, y: usize, alive: bool);
    /// kills every cell and resets the generation
    fn clear(&mut self);
    /// advances exactly one generation
    fn step(&mut self);

    fn toggle(&mut self, x: usize, y: usize) {
        let alive = self.get(x, y);
        self.set(x, y, !alive);
    }

    /// Replaces the grid with `pattern` centered on it.
    ///
    /// Rows are expected to be the same length. A pattern larger than the grid
    /// wraps around onto itself.
    fn seed(&mut self, pattern: &[Vec<bool>]) {
        self.clear();
        let height = pattern.len();
        let width = pattern.first().map_or(0, Vec::len);
        let torus = Torus::new(self.width(), self.height());
        let start = Pos::new(centered(self.width(), width), centered(self.height(), height));
        for (y, row) in pattern.iter().enumerate() {
            for (x, &alive) in row.iter().enumerate() {
                if alive {
                    #[allow(clippy::cast_possible_wrap)]
                    let pos = start + Pos::new(x as i64, y as i64);
                    let (x, y) = torus.wrap_xy(pos);
                    self.set(x, y, true);
                }
            }
        }
        debug!(
            algorithm = %self.algorithm(),
            width,
            height,
            population = self.population(),
            "seeded"
        );
    }

    /// Replaces the grid with random cells, each alive with a 1 in 5 chance.
    ///
    /// Cells are drawn row-major, one sample each, so every engine produces the
    /// same grid from the same generator.
    fn populate(&mut self, rng: &mut dyn RngCore) {
        self.clear();
        for y in 0..self.height() {
            for x in 0..self.width() {
                if rng.gen_ratio(1, 5) {
                    self.set(x, y, true);
                }
            }
        }
        debug!(
            algorithm = %self.algorithm(),
            population = self.population(),
            "populated"
        );
    }

    fn cells(&self) -> Vec<Vec<bool>> {
        (0..self.height())
            .map(|y| (0..self.width()).map(|x| self.get(x, y)).collect())
            .collect()
    }

    /// one char per cell, each row terminated by a newline
    fn render_with(&self, alive: char, dead: char) -> String {
        let mut frame = String::with_capacity((self.width() + 1) * self.height());
        for y in 0..self.height() {
            for x in 0..self.width() {
                frame.push(if self.get(x, y) { alive } else { dead });
            }
            frame.push('\n');
        }
        frame
    }
    fn render(&self) -> String {
        self.render_with('•', ' ')
    }
}

#[allow(clippy::cast_possible_wrap)] // grid dims fit in i64, see Torus::new
fn centered(grid: usize, pattern: usize) -> i64 {
    (grid as i64 - pattern as i64) / 2
}

/// The interchangeable `Engine` implementations
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Algorithm {
    /// recounts every neighbor of every cell each generation
    Naive,
    /// packed cells with maintained counts, scanning the whole grid
    Bitwise,
    /// packed cells with maintained counts, revisiting only cells near last generation's flips
    ChangeList,
    /// three cells per word, revisiting only words near last generation's flips
    Triplets,
}
impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Naive,
        Algorithm::Bitwise,
        Algorithm::ChangeList,
        Algorithm::Triplets,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Naive => "naive",
            Self::Bitwise => "bitwise",
            Self::ChangeList => "changelist",
            Self::Triplets => "triplets",
        }
    }
    /// whether `build` accepts this grid size
    pub fn supports(self, width: usize, height: usize) -> bool {
        width > 0 && height > 0 && (self != Self::Triplets || width % 3 == 0)
    }
    /// panics unless `supports(width, height)`
    pub fn build(self, width: usize, height: usize) -> Box<dyn Engine> {
        match self {
            Self::Naive => Box::new(Naive::new(width, height)),
            Self::Bitwise => Box::new(Bitwise::new(width, height)),
            Self::ChangeList => Box::new(ChangeList::new(width, height)),
            Self::Triplets => Box::new(Triplets::new(width, height)),
        }
    }
}
impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct UnknownAlgorithm(String);
impl Debug for UnknownAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("UnknownAlgorithm").field(&self.0).finish()
    }
}
impl Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = Algorithm::ALL.iter().map(|a| a.name()).collect();
        write!(
            f,
            "Unknown algorithm {:?}, expected one of: {}",
            self.0,
            names.join(", ")
        )
    }
}
impl Error for UnknownAlgorithm {}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownAlgorithm(s.to_owned()))
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::{Algorithm, Engine};
    use crate::{test_cells, Naive, Population};

    fn build_all(width: usize, height: usize) -> Vec<Box<dyn Engine>> {
        Algorithm::ALL
            .into_iter()
            .filter(|a| a.supports(width, height))
            .map(|a| a.build(width, height))
            .collect()
    }

    fn assert_agree(engines: &[Box<dyn Engine>]) {
        let reference = engines[0].cells();
        for engine in &engines[1..] {
            assert_eq!(
                engine.cells(),
                reference,
                "{} diverged from {} at generation {}",
                engine.algorithm(),
                engines[0].algorithm(),
                engine.generation()
            );
        }
    }

    #[test]
    fn names() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.name().parse(), Ok(algorithm));
            assert_eq!(algorithm.to_string(), algorithm.name());
        }
        assert_eq!("ChangeList".parse(), Ok(Algorithm::ChangeList));
        let err = "hashlife".parse::<Algorithm>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown algorithm \"hashlife\", expected one of: naive, bitwise, changelist, triplets"
        );
    }

    #[test]
    fn supports() {
        assert!(Algorithm::Naive.supports(7, 1));
        assert!(!Algorithm::Naive.supports(0, 4));
        assert!(Algorithm::Triplets.supports(9, 1));
        assert!(!Algorithm::Triplets.supports(8, 8));
    }

    #[test]
    fn still_life() {
        let block = test_cells! {"
            ......
            ......
            ..oo..
            ..oo..
            ......
            ......
        "};
        for mut engine in build_all(6, 6) {
            engine.seed(&block);
            for _ in 0..10 {
                engine.step();
                assert_eq!(engine.cells(), block, "{}", engine.algorithm());
            }
            assert_eq!(engine.generation(), 10);
        }
    }

    #[test]
    fn blinker() {
        let horizontal = test_cells! {"
            ......
            ......
            .ooo..
            ......
            ......
            ......
        "};
        let vertical = test_cells! {"
            ......
            ..o...
            ..o...
            ..o...
            ......
            ......
        "};
        for mut engine in build_all(6, 6) {
            engine.seed(&horizontal);
            engine.step();
            assert_eq!(engine.cells(), vertical, "{}", engine.algorithm());
            engine.step();
            assert_eq!(engine.cells(), horizontal, "{}", engine.algorithm());
        }
    }

    #[test]
    fn glider_wraps_around() {
        let glider = test_cells! {"
            .o.
            ..o
            ooo
        "};
        // a glider moves one cell diagonally every 4 generations,
        // so after 4 * 6 generations it is back where it started on a 6x6 torus
        for mut engine in build_all(6, 6) {
            engine.seed(&glider);
            let start = engine.cells();
            for generation in 1..=24 {
                engine.step();
                assert_eq!(engine.population(), 5, "{}", engine.algorithm());
                if generation % 24 != 0 {
                    assert_ne!(engine.cells(), start);
                }
            }
            assert_eq!(engine.cells(), start, "{}", engine.algorithm());
        }
    }

    #[test]
    fn seed_centers_pattern() {
        let dot = test_cells! {"
            o
        "};
        let mut engine = Naive::new(5, 4);
        engine.seed(&dot);
        assert_eq!(engine.render_with('o', '.'), ".....\n..o..\n.....\n.....\n");
        engine.seed(&[vec![true, false, true]]);
        assert_eq!(engine.render_with('o', '.'), ".....\n.o.o.\n.....\n.....\n");
    }

    #[test]
    fn seed_wraps_large_pattern() {
        let wide = test_cells! {"
            o..oo..
        "};
        // starts at x = -1, so the first cell wraps to the east edge
        let mut engine = Naive::new(5, 1);
        engine.seed(&wide);
        assert_eq!(engine.render_with('o', '.'), "..ooo\n");
        let mut narrow = Naive::new(4, 1);
        narrow.seed(&wide);
        assert_eq!(narrow.render_with('o', '.'), "..oo\n");
    }

    #[test]
    fn render() {
        let mut engine = Naive::new(3, 2);
        engine.set(1, 0, true);
        engine.set(2, 1, true);
        assert_eq!(engine.render(), " • \n  •\n");
    }

    #[test]
    fn toggle() {
        for mut engine in build_all(6, 3) {
            engine.toggle(4, 1);
            assert!(engine.get(4, 1));
            assert_eq!(engine.population(), 1);
            engine.toggle(4, 1);
            assert!(!engine.get(4, 1));
            assert!(engine.is_empty());
        }
    }

    #[test]
    fn toggle_between_steps() {
        let mut engines = build_all(9, 9);
        for engine in &mut engines {
            engine.seed(&[vec![true, true, true]]);
            engine.step();
            // turn the blinker into a T tetromino mid run
            engine.toggle(3, 4);
        }
        assert_agree(&engines);
        for _ in 0..20 {
            engines.iter_mut().for_each(|e| e.step());
            assert_agree(&engines);
        }
    }

    #[test]
    #[should_panic]
    fn toggle_out_of_range() {
        Algorithm::ChangeList.build(4, 4).toggle(4, 0);
    }

    #[test]
    fn populate_is_reproducible() {
        let mut engines = build_all(30, 20);
        for engine in &mut engines {
            engine.populate(&mut ChaCha8Rng::seed_from_u64(7));
        }
        assert_agree(&engines);
        let population = engines[0].population();
        // 600 cells, 1 in 5 alive
        assert!((80..160).contains(&population), "{population}");
    }

    #[test]
    fn clear_resets() {
        for mut engine in build_all(6, 6) {
            engine.populate(&mut ChaCha8Rng::seed_from_u64(3));
            engine.step();
            engine.clear();
            assert!(engine.is_empty());
            assert_eq!(engine.generation(), 0);
            engine.step();
            assert!(engine.is_empty());
        }
    }

    #[test]
    fn acorn_agrees() {
        let acorn = test_cells! {"
            .o.....
            ...o...
            oo..ooo
        "};
        let mut engines = build_all(48, 40);
        for engine in &mut engines {
            engine.seed(&acorn);
        }
        for _ in 0..300 {
            engines.iter_mut().for_each(|e| e.step());
            assert_agree(&engines);
        }
    }

    fn grid() -> impl Strategy<Value = (usize, usize, Vec<Vec<bool>>)> {
        (1_usize..=4, 1_usize..=10).prop_flat_map(|(thirds, height)| {
            let width = thirds * 3;
            (
                Just(width),
                Just(height),
                prop::collection::vec(prop::collection::vec(any::<bool>(), width), height),
            )
        })
    }

    proptest! {
        #[test]
        fn all_engines_match_naive((width, height, cells) in grid(), steps in 0_usize..24) {
            let mut engines = build_all(width, height);
            prop_assert_eq!(engines.len(), Algorithm::ALL.len());
            for engine in &mut engines {
                engine.seed(&cells);
            }
            assert_agree(&engines);
            for _ in 0..steps {
                engines.iter_mut().for_each(|e| e.step());
                assert_agree(&engines);
            }
        }

        #[test]
        fn narrow_grids_match_naive(width in 1_usize..=5, height in 1_usize..=5, seed in any::<u64>()) {
            let mut engines = build_all(width, height);
            for engine in &mut engines {
                engine.populate(&mut ChaCha8Rng::seed_from_u64(seed));
            }
            for _ in 0..8 {
                engines.iter_mut().for_each(|e| e.step());
                assert_agree(&engines);
            }
        }
    }
}
