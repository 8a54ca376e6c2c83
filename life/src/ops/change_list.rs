use std::mem;

use tracing::{trace, trace_span};

use crate::ops::counts::CountGrid;
use crate::{next_state, Algorithm, Engine, Population, Torus};

/// Packed cells with incrementally maintained neighbor counts, stepped by
/// revisiting only the cells whose neighborhood changed last generation.
///
/// # implementation details
/// Every flip records the flipped cell and its 8 neighbors in `changes`. A cell's
/// next state only depends on itself and those neighbors, so a cell missing from
/// `changes` can't flip next generation. The list may hold duplicates, deciding a
/// cell twice gives the same answer and flips are idempotent.
#[derive(Clone, Debug)]
pub struct ChangeList {
    grid: CountGrid,
    /// addresses touched since the start of the current generation
    changes: Vec<usize>,
    /// reused buffers, empty between steps
    candidates: Vec<usize>,
    staged: Vec<(usize, bool)>,
    generation: u64,
}
impl ChangeList {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid: CountGrid::new(Torus::new(width, height)),
            changes: Vec::new(),
            candidates: Vec::new(),
            staged: Vec::new(),
            generation: 0,
        }
    }

    /// Makes the cell at `index` alive, returning `false` if it already was.
    pub fn activate(&mut self, index: usize) -> bool {
        let changes = &mut self.changes;
        self.grid.set(index, true, |touched| changes.push(touched))
    }
    /// Makes the cell at `index` dead, returning `false` if it already was.
    pub fn deactivate(&mut self, index: usize) -> bool {
        let changes = &mut self.changes;
        self.grid.set(index, false, |touched| changes.push(touched))
    }

    /// stored neighbor count of `(x, y)`
    pub fn neighbor_count(&self, x: usize, y: usize) -> u8 {
        self.grid.get(self.grid.torus().index(x, y)).neighbors()
    }
    /// addresses that will be revisited by the next `step`
    pub fn changes(&self) -> &[usize] {
        &self.changes
    }
}
impl Engine for ChangeList {
    fn algorithm(&self) -> Algorithm {
        Algorithm::ChangeList
    }
    fn width(&self) -> usize {
        self.grid.torus().width()
    }
    fn height(&self) -> usize {
        self.grid.torus().height()
    }
    fn generation(&self) -> u64 {
        self.generation
    }
    fn get(&self, x: usize, y: usize) -> bool {
        self.grid.get(self.grid.torus().index(x, y)).is_alive()
    }
    fn set(&mut self, x: usize, y: usize, alive: bool) {
        let index = self.grid.torus().index(x, y);
        if alive {
            self.activate(index);
        } else {
            self.deactivate(index);
        }
    }
    fn clear(&mut self) {
        self.grid.clear();
        self.changes.clear();
        self.generation = 0;
    }
    fn step(&mut self) {
        // last generation's changes are this generation's candidates
        mem::swap(&mut self.candidates, &mut self.changes);
        let _span = trace_span!(
            "step",
            algorithm = "changelist",
            generation = self.generation,
            candidates = self.candidates.len()
        )
        .entered();

        // decide everything before flipping anything, flips move counts
        for &index in &self.candidates {
            let cell = self.grid.get(index);
            let alive = next_state(cell.is_alive(), cell.neighbors());
            if alive != cell.is_alive() {
                self.staged.push((index, alive));
            }
        }
        self.candidates.clear();

        let mut staged = mem::take(&mut self.staged);
        trace!(flips = staged.len(), "staged");
        for &(index, alive) in &staged {
            if alive {
                self.activate(index);
            } else {
                self.deactivate(index);
            }
        }
        staged.clear();
        self.staged = staged;
        self.generation += 1;
    }
}
impl Population for ChangeList {
    fn population(&self) -> u64 {
        self.grid.population()
    }
    fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::ChangeList;
    use crate::{test_cells, Engine, Naive};

    fn assert_counts(engine: &ChangeList) {
        let mut naive = Naive::new(engine.width(), engine.height());
        naive.seed(&engine.cells());
        for y in 0..engine.height() {
            for x in 0..engine.width() {
                assert_eq!(
                    engine.neighbor_count(x, y),
                    naive.live_neighbors(x, y),
                    "({x}, {y}) at generation {}",
                    engine.generation()
                );
            }
        }
    }

    #[test]
    fn activate_records_neighborhood() {
        let mut engine = ChangeList::new(5, 5);
        assert!(engine.activate(0));
        let mut changes = engine.changes().to_vec();
        changes.sort_unstable();
        assert_eq!(changes, vec![0, 1, 4, 5, 6, 9, 20, 21, 24]);
    }

    #[test]
    fn flips_are_idempotent() {
        let mut engine = ChangeList::new(6, 6);
        engine.activate(7);
        engine.activate(8);
        let cells = engine.cells();
        let changes = engine.changes().len();
        assert!(!engine.activate(7));
        assert!(!engine.deactivate(30));
        assert_eq!(engine.cells(), cells);
        assert_eq!(engine.changes().len(), changes);
        assert_counts(&engine);
    }

    #[test]
    fn wraps_diagonally() {
        let mut engine = ChangeList::new(4, 4);
        engine.set(3, 3, true);
        assert_eq!(engine.neighbor_count(0, 0), 1);
        assert_eq!(engine.neighbor_count(2, 2), 1);
        assert_eq!(engine.neighbor_count(1, 1), 0);
    }

    #[test]
    fn still_life_goes_quiet() {
        let block = test_cells! {"
            ....
            .oo.
            .oo.
            ....
        "};
        let mut engine = ChangeList::new(8, 8);
        engine.seed(&block);
        assert!(!engine.changes().is_empty());
        engine.step();
        // nothing flipped, so there is nothing left to look at
        assert!(engine.changes().is_empty());
        engine.step();
        assert_eq!(engine.cells(), {
            let mut expected = Naive::new(8, 8);
            expected.seed(&block);
            expected.cells()
        });
    }

    #[test]
    fn counts_stay_exact() {
        let mut engine = ChangeList::new(20, 13);
        engine.populate(&mut ChaCha8Rng::seed_from_u64(42));
        assert_counts(&engine);
        for _ in 0..40 {
            engine.step();
            assert_counts(&engine);
        }
    }

    #[test]
    fn matches_naive() {
        let mut engine = ChangeList::new(32, 24);
        let mut naive = Naive::new(32, 24);
        engine.populate(&mut ChaCha8Rng::seed_from_u64(9));
        naive.populate(&mut ChaCha8Rng::seed_from_u64(9));
        for _ in 0..100 {
            engine.step();
            naive.step();
            assert_eq!(engine.cells(), naive.cells());
        }
    }
}
