use tracing::{trace, trace_span};

use crate::ops::counts::CountGrid;
use crate::{next_state, Algorithm, Cell, Engine, Population, Torus};

/// Packed cells with incrementally maintained neighbor counts, stepped by
/// scanning the whole grid.
///
/// Cells that are dead with no live neighbors pack to zero and are skipped.
#[derive(Clone, Debug)]
pub struct Bitwise {
    grid: CountGrid,
    /// the grid as it was at the start of the generation being stepped
    snapshot: Vec<Cell>,
    generation: u64,
}
impl Bitwise {
    pub fn new(width: usize, height: usize) -> Self {
        let torus = Torus::new(width, height);
        Self {
            grid: CountGrid::new(torus),
            snapshot: vec![Cell::dead(); torus.len()],
            generation: 0,
        }
    }
    /// stored neighbor count of `(x, y)`
    pub fn neighbor_count(&self, x: usize, y: usize) -> u8 {
        self.grid.get(self.grid.torus().index(x, y)).neighbors()
    }
    pub fn activate(&mut self, index: usize) -> bool {
        self.grid.set(index, true, |_| {})
    }
    pub fn deactivate(&mut self, index: usize) -> bool {
        self.grid.set(index, false, |_| {})
    }
}
impl Engine for Bitwise {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Bitwise
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
        self.grid.set(index, alive, |_| {});
    }
    fn clear(&mut self) {
        self.grid.clear();
        self.generation = 0;
    }
    fn step(&mut self) {
        let _span =
            trace_span!("step", algorithm = "bitwise", generation = self.generation).entered();
        // flips change counts of cells not yet visited, so decide from a copy
        self.snapshot.copy_from_slice(self.grid.cells());
        let mut flips = 0_u32;
        for (index, cell) in self.snapshot.iter().enumerate() {
            if cell.is_quiet() {
                continue;
            }
            let alive = next_state(cell.is_alive(), cell.neighbors());
            if alive != cell.is_alive() {
                self.grid.set(index, alive, |_| {});
                flips += 1;
            }
        }
        trace!(flips, "applied");
        self.generation += 1;
    }
}
impl Population for Bitwise {
    fn population(&self) -> u64 {
        self.grid.population()
    }
    fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }
}
