use crate::{Cell, Delta, Population, Torus};

/// One packed `Cell` per grid address, with every cell's count kept equal to the
/// number of live cells among its 8 neighbors.
///
/// Counts only ever change through `set`, which pushes the flip out to the
/// neighbors, so the invariant holds after every call.
#[derive(Clone, Debug)]
pub(crate) struct CountGrid {
    torus: Torus,
    cells: Vec<Cell>,
}
impl CountGrid {
    pub fn new(torus: Torus) -> Self {
        Self {
            torus,
            cells: vec![Cell::dead(); torus.len()],
        }
    }
    pub fn torus(&self) -> Torus {
        self.torus
    }
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
    pub fn get(&self, index: usize) -> Cell {
        self.cells[index]
    }
    pub fn clear(&mut self) {
        self.cells.fill(Cell::dead());
    }

    /// Makes the cell at `index` `alive`, reporting every address whose inputs changed
    /// (the cell and its 8 neighbors) to `touched`.
    ///
    /// Returns `false` without touching anything if the cell is already in that state.
    pub fn set(&mut self, index: usize, alive: bool, mut touched: impl FnMut(usize)) -> bool {
        if self.cells[index].is_alive() == alive {
            return false;
        }
        let delta = Delta::toward(alive);
        touched(index);
        for neighbor in self.torus.neighbors(index) {
            self.cells[neighbor] = self.cells[neighbor].with_neighbor_delta(delta);
            touched(neighbor);
        }
        // re-read, on tiny grids the cell can be its own neighbor
        self.cells[index] = self.cells[index].with_alive(alive);
        true
    }
}
impl Population for CountGrid {
    fn population(&self) -> u64 {
        self.cells.as_slice().population()
    }
    fn is_empty(&self) -> bool {
        Population::is_empty(self.cells.as_slice())
    }
}
