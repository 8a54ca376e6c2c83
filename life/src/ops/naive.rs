use tracing::trace_span;

use crate::{next_state, Algorithm, Engine, Population, Torus};

/// Recounts every neighbor of every cell each generation.
///
/// Slow, but has no state beyond the cells themselves, which makes it the
/// reference the other engines are checked against.
#[derive(Clone, Debug)]
pub struct Naive {
    torus: Torus,
    cells: Vec<bool>,
    next: Vec<bool>,
    generation: u64,
}
impl Naive {
    pub fn new(width: usize, height: usize) -> Self {
        let torus = Torus::new(width, height);
        Self {
            torus,
            cells: vec![false; torus.len()],
            next: vec![false; torus.len()],
            generation: 0,
        }
    }
    /// live cells among the 8 neighbors of `(x, y)`, counted from scratch
    pub fn live_neighbors(&self, x: usize, y: usize) -> u8 {
        self.count(self.torus.index(x, y))
    }
    fn count(&self, index: usize) -> u8 {
        self.torus
            .neighbors(index)
            .into_iter()
            .map(|n| u8::from(self.cells[n]))
            .sum()
    }
}
impl Engine for Naive {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Naive
    }
    fn width(&self) -> usize {
        self.torus.width()
    }
    fn height(&self) -> usize {
        self.torus.height()
    }
    fn generation(&self) -> u64 {
        self.generation
    }
    fn get(&self, x: usize, y: usize) -> bool {
        self.cells[self.torus.index(x, y)]
    }
    fn set(&mut self, x: usize, y: usize, alive: bool) {
        let index = self.torus.index(x, y);
        self.cells[index] = alive;
    }
    fn clear(&mut self) {
        self.cells.fill(false);
        self.generation = 0;
    }
    fn step(&mut self) {
        let _span =
            trace_span!("step", algorithm = "naive", generation = self.generation).entered();
        let mut next = std::mem::take(&mut self.next);
        for (index, cell) in next.iter_mut().enumerate() {
            *cell = next_state(self.cells[index], self.count(index));
        }
        self.next = std::mem::replace(&mut self.cells, next);
        self.generation += 1;
    }
}
impl Population for Naive {
    fn population(&self) -> u64 {
        self.cells.as_slice().population()
    }
    fn is_empty(&self) -> bool {
        Population::is_empty(self.cells.as_slice())
    }
}
