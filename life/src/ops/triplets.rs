use std::mem;

use tracing::{trace, trace_span};

use crate::{next_state, Algorithm, Delta, Engine, Population, Pos, Slot, Torus, Triplet};

/// Three cells per `Triplet` word, stepped from a list of changed words.
///
/// Requires the width to be a multiple of 3 so that words never straddle rows,
/// `Algorithm::Triplets.supports(width, height)` checks this before `new` panics.
///
/// # implementation details
/// A step runs in two phases. The first writes the next state of every slot of
/// every candidate word into its next bits without touching any state or count,
/// and remembers the words where something will change. The second applies those
/// flips, which updates counts and rebuilds the change list.
#[derive(Clone, Debug)]
pub struct Triplets {
    torus: Torus,
    words: Vec<Triplet>,
    /// words touched since the start of the current generation
    changes: Vec<usize>,
    /// reused buffers, empty between steps
    candidates: Vec<usize>,
    staged: Vec<usize>,
    generation: u64,
}
impl Triplets {
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            width % 3 == 0,
            "triplets need a width divisible by 3, got {width}"
        );
        let torus = Torus::new(width, height);
        Self {
            torus,
            words: vec![Triplet::empty(); torus.len() / 3],
            changes: Vec::new(),
            candidates: Vec::new(),
            staged: Vec::new(),
            generation: 0,
        }
    }

    /// Makes the cell at `index` alive, returning `false` if it already was.
    pub fn activate(&mut self, index: usize) -> bool {
        self.flip(index, true)
    }
    /// Makes the cell at `index` dead, returning `false` if it already was.
    pub fn deactivate(&mut self, index: usize) -> bool {
        self.flip(index, false)
    }

    /// stored neighbor count of `(x, y)`, including the ones implied by the state bits
    pub fn neighbor_count(&self, x: usize, y: usize) -> u8 {
        let index = self.torus.index(x, y);
        self.words[index / 3].neighbors(Slot::of_index(index))
    }
    /// word indices that will be revisited by the next `step`
    pub fn changes(&self) -> &[usize] {
        &self.changes
    }

    fn flip(&mut self, index: usize, alive: bool) -> bool {
        let word = index / 3;
        let slot = Slot::of_index(index);
        if self.words[word].is_alive(slot) == alive {
            return false;
        }
        let delta = Delta::toward(alive);
        self.changes.push(word);
        let pos = self.torus.pos(index);
        for offset in Pos::NEIGHBORHOOD {
            let neighbor = self.torus.wrap(pos + offset);
            let (n_word, n_slot) = (neighbor / 3, Slot::of_index(neighbor));
            self.changes.push(n_word);
            if offset.y == 0 && n_word == word && Slot::shares_edge(slot, n_slot) {
                // read from the state bit
                continue;
            }
            self.words[n_word] = self.words[n_word].with_neighbor_delta(n_slot, delta);
        }
        self.words[word] = self.words[word].with_alive(slot, alive);
        true
    }
}
impl Engine for Triplets {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Triplets
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
        let index = self.torus.index(x, y);
        self.words[index / 3].is_alive(Slot::of_index(index))
    }
    fn set(&mut self, x: usize, y: usize, alive: bool) {
        let index = self.torus.index(x, y);
        self.flip(index, alive);
    }
    fn clear(&mut self) {
        self.words.fill(Triplet::empty());
        self.changes.clear();
        self.generation = 0;
    }
    fn step(&mut self) {
        mem::swap(&mut self.candidates, &mut self.changes);
        let _span = trace_span!(
            "step",
            algorithm = "triplets",
            generation = self.generation,
            candidates = self.candidates.len()
        )
        .entered();

        for &word in &self.candidates {
            let mut t = self.words[word];
            for slot in Slot::ALL {
                t = t.with_next(slot, next_state(t.is_alive(slot), t.neighbors(slot)));
            }
            self.words[word] = t;
            if t.changed() {
                self.staged.push(word);
            }
        }
        self.candidates.clear();

        let mut staged = mem::take(&mut self.staged);
        trace!(words = staged.len(), "staged");
        for &word in &staged {
            // next bits are left alone by flips, so this reads the decision
            for slot in Slot::ALL {
                let next = self.words[word].next(slot);
                self.flip(word * 3 + slot.offset(), next);
            }
        }
        staged.clear();
        self.staged = staged;
        self.generation += 1;
    }
}
impl Population for Triplets {
    fn population(&self) -> u64 {
        self.words.as_slice().population()
    }
    fn is_empty(&self) -> bool {
        Population::is_empty(self.words.as_slice())
    }
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::Triplets;
    use crate::{test_cells, Engine, Naive, Population};

    fn assert_counts(engine: &Triplets) {
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
    #[should_panic(expected = "divisible by 3")]
    fn width_must_divide() {
        Triplets::new(10, 4);
    }

    #[test]
    fn shared_edges() {
        let mut engine = Triplets::new(6, 3);
        engine.set(1, 1, true);
        assert_counts(&engine);
        assert_eq!(engine.neighbor_count(0, 1), 1);
        assert_eq!(engine.neighbor_count(2, 1), 1);
        assert_eq!(engine.neighbor_count(1, 1), 0);
        engine.set(2, 1, true);
        engine.set(3, 1, true);
        assert_counts(&engine);
        assert_eq!(engine.neighbor_count(1, 1), 1);
        assert_eq!(engine.neighbor_count(2, 1), 2);
        assert_eq!(engine.neighbor_count(3, 1), 1);
    }

    #[test]
    fn single_word_rows() {
        // every row is one word, so left and right are neighbors across the wrap
        for height in 1..=4 {
            let mut engine = Triplets::new(3, height);
            engine.set(0, 0, true);
            assert_counts(&engine);
            engine.set(2, 0, true);
            assert_counts(&engine);
            engine.set(1, height - 1, true);
            assert_counts(&engine);
            engine.set(0, 0, false);
            assert_counts(&engine);
        }
    }

    #[test]
    fn flips_are_idempotent() {
        let mut engine = Triplets::new(6, 6);
        assert!(engine.activate(7));
        let words = engine.words.clone();
        let changes = engine.changes().len();
        assert!(!engine.activate(7));
        assert!(!engine.deactivate(8));
        assert_eq!(engine.words, words);
        assert_eq!(engine.changes().len(), changes);
        assert_eq!(engine.population(), 1);
    }

    #[test]
    fn blinker() {
        let horizontal = test_cells! {"
            ......
            ......
            .ooo..
            ......
            ......
        "};
        let vertical = test_cells! {"
            ......
            ..o...
            ..o...
            ..o...
            ......
        "};
        let mut engine = Triplets::new(6, 5);
        engine.seed(&horizontal);
        engine.step();
        assert_eq!(engine.cells(), vertical);
        engine.step();
        assert_eq!(engine.cells(), horizontal);
        assert_counts(&engine);
    }

    #[test]
    fn counts_stay_exact() {
        let mut engine = Triplets::new(21, 14);
        engine.populate(&mut ChaCha8Rng::seed_from_u64(3));
        assert_counts(&engine);
        for _ in 0..40 {
            engine.step();
            assert_counts(&engine);
        }
    }
}
