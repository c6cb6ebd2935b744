//! Recipe selection for the single-path traversals.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses which of an element's recipes a single-path traversal follows.
pub trait RecipePicker {
    /// Return an index in `0..recipe_count`. Callers never pass zero.
    fn pick(&mut self, recipe_count: usize) -> usize;
}

/// Uniform choice backed by the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngPicker;

impl RecipePicker for ThreadRngPicker {
    fn pick(&mut self, recipe_count: usize) -> usize {
        rand::rng().random_range(0..recipe_count)
    }
}

/// Uniform choice from a seeded generator; repeatable for a fixed seed.
#[derive(Debug, Clone)]
pub struct SeededPicker {
    rng: StdRng,
}

impl SeededPicker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RecipePicker for SeededPicker {
    fn pick(&mut self, recipe_count: usize) -> usize {
        self.rng.random_range(0..recipe_count)
    }
}

impl<P: RecipePicker + ?Sized> RecipePicker for &mut P {
    fn pick(&mut self, recipe_count: usize) -> usize {
        (**self).pick(recipe_count)
    }
}
