use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::constants::GRID_SIZE;

/// Source of randomness for number assignment. Tests script it to get exact
/// permutations and team-swap outcomes.
pub trait RandomSource: Send {
    /// Uniform integer in `0..=upper`.
    fn pick_index(&mut self, upper: usize) -> usize;

    /// Fair coin.
    fn coin_flip(&mut self) -> bool;
}

pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// `Some(seed)` gives a reproducible sequence, `None` seeds from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }
}

impl RandomSource for SeededRandom {
    fn pick_index(&mut self, upper: usize) -> usize {
        self.rng.random_range(0..=upper)
    }

    fn coin_flip(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }
}

/// In-place Fisher–Yates: walks from the last index down to 1, swapping each
/// position with a uniform pick from `0..=i`.
pub fn fisher_yates<T>(items: &mut [T], rng: &mut dyn RandomSource) {
    for i in (1..items.len()).rev() {
        let j = rng.pick_index(i);
        items.swap(i, j);
    }
}

/// Random ordering of the header digits 0..=9.
pub fn digit_permutation(rng: &mut dyn RandomSource) -> Vec<u8> {
    let mut digits: Vec<u8> = (0..GRID_SIZE as u8).collect();
    fisher_yates(&mut digits, rng);
    digits
}
