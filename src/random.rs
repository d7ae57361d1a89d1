use std::collections::VecDeque;

use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::Exp1;

/// The three kinds of draw the model makes. Every component that needs
/// randomness takes `&mut impl RandomSource`; a run owns exactly one stream.
pub trait RandomSource {
    /// Uniform integer in `[lo, hi]`, both ends inclusive.
    fn uniform_int(&mut self, lo: u64, hi: u64) -> u64;

    /// Exponentially distributed value with the given mean.
    fn exponential(&mut self, mean: f64) -> f64;

    /// Index of the outcome drawn with the given weights.
    fn categorical(&mut self, probabilities: &[f64]) -> usize;
}

/// Seeded ChaCha20 stream. Same seed, same draws.
pub struct ChaChaSource {
    rng: ChaCha20Rng,
}

impl ChaChaSource {
    pub fn new(seed: u64) -> Self {
        ChaChaSource { rng: ChaCha20Rng::seed_from_u64(seed) }
    }
}

impl RandomSource for ChaChaSource {
    fn uniform_int(&mut self, lo: u64, hi: u64) -> u64 {
        self.rng.random_range(lo..=hi)
    }

    fn exponential(&mut self, mean: f64) -> f64 {
        let unit: f64 = self.rng.sample(Exp1);
        unit * mean
    }

    fn categorical(&mut self, probabilities: &[f64]) -> usize {
        let dist = WeightedIndex::new(probabilities)
            .expect("severity probabilities are validated before the run");
        dist.sample(&mut self.rng)
    }
}

/// Deterministic test double: replays fixed sequences of draws in request
/// order and records every mean it is asked for. Running out of a sequence
/// is a scripting mistake and panics.
#[derive(Debug, Default, Clone)]
pub struct ScriptedSource {
    ints: VecDeque<u64>,
    exponentials: VecDeque<f64>,
    categoricals: VecDeque<usize>,
    pub requested_means: Vec<f64>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ints(mut self, draws: impl IntoIterator<Item = u64>) -> Self {
        self.ints.extend(draws);
        self
    }

    pub fn with_exponentials(mut self, draws: impl IntoIterator<Item = f64>) -> Self {
        self.exponentials.extend(draws);
        self
    }

    pub fn with_categoricals(mut self, draws: impl IntoIterator<Item = usize>) -> Self {
        self.categoricals.extend(draws);
        self
    }

    /// True once every scripted draw has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.ints.is_empty() && self.exponentials.is_empty() && self.categoricals.is_empty()
    }
}

impl RandomSource for ScriptedSource {
    fn uniform_int(&mut self, lo: u64, hi: u64) -> u64 {
        let v = self.ints.pop_front().expect("scripted source ran out of uniform_int draws");
        assert!(lo <= v && v <= hi, "scripted draw {v} outside [{lo}, {hi}]");
        v
    }

    fn exponential(&mut self, mean: f64) -> f64 {
        self.requested_means.push(mean);
        self.exponentials.pop_front().expect("scripted source ran out of exponential draws")
    }

    fn categorical(&mut self, probabilities: &[f64]) -> usize {
        let i = self.categoricals.pop_front().expect("scripted source ran out of categorical draws");
        assert!(i < probabilities.len(), "scripted outcome {i} out of {} outcomes", probabilities.len());
        i
    }
}
