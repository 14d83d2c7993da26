//! Single-gene uniform mutation.
//!
//! Every offspring gets exactly one gene perturbed: an index drawn uniformly from
//! `[0, len)`, then an offset drawn uniformly from `[-magnitude, +magnitude]`. Genes are
//! not clamped afterwards, so the search may leave the initial gene range.

use rand::Rng;
use rand_distr::{Distribution as _, Uniform};

use crate::{
    config::{self, ConfigError},
    genome::Genome,
};

/// Applies single-gene mutation with a fixed magnitude.
#[derive(Debug, Clone)]
pub struct Mutator {
    offset: Uniform<f64>,
}

impl Mutator {
    /// Creates a mutator drawing offsets from `[-magnitude, +magnitude]`.
    pub fn new(magnitude: f64) -> Result<Self, ConfigError> {
        config::validate_mutation_magnitude(magnitude)?;
        let offset = Uniform::new_inclusive(-magnitude, magnitude)
            .map_err(|_| ConfigError::InvalidMutationMagnitude { magnitude })?;
        Ok(Self { offset })
    }

    /// Returns a copy of `genome` with one gene perturbed.
    ///
    /// Draws the gene index first, then the offset.
    ///
    /// # Panics
    ///
    /// Panics if `genome` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use genopt_engine::{genome::Genome, mutation::Mutator};
    /// use rand::SeedableRng as _;
    /// use rand_pcg::Pcg32;
    ///
    /// let mutator = Mutator::new(0.5).unwrap();
    /// let genome = Genome::new(vec![0.0; 4]);
    /// let mutated = mutator.mutate(&genome, &mut Pcg32::seed_from_u64(0));
    /// let changed = mutated.iter().filter(|&&g| g != 0.0).count();
    /// assert!(changed <= 1);
    /// assert!(mutated.iter().all(|g| g.abs() <= 0.5));
    /// ```
    #[must_use]
    pub fn mutate<R>(&self, genome: &Genome, rng: &mut R) -> Genome
    where
        R: Rng + ?Sized,
    {
        assert!(!genome.is_empty(), "cannot mutate an empty genome");
        let index = rng.random_range(0..genome.len());
        let delta = self.offset.sample(rng);
        genome.with_offset(index, delta)
    }

    /// Mutates every offspring in order, two draws each.
    pub fn mutate_all<R>(&self, offspring: &[Genome], rng: &mut R) -> Vec<Genome>
    where
        R: Rng + ?Sized,
    {
        offspring.iter().map(|g| self.mutate(g, rng)).collect()
    }
}

impl Default for Mutator {
    fn default() -> Self {
        Self::new(1.0).expect("unit magnitude is valid")
    }
}
