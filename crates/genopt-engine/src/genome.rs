//! Genomes and populations.
//!
//! A [`Genome`] is a fixed-length vector of real-valued genes. Genomes are immutable:
//! crossover and mutation always build a new genome from existing ones, so an elite
//! carried into the next generation can never be changed through a shared handle.
//!
//! A [`Population`] is the ordered collection of genomes considered in one generation.
//! Its length is constant for the whole run.

use std::{ops::Deref, slice};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{self, ConfigError, GeneRange};

/// A candidate solution: an ordered, fixed-length sequence of genes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genome(Vec<f64>);

impl Genome {
    #[must_use]
    pub fn new(genes: Vec<f64>) -> Self {
        Self(genes)
    }

    /// Creates a genome by applying a function to each gene index.
    ///
    /// # Examples
    ///
    /// ```
    /// use genopt_engine::genome::Genome;
    ///
    /// let genome = Genome::from_fn(3, |i| i as f64 * 0.5);
    /// assert_eq!(genome.genes(), &[0.0, 0.5, 1.0]);
    /// ```
    pub fn from_fn<F>(len: usize, f: F) -> Self
    where
        F: FnMut(usize) -> f64,
    {
        Self((0..len).map(f).collect())
    }

    /// Draws a genome whose genes are independently uniform in `range`.
    ///
    /// Consumes exactly `len` draws from `rng`, in gene order.
    ///
    /// # Panics
    ///
    /// Panics if `range` is not valid (see [`GeneRange::is_valid`]).
    pub fn random<R>(rng: &mut R, len: usize, range: GeneRange) -> Self
    where
        R: Rng + ?Sized,
    {
        assert!(range.is_valid(), "invalid gene range");
        Self::from_fn(len, |_| rng.random_range(range.low..=range.high))
    }

    #[must_use]
    pub fn genes(&self) -> &[f64] {
        &self.0
    }

    /// Returns a copy of this genome with `delta` added to the gene at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn with_offset(&self, index: usize, delta: f64) -> Self {
        let mut genes = self.0.clone();
        genes[index] += delta;
        Self(genes)
    }
}

impl Deref for Genome {
    type Target = [f64];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[f64]> for Genome {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for Genome {
    fn from(genes: Vec<f64>) -> Self {
        Self(genes)
    }
}

/// The genomes of one generation.
///
/// Index order carries no meaning, except that after a replacement the elites occupy the
/// front positions in descending fitness order.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    genomes: Vec<Genome>,
}

impl Population {
    /// Creates a random population of `size` genomes with `num_genes` genes each.
    ///
    /// Genes are drawn row-major: all genes of the first genome, then the second, and so
    /// on, for `size * num_genes` draws in total. Nothing is drawn if the parameters are
    /// invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use genopt_engine::{config::GeneRange, genome::Population};
    /// use rand::SeedableRng as _;
    /// use rand_pcg::Pcg32;
    ///
    /// let mut rng = Pcg32::seed_from_u64(1);
    /// let population = Population::random(&mut rng, 6, 3, GeneRange::new(-1.0, 1.0)).unwrap();
    /// assert_eq!(population.len(), 6);
    /// assert!(population.iter().all(|g| g.len() == 3));
    /// ```
    pub fn random<R>(
        rng: &mut R,
        size: usize,
        num_genes: usize,
        range: GeneRange,
    ) -> Result<Self, ConfigError>
    where
        R: Rng + ?Sized,
    {
        config::validate_shape(size, num_genes, range)?;
        let genomes = (0..size)
            .map(|_| Genome::random(rng, num_genes, range))
            .collect();
        Ok(Self { genomes })
    }

    /// Creates a population from existing genomes.
    ///
    /// # Panics
    ///
    /// Panics if the genomes do not all have the same length.
    #[must_use]
    pub fn from_genomes(genomes: Vec<Genome>) -> Self {
        if let Some(first) = genomes.first() {
            assert!(
                genomes.iter().all(|g| g.len() == first.len()),
                "all genomes must have the same length"
            );
        }
        Self { genomes }
    }

    /// Builds the next population: elites first, then offspring.
    pub(crate) fn from_parts(mut elites: Vec<Genome>, offspring: Vec<Genome>) -> Self {
        elites.extend(offspring);
        Self::from_genomes(elites)
    }

    #[must_use]
    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    /// Returns the genome length, or `None` for an empty population.
    #[must_use]
    pub fn num_genes(&self) -> Option<usize> {
        self.genomes.first().map(|g| g.len())
    }

    pub fn iter(&self) -> slice::Iter<'_, Genome> {
        self.genomes.iter()
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Genome;
    type IntoIter = slice::Iter<'a, Genome>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_random_population_within_range() {
        let mut rng = Pcg32::seed_from_u64(42);
        let range = GeneRange::new(-10.0, 10.0);
        let population = Population::random(&mut rng, 10, 4, range).unwrap();
        assert_eq!(population.len(), 10);
        assert_eq!(population.num_genes(), Some(4));
        for genome in &population {
            assert!(genome.iter().all(|&g| range.contains(g)));
        }
    }

    #[test]
    fn test_random_population_is_row_major() {
        let range = GeneRange::new(0.0, 1.0);
        let mut rng = Pcg32::seed_from_u64(9);
        let population = Population::random(&mut rng, 3, 2, range).unwrap();

        let mut expected_rng = Pcg32::seed_from_u64(9);
        let expected = (0..6)
            .map(|_| expected_rng.random_range(0.0..=1.0))
            .collect::<Vec<f64>>();
        let actual = population
            .iter()
            .flat_map(|g| g.genes().iter().copied())
            .collect::<Vec<_>>();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_degenerate_range_gives_constant_genes() {
        let mut rng = Pcg32::seed_from_u64(0);
        let population = Population::random(&mut rng, 4, 3, GeneRange::new(2.5, 2.5)).unwrap();
        assert!(population.iter().all(|g| g.iter().all(|&x| x == 2.5)));
    }

    #[test]
    fn test_invalid_shape_draws_nothing() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut untouched = Pcg32::seed_from_u64(5);

        let err = Population::random(&mut rng, 0, 4, GeneRange::default()).unwrap_err();
        assert_eq!(err, ConfigError::EmptyPopulation);
        let err = Population::random(&mut rng, 4, 0, GeneRange::default()).unwrap_err();
        assert_eq!(err, ConfigError::NoGenes);
        let err = Population::random(&mut rng, 4, 4, GeneRange::new(1.0, 0.0)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGeneRange { .. }));

        assert_eq!(rng.random::<u64>(), untouched.random::<u64>());
    }

    #[test]
    fn test_with_offset_changes_one_gene() {
        let genome = Genome::new(vec![1.0, 2.0, 3.0]);
        let mutated = genome.with_offset(1, 0.25);
        assert_eq!(mutated.genes(), &[1.0, 2.25, 3.0]);
        assert_eq!(genome.genes(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_genome_serializes_as_array() {
        let genome = Genome::new(vec![1.0, -0.5]);
        assert_eq!(serde_json::to_string(&genome).unwrap(), "[1.0,-0.5]");
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_from_genomes_rejects_ragged() {
        let _ = Population::from_genomes(vec![Genome::new(vec![1.0]), Genome::new(vec![1.0, 2.0])]);
    }
}
