//! Objective functions and fitness evaluation.
//!
//! The engine maximizes a caller-supplied [`Objective`]. Evaluation turns a
//! [`Population`] into a [`FitnessVector`] with one entry per genome, in the same order.
//! Fitness is recomputed from scratch every generation and never stored on the genome.
//!
//! Evaluation is all-or-nothing: the first failing genome (lowest index) aborts the whole
//! generation, since ranking needs a complete fitness vector. A NaN result counts as a
//! failure because it cannot be ranked.
//!
//! # Parallel evaluation
//!
//! Genomes are evaluated independently, so [`evaluate_parallel`] splits the population
//! into contiguous chunks, evaluates each chunk on a scoped thread, and writes the results
//! into disjoint slots of a pre-allocated vector. It returns exactly what [`evaluate`]
//! would, including which failure is reported.

use std::{convert, error::Error, iter, panic, thread};

use genopt_stats::descriptive::DescriptiveStats;

use crate::{
    error::{BoxedObjectiveError, EngineError},
    genome::{Genome, Population},
};

/// A scalar function of a genome to be maximized.
///
/// Closures returning `Result<f64, E>` implement this trait directly. For closures that
/// cannot fail, wrap them with [`infallible`].
///
/// # Examples
///
/// ```
/// use genopt_engine::{fitness::Objective, genome::Genome};
///
/// #[derive(Debug, derive_more::Display, derive_more::Error)]
/// #[display("genome has a negative gene")]
/// struct NegativeGene;
///
/// let sqrt_sum = |genome: &Genome| -> Result<f64, NegativeGene> {
///     genome.iter().map(|&g| if g < 0.0 { Err(NegativeGene) } else { Ok(g.sqrt()) }).sum()
/// };
/// assert_eq!(sqrt_sum.evaluate(&Genome::new(vec![4.0, 9.0])).unwrap(), 5.0);
/// assert!(sqrt_sum.evaluate(&Genome::new(vec![-1.0])).is_err());
/// ```
pub trait Objective {
    type Error: Error + Send + Sync + 'static;

    fn evaluate(&self, genome: &Genome) -> Result<f64, Self::Error>;
}

impl<F, E> Objective for F
where
    F: Fn(&Genome) -> Result<f64, E>,
    E: Error + Send + Sync + 'static,
{
    type Error = E;

    fn evaluate(&self, genome: &Genome) -> Result<f64, E> {
        self(genome)
    }
}

/// Objective adapter for functions that cannot fail. Created by [`infallible`].
#[derive(Debug, Clone, Copy)]
pub struct Infallible<F>(F);

/// Wraps an infallible function as an [`Objective`].
///
/// # Examples
///
/// ```
/// use genopt_engine::{fitness::{self, Objective}, genome::Genome};
///
/// let weights = [1.0, -3.0, 4.5, 2.0];
/// let dot = fitness::infallible(move |g| g.iter().zip(&weights).map(|(x, w)| x * w).sum());
/// assert_eq!(dot.evaluate(&Genome::new(vec![1.0, 1.0, 1.0, 1.0])).unwrap(), 4.5);
/// ```
pub fn infallible<F>(f: F) -> Infallible<F>
where
    F: Fn(&Genome) -> f64,
{
    Infallible(f)
}

impl<F> Objective for Infallible<F>
where
    F: Fn(&Genome) -> f64,
{
    type Error = convert::Infallible;

    fn evaluate(&self, genome: &Genome) -> Result<f64, Self::Error> {
        Ok((self.0)(genome))
    }
}

/// Source of an [`EngineError::ObjectiveEvaluation`] when the objective returned NaN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("objective returned NaN")]
pub struct NanFitness;

/// Fitness of every genome of a population, index-aligned with it.
#[derive(Debug, Clone, PartialEq)]
pub struct FitnessVector(Vec<f64>);

impl FitnessVector {
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the index and value of the highest fitness.
    ///
    /// Ties go to the lowest index. Returns `None` if the vector is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use genopt_engine::{fitness, genome::{Genome, Population}};
    ///
    /// let population = Population::from_genomes(vec![
    ///     Genome::new(vec![1.0]),
    ///     Genome::new(vec![3.0]),
    ///     Genome::new(vec![3.0]),
    /// ]);
    /// let fitness = fitness::evaluate(&population, &fitness::infallible(|g| g[0]), 0).unwrap();
    /// assert_eq!(fitness.best(), Some((1, 3.0)));
    /// ```
    #[must_use]
    pub fn best(&self) -> Option<(usize, f64)> {
        self.0
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (i, value)| match best {
                Some((_, best_value)) if value <= best_value => best,
                _ => Some((i, value)),
            })
    }

    /// Summarizes the fitness values, or `None` if the vector is empty.
    #[must_use]
    pub fn stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.0.iter().copied())
    }
}

impl From<Vec<f64>> for FitnessVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

fn score<O>(objective: &O, genome: &Genome) -> Result<f64, BoxedObjectiveError>
where
    O: Objective + ?Sized,
{
    match objective.evaluate(genome) {
        Ok(value) if value.is_nan() => Err(Box::new(NanFitness)),
        Ok(value) => Ok(value),
        Err(err) => Err(Box::new(err)),
    }
}

fn evaluation_error(
    population: &Population,
    generation: usize,
    index: usize,
    source: BoxedObjectiveError,
) -> EngineError {
    EngineError::ObjectiveEvaluation {
        generation,
        index,
        genome: population.genomes()[index].clone(),
        source,
    }
}

/// Evaluates every genome of `population` in order on the calling thread.
///
/// `generation` is only used to label a failure.
pub fn evaluate<O>(
    population: &Population,
    objective: &O,
    generation: usize,
) -> Result<FitnessVector, EngineError>
where
    O: Objective + ?Sized,
{
    population
        .iter()
        .enumerate()
        .map(|(index, genome)| {
            score(objective, genome)
                .map_err(|source| evaluation_error(population, generation, index, source))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(FitnessVector)
}

/// Evaluates every genome of `population` on up to `threads` scoped worker threads.
///
/// Blocks until every genome is evaluated. If the objective panics, the panic is
/// propagated to the caller.
pub fn evaluate_parallel<O>(
    population: &Population,
    objective: &O,
    generation: usize,
    threads: usize,
) -> Result<FitnessVector, EngineError>
where
    O: Objective + Sync + ?Sized,
{
    let chunk_len = population.len().div_ceil(threads.max(1)).max(1);
    let mut values = vec![0.0; population.len()];

    let failures = thread::scope(|s| {
        let handles = population
            .genomes()
            .chunks(chunk_len)
            .zip(values.chunks_mut(chunk_len))
            .enumerate()
            .map(|(chunk_index, (genomes, slots))| {
                s.spawn(move || {
                    for (offset, (genome, slot)) in iter::zip(genomes, slots).enumerate() {
                        match score(objective, genome) {
                            Ok(value) => *slot = value,
                            Err(source) => return Some((chunk_index * chunk_len + offset, source)),
                        }
                    }
                    None
                })
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
            .collect::<Vec<_>>()
    });

    // chunks are in population order, so the first failure has the lowest index
    if let Some((index, source)) = failures.into_iter().flatten().next() {
        return Err(evaluation_error(population, generation, index, source));
    }
    Ok(FitnessVector(values))
}
