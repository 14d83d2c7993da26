//! Elitist truncation selection.
//!
//! The `elite_count` fittest genomes are extracted one at a time: each round scans the
//! remaining candidates for the maximum and removes it from the candidate set. Ties go to
//! the lower population index, which keeps selection deterministic. The fitness vector
//! itself is never modified; the bookkeeping lives in a separate mask.

use crate::{
    config::{self, ConfigError},
    fitness::FitnessVector,
    genome::{Genome, Population},
};

/// Returns the population indices of the `elite_count` fittest genomes, best first.
///
/// Costs `O(elite_count × len)`.
///
/// # Examples
///
/// ```
/// use genopt_engine::{fitness::FitnessVector, selection};
///
/// let fitness = FitnessVector::from(vec![0.5, 2.0, -1.0, 2.0, 1.5]);
/// assert_eq!(selection::rank_elites(&fitness, 3).unwrap(), vec![1, 3, 4]);
/// ```
pub fn rank_elites(fitness: &FitnessVector, elite_count: usize) -> Result<Vec<usize>, ConfigError> {
    config::validate_elite_count(elite_count, fitness.len())?;

    let values = fitness.values();
    let mut remaining = vec![true; values.len()];
    let mut ranked = Vec::with_capacity(elite_count);
    for _ in 0..elite_count {
        let mut best: Option<usize> = None;
        for (i, &value) in values.iter().enumerate() {
            if !remaining[i] {
                continue;
            }
            if best.is_none_or(|b| value > values[b]) {
                best = Some(i);
            }
        }
        let best = best.expect("elite count never exceeds the number of candidates");
        remaining[best] = false;
        ranked.push(best);
    }
    Ok(ranked)
}

/// Returns clones of the `elite_count` fittest genomes, best first.
///
/// # Panics
///
/// Panics if `fitness` and `population` differ in length.
pub fn select_elites(
    population: &Population,
    fitness: &FitnessVector,
    elite_count: usize,
) -> Result<Vec<Genome>, ConfigError> {
    assert_eq!(
        population.len(),
        fitness.len(),
        "fitness vector must match the population"
    );
    let ranked = rank_elites(fitness, elite_count)?;
    Ok(ranked
        .into_iter()
        .map(|i| population.genomes()[i].clone())
        .collect())
}
