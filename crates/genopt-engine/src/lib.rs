//! Gradient-free optimization of real-valued vectors with a genetic algorithm.
//!
//! The engine maximizes a caller-supplied objective over fixed-length vectors of `f64`
//! ("genomes"). It keeps a population of candidates and improves it generation by
//! generation:
//!
//! 1. **Evaluate** - Apply the objective to every genome ([`fitness`])
//! 2. **Select** - Keep the `elite_count` fittest genomes unchanged ([`selection`])
//! 3. **Breed** - Fill the remaining slots with single-point crossovers of random elite
//!    pairs ([`crossover`])
//! 4. **Mutate** - Perturb exactly one gene of every child ([`mutation`])
//! 5. **Replace** - The next population is the elites followed by the children
//!
//! After the configured number of generations the fittest genome of the final population
//! is reported ([`engine`]).
//!
//! # Architecture
//!
//! ```text
//! EngineConfig ──validate──> Engine (owns Population + Pcg32)
//!                              │
//!        ┌─────────────────────┘
//!        ↓
//!   Population ──Objective──> FitnessVector ──> elites ──> offspring ──> Population
//! ```
//!
//! # Reproducibility
//!
//! A run draws all of its randomness from one [`rand_pcg::Pcg32`] seeded with
//! [`EngineConfig::seed`](config::EngineConfig::seed), in a fixed order documented in
//! [`engine`]. The same configuration and a deterministic objective always give
//! bit-identical results, whether evaluation runs on one thread or many.
//!
//! # Example
//!
//! ```
//! use genopt_engine::{config::EngineConfig, fitness};
//!
//! let weights = [1.0, -3.0, 4.5, 2.0];
//! let objective = fitness::infallible(move |g| g.iter().zip(&weights).map(|(x, w)| x * w).sum());
//!
//! let config = EngineConfig { seed: 42, ..EngineConfig::default() };
//! let (genome, fitness) = genopt_engine::run(&config, &objective).unwrap();
//! assert_eq!(genome.len(), 4);
//! assert!(fitness.is_finite());
//! ```
//!
//! # Current Limitations
//!
//! - **Single objective**: fitness is one scalar; trade-offs must be folded into it
//! - **Unconstrained**: genes are only bounded at initialization; mutation may move them
//!   anywhere
//! - **Fixed operators**: mutation magnitude and crossover point never adapt

pub mod config;
pub mod crossover;
pub mod engine;
pub mod error;
pub mod fitness;
pub mod genome;
pub mod mutation;
pub mod selection;

pub use self::{
    config::{ConfigError, EngineConfig, GeneRange},
    engine::{Engine, GenerationReport, Solution, State},
    error::EngineError,
    fitness::{FitnessVector, Objective},
    genome::{Genome, Population},
};

/// Runs a complete optimization and returns the best genome with its fitness.
///
/// Shorthand for [`Engine::new`] followed by [`Engine::run`].
pub fn run<O>(config: &EngineConfig, objective: &O) -> Result<(Genome, f64), EngineError>
where
    O: Objective + ?Sized,
{
    Engine::new(config.clone())?
        .run(objective)
        .map(Solution::into_parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_rejects_too_many_elites() {
        let config = EngineConfig {
            elite_count: 20,
            ..EngineConfig::default()
        };
        let err = run(&config, &fitness::infallible(|g: &Genome| g[0])).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidConfiguration(ConfigError::TooManyElites { .. })
        ));
    }

    #[test]
    fn test_run_matches_engine() {
        let config = EngineConfig {
            seed: 17,
            ..EngineConfig::default()
        };
        let objective = fitness::infallible(|g: &Genome| -g.iter().map(|x| x.abs()).sum::<f64>());
        let (genome, fitness) = run(&config, &objective).unwrap();
        let solution = Engine::new(config).unwrap().run(&objective).unwrap();
        assert_eq!(genome, solution.genome);
        assert_eq!(fitness.to_bits(), solution.fitness.to_bits());
    }
}
