//! The generational controller.
//!
//! [`Engine`] owns the population and the run's random source, and drives the
//! generations as a strict sequential pipeline:
//!
//! ```text
//! Initialized → Evaluating → Selecting → Breeding → Mutating → Replacing ─┐
//!                   ↑                                                      │
//!                   └──────────────────────────────────────────────────────┘
//!               Evaluating → Terminated   (after num_generations replacements)
//! ```
//!
//! `num_generations` counts replacements. The population is evaluated once before the
//! first replacement and once after the last, so a run performs `num_generations + 1`
//! evaluations and `num_generations = 0` simply reports the best initial genome.
//!
//! # Random draw order
//!
//! All randomness comes from one generator, consumed in a fixed order:
//!
//! 1. initial genes, row-major (`population_size * num_genes` draws)
//! 2. per generation, the two parent draws of every offspring slot, slot by slot
//! 3. per generation, the gene index and offset draws of every offspring, in slot order
//!
//! Evaluation draws nothing, so [`Engine::run`] and [`Engine::run_parallel`] produce
//! bit-identical results for the same seed.

use std::{num::NonZeroUsize, thread};

use genopt_stats::descriptive::DescriptiveStats;
use log::{debug, info, trace};
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    config::EngineConfig,
    crossover,
    error::EngineError,
    fitness::{self, FitnessVector, Objective},
    genome::{Genome, Population},
    mutation::Mutator,
    selection,
};

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum State {
    Initialized,
    Evaluating,
    Selecting,
    Breeding,
    Mutating,
    Replacing,
    Terminated,
}

/// Snapshot handed to the observer after every evaluation.
#[derive(Debug, Clone, Copy)]
pub struct GenerationReport<'a> {
    /// Generation index (0 is the initial population)
    pub generation: usize,
    /// `true` for the final evaluation, after which the run terminates
    pub is_final: bool,
    pub population: &'a Population,
    pub fitness: &'a FitnessVector,
    /// Index of the fittest genome (lowest index on ties)
    pub best_index: usize,
    pub best_fitness: f64,
}

impl GenerationReport<'_> {
    #[must_use]
    pub fn best_genome(&self) -> &Genome {
        &self.population.genomes()[self.best_index]
    }

    /// Summary of the generation's fitness values.
    #[must_use]
    pub fn stats(&self) -> DescriptiveStats {
        self.fitness
            .stats()
            .expect("population is never empty")
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Fittest genome of the final population
    pub genome: Genome,
    /// Its fitness
    pub fitness: f64,
    /// Number of replacements performed
    pub generations: usize,
    /// Best fitness of every evaluation, initial population first
    pub history: Vec<f64>,
}

impl Solution {
    #[must_use]
    pub fn into_parts(self) -> (Genome, f64) {
        (self.genome, self.fitness)
    }
}

type Observer<'o> = Box<dyn FnMut(&GenerationReport<'_>) + 'o>;

/// Evolutionary search over real-valued genomes.
///
/// # Example
///
/// ```
/// use genopt_engine::{config::EngineConfig, engine::Engine, fitness};
///
/// let config = EngineConfig { num_generations: 20, seed: 3, ..EngineConfig::default() };
/// let mut reported = 0;
/// let solution = Engine::new(config)
///     .unwrap()
///     .with_observer(|report| {
///         assert_eq!(report.population.len(), 10);
///         reported += 1;
///     })
///     .run(&fitness::infallible(|g| -g.iter().map(|x| x * x).sum::<f64>()))
///     .unwrap();
/// assert_eq!(reported, 21);
/// assert_eq!(solution.history.len(), 21);
/// ```
pub struct Engine<'o, R = Pcg32> {
    config: EngineConfig,
    rng: R,
    population: Population,
    mutator: Mutator,
    crossover_point: usize,
    state: State,
    generation: usize,
    observer: Option<Observer<'o>>,
}

impl<'o> Engine<'o> {
    /// Validates `config` and draws the initial population from a generator seeded with
    /// `config.seed`.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let rng = Pcg32::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<'o, R> Engine<'o, R>
where
    R: Rng,
{
    /// Like [`Engine::new`], but draws from `rng`; `config.seed` is ignored.
    ///
    /// Nothing is drawn from `rng` if `config` is invalid.
    pub fn with_rng(config: EngineConfig, mut rng: R) -> Result<Self, EngineError> {
        config.validate()?;
        let mutator = Mutator::new(config.mutation_magnitude)?;
        let population = Population::random(
            &mut rng,
            config.population_size,
            config.num_genes,
            config.gene_range,
        )?;
        let crossover_point = crossover::crossover_point(config.num_genes);
        trace!("state -> {}", State::Initialized);
        Ok(Self {
            config,
            rng,
            population,
            mutator,
            crossover_point,
            state: State::Initialized,
            generation: 0,
            observer: None,
        })
    }

    /// Registers a callback invoked after every evaluation.
    #[must_use]
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: FnMut(&GenerationReport<'_>) + 'o,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Runs all generations, evaluating on the calling thread.
    pub fn run<O>(self, objective: &O) -> Result<Solution, EngineError>
    where
        O: Objective + ?Sized,
    {
        self.drive(|population, generation| fitness::evaluate(population, objective, generation))
    }

    /// Runs all generations, evaluating each generation across scoped worker threads.
    ///
    /// Uses one thread per available core. Results are identical to [`Engine::run`].
    pub fn run_parallel<O>(self, objective: &O) -> Result<Solution, EngineError>
    where
        O: Objective + Sync + ?Sized,
    {
        let threads = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        self.drive(|population, generation| {
            fitness::evaluate_parallel(population, objective, generation, threads)
        })
    }

    fn transition(&mut self, next: State) {
        trace!("generation {}: {} -> {}", self.generation, self.state, next);
        self.state = next;
    }

    fn drive<F>(mut self, mut evaluate: F) -> Result<Solution, EngineError>
    where
        F: FnMut(&Population, usize) -> Result<FitnessVector, EngineError>,
    {
        info!(
            "starting run: {} genomes x {} genes, {} elites, {} generations",
            self.config.population_size,
            self.config.num_genes,
            self.config.elite_count,
            self.config.num_generations,
        );
        let mut history = Vec::with_capacity(self.config.num_generations + 1);

        loop {
            self.transition(State::Evaluating);
            let fitness = evaluate(&self.population, self.generation)?;
            let (best_index, best_fitness) = fitness.best().expect("population is never empty");
            let is_final = self.generation == self.config.num_generations;
            history.push(best_fitness);
            debug!(
                "generation {}: best fitness = {best_fitness}",
                self.generation
            );
            if let Some(observer) = &mut self.observer {
                observer(&GenerationReport {
                    generation: self.generation,
                    is_final,
                    population: &self.population,
                    fitness: &fitness,
                    best_index,
                    best_fitness,
                });
            }

            if is_final {
                self.transition(State::Terminated);
                info!(
                    "run terminated after {} generations: best fitness = {best_fitness}",
                    self.generation
                );
                return Ok(Solution {
                    genome: self.population.genomes()[best_index].clone(),
                    fitness: best_fitness,
                    generations: self.generation,
                    history,
                });
            }

            self.transition(State::Selecting);
            let elites =
                selection::select_elites(&self.population, &fitness, self.config.elite_count)?;

            self.transition(State::Breeding);
            let offspring = crossover::breed(
                &elites,
                self.config.offspring_count(),
                self.crossover_point,
                &mut self.rng,
            );

            self.transition(State::Mutating);
            let offspring = self.mutator.mutate_all(&offspring, &mut self.rng);

            self.transition(State::Replacing);
            self.population = Population::from_parts(elites, offspring);
            debug_assert_eq!(self.population.len(), self.config.population_size);
            self.generation += 1;
        }
    }
}
