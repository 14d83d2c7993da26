use std::{iter, path::PathBuf};

use genopt_engine::{Engine, EngineConfig, GenerationReport};

use crate::{
    model::run_record::RunRecord,
    objective::{BuiltinObjective, ObjectiveKind},
    util,
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct OptimizeArg {
    /// Objective to maximize (linear, sphere, rastrigin)
    #[arg(long, default_value = "linear")]
    objective: ObjectiveKind,
    /// Comma-separated weights of the linear objective
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    weights: Option<Vec<f64>>,
    /// Engine configuration file (JSON); flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of genomes per generation
    #[arg(long)]
    population_size: Option<usize>,
    /// Number of genes per genome
    #[arg(long)]
    num_genes: Option<usize>,
    /// Number of genomes carried over unchanged
    #[arg(long)]
    elite_count: Option<usize>,
    /// Number of generations
    #[arg(long)]
    generations: Option<usize>,
    /// Half-width of the uniform mutation offset
    #[arg(long)]
    mutation_magnitude: Option<f64>,
    /// Lower bound of the initial genes
    #[arg(long, allow_hyphen_values = true)]
    low: Option<f64>,
    /// Upper bound of the initial genes
    #[arg(long, allow_hyphen_values = true)]
    high: Option<f64>,
    /// Random seed (drawn at random when neither this nor --config is given)
    #[arg(long)]
    seed: Option<u64>,
    /// Evaluate each generation on all available cores
    #[arg(long)]
    parallel: bool,
    /// Print every genome of every generation
    #[arg(long)]
    verbose: bool,
    /// Output file path for the run record
    #[arg(long)]
    output: Option<PathBuf>,
}

impl OptimizeArg {
    fn build_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file("engine config", path)?,
            None => EngineConfig::default(),
        };
        if let Some(population_size) = self.population_size {
            config.population_size = population_size;
        }
        if let Some(num_genes) = self.num_genes {
            config.num_genes = num_genes;
        }
        if let Some(elite_count) = self.elite_count {
            config.elite_count = elite_count;
        }
        if let Some(generations) = self.generations {
            config.num_generations = generations;
        }
        if let Some(magnitude) = self.mutation_magnitude {
            config.mutation_magnitude = magnitude;
        }
        if let Some(low) = self.low {
            config.gene_range.low = low;
        }
        if let Some(high) = self.high {
            config.gene_range.high = high;
        }
        match (self.seed, &self.config) {
            (Some(seed), _) => config.seed = seed,
            (None, Some(_)) => {}
            (None, None) => config.seed = rand::random(),
        }
        Ok(config)
    }
}

fn print_report(report: &GenerationReport<'_>, verbose: bool) {
    let stats = report.stats();
    eprintln!(
        "Generation #{}{}: best = {:.3}, mean = {:.3}, worst = {:.3}, std dev = {:.3}",
        report.generation,
        if report.is_final { " (final)" } else { "" },
        report.best_fitness,
        stats.mean,
        stats.min,
        stats.std_dev,
    );
    if verbose {
        for (i, (genome, fitness)) in
            iter::zip(report.population, report.fitness.values()).enumerate()
        {
            eprintln!("  {i:2}: {:.3?} => {fitness:.3}", genome.genes());
        }
        eprintln!("  best: #{} {:.3?}", report.best_index, report.best_genome().genes());
    }
}

pub(crate) fn run(arg: &OptimizeArg) -> anyhow::Result<()> {
    let config = arg.build_config()?;
    let objective = BuiltinObjective::new(arg.objective, arg.weights.clone(), config.num_genes)?;

    eprintln!(
        "Optimizing {} objective: {} genomes x {} genes, {} elites, {} generations, seed {}",
        objective.name(),
        config.population_size,
        config.num_genes,
        config.elite_count,
        config.num_generations,
        config.seed,
    );

    let verbose = arg.verbose;
    let engine =
        Engine::new(config.clone())?.with_observer(move |report| print_report(report, verbose));
    let solution = if arg.parallel {
        engine.run_parallel(&objective)?
    } else {
        engine.run(&objective)?
    };

    eprintln!();
    eprintln!("Optimization completed");
    eprintln!("  Best genome:   {:?}", solution.genome.genes());
    eprintln!("  Best fitness:  {}", solution.fitness);
    if let (Some(first), Some(last)) = (solution.history.first(), solution.history.last()) {
        eprintln!("  Improvement:   {:.3}", last - first);
    }

    let record = RunRecord::new(&objective, config, solution);
    util::write_json(&record, arg.output.as_deref())?;
    if let Some(path) = &arg.output {
        eprintln!("  Record saved:  {}", path.display());
    }

    Ok(())
}
