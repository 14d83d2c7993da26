//! Run configuration and its validation.
//!
//! [`EngineConfig`] holds every parameter of a run. It is plain data: it can be built in
//! code, loaded from JSON, or started from [`EngineConfig::default`], which reproduces
//! the classic small setup (10 genomes of 4 genes, 5 elites, 100 generations).
//!
//! Validation is eager. [`EngineConfig::validate`] is called before the engine draws a
//! single random number or evaluates a single genome, so a bad configuration never costs
//! objective calls.

use serde::{Deserialize, Serialize};

/// Inclusive range `[low, high]` used to draw the initial genes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneRange {
    pub low: f64,
    pub high: f64,
}

impl GeneRange {
    #[must_use]
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Returns `true` if `low <= high` and both the bounds and the width are finite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.low <= self.high && (self.high - self.low).is_finite()
    }

    /// Returns `true` if `value` lies within the range.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.low..=self.high).contains(&value)
    }
}

impl Default for GeneRange {
    fn default() -> Self {
        Self::new(-10.0, 10.0)
    }
}

impl From<(f64, f64)> for GeneRange {
    fn from((low, high): (f64, f64)) -> Self {
        Self::new(low, high)
    }
}

/// Parameters of a single optimization run.
///
/// Missing fields fall back to [`EngineConfig::default`] when deserializing.
///
/// # Example
///
/// ```
/// use genopt_engine::config::EngineConfig;
///
/// let config: EngineConfig =
///     serde_json::from_str(r#"{ "population_size": 20, "elite_count": 4, "seed": 7 }"#).unwrap();
/// assert_eq!(config.population_size, 20);
/// assert_eq!(config.num_genes, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Number of genomes in every generation (at least 1)
    pub population_size: usize,
    /// Length of every genome (at least 1)
    pub num_genes: usize,
    /// Range the initial genes are drawn from
    pub gene_range: GeneRange,
    /// Number of genomes carried over unchanged (`1..=population_size`)
    pub elite_count: usize,
    /// Number of generational replacements
    pub num_generations: usize,
    /// Half-width of the uniform mutation offset (non-negative)
    pub mutation_magnitude: f64,
    /// Seed of the run's random source
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            num_genes: 4,
            gene_range: GeneRange::default(),
            elite_count: 5,
            num_generations: 100,
            mutation_magnitude: 1.0,
            seed: 0,
        }
    }
}

impl EngineConfig {
    /// Number of offspring bred every generation.
    #[must_use]
    pub fn offspring_count(&self) -> usize {
        self.population_size.saturating_sub(self.elite_count)
    }

    /// Checks every parameter and reports the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_shape(self.population_size, self.num_genes, self.gene_range)?;
        validate_elite_count(self.elite_count, self.population_size)?;
        validate_mutation_magnitude(self.mutation_magnitude)?;
        Ok(())
    }
}

pub(crate) fn validate_shape(
    population_size: usize,
    num_genes: usize,
    gene_range: GeneRange,
) -> Result<(), ConfigError> {
    if population_size == 0 {
        return Err(ConfigError::EmptyPopulation);
    }
    if num_genes == 0 {
        return Err(ConfigError::NoGenes);
    }
    if !gene_range.is_valid() {
        return Err(ConfigError::InvalidGeneRange {
            low: gene_range.low,
            high: gene_range.high,
        });
    }
    Ok(())
}

pub(crate) fn validate_elite_count(
    elite_count: usize,
    population_size: usize,
) -> Result<(), ConfigError> {
    if elite_count == 0 {
        return Err(ConfigError::NoElites);
    }
    if elite_count > population_size {
        return Err(ConfigError::TooManyElites {
            elite_count,
            population_size,
        });
    }
    Ok(())
}

pub(crate) fn validate_mutation_magnitude(magnitude: f64) -> Result<(), ConfigError> {
    // The offset interval [-magnitude, magnitude] must have a finite width.
    if magnitude.is_nan() || magnitude < 0.0 || !(2.0 * magnitude).is_finite() {
        return Err(ConfigError::InvalidMutationMagnitude { magnitude });
    }
    Ok(())
}

/// A configuration parameter outside its valid domain.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("population size must be at least 1")]
    EmptyPopulation,
    #[display("number of genes must be at least 1")]
    NoGenes,
    #[display(
        "invalid gene range [{low}, {high}]: low must not exceed high and high - low must be finite"
    )]
    InvalidGeneRange { low: f64, high: f64 },
    #[display("elite count must be at least 1")]
    NoElites,
    #[display("elite count ({elite_count}) exceeds population size ({population_size})")]
    TooManyElites {
        elite_count: usize,
        population_size: usize,
    },
    #[display(
        "mutation magnitude must be non-negative with a finite offset width (2 * magnitude), got {magnitude}"
    )]
    InvalidMutationMagnitude { magnitude: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.offspring_count(), 5);
    }

    #[test]
    fn test_rejects_empty_population() {
        let config = EngineConfig {
            population_size: 0,
            elite_count: 0,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyPopulation));
    }

    #[test]
    fn test_rejects_no_genes() {
        let config = EngineConfig {
            num_genes: 0,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoGenes));
    }

    #[test]
    fn test_rejects_inverted_range() {
        let config = EngineConfig {
            gene_range: GeneRange::new(1.0, -1.0),
            ..EngineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidGeneRange {
                low: 1.0,
                high: -1.0
            })
        );
    }

    #[test]
    fn test_rejects_non_finite_range() {
        let config = EngineConfig {
            gene_range: GeneRange::new(f64::NEG_INFINITY, 0.0),
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidGeneRange { .. })
        ));
    }

    #[test]
    fn test_rejects_range_with_overflowing_width() {
        let config = EngineConfig {
            gene_range: GeneRange::new(-f64::MAX, f64::MAX),
            ..EngineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidGeneRange {
                low: -f64::MAX,
                high: f64::MAX
            })
        );

        let half = EngineConfig {
            gene_range: GeneRange::new(-f64::MAX / 2.0, f64::MAX / 2.0),
            ..EngineConfig::default()
        };
        assert!(half.validate().is_ok());
    }

    #[test]
    fn test_accepts_degenerate_range() {
        let config = EngineConfig {
            gene_range: GeneRange::new(3.0, 3.0),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_elite_count_bounds() {
        let zero = EngineConfig {
            elite_count: 0,
            ..EngineConfig::default()
        };
        assert_eq!(zero.validate(), Err(ConfigError::NoElites));

        let too_many = EngineConfig {
            elite_count: 11,
            ..EngineConfig::default()
        };
        assert_eq!(
            too_many.validate(),
            Err(ConfigError::TooManyElites {
                elite_count: 11,
                population_size: 10
            })
        );

        let all = EngineConfig {
            elite_count: 10,
            ..EngineConfig::default()
        };
        assert!(all.validate().is_ok());
        assert_eq!(all.offspring_count(), 0);
    }

    #[test]
    fn test_mutation_magnitude() {
        for magnitude in [-0.5, f64::NAN, f64::INFINITY, f64::MAX] {
            let config = EngineConfig {
                mutation_magnitude: magnitude,
                ..EngineConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidMutationMagnitude { .. })
            ));
        }
        let zero = EngineConfig {
            mutation_magnitude: 0.0,
            ..EngineConfig::default()
        };
        assert!(zero.validate().is_ok());

        let widest = EngineConfig {
            mutation_magnitude: f64::MAX / 2.0,
            ..EngineConfig::default()
        };
        assert!(widest.validate().is_ok());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "gene_range": { "low": -1.0, "high": 2.0 } }"#).unwrap();
        assert_eq!(config.gene_range, GeneRange::new(-1.0, 2.0));
        assert_eq!(config.population_size, 10);
        assert_eq!(config.mutation_magnitude, 1.0);
    }

    #[test]
    fn test_deserialize_rejects_unknown_field() {
        let result: Result<EngineConfig, _> = serde_json::from_str(r#"{ "popsize": 3 }"#);
        assert!(result.is_err());
    }
}
