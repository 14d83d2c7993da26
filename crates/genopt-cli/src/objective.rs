//! Built-in objectives selectable from the command line.
//!
//! The engine maximizes, so the minimization benchmarks (sphere, Rastrigin) are negated:
//! their optimum is a fitness of 0 at the origin.

use std::{convert::Infallible, f64::consts::TAU};

use genopt_engine::{Genome, Objective};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum ObjectiveKind {
    /// Dot product with a weight vector
    #[default]
    Linear,
    /// Negated sum of squares
    Sphere,
    /// Negated Rastrigin function
    Rastrigin,
}

/// Weights of the classic linear objective `y = x0 - 3 x1 + 4.5 x2 + 2 x3`.
pub const DEFAULT_WEIGHTS: [f64; 4] = [1.0, -3.0, 4.5, 2.0];

#[derive(Debug, Clone, PartialEq)]
pub enum BuiltinObjective {
    Linear { weights: Vec<f64> },
    Sphere,
    Rastrigin,
}

impl BuiltinObjective {
    /// Builds the objective for genomes of `num_genes` genes.
    ///
    /// `weights` only applies to [`ObjectiveKind::Linear`] and defaults to
    /// [`DEFAULT_WEIGHTS`]; its length must match `num_genes`.
    pub fn new(
        kind: ObjectiveKind,
        weights: Option<Vec<f64>>,
        num_genes: usize,
    ) -> anyhow::Result<Self> {
        match kind {
            ObjectiveKind::Linear => {
                let weights = weights.unwrap_or_else(|| DEFAULT_WEIGHTS.to_vec());
                anyhow::ensure!(
                    weights.len() == num_genes,
                    "linear objective has {} weights but genomes have {num_genes} genes",
                    weights.len(),
                );
                Ok(Self::Linear { weights })
            }
            ObjectiveKind::Sphere | ObjectiveKind::Rastrigin => {
                if weights.is_some() {
                    log::warn!("--weights is ignored by the {kind:?} objective");
                }
                Ok(match kind {
                    ObjectiveKind::Sphere => Self::Sphere,
                    _ => Self::Rastrigin,
                })
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear { .. } => "linear",
            Self::Sphere => "sphere",
            Self::Rastrigin => "rastrigin",
        }
    }

    pub fn weights(&self) -> Option<&[f64]> {
        match self {
            Self::Linear { weights } => Some(weights),
            Self::Sphere | Self::Rastrigin => None,
        }
    }
}

impl Objective for BuiltinObjective {
    type Error = Infallible;

    #[expect(clippy::cast_precision_loss)]
    fn evaluate(&self, genome: &Genome) -> Result<f64, Infallible> {
        let value = match self {
            Self::Linear { weights } => genome.iter().zip(weights).map(|(x, w)| x * w).sum(),
            Self::Sphere => -genome.iter().map(|x| x * x).sum::<f64>(),
            Self::Rastrigin => {
                let n = genome.len() as f64;
                -(10.0 * n
                    + genome
                        .iter()
                        .map(|x| x * x - 10.0 * (TAU * x).cos())
                        .sum::<f64>())
            }
        };
        Ok(value)
    }
}
