use std::error::Error;

use crate::{config::ConfigError, engine::State, genome::Genome};

/// Boxed error returned by an objective, kept as the source of [`EngineError`].
pub type BoxedObjectiveError = Box<dyn Error + Send + Sync + 'static>;

/// Error aborting an optimization run.
///
/// Every error is terminal: a run either completes and reports its best genome or fails
/// with one of these, never both.
#[derive(Debug, derive_more::Display, derive_more::IsVariant)]
pub enum EngineError {
    /// A configuration parameter is invalid. Raised before any random draw or
    /// objective call.
    #[display("invalid configuration: {_0}")]
    InvalidConfiguration(ConfigError),
    /// The objective failed (or returned NaN) for one genome.
    #[display(
        "objective evaluation failed for genome #{index} in generation {generation}: {source}"
    )]
    ObjectiveEvaluation {
        /// Generation whose evaluation failed (0 is the initial population)
        generation: usize,
        /// Position of the failing genome in the population
        index: usize,
        /// The genome the objective failed on
        genome: Genome,
        /// Error reported by the objective
        source: BoxedObjectiveError,
    },
}

impl EngineError {
    /// Returns the controller state the run was in when it failed.
    ///
    /// `None` for configuration errors, which are raised before the controller exists.
    #[must_use]
    pub fn stage(&self) -> Option<State> {
        match self {
            Self::InvalidConfiguration(_) => None,
            Self::ObjectiveEvaluation { .. } => Some(State::Evaluating),
        }
    }

    /// Returns the generation index the run failed in, if it got that far.
    #[must_use]
    pub fn generation(&self) -> Option<usize> {
        match self {
            Self::InvalidConfiguration(_) => None,
            Self::ObjectiveEvaluation { generation, .. } => Some(*generation),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidConfiguration(err) => Some(err),
            Self::ObjectiveEvaluation { source, .. } => Some(source.as_ref()),
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfiguration(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::NanFitness;

    #[test]
    fn test_configuration_error_has_no_stage() {
        let err = EngineError::from(ConfigError::NoElites);
        assert!(err.is_invalid_configuration());
        assert_eq!(err.stage(), None);
        assert_eq!(err.generation(), None);
        assert_eq!(
            err.to_string(),
            "invalid configuration: elite count must be at least 1"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_objective_error_reports_stage_and_generation() {
        let err = EngineError::ObjectiveEvaluation {
            generation: 3,
            index: 1,
            genome: Genome::new(vec![1.0, 2.0]),
            source: Box::new(NanFitness),
        };
        assert_eq!(err.stage(), Some(State::Evaluating));
        assert_eq!(err.generation(), Some(3));
        assert_eq!(
            err.to_string(),
            "objective evaluation failed for genome #1 in generation 3: objective returned NaN"
        );
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("objective returned NaN")
        );
    }
}
