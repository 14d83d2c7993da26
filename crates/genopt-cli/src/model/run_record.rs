use chrono::{DateTime, Utc};
use genopt_engine::{EngineConfig, Genome, Solution};
use serde::{Deserialize, Serialize};

use crate::objective::BuiltinObjective;

/// Saved outcome of an `optimize` run.
///
/// Holds the full configuration, seed included, so the run can be repeated exactly.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunRecord {
    pub objective: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
    pub config: EngineConfig,
    pub finished_at: DateTime<Utc>,
    pub best_fitness: f64,
    pub best_genome: Genome,
    /// Best fitness of every generation, initial population first
    pub history: Vec<f64>,
}

impl RunRecord {
    pub fn new(objective: &BuiltinObjective, config: EngineConfig, solution: Solution) -> Self {
        Self {
            objective: objective.name().to_owned(),
            weights: objective.weights().map(<[f64]>::to_vec),
            config,
            finished_at: Utc::now(),
            best_fitness: solution.fitness,
            best_genome: solution.genome,
            history: solution.history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::ObjectiveKind;

    #[test]
    fn test_record_roundtrip_keeps_config() {
        let objective = BuiltinObjective::new(ObjectiveKind::Sphere, None, 2).unwrap();
        let config = EngineConfig {
            num_genes: 2,
            seed: 99,
            ..EngineConfig::default()
        };
        let solution = Solution {
            genome: Genome::new(vec![0.5, -0.25]),
            fitness: -0.3125,
            generations: 3,
            history: vec![-4.0, -1.0, -0.5, -0.3125],
        };
        let record = RunRecord::new(&objective, config.clone(), solution);

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("weights"));
        let parsed: RunRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.objective, "sphere");
        assert_eq!(parsed.config, config);
        assert_eq!(parsed.best_genome, Genome::new(vec![0.5, -0.25]));
        assert_eq!(parsed.history.len(), 4);
    }
}
