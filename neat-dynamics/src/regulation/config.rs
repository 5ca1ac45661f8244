use super::{
    AbsoluteCeilingComplexityRegulationStrategy, ComplexityRegulationStrategy,
    NullComplexityRegulationStrategy, RelativeComplexityRegulationStrategy,
};

use serde::{Deserialize, Serialize};

/// Configuration data for complexity regulation.
///
/// # Examples
/// ```
/// use neat_dynamics::regulation::{
///     ComplexityRegulationConfig, ComplexityRegulationMode, ComplexityRegulationStrategy,
/// };
///
/// let cfg = ComplexityRegulationConfig::Absolute {
///     complexity_ceiling: 30.0,
///     min_simplification_generations: 10,
/// };
/// let strategy = cfg.build();
/// assert_eq!(strategy.current_mode(), ComplexityRegulationMode::Complexifying);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ComplexityRegulationConfig {
    /// Never simplify.
    Null,
    /// Simplify whenever mean complexity
    /// exceeds a fixed ceiling.
    Absolute {
        complexity_ceiling: f64,
        min_simplification_generations: u64,
    },
    /// Simplify whenever complexity grows by more than
    /// `relative_complexity_ceiling` since the last
    /// simplification phase.
    Relative {
        relative_complexity_ceiling: f64,
        min_simplification_generations: u64,
    },
}

impl ComplexityRegulationConfig {
    /// Builds the configured strategy.
    pub fn build(&self) -> Box<dyn ComplexityRegulationStrategy + Send> {
        match *self {
            ComplexityRegulationConfig::Null => Box::new(NullComplexityRegulationStrategy),
            ComplexityRegulationConfig::Absolute {
                complexity_ceiling,
                min_simplification_generations,
            } => Box::new(AbsoluteCeilingComplexityRegulationStrategy::new(
                complexity_ceiling,
                min_simplification_generations,
            )),
            ComplexityRegulationConfig::Relative {
                relative_complexity_ceiling,
                min_simplification_generations,
            } => Box::new(RelativeComplexityRegulationStrategy::new(
                relative_complexity_ceiling,
                min_simplification_generations,
            )),
        }
    }
}

impl Default for ComplexityRegulationConfig {
    fn default() -> Self {
        ComplexityRegulationConfig::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regulation::ComplexityRegulationMode;
    use crate::statistics::{EvolutionAlgorithmStatistics, PopulationStatistics};

    #[test]
    fn deserializes_tagged() {
        let json = r#"{
            "strategy": "relative",
            "relative_complexity_ceiling": 12.5,
            "min_simplification_generations": 3
        }"#;
        let cfg: ComplexityRegulationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            cfg,
            ComplexityRegulationConfig::Relative {
                relative_complexity_ceiling: 12.5,
                min_simplification_generations: 3,
            }
        );

        let cfg: ComplexityRegulationConfig =
            serde_json::from_str(r#"{ "strategy": "null" }"#).unwrap();
        assert_eq!(cfg, ComplexityRegulationConfig::Null);
    }

    #[test]
    fn built_strategies_regulate() {
        use ComplexityRegulationMode::*;

        let mut pop_stats = PopulationStatistics::default();
        pop_stats.record_mean_complexity(50.0);
        let ea_stats = EvolutionAlgorithmStatistics::default();

        let expectations = [
            (ComplexityRegulationConfig::Null, Complexifying),
            (
                ComplexityRegulationConfig::Absolute {
                    complexity_ceiling: 10.0,
                    min_simplification_generations: 5,
                },
                Simplifying,
            ),
            (
                ComplexityRegulationConfig::Relative {
                    relative_complexity_ceiling: 10.0,
                    min_simplification_generations: 5,
                },
                Simplifying,
            ),
        ];
        for (cfg, expected) in expectations.iter() {
            let mut strategy = cfg.build();
            let mode = strategy.determine_mode(&ea_stats, &pop_stats);
            assert_eq!(mode, *expected, "{:?}", cfg);
        }
    }
}
