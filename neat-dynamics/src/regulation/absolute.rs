use super::{ComplexityRegulationMode, ComplexityRegulationStrategy};
use crate::statistics::{EvolutionAlgorithmStatistics, PopulationStatistics};

use log::info;

/// A complexity regulation strategy with a fixed
/// ceiling on mean population complexity.
///
/// Simplification starts as soon as the mean complexity
/// exceeds the ceiling. It then continues for at least
/// `min_simplification_generations` generations, regardless
/// of complexity, and only ends once the moving average of
/// the mean complexity is back at or below the ceiling. The
/// enforced minimum keeps the mode from flipping back and
/// forth while complexity hovers around the ceiling.
///
/// # Examples
/// ```
/// use neat_dynamics::regulation::{
///     AbsoluteCeilingComplexityRegulationStrategy, ComplexityRegulationMode,
///     ComplexityRegulationStrategy,
/// };
/// use neat_dynamics::statistics::{EvolutionAlgorithmStatistics, PopulationStatistics};
///
/// let mut strategy = AbsoluteCeilingComplexityRegulationStrategy::new(10.0, 10);
/// let ea_stats = EvolutionAlgorithmStatistics::default();
/// let mut pop_stats = PopulationStatistics::default();
///
/// pop_stats.record_mean_complexity(12.0);
/// assert_eq!(
///     strategy.determine_mode(&ea_stats, &pop_stats),
///     ComplexityRegulationMode::Simplifying
/// );
/// ```
#[derive(Debug, Clone)]
pub struct AbsoluteCeilingComplexityRegulationStrategy {
    complexity_ceiling: f64,
    min_simplification_generations: u64,
    mode: ComplexityRegulationMode,
    last_transition_generation: u64,
}

impl AbsoluteCeilingComplexityRegulationStrategy {
    /// Creates a new strategy, initially complexifying.
    pub fn new(
        complexity_ceiling: f64,
        min_simplification_generations: u64,
    ) -> AbsoluteCeilingComplexityRegulationStrategy {
        AbsoluteCeilingComplexityRegulationStrategy {
            complexity_ceiling,
            min_simplification_generations,
            mode: ComplexityRegulationMode::Complexifying,
            last_transition_generation: 0,
        }
    }

    pub fn complexity_ceiling(&self) -> f64 {
        self.complexity_ceiling
    }

    pub fn min_simplification_generations(&self) -> u64 {
        self.min_simplification_generations
    }

    fn transition(&mut self, mode: ComplexityRegulationMode, generation: u64) {
        info!(
            "generation {}: complexity regulation switching to {:?}",
            generation, mode
        );
        self.mode = mode;
        self.last_transition_generation = generation;
    }
}

impl ComplexityRegulationStrategy for AbsoluteCeilingComplexityRegulationStrategy {
    fn current_mode(&self) -> ComplexityRegulationMode {
        self.mode
    }

    fn determine_mode(
        &mut self,
        ea_stats: &EvolutionAlgorithmStatistics,
        pop_stats: &PopulationStatistics,
    ) -> ComplexityRegulationMode {
        let generation = ea_stats.generation;
        match self.mode {
            ComplexityRegulationMode::Complexifying => {
                if pop_stats.mean_complexity > self.complexity_ceiling {
                    self.transition(ComplexityRegulationMode::Simplifying, generation);
                }
            }
            ComplexityRegulationMode::Simplifying => {
                let elapsed = generation.saturating_sub(self.last_transition_generation);
                if elapsed > self.min_simplification_generations
                    && pop_stats.moving_average_complexity() <= self.complexity_ceiling
                {
                    self.transition(ComplexityRegulationMode::Complexifying, generation);
                }
            }
        }
        self.mode
    }
}
