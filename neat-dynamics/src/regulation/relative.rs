use super::{ComplexityRegulationMode, ComplexityRegulationStrategy};
use crate::statistics::{EvolutionAlgorithmStatistics, PopulationStatistics};

use log::info;

/// A complexity regulation strategy whose ceiling is
/// relative to the complexity at the end of the last
/// simplification phase.
///
/// The first ceiling equals the relative ceiling. Each time
/// simplification ends, the ceiling is reset to the current
/// mean complexity plus the relative ceiling. Simplification
/// lasts for at least `min_simplification_generations`
/// generations, and ends once the moving average of the mean
/// complexity stops falling. Unlike the absolute strategy,
/// simplification starts when the moving average, rather
/// than the current mean complexity, exceeds the ceiling.
#[derive(Debug, Clone)]
pub struct RelativeComplexityRegulationStrategy {
    relative_complexity_ceiling: f64,
    min_simplification_generations: u64,
    complexity_ceiling: f64,
    mode: ComplexityRegulationMode,
    last_transition_generation: u64,
    prev_moving_average: f64,
}

impl RelativeComplexityRegulationStrategy {
    /// Creates a new strategy, initially complexifying.
    pub fn new(
        relative_complexity_ceiling: f64,
        min_simplification_generations: u64,
    ) -> RelativeComplexityRegulationStrategy {
        RelativeComplexityRegulationStrategy {
            relative_complexity_ceiling,
            min_simplification_generations,
            complexity_ceiling: relative_complexity_ceiling,
            mode: ComplexityRegulationMode::Complexifying,
            last_transition_generation: 0,
            prev_moving_average: 0.0,
        }
    }

    /// The ceiling currently in effect.
    pub fn complexity_ceiling(&self) -> f64 {
        self.complexity_ceiling
    }

    pub fn relative_complexity_ceiling(&self) -> f64 {
        self.relative_complexity_ceiling
    }

    pub fn min_simplification_generations(&self) -> u64 {
        self.min_simplification_generations
    }

    fn transition(&mut self, mode: ComplexityRegulationMode, generation: u64) {
        info!(
            "generation {}: complexity regulation switching to {:?} (ceiling {})",
            generation, mode, self.complexity_ceiling
        );
        self.mode = mode;
        self.last_transition_generation = generation;
    }
}

impl ComplexityRegulationStrategy for RelativeComplexityRegulationStrategy {
    fn current_mode(&self) -> ComplexityRegulationMode {
        self.mode
    }

    fn determine_mode(
        &mut self,
        ea_stats: &EvolutionAlgorithmStatistics,
        pop_stats: &PopulationStatistics,
    ) -> ComplexityRegulationMode {
        let generation = ea_stats.generation;
        let moving_average = pop_stats.moving_average_complexity();
        match self.mode {
            ComplexityRegulationMode::Complexifying => {
                if moving_average > self.complexity_ceiling {
                    self.prev_moving_average = moving_average;
                    self.transition(ComplexityRegulationMode::Simplifying, generation);
                }
            }
            ComplexityRegulationMode::Simplifying => {
                let elapsed = generation.saturating_sub(self.last_transition_generation);
                let stalled = moving_average - self.prev_moving_average >= 0.0;
                self.prev_moving_average = moving_average;
                if elapsed > self.min_simplification_generations && stalled {
                    self.complexity_ceiling =
                        pop_stats.mean_complexity + self.relative_complexity_ceiling;
                    self.transition(ComplexityRegulationMode::Complexifying, generation);
                }
            }
        }
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ComplexityRegulationMode::*;

    fn step(
        strategy: &mut RelativeComplexityRegulationStrategy,
        generation: u64,
        pop_stats: &PopulationStatistics,
    ) -> ComplexityRegulationMode {
        let ea_stats = EvolutionAlgorithmStatistics {
            generation,
            ..EvolutionAlgorithmStatistics::default()
        };
        strategy.determine_mode(&ea_stats, pop_stats)
    }

    #[test]
    fn initial_ceiling_is_relative_ceiling() {
        let mut strategy = RelativeComplexityRegulationStrategy::new(5.0, 3);
        let mut pop_stats = PopulationStatistics::default();
        pop_stats.record_mean_complexity(5.0);
        assert_eq!(step(&mut strategy, 0, &pop_stats), Complexifying);
        pop_stats.record_mean_complexity(5.5);
        assert_eq!(step(&mut strategy, 1, &pop_stats), Simplifying);
        assert_eq!(strategy.complexity_ceiling(), 5.0);
    }

    #[test]
    fn simplifies_while_complexity_falls() {
        let mut strategy = RelativeComplexityRegulationStrategy::new(5.0, 2);
        let mut pop_stats = PopulationStatistics::default();
        pop_stats.record_mean_complexity(20.0);
        assert_eq!(step(&mut strategy, 0, &pop_stats), Simplifying);

        // Still falling, well past the minimum.
        let mut complexity = 20.0;
        for generation in 1..10 {
            complexity -= 1.0;
            pop_stats.record_mean_complexity(complexity);
            assert_eq!(step(&mut strategy, generation, &pop_stats), Simplifying);
        }

        // Complexity rises back, the moving average stalls.
        pop_stats.record_mean_complexity(30.0);
        assert_eq!(step(&mut strategy, 10, &pop_stats), Complexifying);
        assert_eq!(strategy.complexity_ceiling(), 35.0);
    }

    #[test]
    fn minimum_simplification_is_enforced() {
        let mut strategy = RelativeComplexityRegulationStrategy::new(1.0, 4);
        let mut pop_stats = PopulationStatistics::default();
        pop_stats.record_mean_complexity(3.0);
        assert_eq!(step(&mut strategy, 0, &pop_stats), Simplifying);

        // Flat complexity stalls immediately, but only counts
        // once the minimum number of generations has elapsed.
        for generation in 1..=4 {
            pop_stats.record_mean_complexity(3.0);
            assert_eq!(step(&mut strategy, generation, &pop_stats), Simplifying);
        }
        pop_stats.record_mean_complexity(3.0);
        assert_eq!(step(&mut strategy, 5, &pop_stats), Complexifying);
        assert_eq!(strategy.complexity_ceiling(), 4.0);

        // The new ceiling applies from then on.
        pop_stats.record_mean_complexity(3.5);
        assert_eq!(step(&mut strategy, 6, &pop_stats), Complexifying);
        pop_stats.record_mean_complexity(20.0);
        assert_eq!(step(&mut strategy, 7, &pop_stats), Simplifying);
    }
}
