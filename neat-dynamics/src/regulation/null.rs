use super::{ComplexityRegulationMode, ComplexityRegulationStrategy};
use crate::statistics::{EvolutionAlgorithmStatistics, PopulationStatistics};

/// A complexity regulation strategy that never simplifies.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullComplexityRegulationStrategy;

impl ComplexityRegulationStrategy for NullComplexityRegulationStrategy {
    fn current_mode(&self) -> ComplexityRegulationMode {
        ComplexityRegulationMode::Complexifying
    }

    fn determine_mode(
        &mut self,
        _ea_stats: &EvolutionAlgorithmStatistics,
        _pop_stats: &PopulationStatistics,
    ) -> ComplexityRegulationMode {
        ComplexityRegulationMode::Complexifying
    }
}
