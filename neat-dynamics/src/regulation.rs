//! Complexity regulation switches the evolution
//! algorithm between growing genomes' structure
//! (_complexifying_) and pruning it (_simplifying_).
//!
//! A regulation strategy is consulted once per
//! generation. All strategies share the
//! [`ComplexityRegulationStrategy`] interface, so the
//! evolution algorithm can use any of them.
mod absolute;
mod config;
mod null;
mod relative;

pub use absolute::AbsoluteCeilingComplexityRegulationStrategy;
pub use config::ComplexityRegulationConfig;
pub use null::NullComplexityRegulationStrategy;
pub use relative::RelativeComplexityRegulationStrategy;

use crate::statistics::{EvolutionAlgorithmStatistics, PopulationStatistics};

use serde::{Deserialize, Serialize};

/// The kind of evolutionary pressure currently applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplexityRegulationMode {
    /// Genomes are allowed to grow new structure.
    Complexifying,
    /// Genomes are pushed towards removing structure.
    Simplifying,
}

/// An interface for complexity regulation strategies.
pub trait ComplexityRegulationStrategy {
    /// Returns the current mode, without updating it.
    fn current_mode(&self) -> ComplexityRegulationMode;

    /// Updates the mode from the latest statistics and returns it.
    /// Meant to be called once per generation.
    fn determine_mode(
        &mut self,
        ea_stats: &EvolutionAlgorithmStatistics,
        pop_stats: &PopulationStatistics,
    ) -> ComplexityRegulationMode;
}

impl<S: ComplexityRegulationStrategy + ?Sized> ComplexityRegulationStrategy for Box<S> {
    fn current_mode(&self) -> ComplexityRegulationMode {
        (**self).current_mode()
    }

    fn determine_mode(
        &mut self,
        ea_stats: &EvolutionAlgorithmStatistics,
        pop_stats: &PopulationStatistics,
    ) -> ComplexityRegulationMode {
        (**self).determine_mode(ea_stats, pop_stats)
    }
}
