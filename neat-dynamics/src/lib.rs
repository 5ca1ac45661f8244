//! Population dynamics for NeuroEvolution of Augmenting Topologies:
//! the parts of a generational NEAT loop that decide how a population
//! is split into species, whether evolution should currently grow or
//! prune genome structure, and how stateful fitness evaluators are
//! shared between concurrent evaluations.
//!
//! - [`speciation`] clusters genomes into species with k-means,
//!   seeded by k-means++, in a sequential and a parallel variant.
//! - [`metrics`] supplies the distance metrics and centroid
//!   computations the clustering is based on.
//! - [`regulation`] switches between complexifying and
//!   simplifying phases based on population statistics.
//! - [`evaluation`] pools stateful evaluators and evaluates
//!   phenomes in parallel.
//!
//! Genomes are user-defined, via the [`Genome`] trait: all this crate
//! needs from a genome is a unique id and a position in a sparse
//! vector space. Producing offspring, building phenomes, and driving
//! the generational loop are left to the caller.
//!
//! # Example usage: one generation's worth of bookkeeping
//! ```
//! use neat_dynamics::evaluation::{
//!     FitnessInfo, ParallelPhenomeEvaluator, PhenomeEvaluationScheme, PhenomeEvaluator,
//! };
//! use neat_dynamics::metrics::ManhattanDistanceMetric;
//! use neat_dynamics::regulation::{
//!     ComplexityRegulationConfig, ComplexityRegulationMode, ComplexityRegulationStrategy,
//! };
//! use neat_dynamics::speciation::{
//!     GeneticKMeansSpeciationStrategy, SpeciationConfig, SpeciationStrategy,
//! };
//! use neat_dynamics::statistics::{EvolutionAlgorithmStatistics, PopulationStatistics};
//! use neat_dynamics::{Genome, GenomeId, Position};
//! use std::num::NonZeroUsize;
//!
//! #[derive(Debug)]
//! struct ConnectionWeights {
//!     id: GenomeId,
//!     weights: Position<f64>,
//! }
//!
//! impl Genome for ConnectionWeights {
//!     type Scalar = f64;
//!
//!     fn id(&self) -> GenomeId {
//!         self.id
//!     }
//!
//!     fn position(&self) -> &Position<f64> {
//!         &self.weights
//!     }
//! }
//!
//! // Rewards weights close to 1.
//! struct Target;
//!
//! impl PhenomeEvaluator<Vec<f64>> for Target {
//!     fn evaluate(&mut self, phenome: &Vec<f64>) -> FitnessInfo {
//!         let error: f64 = phenome.iter().map(|w| (w - 1.0).abs()).sum();
//!         FitnessInfo::new(1.0 / (1.0 + error))
//!     }
//! }
//!
//! impl PhenomeEvaluationScheme for Target {
//!     type Phenome = Vec<f64>;
//!     type Evaluator = Target;
//!
//!     fn evaluators_have_state(&self) -> bool {
//!         false
//!     }
//!
//!     fn create_evaluator(&self) -> Target {
//!         Target
//!     }
//! }
//!
//! fn main() {
//!     let config = SpeciationConfig {
//!         species_count: NonZeroUsize::new(3).unwrap(),
//!         max_kmeans_iterations: 10,
//!         random_seed: Some(7),
//!         ..SpeciationConfig::zero()
//!     };
//!
//!     let genomes: Vec<ConnectionWeights> = (0..30)
//!         .map(|i| ConnectionWeights {
//!             id: i,
//!             weights: Position::new(vec![((i % 3) as usize, i as f64 / 10.0)]),
//!         })
//!         .collect();
//!
//!     let evaluator =
//!         ParallelPhenomeEvaluator::new(Target, NonZeroUsize::new(2).unwrap()).unwrap();
//!     let phenomes: Vec<Vec<f64>> = genomes
//!         .iter()
//!         .map(|g| g.position().coords().iter().map(|&(_, w)| w).collect())
//!         .collect();
//!     let fitness = evaluator.evaluate_all(&phenomes).unwrap();
//!     assert_eq!(fitness.len(), genomes.len());
//!
//!     let metric = ManhattanDistanceMetric::default();
//!     let mut strategy = GeneticKMeansSpeciationStrategy::from_config(metric, &config);
//!     let species = strategy
//!         .speciate_all(genomes, config.species_count.get())
//!         .unwrap();
//!     assert_eq!(species.len(), 3);
//!     assert!(species.iter().all(|s| !s.is_empty()));
//!
//!     let mut regulation = ComplexityRegulationConfig::Absolute {
//!         complexity_ceiling: 20.0,
//!         min_simplification_generations: 5,
//!     }
//!     .build();
//!     let mut pop_stats = PopulationStatistics::default();
//!     pop_stats.record_mean_complexity(1.0);
//!     let ea_stats = EvolutionAlgorithmStatistics {
//!         generation: 1,
//!         total_evaluation_count: 30,
//!     };
//!     assert_eq!(
//!         regulation.determine_mode(&ea_stats, &pop_stats),
//!         ComplexityRegulationMode::Complexifying
//!     );
//! }
//! ```

mod genome;
mod rng;

pub mod evaluation;
pub mod metrics;
pub mod regulation;
pub mod speciation;
pub mod statistics;

pub use genome::*;
