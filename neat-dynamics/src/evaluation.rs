//! Fitness evaluation of phenomes, and the sharing
//! of evaluators between concurrent evaluations.
//!
//! Evaluators are produced by an evaluation scheme. If
//! the scheme's evaluators carry mutable state, each
//! may only be used by one evaluation at a time; an
//! [`EvaluatorPool`] hands them out under mutual exclusion.
mod errors;
mod parallel;
mod pool;

pub use errors::PoolError;
pub use parallel::ParallelPhenomeEvaluator;
pub use pool::{EvaluatorPool, PoolGuard};

use serde::{Deserialize, Serialize};

/// The fitness assigned to a phenome.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FitnessInfo {
    /// The fitness used for selection.
    pub primary_fitness: f64,
    /// Additional fitness values, for reporting.
    #[serde(default)]
    pub auxiliary_fitness: Vec<f64>,
}

impl FitnessInfo {
    /// Creates a fitness with no auxiliary values.
    pub fn new(primary_fitness: f64) -> FitnessInfo {
        FitnessInfo {
            primary_fitness,
            auxiliary_fitness: vec![],
        }
    }
}

/// Evaluates the fitness of phenomes of type `P`.
pub trait PhenomeEvaluator<P> {
    fn evaluate(&mut self, phenome: &P) -> FitnessInfo;
}

/// A source of phenome evaluators.
pub trait PhenomeEvaluationScheme {
    /// The type of phenomes evaluated.
    type Phenome;
    /// The type of evaluators produced.
    type Evaluator: PhenomeEvaluator<Self::Phenome>;

    /// Whether evaluators carry state that makes them
    /// unsafe to use for more than one evaluation at a time.
    fn evaluators_have_state(&self) -> bool;

    /// Creates a new evaluator.
    fn create_evaluator(&self) -> Self::Evaluator;
}
