use super::{EvaluatorPool, FitnessInfo, PhenomeEvaluationScheme, PhenomeEvaluator, PoolError};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use std::num::NonZeroUsize;

/// Evaluates lists of phenomes on a dedicated thread pool.
///
/// Stateful evaluators are drawn from an [`EvaluatorPool`]
/// holding one evaluator per thread. Stateless schemes get no
/// pool; their evaluators are created per unit of work instead.
///
/// # Examples
/// ```
/// use neat_dynamics::evaluation::{
///     FitnessInfo, ParallelPhenomeEvaluator, PhenomeEvaluationScheme, PhenomeEvaluator,
/// };
/// use std::num::NonZeroUsize;
///
/// struct Square;
/// impl PhenomeEvaluator<f64> for Square {
///     fn evaluate(&mut self, phenome: &f64) -> FitnessInfo {
///         FitnessInfo::new(phenome * phenome)
///     }
/// }
///
/// struct Scheme;
/// impl PhenomeEvaluationScheme for Scheme {
///     type Phenome = f64;
///     type Evaluator = Square;
///     fn evaluators_have_state(&self) -> bool { false }
///     fn create_evaluator(&self) -> Square { Square }
/// }
///
/// let evaluator = ParallelPhenomeEvaluator::new(Scheme, NonZeroUsize::new(2).unwrap()).unwrap();
/// let fitness = evaluator.evaluate_all(&[1.0, 2.0, 3.0]).unwrap();
/// let primary: Vec<f64> = fitness.iter().map(|f| f.primary_fitness).collect();
/// assert_eq!(primary, vec![1.0, 4.0, 9.0]);
/// ```
pub struct ParallelPhenomeEvaluator<S: PhenomeEvaluationScheme> {
    scheme: S,
    pool: Option<EvaluatorPool<S::Evaluator>>,
    thread_pool: ThreadPool,
}

impl<S: PhenomeEvaluationScheme> ParallelPhenomeEvaluator<S> {
    /// Creates an evaluator running on
    /// `degree_of_parallelism` threads.
    ///
    /// # Errors
    /// Returns an error if the thread pool can't be built.
    pub fn new(scheme: S, degree_of_parallelism: NonZeroUsize) -> Result<Self, PoolError> {
        let threads = degree_of_parallelism.get();
        let pool = if scheme.evaluators_have_state() {
            Some(EvaluatorPool::new(&scheme, threads)?)
        } else {
            None
        };
        let thread_pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("evaluation-{}", i))
            .build()?;
        Ok(ParallelPhenomeEvaluator {
            scheme,
            pool,
            thread_pool,
        })
    }

    pub fn scheme(&self) -> &S {
        &self.scheme
    }

    /// The pool of stateful evaluators,
    /// or `None` for stateless schemes.
    pub fn pool(&self) -> Option<&EvaluatorPool<S::Evaluator>> {
        self.pool.as_ref()
    }

    /// Number of worker threads.
    pub fn degree_of_parallelism(&self) -> usize {
        self.thread_pool.current_num_threads()
    }
}

impl<S> ParallelPhenomeEvaluator<S>
where
    S: PhenomeEvaluationScheme + Sync,
    S::Phenome: Sync,
    S::Evaluator: Send,
{
    /// Evaluates every phenome, returning their
    /// fitness in the same order.
    ///
    /// # Errors
    /// Returns [`PoolError::Exhausted`] if an evaluation
    /// finds no free evaluator, which can only happen if
    /// evaluators re-enter the thread pool.
    pub fn evaluate_all(&self, phenomes: &[S::Phenome]) -> Result<Vec<FitnessInfo>, PoolError> {
        let scheme = &self.scheme;
        let pool = self.pool.as_ref();
        self.thread_pool.install(|| match pool {
            Some(pool) => phenomes
                .par_iter()
                .map(|phenome| {
                    pool.checkout()
                        .map(|mut evaluator| evaluator.evaluate(phenome))
                })
                .collect(),
            None => Ok(phenomes
                .par_iter()
                .map_init(
                    || scheme.create_evaluator(),
                    |evaluator, phenome| evaluator.evaluate(phenome),
                )
                .collect()),
        })
    }
}
