use super::{PhenomeEvaluationScheme, PoolError};

use log::debug;

use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A fixed set of stateful evaluators, each lent
/// out to at most one caller at a time.
///
/// Acquiring never blocks: if every evaluator is in use,
/// [`acquire`] fails with [`PoolError::Exhausted`]. Pools
/// should be sized to the number of concurrent evaluations.
///
/// # Examples
/// ```
/// use neat_dynamics::evaluation::{
///     EvaluatorPool, FitnessInfo, PhenomeEvaluationScheme, PhenomeEvaluator, PoolError,
/// };
///
/// struct Scorer(u32);
/// impl PhenomeEvaluator<f64> for Scorer {
///     fn evaluate(&mut self, phenome: &f64) -> FitnessInfo {
///         self.0 += 1;
///         FitnessInfo::new(*phenome)
///     }
/// }
///
/// struct Scheme;
/// impl PhenomeEvaluationScheme for Scheme {
///     type Phenome = f64;
///     type Evaluator = Scorer;
///     fn evaluators_have_state(&self) -> bool { true }
///     fn create_evaluator(&self) -> Scorer { Scorer(0) }
/// }
///
/// let pool = EvaluatorPool::new(&Scheme, 1).unwrap();
/// {
///     let mut evaluator = pool.checkout().unwrap();
///     assert_eq!(evaluator.evaluate(&3.0).primary_fitness, 3.0);
///     assert!(matches!(pool.acquire(), Err(PoolError::Exhausted)));
/// }
/// assert_eq!(pool.available(), 1);
/// ```
///
/// [`acquire`]: EvaluatorPool::acquire
#[derive(Debug)]
pub struct EvaluatorPool<E> {
    state: Mutex<PoolState<E>>,
    capacity: usize,
}

#[derive(Debug)]
struct PoolState<E> {
    stack: Vec<E>,
    in_flight: usize,
}

impl<E> EvaluatorPool<E> {
    /// Creates a pool holding `initial_pool_size`
    /// evaluators created by `scheme`.
    ///
    /// # Errors
    /// Returns [`PoolError::StatelessScheme`] if the
    /// scheme's evaluators have no state.
    pub fn new<S>(scheme: &S, initial_pool_size: usize) -> Result<Self, PoolError>
    where
        S: PhenomeEvaluationScheme<Evaluator = E> + ?Sized,
    {
        if !scheme.evaluators_have_state() {
            return Err(PoolError::StatelessScheme);
        }
        let stack = (0..initial_pool_size)
            .map(|_| scheme.create_evaluator())
            .collect();
        Ok(EvaluatorPool {
            state: Mutex::new(PoolState {
                stack,
                in_flight: 0,
            }),
            capacity: initial_pool_size,
        })
    }

    // Pushes and pops can't leave the stack half-updated,
    // so a poisoned lock is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, PoolState<E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes an evaluator out of the pool.
    ///
    /// # Errors
    /// Returns [`PoolError::Exhausted`] if all
    /// evaluators are currently in use.
    pub fn acquire(&self) -> Result<E, PoolError> {
        let mut state = self.lock();
        match state.stack.pop() {
            Some(evaluator) => {
                state.in_flight += 1;
                Ok(evaluator)
            }
            None => {
                debug!(
                    "evaluator pool exhausted ({} of {} in use)",
                    state.in_flight, self.capacity
                );
                Err(PoolError::Exhausted)
            }
        }
    }

    /// Returns an evaluator to the pool. The evaluator
    /// is not checked to have come from this pool.
    pub fn release(&self, evaluator: E) {
        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        state.stack.push(evaluator);
    }

    /// Takes an evaluator out of the pool, returning
    /// it automatically once the guard is dropped.
    ///
    /// # Errors
    /// Returns [`PoolError::Exhausted`] if all
    /// evaluators are currently in use.
    pub fn checkout(&self) -> Result<PoolGuard<'_, E>, PoolError> {
        Ok(PoolGuard {
            pool: self,
            evaluator: Some(self.acquire()?),
        })
    }

    /// Number of evaluators currently in the pool.
    pub fn available(&self) -> usize {
        self.lock().stack.len()
    }

    /// Number of evaluators acquired and not yet released.
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight
    }

    /// Number of evaluators the pool was created with.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// An evaluator borrowed from an [`EvaluatorPool`],
/// released back to it on drop.
#[derive(Debug)]
pub struct PoolGuard<'a, E> {
    pool: &'a EvaluatorPool<E>,
    evaluator: Option<E>,
}

impl<E> Deref for PoolGuard<'_, E> {
    type Target = E;

    fn deref(&self) -> &E {
        self.evaluator
            .as_ref()
            .expect("evaluator is only taken on drop")
    }
}

impl<E> DerefMut for PoolGuard<'_, E> {
    fn deref_mut(&mut self) -> &mut E {
        self.evaluator
            .as_mut()
            .expect("evaluator is only taken on drop")
    }
}

impl<E> Drop for PoolGuard<'_, E> {
    fn drop(&mut self) {
        if let Some(evaluator) = self.evaluator.take() {
            self.pool.release(evaluator);
        }
    }
}
