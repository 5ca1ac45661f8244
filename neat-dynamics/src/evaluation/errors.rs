use thiserror::Error;

/// Errors from evaluator pools and parallel evaluation.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("stateless evaluation schemes need no pool; share a single evaluator instead")]
    StatelessScheme,
    #[error("no evaluator available in the pool")]
    Exhausted,
    #[error("failed to build evaluation thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
