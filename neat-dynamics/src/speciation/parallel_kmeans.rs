use super::kmeans::{nearest_species, KMeans, Reallocation};
use super::{KMeansReport, SpeciationConfig, SpeciationError, SpeciationStrategy, Species};
use crate::metrics::DistanceMetric;
use crate::rng::rng_from_seed;
use crate::Genome;

use rand::rngs::StdRng;
use rand::Rng;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use std::num::NonZeroUsize;

/// A k-means speciation strategy which finds each pass's
/// nearest species on a dedicated thread pool.
///
/// Workers only read the species' centroids and produce
/// reallocation decisions; genomes are moved and centroids
/// recomputed on the calling thread once all workers are
/// done. Given the same random generator state, results
/// are identical to those of [`GeneticKMeansSpeciationStrategy`],
/// including the centroid refresh before the first pass.
///
/// [`GeneticKMeansSpeciationStrategy`]: super::GeneticKMeansSpeciationStrategy
pub struct ParallelGeneticKMeansSpeciationStrategy<D, R = StdRng> {
    kmeans: KMeans<D, R>,
    thread_pool: ThreadPool,
}

impl<D> ParallelGeneticKMeansSpeciationStrategy<D, StdRng> {
    /// Creates a new strategy seeded from system entropy,
    /// running on `degree_of_parallelism` threads.
    ///
    /// # Errors
    /// Returns an error if the thread pool can't be built.
    pub fn new(
        metric: D,
        max_kmeans_iterations: usize,
        degree_of_parallelism: NonZeroUsize,
    ) -> Result<Self, SpeciationError> {
        Self::with_rng(
            metric,
            max_kmeans_iterations,
            degree_of_parallelism,
            rng_from_seed(None),
        )
    }

    /// Creates a new strategy from the speciation config.
    ///
    /// # Errors
    /// Returns an error if the thread pool can't be built.
    pub fn from_config(metric: D, config: &SpeciationConfig) -> Result<Self, SpeciationError> {
        Self::with_rng(
            metric,
            config.max_kmeans_iterations,
            config.degree_of_parallelism,
            rng_from_seed(config.random_seed),
        )
    }
}

impl<D, R: Rng> ParallelGeneticKMeansSpeciationStrategy<D, R> {
    /// Creates a new strategy drawing randomness from `rng`.
    ///
    /// # Errors
    /// Returns an error if the thread pool can't be built.
    pub fn with_rng(
        metric: D,
        max_kmeans_iterations: usize,
        degree_of_parallelism: NonZeroUsize,
        rng: R,
    ) -> Result<Self, SpeciationError> {
        let thread_pool = ThreadPoolBuilder::new()
            .num_threads(degree_of_parallelism.get())
            .thread_name(|i| format!("speciation-{}", i))
            .build()?;
        Ok(ParallelGeneticKMeansSpeciationStrategy {
            kmeans: KMeans::new(metric, max_kmeans_iterations, rng),
            thread_pool,
        })
    }

    /// Returns the distance metric in use.
    pub fn metric(&self) -> &D {
        &self.kmeans.metric
    }

    pub fn max_kmeans_iterations(&self) -> usize {
        self.kmeans.max_iterations
    }

    /// Number of worker threads.
    pub fn degree_of_parallelism(&self) -> usize {
        self.thread_pool.current_num_threads()
    }

    /// Returns a summary of the latest successful run,
    /// if any.
    pub fn last_report(&self) -> Option<&KMeansReport> {
        self.kmeans.last_report.as_ref()
    }
}

/// Finds the reallocations of a pass in parallel. Must be
/// called from within the thread pool that should do the work.
fn parallel_reallocations<D, G>(metric: &D, species: &[Species<G>]) -> Vec<Reallocation>
where
    G: Genome + Sync,
    D: DistanceMetric<G::Scalar> + Sync,
{
    let members: Vec<(usize, &G)> = species
        .iter()
        .enumerate()
        .flat_map(|(i, s)| s.working.values().map(move |g| (i, g)))
        .collect();

    members
        .par_iter()
        .filter_map(|&(from, genome)| {
            let to = nearest_species(metric, genome, species);
            (to != from).then(|| Reallocation {
                genome: genome.id(),
                from,
                to,
            })
        })
        .collect()
}

impl<G, D, R> SpeciationStrategy<G> for ParallelGeneticKMeansSpeciationStrategy<D, R>
where
    G: Genome + Send + Sync,
    D: DistanceMetric<G::Scalar> + Sync,
    R: Rng,
{
    fn speciate_all(
        &mut self,
        genomes: Vec<G>,
        species_count: usize,
    ) -> Result<Vec<Species<G>>, SpeciationError> {
        let thread_pool = &self.thread_pool;
        self.kmeans
            .speciate_all(genomes, species_count, |metric, species| {
                thread_pool.install(|| parallel_reallocations(metric, species))
            })
    }

    fn speciate_add(
        &mut self,
        genomes: Vec<G>,
        species: &mut [Species<G>],
    ) -> Result<(), SpeciationError> {
        let thread_pool = &self.thread_pool;
        self.kmeans.speciate_add(genomes, species, |metric, species| {
            thread_pool.install(|| parallel_reallocations(metric, species))
        })
    }
}
