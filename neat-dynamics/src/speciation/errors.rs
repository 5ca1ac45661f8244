use crate::metrics::CentroidError;

/// An error type indicating a failed speciation request.
#[derive(Debug, thiserror::Error)]
pub enum SpeciationError {
    /// Fewer genomes than species were requested.
    #[error("cannot split {genomes} genomes into {species} species")]
    TooFewGenomes { genomes: usize, species: usize },
    /// Zero species were requested.
    #[error("species count must be at least 1")]
    ZeroSpeciesCount,
    /// Genomes were added to an empty species array.
    #[error("cannot add genomes to an empty set of species")]
    NoSpecies,
    #[error(transparent)]
    Centroid(#[from] CentroidError),
    #[error("failed to build speciation thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
