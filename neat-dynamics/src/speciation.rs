//! Speciation splits a population of genomes into
//! a fixed number of species, by k-means clustering
//! of the genomes' positions.
//!
//! Two strategies are provided, sharing the same
//! contract and producing the same results:
//! [`GeneticKMeansSpeciationStrategy`] runs on the
//! calling thread, while [`ParallelGeneticKMeansSpeciationStrategy`]
//! distributes the distance computations of each
//! k-means pass over a thread pool.
mod config;
mod errors;
mod genetic_kmeans;
mod kmeans;
mod parallel_kmeans;
mod species;

pub use config::SpeciationConfig;
pub use errors::SpeciationError;
pub use genetic_kmeans::GeneticKMeansSpeciationStrategy;
pub use kmeans::KMeansReport;
pub use parallel_kmeans::ParallelGeneticKMeansSpeciationStrategy;
pub use species::Species;

use crate::Genome;

/// An interface for assigning genomes to species.
pub trait SpeciationStrategy<G: Genome> {
    /// Splits `genomes` into `species_count` new species.
    ///
    /// Every genome ends up in exactly one species,
    /// and no species is left empty.
    ///
    /// # Errors
    /// Returns an error if `species_count` is zero
    /// or greater than the number of genomes.
    fn speciate_all(
        &mut self,
        genomes: Vec<G>,
        species_count: usize,
    ) -> Result<Vec<Species<G>>, SpeciationError>;

    /// Merges new genomes into existing species, then
    /// re-balances all species.
    ///
    /// # Errors
    /// Returns an error if `species` is empty, or if there
    /// would be fewer genomes in total than species.
    fn speciate_add(
        &mut self,
        genomes: Vec<G>,
        species: &mut [Species<G>],
    ) -> Result<(), SpeciationError>;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::genome::tests::PointGenome;
    use crate::GenomeId;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use std::collections::HashSet;

    /// `cluster_count` clusters of `per_cluster` genomes each, the
    /// clusters' centers spread `spacing` apart on every axis.
    pub(crate) fn clustered_genomes(
        cluster_count: usize,
        per_cluster: usize,
        dimensions: usize,
        spacing: f64,
        rng: &mut impl Rng,
    ) -> Vec<PointGenome> {
        let mut genomes = vec![];
        for c in 0..cluster_count {
            for _ in 0..per_cluster {
                let values: Vec<f64> = (0..dimensions)
                    .map(|_| c as f64 * spacing + rng.gen_range(-0.5..0.5))
                    .collect();
                genomes.push(PointGenome::new(genomes.len() as GenomeId, &values));
            }
        }
        genomes
    }

    /// Checks coverage and the no-empty invariant.
    pub(crate) fn assert_partition(species: &[Species<PointGenome>], expected: &[PointGenome]) {
        assert!(species.iter().all(|s| !s.is_empty()));
        let mut seen = HashSet::new();
        for genome in species.iter().flat_map(|s| s.genomes()) {
            assert!(seen.insert(genome.id), "genome {} found twice", genome.id);
        }
        let expected: HashSet<GenomeId> = expected.iter().map(|g| g.id).collect();
        assert_eq!(seen, expected);
        for (i, s) in species.iter().enumerate() {
            assert_eq!(s.id(), i);
        }
    }

    pub(crate) fn compositions(species: &[Species<PointGenome>]) -> Vec<Vec<GenomeId>> {
        species
            .iter()
            .map(|s| s.genomes().iter().map(|g| g.id).collect())
            .collect()
    }

    pub(crate) fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }
}
