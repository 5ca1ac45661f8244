use super::kmeans::{sequential_reallocations, KMeans};
use super::{KMeansReport, SpeciationConfig, SpeciationError, SpeciationStrategy, Species};
use crate::metrics::DistanceMetric;
use crate::rng::rng_from_seed;
use crate::Genome;

use rand::rngs::StdRng;
use rand::Rng;

/// A speciation strategy that assigns genomes to species
/// using k-means clustering of their positions, with
/// k-means++ initialization.
///
/// Each k-means pass reallocates every genome to the
/// species with the nearest centroid, then recomputes the
/// centroids of the species that changed. Runs stop after
/// a pass that moves no genome, or after the configured
/// maximum number of passes, whichever comes first.
///
/// Centroids of all non-empty species are recomputed from
/// their members before the first pass, so it never compares
/// genomes against stale seed positions.
///
/// # Examples
/// ```
/// # use neat_dynamics::{Genome, GenomeId, Position};
/// # #[derive(Debug)]
/// # struct Point(GenomeId, Position<f64>);
/// # impl Genome for Point {
/// #     type Scalar = f64;
/// #     fn id(&self) -> GenomeId { self.0 }
/// #     fn position(&self) -> &Position<f64> { &self.1 }
/// # }
/// use neat_dynamics::metrics::ManhattanDistanceMetric;
/// use neat_dynamics::speciation::{GeneticKMeansSpeciationStrategy, SpeciationStrategy};
///
/// let genomes = vec![
///     Point(0, Position::dense(&[0.0, 0.0])),
///     Point(1, Position::dense(&[0.0, 1.0])),
///     Point(2, Position::dense(&[10.0, 0.0])),
///     Point(3, Position::dense(&[10.0, 1.0])),
/// ];
///
/// let mut strategy = GeneticKMeansSpeciationStrategy::new(ManhattanDistanceMetric::default(), 20);
/// let species = strategy.speciate_all(genomes, 2).unwrap();
///
/// assert_eq!(species.len(), 2);
/// assert!(species.iter().all(|s| s.genomes().len() == 2));
/// ```
pub struct GeneticKMeansSpeciationStrategy<D, R = StdRng> {
    kmeans: KMeans<D, R>,
}

impl<D> GeneticKMeansSpeciationStrategy<D, StdRng> {
    /// Creates a new strategy seeded from system entropy.
    pub fn new(metric: D, max_kmeans_iterations: usize) -> Self {
        Self::with_rng(metric, max_kmeans_iterations, rng_from_seed(None))
    }

    /// Creates a new strategy from the speciation config.
    pub fn from_config(metric: D, config: &SpeciationConfig) -> Self {
        Self::with_rng(
            metric,
            config.max_kmeans_iterations,
            rng_from_seed(config.random_seed),
        )
    }
}

impl<D, R: Rng> GeneticKMeansSpeciationStrategy<D, R> {
    /// Creates a new strategy drawing randomness from `rng`.
    pub fn with_rng(metric: D, max_kmeans_iterations: usize, rng: R) -> Self {
        GeneticKMeansSpeciationStrategy {
            kmeans: KMeans::new(metric, max_kmeans_iterations, rng),
        }
    }

    /// Returns the distance metric in use.
    pub fn metric(&self) -> &D {
        &self.kmeans.metric
    }

    pub fn max_kmeans_iterations(&self) -> usize {
        self.kmeans.max_iterations
    }

    /// Returns a summary of the latest successful run,
    /// if any.
    pub fn last_report(&self) -> Option<&KMeansReport> {
        self.kmeans.last_report.as_ref()
    }
}

impl<G, D, R> SpeciationStrategy<G> for GeneticKMeansSpeciationStrategy<D, R>
where
    G: Genome,
    D: DistanceMetric<G::Scalar>,
    R: Rng,
{
    fn speciate_all(
        &mut self,
        genomes: Vec<G>,
        species_count: usize,
    ) -> Result<Vec<Species<G>>, SpeciationError> {
        self.kmeans
            .speciate_all(genomes, species_count, sequential_reallocations)
    }

    fn speciate_add(
        &mut self,
        genomes: Vec<G>,
        species: &mut [Species<G>],
    ) -> Result<(), SpeciationError> {
        self.kmeans
            .speciate_add(genomes, species, sequential_reallocations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::tests::PointGenome;
    use crate::metrics::{EuclideanDistanceMetric, ManhattanDistanceMetric};
    use crate::speciation::tests::{assert_partition, clustered_genomes, compositions, rng};
    use crate::{GenomeId, Position};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn manhattan(
        max_iterations: usize,
        seed: u64,
    ) -> GeneticKMeansSpeciationStrategy<ManhattanDistanceMetric> {
        GeneticKMeansSpeciationStrategy::with_rng(
            ManhattanDistanceMetric::default(),
            max_iterations,
            rng(seed),
        )
    }

    #[test]
    fn four_points_split_by_proximity() {
        init_logger();
        for seed in 0..20 {
            let genomes = vec![
                PointGenome::new(0, &[0.0, 0.0]),
                PointGenome::new(1, &[0.0, 1.0]),
                PointGenome::new(2, &[10.0, 0.0]),
                PointGenome::new(3, &[10.0, 1.0]),
            ];
            let species = manhattan(20, seed)
                .speciate_all(genomes.clone(), 2)
                .unwrap();
            assert_partition(&species, &genomes);

            let mut groups = compositions(&species);
            groups.sort();
            assert_eq!(groups, vec![vec![0, 1], vec![2, 3]], "seed {}", seed);
        }
    }

    #[test]
    fn centroids_are_refreshed_without_passes() {
        let metric = ManhattanDistanceMetric::default();
        for seed in 0..10 {
            let genomes = clustered_genomes(3, 5, 2, 10.0, &mut rng(seed));
            let species = manhattan(0, seed).speciate_all(genomes, 3).unwrap();
            for s in &species {
                let positions: Vec<&Position<f64>> =
                    s.genomes().iter().map(|g| g.position()).collect();
                assert_eq!(s.centroid(), &metric.centroid(&positions).unwrap());
            }
        }
    }

    #[test]
    fn speciate_all_covers_population() {
        init_logger();
        let mut r = rng(1);
        for &(species_count, clusters, dims) in &[(3, 2, 2), (10, 10, 4), (30, 10, 3)] {
            let genomes = clustered_genomes(clusters, 100 / clusters, dims, 5.0, &mut r);
            let mut strategy = GeneticKMeansSpeciationStrategy::with_rng(
                EuclideanDistanceMetric::default(),
                20,
                rng(species_count as u64),
            );
            let species = strategy
                .speciate_all(genomes.clone(), species_count)
                .unwrap();
            assert_eq!(species.len(), species_count);
            assert_partition(&species, &genomes);
        }
    }

    #[test]
    fn speciate_all_is_reproducible() {
        let genomes = clustered_genomes(4, 25, 3, 2.0, &mut rng(9));
        let first = manhattan(10, 77).speciate_all(genomes.clone(), 6).unwrap();
        let second = manhattan(10, 77).speciate_all(genomes, 6).unwrap();
        assert_eq!(compositions(&first), compositions(&second));
    }

    #[test]
    fn too_few_genomes_is_rejected() {
        let genomes = clustered_genomes(1, 3, 2, 1.0, &mut rng(0));
        let result = manhattan(5, 0).speciate_all(genomes, 4);
        assert!(matches!(
            result,
            Err(SpeciationError::TooFewGenomes {
                genomes: 3,
                species: 4
            })
        ));
    }

    #[test]
    fn zero_species_is_rejected() {
        let genomes = clustered_genomes(1, 3, 2, 1.0, &mut rng(0));
        let result = manhattan(5, 0).speciate_all(genomes, 0);
        assert!(matches!(result, Err(SpeciationError::ZeroSpeciesCount)));
    }

    #[test]
    fn one_genome_per_species() {
        let genomes = clustered_genomes(5, 1, 2, 3.0, &mut rng(4));
        let species = manhattan(5, 4).speciate_all(genomes.clone(), 5).unwrap();
        assert_partition(&species, &genomes);
        assert!(species.iter().all(|s| s.len() == 1));
    }

    #[test]
    fn passes_are_bounded() {
        let genomes = clustered_genomes(5, 20, 2, 0.6, &mut rng(12));
        for max_iterations in 0..4 {
            let mut strategy = manhattan(max_iterations, 12);
            let species = strategy.speciate_all(genomes.clone(), 8).unwrap();
            assert_partition(&species, &genomes);
            let report = strategy.last_report().unwrap();
            assert!(report.passes <= max_iterations);
            if !report.converged {
                assert_eq!(report.passes, max_iterations);
            }
        }
    }

    #[test]
    fn stable_clusters_converge_early() {
        let genomes = clustered_genomes(3, 10, 2, 100.0, &mut rng(5));
        let mut strategy = manhattan(50, 5);
        strategy.speciate_all(genomes, 3).unwrap();
        let report = strategy.last_report().unwrap();
        assert!(report.converged);
        assert!(report.passes < 50);
    }

    #[test]
    fn speciate_add_places_genomes_near_their_cluster() {
        let genomes = vec![
            PointGenome::new(0, &[0.0, 0.0]),
            PointGenome::new(1, &[0.0, 1.0]),
            PointGenome::new(2, &[10.0, 0.0]),
            PointGenome::new(3, &[10.0, 1.0]),
        ];
        let mut strategy = manhattan(20, 3);
        let mut species = strategy.speciate_all(genomes.clone(), 2).unwrap();

        let added = vec![PointGenome::new(4, &[9.0, 0.5]), PointGenome::new(5, &[1.0, 0.5])];
        strategy.speciate_add(added.clone(), &mut species).unwrap();

        let all: Vec<PointGenome> = genomes.into_iter().chain(added).collect();
        assert_partition(&species, &all);
        let mut groups = compositions(&species);
        groups.sort();
        assert_eq!(groups, vec![vec![0, 1, 5], vec![2, 3, 4]]);
    }

    #[test]
    fn speciate_add_keeps_invariants() {
        let mut r = rng(21);
        let genomes = clustered_genomes(10, 10, 3, 1.0, &mut r);
        let mut strategy = GeneticKMeansSpeciationStrategy::with_rng(
            EuclideanDistanceMetric::default(),
            20,
            rng(21),
        );
        let mut species = strategy.speciate_all(genomes.clone(), 10).unwrap();

        let added: Vec<PointGenome> = clustered_genomes(10, 3, 3, 1.0, &mut r)
            .into_iter()
            .map(|mut g| {
                g.id += 1000;
                g
            })
            .collect();
        strategy.speciate_add(added.clone(), &mut species).unwrap();

        let all: Vec<PointGenome> = genomes.into_iter().chain(added).collect();
        assert_partition(&species, &all);
    }

    #[test]
    fn speciate_add_without_species_is_rejected() {
        let mut species: Vec<Species<PointGenome>> = vec![];
        let genomes = vec![PointGenome::new(0, &[0.0])];
        let result = manhattan(5, 0).speciate_add(genomes, &mut species);
        assert!(matches!(result, Err(SpeciationError::NoSpecies)));
    }

    #[test]
    fn speciate_add_fills_empty_species() {
        let mut species: Vec<Species<PointGenome>> = (0..3)
            .map(|i| Species::new(i, crate::Position::dense(&[i as f64])))
            .collect();
        let genomes: Vec<PointGenome> = (0..6)
            .map(|i| PointGenome::new(i as GenomeId, &[0.1 * i as f64]))
            .collect();
        let mut strategy = manhattan(10, 0);
        strategy
            .speciate_add(genomes.clone(), &mut species)
            .unwrap();
        assert_partition(&species, &genomes);
    }
}
