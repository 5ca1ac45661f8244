use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for speciation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciationConfig {
    /// Number of species the population is split into.
    pub species_count: NonZeroUsize,
    /// Maximum number of k-means passes per speciation run.
    /// Runs stop earlier once a pass moves no genomes.
    pub max_kmeans_iterations: usize,
    /// Number of threads used by the parallel strategy.
    pub degree_of_parallelism: NonZeroUsize,
    /// Seed for k-means++ initialization. If `None`,
    /// the seed is drawn from system entropy.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl SpeciationConfig {
    /// Returns a "zero-valued" configuration.
    /// All values are 0 or `None`, or in the case of
    /// `NonZeroUsize`s, 1.
    ///
    /// # Note
    /// A single species and no k-means passes won't speciate
    /// anything. Use it as the base of a struct update, setting
    /// at least `species_count` and `max_kmeans_iterations`.
    ///
    /// # Examples
    /// ```
    /// use neat_dynamics::speciation::SpeciationConfig;
    /// use std::num::NonZeroUsize;
    ///
    /// let cfg = SpeciationConfig {
    ///     species_count: NonZeroUsize::new(10).unwrap(),
    ///     max_kmeans_iterations: 5,
    ///     ..SpeciationConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> SpeciationConfig {
        SpeciationConfig {
            species_count: NonZeroUsize::MIN,
            max_kmeans_iterations: 0,
            degree_of_parallelism: NonZeroUsize::MIN,
            random_seed: None,
        }
    }
}

impl Default for SpeciationConfig {
    /// Ten species, five k-means passes, and one
    /// thread per available core.
    fn default() -> Self {
        SpeciationConfig {
            species_count: NonZeroUsize::new(10).unwrap_or(NonZeroUsize::MIN),
            max_kmeans_iterations: 5,
            degree_of_parallelism: std::thread::available_parallelism()
                .unwrap_or(NonZeroUsize::MIN),
            random_seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_without_seed() {
        let cfg: SpeciationConfig = serde_json::from_str(
            r#"{ "species_count": 4, "max_kmeans_iterations": 20, "degree_of_parallelism": 2 }"#,
        )
        .unwrap();
        assert_eq!(cfg.species_count.get(), 4);
        assert_eq!(cfg.max_kmeans_iterations, 20);
        assert_eq!(cfg.degree_of_parallelism.get(), 2);
        assert_eq!(cfg.random_seed, None);
    }

    #[test]
    fn zero_serves_as_struct_update_base() {
        let zero = SpeciationConfig::zero();
        assert_eq!(zero.species_count.get(), 1);
        assert_eq!(zero.max_kmeans_iterations, 0);
        assert_eq!(zero.degree_of_parallelism.get(), 1);
        assert_eq!(zero.random_seed, None);

        let cfg = SpeciationConfig {
            species_count: NonZeroUsize::new(6).unwrap(),
            max_kmeans_iterations: 8,
            ..SpeciationConfig::zero()
        };
        assert_eq!(cfg.species_count.get(), 6);
        assert_eq!(cfg.max_kmeans_iterations, 8);
        assert_eq!(cfg.degree_of_parallelism.get(), 1);
    }

    #[test]
    fn zero_species_count_is_rejected() {
        let cfg = serde_json::from_str::<SpeciationConfig>(
            r#"{ "species_count": 0, "max_kmeans_iterations": 1, "degree_of_parallelism": 1 }"#,
        );
        assert!(cfg.is_err());
    }
}
