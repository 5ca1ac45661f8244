use crate::metrics::{CentroidError, DistanceMetric};
use crate::{Genome, GenomeId, Position};

use ahash::RandomState;

use std::cmp::Ordering;
use std::collections::HashMap;

/// Species are clusters of genomes sharing a centroid.
///
/// Membership is exposed as a list ordered by genome ID.
/// While a k-means run is in progress the members are
/// kept in a map keyed by genome ID instead, so that moving
/// a genome between species is O(1).
#[derive(Debug, Clone)]
pub struct Species<G: Genome> {
    id: usize,
    centroid: Position<G::Scalar>,
    pub(super) genomes: Vec<G>,
    pub(super) working: HashMap<GenomeId, G, RandomState>,
}

impl<G: Genome> Species<G> {
    /// Creates a new, empty species with the specified
    /// index and centroid.
    ///
    /// # Examples
    /// ```
    /// # use neat_dynamics::{Genome, GenomeId, Position};
    /// # struct Point(GenomeId, Position<f64>);
    /// # impl Genome for Point {
    /// #     type Scalar = f64;
    /// #     fn id(&self) -> GenomeId { self.0 }
    /// #     fn position(&self) -> &Position<f64> { &self.1 }
    /// # }
    /// use neat_dynamics::speciation::Species;
    ///
    /// let species = Species::<Point>::new(3, Position::dense(&[0.5, 0.5]));
    /// assert_eq!(species.id(), 3);
    /// assert!(species.is_empty());
    /// ```
    pub fn new(id: usize, centroid: Position<G::Scalar>) -> Species<G> {
        Self::with_capacity(id, centroid, 0)
    }

    pub(super) fn with_capacity(
        id: usize,
        centroid: Position<G::Scalar>,
        capacity: usize,
    ) -> Species<G> {
        Species {
            id,
            centroid,
            genomes: Vec::with_capacity(capacity),
            working: HashMap::default(),
        }
    }

    /// Returns the species' index.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the species' centroid.
    pub fn centroid(&self) -> &Position<G::Scalar> {
        &self.centroid
    }

    /// Returns the species' members, ordered by ID.
    pub fn genomes(&self) -> &[G] {
        &self.genomes
    }

    /// Adds a genome to the species.
    ///
    /// The centroid is left as is; it is brought up
    /// to date by the next k-means run.
    pub fn add_genome(&mut self, genome: G) {
        self.genomes.push(genome);
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.genomes.len() + self.working.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the species, returning its members.
    pub fn into_genomes(self) -> Vec<G> {
        self.genomes
    }

    /// Moves all members into the ID-keyed working map.
    pub(super) fn load_working(&mut self) {
        self.working.reserve(self.genomes.len());
        for genome in self.genomes.drain(..) {
            self.working.insert(genome.id(), genome);
        }
    }

    /// Moves all members back into the ordered list.
    pub(super) fn flush_working(&mut self) {
        self.genomes.extend(self.working.drain().map(|(_, g)| g));
        self.genomes.sort_unstable_by_key(|g| g.id());
    }

    /// Recomputes the centroid from the working members.
    /// Empty species keep their previous centroid.
    pub(super) fn recalc_centroid<D>(&mut self, metric: &D) -> Result<(), CentroidError>
    where
        D: DistanceMetric<G::Scalar> + ?Sized,
    {
        if self.working.is_empty() {
            return Ok(());
        }
        let positions: Vec<&Position<G::Scalar>> =
            self.working.values().map(|g| g.position()).collect();
        self.centroid = metric.centroid(&positions)?;
        Ok(())
    }

    /// Removes and returns the working member furthest from
    /// the centroid, i.e. the least representative one.
    /// Equally distant members are resolved by lowest ID.
    pub(super) fn remove_furthest_from_centroid<D>(&mut self, metric: &D) -> Option<G>
    where
        D: DistanceMetric<G::Scalar> + ?Sized,
    {
        let furthest = self
            .working
            .values()
            .map(|g| (metric.distance(&self.centroid, g.position()), g.id()))
            .max_by(|(d1, id1), (d2, id2)| {
                d1.partial_cmp(d2)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| id2.cmp(id1))
            })
            .map(|(_, id)| id)?;
        self.working.remove(&furthest)
    }
}
