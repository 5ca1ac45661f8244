use super::{SpeciationError, Species};
use crate::metrics::DistanceMetric;
use crate::{Genome, GenomeId};

use log::{debug, trace, warn};
use num_traits::ToPrimitive;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Summary of a single speciation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KMeansReport {
    /// Number of reallocation passes made.
    pub passes: usize,
    /// Total number of genomes moved between species.
    pub moves: usize,
    /// Whether the last pass moved no genomes.
    pub converged: bool,
    /// Number of species that ended up empty and were
    /// given a genome from another species.
    pub empty_species_repopulated: usize,
}

/// A decision to move a genome between species.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Reallocation {
    pub genome: GenomeId,
    pub from: usize,
    pub to: usize,
}

/// The k-means machinery shared by the sequential and
/// parallel strategies. They differ only in how a pass's
/// reallocations are found, which is passed in as `search`.
pub(super) struct KMeans<D, R> {
    pub metric: D,
    pub max_iterations: usize,
    pub rng: R,
    pub last_report: Option<KMeansReport>,
}

impl<D, R: Rng> KMeans<D, R> {
    pub fn new(metric: D, max_iterations: usize, rng: R) -> KMeans<D, R> {
        KMeans {
            metric,
            max_iterations,
            rng,
            last_report: None,
        }
    }

    pub fn speciate_all<G, S>(
        &mut self,
        genomes: Vec<G>,
        species_count: usize,
        search: S,
    ) -> Result<Vec<Species<G>>, SpeciationError>
    where
        G: Genome,
        D: DistanceMetric<G::Scalar>,
        S: FnMut(&D, &[Species<G>]) -> Vec<Reallocation>,
    {
        if species_count == 0 {
            return Err(SpeciationError::ZeroSpeciesCount);
        }
        if genomes.len() < species_count {
            return Err(SpeciationError::TooFewGenomes {
                genomes: genomes.len(),
                species: species_count,
            });
        }

        let mut species = self.init_kmeans_plus_plus(genomes, species_count);
        self.run(&mut species, search)?;
        Ok(species)
    }

    pub fn speciate_add<G, S>(
        &mut self,
        genomes: Vec<G>,
        species: &mut [Species<G>],
        search: S,
    ) -> Result<(), SpeciationError>
    where
        G: Genome,
        D: DistanceMetric<G::Scalar>,
        S: FnMut(&D, &[Species<G>]) -> Vec<Reallocation>,
    {
        if species.is_empty() {
            return Err(SpeciationError::NoSpecies);
        }
        let total = genomes.len() + species.iter().map(Species::len).sum::<usize>();
        if total < species.len() {
            return Err(SpeciationError::TooFewGenomes {
                genomes: total,
                species: species.len(),
            });
        }

        for genome in genomes {
            let nearest = nearest_species(&self.metric, &genome, species);
            species[nearest].add_genome(genome);
        }
        self.run(species, search)
    }

    /// Creates `species_count` species seeded by k-means++,
    /// with every other genome assigned to its nearest seed.
    fn init_kmeans_plus_plus<G>(
        &mut self,
        genomes: Vec<G>,
        species_count: usize,
    ) -> Vec<Species<G>>
    where
        G: Genome,
        D: DistanceMetric<G::Scalar>,
    {
        let genome_count = genomes.len();
        let mut remaining = genomes;
        let mut seeds = Vec::with_capacity(species_count);

        let first = self.rng.gen_range(0..remaining.len());
        seeds.push(remaining.remove(first));
        while seeds.len() < species_count {
            let next = self.choose_seed(&seeds, &remaining);
            seeds.push(remaining.remove(next));
        }
        debug!(
            "seeded {} species from {} genomes",
            species_count, genome_count
        );

        // Enough room for the species to double in size
        // before reallocating.
        let capacity = genome_count * 2 / species_count;
        let mut species: Vec<Species<G>> = seeds
            .into_iter()
            .enumerate()
            .map(|(i, seed)| {
                let mut s = Species::with_capacity(i, seed.position().clone(), capacity);
                s.add_genome(seed);
                s
            })
            .collect();

        for genome in remaining {
            let nearest = nearest_species(&self.metric, &genome, &species);
            species[nearest].add_genome(genome);
        }
        species
    }

    /// Picks the index of the next seed among `remaining`, with
    /// probability proportional to the squared distance to the
    /// nearest already chosen seed.
    fn choose_seed<G>(&mut self, seeds: &[G], remaining: &[G]) -> usize
    where
        G: Genome,
        D: DistanceMetric<G::Scalar>,
    {
        let weights: Vec<f64> = remaining
            .iter()
            .map(|genome| {
                let distance = seeds
                    .iter()
                    .map(|seed| self.metric.distance(seed.position(), genome.position()))
                    .fold(None, |min: Option<G::Scalar>, d| match min {
                        Some(m) if m <= d => Some(m),
                        _ => Some(d),
                    })
                    .and_then(|d| d.to_f64())
                    .unwrap_or(0.0);
                distance * distance
            })
            .collect();

        match WeightedIndex::new(&weights) {
            Ok(distribution) => distribution.sample(&mut self.rng),
            // Every candidate sits on top of a seed.
            Err(_) => self.rng.gen_range(0..remaining.len()),
        }
    }

    /// Runs the k-means passes and fills any species left empty,
    /// recording a report of the run.
    fn run<G, S>(&mut self, species: &mut [Species<G>], search: S) -> Result<(), SpeciationError>
    where
        G: Genome,
        D: DistanceMetric<G::Scalar>,
        S: FnMut(&D, &[Species<G>]) -> Vec<Reallocation>,
    {
        for s in species.iter_mut() {
            s.load_working();
        }
        let result = self.refine(species, search);
        for s in species.iter_mut() {
            s.flush_working();
        }

        let report = result?;
        debug!(
            "k-means finished after {} passes ({} moves, converged: {})",
            report.passes, report.moves, report.converged
        );
        self.last_report = Some(report);
        Ok(())
    }

    fn refine<G, S>(
        &self,
        species: &mut [Species<G>],
        mut search: S,
    ) -> Result<KMeansReport, SpeciationError>
    where
        G: Genome,
        D: DistanceMetric<G::Scalar>,
        S: FnMut(&D, &[Species<G>]) -> Vec<Reallocation>,
    {
        for s in species.iter_mut() {
            s.recalc_centroid(&self.metric)?;
        }

        let mut report = KMeansReport::default();
        let mut dirty = vec![false; species.len()];
        for pass in 0..self.max_iterations {
            let reallocations = search(&self.metric, species);
            report.passes += 1;
            trace!("k-means pass {}: {} reallocations", pass, reallocations.len());
            if reallocations.is_empty() {
                report.converged = true;
                break;
            }

            dirty.iter_mut().for_each(|d| *d = false);
            for r in &reallocations {
                if let Some(genome) = species[r.from].working.remove(&r.genome) {
                    species[r.to].working.insert(r.genome, genome);
                    dirty[r.from] = true;
                    dirty[r.to] = true;
                    report.moves += 1;
                }
            }

            for (s, _) in species.iter_mut().zip(&dirty).filter(|(_, d)| **d) {
                s.recalc_centroid(&self.metric)?;
            }
        }

        report.empty_species_repopulated = self.populate_empty_species(species)?;
        Ok(report)
    }

    /// Gives every empty species the least representative
    /// member of the largest species. The largest species is
    /// chosen once, and only chosen again if donating would
    /// leave it empty.
    fn populate_empty_species<G>(
        &self,
        species: &mut [Species<G>],
    ) -> Result<usize, SpeciationError>
    where
        G: Genome,
        D: DistanceMetric<G::Scalar>,
    {
        let empty: Vec<usize> = species
            .iter()
            .enumerate()
            .filter(|(_, s)| s.working.is_empty())
            .map(|(i, _)| i)
            .collect();
        if empty.is_empty() {
            return Ok(0);
        }
        warn!("{} species emptied by k-means; repopulating", empty.len());

        let mut touched = vec![false; species.len()];
        let mut donor = largest_species(species);
        let mut repopulated = 0;
        for &target in &empty {
            if species[donor].working.len() <= 1 {
                donor = largest_species(species);
                if species[donor].working.len() <= 1 {
                    break;
                }
            }
            if let Some(genome) = species[donor].remove_furthest_from_centroid(&self.metric) {
                species[target].working.insert(genome.id(), genome);
                touched[donor] = true;
                touched[target] = true;
                repopulated += 1;
            }
        }

        for (s, _) in species.iter_mut().zip(&touched).filter(|(_, t)| **t) {
            s.recalc_centroid(&self.metric)?;
        }
        Ok(repopulated)
    }
}

/// Returns the index of the species whose centroid is nearest
/// to `genome`. Equidistant species resolve to the lowest index.
///
/// `species` must not be empty.
pub(super) fn nearest_species<D, G>(metric: &D, genome: &G, species: &[Species<G>]) -> usize
where
    G: Genome,
    D: DistanceMetric<G::Scalar> + ?Sized,
{
    let mut nearest = 0;
    let mut nearest_distance = metric.distance(genome.position(), species[0].centroid());
    for (i, s) in species.iter().enumerate().skip(1) {
        let distance = metric.distance(genome.position(), s.centroid());
        if distance < nearest_distance {
            nearest = i;
            nearest_distance = distance;
        }
    }
    nearest
}

/// Finds the reallocations of a pass on the calling thread.
pub(super) fn sequential_reallocations<D, G>(
    metric: &D,
    species: &[Species<G>],
) -> Vec<Reallocation>
where
    G: Genome,
    D: DistanceMetric<G::Scalar>,
{
    let mut reallocations = vec![];
    for (from, s) in species.iter().enumerate() {
        for genome in s.working.values() {
            let to = nearest_species(metric, genome, species);
            if to != from {
                reallocations.push(Reallocation {
                    genome: genome.id(),
                    from,
                    to,
                });
            }
        }
    }
    reallocations
}

/// Index of the species with the most working members,
/// lowest index first among equals.
fn largest_species<G: Genome>(species: &[Species<G>]) -> usize {
    let mut largest = 0;
    for (i, s) in species.iter().enumerate().skip(1) {
        if s.working.len() > species[largest].working.len() {
            largest = i;
        }
    }
    largest
}
