use num_traits::Float;
use serde::{Deserialize, Serialize};

use std::fmt::Debug;

/// Stable, unique genome identifier.
pub type GenomeId = u64;

/// Numeric type usable as a position coordinate.
///
/// Implemented for every `num_traits::Float` that can
/// be shared across threads, i.e. `f32` and `f64`.
pub trait Scalar: Float + Debug + Send + Sync + 'static {}

impl<T> Scalar for T where T: Float + Debug + Send + Sync + 'static {}

/// An interface for genomes that can be speciated.
///
/// Speciation only needs a genome's identity and its
/// position; everything else about the genome is
/// opaque to this crate.
pub trait Genome {
    type Scalar: Scalar;

    /// Returns the genome's identifier. Must be unique
    /// within a population and stable over its lifetime.
    fn id(&self) -> GenomeId;

    /// Returns the genome's position vector, typically
    /// derived from its connection genes. It must not
    /// change while a speciation run is in progress.
    fn position(&self) -> &Position<Self::Scalar>;
}

/// A sparse position vector.
///
/// Coordinates are `(dimension, value)` pairs kept sorted by
/// dimension, with no dimension appearing twice. Dimensions
/// that are absent have an implicit value of zero. For genomes
/// the dimension is usually a connection gene's innovation
/// number, and the value its weight.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Position<T> {
    coords: Vec<(usize, T)>,
}

impl<T: Scalar> Position<T> {
    /// Creates a position from arbitrary coordinates.
    /// They are sorted by dimension, and coordinates
    /// sharing a dimension are summed.
    ///
    /// # Examples
    /// ```
    /// use neat_dynamics::Position;
    ///
    /// let p = Position::new(vec![(4, 1.0), (1, 2.0), (4, 0.5)]);
    /// assert_eq!(p.coords(), &[(1, 2.0), (4, 1.5)]);
    /// ```
    pub fn new(mut coords: Vec<(usize, T)>) -> Position<T> {
        coords.sort_by_key(|(dim, _)| *dim);
        coords.dedup_by(|next, kept| {
            if next.0 == kept.0 {
                kept.1 = kept.1 + next.1;
                true
            } else {
                false
            }
        });
        Position { coords }
    }

    /// Creates a position with one coordinate
    /// per value, dimension `i` holding `values[i]`.
    ///
    /// # Examples
    /// ```
    /// use neat_dynamics::Position;
    ///
    /// let p = Position::dense(&[3.0, 0.0, 7.0]);
    /// assert_eq!(p.get(2), 7.0);
    /// assert_eq!(p.len(), 3);
    /// ```
    pub fn dense(values: &[T]) -> Position<T> {
        Position {
            coords: values.iter().copied().enumerate().collect(),
        }
    }

    /// Returns a position with no coordinates.
    pub fn empty() -> Position<T> {
        Position { coords: vec![] }
    }

    /// Builds a position from coordinates that are already
    /// sorted by dimension and free of duplicates.
    pub(crate) fn from_sorted(coords: Vec<(usize, T)>) -> Position<T> {
        debug_assert!(coords.windows(2).all(|w| w[0].0 < w[1].0));
        Position { coords }
    }

    /// Returns the explicit coordinates, sorted by dimension.
    pub fn coords(&self) -> &[(usize, T)] {
        &self.coords
    }

    /// Returns the value at `dimension`, zero if absent.
    pub fn get(&self, dimension: usize) -> T {
        self.coords
            .binary_search_by_key(&dimension, |(dim, _)| *dim)
            .map(|i| self.coords[i].1)
            .unwrap_or_else(|_| T::zero())
    }

    /// Number of explicit coordinates.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

impl<T: Scalar> From<Vec<T>> for Position<T> {
    fn from(values: Vec<T>) -> Position<T> {
        Position::dense(&values)
    }
}
