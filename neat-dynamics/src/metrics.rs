//! Distance metrics over genome positions.
//!
//! A metric measures how far apart two [`Position`]s are, and
//! knows how to compute the centroid of a group of positions.
//! The speciation strategies are generic over the metric in use.
mod errors;
mod euclidean;
mod manhattan;

pub use errors::CentroidError;
pub use euclidean::EuclideanDistanceMetric;
pub use manhattan::ManhattanDistanceMetric;

use crate::{Position, Scalar};

use std::collections::BTreeMap;
use std::iter::Peekable;
use std::slice::Iter;

/// A distance function between positions, and the
/// matching notion of central tendency.
pub trait DistanceMetric<T: Scalar> {
    /// Returns the distance between `a` and `b`.
    ///
    /// Must be non-negative and symmetric.
    fn distance(&self, a: &Position<T>, b: &Position<T>) -> T;

    /// Returns the centroid of `positions`.
    ///
    /// The result depends only on the multiset of
    /// positions, not on their order.
    ///
    /// # Errors
    /// Returns [`CentroidError::EmptyInput`] if
    /// `positions` is empty.
    fn centroid(&self, positions: &[&Position<T>]) -> Result<Position<T>, CentroidError>;
}

impl<T: Scalar, M: DistanceMetric<T> + ?Sized> DistanceMetric<T> for &M {
    fn distance(&self, a: &Position<T>, b: &Position<T>) -> T {
        (**self).distance(a, b)
    }

    fn centroid(&self, positions: &[&Position<T>]) -> Result<Position<T>, CentroidError> {
        (**self).centroid(positions)
    }
}

impl<T: Scalar, M: DistanceMetric<T> + ?Sized> DistanceMetric<T> for Box<M> {
    fn distance(&self, a: &Position<T>, b: &Position<T>) -> T {
        (**self).distance(a, b)
    }

    fn centroid(&self, positions: &[&Position<T>]) -> Result<Position<T>, CentroidError> {
        (**self).centroid(positions)
    }
}

/// A pair of coordinates from two positions,
/// aligned by dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Aligned<T> {
    /// The dimension is present in both positions.
    Match(T, T),
    /// The dimension is present in only one position.
    Mismatch(T),
}

/// Iterator walking two sorted coordinate lists in
/// lockstep, yielding one [`Aligned`] item per dimension
/// present in either list.
pub(crate) struct Alignment<'a, T> {
    left: Peekable<Iter<'a, (usize, T)>>,
    right: Peekable<Iter<'a, (usize, T)>>,
}

impl<'a, T: Scalar> Alignment<'a, T> {
    pub(crate) fn new(a: &'a Position<T>, b: &'a Position<T>) -> Alignment<'a, T> {
        Alignment {
            left: a.coords().iter().peekable(),
            right: b.coords().iter().peekable(),
        }
    }
}

impl<'a, T: Scalar> Iterator for Alignment<'a, T> {
    type Item = Aligned<T>;

    fn next(&mut self) -> Option<Aligned<T>> {
        match (self.left.peek(), self.right.peek()) {
            (Some((l_dim, l)), Some((r_dim, r))) => {
                if l_dim == r_dim {
                    let item = Aligned::Match(*l, *r);
                    self.left.next();
                    self.right.next();
                    Some(item)
                } else if l_dim < r_dim {
                    let item = Aligned::Mismatch(*l);
                    self.left.next();
                    Some(item)
                } else {
                    let item = Aligned::Mismatch(*r);
                    self.right.next();
                    Some(item)
                }
            }
            (Some((_, l)), None) => {
                let item = Aligned::Mismatch(*l);
                self.left.next();
                Some(item)
            }
            (None, Some((_, r))) => {
                let item = Aligned::Mismatch(*r);
                self.right.next();
                Some(item)
            }
            (None, None) => None,
        }
    }
}

/// Groups the explicit coordinates of all positions by
/// dimension. Each column is sorted by value, so anything
/// aggregated from it is independent of input order.
pub(crate) fn sorted_columns<T: Scalar>(positions: &[&Position<T>]) -> BTreeMap<usize, Vec<T>> {
    let mut columns: BTreeMap<usize, Vec<T>> = BTreeMap::new();
    for position in positions {
        for (dim, value) in position.coords() {
            columns.entry(*dim).or_default().push(*value);
        }
    }
    for column in columns.values_mut() {
        column.sort_unstable_by(|a, b| {
            a.partial_cmp(b)
                .unwrap_or_else(|| panic!("invalid coordinate value detected (NaN)"))
        });
    }
    columns
}

/// Converts a count to the scalar type.
pub(crate) fn scalar_from_count<T: Scalar>(n: usize) -> T {
    // Every Float can represent a usize, if only approximately.
    T::from(n).unwrap_or_else(T::max_value)
}
