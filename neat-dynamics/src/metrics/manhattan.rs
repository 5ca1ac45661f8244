use super::{scalar_from_count, sorted_columns, Aligned, Alignment, CentroidError, DistanceMetric};
use crate::{Position, Scalar};

use serde::{Deserialize, Serialize};

/// Manhattan (taxicab) distance between sparse positions.
///
/// Dimensions present in both positions contribute
/// `match_distance_coeff * |a - b|`. Dimensions present in
/// only one contribute `mismatch_distance_coeff * |x|`, plus
/// `mismatch_distance_constant`, which penalizes structural
/// differences between genomes independently of weights.
///
/// The centroid is the coordinate-wise median.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManhattanDistanceMetric<T = f64> {
    pub match_distance_coeff: T,
    pub mismatch_distance_coeff: T,
    pub mismatch_distance_constant: T,
}

impl<T: Scalar> ManhattanDistanceMetric<T> {
    /// Creates a metric with the specified coefficients.
    pub fn new(
        match_distance_coeff: T,
        mismatch_distance_coeff: T,
        mismatch_distance_constant: T,
    ) -> ManhattanDistanceMetric<T> {
        ManhattanDistanceMetric {
            match_distance_coeff,
            mismatch_distance_coeff,
            mismatch_distance_constant,
        }
    }
}

impl<T: Scalar> Default for ManhattanDistanceMetric<T> {
    /// Plain Manhattan distance, with no mismatch penalty.
    fn default() -> Self {
        ManhattanDistanceMetric::new(T::one(), T::one(), T::zero())
    }
}

impl<T: Scalar> DistanceMetric<T> for ManhattanDistanceMetric<T> {
    /// # Examples
    /// ```
    /// use neat_dynamics::{metrics::{DistanceMetric, ManhattanDistanceMetric}, Position};
    ///
    /// let metric = ManhattanDistanceMetric::default();
    /// let a = Position::dense(&[0.0, 1.0]);
    /// let b = Position::dense(&[10.0, 0.0]);
    /// assert_eq!(metric.distance(&a, &b), 11.0);
    /// ```
    fn distance(&self, a: &Position<T>, b: &Position<T>) -> T {
        Alignment::new(a, b).fold(T::zero(), |total, aligned| match aligned {
            Aligned::Match(x, y) => total + self.match_distance_coeff * (x - y).abs(),
            Aligned::Mismatch(x) => {
                total + self.mismatch_distance_coeff * x.abs() + self.mismatch_distance_constant
            }
        })
    }

    fn centroid(&self, positions: &[&Position<T>]) -> Result<Position<T>, CentroidError> {
        if positions.is_empty() {
            return Err(CentroidError::EmptyInput);
        }
        let n = positions.len();
        let coords = sorted_columns(positions)
            .into_iter()
            .map(|(dim, column)| (dim, median_with_implicit_zeros(&column, n)))
            .filter(|(_, median)| !median.is_zero())
            .collect();
        Ok(Position::from_sorted(coords))
    }
}

/// Median of `n` values, of which `column` holds the explicit
/// ones (sorted) and the remaining `n - column.len()` are zero.
fn median_with_implicit_zeros<T: Scalar>(column: &[T], n: usize) -> T {
    let zeros = n - column.len();
    // Position of the first non-negative explicit value; the
    // implicit zeros are slotted in just before it.
    let split = column.partition_point(|v| *v < T::zero());
    let nth = |i: usize| -> T {
        if i < split {
            column[i]
        } else if i < split + zeros {
            T::zero()
        } else {
            column[i - zeros]
        }
    };
    if n % 2 == 1 {
        nth(n / 2)
    } else {
        (nth(n / 2 - 1) + nth(n / 2)) / scalar_from_count(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric() {
        let metric = ManhattanDistanceMetric::new(1.0, 2.0, 0.5);
        let a = Position::new(vec![(0, 1.0), (3, -2.0)]);
        let b = Position::new(vec![(0, 4.0), (5, 1.0)]);
        assert_eq!(metric.distance(&a, &b), metric.distance(&b, &a));
        // |1 - 4| + (2 * 2 + 0.5) + (2 * 1 + 0.5)
        assert_eq!(metric.distance(&a, &b), 3.0 + 4.5 + 2.5);
    }

    #[test]
    fn distance_to_self_is_zero() {
        let metric = ManhattanDistanceMetric::new(1.0, 1.0, 3.0);
        let a = Position::new(vec![(1, 0.25f32), (9, -7.0)]);
        assert_eq!(metric.distance(&a, &a), 0.0);
    }

    #[test]
    fn centroid_is_coordinate_median() {
        let metric = ManhattanDistanceMetric::default();
        let a = Position::dense(&[1.0, 10.0]);
        let b = Position::dense(&[2.0, -4.0]);
        let c = Position::dense(&[9.0, 3.0]);
        let centroid = metric.centroid(&[&a, &b, &c]).unwrap();
        assert_eq!(centroid.get(0), 2.0);
        assert_eq!(centroid.get(1), 3.0);
    }

    #[test]
    fn centroid_median_counts_implicit_zeros() {
        let metric = ManhattanDistanceMetric::default();
        let a = Position::new(vec![(0, 4.0), (1, 6.0)]);
        let b = Position::new(vec![(0, 2.0)]);
        let c = Position::new(vec![(0, -2.0)]);
        let d = Position::new(vec![(1, 8.0)]);
        let centroid = metric.centroid(&[&a, &b, &c, &d]).unwrap();
        // Dimension 0: [-2, 0, 2, 4] -> 1. Dimension 1: [0, 0, 6, 8] -> 3.
        assert_eq!(centroid.coords(), &[(0, 1.0), (1, 3.0)]);

        // A dimension held by a minority of positions has median zero.
        let centroid = metric.centroid(&[&b, &c, &d]).unwrap();
        assert!(centroid.is_empty());
    }

    #[test]
    fn centroid_ignores_order() {
        let metric = ManhattanDistanceMetric::default();
        let a = Position::dense(&[0.1, 0.7, 0.3]);
        let b = Position::dense(&[0.2, 0.3, 0.9]);
        let c = Position::dense(&[0.5, 0.4, 0.1]);
        let d = Position::dense(&[0.8, 0.1, 0.2]);
        assert_eq!(
            metric.centroid(&[&a, &b, &c, &d]).unwrap(),
            metric.centroid(&[&d, &b, &a, &c]).unwrap()
        );
    }

    #[test]
    fn centroid_of_nothing_fails() {
        let metric = ManhattanDistanceMetric::<f64>::default();
        assert_eq!(metric.centroid(&[]), Err(CentroidError::EmptyInput));
    }
}
