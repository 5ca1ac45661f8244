use super::{scalar_from_count, sorted_columns, Aligned, Alignment, CentroidError, DistanceMetric};
use crate::{Position, Scalar};

use serde::{Deserialize, Serialize};

/// Euclidean distance between sparse positions.
///
/// Matched dimensions contribute `match_distance_coeff * (a - b)²`
/// to the sum under the root, mismatched ones
/// `mismatch_distance_coeff * x² + mismatch_distance_constant`.
///
/// The centroid is the coordinate-wise mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EuclideanDistanceMetric<T = f64> {
    pub match_distance_coeff: T,
    pub mismatch_distance_coeff: T,
    pub mismatch_distance_constant: T,
}

impl<T: Scalar> EuclideanDistanceMetric<T> {
    /// Creates a metric with the specified coefficients.
    pub fn new(
        match_distance_coeff: T,
        mismatch_distance_coeff: T,
        mismatch_distance_constant: T,
    ) -> EuclideanDistanceMetric<T> {
        EuclideanDistanceMetric {
            match_distance_coeff,
            mismatch_distance_coeff,
            mismatch_distance_constant,
        }
    }
}

impl<T: Scalar> Default for EuclideanDistanceMetric<T> {
    /// Plain Euclidean distance, with no mismatch penalty.
    fn default() -> Self {
        EuclideanDistanceMetric::new(T::one(), T::one(), T::zero())
    }
}

impl<T: Scalar> DistanceMetric<T> for EuclideanDistanceMetric<T> {
    /// # Examples
    /// ```
    /// use neat_dynamics::{metrics::{DistanceMetric, EuclideanDistanceMetric}, Position};
    ///
    /// let metric = EuclideanDistanceMetric::default();
    /// let a = Position::dense(&[0.0, 0.0]);
    /// let b = Position::dense(&[3.0, 4.0]);
    /// assert_eq!(metric.distance(&a, &b), 5.0);
    /// ```
    fn distance(&self, a: &Position<T>, b: &Position<T>) -> T {
        Alignment::new(a, b)
            .fold(T::zero(), |total, aligned| match aligned {
                Aligned::Match(x, y) => {
                    let d = x - y;
                    total + self.match_distance_coeff * d * d
                }
                Aligned::Mismatch(x) => {
                    total + self.mismatch_distance_coeff * x * x + self.mismatch_distance_constant
                }
            })
            .sqrt()
    }

    /// Each column is summed in sorted order so that
    /// floating-point rounding does not depend on the
    /// order the positions were given in.
    fn centroid(&self, positions: &[&Position<T>]) -> Result<Position<T>, CentroidError> {
        if positions.is_empty() {
            return Err(CentroidError::EmptyInput);
        }
        let n: T = scalar_from_count(positions.len());
        let coords = sorted_columns(positions)
            .into_iter()
            .map(|(dim, column)| {
                let sum = column.into_iter().fold(T::zero(), |acc, v| acc + v);
                (dim, sum / n)
            })
            .collect();
        Ok(Position::from_sorted(coords))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric() {
        let metric = EuclideanDistanceMetric::new(1.0, 1.0, 7.0);
        let a = Position::new(vec![(0, 1.0), (2, 2.0)]);
        let b = Position::new(vec![(0, 4.0), (1, 4.0)]);
        assert_eq!(metric.distance(&a, &b), metric.distance(&b, &a));
        // sqrt(3² + (4² + 7) + (2² + 7))
        assert_eq!(metric.distance(&a, &b), 43.0f64.sqrt());
    }

    #[test]
    fn centroid_is_coordinate_mean() {
        let metric = EuclideanDistanceMetric::default();
        let a = Position::new(vec![(0, 2.0), (3, 6.0)]);
        let b = Position::new(vec![(0, 4.0)]);
        let c = Position::new(vec![(0, 6.0), (5, 3.0)]);
        let centroid = metric.centroid(&[&a, &b, &c]).unwrap();
        assert_eq!(centroid.coords(), &[(0, 4.0), (3, 2.0), (5, 1.0)]);
    }

    #[test]
    fn centroid_works_for_f32() {
        let metric = EuclideanDistanceMetric::<f32>::default();
        let a = Position::dense(&[1.0f32, 1.0]);
        let b = Position::dense(&[3.0f32, -1.0]);
        let centroid = metric.centroid(&[&a, &b]).unwrap();
        assert_eq!(centroid.get(0), 2.0);
        assert_eq!(centroid.get(1), 0.0);
    }

    #[test]
    fn centroid_ignores_order() {
        let metric = EuclideanDistanceMetric::default();
        let points: Vec<Position<f64>> = (0..7)
            .map(|i| Position::dense(&[0.1 * i as f64, 1.0 / (i as f64 + 3.0)]))
            .collect();
        let forward: Vec<&Position<f64>> = points.iter().collect();
        let backward: Vec<&Position<f64>> = points.iter().rev().collect();
        assert_eq!(
            metric.centroid(&forward).unwrap(),
            metric.centroid(&backward).unwrap()
        );
    }

    #[test]
    fn centroid_of_nothing_fails() {
        let metric = EuclideanDistanceMetric::<f32>::default();
        assert_eq!(metric.centroid(&[]), Err(CentroidError::EmptyInput));
    }
}
