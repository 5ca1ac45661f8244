//! Statistics kept by the evolution algorithm,
//! and read by the complexity regulation strategies.
use serde::{Deserialize, Serialize};

use std::collections::VecDeque;
use std::num::NonZeroUsize;

/// Default number of samples kept in a [`ComplexityHistory`].
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Statistics about the evolution algorithm itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionAlgorithmStatistics {
    /// The current generation number.
    pub generation: u64,
    /// Total number of genome evaluations so far.
    pub total_evaluation_count: u64,
}

/// Statistics about the current population.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationStatistics {
    /// Mean complexity of the population's genomes.
    pub mean_complexity: f64,
    /// Recent values of `mean_complexity`, oldest first.
    pub mean_complexity_history: ComplexityHistory,
}

impl PopulationStatistics {
    /// Creates statistics keeping up to `capacity`
    /// past mean complexity values.
    pub fn with_history_capacity(capacity: NonZeroUsize) -> PopulationStatistics {
        PopulationStatistics {
            mean_complexity: 0.0,
            mean_complexity_history: ComplexityHistory::new(capacity),
        }
    }

    /// Sets the current mean complexity, and
    /// appends it to the history.
    ///
    /// # Examples
    /// ```
    /// use neat_dynamics::statistics::PopulationStatistics;
    ///
    /// let mut stats = PopulationStatistics::default();
    /// stats.record_mean_complexity(4.0);
    /// stats.record_mean_complexity(6.0);
    ///
    /// assert_eq!(stats.mean_complexity, 6.0);
    /// assert_eq!(stats.moving_average_complexity(), 5.0);
    /// ```
    pub fn record_mean_complexity(&mut self, mean_complexity: f64) {
        self.mean_complexity = mean_complexity;
        self.mean_complexity_history.push(mean_complexity);
    }

    /// Returns the moving average of the mean complexity,
    /// or the current mean complexity if there is no history.
    pub fn moving_average_complexity(&self) -> f64 {
        self.mean_complexity_history
            .mean()
            .unwrap_or(self.mean_complexity)
    }
}

/// A fixed-capacity history of samples. Once full,
/// each new sample evicts the oldest one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityHistory {
    samples: VecDeque<f64>,
    capacity: NonZeroUsize,
}

impl ComplexityHistory {
    pub fn new(capacity: NonZeroUsize) -> ComplexityHistory {
        ComplexityHistory {
            samples: VecDeque::with_capacity(capacity.get()),
            capacity,
        }
    }

    /// Appends a sample, evicting the oldest
    /// one if the history is full.
    pub fn push(&mut self, sample: f64) {
        if self.samples.len() == self.capacity.get() {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Returns an iterator over the samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    /// Returns the mean of the samples,
    /// or `None` if there are none.
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            None
        } else {
            Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
        }
    }
}

impl Default for ComplexityHistory {
    fn default() -> Self {
        let capacity = NonZeroUsize::new(DEFAULT_HISTORY_CAPACITY);
        ComplexityHistory::new(capacity.unwrap_or(NonZeroUsize::MIN))
    }
}
