/// An error type indicating a centroid
/// could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CentroidError {
    /// No positions were given.
    #[error("centroid requested over an empty set of positions")]
    EmptyInput,
}
