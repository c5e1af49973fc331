use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropagationError {
    /// The elements no longer describe a physical orbit (decayed, eccentricity
    /// out of range, ...).
    #[error("non-physical state: {0}")]
    NonPhysical(String),
    /// The computation itself failed (bad epoch, non-finite output, ...).
    #[error("propagation fault: {0}")]
    Fault(String),
}
