use std::collections::TryReserveError;
use thiserror::Error;

/// Failures a caller can observe. A missing key is not one of them:
/// `lookup` returns `None` and `delete` returns `false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The slot array could not be allocated. The table is left exactly as
    /// it was before the operation.
    #[error("slot array allocation failed: {0}")]
    AllocationFailure(#[from] TryReserveError),
    #[error("invalid table configuration: {0}")]
    InvalidConfig(&'static str),
}
