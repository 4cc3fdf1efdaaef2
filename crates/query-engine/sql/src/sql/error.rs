//! Errors for rendering descriptors as SQL.

/// A descriptor that has no relational rendering.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{0} is not supported in SQL")]
    NotSupported(String),
    #[error("placeholder :{0} was never bound")]
    UnboundPlaceholder(String),
}
