//! Errors for rendering descriptors as document commands.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{0} is not supported by document stores")]
    NotSupported(String),
    #[error("placeholder :{0} was never bound")]
    UnboundPlaceholder(String),
}
