//! Errors for statement translation.

/// A type for translation errors.
///
/// Translation either produces a complete descriptor or one of these; there is no
/// partial result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Unrecognized statement: '{0}'.")]
    UnrecognizedStatement(String),
    #[error("Malformed clause: {0}.")]
    MalformedClause(String),
    #[error("Statement names {columns} columns but supplies {values} values.")]
    ColumnCountMismatch { columns: usize, values: usize },
    #[error("No parameter bound for placeholder ':{0}'.")]
    MissingBinding(String),
    #[error("Unexpected token '{0}'.")]
    UnexpectedToken(String),
    #[error("{0} joins are not supported, only LEFT JOIN.")]
    UnsupportedJoin(String),
    #[error("Cannot tell which side of join condition '{0}' refers to the joined table.")]
    AmbiguousJoinField(String),
}
