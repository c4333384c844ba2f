use thiserror::Error;

/// Precondition violations raised by the combinatorial parts of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error(
        "search space of {attributes} attributes exceeds the supported limit of {limit}; \
         split the relation before analyzing it"
    )]
    SearchSpaceTooLarge { attributes: usize, limit: usize },
}

/// Errors from the compact `A, B -> C` dependency notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDependencyError {
    #[error("missing \"->\" in functional dependency \"{0}\"")]
    MissingArrow(String),

    #[error("functional dependency \"{0}\" has an empty right-hand side")]
    EmptyRightHandSide(String),

    #[error("invalid attribute name \"{0}\"")]
    InvalidAttribute(String),
}
