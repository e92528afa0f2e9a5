use thiserror::Error;

pub type WirerecordResult<T> = Result<T, WirerecordError>;

/// Errors raised by attribute declaration and marshaling.
///
/// Every failure in this crate is synchronous and deterministic. There are no
/// retryable conditions: declaration errors abort the model definition, and
/// marshal errors surface directly to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WirerecordError {
    #[error("Invalid Configuration: {0}")]
    Configuration(String),

    #[error("Name Collision: {0}")]
    NameCollision(String),

    #[error("Reserved Name: {0}")]
    ReservedName(String),

    #[error("Type Mismatch: {0}")]
    TypeMismatch(String),

    #[error("Unknown Attribute: {0}")]
    UnknownAttribute(String),
}
