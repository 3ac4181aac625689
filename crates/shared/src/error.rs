use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("position is missing")]
    MissingPosition,
    #[error("unknown position id: {0}")]
    UnknownPosition(String),
}
