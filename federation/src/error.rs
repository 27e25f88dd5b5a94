use thiserror::Error;

#[derive(Debug, Error)]
pub enum FederationError {
    #[error("Unknown course management source: {name}")]
    UnknownSource { name: String },

    #[error("Course management source registered twice: {name}")]
    DuplicateSource { name: String }
}

pub type FederationResult<T> = Result<T, FederationError>;
