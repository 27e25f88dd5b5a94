use cm_core::CmError;
use federation::FederationError;
use thiserror::Error;

pub type GroupProviderResult<T> = Result<T, GroupProviderError>;

#[derive(Debug, Error)]
pub enum GroupProviderError {
    /// A course management source failed. Never NotFound or Unsupported:
    /// those are absorbed before they reach the caller.
    #[error(transparent)]
    Source(#[from] CmError),

    #[error("Unknown role resolver: {name}")]
    UnknownResolver { name: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] validator::ValidationErrors),

    #[error("Federation setup failed: {0}")]
    Federation(#[from] FederationError)
}

impl GroupProviderError {
    /// Construction problems, as opposed to a source failing mid-query.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::Source(_))
    }
}
