use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrudsError {
    #[error("Please fill all the fields (missing: {})", .0.join(", "))]
    Validation(Vec<&'static str>),
    #[error("No product at position {index} (store holds {len})")]
    OutOfRange { index: usize, len: usize },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] toml::de::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Prompt error: {0}")]
    Prompt(#[from] inquire::InquireError),
}

impl CrudsError {
    /// Errors the user can fix by retrying with other input.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CrudsError::Validation(_) | CrudsError::OutOfRange { .. } | CrudsError::InvalidArgument(_)
        )
    }
}
