use crate::storage::StorageError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl PricingError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        PricingError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
