use super::PricingField;

// failure of the backing store behind the pricing accessors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to read {field}: {reason}")]
    Read { field: PricingField, reason: String },
    #[error("Failed to write {field}: {reason}")]
    Write { field: PricingField, reason: String },
    #[error("Corrupted value for {field}: {reason}")]
    Corrupted { field: PricingField, reason: String },
}

impl StorageError {
    pub fn field(&self) -> PricingField {
        match self {
            StorageError::Read { field, .. }
            | StorageError::Write { field, .. }
            | StorageError::Corrupted { field, .. } => *field,
        }
    }
}
