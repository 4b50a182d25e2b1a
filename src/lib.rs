pub mod common;
pub mod gas;
pub mod storage;

// Re-export commonly used types for convenience
pub use gas::{
    Bips, GasConfig, L2PricingState, PricingError, PricingSnapshot, PricingVersion,
    compute_base_fee,
};
pub use storage::{MemoryStore, PricingField, PricingStore, RocksStore, StorageError};
