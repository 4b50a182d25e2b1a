use alloy::primitives::U256;
use std::collections::HashMap;

use super::{PricingField, PricingStore, StorageError};

// in-process backend, used by the simulator and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    words: HashMap<PricingField, U256>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // number of slots that hold a non-zero word
    pub fn populated_slots(&self) -> usize {
        self.words.len()
    }
}

impl PricingStore for MemoryStore {
    fn get_word(&self, field: PricingField) -> Result<U256, StorageError> {
        Ok(self.words.get(&field).copied().unwrap_or(U256::ZERO))
    }

    fn set_word(&mut self, field: PricingField, value: U256) -> Result<(), StorageError> {
        // zero words are indistinguishable from empty slots
        if value.is_zero() {
            self.words.remove(&field);
        } else {
            self.words.insert(field, value);
        }
        Ok(())
    }
}
