use alloy::primitives::U256;
use anyhow::{Context, Result};
use rocksdb::{DB, Options};
use std::fmt;
use std::path::Path;

use super::StorageError;

// persist the pricing parameters, one 32-byte word per field

const KEY_PREFIX: &[u8] = b"l2pricing/";

// fixed storage slots of the pricing state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PricingField {
    SpeedLimitPerSecond,
    PerBlockGasLimit,
    BaseFeeWei,
    MinBaseFeeWei,
    GasBacklog,
    PricingInertia,
    BacklogTolerance,
    GasPoolSeconds,
    RateEstimateInertia,
    GasPoolTargetBips,
    GasPoolWeightBips,
}

impl PricingField {
    pub const ALL: [PricingField; 11] = [
        PricingField::SpeedLimitPerSecond,
        PricingField::PerBlockGasLimit,
        PricingField::BaseFeeWei,
        PricingField::MinBaseFeeWei,
        PricingField::GasBacklog,
        PricingField::PricingInertia,
        PricingField::BacklogTolerance,
        PricingField::GasPoolSeconds,
        PricingField::RateEstimateInertia,
        PricingField::GasPoolTargetBips,
        PricingField::GasPoolWeightBips,
    ];

    pub fn offset(self) -> u8 {
        match self {
            PricingField::SpeedLimitPerSecond => 0,
            PricingField::PerBlockGasLimit => 1,
            PricingField::BaseFeeWei => 2,
            PricingField::MinBaseFeeWei => 3,
            PricingField::GasBacklog => 4,
            PricingField::PricingInertia => 5,
            PricingField::BacklogTolerance => 6,
            PricingField::GasPoolSeconds => 7,
            PricingField::RateEstimateInertia => 8,
            PricingField::GasPoolTargetBips => 9,
            PricingField::GasPoolWeightBips => 10,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PricingField::SpeedLimitPerSecond => "speed_limit_per_second",
            PricingField::PerBlockGasLimit => "per_block_gas_limit",
            PricingField::BaseFeeWei => "base_fee_wei",
            PricingField::MinBaseFeeWei => "min_base_fee_wei",
            PricingField::GasBacklog => "gas_backlog",
            PricingField::PricingInertia => "pricing_inertia",
            PricingField::BacklogTolerance => "backlog_tolerance",
            PricingField::GasPoolSeconds => "gas_pool_seconds",
            PricingField::RateEstimateInertia => "rate_estimate_inertia",
            PricingField::GasPoolTargetBips => "gas_pool_target_bips",
            PricingField::GasPoolWeightBips => "gas_pool_weight_bips",
        }
    }

    // database key: prefix followed by the slot offset
    pub fn key(self) -> Vec<u8> {
        let mut key = KEY_PREFIX.to_vec();
        key.push(self.offset());
        key
    }
}

impl fmt::Display for PricingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Word-level access to the persisted pricing state.
///
/// Every read and write is fallible. A slot that was never written reads as
/// zero.
pub trait PricingStore {
    fn get_word(&self, field: PricingField) -> Result<U256, StorageError>;

    fn set_word(&mut self, field: PricingField, value: U256) -> Result<(), StorageError>;

    fn get_u64(&self, field: PricingField) -> Result<u64, StorageError> {
        let word = self.get_word(field)?;
        u64::try_from(word).map_err(|_| StorageError::Corrupted {
            field,
            reason: format!("{} does not fit in 64 bits", word),
        })
    }

    fn set_u64(&mut self, field: PricingField, value: u64) -> Result<(), StorageError> {
        self.set_word(field, U256::from(value))
    }
}

impl<S: PricingStore + ?Sized> PricingStore for &mut S {
    fn get_word(&self, field: PricingField) -> Result<U256, StorageError> {
        (**self).get_word(field)
    }

    fn set_word(&mut self, field: PricingField, value: U256) -> Result<(), StorageError> {
        (**self).set_word(field, value)
    }
}

// ========== ROCKSDB BACKEND ==========

pub struct RocksStore {
    db: DB,
}

impl RocksStore {
    // Open (or create) the pricing database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let db = DB::open(&opts, path).context("Failed to open RocksDB")?;

        Ok(Self { db })
    }
}

impl PricingStore for RocksStore {
    fn get_word(&self, field: PricingField) -> Result<U256, StorageError> {
        let key = field.key();
        match self.db.get(&key).map_err(|e| StorageError::Read {
            field,
            reason: e.to_string(),
        })? {
            Some(bytes) => {
                if bytes.len() != 32 {
                    return Err(StorageError::Corrupted {
                        field,
                        reason: format!(
                            "expected 32-byte word at key 0x{}, found {} bytes",
                            hex::encode(&key),
                            bytes.len()
                        ),
                    });
                }
                let mut word = [0u8; 32];
                word.copy_from_slice(&bytes);
                Ok(U256::from_be_bytes(word))
            }
            None => Ok(U256::ZERO),
        }
    }

    fn set_word(&mut self, field: PricingField, value: U256) -> Result<(), StorageError> {
        self.db
            .put(field.key(), value.to_be_bytes::<32>())
            .map_err(|e| StorageError::Write {
                field,
                reason: e.to_string(),
            })
    }
}
