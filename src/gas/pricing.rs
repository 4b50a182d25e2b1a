//! The per-block L2 pricing state machine.
//!
//! Gas consumed by a block grows the backlog; elapsed time drains it at the
//! speed limit. Once the backlog exceeds `backlog_tolerance` seconds of
//! throughput, the base fee rises exponentially above the floor.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::bips::{
    Bips, apply_signed_delta, approx_exp_basis_points, mul_by_bips, natural_to_bips,
    saturating_neg, saturating_ucast_to_signed,
};
use super::gas_config::validate_bips;
use super::{GasConfig, PricingError};
use crate::storage::{PricingField, PricingStore, StorageError};

// read-only copy of every persisted pricing field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSnapshot {
    pub speed_limit_per_second: u64,
    pub per_block_gas_limit: u64,
    pub base_fee_wei: U256,
    pub min_base_fee_wei: U256,
    pub gas_backlog: u64,
    pub pricing_inertia: u64,
    pub backlog_tolerance: u64,
    pub gas_pool_seconds: u64,
    pub rate_estimate_inertia: u64,
    pub gas_pool_target_bips: Bips,
    pub gas_pool_weight_bips: Bips,
}

/// Computes the base fee implied by `backlog`.
///
/// Returns `min_base_fee` while the backlog is within `tolerance` seconds of
/// throughput, and `min_base_fee * e^(excess / (inertia * speed_limit))`
/// beyond it. A zero damping denominator gives the maximal exponent.
pub fn compute_base_fee(
    backlog: u64,
    speed_limit: u64,
    inertia: u64,
    tolerance: u64,
    min_base_fee: U256,
) -> U256 {
    let threshold = tolerance.saturating_mul(speed_limit);
    if backlog <= threshold {
        return min_base_fee;
    }

    let excess = saturating_ucast_to_signed(backlog - threshold);
    let damping = saturating_ucast_to_signed(inertia.saturating_mul(speed_limit));
    let exponent_bips = natural_to_bips(excess)
        .checked_div(damping)
        .unwrap_or(Bips::MAX);

    mul_by_bips(min_base_fee, approx_exp_basis_points(exponent_bips))
}

// range-checked conversion of a bips setting to its stored word
fn bips_to_word(name: &'static str, value: Bips) -> Result<u64, PricingError> {
    validate_bips(name, value)?;
    u64::try_from(value).map_err(|_| PricingError::invalid(name, format!("{} is negative", value)))
}

pub struct L2PricingState<S> {
    store: S,
}

impl<S: PricingStore> L2PricingState<S> {
    // wrap a store that already holds an initialized pricing state
    pub fn open(store: S) -> Self {
        Self { store }
    }

    // write the genesis values and return the opened state
    pub fn initialize(mut store: S, config: &GasConfig) -> Result<Self, PricingError> {
        config.validate()?;

        store.set_u64(PricingField::SpeedLimitPerSecond, config.speed_limit_per_second)?;
        store.set_u64(PricingField::PerBlockGasLimit, config.per_block_gas_limit)?;
        store.set_word(PricingField::MinBaseFeeWei, config.min_base_fee_wei)?;
        store.set_word(PricingField::BaseFeeWei, config.initial_base_fee_wei)?;
        store.set_u64(PricingField::GasBacklog, 0)?;
        store.set_u64(PricingField::PricingInertia, config.pricing_inertia)?;
        store.set_u64(PricingField::BacklogTolerance, config.backlog_tolerance)?;
        store.set_u64(PricingField::GasPoolSeconds, config.gas_pool_seconds)?;
        store.set_u64(PricingField::RateEstimateInertia, config.rate_estimate_inertia)?;
        store.set_u64(
            PricingField::GasPoolTargetBips,
            bips_to_word("gas_pool_target_bips", config.gas_pool_target_bips)?,
        )?;
        store.set_u64(
            PricingField::GasPoolWeightBips,
            bips_to_word("gas_pool_weight_bips", config.gas_pool_weight_bips)?,
        )?;

        info!(
            speed_limit = config.speed_limit_per_second,
            block_gas_limit = config.per_block_gas_limit,
            min_base_fee = %config.min_base_fee_wei,
            "initialized L2 pricing state"
        );

        Ok(Self { store })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Folds a signed gas delta into the backlog.
    ///
    /// Positive deltas are gas consumed and grow the backlog. Negative deltas
    /// are replenished capacity and shrink it, stopping at zero.
    pub fn add_to_gas_pool(&mut self, gas_delta: i64) -> Result<(), StorageError> {
        let backlog = self.gas_backlog()?;
        let new_backlog = apply_signed_delta(backlog, gas_delta);
        if new_backlog != backlog {
            debug!(backlog = new_backlog, old = backlog, gas_delta, "gas backlog changed");
        }
        self.store.set_u64(PricingField::GasBacklog, new_backlog)
    }

    // charge gas consumed by executed transactions to the backlog
    pub fn record_gas_used(&mut self, gas: u64) -> Result<(), StorageError> {
        self.add_to_gas_pool(saturating_ucast_to_signed(gas))
    }

    /// Drains the backlog for `time_passed` seconds and republishes the base fee.
    ///
    /// The first storage failure aborts the transition; the base fee is only
    /// written once every input has been read successfully.
    pub fn update_pricing_model(&mut self, time_passed: u64) -> Result<U256, StorageError> {
        let result = self.try_update_pricing_model(time_passed);
        if let Err(err) = &result {
            warn!(time_passed, %err, "pricing update aborted");
        }
        result
    }

    fn try_update_pricing_model(&mut self, time_passed: u64) -> Result<U256, StorageError> {
        let speed_limit = self.speed_limit_per_second()?;
        if speed_limit == 0 {
            return Err(StorageError::Corrupted {
                field: PricingField::SpeedLimitPerSecond,
                reason: "speed limit is zero".to_string(),
            });
        }
        let inertia = self.pricing_inertia()?;
        if inertia == 0 {
            return Err(StorageError::Corrupted {
                field: PricingField::PricingInertia,
                reason: "pricing inertia is zero".to_string(),
            });
        }

        self.add_to_gas_pool(saturating_neg(time_passed.saturating_mul(speed_limit)))?;

        let tolerance = self.backlog_tolerance()?;
        let backlog = self.gas_backlog()?;
        let min_base_fee = self.min_base_fee_wei()?;

        let base_fee = compute_base_fee(backlog, speed_limit, inertia, tolerance, min_base_fee);

        let old_base_fee = self.base_fee_wei()?;
        if old_base_fee != base_fee {
            debug!(base_fee = %base_fee, old = %old_base_fee, backlog, "base fee changed");
        }
        self.store.set_word(PricingField::BaseFeeWei, base_fee)?;

        Ok(base_fee)
    }

    pub fn snapshot(&self) -> Result<PricingSnapshot, StorageError> {
        Ok(PricingSnapshot {
            speed_limit_per_second: self.speed_limit_per_second()?,
            per_block_gas_limit: self.per_block_gas_limit()?,
            base_fee_wei: self.base_fee_wei()?,
            min_base_fee_wei: self.min_base_fee_wei()?,
            gas_backlog: self.gas_backlog()?,
            pricing_inertia: self.pricing_inertia()?,
            backlog_tolerance: self.backlog_tolerance()?,
            gas_pool_seconds: self.gas_pool_seconds()?,
            rate_estimate_inertia: self.rate_estimate_inertia()?,
            gas_pool_target_bips: self.gas_pool_target_bips()?,
            gas_pool_weight_bips: self.gas_pool_weight_bips()?,
        })
    }

    // ========== ACCESSORS ==========

    pub fn speed_limit_per_second(&self) -> Result<u64, StorageError> {
        self.store.get_u64(PricingField::SpeedLimitPerSecond)
    }

    pub fn set_speed_limit_per_second(&mut self, limit: u64) -> Result<(), PricingError> {
        if limit == 0 {
            return Err(PricingError::invalid("speed_limit_per_second", "must be > 0"));
        }
        info!(limit, "speed limit updated");
        Ok(self.store.set_u64(PricingField::SpeedLimitPerSecond, limit)?)
    }

    pub fn per_block_gas_limit(&self) -> Result<u64, StorageError> {
        self.store.get_u64(PricingField::PerBlockGasLimit)
    }

    pub fn set_per_block_gas_limit(&mut self, limit: u64) -> Result<(), PricingError> {
        if limit == 0 {
            return Err(PricingError::invalid("per_block_gas_limit", "must be > 0"));
        }
        info!(limit, "per-block gas limit updated");
        Ok(self.store.set_u64(PricingField::PerBlockGasLimit, limit)?)
    }

    pub fn base_fee_wei(&self) -> Result<U256, StorageError> {
        self.store.get_word(PricingField::BaseFeeWei)
    }

    pub fn set_base_fee_wei(&mut self, base_fee: U256) -> Result<(), PricingError> {
        let min_base_fee = self.min_base_fee_wei()?;
        if base_fee < min_base_fee {
            return Err(PricingError::invalid(
                "base_fee_wei",
                format!("{} is below the minimum base fee {}", base_fee, min_base_fee),
            ));
        }
        Ok(self.store.set_word(PricingField::BaseFeeWei, base_fee)?)
    }

    pub fn min_base_fee_wei(&self) -> Result<U256, StorageError> {
        self.store.get_word(PricingField::MinBaseFeeWei)
    }

    // raising the floor lifts a base fee that would otherwise sit below it
    pub fn set_min_base_fee_wei(&mut self, min_base_fee: U256) -> Result<(), PricingError> {
        let base_fee = self.base_fee_wei()?;
        self.store.set_word(PricingField::MinBaseFeeWei, min_base_fee)?;
        if base_fee < min_base_fee {
            self.store.set_word(PricingField::BaseFeeWei, min_base_fee)?;
        }
        info!(min_base_fee = %min_base_fee, "minimum base fee updated");
        Ok(())
    }

    pub fn gas_backlog(&self) -> Result<u64, StorageError> {
        self.store.get_u64(PricingField::GasBacklog)
    }

    pub fn set_gas_backlog(&mut self, backlog: u64) -> Result<(), StorageError> {
        self.store.set_u64(PricingField::GasBacklog, backlog)
    }

    pub fn pricing_inertia(&self) -> Result<u64, StorageError> {
        self.store.get_u64(PricingField::PricingInertia)
    }

    pub fn set_pricing_inertia(&mut self, inertia: u64) -> Result<(), PricingError> {
        if inertia == 0 {
            return Err(PricingError::invalid("pricing_inertia", "must be > 0"));
        }
        info!(inertia, "pricing inertia updated");
        Ok(self.store.set_u64(PricingField::PricingInertia, inertia)?)
    }

    pub fn backlog_tolerance(&self) -> Result<u64, StorageError> {
        self.store.get_u64(PricingField::BacklogTolerance)
    }

    pub fn set_backlog_tolerance(&mut self, tolerance: u64) -> Result<(), PricingError> {
        info!(tolerance, "backlog tolerance updated");
        Ok(self.store.set_u64(PricingField::BacklogTolerance, tolerance)?)
    }

    pub fn gas_pool_seconds(&self) -> Result<u64, StorageError> {
        self.store.get_u64(PricingField::GasPoolSeconds)
    }

    pub fn set_gas_pool_seconds(&mut self, seconds: u64) -> Result<(), PricingError> {
        Ok(self.store.set_u64(PricingField::GasPoolSeconds, seconds)?)
    }

    pub fn rate_estimate_inertia(&self) -> Result<u64, StorageError> {
        self.store.get_u64(PricingField::RateEstimateInertia)
    }

    pub fn set_rate_estimate_inertia(&mut self, inertia: u64) -> Result<(), PricingError> {
        Ok(self.store.set_u64(PricingField::RateEstimateInertia, inertia)?)
    }

    pub fn gas_pool_target_bips(&self) -> Result<Bips, StorageError> {
        self.get_bips(PricingField::GasPoolTargetBips)
    }

    pub fn set_gas_pool_target_bips(&mut self, target: Bips) -> Result<(), PricingError> {
        let word = bips_to_word("gas_pool_target_bips", target)?;
        Ok(self.store.set_u64(PricingField::GasPoolTargetBips, word)?)
    }

    pub fn gas_pool_weight_bips(&self) -> Result<Bips, StorageError> {
        self.get_bips(PricingField::GasPoolWeightBips)
    }

    pub fn set_gas_pool_weight_bips(&mut self, weight: Bips) -> Result<(), PricingError> {
        let word = bips_to_word("gas_pool_weight_bips", weight)?;
        Ok(self.store.set_u64(PricingField::GasPoolWeightBips, word)?)
    }

    fn get_bips(&self, field: PricingField) -> Result<Bips, StorageError> {
        let raw = self.store.get_u64(field)?;
        Bips::try_from(raw).map_err(|_| StorageError::Corrupted {
            field,
            reason: format!("{} is not a valid basis-point value", raw),
        })
    }
}
