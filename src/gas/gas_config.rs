use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use super::{Bips, ONE_IN_BIPS, PricingError};
use crate::common::constants::*;

// protocol versions that changed the genesis throughput constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PricingVersion {
    V0,
    V6,
    #[default]
    V7,
}

impl PricingVersion {
    pub fn speed_limit_per_second(self) -> u64 {
        match self {
            PricingVersion::V0 => INITIAL_SPEED_LIMIT_PER_SECOND_V0,
            PricingVersion::V6 => INITIAL_SPEED_LIMIT_PER_SECOND_V6,
            PricingVersion::V7 => INITIAL_SPEED_LIMIT_PER_SECOND_V7,
        }
    }

    pub fn per_block_gas_limit(self) -> u64 {
        match self {
            PricingVersion::V0 => INITIAL_PER_BLOCK_GAS_LIMIT_V0,
            PricingVersion::V6 => INITIAL_PER_BLOCK_GAS_LIMIT_V6,
            PricingVersion::V7 => INITIAL_PER_BLOCK_GAS_LIMIT_V7,
        }
    }
}

// Genesis values of the pricing state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasConfig {
    pub speed_limit_per_second: u64, // Sustainable gas per second
    pub per_block_gas_limit: u64,    // Maximum gas per block
    pub min_base_fee_wei: U256,      // Price floor
    pub initial_base_fee_wei: U256,  // Price published before the first update
    pub gas_pool_seconds: u64,
    pub rate_estimate_inertia: u64,
    pub pricing_inertia: u64,   // Damping of the fee response
    pub backlog_tolerance: u64, // Seconds of backlog before the fee reacts
    pub gas_pool_target_bips: Bips,
    pub gas_pool_weight_bips: Bips,
}

impl GasConfig {
    pub fn for_version(version: PricingVersion) -> Self {
        Self {
            speed_limit_per_second: version.speed_limit_per_second(),
            per_block_gas_limit: version.per_block_gas_limit(),
            min_base_fee_wei: U256::from(INITIAL_MINIMUM_BASE_FEE_WEI),
            initial_base_fee_wei: U256::from(INITIAL_BASE_FEE_WEI),
            gas_pool_seconds: INITIAL_GAS_POOL_SECONDS,
            rate_estimate_inertia: INITIAL_RATE_ESTIMATE_INERTIA,
            pricing_inertia: INITIAL_PRICING_INERTIA,
            backlog_tolerance: INITIAL_BACKLOG_TOLERANCE,
            gas_pool_target_bips: INITIAL_GAS_POOL_TARGET_BIPS,
            gas_pool_weight_bips: INITIAL_GAS_POOL_WEIGHT_BIPS,
        }
    }

    // reject configurations that would break the pricing invariants
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.speed_limit_per_second == 0 {
            return Err(PricingError::invalid("speed_limit_per_second", "must be > 0"));
        }
        if self.per_block_gas_limit == 0 {
            return Err(PricingError::invalid("per_block_gas_limit", "must be > 0"));
        }
        if self.pricing_inertia == 0 {
            return Err(PricingError::invalid("pricing_inertia", "must be > 0"));
        }
        if self.initial_base_fee_wei < self.min_base_fee_wei {
            return Err(PricingError::invalid(
                "initial_base_fee_wei",
                format!(
                    "{} is below the minimum base fee {}",
                    self.initial_base_fee_wei, self.min_base_fee_wei
                ),
            ));
        }
        validate_bips("gas_pool_target_bips", self.gas_pool_target_bips)?;
        validate_bips("gas_pool_weight_bips", self.gas_pool_weight_bips)?;
        Ok(())
    }
}

impl Default for GasConfig {
    fn default() -> Self {
        Self::for_version(PricingVersion::default())
    }
}

pub(crate) fn validate_bips(name: &'static str, value: Bips) -> Result<(), PricingError> {
    if !(0..=ONE_IN_BIPS).contains(&value) {
        return Err(PricingError::invalid(
            name,
            format!("{} is outside 0..={}", value, ONE_IN_BIPS),
        ));
    }
    Ok(())
}
