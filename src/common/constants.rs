use crate::gas::{Bips, percent_to_bips};

// gas units per second the chain sustains before the backlog grows
pub const INITIAL_SPEED_LIMIT_PER_SECOND_V0: u64 = 1_000_000;
pub const INITIAL_SPEED_LIMIT_PER_SECOND_V6: u64 = 7_000_000;
pub const INITIAL_SPEED_LIMIT_PER_SECOND_V7: u64 = 28_000_000;

// hard cap on gas per block
pub const INITIAL_PER_BLOCK_GAS_LIMIT_V0: u64 = 80_000_000;
pub const INITIAL_PER_BLOCK_GAS_LIMIT_V6: u64 = 32_000_000;
pub const INITIAL_PER_BLOCK_GAS_LIMIT_V7: u64 = 128_000_000;

pub const GWEI: u64 = 1_000_000_000;
// 0.1 gwei
pub const INITIAL_MINIMUM_BASE_FEE_WEI: u64 = GWEI / 10;
pub const INITIAL_BASE_FEE_WEI: u64 = INITIAL_MINIMUM_BASE_FEE_WEI;

pub const INITIAL_GAS_POOL_SECONDS: u64 = 10 * 60;
pub const INITIAL_RATE_ESTIMATE_INERTIA: u64 = 60;
pub const INITIAL_PRICING_INERTIA: u64 = 102;
pub const INITIAL_BACKLOG_TOLERANCE: u64 = 10; // 10 secs

pub const INITIAL_GAS_POOL_TARGET_BIPS: Bips = percent_to_bips(80);
pub const INITIAL_GAS_POOL_WEIGHT_BIPS: Bips = percent_to_bips(60);
