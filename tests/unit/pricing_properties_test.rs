use alloy::primitives::U256;
use l2_gas_pricing::gas::approx_exp_basis_points;
use l2_gas_pricing::{GasConfig, L2PricingState, MemoryStore, PricingVersion, compute_base_fee};
use proptest::prelude::*;

const MIN_BASE_FEE: u64 = 100_000_000;

fn pricing_with_backlog(backlog: u64) -> L2PricingState<MemoryStore> {
    let config = GasConfig::for_version(PricingVersion::V0);
    let mut pricing = L2PricingState::initialize(MemoryStore::new(), &config).unwrap();
    pricing.set_gas_backlog(backlog).unwrap();
    pricing
}

proptest! {
    #[test]
    fn floor_price_within_tolerance(
        speed_limit in 1u64..100_000_000,
        tolerance in 0u64..1_000,
        inertia in 1u64..10_000,
        fraction in 0u64..=1_000,
    ) {
        let threshold = speed_limit * tolerance;
        let backlog = threshold / 1_000 * fraction;
        let min_fee = U256::from(MIN_BASE_FEE);

        prop_assert_eq!(compute_base_fee(backlog, speed_limit, inertia, tolerance, min_fee), min_fee);
    }

    #[test]
    fn fee_never_below_floor(
        backlog in any::<u64>(),
        speed_limit in 1u64..1_000_000_000,
        tolerance in 0u64..10_000,
        inertia in 1u64..100_000,
        limbs in any::<[u64; 4]>(),
    ) {
        let min_fee = U256::from_limbs(limbs);
        prop_assert!(compute_base_fee(backlog, speed_limit, inertia, tolerance, min_fee) >= min_fee);
    }

    #[test]
    fn fee_is_monotonic_in_backlog(
        a in any::<u64>(),
        b in any::<u64>(),
        speed_limit in 1u64..1_000_000_000,
        tolerance in 0u64..10_000,
        inertia in 1u64..100_000,
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let min_fee = U256::from(MIN_BASE_FEE);

        prop_assert!(
            compute_base_fee(low, speed_limit, inertia, tolerance, min_fee)
                <= compute_base_fee(high, speed_limit, inertia, tolerance, min_fee)
        );
    }

    #[test]
    fn exp_is_monotonic(a in any::<i64>(), b in any::<i64>()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(approx_exp_basis_points(low) <= approx_exp_basis_points(high));
    }

    #[test]
    fn backlog_never_goes_negative(deltas in prop::collection::vec(any::<i64>(), 1..64)) {
        let mut pricing = pricing_with_backlog(0);
        let mut expected: i128 = 0;

        for delta in deltas {
            pricing.add_to_gas_pool(delta).unwrap();
            expected = (expected + i128::from(delta)).clamp(0, i128::from(u64::MAX));
            prop_assert_eq!(i128::from(pricing.gas_backlog().unwrap()), expected);
        }
    }

    #[test]
    fn zero_time_update_keeps_backlog(backlog in any::<u64>()) {
        let mut pricing = pricing_with_backlog(backlog);

        let base_fee = pricing.update_pricing_model(0).unwrap();

        prop_assert_eq!(pricing.gas_backlog().unwrap(), backlog);
        prop_assert_eq!(base_fee, compute_base_fee(backlog, 1_000_000, 102, 10, U256::from(MIN_BASE_FEE)));
    }

    #[test]
    fn update_is_deterministic(gas in prop::collection::vec(0u64..200_000_000, 1..32)) {
        let mut first = pricing_with_backlog(0);
        let mut second = pricing_with_backlog(0);

        for used in gas {
            first.record_gas_used(used).unwrap();
            second.record_gas_used(used).unwrap();
            prop_assert_eq!(first.update_pricing_model(1).unwrap(), second.update_pricing_model(1).unwrap());
        }
        prop_assert_eq!(first.snapshot().unwrap(), second.snapshot().unwrap());
    }
}
