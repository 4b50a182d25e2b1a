use alloy::primitives::U256;
use l2_gas_pricing::{
    GasConfig, L2PricingState, MemoryStore, PricingField, PricingStore, PricingVersion,
    StorageError,
};

// memory store that fails every access to one chosen field
struct FlakyStore {
    inner: MemoryStore,
    fail_reads_of: Option<PricingField>,
    fail_writes_of: Option<PricingField>,
}

impl FlakyStore {
    fn new(backlog: u64) -> Self {
        let config = GasConfig::for_version(PricingVersion::V0);
        let mut pricing = L2PricingState::initialize(MemoryStore::new(), &config).unwrap();
        pricing.set_gas_backlog(backlog).unwrap();
        Self {
            inner: pricing.into_inner(),
            fail_reads_of: None,
            fail_writes_of: None,
        }
    }
}

impl PricingStore for FlakyStore {
    fn get_word(&self, field: PricingField) -> Result<U256, StorageError> {
        if self.fail_reads_of == Some(field) {
            return Err(StorageError::Read {
                field,
                reason: "backing store unavailable".to_string(),
            });
        }
        self.inner.get_word(field)
    }

    fn set_word(&mut self, field: PricingField, value: U256) -> Result<(), StorageError> {
        if self.fail_writes_of == Some(field) {
            return Err(StorageError::Write {
                field,
                reason: "backing store unavailable".to_string(),
            });
        }
        self.inner.set_word(field, value)
    }
}

const CONGESTED_BACKLOG: u64 = 50_000_000;

#[test]
fn test_every_read_failure_aborts_update() {
    let read_fields = [
        PricingField::SpeedLimitPerSecond,
        PricingField::GasBacklog,
        PricingField::PricingInertia,
        PricingField::BacklogTolerance,
        PricingField::MinBaseFeeWei,
        PricingField::BaseFeeWei,
    ];

    for field in read_fields {
        let mut store = FlakyStore::new(CONGESTED_BACKLOG);
        let fee_before = store.inner.get_word(PricingField::BaseFeeWei).unwrap();
        store.fail_reads_of = Some(field);

        let mut pricing = L2PricingState::open(&mut store);
        let err = pricing.update_pricing_model(1).unwrap_err();

        assert_eq!(err.field(), field);
        assert!(matches!(err, StorageError::Read { .. }));
        assert_eq!(
            store.inner.get_word(PricingField::BaseFeeWei).unwrap(),
            fee_before,
            "base fee was published despite failed read of {field}"
        );
    }
}

#[test]
fn test_backlog_write_failure_aborts_update() {
    let mut store = FlakyStore::new(CONGESTED_BACKLOG);
    store.fail_writes_of = Some(PricingField::GasBacklog);

    let mut pricing = L2PricingState::open(&mut store);
    let err = pricing.update_pricing_model(1).unwrap_err();

    assert!(matches!(
        err,
        StorageError::Write { field: PricingField::GasBacklog, .. }
    ));
    assert_eq!(
        store.inner.get_u64(PricingField::GasBacklog).unwrap(),
        CONGESTED_BACKLOG
    );
    assert_eq!(
        store.inner.get_word(PricingField::BaseFeeWei).unwrap(),
        U256::from(100_000_000u64)
    );
}

#[test]
fn test_base_fee_write_failure_is_surfaced() {
    let mut store = FlakyStore::new(CONGESTED_BACKLOG);
    store.fail_writes_of = Some(PricingField::BaseFeeWei);

    let mut pricing = L2PricingState::open(&mut store);

    assert!(matches!(
        pricing.update_pricing_model(1),
        Err(StorageError::Write { field: PricingField::BaseFeeWei, .. })
    ));
}

#[test]
fn test_add_to_gas_pool_propagates_errors_unchanged() {
    let mut store = FlakyStore::new(0);
    store.fail_reads_of = Some(PricingField::GasBacklog);
    let mut pricing = L2PricingState::open(&mut store);

    let err = pricing.add_to_gas_pool(1_000).unwrap_err();
    assert_eq!(
        err,
        StorageError::Read {
            field: PricingField::GasBacklog,
            reason: "backing store unavailable".to_string(),
        }
    );
}

#[test]
fn test_initialize_surfaces_write_failure() {
    let store = FlakyStore {
        inner: MemoryStore::new(),
        fail_reads_of: None,
        fail_writes_of: Some(PricingField::PricingInertia),
    };
    let config = GasConfig::default();

    let err = L2PricingState::initialize(store, &config).err().unwrap();
    assert_eq!(
        err.to_string(),
        "Failed to write pricing_inertia: backing store unavailable"
    );
}
