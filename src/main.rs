use anyhow::{Context, Result};
use l2_gas_pricing::{GasConfig, L2PricingState, MemoryStore};
use tracing::info;

// one block per second, first half congested, second half idle
const SIMULATED_BLOCKS: u64 = 120;
const BLOCK_TIME_SECS: u64 = 1;
// congested blocks consume this multiple of the speed limit
const BURST_LOAD_FACTOR: u64 = 3;

fn print_banner() {
    println!(
        "
╔═══════════════════════════════════════════════════════════╗
║                                                           ║
║               ⛽ L2 GAS PRICING SIMULATOR ⛽               ║
║                                                           ║
║           Backlog-driven exponential base fee             ║
║                                                           ║
╚═══════════════════════════════════════════════════════════╝
"
    );
}

fn load_config() -> Result<GasConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(GasConfig::default());
    };
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse config file {}", path))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    print_banner();

    let config = load_config()?;
    let mut pricing = L2PricingState::initialize(MemoryStore::new(), &config)
        .context("Failed to initialize pricing state")?;

    let burst_gas = config
        .speed_limit_per_second
        .saturating_mul(BURST_LOAD_FACTOR)
        .min(config.per_block_gas_limit);

    for block in 1..=SIMULATED_BLOCKS {
        let gas_used = if block <= SIMULATED_BLOCKS / 2 { burst_gas } else { 0 };

        pricing
            .update_pricing_model(BLOCK_TIME_SECS)
            .with_context(|| format!("Pricing update failed at block {}", block))?;
        pricing.record_gas_used(gas_used)?;

        info!(
            block,
            gas_used,
            backlog = pricing.gas_backlog()?,
            base_fee = %pricing.base_fee_wei()?,
            "block priced"
        );
    }

    let snapshot = pricing.snapshot()?;
    println!("\n✅ Final pricing state:");
    println!(
        "{}",
        serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot")?
    );

    Ok(())
}
