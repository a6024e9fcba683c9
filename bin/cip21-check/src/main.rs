//! CIP-21 hard-fork checker
//!
//! Verifies that a node's lookback window keeps its old value through the
//! epoch in which the fork activates and switches at the next epoch.
//!
//! ## Usage
//!
//! ```bash
//! cip21-check --rpc http://localhost:8545 --activationblock 250 --epoch 100 \
//!     --value-before 5 --value-after 10
//! ```

use clap::Parser;
use donut_checks::{run_cip21, Cip21Config, ConfigError};
use donut_cli::{exit_with_usage, init_tracing, parse_args, RpcArgs};
use donut_rpc::HttpClient;
use eyre::WrapErr;
use tracing::info;

/// CIP-21 (governable lookback window) hard-fork checker
#[derive(Debug, Parser)]
#[command(name = "cip21-check", version)]
#[command(about = "Verify the CIP-21 governable lookback window hard fork")]
struct Cli {
    #[command(flatten)]
    rpc: RpcArgs,

    /// Activation block number for the hardfork
    #[arg(long = "activationblock", value_name = "BLOCK")]
    activation_block: Option<u64>,

    /// Epoch size
    #[arg(long = "epoch", value_name = "BLOCKS")]
    epoch_size: Option<u64>,

    /// Lookback window value before the hardfork
    #[arg(long = "value-before", value_name = "VALUE")]
    value_before: Option<u64>,

    /// Lookback window value after the hardfork
    #[arg(long = "value-after", value_name = "VALUE")]
    value_after: Option<u64>,
}

impl Cli {
    fn config(&self) -> Result<Cip21Config, ConfigError> {
        Cip21Config::new(
            self.activation_block.unwrap_or_default(),
            self.epoch_size.unwrap_or_default(),
            self.value_before.unwrap_or_default(),
            self.value_after.unwrap_or_default(),
        )
    }
}

fn main() -> eyre::Result<()> {
    let cli: Cli = parse_args();
    init_tracing();

    let config = cli.config().unwrap_or_else(|err| exit_with_usage::<Cli>(err));

    let client = HttpClient::new(cli.rpc.url.clone()).wrap_err_with(|| {
        format!("Can't open connection to blockchain node. url={}", cli.rpc.url)
    })?;

    info!("Testing for CIP-21: Governable LookbackWindow");
    let report = run_cip21(&client, &config).wrap_err("Test Failed")?;

    info!(
        activation_epoch = report.samples.activation_epoch,
        first_block_after = report.samples.first_block_after,
        "Test Passed"
    );
    println!(
        "CIP-21 OK: lookbackWindow is {} up to block {} and {} from block {}",
        config.value_before,
        report.samples.last_block_activation,
        config.value_after,
        report.samples.first_block_after,
    );
    Ok(())
}
