//! CIP-28 hard-fork checker
//!
//! Verifies that a validator's blocks pay fees to its own signing address
//! before the fork, and to its configured tx fee recipient from the
//! activation block on.
//!
//! ## Usage
//!
//! ```bash
//! cip28-check --rpc http://localhost:8545 --activationblock 1000 \
//!     --validator 0x... --txfeerecipient 0x... --window 20
//! ```

use clap::Parser;
use donut_checks::{run_cip28, Cip28Config, ConfigError, DEFAULT_BLOCK_WINDOW};
use donut_cli::{exit_with_usage, init_tracing, parse_args, RpcArgs};
use donut_consensus_istanbul::EcRecover;
use donut_rpc::HttpClient;
use eyre::WrapErr;
use tracing::info;

/// CIP-28 (split etherbase) hard-fork checker
#[derive(Debug, Parser)]
#[command(name = "cip28-check", version)]
#[command(about = "Verify the CIP-28 split etherbase hard fork")]
struct Cli {
    #[command(flatten)]
    rpc: RpcArgs,

    /// Activation block number for the etherbase split hardfork
    #[arg(long = "activationblock", value_name = "BLOCK")]
    activation_block: Option<u64>,

    /// Number of blocks to inspect (before & after)
    #[arg(long, value_name = "BLOCKS", default_value_t = DEFAULT_BLOCK_WINDOW)]
    window: u64,

    /// Validator address
    #[arg(long, value_name = "ADDRESS")]
    validator: Option<String>,

    /// Tx fee recipient address
    #[arg(long = "txfeerecipient", value_name = "ADDRESS")]
    tx_fee_recipient: Option<String>,
}

impl Cli {
    fn config(&self) -> Result<Cip28Config, ConfigError> {
        Cip28Config::from_args(
            self.activation_block.unwrap_or_default(),
            self.window,
            self.validator.as_deref().unwrap_or_default(),
            self.tx_fee_recipient.as_deref().unwrap_or_default(),
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

    info!("Testing for CIP-28: Split Etherbase");
    let report = run_cip28(&client, &EcRecover, &config).wrap_err("Test Failed")?;

    info!(
        before = report.before.authored.len(),
        after = report.after.authored.len(),
        "Test Passed"
    );
    println!(
        "CIP-28 OK: {} blocks by {} in {} paid the validator, {} blocks in {} paid {}",
        report.before.authored.len(),
        config.validator,
        report.before.range,
        report.after.authored.len(),
        report.after.range,
        config.tx_fee_recipient,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use donut_cli::normalize_legacy_flags;

    const VALIDATOR: &str = "0x00000000000000000000000000000000000000aa";
    const RECIPIENT: &str = "0x00000000000000000000000000000000000000bb";

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(normalize_legacy_flags(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_go_style_flags() {
        let cli = parse(&[
            "cip28-check",
            "-activationblock",
            "1000",
            "-validator",
            VALIDATOR,
            "-txfeerecipient",
            RECIPIENT,
        ]);
        let config = cli.config().unwrap();
        assert_eq!(config.activation_block, 1000);
        assert_eq!(config.window, DEFAULT_BLOCK_WINDOW);
        assert_eq!(config.validator.to_string().to_lowercase(), VALIDATOR);
    }

    #[test]
    fn test_window_override() {
        let cli = parse(&[
            "cip28-check",
            "--activationblock",
            "1000",
            "--window",
            "5",
            "--validator",
            VALIDATOR,
            "--txfeerecipient",
            RECIPIENT,
        ]);
        assert_eq!(cli.config().unwrap().window, 5);
    }

    #[test]
    fn test_invalid_options() {
        let cli = parse(&["cip28-check", "--activationblock", "1000", "--txfeerecipient", RECIPIENT]);
        assert_eq!(cli.config(), Err(ConfigError::Missing("validator")));

        let cli = parse(&[
            "cip28-check",
            "--activationblock",
            "1000",
            "--validator",
            "0xnothex",
            "--txfeerecipient",
            RECIPIENT,
        ]);
        assert!(matches!(cli.config(), Err(ConfigError::InvalidAddress { flag: "validator", .. })));

        let cli = parse(&[
            "cip28-check",
            "--activationblock",
            "1000",
            "--validator",
            VALIDATOR,
            "--txfeerecipient",
            VALIDATOR,
        ]);
        assert_eq!(cli.config(), Err(ConfigError::SameAddresses));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
