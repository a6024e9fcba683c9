//! Check configuration.
//!
//! Raw command line values are validated here, before any network call.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default number of blocks inspected on each side of the CIP-28 activation block.
pub const DEFAULT_BLOCK_WINDOW: u64 = 20;

/// Invalid, missing or contradictory options
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Required numeric option is zero or absent
    #[error("missing required flag --{0} (must be > 0)")]
    Missing(&'static str),

    /// Lookback values before and after the fork are equal
    #[error("bad options: --value-after & --value-before must be different")]
    SameLookbackValues,

    /// Option is not a 20 byte hex address
    #[error("{flag}: invalid address format: {value}")]
    InvalidAddress {
        /// Option name.
        flag: &'static str,
        /// Value as given.
        value: String,
    },

    /// Validator and tx fee recipient are the same address
    #[error("bad options: --txfeerecipient & --validator must be different addresses")]
    SameAddresses,
}

/// Parses the address given for option `flag`.
pub fn parse_address(flag: &'static str, value: &str) -> Result<Address, ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Missing(flag));
    }
    Address::from_str(value)
        .map_err(|_| ConfigError::InvalidAddress { flag, value: value.to_string() })
}

const fn require_positive(flag: &'static str, value: u64) -> Result<u64, ConfigError> {
    if value == 0 { Err(ConfigError::Missing(flag)) } else { Ok(value) }
}

/// CIP-21 (governable lookback window) check configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cip21Config {
    /// Hard fork activation block
    pub activation_block: u64,

    /// Epoch length in blocks
    pub epoch_size: u64,

    /// Lookback window expected before the hard fork
    pub value_before: u64,

    /// Lookback window expected from the first epoch after the hard fork
    pub value_after: u64,
}

impl Cip21Config {
    /// Validates and builds the configuration.
    pub fn new(
        activation_block: u64,
        epoch_size: u64,
        value_before: u64,
        value_after: u64,
    ) -> Result<Self, ConfigError> {
        let config = Self { activation_block, epoch_size, value_before, value_after };
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is set and the two lookback values differ.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("activationblock", self.activation_block)?;
        require_positive("epoch", self.epoch_size)?;
        require_positive("value-before", self.value_before)?;
        require_positive("value-after", self.value_after)?;
        if self.value_before == self.value_after {
            return Err(ConfigError::SameLookbackValues);
        }
        Ok(())
    }
}

/// CIP-28 (split etherbase) check configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cip28Config {
    /// Hard fork activation block
    pub activation_block: u64,

    /// Blocks to inspect before and after activation (default: 20)
    pub window: u64,

    /// Validator whose blocks are inspected
    pub validator: Address,

    /// Coinbase the validator is expected to use after activation
    pub tx_fee_recipient: Address,
}

impl Cip28Config {
    /// Validates and builds the configuration with the default window.
    pub fn new(
        activation_block: u64,
        validator: Address,
        tx_fee_recipient: Address,
    ) -> Result<Self, ConfigError> {
        require_positive("activationblock", activation_block)?;
        if validator == tx_fee_recipient {
            return Err(ConfigError::SameAddresses);
        }
        Ok(Self { activation_block, window: DEFAULT_BLOCK_WINDOW, validator, tx_fee_recipient })
    }

    /// Builds the configuration from raw option values.
    pub fn from_args(
        activation_block: u64,
        window: u64,
        validator: &str,
        tx_fee_recipient: &str,
    ) -> Result<Self, ConfigError> {
        require_positive("activationblock", activation_block)?;
        let validator = parse_address("validator", validator)?;
        let tx_fee_recipient = parse_address("txfeerecipient", tx_fee_recipient)?;
        Ok(Self::new(activation_block, validator, tx_fee_recipient)?.with_window(window))
    }

    /// Set window
    pub const fn with_window(mut self, window: u64) -> Self {
        self.window = window;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALIDATOR: &str = "0x0000000000000000000000000000000000000001";
    const RECIPIENT: &str = "0x0000000000000000000000000000000000000002";

    #[test]
    fn test_cip21_config() {
        let config = Cip21Config::new(250, 100, 5, 10).unwrap();
        assert_eq!(config.activation_block, 250);
        assert_eq!(config.epoch_size, 100);
    }

    #[test]
    fn test_cip21_missing_values() {
        assert_eq!(Cip21Config::new(0, 100, 5, 10), Err(ConfigError::Missing("activationblock")));
        assert_eq!(Cip21Config::new(250, 0, 5, 10), Err(ConfigError::Missing("epoch")));
        assert_eq!(Cip21Config::new(250, 100, 0, 10), Err(ConfigError::Missing("value-before")));
        assert_eq!(Cip21Config::new(250, 100, 5, 0), Err(ConfigError::Missing("value-after")));
    }

    #[test]
    fn test_cip21_same_values_rejected() {
        assert_eq!(Cip21Config::new(250, 100, 5, 5), Err(ConfigError::SameLookbackValues));
    }

    #[test]
    fn test_cip28_config() {
        let config = Cip28Config::from_args(1000, 20, VALIDATOR, RECIPIENT).unwrap();
        assert_eq!(config.validator, Address::with_last_byte(1));
        assert_eq!(config.tx_fee_recipient, Address::with_last_byte(2));
        assert_eq!(config.window, 20);

        let unprefixed = Cip28Config::from_args(1000, 5, &VALIDATOR[2..], RECIPIENT).unwrap();
        assert_eq!(unprefixed.validator, config.validator);
        assert_eq!(unprefixed.window, 5);
    }

    #[test]
    fn test_cip28_invalid_options() {
        assert_eq!(
            Cip28Config::from_args(0, 20, VALIDATOR, RECIPIENT),
            Err(ConfigError::Missing("activationblock"))
        );
        assert_eq!(
            Cip28Config::from_args(1000, 20, "", RECIPIENT),
            Err(ConfigError::Missing("validator"))
        );
        assert_eq!(
            Cip28Config::from_args(1000, 20, VALIDATOR, "0x1234"),
            Err(ConfigError::InvalidAddress { flag: "txfeerecipient", value: "0x1234".to_string() })
        );
        assert_eq!(
            Cip28Config::from_args(1000, 20, VALIDATOR, VALIDATOR),
            Err(ConfigError::SameAddresses)
        );
    }

    #[test]
    fn test_config_serde() {
        let config = Cip28Config::from_args(1000, 20, VALIDATOR, RECIPIENT).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<Cip28Config>(&json).unwrap(), config);
    }
}
