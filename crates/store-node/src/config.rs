//! # Node Configuration
//!
//! Deployment and runtime parameters for a store node.
//!
//! All values have defaults suitable for a local dev chain. Anything set in
//! the environment overrides the default, and a value that is set but cannot
//! be parsed is an error rather than a silent fallback.

use shared_bus::DEFAULT_CHANNEL_CAPACITY;
use shared_types::{Address, AddressParseError};
use std::env;
use thiserror::Error;

/// First account of the local dev chain.
pub const DEV_DEPLOYER: Address = Address::new([
    0xf3, 0x9f, 0xd6, 0xe5, 0x1a, 0xad, 0x88, 0xf6, 0xf4, 0xce, 0x6a, 0xb8, 0x82, 0x72, 0x79, 0xcf,
    0xff, 0xb9, 0x22, 0x66,
]);

/// Local dev chain id.
pub const DEV_CHAIN_ID: u64 = 31337;

/// Largest accepted event bus buffer.
pub const MAX_BUS_CAPACITY: usize = 1 << 20;

/// Complete node configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Identity that deploys, and initially owns, the store.
    pub deployer: Address,
    /// Deployer's account nonce at deploy time.
    pub deployer_nonce: u64,
    /// Event bus buffer size per subscriber.
    pub bus_capacity: usize,
    /// Chain id, reported in the startup banner only.
    pub chain_id: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            deployer: DEV_DEPLOYER,
            deployer_nonce: 0,
            bus_capacity: DEFAULT_CHANNEL_CAPACITY,
            chain_id: DEV_CHAIN_ID,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `STORE_DEPLOYER` is not a 20-byte hex address.
    #[error("invalid STORE_DEPLOYER: {0}")]
    InvalidDeployer(#[from] AddressParseError),

    /// A numeric variable did not parse.
    #[error("invalid {var}: {value:?} is not a number")]
    InvalidNumber { var: &'static str, value: String },

    /// Deployer is the zero address, which can never own a store.
    #[error("deployer cannot be the zero address")]
    ZeroDeployer,

    /// Bus capacity must be at least one.
    #[error("bus capacity must be greater than zero")]
    ZeroBusCapacity,

    /// Bus capacity exceeds [`MAX_BUS_CAPACITY`].
    #[error("bus capacity {capacity} exceeds the maximum of {max}")]
    BusCapacityTooLarge { capacity: usize, max: usize },
}

impl NodeConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `STORE_DEPLOYER`: deployer address (default: dev account 0)
    /// - `STORE_DEPLOYER_NONCE`: deployer nonce (default: 0)
    /// - `STORE_BUS_CAPACITY`: event bus buffer (default: 1000)
    /// - `STORE_CHAIN_ID`: chain id (default: 31337)
    ///
    /// # Errors
    ///
    /// Returns `Err` if a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`NodeConfig::from_env`], reading from an arbitrary source.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a variable is set but malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(deployer) = lookup("STORE_DEPLOYER") {
            config.deployer = deployer.trim().parse()?;
        }
        if let Some(nonce) = lookup("STORE_DEPLOYER_NONCE") {
            config.deployer_nonce = parse_number("STORE_DEPLOYER_NONCE", &nonce)?;
        }
        if let Some(capacity) = lookup("STORE_BUS_CAPACITY") {
            config.bus_capacity = parse_number("STORE_BUS_CAPACITY", &capacity)?;
        }
        if let Some(chain_id) = lookup("STORE_CHAIN_ID") {
            config.chain_id = parse_number("STORE_CHAIN_ID", &chain_id)?;
        }

        Ok(config)
    }

    /// Validate configuration before starting.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - the deployer is the zero address
    /// - the bus capacity is zero or above [`MAX_BUS_CAPACITY`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.deployer.is_zero() {
            return Err(ConfigError::ZeroDeployer);
        }
        if self.bus_capacity == 0 {
            return Err(ConfigError::ZeroBusCapacity);
        }
        if self.bus_capacity > MAX_BUS_CAPACITY {
            return Err(ConfigError::BusCapacityTooLarge {
                capacity: self.bus_capacity,
                max: MAX_BUS_CAPACITY,
            });
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        })
}
