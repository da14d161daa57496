//! Configuration management module.
//!
//! Handles loading configuration from environment variables.

use std::collections::HashMap;
use std::env;

use crate::error::AppError;
use crate::ethereum::chain::Chain;

/// Default gas limit for wallet approval transactions.
pub const DEFAULT_WALLET_APPROVE_GAS_LIMIT: u64 = 200_000;

/// Default gas limit for faucet transactions.
pub const DEFAULT_FAUCET_GAS_LIMIT: u64 = 200_000;

/// Default gas limit for auto-invest transactions.
pub const DEFAULT_AUTO_INVEST_GAS_LIMIT: u64 = 2_000_000;

/// Toggle and gas limit for an optional contract feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureConfig {
    /// Whether the feature may be used on any chain.
    pub enabled: bool,
    /// Gas limit for the feature's transactions.
    pub gas_limit: u64,
}

/// Accounts and contract addresses configured for one chain.
///
/// Blank values mean "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainConfig {
    pub wallet_approver_private_key: String,
    pub wallet_approver_address: String,
    pub faucet_caller_private_key: String,
    pub faucet_address: String,
    pub auto_invest_private_key: String,
    pub auto_invest_address: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Logging level (default: info).
    pub log_level: String,
    /// Infura project id; public RPC endpoints are used when blank.
    pub infura_id: String,
    /// Gas limit for `approveWallets` transactions.
    pub wallet_approve_gas_limit: u64,
    /// Faucet feature settings.
    pub faucet: FeatureConfig,
    /// Auto-invest feature settings.
    pub auto_invest: FeatureConfig,
    /// Per-chain accounts.
    pub chains: HashMap<Chain, ChainConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            infura_id: String::new(),
            wallet_approve_gas_limit: DEFAULT_WALLET_APPROVE_GAS_LIMIT,
            faucet: FeatureConfig { enabled: true, gas_limit: DEFAULT_FAUCET_GAS_LIMIT },
            auto_invest: FeatureConfig { enabled: true, gas_limit: DEFAULT_AUTO_INVEST_GAS_LIMIT },
            chains: HashMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `LOG_LEVEL`: Logging level (default: info)
    /// - `INFURA_ID`: Infura project id
    /// - `WALLET_APPROVE_GAS_LIMIT`, `FAUCET_GAS_LIMIT`, `AUTO_INVEST_GAS_LIMIT`
    /// - `FAUCET_ENABLED`, `AUTO_INVEST_ENABLED` (default: true)
    ///
    /// Per chain, with `<PREFIX>` one of `CHAIN_MATIC`, `CHAIN_MUMBAI`,
    /// `CHAIN_ETHEREUM`, `CHAIN_HARDHAT`:
    /// - `<PREFIX>_WALLET_APPROVER_PRIVATE_KEY`, `<PREFIX>_WALLET_APPROVER_ADDRESS`
    /// - `<PREFIX>_FAUCET_CALLER_PRIVATE_KEY`, `<PREFIX>_FAUCET_ADDRESS`
    /// - `<PREFIX>_AUTO_INVEST_PRIVATE_KEY`, `<PREFIX>_AUTO_INVEST_ADDRESS`
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_level = lookup("LOG_LEVEL").unwrap_or(defaults.log_level);
        let infura_id = lookup("INFURA_ID").unwrap_or_default();

        let wallet_approve_gas_limit = parse_u64(&lookup, "WALLET_APPROVE_GAS_LIMIT")?
            .unwrap_or(defaults.wallet_approve_gas_limit);

        let faucet = FeatureConfig {
            enabled: parse_flag(&lookup, "FAUCET_ENABLED")?.unwrap_or(defaults.faucet.enabled),
            gas_limit: parse_u64(&lookup, "FAUCET_GAS_LIMIT")?.unwrap_or(defaults.faucet.gas_limit),
        };

        let auto_invest = FeatureConfig {
            enabled: parse_flag(&lookup, "AUTO_INVEST_ENABLED")?
                .unwrap_or(defaults.auto_invest.enabled),
            gas_limit: parse_u64(&lookup, "AUTO_INVEST_GAS_LIMIT")?
                .unwrap_or(defaults.auto_invest.gas_limit),
        };

        let chains = Chain::ALL
            .into_iter()
            .map(|chain| {
                let var = |suffix: &str| {
                    lookup(&format!("{}_{}", chain.env_prefix(), suffix)).unwrap_or_default()
                };
                let config = ChainConfig {
                    wallet_approver_private_key: var("WALLET_APPROVER_PRIVATE_KEY"),
                    wallet_approver_address: var("WALLET_APPROVER_ADDRESS"),
                    faucet_caller_private_key: var("FAUCET_CALLER_PRIVATE_KEY"),
                    faucet_address: var("FAUCET_ADDRESS"),
                    auto_invest_private_key: var("AUTO_INVEST_PRIVATE_KEY"),
                    auto_invest_address: var("AUTO_INVEST_ADDRESS"),
                };
                (chain, config)
            })
            .collect();

        Ok(Self { log_level, infura_id, wallet_approve_gas_limit, faucet, auto_invest, chains })
    }

    /// Accounts configured for a chain, if any.
    pub fn chain(&self, chain: Chain) -> Option<&ChainConfig> {
        self.chains.get(&chain)
    }
}

fn parse_u64<F>(lookup: &F, key: &str) -> Result<Option<u64>, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .map_err(|e| AppError::Config(format!("{key} must be an unsigned integer: {e}")))
        })
        .transpose()
}

fn parse_flag<F>(lookup: &F, key: &str) -> Result<Option<bool>, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .map(|value| match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(AppError::Config(format!("{key} must be a boolean, got '{other}'"))),
        })
        .transpose()
}
