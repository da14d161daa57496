//! Per-chain connection and account registry.
//!
//! Resolves a chain id to its RPC endpoint and the contract accounts
//! configured for it, building each [`ChainContext`] once and sharing it
//! afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use alloy::{primitives::Address, providers::DynProvider};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{
    config::{ChainConfig, Config},
    error::{AppError, Result},
    ethereum::{Chain, EthereumClient, WalletManager},
};

// ============================================================================
// Chain Context
// ============================================================================

/// A contract together with the account that calls it.
#[derive(Debug, Clone)]
pub struct ContractAccount {
    /// Address of the contract.
    pub contract_address: Address,
    /// Caller account.
    pub wallet: WalletManager,
    /// Provider that signs with `wallet`.
    pub provider: DynProvider,
}

impl ContractAccount {
    fn new(
        client: &EthereumClient,
        private_key: &str,
        contract_address: &str,
        name: &str,
    ) -> Result<Self> {
        let wallet = WalletManager::from_private_key(private_key)?;
        let contract_address = contract_address.trim().parse::<Address>().map_err(|e| {
            AppError::InvalidAddress(format!("{name} address '{contract_address}': {e}"))
        })?;
        let provider = client.signer_provider(&wallet);

        Ok(Self { contract_address, wallet, provider })
    }

    /// Build the account only when both the key and the address are set.
    fn optional(
        client: &EthereumClient,
        enabled: bool,
        private_key: &str,
        contract_address: &str,
        name: &str,
    ) -> Result<Option<Self>> {
        if !enabled || private_key.trim().is_empty() || contract_address.trim().is_empty() {
            return Ok(None);
        }
        Self::new(client, private_key, contract_address, name).map(Some)
    }
}

/// Everything needed to talk to the contracts on one chain.
#[derive(Debug)]
pub struct ChainContext {
    /// The chain.
    pub chain: Chain,
    /// Read-only client.
    pub client: EthereumClient,
    /// Wallet approver service and its caller. Always configured.
    pub wallet_approver: ContractAccount,
    /// Faucet service and its caller, when enabled and configured.
    pub faucet: Option<ContractAccount>,
    /// Auto-invest service and its caller, when enabled and configured.
    pub auto_invest: Option<ContractAccount>,
}

impl ChainContext {
    /// Faucet account or a `ChainConfigMissing` error.
    pub fn require_faucet(&self) -> Result<&ContractAccount> {
        self.faucet.as_ref().ok_or_else(|| {
            AppError::ChainConfigMissing(format!("faucet service on chain {}", self.chain.id()))
        })
    }

    /// Auto-invest account or a `ChainConfigMissing` error.
    pub fn require_auto_invest(&self) -> Result<&ContractAccount> {
        self.auto_invest.as_ref().ok_or_else(|| {
            AppError::ChainConfigMissing(format!(
                "auto invest service on chain {}",
                self.chain.id()
            ))
        })
    }
}

// ============================================================================
// Chain Registry
// ============================================================================

/// Lazily built, cached [`ChainContext`]s keyed by chain id.
pub struct ChainRegistry {
    config: Arc<Config>,
    contexts: RwLock<HashMap<u64, Arc<ChainContext>>>,
}

impl ChainRegistry {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config, contexts: RwLock::new(HashMap::new()) }
    }

    /// Resolve a chain id.
    pub fn chain(&self, chain_id: u64) -> Result<Chain> {
        Chain::from_id(chain_id).ok_or(AppError::UnsupportedChain(chain_id))
    }

    /// RPC endpoint for `chain`: Infura when an Infura id is configured and
    /// the chain is served by Infura, the public endpoint otherwise.
    pub fn rpc_url(&self, chain: Chain) -> String {
        let infura_id = self.config.infura_id.trim();
        match chain.infura() {
            Some(base) if !infura_id.is_empty() => format!("{base}{infura_id}"),
            _ => chain.rpc_url().to_string(),
        }
    }

    /// Gas station feed for the chain, if it has one.
    pub fn gas_price_feed(&self, chain_id: u64) -> Result<Option<&'static str>> {
        Ok(self.chain(chain_id)?.gas_price_feed())
    }

    /// Context for `chain_id`, built on first use.
    pub async fn context(&self, chain_id: u64) -> Result<Arc<ChainContext>> {
        let chain = self.chain(chain_id)?;

        if let Some(context) = self.contexts.read().await.get(&chain_id) {
            return Ok(context.clone());
        }

        let mut contexts = self.contexts.write().await;

        // Another task may have built it while we waited for the lock
        if let Some(context) = contexts.get(&chain_id) {
            return Ok(context.clone());
        }

        let context = Arc::new(self.build_context(chain)?);
        contexts.insert(chain_id, context.clone());
        Ok(context)
    }

    fn build_context(&self, chain: Chain) -> Result<ChainContext> {
        let empty = ChainConfig::default();
        let accounts = self.config.chain(chain).unwrap_or(&empty);

        if accounts.wallet_approver_private_key.trim().is_empty()
            || accounts.wallet_approver_address.trim().is_empty()
        {
            return Err(AppError::ChainConfigMissing(format!(
                "wallet approver on chain {}",
                chain.id()
            )));
        }

        let rpc_url = self.rpc_url(chain);
        let client = EthereumClient::new(&rpc_url)?;

        let wallet_approver = ContractAccount::new(
            &client,
            &accounts.wallet_approver_private_key,
            &accounts.wallet_approver_address,
            "wallet approver",
        )?;

        let faucet = ContractAccount::optional(
            &client,
            self.config.faucet.enabled,
            &accounts.faucet_caller_private_key,
            &accounts.faucet_address,
            "faucet",
        )?;

        let auto_invest = ContractAccount::optional(
            &client,
            self.config.auto_invest.enabled,
            &accounts.auto_invest_private_key,
            &accounts.auto_invest_address,
            "auto invest",
        )?;

        debug!(
            chain = %chain,
            wallet_approver = %wallet_approver.wallet.address(),
            faucet = faucet.is_some(),
            auto_invest = auto_invest.is_some(),
            "Chain accounts loaded"
        );
        info!(chain = %chain, chain_id = chain.id(), "Chain context initialized");

        Ok(ChainContext { chain, client, wallet_approver, faucet, auto_invest })
    }
}
