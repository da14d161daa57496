//! Contract operations across chains.
//!
//! [`BlockchainService`] is what the MCP layer talks to. The production
//! implementation resolves the chain's context, picks a gas price and loads
//! the right binding for every call.

use std::sync::Arc;

use alloy::{
    hex,
    primitives::{eip191_hash_message, keccak256, Address, Bytes, TxHash, B256},
};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::{
    config::Config,
    error::{AppError, Result},
    ethereum::contracts::{
        Erc1271, FaucetService, GasProvider, InvestService, InvestmentRecord,
        InvestmentRecordStatus, IssuerCommon, IssuerCommonState, PendingInvestmentRecord,
        Versioned, WalletApprover,
    },
    services::{chain_registry::ChainRegistry, gas_price::GasPriceService},
    types::ContractVersion,
};

/// Lowest campaign version whose investments can be executed by the auto-invest service.
pub const MIN_AUTO_INVEST_VERSION: &str = "1.0.20";

/// Signed payload marking a message pre-approved by a contract wallet.
pub const PRE_APPROVED_SIGNATURE: &str = "0x";

/// Arguments of `getPendingFor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingInvestmentsQuery {
    pub user: Address,
    pub issuer: Address,
    pub campaign_factories: Vec<Address>,
    pub query_service: Address,
    pub name_registry: Address,
}

/// Hash a contract wallet is asked to validate for `payload`.
///
/// A pre-approved message (`signed_payload == "0x"`) is checked against its
/// EIP-191 personal message hash, anything else against `keccak256(payload)`.
pub fn signature_message_hash(payload: &str, signed_payload: &str) -> B256 {
    if signed_payload == PRE_APPROVED_SIGNATURE {
        eip191_hash_message(payload.as_bytes())
    } else {
        keccak256(payload.as_bytes())
    }
}

/// Signature bytes of a hex `signed_payload`.
///
/// The `0x` prefix is optional and an odd number of digits is read as if
/// it had a leading zero.
pub fn decode_signed_payload(signed_payload: &str) -> Result<Bytes> {
    let digits = signed_payload
        .strip_prefix("0x")
        .or_else(|| signed_payload.strip_prefix("0X"))
        .unwrap_or(signed_payload);

    let bytes = if digits.len() % 2 == 1 {
        hex::decode(format!("0{digits}"))?
    } else {
        hex::decode(digits)?
    };
    Ok(Bytes::from(bytes))
}

/// Contract operations exposed to the outer layers.
#[async_trait]
pub trait BlockchainService: Send + Sync {
    /// Whitelist `addresses` on `issuer` through the chain's wallet approver.
    async fn whitelist_addresses(
        &self,
        addresses: Vec<Address>,
        issuer: Address,
        chain_id: u64,
    ) -> Result<TxHash>;

    /// Whether the transaction has a receipt.
    async fn is_mined(&self, hash: TxHash, chain_id: u64) -> Result<bool>;

    /// Whether `address` is whitelisted on `issuer`. `false` without an issuer.
    async fn is_whitelisted(
        &self,
        address: Address,
        issuer: Option<Address>,
        chain_id: u64,
    ) -> Result<bool>;

    /// Send faucet funds to `addresses`.
    async fn send_faucet_funds(&self, addresses: Vec<Address>, chain_id: u64) -> Result<TxHash>;

    /// Auto-invest readiness of each record.
    async fn get_auto_invest_status(
        &self,
        records: Vec<InvestmentRecord>,
        chain_id: u64,
    ) -> Result<Vec<InvestmentRecordStatus>>;

    /// Execute the investments on behalf of their investors.
    async fn auto_invest_for(
        &self,
        records: Vec<InvestmentRecordStatus>,
        chain_id: u64,
    ) -> Result<TxHash>;

    /// Investments a user approved but has not executed yet.
    async fn get_pending_investments(
        &self,
        query: PendingInvestmentsQuery,
        chain_id: u64,
    ) -> Result<Vec<PendingInvestmentRecord>>;

    /// Common state of an issuer.
    async fn get_issuer_state(&self, issuer: Address, chain_id: u64)
        -> Result<IssuerCommonState>;

    /// Version reported by a versioned contract.
    async fn get_contract_version(&self, address: Address, chain_id: u64)
        -> Result<ContractVersion>;

    /// Fail with `UnsupportedVersion` unless the campaign supports auto-invest.
    async fn ensure_auto_invest_supported(&self, campaign: Address, chain_id: u64) -> Result<()> {
        let version = self.get_contract_version(campaign, chain_id).await?;
        let minimum = ContractVersion::new(MIN_AUTO_INVEST_VERSION);
        if version < minimum {
            return Err(AppError::UnsupportedVersion(format!(
                "campaign {campaign} is at {version}, auto invest needs {minimum}"
            )));
        }
        Ok(())
    }

    /// ERC-1271 check of `signature` over `hash` by the contract at `address`.
    async fn is_signature_valid(
        &self,
        address: Address,
        hash: B256,
        signature: Bytes,
        chain_id: u64,
    ) -> Result<bool>;

    /// Verify a contract wallet signature over `payload`.
    async fn verify_contract_signature(
        &self,
        address: Address,
        payload: &str,
        signed_payload: &str,
        chain_id: u64,
    ) -> Result<bool> {
        let hash = signature_message_hash(payload, signed_payload);
        let signature = decode_signed_payload(signed_payload)?;
        self.is_signature_valid(address, hash, signature, chain_id).await
    }
}

/// [`BlockchainService`] backed by the configured chains.
pub struct ChainBlockchainService {
    registry: ChainRegistry,
    gas_prices: GasPriceService,
    config: Arc<Config>,
}

impl ChainBlockchainService {
    /// No network access until the first call.
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);
        Ok(Self {
            registry: ChainRegistry::new(config.clone()),
            gas_prices: GasPriceService::new()?,
            config,
        })
    }

    /// The chain registry.
    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }
}

#[async_trait]
impl BlockchainService for ChainBlockchainService {
    async fn whitelist_addresses(
        &self,
        addresses: Vec<Address>,
        issuer: Address,
        chain_id: u64,
    ) -> Result<TxHash> {
        info!(?addresses, issuer = %issuer, chain_id, "Whitelisting addresses");

        let context = self.registry.context(chain_id).await?;
        let gas_price = self
            .gas_prices
            .get_gas_price(self.registry.gas_price_feed(chain_id)?, &context.client, false)
            .await?;
        debug!(gas_price, "Gas price");

        let account = &context.wallet_approver;
        let approver = WalletApprover::load(
            account.contract_address,
            account.provider.clone(),
            GasProvider::fixed(gas_price, self.config.wallet_approve_gas_limit),
        );

        let hash = approver.approve_wallets(issuer, addresses).await?;
        info!(tx_hash = %hash, issuer = %issuer, chain_id, "Sent request to whitelist addresses");
        Ok(hash)
    }

    async fn is_mined(&self, hash: TxHash, chain_id: u64) -> Result<bool> {
        let context = self.registry.context(chain_id).await?;
        context.client.is_mined(hash).await
    }

    async fn is_whitelisted(
        &self,
        address: Address,
        issuer: Option<Address>,
        chain_id: u64,
    ) -> Result<bool> {
        let Some(issuer) = issuer else {
            return Ok(false);
        };

        let context = self.registry.context(chain_id).await?;
        let contract = IssuerCommon::load(issuer, context.client.provider().clone());
        contract.is_wallet_approved(address).await
    }

    async fn send_faucet_funds(&self, addresses: Vec<Address>, chain_id: u64) -> Result<TxHash> {
        info!(?addresses, chain_id, "Sending faucet funds");

        let context = self.registry.context(chain_id).await?;
        let account = context.require_faucet()?;

        let gas_price = self
            .gas_prices
            .get_gas_price(self.registry.gas_price_feed(chain_id)?, &context.client, true)
            .await?;
        debug!(gas_price, "Gas price");

        let faucet = FaucetService::load(
            account.contract_address,
            account.provider.clone(),
            GasProvider::fixed(gas_price, self.config.faucet.gas_limit),
        );

        let hash = faucet.faucet(addresses).await?;
        info!(tx_hash = %hash, chain_id, "Sent request to fund addresses");
        Ok(hash)
    }

    async fn get_auto_invest_status(
        &self,
        records: Vec<InvestmentRecord>,
        chain_id: u64,
    ) -> Result<Vec<InvestmentRecordStatus>> {
        let context = self.registry.context(chain_id).await?;
        let account = context.require_auto_invest()?;

        let service = InvestService::load(
            account.contract_address,
            context.client.provider().clone(),
            GasProvider::default(),
        );

        let statuses = service.get_status(records).await?;
        debug!(
            count = statuses.len(),
            ready = statuses.iter().filter(|status| status.readyToInvest).count(),
            "Received auto-invest statuses"
        );
        Ok(statuses)
    }

    async fn auto_invest_for(
        &self,
        records: Vec<InvestmentRecordStatus>,
        chain_id: u64,
    ) -> Result<TxHash> {
        info!(count = records.len(), chain_id, "Auto-investing");

        let context = self.registry.context(chain_id).await?;
        let account = context.require_auto_invest()?;

        let gas_price = self
            .gas_prices
            .get_gas_price(self.registry.gas_price_feed(chain_id)?, &context.client, false)
            .await?;
        debug!(gas_price, "Gas price");

        let service = InvestService::load(
            account.contract_address,
            account.provider.clone(),
            GasProvider::fixed(gas_price, self.config.auto_invest.gas_limit),
        );

        let investments: Vec<InvestmentRecord> = records.into_iter().map(Into::into).collect();
        for investment in &investments {
            debug!(
                investor = %investment.investor,
                campaign = %investment.campaign,
                amount = %investment.amount,
                "Auto-investing for"
            );
        }

        let hash = service.invest_for(investments).await?;
        info!(tx_hash = %hash, chain_id, "Sent request to auto-invest");
        Ok(hash)
    }

    async fn get_pending_investments(
        &self,
        query: PendingInvestmentsQuery,
        chain_id: u64,
    ) -> Result<Vec<PendingInvestmentRecord>> {
        let context = self.registry.context(chain_id).await?;
        let account = context.require_auto_invest()?;

        let service = InvestService::load(
            account.contract_address,
            context.client.provider().clone(),
            GasProvider::default(),
        );

        service
            .get_pending_for(
                query.user,
                query.issuer,
                query.campaign_factories,
                query.query_service,
                query.name_registry,
            )
            .await
    }

    async fn get_issuer_state(
        &self,
        issuer: Address,
        chain_id: u64,
    ) -> Result<IssuerCommonState> {
        let context = self.registry.context(chain_id).await?;
        IssuerCommon::load(issuer, context.client.provider().clone()).common_state().await
    }

    async fn get_contract_version(
        &self,
        address: Address,
        chain_id: u64,
    ) -> Result<ContractVersion> {
        let context = self.registry.context(chain_id).await?;
        let version = Versioned::load(address, context.client.provider().clone()).version().await?;
        Ok(ContractVersion::new(version))
    }

    async fn is_signature_valid(
        &self,
        address: Address,
        hash: B256,
        signature: Bytes,
        chain_id: u64,
    ) -> Result<bool> {
        let context = self.registry.context(chain_id).await?;
        Erc1271::load(address, context.client.provider().clone()).accepts(hash, signature).await
    }
}
