//! MCP server implementation.

use std::collections::BTreeSet;
use std::sync::Arc;

use alloy::primitives::{Address, TxHash, U256};
use rmcp::{
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{Implementation, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use serde::Serialize;

use crate::{
    config::Config,
    error::AppError,
    ethereum::contracts::{InvestmentRecord, InvestmentRecordStatus},
    services::{BlockchainService, ChainBlockchainService, PendingInvestmentsQuery},
    types::{
        AutoInvestInfo, ContractVersion, ContractVersionInfo, InvestmentStatusInfo,
        IssuerStateInfo, PendingInvestmentInfo, TransactionInfo, WhitelistInfo,
    },
};

/// Identity contracts MCP server.
///
/// Exposes whitelisting, faucet, auto-invest and signature checks on the
/// configured chains.
#[derive(Clone)]
pub struct IdentityContractsServer {
    service: Arc<dyn BlockchainService>,
    tool_router: ToolRouter<Self>,
}

impl IdentityContractsServer {
    /// Create a server backed by the configured chains.
    ///
    /// Note: no network calls are made here. Chain connections and accounts
    /// are set up when a tool first targets that chain.
    pub fn new(config: Config) -> Result<Self, AppError> {
        tracing::info!("Initializing Identity Contracts MCP Server");

        let service = ChainBlockchainService::new(config)?;

        tracing::info!("Identity Contracts MCP Server initialized successfully");

        Ok(Self::with_service(Arc::new(service)))
    }

    /// Create a server over any [`BlockchainService`].
    pub fn with_service(service: Arc<dyn BlockchainService>) -> Self {
        Self { service, tool_router: Self::tool_router() }
    }
}

/// Input parameters for the is_whitelisted tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct IsWhitelistedInput {
    /// Chain id (137, 80001, 1 or 31337).
    pub chain_id: u64,
    /// Wallet address (0x...).
    pub address: String,
    /// Issuer contract address. When omitted the wallet is reported as not whitelisted.
    #[serde(default)]
    pub issuer: Option<String>,
}

/// Input parameters for the whitelist_addresses tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct WhitelistAddressesInput {
    /// Chain id.
    pub chain_id: u64,
    /// Issuer contract address.
    pub issuer: String,
    /// Wallet addresses to whitelist.
    pub addresses: Vec<String>,
}

/// Input parameters for the send_faucet_funds tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct SendFaucetFundsInput {
    /// Chain id.
    pub chain_id: u64,
    /// Wallet addresses to fund.
    pub addresses: Vec<String>,
}

/// Input parameters for tools addressing a single contract.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct ContractInput {
    /// Chain id.
    pub chain_id: u64,
    /// Contract address (0x...).
    pub address: String,
}

/// A single investment.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct InvestmentInput {
    /// Investor wallet address.
    pub investor: String,
    /// Campaign contract address.
    pub campaign: String,
    /// Amount in the stablecoin's smallest unit, as a decimal string.
    pub amount: String,
}

/// Input parameters for the auto-invest tools.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct AutoInvestInput {
    /// Chain id.
    pub chain_id: u64,
    /// Investments to check or execute.
    pub investments: Vec<InvestmentInput>,
}

/// Input parameters for the get_pending_investments tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct GetPendingInvestmentsInput {
    /// Chain id.
    pub chain_id: u64,
    /// Investor wallet address.
    pub user: String,
    /// Issuer contract address.
    pub issuer: String,
    /// Campaign factory contract addresses.
    pub campaign_factories: Vec<String>,
    /// Query service contract address.
    pub query_service: String,
    /// Name registry contract address.
    pub name_registry: String,
}

/// Input parameters for the verify_contract_signature tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct VerifyContractSignatureInput {
    /// Chain id.
    pub chain_id: u64,
    /// Contract wallet address.
    pub address: String,
    /// Message that was signed.
    pub payload: String,
    /// Hex signature, or "0x" for a message pre-approved by the wallet.
    pub signed_payload: String,
}

/// Input parameters for the is_mined tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct IsMinedInput {
    /// Chain id.
    pub chain_id: u64,
    /// Transaction hash (0x + 64 hex chars).
    pub transaction_hash: String,
}

/// Parse and validate an Ethereum address from a string.
///
/// # Arguments
/// * `s` - The address string to parse (0x + 40 hex characters)
///
/// # Returns
/// * `Ok(Address)` - If the address is valid
/// * `Err(McpError)` - If the address is invalid with a descriptive error
fn parse_address(s: &str) -> Result<Address, McpError> {
    let trimmed = s.trim();

    if trimmed.is_empty() {
        return Err(McpError::invalid_params("Address cannot be empty", None));
    }

    let Some(body) = strip_hex_prefix(trimmed) else {
        return Err(McpError::invalid_params(format!("Address must start with '0x': {}", s), None));
    };

    // 0x + 40 hex chars
    if trimmed.len() != 42 {
        return Err(McpError::invalid_params(
            format!(
                "Address must be 42 characters (0x + 40 hex chars), got {}: {}",
                trimmed.len(),
                s
            ),
            None,
        ));
    }

    body.parse::<Address>().map_err(|e| {
        McpError::invalid_params(format!("Invalid address format '{}': {}", s, e), None)
    })
}

/// Hex digits after a `0x` or `0X` prefix.
fn strip_hex_prefix(s: &str) -> Option<&str> {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
}

/// Parse a non-empty list of addresses.
fn parse_addresses(values: &[String]) -> Result<Vec<Address>, McpError> {
    if values.is_empty() {
        return Err(McpError::invalid_params("At least one address is required", None));
    }
    values.iter().map(|s| parse_address(s)).collect()
}

/// Parse a transaction hash (0x + 64 hex chars).
fn parse_tx_hash(s: &str) -> Result<TxHash, McpError> {
    let body = strip_hex_prefix(s.trim()).filter(|body| body.len() == 64).ok_or_else(|| {
        McpError::invalid_params(format!("Transaction hash must be 0x + 64 hex chars: {}", s), None)
    })?;
    body.parse::<TxHash>().map_err(|e| {
        McpError::invalid_params(format!("Invalid transaction hash '{}': {}", s, e), None)
    })
}

/// Parse a decimal token amount in base units.
fn parse_amount(s: &str) -> Result<U256, McpError> {
    let trimmed = s.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(McpError::invalid_params(
            format!("Amount must be a non-negative integer: '{}'", s),
            None,
        ));
    }
    U256::from_str_radix(trimmed, 10)
        .map_err(|e| McpError::invalid_params(format!("Invalid amount '{}': {}", s, e), None))
}

fn parse_investments(investments: &[InvestmentInput]) -> Result<Vec<InvestmentRecord>, McpError> {
    if investments.is_empty() {
        return Err(McpError::invalid_params("At least one investment is required", None));
    }
    investments
        .iter()
        .map(|input| {
            Ok(InvestmentRecord {
                investor: parse_address(&input.investor)?,
                campaign: parse_address(&input.campaign)?,
                amount: parse_amount(&input.amount)?,
            })
        })
        .collect()
}

fn to_json<T: Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value).map_err(|e| McpError::internal_error(e.to_string(), None))
}

#[tool_router]
impl IdentityContractsServer {
    /// Check whether a wallet is whitelisted on an issuer.
    #[tool(description = "Check whether a wallet address is whitelisted on an issuer contract")]
    pub async fn is_whitelisted(
        &self,
        Parameters(input): Parameters<IsWhitelistedInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            chain_id = input.chain_id,
            address = %input.address,
            issuer = ?input.issuer,
            "is_whitelisted called"
        );

        let address = parse_address(&input.address)?;
        let issuer = input.issuer.as_deref().map(parse_address).transpose()?;

        let whitelisted = self.service.is_whitelisted(address, issuer, input.chain_id).await?;

        to_json(&WhitelistInfo::new(input.chain_id, address, issuer, whitelisted))
    }

    /// Read the common state of an issuer contract.
    #[tool(
        description = "Get the state of an issuer contract: flavor, version, owner, stablecoin, wallet approver and info"
    )]
    pub async fn get_issuer_state(
        &self,
        Parameters(input): Parameters<ContractInput>,
    ) -> Result<String, McpError> {
        tracing::info!(chain_id = input.chain_id, issuer = %input.address, "get_issuer_state called");

        let issuer = parse_address(&input.address)?;
        let state = self.service.get_issuer_state(issuer, input.chain_id).await?;

        to_json(&IssuerStateInfo::from(state))
    }

    /// Read the version of any versioned contract.
    #[tool(
        description = "Get the version of a contract and whether it is recent enough for auto-invest"
    )]
    pub async fn get_contract_version(
        &self,
        Parameters(input): Parameters<ContractInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            chain_id = input.chain_id,
            address = %input.address,
            "get_contract_version called"
        );

        let address = parse_address(&input.address)?;
        let version = self.service.get_contract_version(address, input.chain_id).await?;
        let minimum = ContractVersion::new(crate::services::blockchain::MIN_AUTO_INVEST_VERSION);

        to_json(&ContractVersionInfo {
            chain_id: input.chain_id,
            address: address.to_string(),
            supports_auto_invest: version >= minimum,
            version: version.to_string(),
        })
    }

    /// Check which investments the auto-invest service can execute.
    #[tool(description = "Get the auto-invest readiness of a list of investments")]
    pub async fn get_auto_invest_status(
        &self,
        Parameters(input): Parameters<AutoInvestInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            chain_id = input.chain_id,
            count = input.investments.len(),
            "get_auto_invest_status called"
        );

        let records = parse_investments(&input.investments)?;
        let statuses = self.service.get_auto_invest_status(records, input.chain_id).await?;

        let result: Vec<InvestmentStatusInfo> = statuses.into_iter().map(Into::into).collect();
        to_json(&result)
    }

    /// List investments a user approved but has not executed.
    #[tool(description = "Get the pending investments of a user on an issuer's campaigns")]
    pub async fn get_pending_investments(
        &self,
        Parameters(input): Parameters<GetPendingInvestmentsInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            chain_id = input.chain_id,
            user = %input.user,
            issuer = %input.issuer,
            "get_pending_investments called"
        );

        let query = PendingInvestmentsQuery {
            user: parse_address(&input.user)?,
            issuer: parse_address(&input.issuer)?,
            campaign_factories: input
                .campaign_factories
                .iter()
                .map(|s| parse_address(s))
                .collect::<Result<_, _>>()?,
            query_service: parse_address(&input.query_service)?,
            name_registry: parse_address(&input.name_registry)?,
        };

        let pending = self.service.get_pending_investments(query, input.chain_id).await?;

        let result: Vec<PendingInvestmentInfo> = pending.into_iter().map(Into::into).collect();
        to_json(&result)
    }

    /// Verify an ERC-1271 contract wallet signature.
    #[tool(
        description = "Verify a message signature made by a contract wallet (ERC-1271). Use signed_payload \"0x\" for pre-approved messages."
    )]
    pub async fn verify_contract_signature(
        &self,
        Parameters(input): Parameters<VerifyContractSignatureInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            chain_id = input.chain_id,
            address = %input.address,
            "verify_contract_signature called"
        );

        let address = parse_address(&input.address)?;
        let valid = self
            .service
            .verify_contract_signature(
                address,
                &input.payload,
                &input.signed_payload,
                input.chain_id,
            )
            .await?;

        to_json(&serde_json::json!({
            "chain_id": input.chain_id,
            "address": address.to_string(),
            "valid": valid,
        }))
    }

    /// Whitelist wallets on an issuer through the wallet approver service.
    #[tool(
        description = "Whitelist wallet addresses on an issuer. Sends a transaction from the wallet approver account."
    )]
    pub async fn whitelist_addresses(
        &self,
        Parameters(input): Parameters<WhitelistAddressesInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            chain_id = input.chain_id,
            issuer = %input.issuer,
            count = input.addresses.len(),
            "whitelist_addresses called"
        );

        let issuer = parse_address(&input.issuer)?;
        let addresses = parse_addresses(&input.addresses)?;

        let hash = self.service.whitelist_addresses(addresses, issuer, input.chain_id).await?;

        to_json(&TransactionInfo::new(input.chain_id, hash))
    }

    /// Fund wallets from the faucet service.
    #[tool(
        description = "Send faucet funds to wallet addresses. Sends a transaction from the faucet caller account."
    )]
    pub async fn send_faucet_funds(
        &self,
        Parameters(input): Parameters<SendFaucetFundsInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            chain_id = input.chain_id,
            count = input.addresses.len(),
            "send_faucet_funds called"
        );

        let addresses = parse_addresses(&input.addresses)?;
        let hash = self.service.send_faucet_funds(addresses, input.chain_id).await?;

        to_json(&TransactionInfo::new(input.chain_id, hash))
    }

    /// Execute ready investments through the auto-invest service.
    ///
    /// Every campaign must support auto-invest. Investments that are not
    /// ready are reported and left out of the transaction.
    #[tool(
        description = "Execute investments on behalf of investors. Only investments reported ready are sent; nothing is sent when none is ready."
    )]
    pub async fn auto_invest_for(
        &self,
        Parameters(input): Parameters<AutoInvestInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            chain_id = input.chain_id,
            count = input.investments.len(),
            "auto_invest_for called"
        );

        let records = parse_investments(&input.investments)?;

        let campaigns: BTreeSet<Address> = records.iter().map(|record| record.campaign).collect();
        for campaign in campaigns {
            self.service.ensure_auto_invest_supported(campaign, input.chain_id).await?;
        }

        let statuses = self.service.get_auto_invest_status(records, input.chain_id).await?;
        let (ready, not_ready): (Vec<InvestmentRecordStatus>, Vec<InvestmentRecordStatus>) =
            statuses.into_iter().partition(|status| status.readyToInvest);

        let transaction_hash = if ready.is_empty() {
            tracing::info!(chain_id = input.chain_id, "No investment ready for auto-invest");
            None
        } else {
            let hash = self.service.auto_invest_for(ready.clone(), input.chain_id).await?;
            Some(hash.to_string())
        };

        to_json(&AutoInvestInfo {
            chain_id: input.chain_id,
            transaction_hash,
            invested: ready.into_iter().map(Into::into).collect(),
            not_ready: not_ready.into_iter().map(Into::into).collect(),
        })
    }

    /// Check whether a transaction has been mined.
    #[tool(description = "Check whether a transaction has been mined")]
    pub async fn is_mined(
        &self,
        Parameters(input): Parameters<IsMinedInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            chain_id = input.chain_id,
            transaction_hash = %input.transaction_hash,
            "is_mined called"
        );

        let hash = parse_tx_hash(&input.transaction_hash)?;
        let mined = self.service.is_mined(hash, input.chain_id).await?;

        to_json(&serde_json::json!({
            "chain_id": input.chain_id,
            "transaction_hash": hash.to_string(),
            "mined": mined,
        }))
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for IdentityContractsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "identity-contracts".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Identity Contracts MCP Server. Whitelists wallets on issuers, funds wallets \
                 from the faucet, runs auto-invest and verifies contract wallet signatures."
                    .to_string(),
            ),
        }
    }
}
