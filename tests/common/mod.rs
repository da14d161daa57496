//! Common utilities for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, Bytes, TxHash, B256, U256};
use async_trait::async_trait;
use identity_contracts::{
    ethereum::contracts::{
        InvestmentRecord, InvestmentRecordStatus, IssuerCommonState, PendingInvestmentRecord,
    },
    services::PendingInvestmentsQuery,
    types::ContractVersion,
    AppError, BlockchainService, Chain, Config, IdentityContractsServer, Result,
};

pub const HASH: TxHash = TxHash::repeat_byte(0x11);

/// A call received by [`MockBlockchainService`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Whitelist { addresses: Vec<Address>, issuer: Address, chain_id: u64 },
    Faucet { addresses: Vec<Address>, chain_id: u64 },
    Status { records: Vec<InvestmentRecord>, chain_id: u64 },
    Invest { records: Vec<InvestmentRecordStatus>, chain_id: u64 },
    Version { address: Address },
    Signature { address: Address, hash: B256, signature: Bytes },
}

/// In-memory [`BlockchainService`] that records every call.
pub struct MockBlockchainService {
    pub calls: Mutex<Vec<Call>>,
    /// Version reported for every contract.
    pub version: String,
    /// Records at or above this amount are reported ready.
    pub ready_threshold: u64,
    /// Wallets reported as whitelisted.
    pub whitelisted: Vec<Address>,
    pub signature_valid: bool,
}

impl Default for MockBlockchainService {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            version: "1.0.23".to_string(),
            ready_threshold: 0,
            whitelisted: Vec::new(),
            signature_valid: true,
        }
    }
}

impl MockBlockchainService {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BlockchainService for MockBlockchainService {
    async fn whitelist_addresses(
        &self,
        addresses: Vec<Address>,
        issuer: Address,
        chain_id: u64,
    ) -> Result<TxHash> {
        self.record(Call::Whitelist { addresses, issuer, chain_id });
        Ok(HASH)
    }

    async fn is_mined(&self, hash: TxHash, _chain_id: u64) -> Result<bool> {
        Ok(hash == HASH)
    }

    async fn is_whitelisted(
        &self,
        address: Address,
        issuer: Option<Address>,
        _chain_id: u64,
    ) -> Result<bool> {
        Ok(issuer.is_some() && self.whitelisted.contains(&address))
    }

    async fn send_faucet_funds(&self, addresses: Vec<Address>, chain_id: u64) -> Result<TxHash> {
        if chain_id == Chain::EthereumMain.id() {
            return Err(AppError::ChainConfigMissing(format!("faucet service on chain {chain_id}")));
        }
        self.record(Call::Faucet { addresses, chain_id });
        Ok(HASH)
    }

    async fn get_auto_invest_status(
        &self,
        records: Vec<InvestmentRecord>,
        chain_id: u64,
    ) -> Result<Vec<InvestmentRecordStatus>> {
        self.record(Call::Status { records: records.clone(), chain_id });
        Ok(records
            .into_iter()
            .map(|record| InvestmentRecordStatus {
                investor: record.investor,
                campaign: record.campaign,
                amount: record.amount,
                readyToInvest: record.amount >= U256::from(self.ready_threshold),
            })
            .collect())
    }

    async fn auto_invest_for(
        &self,
        records: Vec<InvestmentRecordStatus>,
        chain_id: u64,
    ) -> Result<TxHash> {
        self.record(Call::Invest { records, chain_id });
        Ok(HASH)
    }

    async fn get_pending_investments(
        &self,
        query: PendingInvestmentsQuery,
        _chain_id: u64,
    ) -> Result<Vec<PendingInvestmentRecord>> {
        Ok(query
            .campaign_factories
            .iter()
            .map(|factory| PendingInvestmentRecord {
                investor: query.user,
                campaign: *factory,
                allowance: U256::from(100u64),
                balance: U256::from(250u64),
                alreadyInvest: U256::ZERO,
                kycPassed: true,
            })
            .collect())
    }

    async fn get_issuer_state(&self, issuer: Address, _chain_id: u64) -> Result<IssuerCommonState> {
        Ok(IssuerCommonState {
            flavor: "IssuerV1".to_string(),
            version: self.version.clone(),
            contractAddress: issuer,
            owner: Address::repeat_byte(0x01),
            stablecoin: Address::repeat_byte(0x02),
            walletApprover: Address::repeat_byte(0x03),
            info: "issuer-info".to_string(),
        })
    }

    async fn get_contract_version(
        &self,
        address: Address,
        _chain_id: u64,
    ) -> Result<ContractVersion> {
        self.record(Call::Version { address });
        Ok(ContractVersion::new(self.version.clone()))
    }

    async fn is_signature_valid(
        &self,
        address: Address,
        hash: B256,
        signature: Bytes,
        _chain_id: u64,
    ) -> Result<bool> {
        self.record(Call::Signature { address, hash, signature });
        Ok(self.signature_valid)
    }
}

/// Server over a mock service, returned alongside the mock for assertions.
pub fn mock_server(
    service: MockBlockchainService,
) -> (IdentityContractsServer, Arc<MockBlockchainService>) {
    let service = Arc::new(service);
    let server = IdentityContractsServer::with_service(service.clone());
    (server, service)
}

/// Helper to create a server against a hardhat node from environment variables.
///
/// The node must be reachable at the hardhat chain's RPC URL, with
/// `CHAIN_HARDHAT_WALLET_APPROVER_PRIVATE_KEY` and
/// `CHAIN_HARDHAT_WALLET_APPROVER_ADDRESS` set.
pub fn create_test_server() -> Option<IdentityContractsServer> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let mut config = Config::from_env().ok()?;
    let accounts = config.chain(Chain::HardhatTestnet)?;

    if accounts.wallet_approver_private_key.is_empty()
        || accounts.wallet_approver_address.is_empty()
    {
        return None;
    }

    config.log_level = "warn".to_string();

    IdentityContractsServer::new(config).ok()
}

/// Skip test if server cannot be created (missing env vars).
#[macro_export]
macro_rules! skip_if_no_server {
    () => {
        match common::create_test_server() {
            Some(server) => server,
            None => {
                eprintln!(
                    "Skipping test: CHAIN_HARDHAT_WALLET_APPROVER_PRIVATE_KEY or \
                     CHAIN_HARDHAT_WALLET_APPROVER_ADDRESS not set"
                );
                return;
            }
        }
    };
}
