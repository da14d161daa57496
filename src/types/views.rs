//! Serializable views of on-chain data.

use alloy::primitives::{Address, TxHash};
use serde::{Deserialize, Serialize};

use crate::ethereum::contracts::{InvestmentRecordStatus, IssuerCommonState, PendingInvestmentRecord};

/// Issuer state as returned by `commonState()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerStateInfo {
    pub flavor: String,
    pub version: String,
    pub contract_address: String,
    pub owner: String,
    pub stablecoin: String,
    pub wallet_approver: String,
    pub info: String,
}

impl From<IssuerCommonState> for IssuerStateInfo {
    fn from(state: IssuerCommonState) -> Self {
        Self {
            flavor: state.flavor,
            version: state.version,
            contract_address: state.contractAddress.to_string(),
            owner: state.owner.to_string(),
            stablecoin: state.stablecoin.to_string(),
            wallet_approver: state.walletApprover.to_string(),
            info: state.info,
        }
    }
}

/// Auto-invest readiness of a single investment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentStatusInfo {
    pub investor: String,
    pub campaign: String,
    /// Amount in the stablecoin's smallest unit.
    pub amount: String,
    pub ready_to_invest: bool,
}

impl From<InvestmentRecordStatus> for InvestmentStatusInfo {
    fn from(status: InvestmentRecordStatus) -> Self {
        Self {
            investor: status.investor.to_string(),
            campaign: status.campaign.to_string(),
            amount: status.amount.to_string(),
            ready_to_invest: status.readyToInvest,
        }
    }
}

/// Investment a user has approved but not yet executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingInvestmentInfo {
    pub investor: String,
    pub campaign: String,
    pub allowance: String,
    pub balance: String,
    pub already_invested: String,
    pub kyc_passed: bool,
}

impl From<PendingInvestmentRecord> for PendingInvestmentInfo {
    fn from(record: PendingInvestmentRecord) -> Self {
        Self {
            investor: record.investor.to_string(),
            campaign: record.campaign.to_string(),
            allowance: record.allowance.to_string(),
            balance: record.balance.to_string(),
            already_invested: record.alreadyInvest.to_string(),
            kyc_passed: record.kycPassed,
        }
    }
}

/// A broadcast transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInfo {
    pub chain_id: u64,
    pub transaction_hash: String,
}

impl TransactionInfo {
    pub fn new(chain_id: u64, hash: TxHash) -> Self {
        Self { chain_id, transaction_hash: hash.to_string() }
    }
}

/// Outcome of an auto-invest request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoInvestInfo {
    pub chain_id: u64,
    /// Absent when no investment was ready.
    pub transaction_hash: Option<String>,
    pub invested: Vec<InvestmentStatusInfo>,
    pub not_ready: Vec<InvestmentStatusInfo>,
}

/// Version reported by a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractVersionInfo {
    pub chain_id: u64,
    pub address: String,
    pub version: String,
    pub supports_auto_invest: bool,
}

/// Whitelist state of a wallet on an issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitelistInfo {
    pub chain_id: u64,
    pub wallet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    pub whitelisted: bool,
}

impl WhitelistInfo {
    pub fn new(chain_id: u64, wallet: Address, issuer: Option<Address>, whitelisted: bool) -> Self {
        Self {
            chain_id,
            wallet: wallet.to_string(),
            issuer: issuer.map(|issuer| issuer.to_string()),
            whitelisted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, b256, U256};

    #[test]
    fn test_status_info_serialization() {
        let status = InvestmentRecordStatus {
            investor: address!("70997970C51812dc3A010C7d01b50e0d17dc79C8"),
            campaign: address!("5FbDB2315678afecb367f032d93F642f64180aa3"),
            amount: U256::from(1_500_000u64),
            readyToInvest: true,
        };

        let json = serde_json::to_value(InvestmentStatusInfo::from(status)).unwrap();

        assert_eq!(json["investor"], "0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
        assert_eq!(json["amount"], "1500000");
        assert_eq!(json["ready_to_invest"], true);
    }

    #[test]
    fn test_pending_info_renames_already_invest() {
        let record = PendingInvestmentRecord {
            investor: Address::ZERO,
            campaign: Address::ZERO,
            allowance: U256::from(10u64),
            balance: U256::from(20u64),
            alreadyInvest: U256::from(5u64),
            kycPassed: false,
        };

        let info = PendingInvestmentInfo::from(record);

        assert_eq!(info.already_invested, "5");
        assert_eq!(info.allowance, "10");
        assert!(!info.kyc_passed);
    }

    #[test]
    fn test_whitelist_info_omits_missing_issuer() {
        let info = WhitelistInfo::new(137, Address::ZERO, None, false);
        let json = serde_json::to_value(&info).unwrap();
        assert!(json.get("issuer").is_none());
        assert_eq!(json["whitelisted"], false);
    }

    #[test]
    fn test_transaction_info_hash_is_hex() {
        let hash = b256!("0000000000000000000000000000000000000000000000000000000000000001");
        let info = TransactionInfo::new(80001, hash);
        assert!(info.transaction_hash.starts_with("0x"));
        assert_eq!(info.transaction_hash.len(), 66);
    }
}
