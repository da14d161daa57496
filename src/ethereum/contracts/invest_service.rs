//! Investment service (auto-invest) contract bindings.

use alloy::{
    primitives::{Address, TxHash},
    providers::DynProvider,
    sol,
};

use super::GasProvider;
use crate::error::Result;

pub use IInvestService::{InvestmentRecord, InvestmentRecordStatus, PendingInvestmentRecord};

sol! {
    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface IInvestService {
        struct PendingInvestmentRecord {
            address investor;
            address campaign;
            uint256 allowance;
            uint256 balance;
            uint256 alreadyInvest;
            bool kycPassed;
        }

        struct InvestmentRecord {
            address investor;
            address campaign;
            uint256 amount;
        }

        struct InvestmentRecordStatus {
            address investor;
            address campaign;
            uint256 amount;
            bool readyToInvest;
        }

        function getPendingFor(
            address _user,
            address _issuer,
            address[] calldata _campaignFactories,
            address queryService,
            address nameRegistry
        ) external view returns (PendingInvestmentRecord[] memory);

        function getStatus(
            InvestmentRecord[] calldata _investments
        ) external view returns (InvestmentRecordStatus[] memory);

        function investFor(InvestmentRecord[] calldata _investments) external;
    }
}

impl From<InvestmentRecordStatus> for InvestmentRecord {
    fn from(status: InvestmentRecordStatus) -> Self {
        Self { investor: status.investor, campaign: status.campaign, amount: status.amount }
    }
}

/// Binding for `IInvestService`.
#[derive(Debug, Clone)]
pub struct InvestService {
    contract: IInvestService::IInvestServiceInstance<DynProvider>,
    gas: GasProvider,
}

impl InvestService {
    /// Bind to the investment service at `address`. No network access.
    pub fn load(address: Address, provider: DynProvider, gas: GasProvider) -> Self {
        Self { contract: IInvestService::new(address, provider), gas }
    }

    /// Contract address.
    pub fn address(&self) -> Address {
        *self.contract.address()
    }

    /// Investments `user` has approved on campaigns created by `campaign_factories`.
    pub async fn get_pending_for(
        &self,
        user: Address,
        issuer: Address,
        campaign_factories: Vec<Address>,
        query_service: Address,
        name_registry: Address,
    ) -> Result<Vec<PendingInvestmentRecord>> {
        let pending = self
            .contract
            .getPendingFor(user, issuer, campaign_factories, query_service, name_registry)
            .call()
            .await?;
        Ok(pending)
    }

    /// Readiness of each investment, in input order.
    pub async fn get_status(
        &self,
        investments: Vec<InvestmentRecord>,
    ) -> Result<Vec<InvestmentRecordStatus>> {
        Ok(self.contract.getStatus(investments).call().await?)
    }

    /// Execute the investments on behalf of their investors.
    pub async fn invest_for(&self, investments: Vec<InvestmentRecord>) -> Result<TxHash> {
        self.gas.submit(self.contract.investFor(investments)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::{
        primitives::{address, U256},
        sol_types::{SolCall, SolValue},
    };

    const INVESTOR: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
    const CAMPAIGN: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");

    #[test]
    fn test_signatures_expand_struct_tuples() {
        assert_eq!(
            IInvestService::getPendingForCall::SIGNATURE,
            "getPendingFor(address,address,address[],address,address)"
        );
        assert_eq!(
            IInvestService::getStatusCall::SIGNATURE,
            "getStatus((address,address,uint256)[])"
        );
        assert_eq!(
            IInvestService::investForCall::SIGNATURE,
            "investFor((address,address,uint256)[])"
        );
    }

    #[test]
    fn test_record_from_status_drops_readiness() {
        let status = InvestmentRecordStatus {
            investor: INVESTOR,
            campaign: CAMPAIGN,
            amount: U256::from(500u64),
            readyToInvest: true,
        };

        let record = InvestmentRecord::from(status);

        assert_eq!(record.investor, INVESTOR);
        assert_eq!(record.campaign, CAMPAIGN);
        assert_eq!(record.amount, U256::from(500u64));
    }

    #[test]
    fn test_get_status_return_decodes() {
        let statuses = vec![
            InvestmentRecordStatus {
                investor: INVESTOR,
                campaign: CAMPAIGN,
                amount: U256::from(1_000_000u64),
                readyToInvest: true,
            },
            InvestmentRecordStatus {
                investor: INVESTOR,
                campaign: CAMPAIGN,
                amount: U256::ZERO,
                readyToInvest: false,
            },
        ];

        let decoded =
            IInvestService::getStatusCall::abi_decode_returns(&statuses.abi_encode()).unwrap();

        assert_eq!(decoded, statuses);
    }

    #[test]
    fn test_get_pending_for_empty_return_decodes() {
        let empty: Vec<PendingInvestmentRecord> = Vec::new();

        let decoded =
            IInvestService::getPendingForCall::abi_decode_returns(&empty.abi_encode()).unwrap();

        assert!(decoded.is_empty());
    }

    #[test]
    fn test_invest_for_calldata_round_trips() {
        let call = IInvestService::investForCall {
            _investments: vec![InvestmentRecord {
                investor: INVESTOR,
                campaign: CAMPAIGN,
                amount: U256::from(42u64),
            }],
        };

        let calldata = call.abi_encode();
        let decoded = IInvestService::investForCall::abi_decode(&calldata).unwrap();

        assert_eq!(decoded._investments, call._investments);
    }
}
