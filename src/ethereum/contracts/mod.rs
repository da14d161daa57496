//! Smart contract bindings.
//!
//! Each binding pairs a `sol!` interface with a thin wrapper that is loaded
//! from a contract address, a provider and a [`GasProvider`]. View functions
//! return decoded values; state-changing functions return the hash of the
//! broadcast transaction.

pub mod faucet;
pub mod invest_service;
pub mod issuer;
pub mod versioned;
pub mod wallet_approver;

use alloy::{
    contract::{CallBuilder, CallDecoder},
    primitives::TxHash,
    providers::Provider,
};

use crate::error::Result;

pub use faucet::{FaucetService, IFaucetService};
pub use invest_service::{
    IInvestService, InvestService, InvestmentRecord, InvestmentRecordStatus,
    PendingInvestmentRecord,
};
pub use issuer::{IIssuer, IIssuerCommon, Issuer, IssuerCommon, IssuerCommonState};
pub use versioned::{Erc1271, IERC1271, IVersioned, Versioned, ERC1271_MAGIC_VALUE};
pub use wallet_approver::{WalletApprover, WalletApproverService};

/// Gas settings applied to state-changing calls.
///
/// Unset fields are estimated by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GasProvider {
    /// Legacy gas price in wei.
    pub gas_price: Option<u128>,
    /// Gas limit.
    pub gas_limit: Option<u64>,
}

impl GasProvider {
    /// Fixed gas price and limit for every transaction.
    pub fn fixed(gas_price: u128, gas_limit: u64) -> Self {
        Self { gas_price: Some(gas_price), gas_limit: Some(gas_limit) }
    }

    /// Apply the configured values to a call.
    pub fn apply<P, D>(&self, mut call: CallBuilder<P, D>) -> CallBuilder<P, D>
    where
        P: Provider,
        D: CallDecoder,
    {
        if let Some(gas_price) = self.gas_price {
            call = call.gas_price(gas_price);
        }
        if let Some(gas_limit) = self.gas_limit {
            call = call.gas(gas_limit);
        }
        call
    }

    /// Apply gas settings, sign and broadcast, returning the transaction hash.
    pub(crate) async fn submit<P, D>(&self, call: CallBuilder<P, D>) -> Result<TxHash>
    where
        P: Provider,
        D: CallDecoder,
    {
        let pending = self.apply(call).send().await?;
        let hash = *pending.tx_hash();
        tracing::debug!(tx_hash = %hash, "Transaction broadcast");
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::{
        primitives::{address, Address},
        providers::{DynProvider, ProviderBuilder},
    };

    fn faucet_contract() -> IFaucetService::IFaucetServiceInstance<DynProvider> {
        // Building a call never touches the node
        let url = "http://127.0.0.1:1".parse().unwrap();
        let provider = ProviderBuilder::new().connect_http(url).erased();
        IFaucetService::new(address!("5FbDB2315678afecb367f032d93F642f64180aa3"), provider)
    }

    #[test]
    fn test_default_leaves_estimation_to_provider() {
        let gas = GasProvider::default();
        assert!(gas.gas_price.is_none());
        assert!(gas.gas_limit.is_none());
    }

    #[test]
    fn test_fixed() {
        let gas = GasProvider::fixed(30_000_000_000, 200_000);
        assert_eq!(gas.gas_price, Some(30_000_000_000));
        assert_eq!(gas.gas_limit, Some(200_000));
    }

    #[test]
    fn test_fixed_sets_price_and_limit_on_call() {
        let contract = faucet_contract();
        let gas = GasProvider::fixed(30_000_000_000, 200_000);

        let request = gas.apply(contract.faucet(vec![Address::ZERO])).into_transaction_request();

        assert_eq!(request.gas_price, Some(30_000_000_000));
        assert_eq!(request.gas, Some(200_000));
    }

    #[test]
    fn test_default_leaves_call_unset() {
        let contract = faucet_contract();

        let request = GasProvider::default()
            .apply(contract.faucet(vec![Address::ZERO]))
            .into_transaction_request();

        assert_eq!(request.gas_price, None);
        assert_eq!(request.gas, None);
    }
}
