//! Wallet approver service contract bindings.

use alloy::{
    primitives::{Address, TxHash},
    providers::DynProvider,
    sol,
};

use super::GasProvider;
use crate::error::Result;

sol! {
    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface WalletApproverService {
        function approveWallets(address issuer, address[] calldata wallets) external;
        function flavor() external view returns (string memory);
        function version() external view returns (string memory);
    }
}

/// Binding for `WalletApproverService`.
#[derive(Debug, Clone)]
pub struct WalletApprover {
    contract: WalletApproverService::WalletApproverServiceInstance<DynProvider>,
    gas: GasProvider,
}

impl WalletApprover {
    /// Bind to the wallet approver at `address`. No network access.
    pub fn load(address: Address, provider: DynProvider, gas: GasProvider) -> Self {
        Self { contract: WalletApproverService::new(address, provider), gas }
    }

    /// Contract address.
    pub fn address(&self) -> Address {
        *self.contract.address()
    }

    /// Whitelist `wallets` on `issuer`. The caller must be an approver of that issuer.
    pub async fn approve_wallets(&self, issuer: Address, wallets: Vec<Address>) -> Result<TxHash> {
        self.gas.submit(self.contract.approveWallets(issuer, wallets)).await
    }

    pub async fn flavor(&self) -> Result<String> {
        Ok(self.contract.flavor().call().await?)
    }

    pub async fn version(&self) -> Result<String> {
        Ok(self.contract.version().call().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::{primitives::address, sol_types::SolCall};

    #[test]
    fn test_signatures() {
        assert_eq!(
            WalletApproverService::approveWalletsCall::SIGNATURE,
            "approveWallets(address,address[])"
        );
        assert_eq!(WalletApproverService::flavorCall::SIGNATURE, "flavor()");
        assert_eq!(WalletApproverService::versionCall::SIGNATURE, "version()");
    }

    #[test]
    fn test_approve_wallets_keeps_argument_order() {
        let issuer = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
        let wallets = vec![address!("70997970C51812dc3A010C7d01b50e0d17dc79C8")];

        let calldata =
            WalletApproverService::approveWalletsCall { issuer, wallets: wallets.clone() }
                .abi_encode();

        assert_eq!(&calldata[16..36], issuer.as_slice());
        let decoded = WalletApproverService::approveWalletsCall::abi_decode(&calldata).unwrap();
        assert_eq!(decoded.issuer, issuer);
        assert_eq!(decoded.wallets, wallets);
    }

    #[test]
    fn test_version_return_decodes() {
        let returned = alloy::sol_types::SolValue::abi_encode(&"1.0.1".to_string());
        let decoded = WalletApproverService::versionCall::abi_decode_returns(&returned).unwrap();
        assert_eq!(decoded, "1.0.1");
    }
}
