//! Issuer contract bindings.
//!
//! [`IssuerCommon`] covers every current issuer flavor; [`Issuer`] is the
//! legacy interface that predates `commonState()`.

use alloy::{
    primitives::{Address, TxHash},
    providers::DynProvider,
    sol,
};

use super::GasProvider;
use crate::error::Result;

pub use IIssuerCommon::IssuerCommonState;

sol! {
    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface IIssuerCommon {
        struct IssuerCommonState {
            string flavor;
            string version;
            address contractAddress;
            address owner;
            address stablecoin;
            address walletApprover;
            string info;
        }

        function commonState() external view returns (IssuerCommonState memory);
        function flavor() external view returns (string memory);
        function version() external view returns (string memory);
        function isWalletApproved(address wallet) external view returns (bool);
    }
}

sol! {
    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface IIssuer {
        function approveWallet(address _wallet) external;
        function getAssets() external view returns (address[] memory);
        function getCfManagers() external view returns (address[] memory);
        function info() external;
        function isWalletApproved(address _wallet) external view returns (bool);
        function stablecoin() external view returns (address);
    }
}

/// Binding for `IIssuerCommon`.
#[derive(Debug, Clone)]
pub struct IssuerCommon {
    contract: IIssuerCommon::IIssuerCommonInstance<DynProvider>,
}

impl IssuerCommon {
    /// Bind to an issuer at `address`. No network access.
    pub fn load(address: Address, provider: DynProvider) -> Self {
        Self { contract: IIssuerCommon::new(address, provider) }
    }

    /// Contract address.
    pub fn address(&self) -> Address {
        *self.contract.address()
    }

    /// Full issuer state in one call.
    pub async fn common_state(&self) -> Result<IssuerCommonState> {
        Ok(self.contract.commonState().call().await?)
    }

    pub async fn flavor(&self) -> Result<String> {
        Ok(self.contract.flavor().call().await?)
    }

    pub async fn version(&self) -> Result<String> {
        Ok(self.contract.version().call().await?)
    }

    /// Whether `wallet` is whitelisted on this issuer.
    pub async fn is_wallet_approved(&self, wallet: Address) -> Result<bool> {
        Ok(self.contract.isWalletApproved(wallet).call().await?)
    }
}

/// Binding for the legacy `IIssuer`.
#[derive(Debug, Clone)]
pub struct Issuer {
    contract: IIssuer::IIssuerInstance<DynProvider>,
    gas: GasProvider,
}

impl Issuer {
    /// Bind to a legacy issuer at `address`. No network access.
    pub fn load(address: Address, provider: DynProvider, gas: GasProvider) -> Self {
        Self { contract: IIssuer::new(address, provider), gas }
    }

    /// Contract address.
    pub fn address(&self) -> Address {
        *self.contract.address()
    }

    pub async fn approve_wallet(&self, wallet: Address) -> Result<TxHash> {
        self.gas.submit(self.contract.approveWallet(wallet)).await
    }

    pub async fn get_assets(&self) -> Result<Vec<Address>> {
        Ok(self.contract.getAssets().call().await?)
    }

    pub async fn get_cf_managers(&self) -> Result<Vec<Address>> {
        Ok(self.contract.getCfManagers().call().await?)
    }

    /// `info()` is declared state-changing in the legacy ABI.
    pub async fn info(&self) -> Result<TxHash> {
        self.gas.submit(self.contract.info()).await
    }

    pub async fn is_wallet_approved(&self, wallet: Address) -> Result<bool> {
        Ok(self.contract.isWalletApproved(wallet).call().await?)
    }

    pub async fn stablecoin(&self) -> Result<Address> {
        Ok(self.contract.stablecoin().call().await?)
    }
}
