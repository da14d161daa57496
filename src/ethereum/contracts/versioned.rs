//! Versioning and ERC-1271 signature validation bindings.

use alloy::{
    primitives::{fixed_bytes, Address, Bytes, FixedBytes, B256},
    providers::DynProvider,
    sol,
};

use crate::error::Result;

/// Value returned by `isValidSignature` when the signature is accepted.
pub const ERC1271_MAGIC_VALUE: FixedBytes<4> = fixed_bytes!("1626ba7e");

sol! {
    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface IVersioned {
        function flavor() external view returns (string memory);
        function version() external view returns (string memory);
    }
}

sol! {
    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface IERC1271 {
        function isValidSignature(bytes32 hash, bytes memory signature) external view returns (bytes4 magicValue);
    }
}

/// Binding for any contract exposing `flavor()` and `version()`.
#[derive(Debug, Clone)]
pub struct Versioned {
    contract: IVersioned::IVersionedInstance<DynProvider>,
}

impl Versioned {
    pub fn load(address: Address, provider: DynProvider) -> Self {
        Self { contract: IVersioned::new(address, provider) }
    }

    pub fn address(&self) -> Address {
        *self.contract.address()
    }

    pub async fn flavor(&self) -> Result<String> {
        Ok(self.contract.flavor().call().await?)
    }

    pub async fn version(&self) -> Result<String> {
        Ok(self.contract.version().call().await?)
    }
}

/// Binding for ERC-1271 contract wallets.
#[derive(Debug, Clone)]
pub struct Erc1271 {
    contract: IERC1271::IERC1271Instance<DynProvider>,
}

impl Erc1271 {
    pub fn load(address: Address, provider: DynProvider) -> Self {
        Self { contract: IERC1271::new(address, provider) }
    }

    pub fn address(&self) -> Address {
        *self.contract.address()
    }

    /// Raw magic value returned for `hash` and `signature`.
    pub async fn is_valid_signature(&self, hash: B256, signature: Bytes) -> Result<FixedBytes<4>> {
        Ok(self.contract.isValidSignature(hash, signature).call().await?)
    }

    /// Whether the contract accepts the signature.
    pub async fn accepts(&self, hash: B256, signature: Bytes) -> Result<bool> {
        Ok(self.is_valid_signature(hash, signature).await? == ERC1271_MAGIC_VALUE)
    }
}
