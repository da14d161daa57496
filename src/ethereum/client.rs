//! Ethereum RPC client.

use alloy::{
    primitives::TxHash,
    providers::{DynProvider, Provider, ProviderBuilder},
    transports::http::reqwest::Url,
};

use crate::{
    error::{AppError, Result},
    ethereum::WalletManager,
};

/// Ethereum RPC client wrapper with lazy initialization.
#[derive(Clone)]
pub struct EthereumClient {
    /// Read-only provider.
    provider: DynProvider,
    /// Parsed endpoint, reused for signing providers.
    url: Url,
}

impl EthereumClient {
    /// Create a new Ethereum client.
    ///
    /// Note: This does NOT make any network calls. The connection is
    /// established lazily when the first operation is performed.
    pub fn new(rpc_url: &str) -> Result<Self> {
        let url: Url = rpc_url
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid RPC URL: {rpc_url}")))?;

        let provider = ProviderBuilder::new().connect_http(url.clone()).erased();

        tracing::debug!(rpc_url = %url, "Ethereum client created (lazy initialization)");

        Ok(Self { provider, url })
    }

    /// Get the read-only provider.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Endpoint this client talks to.
    pub fn rpc_url(&self) -> &Url {
        &self.url
    }

    /// Provider that signs and sends transactions with the given wallet.
    ///
    /// Nonce, chain id and gas fields left unset are filled by the provider.
    pub fn signer_provider(&self, wallet: &WalletManager) -> DynProvider {
        ProviderBuilder::new().wallet(wallet.ethereum_wallet()).connect_http(self.url.clone()).erased()
    }

    /// Get current gas price in wei.
    pub async fn get_gas_price(&self) -> Result<u128> {
        let gas_price = self.provider.get_gas_price().await?;
        Ok(gas_price)
    }

    /// Whether a receipt exists for the transaction.
    pub async fn is_mined(&self, hash: TxHash) -> Result<bool> {
        let receipt = self.provider.get_transaction_receipt(hash).await?;
        Ok(receipt.is_some())
    }
}

impl std::fmt::Debug for EthereumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EthereumClient").field("url", &self.url.as_str()).finish()
    }
}
