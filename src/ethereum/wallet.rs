//! Wallet management.

use alloy::{network::EthereumWallet, primitives::Address, signers::local::PrivateKeySigner};

use crate::error::{AppError, Result};

/// Signing account behind one of the configured contract callers.
#[derive(Clone)]
pub struct WalletManager {
    /// The local signer.
    signer: PrivateKeySigner,
    /// Wallet address.
    address: Address,
}

impl WalletManager {
    /// Create a wallet manager from a private key string.
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let trimmed = private_key.trim();
        let key = trimmed.strip_prefix("0x").unwrap_or(trimmed);

        let signer: PrivateKeySigner =
            key.parse().map_err(|e: alloy::signers::local::LocalSignerError| {
                AppError::Wallet(e.to_string())
            })?;

        let address = signer.address();

        tracing::debug!(address = %address, "Wallet loaded");

        Ok(Self { signer, address })
    }

    /// Get the wallet address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Get the signer for transaction signing.
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    /// Wallet usable by a provider's signing filler.
    pub fn ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

impl std::fmt::Debug for WalletManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletManager").field("address", &self.address).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::network::NetworkWallet;
    use alloy::network::Ethereum;

    // First and second hardhat development accounts.
    const HARDHAT_KEY_0: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const HARDHAT_KEY_1: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    #[test]
    fn test_known_key_derives_known_address() {
        let wallet = WalletManager::from_private_key(HARDHAT_KEY_0).unwrap();
        let expected: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();
        assert_eq!(wallet.address(), expected);
        assert_eq!(wallet.signer().address(), expected);
    }

    #[test]
    fn test_prefix_and_whitespace_are_tolerated() {
        let wallet = WalletManager::from_private_key(&format!("  {HARDHAT_KEY_1}\n")).unwrap();
        let expected: Address = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".parse().unwrap();
        assert_eq!(wallet.address(), expected);
    }

    #[test]
    fn test_invalid_keys_are_wallet_errors() {
        for key in ["", "0x1234", "0xZZZZ", "not a key"] {
            match WalletManager::from_private_key(key) {
                Err(AppError::Wallet(msg)) => assert!(!msg.is_empty()),
                other => panic!("expected wallet error for {key:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_ethereum_wallet_signs_for_same_address() {
        let wallet = WalletManager::from_private_key(HARDHAT_KEY_0).unwrap();
        let ethereum_wallet = wallet.ethereum_wallet();
        assert_eq!(
            NetworkWallet::<Ethereum>::default_signer_address(&ethereum_wallet),
            wallet.address()
        );
    }

    #[test]
    fn test_debug_hides_private_key() {
        let wallet = WalletManager::from_private_key(HARDHAT_KEY_0).unwrap();
        let debug_str = format!("{wallet:?}");
        assert!(debug_str.contains("WalletManager"));
        assert!(!debug_str.contains(HARDHAT_KEY_0.trim_start_matches("0x")));
    }
}
