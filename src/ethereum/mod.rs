//! Ethereum interaction module.
//!
//! Contains the supported chains, the RPC client, wallet management and the
//! contract bindings.

pub mod chain;
pub mod client;
pub mod contracts;
pub mod wallet;

pub use chain::Chain;
pub use client::EthereumClient;
pub use wallet::WalletManager;
