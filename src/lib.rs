//! Identity Contracts Library
//!
//! Typed bindings for the issuer, investment service, faucet, wallet
//! approver and versioned contracts, the services that drive them across
//! chains, and a Model Context Protocol server exposing those services.
//!
//! # Features
//!
//! - **Bindings**: `sol!` interfaces with thin wrappers loaded from an address
//! - **Whitelisting**: Approve wallets on issuers through the wallet approver
//! - **Faucet**: Fund new wallets from the faucet service
//! - **Auto-invest**: Check and execute approved investments
//! - **Signatures**: ERC-1271 contract wallet signature checks
//!
//! # Example
//!
//! ```rust,ignore
//! use identity_contracts::{Config, IdentityContractsServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let server = IdentityContractsServer::new(config)?;
//!     // Run server...
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod ethereum;
pub mod mcp;
pub mod services;
pub mod types;

pub use config::Config;
pub use error::{AppError, Result};
pub use ethereum::{contracts::GasProvider, Chain};
pub use mcp::IdentityContractsServer;
pub use services::{BlockchainService, ChainBlockchainService};
