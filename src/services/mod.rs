//! Business logic services module.

pub mod blockchain;
pub mod chain_registry;
pub mod gas_price;

pub use blockchain::{
    signature_message_hash, BlockchainService, ChainBlockchainService, PendingInvestmentsQuery,
};
pub use chain_registry::{ChainContext, ChainRegistry, ContractAccount};
pub use gas_price::{GasPriceFeedResponse, GasPriceService};
