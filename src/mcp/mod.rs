//! MCP server module.
//!
//! Contains the MCP server implementation with tool handlers.

pub mod server;

pub use server::IdentityContractsServer;
pub use server::{
    AutoInvestInput, ContractInput, GetPendingInvestmentsInput, InvestmentInput, IsMinedInput,
    IsWhitelistedInput, SendFaucetFundsInput, VerifyContractSignatureInput,
    WhitelistAddressesInput,
};
