//! Supported networks.

use std::fmt;

/// A network the contracts are deployed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chain {
    /// Polygon mainnet.
    MaticMain,
    /// Polygon Mumbai testnet.
    MaticTestnetMumbai,
    /// Ethereum mainnet.
    EthereumMain,
    /// Local hardhat node.
    HardhatTestnet,
}

impl Chain {
    /// Every supported chain.
    pub const ALL: [Chain; 4] =
        [Chain::MaticMain, Chain::MaticTestnetMumbai, Chain::EthereumMain, Chain::HardhatTestnet];

    /// Look up a chain by its numeric id.
    pub fn from_id(id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|chain| chain.id() == id)
    }

    /// Numeric chain id.
    pub fn id(self) -> u64 {
        match self {
            Chain::MaticMain => 137,
            Chain::MaticTestnetMumbai => 80001,
            Chain::EthereumMain => 1,
            Chain::HardhatTestnet => 31337,
        }
    }

    /// Public JSON-RPC endpoint.
    pub fn rpc_url(self) -> &'static str {
        match self {
            Chain::MaticMain => "https://rpc-mainnet.matic.network/",
            Chain::MaticTestnetMumbai => "https://rpc-mumbai.matic.today/",
            Chain::EthereumMain => "https://cloudflare-eth.com/",
            Chain::HardhatTestnet => "http://hardhat:8545",
        }
    }

    /// Infura endpoint prefix; the project id is appended.
    pub fn infura(self) -> Option<&'static str> {
        match self {
            Chain::MaticMain => Some("https://polygon-mainnet.infura.io/v3/"),
            Chain::MaticTestnetMumbai => Some("https://polygon-mumbai.infura.io/v3/"),
            Chain::EthereumMain => Some("https://mainnet.infura.io/v3/"),
            Chain::HardhatTestnet => None,
        }
    }

    /// Gas station feed returning gas prices in gwei.
    pub fn gas_price_feed(self) -> Option<&'static str> {
        match self {
            Chain::MaticMain => Some("https://gasstation-mainnet.matic.network"),
            Chain::MaticTestnetMumbai => Some("https://gasstation-mumbai.matic.today"),
            Chain::EthereumMain | Chain::HardhatTestnet => None,
        }
    }

    /// Prefix of the environment variables holding this chain's accounts.
    pub fn env_prefix(self) -> &'static str {
        match self {
            Chain::MaticMain => "CHAIN_MATIC",
            Chain::MaticTestnetMumbai => "CHAIN_MUMBAI",
            Chain::EthereumMain => "CHAIN_ETHEREUM",
            Chain::HardhatTestnet => "CHAIN_HARDHAT",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Chain::MaticMain => "MATIC_MAIN",
            Chain::MaticTestnetMumbai => "MATIC_TESTNET_MUMBAI",
            Chain::EthereumMain => "ETHEREUM_MAIN",
            Chain::HardhatTestnet => "HARDHAT_TESTNET",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id_known_chains() {
        assert_eq!(Chain::from_id(137), Some(Chain::MaticMain));
        assert_eq!(Chain::from_id(80001), Some(Chain::MaticTestnetMumbai));
        assert_eq!(Chain::from_id(1), Some(Chain::EthereumMain));
        assert_eq!(Chain::from_id(31337), Some(Chain::HardhatTestnet));
    }

    #[test]
    fn test_from_id_unknown_chain() {
        assert_eq!(Chain::from_id(5), None);
        assert_eq!(Chain::from_id(0), None);
    }

    #[test]
    fn test_only_polygon_has_gas_feed() {
        assert!(Chain::MaticMain.gas_price_feed().is_some());
        assert!(Chain::MaticTestnetMumbai.gas_price_feed().is_some());
        assert!(Chain::EthereumMain.gas_price_feed().is_none());
        assert!(Chain::HardhatTestnet.gas_price_feed().is_none());
    }

    #[test]
    fn test_hardhat_has_no_infura() {
        assert!(Chain::HardhatTestnet.infura().is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(Chain::MaticTestnetMumbai.to_string(), "MATIC_TESTNET_MUMBAI");
    }
}
