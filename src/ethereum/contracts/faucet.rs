//! Faucet service contract bindings.

use alloy::{
    primitives::{Address, TxHash, U256},
    providers::DynProvider,
    sol,
};

use super::GasProvider;
use crate::error::Result;

sol! {
    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface IFaucetService {
        function faucet(address[] calldata _wallets) external;
        function release() external;
        function transferOwnership(address _newOwner) external;
        function updateBalanceThresholdForReward(uint256 _newBalanceThresholdForReward) external;
        function updateCallerStatus(address _caller, bool _approved) external;
        function updateRewardAmount(uint256 _newRewardAmount) external;
    }
}

/// Binding for `IFaucetService`. Every function is state-changing.
#[derive(Debug, Clone)]
pub struct FaucetService {
    contract: IFaucetService::IFaucetServiceInstance<DynProvider>,
    gas: GasProvider,
}

impl FaucetService {
    /// Bind to the faucet at `address`. No network access.
    pub fn load(address: Address, provider: DynProvider, gas: GasProvider) -> Self {
        Self { contract: IFaucetService::new(address, provider), gas }
    }

    /// Contract address.
    pub fn address(&self) -> Address {
        *self.contract.address()
    }

    /// Send the reward to each wallet below the balance threshold.
    pub async fn faucet(&self, wallets: Vec<Address>) -> Result<TxHash> {
        self.gas.submit(self.contract.faucet(wallets)).await
    }

    /// Withdraw the faucet's remaining funds to the owner.
    pub async fn release(&self) -> Result<TxHash> {
        self.gas.submit(self.contract.release()).await
    }

    pub async fn transfer_ownership(&self, new_owner: Address) -> Result<TxHash> {
        self.gas.submit(self.contract.transferOwnership(new_owner)).await
    }

    pub async fn update_balance_threshold_for_reward(&self, threshold: U256) -> Result<TxHash> {
        self.gas.submit(self.contract.updateBalanceThresholdForReward(threshold)).await
    }

    /// Allow or revoke `caller` as a faucet caller.
    pub async fn update_caller_status(&self, caller: Address, approved: bool) -> Result<TxHash> {
        self.gas.submit(self.contract.updateCallerStatus(caller, approved)).await
    }

    pub async fn update_reward_amount(&self, reward: U256) -> Result<TxHash> {
        self.gas.submit(self.contract.updateRewardAmount(reward)).await
    }
}
