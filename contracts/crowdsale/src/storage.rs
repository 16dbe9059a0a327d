use sale_core::{FundingWindow, RefundMode};
use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,     // -> Address
    Config,    // -> CrowdsaleConfig
    Finalized, // -> bool
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CrowdsaleConfig {
    /// Token distributed pro-rata at claim time.
    pub token: Address,
    /// Token contributions are paid in.
    pub payment_token: Address,
    /// Receives the raised value and the token reserve on finalization.
    pub deposit_address: Address,
    pub target_eth: i128,
    pub max_contribution_per_account: i128,
    pub total_supply: i128,
    /// Held back from contributors and credited to the deposit address.
    pub token_reserve: i128,
    pub window: FundingWindow,
    pub refund_mode: RefundMode,
}

impl CrowdsaleConfig {
    pub fn total_supply_available(&self) -> i128 {
        self.total_supply - self.token_reserve
    }
}
