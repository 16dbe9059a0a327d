use sale_core::{FundingWindow, SaleError};
use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,               // -> Address
    Config,              // -> PresaleConfig
    Verified,            // -> bool
    Finalized,           // -> bool
    Allocation(Address), // -> i128, fixed at initialization
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PresaleConfig {
    pub token: Address,
    pub payment_token: Address,
    pub deposit_address: Address,
    pub target_eth_min: i128,
    /// Together with `tokens_limit` this fixes the unit price.
    pub target_eth_max: i128,
    pub tokens_limit: i128,
    pub token_reserve: i128,
    pub window: FundingWindow,
}

impl PresaleConfig {
    /// Tokens the sale holds from initialization: everything sellable plus the reserve.
    pub fn total_supply(&self) -> Result<i128, SaleError> {
        self.tokens_limit
            .checked_add(self.token_reserve)
            .ok_or(SaleError::InvalidConfig)
    }
}
