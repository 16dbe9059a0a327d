use soroban_sdk::{contractevent, Address};

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleInitializedEvent {
    #[topic]
    pub admin: Address,
    pub deposit_address: Address,
    pub target_eth: i128,
    pub total_supply: i128,
    pub start_block: u32,
    pub end_block: u32,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContributionEvent {
    #[topic]
    pub contributor: Address,
    pub amount: i128,
    pub total_contribution: i128,
    pub sale_total: i128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClaimEvent {
    #[topic]
    pub account: Address,
    pub contribution: i128,
    pub tokens: i128,
    pub refund: i128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FinaliseSaleEvent {
    #[topic]
    pub deposit_address: Address,
    pub value: i128,
    pub tokens: i128,
}
