use soroban_sdk::{contractevent, Address};

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PresaleInitializedEvent {
    #[topic]
    pub admin: Address,
    pub deposit_address: Address,
    pub target_eth_max: i128,
    pub tokens_limit: i128,
    pub participants: u32,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositAddressVerifiedEvent {
    #[topic]
    pub deposit_address: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContributionEvent {
    #[topic]
    pub contributor: Address,
    pub amount: i128,
    pub tokens: i128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RefundEvent {
    #[topic]
    pub contributor: Address,
    pub amount: i128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FinaliseSaleEvent {
    #[topic]
    pub deposit_address: Address,
    pub value: i128,
    pub tokens: i128,
    pub unsold_tokens: i128,
}
