use soroban_sdk::contracttype;

/// How much of a crowdsale contribution goes back to the contributor on claim.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RefundMode {
    /// The whole contribution is returned; tokens are distributed pro-rata.
    Full,
    /// The sale keeps a pro-rata share of the target and refunds the excess.
    OverTarget,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SalePhase {
    Pending,
    Open,
    Closed,
    Finalized,
}

/// Per-account record. Created on first contribution and never removed.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AccountEntry {
    /// Value currently held for the account (zeroed by a crowdsale claim).
    pub contributed: i128,
    /// Presale allocation the account started with, zero in a crowdsale.
    pub allocation: i128,
    pub remaining_allocation: i128,
    pub tokens_credited: i128,
    /// Crowdsale only: set once tokens and refund have been paid out.
    pub claimed: bool,
}

impl AccountEntry {
    pub fn with_allocation(allocation: i128) -> Self {
        AccountEntry {
            allocation,
            remaining_allocation: allocation,
            ..Default::default()
        }
    }

    pub fn has_allocation(&self) -> bool {
        self.allocation > 0
    }
}

/// Sale-wide aggregates.
///
/// `total_contributed` only ever grows and is the pro-rata denominator; value
/// leaving an account through a claim is tracked in `total_claimed`, so
/// `sum(contributed) + total_claimed == total_contributed` at all times.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SaleTotals {
    pub total_contributed: i128,
    pub total_claimed: i128,
    pub tokens_credited: i128,
    pub total_refunded: i128,
    pub participants: u32,
}

impl SaleTotals {
    /// Contributions not yet settled by a claim.
    pub fn outstanding(&self) -> i128 {
        self.total_contributed - self.total_claimed
    }
}
