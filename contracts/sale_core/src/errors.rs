use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum SaleError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    InvalidConfig = 5,
    /// Contribution outside `[start_block, end_block)` or after finalization.
    WindowClosed = 6,
    /// Finalization attempted before the end block.
    StillOpen = 7,
    /// Claim attempted before the end block.
    NotClosed = 8,
    CapExceeded = 9,
    /// The account has no presale allocation at all.
    NotAllocated = 10,
    /// The account's presale allocation is used up.
    AllocationExhausted = 11,
    NotVerified = 12,
    NothingToClaim = 13,
    AlreadyFinalized = 14,
    InsufficientFundsForRefund = 15,
    InsufficientFundsForPayout = 16,
    MathOverflow = 17,
    DivisionByZero = 18,
}
