#![no_std]

//! Contribution accounting and settlement shared by the crowdsale and
//! presale contracts.

pub mod cap;
pub mod errors;
pub mod ledger;
pub mod math;
pub mod settlement;
pub mod token;
pub mod types;
pub mod window;

pub use cap::{Acceptance, CapPolicy};
pub use errors::SaleError;
pub use ledger::{AccountLedger, WithdrawalReceipt};
pub use settlement::{ClaimSettlement, ClaimTerms};
pub use types::{AccountEntry, RefundMode, SalePhase, SaleTotals};
pub use window::FundingWindow;
