use soroban_sdk::{contracttype, Env};

use crate::errors::SaleError;
use crate::types::SalePhase;

/// Block range during which a sale accepts contributions: `[start_block, end_block)`.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FundingWindow {
    pub start_block: u32,
    pub end_block: u32,
}

impl FundingWindow {
    pub fn new(start_block: u32, end_block: u32) -> Self {
        FundingWindow {
            start_block,
            end_block,
        }
    }

    pub fn validate(&self) -> Result<(), SaleError> {
        if self.start_block >= self.end_block {
            return Err(SaleError::InvalidConfig);
        }
        Ok(())
    }

    pub fn current_block(env: &Env) -> u32 {
        env.ledger().sequence()
    }

    pub fn is_open(&self, current_block: u32, finalized: bool) -> bool {
        !finalized && self.start_block <= current_block && current_block < self.end_block
    }

    pub fn has_ended(&self, current_block: u32) -> bool {
        current_block >= self.end_block
    }

    pub fn phase(&self, current_block: u32, finalized: bool) -> SalePhase {
        if finalized {
            SalePhase::Finalized
        } else if current_block < self.start_block {
            SalePhase::Pending
        } else if current_block < self.end_block {
            SalePhase::Open
        } else {
            SalePhase::Closed
        }
    }

    /// Gate for contributions.
    pub fn require_open(&self, current_block: u32, finalized: bool) -> Result<(), SaleError> {
        if !self.is_open(current_block, finalized) {
            return Err(SaleError::WindowClosed);
        }
        Ok(())
    }

    /// Gate for crowdsale claims.
    pub fn require_closed(&self, current_block: u32) -> Result<(), SaleError> {
        if !self.has_ended(current_block) {
            return Err(SaleError::NotClosed);
        }
        Ok(())
    }

    /// Gate for finalization.
    pub fn require_ended(&self, current_block: u32) -> Result<(), SaleError> {
        if !self.has_ended(current_block) {
            return Err(SaleError::StillOpen);
        }
        Ok(())
    }
}
