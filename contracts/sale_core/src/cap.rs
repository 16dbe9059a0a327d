use crate::errors::SaleError;
use crate::types::AccountEntry;

/// Outcome of a cap check: how much of the sent amount the sale keeps and
/// how much goes straight back to the sender.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Acceptance {
    pub accepted: i128,
    pub refund: i128,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CapPolicy {
    /// Crowdsale: one ceiling for every account. Exceeding it rejects the
    /// whole contribution.
    PerAccount { max_contribution: i128 },
    /// Presale: accept up to the account's remaining allocation and refund the rest.
    Allocation,
}

impl CapPolicy {
    pub fn accept(&self, entry: &AccountEntry, amount: i128) -> Result<Acceptance, SaleError> {
        if amount <= 0 {
            return Err(SaleError::InvalidAmount);
        }

        match *self {
            CapPolicy::PerAccount { max_contribution } => {
                let total = entry
                    .contributed
                    .checked_add(amount)
                    .ok_or(SaleError::MathOverflow)?;
                if total > max_contribution {
                    return Err(SaleError::CapExceeded);
                }
                Ok(Acceptance {
                    accepted: amount,
                    refund: 0,
                })
            }
            CapPolicy::Allocation => {
                if !entry.has_allocation() {
                    return Err(SaleError::NotAllocated);
                }
                if entry.remaining_allocation <= 0 {
                    return Err(SaleError::AllocationExhausted);
                }
                let accepted = amount.min(entry.remaining_allocation);
                Ok(Acceptance {
                    accepted,
                    refund: amount - accepted,
                })
            }
        }
    }
}
