use soroban_sdk::{contracttype, Address, Env};

use crate::errors::SaleError;
use crate::settlement::ClaimSettlement;
use crate::types::{AccountEntry, SaleTotals};

#[contracttype]
#[derive(Clone)]
pub enum LedgerKey {
    Account(Address), // -> AccountEntry
    Totals,           // -> SaleTotals
}

/// Proof that an account's contribution has been zeroed and persisted.
///
/// Only [`AccountLedger::clear_for_claim`] creates one, and the payout
/// consumes it by value, so a balance can be paid out at most once.
#[derive(Debug, Eq, PartialEq)]
pub struct WithdrawalReceipt {
    account: Address,
    amount: i128,
}

impl WithdrawalReceipt {
    pub fn account(&self) -> &Address {
        &self.account
    }

    pub fn amount(&self) -> i128 {
        self.amount
    }
}

impl AccountEntry {
    pub fn record_contribution(&mut self, accepted: i128) -> Result<(), SaleError> {
        if accepted <= 0 {
            return Err(SaleError::InvalidAmount);
        }
        if self.has_allocation() {
            if accepted > self.remaining_allocation {
                return Err(SaleError::CapExceeded);
            }
            self.remaining_allocation -= accepted;
        }
        self.contributed = self
            .contributed
            .checked_add(accepted)
            .ok_or(SaleError::MathOverflow)?;
        Ok(())
    }

    pub fn credit_tokens(&mut self, tokens: i128) -> Result<(), SaleError> {
        self.tokens_credited = self
            .tokens_credited
            .checked_add(tokens)
            .ok_or(SaleError::MathOverflow)?;
        Ok(())
    }

    /// Zero the contribution and mark the entry claimed, returning the prior amount.
    pub fn take_contribution(&mut self) -> Result<i128, SaleError> {
        if self.contributed <= 0 {
            return Err(SaleError::NothingToClaim);
        }
        let prior = self.contributed;
        self.contributed = 0;
        self.claimed = true;
        Ok(prior)
    }
}

/// Storage-backed view of every account entry plus the sale aggregates.
pub struct AccountLedger<'a> {
    env: &'a Env,
}

impl<'a> AccountLedger<'a> {
    pub fn new(env: &'a Env) -> Self {
        AccountLedger { env }
    }

    pub fn entry(&self, account: &Address) -> Option<AccountEntry> {
        self.env
            .storage()
            .persistent()
            .get(&LedgerKey::Account(account.clone()))
    }

    pub fn contribution_of(&self, account: &Address) -> i128 {
        self.entry(account).map(|entry| entry.contributed).unwrap_or(0)
    }

    pub fn totals(&self) -> SaleTotals {
        self.env
            .storage()
            .instance()
            .get(&LedgerKey::Totals)
            .unwrap_or_default()
    }

    /// Add `accepted` to the account and the sale total. `seed` is the entry
    /// to start from when the account has never contributed.
    pub fn record_contribution(
        &self,
        account: &Address,
        seed: AccountEntry,
        accepted: i128,
    ) -> Result<AccountEntry, SaleError> {
        let existing = self.entry(account);
        let first_contribution = existing.is_none();
        let mut entry = existing.unwrap_or(seed);
        entry.record_contribution(accepted)?;

        let mut totals = self.totals();
        totals.total_contributed = totals
            .total_contributed
            .checked_add(accepted)
            .ok_or(SaleError::MathOverflow)?;
        if first_contribution {
            totals.participants += 1;
        }

        self.save_entry(account, &entry);
        self.save_totals(&totals);
        Ok(entry)
    }

    /// Record tokens credited and value refunded outside of a claim (presale
    /// settlement happens on every contribution).
    pub fn record_credit(
        &self,
        account: &Address,
        tokens: i128,
        refunded: i128,
    ) -> Result<(), SaleError> {
        let mut entry = self.entry(account).ok_or(SaleError::NothingToClaim)?;
        entry.credit_tokens(tokens)?;

        let mut totals = self.totals();
        totals.tokens_credited = totals
            .tokens_credited
            .checked_add(tokens)
            .ok_or(SaleError::MathOverflow)?;
        totals.total_refunded = totals
            .total_refunded
            .checked_add(refunded)
            .ok_or(SaleError::MathOverflow)?;

        self.save_entry(account, &entry);
        self.save_totals(&totals);
        Ok(())
    }

    /// Read and zero the account's contribution in one step. The zeroed entry
    /// is written back before the receipt exists, so no transfer can observe
    /// a nonzero balance for an account that is being paid.
    pub fn clear_for_claim(&self, account: &Address) -> Result<WithdrawalReceipt, SaleError> {
        let mut entry = self.entry(account).ok_or(SaleError::NothingToClaim)?;
        let prior = entry.take_contribution()?;

        let mut totals = self.totals();
        totals.total_claimed = totals
            .total_claimed
            .checked_add(prior)
            .ok_or(SaleError::MathOverflow)?;

        self.save_entry(account, &entry);
        self.save_totals(&totals);

        Ok(WithdrawalReceipt {
            account: account.clone(),
            amount: prior,
        })
    }

    pub fn record_settlement(
        &self,
        receipt: &WithdrawalReceipt,
        settlement: &ClaimSettlement,
    ) -> Result<(), SaleError> {
        self.record_credit(receipt.account(), settlement.tokens, settlement.refund)
    }

    fn save_entry(&self, account: &Address, entry: &AccountEntry) {
        self.env
            .storage()
            .persistent()
            .set(&LedgerKey::Account(account.clone()), entry);
    }

    fn save_totals(&self, totals: &SaleTotals) {
        self.env.storage().instance().set(&LedgerKey::Totals, totals);
    }
}
