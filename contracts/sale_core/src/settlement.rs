use soroban_sdk::{contracttype, log, Address, Env};

use crate::errors::SaleError;
use crate::ledger::WithdrawalReceipt;
use crate::math::{mul_div_ceil, mul_div_floor};
use crate::token;
use crate::types::{RefundMode, SaleTotals};

/// Crowdsale parameters that feed the claim computation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ClaimTerms {
    pub total_supply_available: i128,
    pub target_eth: i128,
    pub refund_mode: RefundMode,
}

/// What a crowdsale claim paid out.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClaimSettlement {
    pub tokens: i128,
    pub refund: i128,
}

/// Tokens bought by a presale contribution at `target_eth_max / tokens_limit`
/// per token, rounded down.
pub fn presale_tokens(
    accepted: i128,
    tokens_limit: i128,
    target_eth_max: i128,
) -> Result<i128, SaleError> {
    mul_div_floor(accepted, tokens_limit, target_eth_max)
}

/// Value the crowdsale hands to the deposit address on finalization.
pub fn crowdsale_payout(totals: &SaleTotals, terms: &ClaimTerms) -> i128 {
    match terms.refund_mode {
        RefundMode::Full => terms.target_eth,
        RefundMode::OverTarget => terms.target_eth.min(totals.total_contributed),
    }
}

/// Tokens and refund owed for a cleared crowdsale contribution.
///
/// `totals` must be read in the same invocation as the receipt; the
/// denominator is `total_contributed`, which claims never reduce.
pub fn claim_settlement(
    receipt: &WithdrawalReceipt,
    totals: &SaleTotals,
    terms: &ClaimTerms,
) -> Result<ClaimSettlement, SaleError> {
    let prior = receipt.amount();
    let total = totals.total_contributed;

    let tokens = mul_div_floor(prior, terms.total_supply_available, total)?;
    let refund = match terms.refund_mode {
        RefundMode::Full => prior,
        RefundMode::OverTarget => {
            let kept = mul_div_ceil(prior, crowdsale_payout(totals, terms), total)?;
            prior - kept.min(prior)
        }
    };

    Ok(ClaimSettlement { tokens, refund })
}

/// Pay out a crowdsale claim. Consumes the receipt.
pub fn pay_claim(
    env: &Env,
    sale_token: &Address,
    payment_token: &Address,
    receipt: WithdrawalReceipt,
    settlement: &ClaimSettlement,
) -> Result<(), SaleError> {
    log!(
        env,
        "claim settled",
        receipt.amount(),
        settlement.tokens,
        settlement.refund
    );
    refund(env, payment_token, receipt.account(), settlement.refund)?;
    token::pay_out(env, sale_token, receipt.account(), settlement.tokens);
    Ok(())
}

/// Return `amount` of payment token from the contract's escrow to `to`.
pub fn refund(env: &Env, payment_token: &Address, to: &Address, amount: i128) -> Result<(), SaleError> {
    if amount <= 0 {
        return Ok(());
    }
    let escrow = token::balance(env, payment_token, &env.current_contract_address());
    if escrow < amount {
        return Err(SaleError::InsufficientFundsForRefund);
    }
    token::pay_out(env, payment_token, to, amount);
    Ok(())
}

/// Release `payout` from escrow while keeping `owed` back for contributors
/// who have not been settled yet.
pub fn release_payout(
    env: &Env,
    payment_token: &Address,
    to: &Address,
    payout: i128,
    owed: i128,
) -> Result<(), SaleError> {
    let escrow = token::balance(env, payment_token, &env.current_contract_address());
    let available = escrow.checked_sub(owed).ok_or(SaleError::MathOverflow)?;
    if available < payout {
        return Err(SaleError::InsufficientFundsForPayout);
    }
    token::pay_out(env, payment_token, to, payout);
    Ok(())
}
