#![no_std]

mod events;
mod storage;

use events::{
    ContributionEvent, DepositAddressVerifiedEvent, FinaliseSaleEvent, PresaleInitializedEvent,
    RefundEvent,
};
use sale_core::{
    settlement, token, AccountEntry, AccountLedger, CapPolicy, FundingWindow, SaleError,
    SalePhase, SaleTotals,
};
use soroban_sdk::{contract, contracttype, contractimpl, Address, Env, Map};
use storage::DataKey;

pub use storage::PresaleConfig;

/// Result of a single presale contribution, settled in the same call.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Purchase {
    pub accepted: i128,
    pub refund: i128,
    pub tokens: i128,
}

#[contract]
pub struct PresaleContract;

fn load_config(env: &Env) -> Result<PresaleConfig, SaleError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(SaleError::NotInitialized)
}

fn load_admin(env: &Env) -> Result<Address, SaleError> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(SaleError::NotInitialized)
}

fn load_flag(env: &Env, key: &DataKey) -> bool {
    env.storage().instance().get(key).unwrap_or(false)
}

fn allocation_of(env: &Env, account: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Allocation(account.clone()))
        .unwrap_or(0)
}

fn validate_config(config: &PresaleConfig) -> Result<(), SaleError> {
    config.window.validate()?;
    if config.target_eth_min <= 0
        || config.target_eth_min > config.target_eth_max
        || config.tokens_limit <= 0
        || config.token_reserve < 0
    {
        return Err(SaleError::InvalidConfig);
    }
    config.total_supply()?;
    Ok(())
}

#[contractimpl]
impl PresaleContract {
    /// Configure the presale, fix every participant's allocation and move
    /// `tokens_limit + token_reserve` tokens from `admin` into the contract.
    pub fn initialize(
        env: Env,
        admin: Address,
        config: PresaleConfig,
        allocations: Map<Address, i128>,
    ) -> Result<(), SaleError> {
        // Check if already initialized
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(SaleError::AlreadyInitialized);
        }

        admin.require_auth();
        validate_config(&config)?;

        // Allocations may never promise more than the sale can sell.
        let mut allocated: i128 = 0;
        for (account, allocation) in allocations.iter() {
            if allocation <= 0 {
                return Err(SaleError::InvalidConfig);
            }
            allocated = allocated
                .checked_add(allocation)
                .ok_or(SaleError::MathOverflow)?;
            env.storage()
                .persistent()
                .set(&DataKey::Allocation(account), &allocation);
        }
        if allocated > config.target_eth_max {
            return Err(SaleError::InvalidConfig);
        }

        // Fund the sale with every sellable token plus the reserve
        token::transfer(
            &env,
            &config.token,
            &admin,
            &env.current_contract_address(),
            &config.total_supply()?,
        );

        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Config, &config);
        env.storage().instance().set(&DataKey::Verified, &false);
        env.storage().instance().set(&DataKey::Finalized, &false);

        PresaleInitializedEvent {
            admin,
            deposit_address: config.deposit_address,
            target_eth_max: config.target_eth_max,
            tokens_limit: config.tokens_limit,
            participants: allocations.len(),
        }
        .publish(&env);

        Ok(())
    }

    /// Confirm the deposit address. Contributions are refused until this has
    /// been called, and it cannot be undone.
    pub fn verify_deposit_address(env: Env, caller: Address) -> Result<(), SaleError> {
        let admin = load_admin(&env)?;
        if caller != admin {
            return Err(SaleError::Unauthorized);
        }
        caller.require_auth();

        let config = load_config(&env)?;

        // One-way latch
        env.storage().instance().set(&DataKey::Verified, &true);

        DepositAddressVerifiedEvent {
            deposit_address: config.deposit_address,
        }
        .publish(&env);

        Ok(())
    }

    /// Buy tokens against the contributor's allocation. Anything sent above
    /// the remaining allocation is returned in the same call.
    pub fn contribute(env: Env, contributor: Address, amount: i128) -> Result<Purchase, SaleError> {
        let config = load_config(&env)?;

        // Require contributor authorization
        contributor.require_auth();

        let current_block = FundingWindow::current_block(&env);
        config
            .window
            .require_open(current_block, load_flag(&env, &DataKey::Finalized))?;
        if !load_flag(&env, &DataKey::Verified) {
            return Err(SaleError::NotVerified);
        }

        // Split the amount into the part the allocation takes and the excess
        let ledger = AccountLedger::new(&env);
        let seed = AccountEntry::with_allocation(allocation_of(&env, &contributor));
        let current = ledger.entry(&contributor).unwrap_or_else(|| seed.clone());
        let acceptance = CapPolicy::Allocation.accept(&current, amount)?;

        // Pull the full amount; the excess goes back below
        token::transfer(
            &env,
            &config.payment_token,
            &contributor,
            &env.current_contract_address(),
            &amount,
        );

        ledger.record_contribution(&contributor, seed, acceptance.accepted)?;
        let tokens = settlement::presale_tokens(
            acceptance.accepted,
            config.tokens_limit,
            config.target_eth_max,
        )?;
        ledger.record_credit(&contributor, tokens, acceptance.refund)?;

        // Settle immediately: tokens out, overpayment back
        token::pay_out(&env, &config.token, &contributor, tokens);
        settlement::refund(&env, &config.payment_token, &contributor, acceptance.refund)?;

        ContributionEvent {
            contributor: contributor.clone(),
            amount: acceptance.accepted,
            tokens,
        }
        .publish(&env);
        if acceptance.refund > 0 {
            RefundEvent {
                contributor,
                amount: acceptance.refund,
            }
            .publish(&env);
        }

        Ok(Purchase {
            accepted: acceptance.accepted,
            refund: acceptance.refund,
            tokens,
        })
    }

    /// Release everything raised, the token reserve and any unsold tokens to
    /// the deposit address.
    pub fn finalize(env: Env, caller: Address) -> Result<i128, SaleError> {
        let config = load_config(&env)?;

        // Only the deposit address can close the sale
        if caller != config.deposit_address {
            return Err(SaleError::Unauthorized);
        }
        caller.require_auth();

        config
            .window
            .require_ended(FundingWindow::current_block(&env))?;
        if load_flag(&env, &DataKey::Finalized) {
            return Err(SaleError::AlreadyFinalized);
        }
        if !load_flag(&env, &DataKey::Verified) {
            return Err(SaleError::NotVerified);
        }

        let totals = AccountLedger::new(&env).totals();
        let payout = totals.total_contributed;
        let unsold = config
            .tokens_limit
            .checked_sub(totals.tokens_credited)
            .ok_or(SaleError::MathOverflow)?;
        env.storage().instance().set(&DataKey::Finalized, &true);

        // Nothing is owed back after close, so the whole escrow goes out
        settlement::release_payout(&env, &config.payment_token, &caller, payout, 0)?;
        token::pay_out(&env, &config.token, &caller, config.token_reserve);
        token::pay_out(&env, &config.token, &caller, unsold);

        FinaliseSaleEvent {
            deposit_address: caller,
            value: payout,
            tokens: config.token_reserve,
            unsold_tokens: unsold,
        }
        .publish(&env);

        Ok(payout)
    }

    /// Allocation the account was whitelisted with. Partial fills do not
    /// change it.
    pub fn get_allocation(env: Env, account: Address) -> i128 {
        allocation_of(&env, &account)
    }

    /// Allocation the account can still fill.
    pub fn get_remaining_allocation(env: Env, account: Address) -> i128 {
        match AccountLedger::new(&env).entry(&account) {
            Some(entry) => entry.remaining_allocation,
            None => allocation_of(&env, &account),
        }
    }

    pub fn get_contribution(env: Env, account: Address) -> i128 {
        AccountLedger::new(&env).contribution_of(&account)
    }

    pub fn get_account(env: Env, account: Address) -> Option<AccountEntry> {
        AccountLedger::new(&env).entry(&account)
    }

    pub fn get_totals(env: Env) -> SaleTotals {
        AccountLedger::new(&env).totals()
    }

    pub fn get_config(env: Env) -> Result<PresaleConfig, SaleError> {
        load_config(&env)
    }

    pub fn get_admin(env: Env) -> Result<Address, SaleError> {
        load_admin(&env)
    }

    pub fn get_phase(env: Env) -> Result<SalePhase, SaleError> {
        let config = load_config(&env)?;
        Ok(config.window.phase(
            FundingWindow::current_block(&env),
            load_flag(&env, &DataKey::Finalized),
        ))
    }

    pub fn is_open(env: Env) -> Result<bool, SaleError> {
        let config = load_config(&env)?;
        Ok(config.window.is_open(
            FundingWindow::current_block(&env),
            load_flag(&env, &DataKey::Finalized),
        ))
    }

    pub fn is_finalized(env: Env) -> bool {
        load_flag(&env, &DataKey::Finalized)
    }

    pub fn is_deposit_address_verified(env: Env) -> bool {
        load_flag(&env, &DataKey::Verified)
    }

    /// Tokens `amount` would buy at the sale price, ignoring allocations.
    pub fn quote_tokens(env: Env, amount: i128) -> Result<i128, SaleError> {
        let config = load_config(&env)?;
        settlement::presale_tokens(amount, config.tokens_limit, config.target_eth_max)
    }
}
