#![no_std]

mod events;
mod storage;

use events::{ClaimEvent, ContributionEvent, FinaliseSaleEvent, SaleInitializedEvent};
use sale_core::{
    settlement, token, AccountEntry, AccountLedger, CapPolicy, ClaimSettlement, ClaimTerms,
    FundingWindow, RefundMode, SaleError, SalePhase, SaleTotals,
};
use soroban_sdk::{contract, contractimpl, Address, Env};
use storage::DataKey;

pub use storage::CrowdsaleConfig;

#[contract]
pub struct CrowdsaleContract;

fn load_config(env: &Env) -> Result<CrowdsaleConfig, SaleError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(SaleError::NotInitialized)
}

fn load_finalized(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Finalized)
        .unwrap_or(false)
}

fn claim_terms(config: &CrowdsaleConfig) -> ClaimTerms {
    ClaimTerms {
        total_supply_available: config.total_supply_available(),
        target_eth: config.target_eth,
        refund_mode: config.refund_mode,
    }
}

fn validate_config(config: &CrowdsaleConfig) -> Result<(), SaleError> {
    config.window.validate()?;
    if config.target_eth <= 0
        || config.max_contribution_per_account <= 0
        || config.total_supply <= 0
    {
        return Err(SaleError::InvalidConfig);
    }
    // Contributors must have something to share.
    if config.token_reserve < 0 || config.token_reserve >= config.total_supply {
        return Err(SaleError::InvalidConfig);
    }
    Ok(())
}

#[contractimpl]
impl CrowdsaleContract {
    /// Configure the sale and move the full token supply from `admin` into
    /// the contract.
    pub fn initialize(env: Env, admin: Address, config: CrowdsaleConfig) -> Result<(), SaleError> {
        // Check if already initialized
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(SaleError::AlreadyInitialized);
        }

        // Require admin authorization
        admin.require_auth();
        validate_config(&config)?;

        // Move the full supply into the sale
        token::transfer(
            &env,
            &config.token,
            &admin,
            &env.current_contract_address(),
            &config.total_supply,
        );

        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Config, &config);
        env.storage().instance().set(&DataKey::Finalized, &false);

        SaleInitializedEvent {
            admin,
            deposit_address: config.deposit_address,
            target_eth: config.target_eth,
            total_supply: config.total_supply,
            start_block: config.window.start_block,
            end_block: config.window.end_block,
        }
        .publish(&env);

        Ok(())
    }

    /// Record a contribution while the window is open. Returns the
    /// contributor's running total.
    pub fn contribute(env: Env, contributor: Address, amount: i128) -> Result<i128, SaleError> {
        let config = load_config(&env)?;

        // Require contributor authorization
        contributor.require_auth();

        let current_block = FundingWindow::current_block(&env);
        config
            .window
            .require_open(current_block, load_finalized(&env))?;

        // Enforce the per-account cap against the running total
        let ledger = AccountLedger::new(&env);
        let current = ledger.entry(&contributor).unwrap_or_default();
        let policy = CapPolicy::PerAccount {
            max_contribution: config.max_contribution_per_account,
        };
        let acceptance = policy.accept(&current, amount)?;

        // Escrow the contribution
        token::transfer(
            &env,
            &config.payment_token,
            &contributor,
            &env.current_contract_address(),
            &acceptance.accepted,
        );

        let entry = ledger.record_contribution(
            &contributor,
            AccountEntry::default(),
            acceptance.accepted,
        )?;

        ContributionEvent {
            contributor,
            amount: acceptance.accepted,
            total_contribution: entry.contributed,
            sale_total: ledger.totals().total_contributed,
        }
        .publish(&env);

        Ok(entry.contributed)
    }

    /// Pay out the caller's pro-rata tokens and refund once the window has closed.
    pub fn claim(env: Env, account: Address) -> Result<ClaimSettlement, SaleError> {
        let config = load_config(&env)?;

        // Require account authorization
        account.require_auth();

        config
            .window
            .require_closed(FundingWindow::current_block(&env))?;

        // Zero the entry before anything is paid
        let ledger = AccountLedger::new(&env);
        let receipt = ledger.clear_for_claim(&account)?;
        let contribution = receipt.amount();

        let owed = settlement::claim_settlement(&receipt, &ledger.totals(), &claim_terms(&config))?;
        ledger.record_settlement(&receipt, &owed)?;
        settlement::pay_claim(
            &env,
            &config.token,
            &config.payment_token,
            receipt,
            &owed,
        )?;

        ClaimEvent {
            account,
            contribution,
            tokens: owed.tokens,
            refund: owed.refund,
        }
        .publish(&env);

        Ok(owed)
    }

    /// Close the sale: pay the target to the deposit address and credit it
    /// the token reserve. Returns the value paid.
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
        if load_finalized(&env) {
            return Err(SaleError::AlreadyFinalized);
        }

        let totals = AccountLedger::new(&env).totals();
        let payout = settlement::crowdsale_payout(&totals, &claim_terms(&config));
        // Unclaimed refunds stay in escrow
        let owed = match config.refund_mode {
            RefundMode::Full => totals.outstanding(),
            RefundMode::OverTarget => 0,
        };

        env.storage().instance().set(&DataKey::Finalized, &true);

        settlement::release_payout(&env, &config.payment_token, &caller, payout, owed)?;
        token::pay_out(&env, &config.token, &caller, config.token_reserve);

        FinaliseSaleEvent {
            deposit_address: caller,
            value: payout,
            tokens: config.token_reserve,
        }
        .publish(&env);

        Ok(payout)
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

    pub fn get_config(env: Env) -> Result<CrowdsaleConfig, SaleError> {
        load_config(&env)
    }

    pub fn get_admin(env: Env) -> Result<Address, SaleError> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(SaleError::NotInitialized)
    }

    pub fn get_phase(env: Env) -> Result<SalePhase, SaleError> {
        let config = load_config(&env)?;
        Ok(config
            .window
            .phase(FundingWindow::current_block(&env), load_finalized(&env)))
    }

    pub fn is_open(env: Env) -> Result<bool, SaleError> {
        let config = load_config(&env)?;
        Ok(config
            .window
            .is_open(FundingWindow::current_block(&env), load_finalized(&env)))
    }

    pub fn is_finalized(env: Env) -> bool {
        load_finalized(&env)
    }

    pub fn total_supply_available(env: Env) -> Result<i128, SaleError> {
        Ok(load_config(&env)?.total_supply_available())
    }

    pub fn max_contribution(env: Env) -> Result<i128, SaleError> {
        Ok(load_config(&env)?.max_contribution_per_account)
    }
}
