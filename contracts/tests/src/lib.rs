#![cfg(test)]
extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token::{StellarAssetClient, TokenClient},
    Address, Env, Map,
};
use std::vec::Vec;

use crowdsale::{CrowdsaleConfig, CrowdsaleContract, CrowdsaleContractClient as CrowdsaleClient};
use presale::{PresaleConfig, PresaleContract, PresaleContractClient as PresaleClient};
use sale_core::{FundingWindow, RefundMode, SaleError};

const ETHER: i128 = 1_000_000_000_000_000_000;
const START_BLOCK: u32 = 1_000;
const END_BLOCK: u32 = 1_100;

// Crowdsale parameters
const TARGET_ETH: i128 = 5 * ETHER;
const MAX_CONTRIBUTION: i128 = 5 * ETHER;
const TOTAL_SUPPLY: i128 = 1_000_000_000_000_000;
const TOKEN_RESERVE: i128 = 200_000_000_000_000;
const AVAILABLE: i128 = TOTAL_SUPPLY - TOKEN_RESERVE;

fn create_token_contract<'a>(env: &Env, admin: &Address) -> (TokenClient<'a>, StellarAssetClient<'a>) {
    let contract_address = env.register_stellar_asset_contract_v2(admin.clone());
    (
        TokenClient::new(env, &contract_address.address()),
        StellarAssetClient::new(env, &contract_address.address()),
    )
}

/// 1, max, 1.33333945012327895 and 0.5 ether.
fn scenario_contributions() -> [i128; 4] {
    [ETHER, MAX_CONTRIBUTION, 1_333_339_450_123_278_950, ETHER / 2]
}

struct Crowdsale<'a> {
    client: CrowdsaleClient<'a>,
    contract_id: Address,
    deposit: Address,
    token: TokenClient<'a>,
    payment: TokenClient<'a>,
    payment_admin: StellarAssetClient<'a>,
    contributors: Vec<Address>,
}

fn launch_crowdsale<'a>(env: &Env, refund_mode: RefundMode) -> Crowdsale<'a> {
    let admin = Address::generate(env);
    let deposit = Address::generate(env);

    let (token, token_admin) = create_token_contract(env, &admin);
    token_admin.mint(&admin, &TOTAL_SUPPLY);
    let (payment, payment_admin) = create_token_contract(env, &admin);

    let contract_id = env.register(CrowdsaleContract, ());
    let client = CrowdsaleClient::new(env, &contract_id);
    client.initialize(
        &admin,
        &CrowdsaleConfig {
            token: token.address.clone(),
            payment_token: payment.address.clone(),
            deposit_address: deposit.clone(),
            target_eth: TARGET_ETH,
            max_contribution_per_account: MAX_CONTRIBUTION,
            total_supply: TOTAL_SUPPLY,
            token_reserve: TOKEN_RESERVE,
            window: FundingWindow::new(START_BLOCK, END_BLOCK),
            refund_mode,
        },
    );

    let contributors = (0..4)
        .map(|_| {
            let contributor = Address::generate(env);
            payment_admin.mint(&contributor, &(10 * ETHER));
            contributor
        })
        .collect();

    Crowdsale {
        client,
        contract_id,
        deposit,
        token,
        payment,
        payment_admin,
        contributors,
    }
}

fn contribute_scenario(env: &Env, sale: &Crowdsale) -> i128 {
    env.ledger().set_sequence_number(START_BLOCK);
    for (contributor, amount) in sale.contributors.iter().zip(scenario_contributions()) {
        sale.client.contribute(contributor, &amount);
    }
    scenario_contributions().iter().sum()
}

#[test]
fn test_crowdsale_full_refund_e2e() {
    let env = Env::default();
    env.mock_all_auths();

    let sale = launch_crowdsale(&env, RefundMode::Full);
    let total = contribute_scenario(&env, &sale);
    assert_eq!(sale.client.get_totals().total_contributed, total);
    assert_eq!(sale.payment.balance(&sale.contract_id), total);

    // Still running: nobody can settle yet
    let result = sale.client.try_claim(&sale.contributors[0]);
    assert_eq!(result, Err(Ok(SaleError::NotClosed)));
    let result = sale.client.try_finalize(&sale.deposit);
    assert_eq!(result, Err(Ok(SaleError::StillOpen)));

    env.ledger().set_sequence_number(END_BLOCK);

    let mut distributed = 0;
    for (contributor, amount) in sale.contributors.iter().zip(scenario_contributions()) {
        let paid = sale.client.claim(contributor);

        assert_eq!(paid.refund, amount);
        assert_eq!(paid.tokens, amount * AVAILABLE / total);
        assert_eq!(sale.payment.balance(contributor), 10 * ETHER);
        assert_eq!(sale.token.balance(contributor), paid.tokens);
        distributed += paid.tokens;
    }
    assert!(distributed + TOKEN_RESERVE <= TOTAL_SUPPLY);

    // Shares follow contributions
    let first = sale.token.balance(&sale.contributors[0]);
    let second = sale.token.balance(&sale.contributors[1]);
    assert!((first * 5 - second).abs() <= 5);

    let totals = sale.client.get_totals();
    assert_eq!(totals.total_claimed, total);
    assert_eq!(totals.outstanding(), 0);

    // Refunds emptied the escrow, so the target has to be provided
    let result = sale.client.try_finalize(&sale.deposit);
    assert_eq!(result, Err(Ok(SaleError::InsufficientFundsForPayout)));
    sale.payment_admin.mint(&sale.contract_id, &TARGET_ETH);

    assert_eq!(sale.client.finalize(&sale.deposit), TARGET_ETH);
    assert_eq!(sale.payment.balance(&sale.deposit), TARGET_ETH);
    assert_eq!(sale.token.balance(&sale.deposit), TOKEN_RESERVE);

    let result = sale.client.try_finalize(&sale.deposit);
    assert_eq!(result, Err(Ok(SaleError::AlreadyFinalized)));
}

#[test]
fn test_crowdsale_over_target_e2e() {
    let env = Env::default();
    env.mock_all_auths();

    let sale = launch_crowdsale(&env, RefundMode::OverTarget);
    let total = contribute_scenario(&env, &sale);
    assert!(total > TARGET_ETH);

    env.ledger().set_sequence_number(END_BLOCK + 1);

    let outsider = Address::generate(&env);
    let result = sale.client.try_finalize(&outsider);
    assert_eq!(result, Err(Ok(SaleError::Unauthorized)));

    // Finalizing first must leave enough behind for every refund
    assert_eq!(sale.client.finalize(&sale.deposit), TARGET_ETH);
    assert_eq!(sale.payment.balance(&sale.deposit), TARGET_ETH);

    let mut refunded = 0;
    for (contributor, amount) in sale.contributors.iter().zip(scenario_contributions()) {
        let paid = sale.client.claim(contributor);
        let kept = (amount * TARGET_ETH + total - 1) / total;

        assert_eq!(paid.refund, amount - kept);
        assert_eq!(paid.tokens, amount * AVAILABLE / total);
        assert_eq!(sale.payment.balance(contributor), 10 * ETHER - kept);
        refunded += paid.refund;

        let result = sale.client.try_claim(contributor);
        assert_eq!(result, Err(Ok(SaleError::NothingToClaim)));
    }

    // Only rounding dust stays in escrow
    let dust = sale.payment.balance(&sale.contract_id);
    assert_eq!(dust, total - TARGET_ETH - refunded);
    assert!(dust >= 0 && dust < 4);
    assert_eq!(sale.client.get_totals().total_refunded, refunded);
}

#[test]
fn test_presale_e2e() {
    let env = Env::default();
    env.mock_all_auths();

    let target_eth_max = 20 * ETHER;
    let tokens_limit: i128 = 500_000_000_000_000;
    let token_reserve: i128 = 100_000_000_000_000;

    let admin = Address::generate(&env);
    let deposit = Address::generate(&env);
    let early = Address::generate(&env);
    let late = Address::generate(&env);

    let (token, token_admin) = create_token_contract(&env, &admin);
    token_admin.mint(&admin, &(tokens_limit + token_reserve));
    let (payment, payment_admin) = create_token_contract(&env, &admin);
    payment_admin.mint(&early, &(10 * ETHER));
    payment_admin.mint(&late, &(10 * ETHER));

    let contract_id = env.register(PresaleContract, ());
    let client = PresaleClient::new(&env, &contract_id);

    let mut allocations = Map::new(&env);
    allocations.set(early.clone(), 4 * ETHER);
    allocations.set(late.clone(), 6 * ETHER);

    client.initialize(
        &admin,
        &PresaleConfig {
            token: token.address.clone(),
            payment_token: payment.address.clone(),
            deposit_address: deposit.clone(),
            target_eth_min: 5 * ETHER,
            target_eth_max,
            tokens_limit,
            token_reserve,
            window: FundingWindow::new(START_BLOCK, END_BLOCK),
        },
        &allocations,
    );

    env.ledger().set_sequence_number(START_BLOCK + 10);
    let result = client.try_contribute(&early, &ETHER);
    assert_eq!(result, Err(Ok(SaleError::NotVerified)));

    client.verify_deposit_address(&admin);

    // Overpays and gets the difference straight back
    let purchase = client.contribute(&early, &(7 * ETHER));
    assert_eq!(purchase.accepted, 4 * ETHER);
    assert_eq!(purchase.refund, 3 * ETHER);
    assert_eq!(token.balance(&early), 4 * ETHER * tokens_limit / target_eth_max);
    assert_eq!(payment.balance(&early), 6 * ETHER);

    // Fills in two steps
    client.contribute(&late, &(2 * ETHER));
    client.contribute(&late, &(4 * ETHER));
    assert_eq!(token.balance(&late), 6 * ETHER * tokens_limit / target_eth_max);
    assert_eq!(client.get_remaining_allocation(&late), 0);
    assert_eq!(client.get_allocation(&late), 6 * ETHER);

    env.ledger().set_sequence_number(END_BLOCK);
    let raised = client.finalize(&deposit);

    assert_eq!(raised, 10 * ETHER);
    assert_eq!(payment.balance(&deposit), raised);
    let sold = client.get_totals().tokens_credited;
    assert_eq!(token.balance(&deposit), token_reserve + tokens_limit - sold);
    assert_eq!(token.balance(&contract_id), 0);
}
