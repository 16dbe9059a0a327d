use soroban_sdk::{token, Address, Env};

pub fn transfer(env: &Env, token: &Address, from: &Address, to: &Address, amount: &i128) {
    let client = token::Client::new(env, token);
    client.transfer(from, to, amount);
}

pub fn balance(env: &Env, token: &Address, id: &Address) -> i128 {
    token::Client::new(env, token).balance(id)
}

/// Move `amount` out of the current contract's own balance.
pub fn pay_out(env: &Env, token: &Address, to: &Address, amount: i128) {
    if amount > 0 {
        transfer(env, token, &env.current_contract_address(), to, &amount);
    }
}
