//! Ledger events, shaped like the standard Soroban token events so that
//! wallets and indexers decode them without a custom schema.

use soroban_sdk::{symbol_short, Address, Env};

/// Topic: `(mint, owner)`, data: `amount`.
pub fn emit_mint(env: &Env, owner: Address, amount: i128) {
    let topics = (symbol_short!("mint"), owner);
    env.events().publish(topics, amount);
}

/// Topic: `(transfer, from, to)`, data: `amount`.
pub fn emit_transfer(env: &Env, from: Address, to: Address, amount: i128) {
    let topics = (symbol_short!("transfer"), from, to);
    env.events().publish(topics, amount);
}

/// Topic: `(approve, from, spender)`, data: `(amount, expiration_ledger)`.
pub fn emit_approve(
    env: &Env,
    from: Address,
    spender: Address,
    amount: i128,
    expiration_ledger: u32,
) {
    let topics = (symbol_short!("approve"), from, spender);
    env.events().publish(topics, (amount, expiration_ledger));
}
