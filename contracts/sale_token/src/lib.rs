//! # Sale Token
//!
//! A fixed-supply fungible token ledger. The whole supply is minted once, at
//! deployment, to the deployer-chosen `owner`; afterwards balances only move
//! through `transfer` and `transfer_from`, so the sum of all balances always
//! equals `total_supply`.
//!
//! | Phase      | Entry Point(s)                                 |
//! |------------|------------------------------------------------|
//! | Deployment | [`SaleToken::__constructor`]                   |
//! | Movement   | `transfer`, `transfer_from`                    |
//! | Delegation | `approve`, `allowance`                         |
//! | Queries    | `balance`, `total_supply`, `decimals`, `name`, `symbol`, `owner` |
//!
//! The entry points mirror the corresponding `soroban_sdk::token::TokenInterface`
//! signatures, so other contracts drive this ledger with a plain
//! `soroban_sdk::token::Client`. There is no mint or burn after deployment.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, panic_with_error, Address, Env, String};

pub mod events;
mod storage;


use storage::TokenMetadata;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    InsufficientBalance = 1,
    InsufficientAllowance = 2,
    InvalidRecipient = 3,
    InvalidAmount = 4,
    InvalidExpiration = 5,
    Overflow = 6,
}

#[contract]
pub struct SaleToken;

#[contractimpl]
impl SaleToken {
    /// Create the ledger and credit the entire `total_supply` to `owner`.
    pub fn __constructor(
        env: Env,
        owner: Address,
        name: String,
        symbol: String,
        decimals: u32,
        total_supply: i128,
    ) {
        require_non_negative(&env, total_supply);

        storage::write_owner(&env, &owner);
        storage::write_metadata(
            &env,
            &TokenMetadata {
                name,
                symbol,
                decimals,
            },
        );
        storage::write_total_supply(&env, total_supply);
        storage::write_balance(&env, &owner, total_supply);

        events::emit_mint(&env, owner, total_supply);
    }

    // ─────────────────────────────────────────────────────────
    // Delegation
    // ─────────────────────────────────────────────────────────

    /// Remaining cap `spender` may move out of `from`'s balance.
    pub fn allowance(env: Env, from: Address, spender: Address) -> i128 {
        storage::read_allowance(&env, &from, &spender).amount
    }

    /// Set (overwrite, not add to) the cap `spender` may move on behalf of `from`.
    ///
    /// A non-zero cap must carry an `expiration_ledger` that has not already
    /// passed. No balance check is made here; `transfer_from` enforces it.
    pub fn approve(
        env: Env,
        from: Address,
        spender: Address,
        amount: i128,
        expiration_ledger: u32,
    ) {
        from.require_auth();
        require_non_negative(&env, amount);

        if amount > 0 && expiration_ledger < env.ledger().sequence() {
            panic_with_error!(&env, Error::InvalidExpiration);
        }

        storage::write_allowance(&env, &from, &spender, amount, expiration_ledger);
        events::emit_approve(&env, from, spender, amount, expiration_ledger);
    }

    // ─────────────────────────────────────────────────────────
    // Movement
    // ─────────────────────────────────────────────────────────

    pub fn balance(env: Env, id: Address) -> i128 {
        storage::read_balance(&env, &id)
    }

    /// Move `amount` from `from` to `to`. `from` must authorize.
    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) {
        from.require_auth();
        require_non_negative(&env, amount);

        move_balance(&env, &from, &to, amount);
        events::emit_transfer(&env, from, to, amount);
    }

    /// Move `amount` from `from` to `to` on `from`'s behalf, consuming
    /// `spender`'s allowance. `spender` must authorize.
    pub fn transfer_from(env: Env, spender: Address, from: Address, to: Address, amount: i128) {
        spender.require_auth();
        require_non_negative(&env, amount);
        require_valid_recipient(&env, &to);

        let allowance = storage::read_allowance(&env, &from, &spender);
        if allowance.amount < amount {
            panic_with_error!(&env, Error::InsufficientAllowance);
        }

        move_balance(&env, &from, &to, amount);

        if amount > 0 {
            storage::write_allowance(
                &env,
                &from,
                &spender,
                allowance.amount - amount,
                allowance.expiration_ledger,
            );
        }
        events::emit_transfer(&env, from, to, amount);
    }

    // ─────────────────────────────────────────────────────────
    // Metadata
    // ─────────────────────────────────────────────────────────

    pub fn total_supply(env: Env) -> i128 {
        storage::read_total_supply(&env)
    }

    pub fn decimals(env: Env) -> u32 {
        storage::read_metadata(&env).decimals
    }

    pub fn name(env: Env) -> String {
        storage::read_metadata(&env).name
    }

    pub fn symbol(env: Env) -> String {
        storage::read_metadata(&env).symbol
    }

    /// The address the supply was minted to.
    pub fn owner(env: Env) -> Address {
        storage::read_owner(&env)
    }
}

// ─────────────────────────────────────────────────────────
// Internal helpers
// ─────────────────────────────────────────────────────────

fn require_non_negative(env: &Env, amount: i128) {
    if amount < 0 {
        panic_with_error!(env, Error::InvalidAmount);
    }
}

/// The ledger's own address is a sink: nothing can ever authorize a
/// transfer out of it, so tokens sent there would be lost.
fn require_valid_recipient(env: &Env, to: &Address) {
    if *to == env.current_contract_address() {
        panic_with_error!(env, Error::InvalidRecipient);
    }
}

/// Debit `from` and credit `to`, preserving the supply.
fn move_balance(env: &Env, from: &Address, to: &Address, amount: i128) {
    require_valid_recipient(env, to);

    let from_balance = storage::read_balance(env, from);
    if from_balance < amount {
        panic_with_error!(env, Error::InsufficientBalance);
    }
    if from == to {
        return;
    }

    let to_balance = storage::read_balance(env, to)
        .checked_add(amount)
        .unwrap_or_else(|| panic_with_error!(env, Error::Overflow));

    storage::write_balance(env, from, from_balance - amount);
    storage::write_balance(env, to, to_balance);
}
