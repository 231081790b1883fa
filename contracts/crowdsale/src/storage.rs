//! # Storage
//!
//! Typed helpers over the two storage tiers used by the crowdsale.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key            | Type         | Description                          |
//! |----------------|--------------|--------------------------------------|
//! | `Token`        | `Address`    | Ledger the sale sells from           |
//! | `PaymentToken` | `Address`    | Native-asset contract buyers pay in  |
//! | `Unit`         | `i128`       | Base units per whole token           |
//! | `Config`       | `SaleConfig` | Deployment parameters (+ live price) |
//! | `State`        | `SaleState`  | Counters and terminal flags          |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key               | Type       | Description              |
//! |-------------------|------------|--------------------------|
//! | `Purchase(buyer)` | `Purchase` | Per-buyer refund basis   |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days
//! remaining. Owner and allow-list keys are managed by [`crate::access`].

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{Purchase, SaleConfig, SaleState};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

pub(crate) const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Token,
    PaymentToken,
    Unit,
    Config,
    State,
    Purchase(Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

pub(crate) fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn set_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::Token, token);
}

pub fn get_token(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .expect("token is written by the constructor")
}

pub fn set_payment_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::PaymentToken, token);
}

pub fn get_payment_token(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::PaymentToken)
        .expect("payment token is written by the constructor")
}

pub fn set_unit(env: &Env, unit: i128) {
    env.storage().instance().set(&DataKey::Unit, &unit);
}

pub fn get_unit(env: &Env) -> i128 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Unit)
        .expect("unit is written by the constructor")
}

pub fn save_config(env: &Env, config: &SaleConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn load_config(env: &Env) -> SaleConfig {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .expect("config is written by the constructor")
}

pub fn save_state(env: &Env, state: &SaleState) {
    env.storage().instance().set(&DataKey::State, state);
}

pub fn load_state(env: &Env) -> SaleState {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::State)
        .unwrap_or_default()
}

/// Read config and state together; most entry points need both.
pub fn load_sale(env: &Env) -> (SaleConfig, SaleState) {
    (load_config(env), load_state(env))
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// What `buyer` has bought so far; zero if nothing.
pub fn load_purchase(env: &Env, buyer: &Address) -> Purchase {
    let key = DataKey::Purchase(buyer.clone());
    match env.storage().persistent().get::<_, Purchase>(&key) {
        Some(purchase) => {
            bump_persistent(env, &key);
            purchase
        }
        None => Purchase::default(),
    }
}

pub fn save_purchase(env: &Env, buyer: &Address, purchase: &Purchase) {
    let key = DataKey::Purchase(buyer.clone());
    env.storage().persistent().set(&key, purchase);
    bump_persistent(env, &key);
}

pub fn remove_purchase(env: &Env, buyer: &Address) {
    env.storage()
        .persistent()
        .remove(&DataKey::Purchase(buyer.clone()));
}
