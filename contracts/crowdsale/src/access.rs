//! # Access: owner gate and buyer allow-list
//!
//! Two access rules protect the sale:
//!
//! - **Owner**: administrative entry points (`set_price`, allow-list edits,
//!   `finalize`, `cancel`, `reclaim_unsold`) require the stored owner.
//! - **Allow-list**: when non-empty, only members may buy. An empty list is a
//!   policy mode ("everyone permitted"), not an error state.
//!
//! ## Storage layout
//!
//! The allow-list is an insertion-ordered set that supports O(1) membership
//! tests and index-based enumeration for paginating readers:
//!
//! - `AccessKey::Owner`              → `Address` (instance)
//! - `AccessKey::AllowedCount`       → `u32`     (instance)
//! - `AccessKey::AllowedAt(i)`       → `Address` (persistent, slot `i`)
//! - `AccessKey::AllowedIndex(addr)` → `u32`     (persistent, reverse index)
//!
//! Removal swaps the last member into the freed slot, so positions are not
//! stable across removals.
//!
//! ## Event emissions
//!
//! | Event topic prefix | Trigger |
//! |--------------------|---------|
//! | `allow_add`        | Address added to the allow-list |
//! | `allow_del`        | Address removed from the allow-list |

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::storage::{bump_instance, PERSISTENT_BUMP_AMOUNT, PERSISTENT_LIFETIME_THRESHOLD};
use crate::Error;

// ─────────────────────────────────────────────────────────
// Storage keys
// ─────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AccessKey {
    /// The sale owner.
    Owner,
    /// Number of allow-list members.
    AllowedCount,
    /// Member stored at a slot.
    AllowedAt(u32),
    /// Slot of a member.
    AllowedIndex(Address),
}

// ─────────────────────────────────────────────────────────
// Storage helpers (private)
// ─────────────────────────────────────────────────────────

fn bump(env: &Env, key: &AccessKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

fn set_count(env: &Env, count: u32) {
    env.storage().instance().set(&AccessKey::AllowedCount, &count);
}

fn index_of(env: &Env, address: &Address) -> Option<u32> {
    let key = AccessKey::AllowedIndex(address.clone());
    let index = env.storage().persistent().get(&key);
    if index.is_some() {
        bump(env, &key);
    }
    index
}

fn store_slot(env: &Env, index: u32, address: &Address) {
    let slot = AccessKey::AllowedAt(index);
    let reverse = AccessKey::AllowedIndex(address.clone());
    env.storage().persistent().set(&slot, address);
    env.storage().persistent().set(&reverse, &index);
    bump(env, &slot);
    bump(env, &reverse);
}

// ─────────────────────────────────────────────────────────
// Owner
// ─────────────────────────────────────────────────────────

/// Record the owner. Called once, by the constructor.
pub fn init_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&AccessKey::Owner, owner);
}

pub fn get_owner(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&AccessKey::Owner)
        .expect("owner is written by the constructor")
}

/// Assert that `caller` is the owner. The caller's signature is checked by
/// the entry point; this only compares identities.
pub fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
    if *caller != get_owner(env) {
        return Err(Error::NotOwner);
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Allow-list mutation
// ─────────────────────────────────────────────────────────

/// Append `address` to the allow-list.
///
/// `by` is `None` for the constructor seed and `Some(owner)` afterwards; it
/// is published as the event payload. Fails with `AlreadyAllowed` on a
/// duplicate.
pub fn insert_allowed(env: &Env, address: &Address, by: Option<Address>) -> Result<(), Error> {
    if index_of(env, address).is_some() {
        return Err(Error::AlreadyAllowed);
    }
    let count = allowed_count(env);
    store_slot(env, count, address);
    set_count(env, count + 1);

    emit(env, symbol_short!("allow_add"), address, by);
    Ok(())
}

/// Remove `address` from the allow-list by swapping the last member into its
/// slot. Fails with `NotFound` if `address` is not a member.
pub fn remove_allowed(env: &Env, address: &Address, by: Option<Address>) -> Result<(), Error> {
    let index = index_of(env, address).ok_or(Error::NotFound)?;
    let last = allowed_count(env) - 1;

    if index != last {
        let moved = allowed_at(env, last).expect("allow-list slots are contiguous");
        store_slot(env, index, &moved);
    }
    env.storage().persistent().remove(&AccessKey::AllowedAt(last));
    env.storage()
        .persistent()
        .remove(&AccessKey::AllowedIndex(address.clone()));
    set_count(env, last);

    emit(env, symbol_short!("allow_del"), address, by);
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Queries
// ─────────────────────────────────────────────────────────

pub fn allowed_count(env: &Env) -> u32 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&AccessKey::AllowedCount)
        .unwrap_or(0)
}

/// Member at slot `index`, or `None` past the end.
pub fn allowed_at(env: &Env, index: u32) -> Option<Address> {
    let key = AccessKey::AllowedAt(index);
    let address = env.storage().persistent().get(&key);
    if address.is_some() {
        bump(env, &key);
    }
    address
}

/// Up to `limit` members starting at slot `start`.
pub fn allowed_page(env: &Env, start: u32, limit: u32) -> Vec<Address> {
    let end = allowed_count(env).min(start.saturating_add(limit));
    let mut page = Vec::new(env);
    for index in start..end {
        if let Some(address) = allowed_at(env, index) {
            page.push_back(address);
        }
    }
    page
}

pub fn is_member(env: &Env, address: &Address) -> bool {
    index_of(env, address).is_some()
}

/// `true` when the allow-list is disabled (empty) or `address` is a member.
pub fn is_permitted(env: &Env, address: &Address) -> bool {
    allowed_count(env) == 0 || is_member(env, address)
}

// ─────────────────────────────────────────────────────────
// Internal helpers
// ─────────────────────────────────────────────────────────

/// Topic: `(event, address)`, data: `Option<owner>`.
fn emit(env: &Env, event: Symbol, address: &Address, by: Option<Address>) {
    env.events().publish((event, address.clone()), by);
}
