//! # Crowdsale Contract
//!
//! Sells a fixed allocation of a fungible token against the native asset,
//! behind an optional allow-list, a time window and a funding goal. A sale
//! ends in exactly one of two outcomes: the owner finalizes it (unsold tokens
//! and all proceeds swept to the owner), or it fails or is cancelled and
//! buyers reclaim exactly what they paid.
//!
//! | Phase        | Entry Point(s)                                           |
//! |--------------|----------------------------------------------------------|
//! | Deployment   | [`Crowdsale::__constructor`]                             |
//! | Buying       | [`Crowdsale::buy_tokens`], [`Crowdsale::pay`]            |
//! | Admin        | `set_price`, `add_allowed_address`, `remove_allowed_address`, `cancel` |
//! | Resolution   | [`Crowdsale::finalize`], [`Crowdsale::claim_refund`], `reclaim_unsold` |
//! | Queries      | `price`, `tokens_sold`, `phase`, `sale_info`, allow-list reads, ... |
//!
//! ## Architecture
//!
//! Owner and allow-list checks live in [`access`], storage in [`storage`],
//! price arithmetic in [`pricing`]. The lifecycle phase is never stored: it
//! is recomputed from config, state and the ledger timestamp by
//! [`SalePhase::at`] on every call.
//!
//! Every entry point validates all of its preconditions before touching a
//! balance, and the host rolls back the whole invocation on failure, so a
//! failed call leaves no trace.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, panic_with_error, token, Address, Env, Vec,
};

pub mod access;
pub mod events;
mod pricing;
mod storage;
mod types;

#[cfg(test)]
mod harness;
#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;

pub use types::{Purchase, SaleConfig, SaleInfo, SalePhase, SaleState};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotOwner = 1,
    NotAllowed = 2,
    NotActive = 3,
    SaleEnded = 4,
    BelowMinimum = 5,
    AboveMaximum = 6,
    IncorrectPayment = 7,
    SoldOut = 8,
    AlreadyAllowed = 9,
    NotFound = 10,
    AlreadyFinalized = 11,
    GoalNotReached = 12,
    NotEligible = 13,
    RefundNotAvailable = 14,
    NothingToRefund = 15,
    InvalidConfig = 16,
    InvalidAmount = 17,
    Overflow = 18,
    SaleClosed = 19,
    AlreadyCancelled = 20,
    IndexOutOfBounds = 21,
    InsufficientAllowance = 22,
    InsufficientBalance = 23,
    SaleNotFailed = 24,
}

impl Error {
    /// Human-readable reason, one per error, for frontends and logs.
    pub fn reason(self) -> &'static str {
        match self {
            Error::NotOwner => "Caller is not the owner",
            Error::NotAllowed => "Caller is not allowed to participate",
            Error::NotActive => "Crowdsale is not active",
            Error::SaleEnded => "Crowdsale has ended",
            Error::BelowMinimum => "Amount is less than the minimum purchase",
            Error::AboveMaximum => "Amount is greater than the maximum purchase",
            Error::IncorrectPayment => "Payment does not match amount times price",
            Error::SoldOut => "Not enough tokens left for sale",
            Error::AlreadyAllowed => "Address is already allowed",
            Error::NotFound => "Address is not on the allow-list",
            Error::AlreadyFinalized => "Crowdsale is already finalized",
            Error::GoalNotReached => "Funding goal has not been reached",
            Error::NotEligible => "Funding goal was met; refunds are not possible",
            Error::RefundNotAvailable => "Refunds are not available in the current phase",
            Error::NothingToRefund => "No purchase to refund",
            Error::InvalidConfig => "Invalid sale configuration",
            Error::InvalidAmount => "Amount must not be negative",
            Error::Overflow => "Arithmetic overflow",
            Error::SaleClosed => "Crowdsale is closed",
            Error::AlreadyCancelled => "Crowdsale is already cancelled",
            Error::IndexOutOfBounds => "Allow-list index out of bounds",
            Error::InsufficientAllowance => "Refund requires approving the purchased tokens",
            Error::InsufficientBalance => "Buyer no longer holds the purchased tokens",
            Error::SaleNotFailed => "Unsold tokens can only be reclaimed from a failed sale",
        }
    }
}

#[contract]
pub struct Crowdsale;

#[contractimpl]
impl Crowdsale {
    // ─────────────────────────────────────────────────────────
    // Deployment
    // ─────────────────────────────────────────────────────────

    /// Deploy the sale.
    ///
    /// - `token` is the ledger being sold. It must be funded with
    ///   `config.max_tokens` by a separate transfer after deployment.
    /// - `payment_token` is the native-asset contract buyers pay with.
    /// - `allowed` seeds the allow-list; pass an empty vector to disable it.
    pub fn __constructor(
        env: Env,
        owner: Address,
        token: Address,
        payment_token: Address,
        config: SaleConfig,
        allowed: Vec<Address>,
    ) {
        if !config.is_valid() {
            panic_with_error!(&env, Error::InvalidConfig);
        }
        let decimals = token::Client::new(&env, &token).decimals();
        let unit = pricing::unit_for_decimals(decimals)
            .unwrap_or_else(|e| panic_with_error!(&env, e));

        access::init_owner(&env, &owner);
        storage::set_token(&env, &token);
        storage::set_payment_token(&env, &payment_token);
        storage::set_unit(&env, unit);
        storage::save_config(&env, &config);
        storage::save_state(&env, &SaleState::default());

        for address in allowed.iter() {
            if let Err(e) = access::insert_allowed(&env, &address, None) {
                panic_with_error!(&env, e);
            }
        }
    }

    // ─────────────────────────────────────────────────────────
    // Buying
    // ─────────────────────────────────────────────────────────

    /// Buy exactly `amount` token base units, paying `value` of the native
    /// asset. `value` must equal `amount * price` (price per whole token).
    ///
    /// Preconditions, in order: allow-list, time window, open sale, minimum,
    /// maximum, exact payment, remaining supply.
    pub fn buy_tokens(env: Env, buyer: Address, amount: i128, value: i128) -> Result<(), Error> {
        buyer.require_auth();
        Self::execute_buy(&env, buyer, amount, value)
    }

    /// Bare payment: spend `value` of the native asset and receive
    /// `value / price` whole tokens under the same rules as `buy_tokens`.
    ///
    /// Returns the token amount bought.
    pub fn pay(env: Env, buyer: Address, value: i128) -> Result<i128, Error> {
        buyer.require_auth();
        if value < 0 {
            return Err(Error::InvalidAmount);
        }
        let config = storage::load_config(&env);
        let amount = pricing::tokens_for_payment(value, config.price, storage::get_unit(&env))?;
        Self::execute_buy(&env, buyer, amount, value)?;
        Ok(amount)
    }

    // ─────────────────────────────────────────────────────────
    // Administration
    // ─────────────────────────────────────────────────────────

    /// Overwrite the price. Existing purchases keep what they paid.
    pub fn set_price(env: Env, caller: Address, new_price: i128) -> Result<(), Error> {
        caller.require_auth();
        access::require_owner(&env, &caller)?;
        if new_price < 0 {
            return Err(Error::InvalidAmount);
        }

        let mut config = storage::load_config(&env);
        let old_price = config.price;
        config.price = new_price;
        storage::save_config(&env, &config);

        events::emit_price_updated(&env, old_price, new_price);
        Ok(())
    }

    pub fn add_allowed_address(env: Env, caller: Address, address: Address) -> Result<(), Error> {
        caller.require_auth();
        access::require_owner(&env, &caller)?;
        access::insert_allowed(&env, &address, Some(caller))
    }

    /// Remove a member. The last member takes the freed slot.
    pub fn remove_allowed_address(
        env: Env,
        caller: Address,
        address: Address,
    ) -> Result<(), Error> {
        caller.require_auth();
        access::require_owner(&env, &caller)?;
        access::remove_allowed(&env, &address, Some(caller))
    }

    /// Call the sale off. Buying stops and refunds open immediately.
    pub fn cancel(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        access::require_owner(&env, &caller)?;

        let mut state = storage::load_state(&env);
        if state.finalized {
            return Err(Error::AlreadyFinalized);
        }
        if state.cancelled {
            return Err(Error::AlreadyCancelled);
        }
        state.cancelled = true;
        storage::save_state(&env, &state);

        events::emit_cancelled(&env, state.tokens_sold, state.total_raised);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Resolution
    // ─────────────────────────────────────────────────────────

    /// Close a successful sale: sweep every remaining token and the whole
    /// native balance to the owner.
    ///
    /// Requires the funding goal to be met; may be called before
    /// `fund_by_date`. A second call fails with `AlreadyFinalized`.
    pub fn finalize(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        access::require_owner(&env, &caller)?;

        let (config, mut state) = storage::load_sale(&env);
        if state.finalized {
            return Err(Error::AlreadyFinalized);
        }
        if state.cancelled {
            return Err(Error::SaleClosed);
        }
        if !state.goal_met(&config) {
            return Err(Error::GoalNotReached);
        }

        state.finalized = true;
        storage::save_state(&env, &state);

        let this = env.current_contract_address();
        let token_client = token::Client::new(&env, &storage::get_token(&env));
        let payment_client = token::Client::new(&env, &storage::get_payment_token(&env));

        let unsold = token_client.balance(&this);
        if unsold > 0 {
            token_client.transfer(&this, &caller, &unsold);
        }
        let proceeds = payment_client.balance(&this);
        if proceeds > 0 {
            payment_client.transfer(&this, &caller, &proceeds);
        }

        events::emit_finalize(&env, state.tokens_sold, state.total_raised);
        Ok(())
    }

    /// Return everything `buyer` bought in exchange for everything they paid.
    ///
    /// Only in the `Expired` or `Cancelled` phase. The buyer must first
    /// `approve` this contract for the purchased token amount on the token
    /// ledger; the tokens are pulled back with `transfer_from`. The purchase
    /// record is erased, so a second claim fails with `NothingToRefund`.
    ///
    /// Returns the refunded native amount.
    pub fn claim_refund(env: Env, buyer: Address) -> Result<i128, Error> {
        buyer.require_auth();

        let (config, mut state) = storage::load_sale(&env);
        match SalePhase::at(&config, &state, env.ledger().timestamp()) {
            SalePhase::Expired | SalePhase::Cancelled => {}
            SalePhase::GoalReached => return Err(Error::NotEligible),
            SalePhase::Pending | SalePhase::Open | SalePhase::Finalized => {
                return Err(Error::RefundNotAvailable)
            }
        }

        let purchase = storage::load_purchase(&env, &buyer);
        if purchase.tokens <= 0 {
            return Err(Error::NothingToRefund);
        }

        let this = env.current_contract_address();
        let token_client = token::Client::new(&env, &storage::get_token(&env));
        if token_client.allowance(&buyer, &this) < purchase.tokens {
            return Err(Error::InsufficientAllowance);
        }
        if token_client.balance(&buyer) < purchase.tokens {
            return Err(Error::InsufficientBalance);
        }

        state.total_refunded = state
            .total_refunded
            .checked_add(purchase.paid)
            .ok_or(Error::Overflow)?;
        storage::save_state(&env, &state);
        storage::remove_purchase(&env, &buyer);

        token_client.transfer_from(&this, &buyer, &this, &purchase.tokens);
        if purchase.paid > 0 {
            let payment_client = token::Client::new(&env, &storage::get_payment_token(&env));
            payment_client.transfer(&this, &buyer, &purchase.paid);
        }

        events::emit_refund(&env, buyer, purchase.tokens, purchase.paid);
        Ok(purchase.paid)
    }

    /// Sweep the tokens held by a failed or cancelled sale back to the owner.
    /// Native funds stay in place for refunds. Can be called again to collect
    /// tokens returned by later refunds.
    ///
    /// Returns the amount swept.
    pub fn reclaim_unsold(env: Env, caller: Address) -> Result<i128, Error> {
        caller.require_auth();
        access::require_owner(&env, &caller)?;

        let (config, state) = storage::load_sale(&env);
        if !SalePhase::at(&config, &state, env.ledger().timestamp()).is_refundable() {
            return Err(Error::SaleNotFailed);
        }

        let this = env.current_contract_address();
        let token_client = token::Client::new(&env, &storage::get_token(&env));
        let amount = token_client.balance(&this);
        if amount > 0 {
            token_client.transfer(&this, &caller, &amount);
        }

        events::emit_unsold_reclaimed(&env, caller, amount);
        Ok(amount)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn owner(env: Env) -> Address {
        access::get_owner(&env)
    }

    pub fn token(env: Env) -> Address {
        storage::get_token(&env)
    }

    pub fn payment_token(env: Env) -> Address {
        storage::get_payment_token(&env)
    }

    pub fn price(env: Env) -> i128 {
        storage::load_config(&env).price
    }

    pub fn max_tokens(env: Env) -> i128 {
        storage::load_config(&env).max_tokens
    }

    pub fn tokens_sold(env: Env) -> i128 {
        storage::load_state(&env).tokens_sold
    }

    pub fn active_on(env: Env) -> u64 {
        storage::load_config(&env).active_on
    }

    pub fn fund_by_date(env: Env) -> u64 {
        storage::load_config(&env).fund_by_date
    }

    pub fn funding_goal(env: Env) -> i128 {
        storage::load_config(&env).funding_goal
    }

    pub fn min_purchase(env: Env) -> i128 {
        storage::load_config(&env).min_purchase
    }

    pub fn max_purchase(env: Env) -> i128 {
        storage::load_config(&env).max_purchase
    }

    pub fn total_raised(env: Env) -> i128 {
        storage::load_state(&env).total_raised
    }

    pub fn total_refunded(env: Env) -> i128 {
        storage::load_state(&env).total_refunded
    }

    pub fn is_finalized(env: Env) -> bool {
        storage::load_state(&env).finalized
    }

    pub fn is_cancelled(env: Env) -> bool {
        storage::load_state(&env).cancelled
    }

    pub fn phase(env: Env) -> SalePhase {
        let (config, state) = storage::load_sale(&env);
        SalePhase::at(&config, &state, env.ledger().timestamp())
    }

    /// Tokens currently held by the sale.
    pub fn tokens_available(env: Env) -> i128 {
        token::Client::new(&env, &storage::get_token(&env)).balance(&env.current_contract_address())
    }

    /// What `buyer` has bought and paid; the refund basis.
    pub fn purchase_of(env: Env, buyer: Address) -> Purchase {
        storage::load_purchase(&env, &buyer)
    }

    pub fn allowed_addresses_length(env: Env) -> u32 {
        access::allowed_count(&env)
    }

    pub fn allowed_address(env: Env, index: u32) -> Result<Address, Error> {
        access::allowed_at(&env, index).ok_or(Error::IndexOutOfBounds)
    }

    /// Up to `limit` members starting at `start`, for paginating readers.
    pub fn allowed_addresses_page(env: Env, start: u32, limit: u32) -> Vec<Address> {
        access::allowed_page(&env, start, limit)
    }

    /// `true` if `address` may buy: the allow-list is empty or contains it.
    pub fn is_allowed(env: Env, address: Address) -> bool {
        access::is_permitted(&env, &address)
    }

    /// Everything a polling frontend shows, in one call.
    pub fn sale_info(env: Env) -> SaleInfo {
        let (config, state) = storage::load_sale(&env);
        let phase = SalePhase::at(&config, &state, env.ledger().timestamp());
        SaleInfo {
            owner: access::get_owner(&env),
            token: storage::get_token(&env),
            payment_token: storage::get_payment_token(&env),
            allowed_count: access::allowed_count(&env),
            tokens_available: Self::tokens_available(env.clone()),
            config,
            state,
            phase,
        }
    }

    // ─────────────────────────────────────────────────────────
    // Internal Helpers
    // ─────────────────────────────────────────────────────────

    fn execute_buy(env: &Env, buyer: Address, amount: i128, value: i128) -> Result<(), Error> {
        if amount < 0 || value < 0 {
            return Err(Error::InvalidAmount);
        }
        let (config, mut state) = storage::load_sale(env);

        if !access::is_permitted(env, &buyer) {
            return Err(Error::NotAllowed);
        }

        let now = env.ledger().timestamp();
        if now < config.active_on {
            return Err(Error::NotActive);
        }
        if now > config.fund_by_date {
            return Err(Error::SaleEnded);
        }
        if state.finalized || state.cancelled {
            return Err(Error::SaleClosed);
        }

        if amount < config.min_purchase {
            return Err(Error::BelowMinimum);
        }
        if amount > config.max_purchase {
            return Err(Error::AboveMaximum);
        }

        pricing::require_exact_payment(amount, config.price, storage::get_unit(env), value)?;

        let sold = state.tokens_sold.checked_add(amount).ok_or(Error::Overflow)?;
        if sold > config.max_tokens {
            return Err(Error::SoldOut);
        }

        let mut purchase = storage::load_purchase(env, &buyer);
        purchase.tokens = purchase.tokens.checked_add(amount).ok_or(Error::Overflow)?;
        purchase.paid = purchase.paid.checked_add(value).ok_or(Error::Overflow)?;
        state.tokens_sold = sold;
        state.total_raised = state.total_raised.checked_add(value).ok_or(Error::Overflow)?;

        storage::save_state(env, &state);
        storage::save_purchase(env, &buyer, &purchase);

        let this = env.current_contract_address();
        if value > 0 {
            let payment_client = token::Client::new(env, &storage::get_payment_token(env));
            payment_client.transfer(&buyer, &this, &value);
        }
        let token_client = token::Client::new(env, &storage::get_token(env));
        token_client.transfer(&this, &buyer, &amount);

        events::emit_buy(env, amount, buyer);
        Ok(())
    }
}
