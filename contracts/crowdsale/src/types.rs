//! # Types
//!
//! Shared data structures of the crowdsale contract.
//!
//! ## Config / State split
//!
//! The sale is stored as two instance entries:
//!
//! - [`SaleConfig`]: the deployment parameters. Only `price` ever changes.
//! - [`SaleState`]: counters and terminal flags, written on every buy,
//!   refund, finalize and cancel.
//!
//! ## Phase as a derived value
//!
//! [`SalePhase`] is never stored. [`SalePhase::at`] recomputes it from the
//! config, the state and the current ledger timestamp on every call:
//!
//! ```text
//! Pending ──► Open ──► GoalReached ──► Finalized
//!               │            (finalize)
//!               └──► Expired ──► (refunds)
//! any non-final phase ──► Cancelled ──► (refunds)
//! ```

use soroban_sdk::{contracttype, Address};

/// Deployment-time sale parameters.
///
/// Optional policy layers are switched off by configuration:
/// `active_on = 0`, `fund_by_date = u64::MAX`, `funding_goal = 0`,
/// `min_purchase = 0`, `max_purchase = max_tokens`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleConfig {
    /// Payment base units per whole token. Owner-mutable.
    pub price: i128,
    /// Cap on `tokens_sold`, in token base units.
    pub max_tokens: i128,
    /// Ledger timestamp at which buying opens.
    pub active_on: u64,
    /// Last ledger timestamp at which buying is accepted.
    pub fund_by_date: u64,
    /// Minimum `total_raised` for the sale to succeed.
    pub funding_goal: i128,
    /// Per-purchase lower bound, in token base units.
    pub min_purchase: i128,
    /// Per-purchase upper bound, in token base units.
    pub max_purchase: i128,
}

impl SaleConfig {
    /// The window order is not checked: a sale with `active_on` after
    /// `fund_by_date` never opens.
    pub fn is_valid(&self) -> bool {
        self.price >= 0
            && self.max_tokens > 0
            && self.funding_goal >= 0
            && self.min_purchase >= 0
            && self.max_purchase >= 0
            && self.min_purchase <= self.max_purchase
    }
}

/// Mutable sale counters and terminal flags.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SaleState {
    /// Tokens handed out by successful buys. Never decreases.
    pub tokens_sold: i128,
    /// Payment accepted by successful buys. Never decreases.
    pub total_raised: i128,
    /// Payment returned through refunds.
    pub total_refunded: i128,
    pub finalized: bool,
    pub cancelled: bool,
}

impl SaleState {
    pub fn goal_met(&self, config: &SaleConfig) -> bool {
        self.total_raised >= config.funding_goal
    }
}

/// Lifecycle phase, derived on demand.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SalePhase {
    /// Before `active_on`.
    Pending,
    /// Inside the window, goal not yet met.
    Open,
    /// Goal met, not finalized. Buying continues until `fund_by_date`.
    GoalReached,
    /// Past `fund_by_date` without meeting the goal. Refunds available.
    Expired,
    /// Cancelled by the owner. Refunds available.
    Cancelled,
    /// Swept to the owner. Terminal.
    Finalized,
}

impl SalePhase {
    pub fn at(config: &SaleConfig, state: &SaleState, now: u64) -> SalePhase {
        if state.finalized {
            SalePhase::Finalized
        } else if state.cancelled {
            SalePhase::Cancelled
        } else if now < config.active_on {
            SalePhase::Pending
        } else if state.goal_met(config) {
            SalePhase::GoalReached
        } else if now > config.fund_by_date {
            SalePhase::Expired
        } else {
            SalePhase::Open
        }
    }

    /// The sale failed or was called off; buyers may claim refunds.
    pub fn is_refundable(self) -> bool {
        matches!(self, SalePhase::Expired | SalePhase::Cancelled)
    }
}

/// What a single buyer has bought and paid, accumulated over all purchases.
/// This is the refund basis and is erased when the refund is claimed.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Purchase {
    pub tokens: i128,
    pub paid: i128,
}

/// One-call snapshot of the public sale state for polling frontends.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleInfo {
    pub owner: Address,
    pub token: Address,
    pub payment_token: Address,
    pub config: SaleConfig,
    pub state: SaleState,
    pub phase: SalePhase,
    pub allowed_count: u32,
    pub tokens_available: i128,
}
