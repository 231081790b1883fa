//! Shared fixture: a funded crowdsale selling a 7-decimal `SaleToken`
//! against a Stellar Asset Contract standing in for the native asset.

use sale_token::{SaleToken, SaleTokenClient};
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, Address, Env, String, Vec,
};

use crate::{Crowdsale, CrowdsaleClient, SaleConfig};

/// One whole token (and one whole unit of the native asset): 7 decimals.
pub const UNIT: i128 = 10_000_000;
/// Ledger timestamp every fixture starts at.
pub const NOW: u64 = 1_700_000_000;
pub const SUPPLY: i128 = 1_000_000 * UNIT;

pub fn tokens(n: i128) -> i128 {
    n * UNIT
}

pub fn ether(n: i128) -> i128 {
    n * UNIT
}

/// Everything-enabled-but-permissive configuration: price 1, whole supply
/// for sale, no window, no goal, no bounds.
pub fn open_config() -> SaleConfig {
    SaleConfig {
        price: ether(1),
        max_tokens: SUPPLY,
        active_on: 0,
        fund_by_date: u64::MAX,
        funding_goal: 0,
        min_purchase: 0,
        max_purchase: SUPPLY,
    }
}

pub struct Sale {
    pub env: Env,
    pub owner: Address,
    pub client: CrowdsaleClient<'static>,
    pub token: SaleTokenClient<'static>,
    pub payment: token::Client<'static>,
    payment_admin: token::StellarAssetClient<'static>,
}

pub fn new_env() -> Env {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(NOW);
    env
}

impl Sale {
    pub fn deploy(config: SaleConfig) -> Sale {
        let env = new_env();
        let allowed = Vec::new(&env);
        Sale::deploy_in(env, config, allowed)
    }

    /// Deploy token and sale, then move `config.max_tokens` into the sale's
    /// custody the way a deploy script would.
    pub fn deploy_in(env: Env, config: SaleConfig, allowed: Vec<Address>) -> Sale {
        let owner = Address::generate(&env);

        let token_id = env.register(
            SaleToken,
            (
                owner.clone(),
                String::from_str(&env, "Shibsnax"),
                String::from_str(&env, "SNAX"),
                7u32,
                SUPPLY,
            ),
        );
        let native = env.register_stellar_asset_contract_v2(Address::generate(&env));

        let max_tokens = config.max_tokens;
        let sale_id = env.register(
            Crowdsale,
            (
                owner.clone(),
                token_id.clone(),
                native.address(),
                config,
                allowed,
            ),
        );

        let token = SaleTokenClient::new(&env, &token_id);
        token.transfer(&owner, &sale_id, &max_tokens);

        Sale {
            client: CrowdsaleClient::new(&env, &sale_id),
            token,
            payment: token::Client::new(&env, &native.address()),
            payment_admin: token::StellarAssetClient::new(&env, &native.address()),
            owner,
            env,
        }
    }

    /// A fresh address holding `native` units of the payment asset.
    pub fn funded_buyer(&self, native: i128) -> Address {
        let buyer = Address::generate(&self.env);
        self.payment_admin.mint(&buyer, &native);
        buyer
    }

    /// Exact payment for `amount` base units at the current price.
    pub fn cost(&self, amount: i128) -> i128 {
        amount * self.client.price() / UNIT
    }

    pub fn buy(&self, buyer: &Address, amount: i128) {
        self.client.buy_tokens(buyer, &amount, &self.cost(amount));
    }

    /// Let the buyer's refund pull back `amount` tokens.
    pub fn approve_refund(&self, buyer: &Address, amount: i128) {
        let expiration = self.env.ledger().sequence() + 1_000;
        self.token
            .approve(buyer, &self.client.address, &amount, &expiration);
    }

    pub fn set_time(&self, timestamp: u64) {
        self.env.ledger().set_timestamp(timestamp);
    }

    pub fn sale_token_balance(&self) -> i128 {
        self.token.balance(&self.client.address)
    }

    pub fn sale_native_balance(&self) -> i128 {
        self.payment.balance(&self.client.address)
    }
}
