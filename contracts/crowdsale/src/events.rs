use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Buy {
    pub amount: i128,
    pub buyer: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Finalize {
    pub tokens_sold: i128,
    pub total_raised: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Refund {
    pub buyer: Address,
    pub tokens: i128,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceUpdated {
    pub old_price: i128,
    pub new_price: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cancelled {
    pub tokens_sold: i128,
    pub total_raised: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnsoldReclaimed {
    pub owner: Address,
    pub amount: i128,
}

pub fn emit_buy(env: &Env, amount: i128, buyer: Address) {
    let topics = (symbol_short!("buy"), buyer.clone());
    env.events().publish(topics, Buy { amount, buyer });
}

pub fn emit_finalize(env: &Env, tokens_sold: i128, total_raised: i128) {
    let topics = (symbol_short!("finalize"),);
    let data = Finalize {
        tokens_sold,
        total_raised,
    };
    env.events().publish(topics, data);
}

pub fn emit_refund(env: &Env, buyer: Address, tokens: i128, amount: i128) {
    let topics = (symbol_short!("refund"), buyer.clone());
    let data = Refund {
        buyer,
        tokens,
        amount,
    };
    env.events().publish(topics, data);
}

pub fn emit_price_updated(env: &Env, old_price: i128, new_price: i128) {
    let topics = (symbol_short!("price"),);
    let data = PriceUpdated {
        old_price,
        new_price,
    };
    env.events().publish(topics, data);
}

pub fn emit_cancelled(env: &Env, tokens_sold: i128, total_raised: i128) {
    let topics = (symbol_short!("cancel"),);
    let data = Cancelled {
        tokens_sold,
        total_raised,
    };
    env.events().publish(topics, data);
}

pub fn emit_unsold_reclaimed(env: &Env, owner: Address, amount: i128) {
    let topics = (symbol_short!("reclaim"),);
    env.events().publish(topics, UnsoldReclaimed { owner, amount });
}
