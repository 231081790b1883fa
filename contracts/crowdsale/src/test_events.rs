extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    vec, Address, IntoVal, Symbol, TryIntoVal, Val,
};

use crate::events::{Buy, Cancelled, Finalize, PriceUpdated, Refund, UnsoldReclaimed};
use crate::harness::*;
use crate::SaleConfig;

/// Topics and data of the last event, asserting the sale emitted it.
fn last_event(sale: &Sale) -> (soroban_sdk::Vec<Val>, Val) {
    let all_events = sale.env.events().all();
    let last_event = all_events.last().expect("No events found");
    assert_eq!(last_event.0, sale.client.address);
    (last_event.1, last_event.2)
}

#[test]
fn test_buy_event() {
    let sale = Sale::deploy(open_config());
    let env = &sale.env;
    let buyer = sale.funded_buyer(ether(10));
    sale.buy(&buyer, tokens(3));

    let (topics, data) = last_event(&sale);

    // Topic: (symbol_short!("buy"), buyer)
    let expected_topics = vec![env, symbol_short!("buy").into_val(env), buyer.into_val(env)];
    assert_eq!(topics, expected_topics);

    let event_data: Buy = data.try_into_val(env).unwrap();
    assert_eq!(event_data, Buy {
        amount: tokens(3),
        buyer: buyer.clone(),
    });
}

#[test]
fn test_pay_emits_buy_event() {
    let sale = Sale::deploy(open_config());
    let env = &sale.env;
    let buyer = sale.funded_buyer(ether(10));
    sale.client.pay(&buyer, &ether(2));

    let (_, data) = last_event(&sale);
    let event_data: Buy = data.try_into_val(env).unwrap();
    assert_eq!(event_data.amount, tokens(2));
}

#[test]
fn test_finalize_event() {
    let sale = Sale::deploy(open_config());
    let env = &sale.env;
    let buyer = sale.funded_buyer(ether(10));
    sale.buy(&buyer, tokens(4));
    sale.client.finalize(&sale.owner);

    let (topics, data) = last_event(&sale);

    // Topic: (symbol_short!("finalize"),)
    assert_eq!(topics, vec![env, symbol_short!("finalize").into_val(env)]);

    let event_data: Finalize = data.try_into_val(env).unwrap();
    assert_eq!(event_data, Finalize {
        tokens_sold: tokens(4),
        total_raised: ether(4),
    });
}

#[test]
fn test_refund_event() {
    let deadline = NOW + 60;
    let sale = Sale::deploy(SaleConfig {
        funding_goal: ether(1_000),
        fund_by_date: deadline,
        ..open_config()
    });
    let env = &sale.env;
    let buyer = sale.funded_buyer(ether(10));
    sale.buy(&buyer, tokens(6));
    sale.set_time(deadline + 1);
    sale.approve_refund(&buyer, tokens(6));
    sale.client.claim_refund(&buyer);

    let (topics, data) = last_event(&sale);

    // Topic: (symbol_short!("refund"), buyer)
    let expected_topics = vec![env, symbol_short!("refund").into_val(env), buyer.into_val(env)];
    assert_eq!(topics, expected_topics);

    let event_data: Refund = data.try_into_val(env).unwrap();
    assert_eq!(event_data, Refund {
        buyer: buyer.clone(),
        tokens: tokens(6),
        amount: ether(6),
    });
}

#[test]
fn test_price_event() {
    let sale = Sale::deploy(open_config());
    let env = &sale.env;
    sale.client.set_price(&sale.owner, &ether(5));

    let (topics, data) = last_event(&sale);
    assert_eq!(topics, vec![env, symbol_short!("price").into_val(env)]);

    let event_data: PriceUpdated = data.try_into_val(env).unwrap();
    assert_eq!(event_data, PriceUpdated {
        old_price: ether(1),
        new_price: ether(5),
    });
}

#[test]
fn test_cancel_event() {
    let sale = Sale::deploy(open_config());
    let env = &sale.env;
    let buyer = sale.funded_buyer(ether(10));
    sale.buy(&buyer, tokens(2));
    sale.client.cancel(&sale.owner);

    let (topics, data) = last_event(&sale);
    assert_eq!(topics, vec![env, symbol_short!("cancel").into_val(env)]);

    let event_data: Cancelled = data.try_into_val(env).unwrap();
    assert_eq!(event_data, Cancelled {
        tokens_sold: tokens(2),
        total_raised: ether(2),
    });
}

#[test]
fn test_reclaim_event() {
    let sale = Sale::deploy(open_config());
    let env = &sale.env;
    sale.client.cancel(&sale.owner);
    sale.client.reclaim_unsold(&sale.owner);

    let (topics, data) = last_event(&sale);
    assert_eq!(topics, vec![env, symbol_short!("reclaim").into_val(env)]);

    let event_data: UnsoldReclaimed = data.try_into_val(env).unwrap();
    assert_eq!(event_data, UnsoldReclaimed {
        owner: sale.owner.clone(),
        amount: SUPPLY,
    });
}

#[test]
fn test_allow_list_events() {
    let sale = Sale::deploy(open_config());
    let env = &sale.env;
    let member = Address::generate(env);

    sale.client.add_allowed_address(&sale.owner, &member);
    let (topics, data) = last_event(&sale);
    let expected_topics = vec![env, symbol_short!("allow_add").into_val(env), member.into_val(env)];
    assert_eq!(topics, expected_topics);
    let by: Option<Address> = data.try_into_val(env).unwrap();
    assert_eq!(by, Some(sale.owner.clone()));

    sale.client.remove_allowed_address(&sale.owner, &member);
    let (topics, _) = last_event(&sale);
    let topic: Symbol = topics.get(0).unwrap().try_into_val(env).unwrap();
    assert_eq!(topic, symbol_short!("allow_del"));
}
