#![allow(dead_code)]

extern crate std;

use soroban_sdk::Address;

use crate::harness::Sale;
use crate::types::SalePhase;

/// INV-1: until the sale is swept, every sold token is either still in the
/// sale's custody or held by a buyer: `sale + Σ buyers == max_tokens`.
pub fn assert_token_conservation(sale: &Sale, buyers: &[&Address]) {
    let held: i128 = buyers.iter().map(|b| sale.token.balance(b)).sum();
    let custody = sale.sale_token_balance();
    let max_tokens = sale.client.max_tokens();
    assert_eq!(
        custody + held,
        max_tokens,
        "INV-1 violated: custody {} + buyers {} != max_tokens {}",
        custody,
        held,
        max_tokens
    );
}

/// INV-2: `tokens_sold` never exceeds `max_tokens`.
pub fn assert_tokens_sold_bounded(sale: &Sale) {
    let sold = sale.client.tokens_sold();
    let max_tokens = sale.client.max_tokens();
    assert!(
        (0..=max_tokens).contains(&sold),
        "INV-2 violated: tokens_sold {} outside [0, {}]",
        sold,
        max_tokens
    );
}

/// INV-3: `tokens_sold` is monotonic.
pub fn assert_monotonic(before: i128, after: i128) {
    assert!(
        after >= before,
        "INV-3 violated: tokens_sold went from {} to {}",
        before,
        after
    );
}

/// INV-4: the native balance held equals everything accepted minus
/// everything refunded; after finalization it is zero.
pub fn assert_native_accounting(sale: &Sale) {
    let held = sale.sale_native_balance();
    if sale.client.is_finalized() {
        assert_eq!(held, 0, "INV-4 violated: finalized sale still holds {}", held);
        return;
    }
    let expected = sale.client.total_raised() - sale.client.total_refunded();
    assert_eq!(
        held, expected,
        "INV-4 violated: held {} != raised - refunded {}",
        held, expected
    );
}

/// INV-5: a finalized sale holds neither tokens nor native funds.
pub fn assert_finalized_is_empty(sale: &Sale) {
    if sale.client.phase() == SalePhase::Finalized {
        assert_eq!(sale.sale_token_balance(), 0, "INV-5 violated: tokens left");
        assert_eq!(sale.sale_native_balance(), 0, "INV-5 violated: funds left");
    }
}

/// Run all stateless sale invariants.
pub fn assert_all_sale_invariants(sale: &Sale) {
    assert_tokens_sold_bounded(sale);
    assert_native_accounting(sale);
    assert_finalized_is_empty(sale);
}
