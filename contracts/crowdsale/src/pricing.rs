//! Price arithmetic. Amounts are token base units, `price` is payment base
//! units per whole token and `unit` is one whole token (`10^decimals`).

use crate::Error;

/// Base units in one whole token.
pub fn unit_for_decimals(decimals: u32) -> Result<i128, Error> {
    10i128.checked_pow(decimals).ok_or(Error::InvalidConfig)
}

/// `value` pays for exactly `amount` at `price`, i.e.
/// `value * unit == amount * price`.
pub fn require_exact_payment(
    amount: i128,
    price: i128,
    unit: i128,
    value: i128,
) -> Result<(), Error> {
    let paid = value.checked_mul(unit).ok_or(Error::Overflow)?;
    let owed = amount.checked_mul(price).ok_or(Error::Overflow)?;
    if paid != owed {
        return Err(Error::IncorrectPayment);
    }
    Ok(())
}

/// Token amount a bare payment of `value` buys at `price`, rounded down.
pub fn tokens_for_payment(value: i128, price: i128, unit: i128) -> Result<i128, Error> {
    if price <= 0 {
        return Err(Error::IncorrectPayment);
    }
    let scaled = value.checked_mul(unit).ok_or(Error::Overflow)?;
    Ok(scaled / price)
}
