//! Column limits checked before a write reaches storage, so both adapters
//! accept and reject the same values.

use rust_decimal::Decimal;

use crate::messages::{ErrorCode, FieldViolation};

/// `games.price` is `NUMERIC(10, 2)`.
pub const PRICE_MAX_SCALE: u32 = 2;
pub const PRICE_MAX_WHOLE_DIGITS: u32 = 8;

/// Exclusive upper bound of a storable price.
pub fn price_limit() -> Decimal {
    Decimal::from(10_i64.pow(PRICE_MAX_WHOLE_DIGITS))
}

/// First limit `price` breaks, if any. Trailing zeros do not count as scale.
pub fn price_violation(price: Decimal) -> Option<FieldViolation> {
    if price.is_sign_negative() && !price.is_zero() {
        return Some(FieldViolation::new("price", ErrorCode::NegativePrice, &[]));
    }
    if price.normalize().scale() > PRICE_MAX_SCALE {
        return Some(FieldViolation::new(
            "price",
            ErrorCode::PriceScale,
            &[("max", &PRICE_MAX_SCALE)],
        ));
    }
    let limit = price_limit();
    if price >= limit {
        return Some(FieldViolation::new(
            "price",
            ErrorCode::PriceTooLarge,
            &[("limit", &limit)],
        ));
    }
    None
}
