use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::card::Rate;

/// Reward for `amount` at `rate_percent`, truncated to whole reward units.
///
/// Negative inputs are a caller bug: they assert in debug builds and are
/// treated as zero otherwise.
pub fn calculate_cashback_amount(amount: Decimal, rate_percent: Rate) -> i64 {
    debug_assert!(amount >= Decimal::ZERO, "negative spend amount: {amount}");
    debug_assert!(rate_percent >= Decimal::ZERO, "negative rate: {rate_percent}");

    let amount = amount.max(Decimal::ZERO);
    let rate = rate_percent.max(Decimal::ZERO);

    match amount.checked_mul(rate) {
        Some(product) => (product / Decimal::from(100))
            .trunc()
            .to_i64()
            .unwrap_or(i64::MAX),
        None => i64::MAX,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub points: i64,
    /// True when the monthly category limit cut the reward down.
    pub capped: bool,
}

/// Projected reward for a spend, capped at the card's category limit.
pub fn projected_reward(amount: Decimal, rate_percent: Rate, limit: Option<Decimal>) -> Projection {
    let points = calculate_cashback_amount(amount, rate_percent);
    let cap = limit.map(|l| l.max(Decimal::ZERO).trunc().to_i64().unwrap_or(i64::MAX));

    match cap {
        Some(cap) if points > cap => Projection { points: cap, capped: true },
        _ => Projection { points, capped: false },
    }
}

/// `"no reward"` for zero, `"3%"` for whole rates, `"3.3%"` otherwise.
/// Rates are rounded half away from zero to one decimal place.
pub fn format_rate(rate: Rate) -> String {
    if rate.is_zero() {
        return "no reward".to_string();
    }
    let shown = rate.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    if shown.fract().is_zero() {
        return format!("{}%", shown.trunc());
    }
    format!("{:.1}%", shown)
}
