//! Display formatting for currency values.
//!
//! Three contracts, matching how each number is consumed:
//! - [`format_amount`] keeps up to 3 significant decimal places below
//!   1000 (rates and fractional gains),
//! - [`format_count`] floors first (holdings are indivisible),
//! - [`format_cost`] ceils first (a displayed cost must never
//!   understate what a purchase requires).

use rust_decimal::{Decimal, RoundingStrategy};

fn thousand() -> Decimal {
    Decimal::ONE_THOUSAND
}

fn million() -> Decimal {
    Decimal::new(1_000_000, 0)
}

fn billion() -> Decimal {
    Decimal::new(1_000_000_000, 0)
}

fn trillion() -> Decimal {
    Decimal::new(1_000_000_000_000, 0)
}

/// Suffix a whole-valued number with K/M/B/T at 10^3/10^6/10^9/10^12.
fn suffixed_whole(whole: Decimal) -> String {
    if whole < thousand() {
        format!("{}", whole.normalize())
    } else if whole < million() {
        format!("{:.1}K", whole / thousand())
    } else if whole < billion() {
        format!("{:.1}M", whole / million())
    } else if whole < trillion() {
        format!("{:.1}B", whole / billion())
    } else {
        format!("{:.1}T", whole / trillion())
    }
}

/// Generic presentation: up to 3 significant decimal places below
/// 1000, one-decimal magnitude suffixes above.
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero);
    if rounded >= thousand() {
        return suffixed_whole(rounded);
    }
    let hundredth = Decimal::new(1, 2);
    if (rounded - rounded.floor()).abs() < hundredth {
        // Close enough to a whole number to display as one.
        format!("{}", rounded.floor().normalize())
    } else if (rounded % Decimal::new(1, 1)).abs() < hundredth {
        format!("{:.1}", rounded)
    } else {
        let trimmed = rounded
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .normalize();
        format!("{trimmed}")
    }
}

/// Holdings presentation: floor to an integer, then suffix.
pub fn format_count(value: Decimal) -> String {
    suffixed_whole(value.floor())
}

/// Cost presentation: ceil to an integer, then suffix.
pub fn format_cost(value: Decimal) -> String {
    suffixed_whole(value.ceil())
}
