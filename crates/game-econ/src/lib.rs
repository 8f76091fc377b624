#![deny(warnings)]

//! Economic curves and formulas for Resume Tycoon.
//!
//! This crate provides the pure math behind the progression engine:
//! - Geometric cost growth for producer purchases
//! - Production rate aggregation
//! - Prestige gating and experience-gain formulas
//! - Weighted random selection for event triggering
//!
//! Everything here is deterministic given its inputs; randomness is
//! injected through a caller-supplied RNG.

use rand::Rng;
use rust_decimal::{Decimal, MathematicalOps};
use thiserror::Error;

/// Errors produced by curve evaluation.
#[derive(Debug, Error, PartialEq)]
pub enum CurveError {
    /// Monetary base values must be non-negative.
    #[error("negative monetary value is invalid")]
    NegativeMoney,
    /// Growth factors must be strictly positive.
    #[error("growth factor must be > 0")]
    NonPositiveGrowth,
}

/// Fixed per-unit cost growth for producers (15% per owned unit).
pub fn producer_cost_growth() -> Decimal {
    Decimal::new(115, 2)
}

/// Cost of the next producer unit: `ceil(base * growth^owned)`.
///
/// The ceiling guarantees a displayed cost never understates what a
/// purchase will deduct.
///
/// Example:
/// let cost = geometric_cost(Decimal::new(15, 0), producer_cost_growth(), 1);
/// assert_eq!(cost, Decimal::new(18, 0)); // ceil(15 * 1.15)
pub fn geometric_cost(base: Decimal, growth: Decimal, owned: u32) -> Result<Decimal, CurveError> {
    if base < Decimal::ZERO {
        return Err(CurveError::NegativeMoney);
    }
    if growth <= Decimal::ZERO {
        return Err(CurveError::NonPositiveGrowth);
    }
    Ok((base * growth.powu(owned as u64)).ceil())
}

/// Un-rounded scaling curve: `base * growth^level`.
///
/// Used for permanent-bonus costs, which are allowed to be fractional
/// because they are paid in experience points rather than resumes.
pub fn scaled_cost(base: Decimal, growth: Decimal, level: u32) -> Result<Decimal, CurveError> {
    if base < Decimal::ZERO {
        return Err(CurveError::NegativeMoney);
    }
    if growth <= Decimal::ZERO {
        return Err(CurveError::NonPositiveGrowth);
    }
    Ok(base * growth.powu(level as u64))
}

/// Aggregate production rate over `(base_production, owned, efficiency)`
/// triples. Producers with `owned == 0` contribute nothing.
pub fn production_sum<I>(producers: I) -> Decimal
where
    I: IntoIterator<Item = (Decimal, u32, Decimal)>,
{
    let mut total = Decimal::ZERO;
    for (base, owned, efficiency) in producers {
        if owned == 0 {
            continue;
        }
        total += base * Decimal::from(owned) * efficiency;
    }
    total
}

/// Lifetime-resume threshold required for the next career change:
/// `10000 * 2^level`. The gate doubles with each prestige level.
pub fn prestige_requirement(level: u32) -> Decimal {
    Decimal::new(10_000, 0) * Decimal::TWO.powu(level as u64)
}

/// Experience points earned by resetting at `total_resumes`:
/// `floor(sqrt(total / 1000) * 10 * (1 + level * 0.1) * (1 + rate_bonus))`.
///
/// Pure preview function; the prestige engine calls it both for display
/// and for the actual grant so the two can never disagree.
pub fn experience_gain(total_resumes: Decimal, level: u32, rate_bonus: Decimal) -> Decimal {
    let base = (total_resumes / Decimal::ONE_THOUSAND)
        .sqrt()
        .unwrap_or(Decimal::ZERO)
        * Decimal::TEN;
    let level_multiplier = Decimal::ONE + Decimal::new(level as i64, 1);
    (base * level_multiplier * (Decimal::ONE + rate_bonus)).floor()
}

/// Weighted random choice over `(item, weight)` pairs.
///
/// Returns `None` when the slice is empty or all weights are zero or
/// negative. Negative weights are treated as zero.
pub fn weighted_pick<'a, T, R: Rng>(rng: &mut R, items: &'a [(T, f64)]) -> Option<&'a T> {
    let total: f64 = items.iter().map(|(_, w)| w.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }
    let mut roll = rng.gen_range(0.0..total);
    for (item, weight) in items {
        let weight = weight.max(0.0);
        if roll < weight {
            return Some(item);
        }
        roll -= weight;
    }
    // Floating-point residue can step past the last bucket.
    items.last().map(|(item, _)| item)
}
