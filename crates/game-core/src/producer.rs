//! Auto-sender producers and their fixed registry.

use crate::error::{EntityKind, GameError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Unique identifier for an auto-sender, e.g. "linkedin-premium".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProducerId(pub String);

impl ProducerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An owned unit that generates resumes automatically over time.
///
/// Identity and curve parameters are immutable; only `owned` persists
/// across saves. `efficiency_multiplier` is derived by the effect
/// reapplication pass and is never trusted from a save.
#[derive(Clone, Debug)]
pub struct Producer {
    pub id: ProducerId,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub base_cost: Decimal,
    /// Resumes per second for a single unit at baseline efficiency.
    pub base_production: Decimal,
    /// Minimum lifetime resumes before this producer becomes visible.
    pub unlock_threshold: Decimal,
    pub owned: u32,
    pub efficiency_multiplier: Decimal,
}

impl Producer {
    fn new(
        id: &str,
        name: &str,
        icon: &str,
        description: &str,
        base_cost: i64,
        base_production: Decimal,
        unlock_threshold: i64,
    ) -> Self {
        Self {
            id: ProducerId(id.to_string()),
            name: name.to_string(),
            icon: icon.to_string(),
            description: description.to_string(),
            base_cost: Decimal::new(base_cost, 0),
            base_production,
            unlock_threshold: Decimal::new(unlock_threshold, 0),
            owned: 0,
            efficiency_multiplier: Decimal::ONE,
        }
    }

    /// Whether the player's lifetime resumes meet the effective unlock
    /// threshold. `threshold_factor` (≤ 1) comes from unlock-boost
    /// upgrades; the stored threshold itself never changes.
    pub fn is_unlocked(&self, total_resumes: Decimal, threshold_factor: Decimal) -> bool {
        total_resumes >= (self.unlock_threshold * threshold_factor).floor()
    }

    /// Cost of the next unit: `ceil(base * 1.15^owned * cost_factor)`.
    pub fn current_cost(&self, cost_factor: Decimal) -> Decimal {
        game_econ::geometric_cost(
            self.base_cost * cost_factor,
            game_econ::producer_cost_growth(),
            self.owned,
        )
        .unwrap_or(self.base_cost)
    }

    /// Current output in resumes per second: zero until the first unit
    /// is owned, then `base * owned * efficiency`.
    pub fn production_rate(&self) -> Decimal {
        if self.owned == 0 {
            return Decimal::ZERO;
        }
        self.base_production * Decimal::from(self.owned) * self.efficiency_multiplier
    }

    /// First phase of a purchase: pure affordability check returning
    /// the exact cost that a subsequent [`Producer::commit`] expects
    /// the caller to deduct.
    pub fn validate(&self, player_resumes: Decimal, cost_factor: Decimal) -> Result<Decimal, GameError> {
        let cost = self.current_cost(cost_factor);
        if player_resumes < cost {
            return Err(GameError::InsufficientFunds {
                needed: cost,
                available: player_resumes,
            });
        }
        Ok(cost)
    }

    /// Second phase of a purchase: increment the owned count.
    pub fn commit(&mut self) {
        self.owned += 1;
    }
}

/// The fixed registry of 8 auto-senders, cheapest first.
pub fn default_producers() -> Vec<Producer> {
    vec![
        Producer::new(
            "linkedin-premium",
            "LinkedIn Premium Bot",
            "\u{1f4bc}",
            "Automatically sends resumes to LinkedIn Premium job postings. Your first step into automation!",
            15,
            Decimal::new(1, 1),
            0,
        ),
        Producer::new(
            "indeed-mass-applier",
            "Indeed Mass Applier",
            "\u{1f4ee}",
            "Spray and pray approach to job applications. Bulk applies to hundreds of Indeed postings automatically.",
            500,
            Decimal::new(8, 0),
            100,
        ),
        Producer::new(
            "recruiter-network",
            "Recruiter Network",
            "\u{1f578}\u{fe0f}",
            "Network of recruiters working on your behalf. They promise results but mostly just add to your LinkedIn connections.",
            1200,
            Decimal::new(15, 0),
            250,
        ),
        Producer::new(
            "career-coach",
            "Career Coach",
            "\u{1f393}",
            "Professional guidance for your job search strategy. Provides motivational quotes while doing nothing else.",
            2500,
            Decimal::new(25, 0),
            500,
        ),
        Producer::new(
            "networking-events",
            "Networking Events",
            "\u{1f91d}",
            "Automated small talk generators at networking events. Schmooze your way to new opportunities!",
            4000,
            Decimal::new(35, 0),
            750,
        ),
        Producer::new(
            "job-fair-booth",
            "Job Fair Booth",
            "\u{1f3ea}",
            "Your own booth at job fairs across the country. Mindless resume distribution at its finest.",
            8000,
            Decimal::new(50, 0),
            1000,
        ),
        Producer::new(
            "headhunter-agency",
            "Headhunter Agency",
            "\u{1f50d}",
            "Elite headhunters hunting heads for you. Promises dream jobs, delivers nothing but hope.",
            15_000,
            Decimal::new(75, 0),
            1500,
        ),
        Producer::new(
            "ai-resume-optimizer",
            "AI Resume Optimizer",
            "\u{1f916}",
            "AI-powered resume optimization using machine learning algorithms. Constantly tweaks your resume to perfection.",
            25_000,
            Decimal::new(100, 0),
            2000,
        ),
    ]
}

/// Resolve an id against a producer slice.
pub fn find_producer<'a>(producers: &'a [Producer], id: &str) -> Result<&'a Producer, GameError> {
    producers
        .iter()
        .find(|p| p.id.as_str() == id)
        .ok_or_else(|| GameError::NotFound {
            kind: EntityKind::Producer,
            id: id.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn registry_has_eight_unique_entries() {
        let producers = default_producers();
        assert_eq!(producers.len(), 8);
        let mut ids: Vec<_> = producers.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn first_producer_costs_grow_as_expected() {
        let mut p = default_producers().remove(0);
        assert_eq!(p.current_cost(Decimal::ONE), Decimal::new(15, 0));
        p.commit();
        assert_eq!(p.current_cost(Decimal::ONE), Decimal::new(18, 0));
        for _ in 0..8 {
            p.commit();
        }
        assert_eq!(p.owned, 9);
        assert_eq!(p.current_cost(Decimal::ONE), Decimal::new(53, 0));
    }

    #[test]
    fn cost_factor_discounts_before_ceiling() {
        let p = &default_producers()[1];
        // 500 * 0.75 = 375 exactly
        assert_eq!(p.current_cost(Decimal::new(75, 2)), Decimal::new(375, 0));
    }

    #[test]
    fn validate_is_exact_at_the_boundary() {
        let p = &default_producers()[0];
        assert_eq!(p.validate(Decimal::new(15, 0), Decimal::ONE), Ok(Decimal::new(15, 0)));
        assert_eq!(
            p.validate(Decimal::new(14, 0), Decimal::ONE),
            Err(GameError::InsufficientFunds {
                needed: Decimal::new(15, 0),
                available: Decimal::new(14, 0),
            })
        );
    }

    #[test]
    fn production_rate_zero_until_owned() {
        let mut p = default_producers().remove(1);
        assert_eq!(p.production_rate(), Decimal::ZERO);
        p.commit();
        p.commit();
        assert_eq!(p.production_rate(), Decimal::new(16, 0));
        p.efficiency_multiplier = Decimal::new(15, 1);
        assert_eq!(p.production_rate(), Decimal::new(24, 0));
    }

    #[test]
    fn unlock_threshold_scales_down() {
        let p = &default_producers()[1]; // threshold 100
        assert!(!p.is_unlocked(Decimal::new(99, 0), Decimal::ONE));
        assert!(p.is_unlocked(Decimal::new(100, 0), Decimal::ONE));
        // 20% reduction: floor(100 * 0.8) = 80
        assert!(p.is_unlocked(Decimal::new(80, 0), Decimal::new(8, 1)));
        assert!(!p.is_unlocked(Decimal::new(79, 0), Decimal::new(8, 1)));
    }

    proptest! {
        #[test]
        fn cost_never_below_discounted_base(owned in 0u32..40) {
            let mut p = default_producers().remove(0);
            p.owned = owned;
            let cost = p.current_cost(Decimal::ONE);
            prop_assert!(cost >= p.base_cost);
        }
    }
}
