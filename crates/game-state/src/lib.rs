#![deny(warnings)]

//! The economy core of Resume Tycoon.
//!
//! [`GameState`] owns every subsystem — producers, upgrades, the
//! achievement tracker, the prestige engine, the random event engine,
//! temporary effects — and exposes the synchronous action surface the
//! UI drives: click, purchase, career change, industry switch. A
//! fixed-cadence external driver calls [`GameState::update`] once per
//! tick; all mutation is serialized by the single call stack.
//!
//! Time is injected: every operation that touches the wall clock takes
//! an explicit `now_ms`, and all randomness flows through one seeded
//! RNG, so behavior is reproducible in tests.

pub mod achievements;
pub mod display;
pub mod effects;
pub mod events;
pub mod prestige;
pub mod save;

pub use achievements::{
    Achievement, AchievementCondition, AchievementReward, AchievementTracker, StatEvent,
    Statistics,
};
pub use display::{BonusInfo, IndustryInfo, PrestigeInfo, ProducerInfo, Summary, UpgradeInfo};
pub use effects::{TemporaryEffect, TemporaryEffectKind, TemporaryEffects};
pub use events::{FiredEvent, RandomEventDef, RandomEventEngine, RandomEventKind};
pub use prestige::{
    Industry, IndustryId, PermanentBonus, PermanentBonusId, Prestige, PrestigeAchievement,
    PrestigeAchievementId,
};
pub use save::SaveData;

use game_core::{
    default_producers, default_upgrades, EntityKind, GameError, Producer, UnlockView, Upgrade,
    UpgradeEffect, UpgradeId,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Probabilities for the statistic events rolled as a side effect of
/// clicking. Balance knobs, not contracts; tests pin them to 0 or 1.
#[derive(Clone, Copy, Debug)]
pub struct FlavorConfig {
    pub rejection_base_chance: f64,
    /// Added to the rejection chance per lifetime resume.
    pub rejection_chance_per_resume: f64,
    pub overqualified_chance: f64,
    pub overqualified_min_total: Decimal,
    pub entry_level_chance: f64,
    pub entry_level_min_total: Decimal,
    pub networking_chance: f64,
    /// Strictly more producers than this must be owned.
    pub networking_min_producers: u32,
}

impl Default for FlavorConfig {
    fn default() -> Self {
        Self {
            rejection_base_chance: 0.05,
            rejection_chance_per_resume: 0.0001,
            overqualified_chance: 0.02,
            overqualified_min_total: Decimal::new(50, 0),
            entry_level_chance: 0.03,
            entry_level_min_total: Decimal::new(25, 0),
            networking_chance: 0.01,
            networking_min_producers: 2,
        }
    }
}

/// Engine configuration.
#[derive(Clone, Copy, Debug)]
pub struct GameConfig {
    pub rng_seed: u64,
    pub flavor: FlavorConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rng_seed: 42,
            flavor: FlavorConfig::default(),
        }
    }
}

/// What one tick produced, for notification purposes.
#[derive(Clone, Debug, Default)]
pub struct TickOutcome {
    pub expired_effects: Vec<TemporaryEffectKind>,
    pub event: Option<FiredEvent>,
    pub unlocked_achievements: Vec<String>,
    pub resumes_gained: Decimal,
}

/// Result of a successful career change.
#[derive(Clone, Debug)]
pub struct PrestigeOutcome {
    pub experience_gained: Decimal,
    pub new_level: u32,
    pub unlocked_industries: Vec<IndustryId>,
    pub unlocked_prestige_achievements: Vec<PrestigeAchievementId>,
}

/// The owning aggregate for all game state.
#[derive(Clone, Debug)]
pub struct GameState {
    pub resumes: Decimal,
    pub total_resumes: Decimal,
    pub resumes_per_second: Decimal,
    /// Baseline click power from the reapplication pass; temporary
    /// click multipliers are layered on at use time.
    pub click_power: Decimal,
    pub producers: Vec<Producer>,
    pub upgrades: Vec<Upgrade>,
    pub achievements: AchievementTracker,
    pub prestige: Prestige,
    pub events: RandomEventEngine,
    pub temporary_effects: TemporaryEffects,
    config: GameConfig,
    rng: ChaCha8Rng,
    unlock_threshold_factor: Decimal,
    producer_cost_factor: Decimal,
}

impl GameState {
    pub fn new(config: GameConfig, now_ms: i64) -> Self {
        let mut state = Self {
            resumes: Decimal::ZERO,
            total_resumes: Decimal::ZERO,
            resumes_per_second: Decimal::ZERO,
            click_power: Decimal::ONE,
            producers: default_producers(),
            upgrades: default_upgrades(),
            achievements: AchievementTracker::new(now_ms),
            prestige: Prestige::new(),
            events: RandomEventEngine::new(),
            temporary_effects: TemporaryEffects::default(),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            config,
            unlock_threshold_factor: Decimal::ONE,
            producer_cost_factor: Decimal::ONE,
        };
        debug_assert!(game_core::validate_upgrades(&state.upgrades).is_ok());
        state.reapply_all_effects();
        state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Unlock-threshold factor derived from purchased unlock-boost
    /// upgrades (1 when none).
    pub fn unlock_threshold_factor(&self) -> Decimal {
        self.unlock_threshold_factor
    }

    /// Producer cost factor derived from purchased cost-reduction
    /// upgrades (1 when none).
    pub fn producer_cost_factor(&self) -> Decimal {
        self.producer_cost_factor
    }

    /// Total auto-sender units owned across all producer types.
    pub fn producers_owned(&self) -> u32 {
        self.producers
            .iter()
            .fold(0u32, |acc, p| acc.saturating_add(p.owned))
    }

    /// Baseline click power times any active temporary multiplier.
    pub fn effective_click_power(&self, now_ms: i64) -> Decimal {
        self.click_power
            * self
                .temporary_effects
                .active_multiplier(TemporaryEffectKind::ClickMultiplier, now_ms)
    }

    /// Add resumes earned by a manual click to both the spendable and
    /// lifetime counters.
    pub fn add_resumes_from_click(&mut self, amount: Decimal) {
        self.resumes += amount;
        self.total_resumes += amount;
    }

    /// Per-tick production accrual; fractional amounts are fine here,
    /// currency only has to be whole at display and spend time.
    pub fn add_auto_resumes(&mut self, amount: Decimal) {
        self.resumes += amount;
        self.total_resumes += amount;
    }

    /// The click action: apply effective click power, record the click
    /// statistic, and roll the job-hunt flavor statistics.
    pub fn click(&mut self, now_ms: i64) -> Decimal {
        let gained = self.effective_click_power(now_ms);
        self.add_resumes_from_click(gained);
        self.achievements.record(StatEvent::Click);
        self.roll_click_flavor();
        gained
    }

    fn roll_click_flavor(&mut self) {
        let flavor = self.config.flavor;
        let total = self.total_resumes.to_f64().unwrap_or(f64::MAX);
        let rejection_chance =
            (flavor.rejection_base_chance + total * flavor.rejection_chance_per_resume).min(1.0);
        if self.rng.gen::<f64>() < rejection_chance {
            self.achievements.record(StatEvent::Rejection);
        }
        if self.total_resumes > flavor.overqualified_min_total
            && self.rng.gen::<f64>() < flavor.overqualified_chance
        {
            self.achievements.record(StatEvent::Overqualified);
        }
        if self.total_resumes > flavor.entry_level_min_total
            && self.rng.gen::<f64>() < flavor.entry_level_chance
        {
            self.achievements.record(StatEvent::EntryLevelExperience);
        }
        if self.producers_owned() > flavor.networking_min_producers
            && self.rng.gen::<f64>() < flavor.networking_chance
        {
            self.achievements.record(StatEvent::NetworkingEvent);
        }
    }

    /// Buy one unit of a producer. Deduction and increment are atomic
    /// from the caller's perspective; any failure leaves state as-is.
    pub fn purchase_producer(&mut self, id: &str, now_ms: i64) -> Result<Decimal, GameError> {
        let cost_factor = self.producer_cost_factor;
        let available = self.resumes;
        let producer = self
            .producers
            .iter_mut()
            .find(|p| p.id.as_str() == id)
            .ok_or_else(|| GameError::NotFound {
                kind: EntityKind::Producer,
                id: id.to_string(),
            })?;
        let cost = producer.validate(available, cost_factor)?;
        producer.commit();
        self.resumes -= cost;
        self.recompute_production(now_ms);
        debug!(id, %cost, "auto-sender purchased");
        Ok(cost)
    }

    pub(crate) fn purchased_upgrade_ids(&self) -> BTreeSet<UpgradeId> {
        self.upgrades
            .iter()
            .filter(|u| u.purchased)
            .map(|u| u.id.clone())
            .collect()
    }

    pub(crate) fn unlock_view<'a>(&self, purchased: &'a BTreeSet<UpgradeId>) -> UnlockView<'a> {
        UnlockView {
            total_resumes: self.total_resumes,
            producers_owned: self.producers_owned(),
            upgrades_purchased: purchased.len() as u32,
            achievements_unlocked: self.achievements.unlocked_count(),
            purchased,
        }
    }

    /// Upgrade cost after the prestige cost-reduction bonus.
    pub(crate) fn effective_upgrade_cost(&self, upgrade: &Upgrade) -> Decimal {
        let reduction = self
            .prestige
            .bonus_effect(PermanentBonusId::UpgradeCostReduction);
        (upgrade.cost * (Decimal::ONE - reduction)).floor()
    }

    /// Buy an upgrade. On success the whole effect stack is reapplied;
    /// effects are never mutated in place at purchase time.
    pub fn purchase_upgrade(&mut self, id: &str, now_ms: i64) -> Result<Decimal, GameError> {
        let index = self
            .upgrades
            .iter()
            .position(|u| u.id.as_str() == id)
            .ok_or_else(|| GameError::NotFound {
                kind: EntityKind::Upgrade,
                id: id.to_string(),
            })?;
        if self.upgrades[index].purchased {
            return Err(GameError::AlreadyPurchased(id.to_string()));
        }
        let purchased = self.purchased_upgrade_ids();
        let view = self.unlock_view(&purchased);
        if !self.upgrades[index].is_unlocked(&view) {
            return Err(GameError::NotUnlocked(id.to_string()));
        }
        let cost = self.effective_upgrade_cost(&self.upgrades[index]);
        if self.resumes < cost {
            return Err(GameError::InsufficientFunds {
                needed: cost,
                available: self.resumes,
            });
        }
        self.resumes -= cost;
        self.upgrades[index].purchased = true;
        info!(id, %cost, "upgrade purchased");
        self.reapply_all_effects();
        self.recompute_production(now_ms);
        Ok(cost)
    }

    /// Spend experience points on a permanent bonus level.
    pub fn purchase_permanent_bonus(
        &mut self,
        id: &str,
        now_ms: i64,
    ) -> Result<Decimal, GameError> {
        let bonus_id = PermanentBonusId::from_key(id).ok_or_else(|| GameError::NotFound {
            kind: EntityKind::Bonus,
            id: id.to_string(),
        })?;
        let cost = self.prestige.purchase_bonus(bonus_id)?;
        self.reapply_all_effects();
        self.recompute_production(now_ms);
        Ok(cost)
    }

    /// Switch to an unlocked industry; free and reset-less. The new
    /// multipliers land via the reapplication pass.
    pub fn select_industry(&mut self, id: &str, now_ms: i64) -> Result<(), GameError> {
        let industry = IndustryId::from_key(id).ok_or_else(|| GameError::NotFound {
            kind: EntityKind::Industry,
            id: id.to_string(),
        })?;
        self.prestige.select_industry(industry)?;
        self.reapply_all_effects();
        self.recompute_production(now_ms);
        Ok(())
    }

    /// The career change: the single irreversible transition. The gate
    /// is checked first; after it passes nothing below can fail, so
    /// the reset is all-or-nothing.
    pub fn perform_prestige(&mut self, now_ms: i64) -> Result<PrestigeOutcome, GameError> {
        if !self.prestige.can_prestige(self.total_resumes) {
            return Err(GameError::PrestigeNotReady {
                required: self.prestige.requirement(),
                total: self.total_resumes,
            });
        }
        let experience_gained = self.prestige.experience_gain(self.total_resumes);
        self.prestige.life_experience_points += experience_gained;
        self.prestige.total_life_experience_earned += experience_gained;
        self.prestige.level += 1;
        let unlocked_industries = self.prestige.unlock_industries_for_level();

        self.resumes = Decimal::ZERO;
        self.total_resumes = Decimal::ZERO;
        self.resumes_per_second = Decimal::ZERO;
        for producer in &mut self.producers {
            producer.owned = 0;
        }
        for upgrade in &mut self.upgrades {
            upgrade.purchased = false;
        }
        self.achievements.reset_statistics(now_ms);

        let starting = self
            .prestige
            .bonus_effect(PermanentBonusId::StartingResumes);
        if starting > Decimal::ZERO {
            self.resumes += starting;
            self.total_resumes += starting;
        }

        self.reapply_all_effects();
        self.recompute_production(now_ms);
        let unlocked_prestige_achievements = self.prestige.check_achievements();
        info!(level = self.prestige.level, %experience_gained, "career change complete");
        Ok(PrestigeOutcome {
            experience_gained,
            new_level: self.prestige.level,
            unlocked_industries,
            unlocked_prestige_achievements,
        })
    }

    /// Wipe everything, prestige state included, and start over.
    pub fn reset_to_new_game(&mut self, now_ms: i64) {
        *self = GameState::new(self.config, now_ms);
    }

    /// Refresh the aggregate production rate from producer state and
    /// any active temporary boost. Must run after every change to
    /// owned counts, efficiency, or temporary effects.
    pub fn recompute_production(&mut self, now_ms: i64) {
        let total = game_econ::production_sum(
            self.producers
                .iter()
                .map(|p| (p.base_production, p.owned, p.efficiency_multiplier)),
        );
        let boost = self
            .temporary_effects
            .active_multiplier(TemporaryEffectKind::AutoSenderBoost, now_ms);
        self.resumes_per_second = total * boost;
    }

    /// Deterministic, idempotent recomputation of click power and
    /// producer efficiency from scratch: base values, then prestige
    /// permanent bonuses, then the current industry's multipliers,
    /// then purchased upgrades in registry order, then unlocked
    /// achievement rewards in registry order. Stale multipliers are a
    /// correctness bug, so this runs after every purchase, career
    /// change, bonus purchase, and industry switch.
    pub fn reapply_all_effects(&mut self) {
        let mut click = Decimal::ONE;
        let mut efficiency = Decimal::ONE;
        let mut threshold_factor = Decimal::ONE;
        let mut cost_factor = Decimal::ONE;

        click *= Decimal::ONE
            + self
                .prestige
                .bonus_effect(PermanentBonusId::ClickPowerMultiplier);
        efficiency *= Decimal::ONE
            + self
                .prestige
                .bonus_effect(PermanentBonusId::AutoSenderEfficiency);

        let industry = self.prestige.current_industry_def();
        click *= industry.click_multiplier;
        efficiency *= industry.production_multiplier;

        for upgrade in &self.upgrades {
            if !upgrade.purchased {
                continue;
            }
            match &upgrade.effect {
                UpgradeEffect::ClickMultiplier { value } => click *= *value,
                UpgradeEffect::AutoSenderEfficiency { value } => efficiency *= *value,
                UpgradeEffect::AutoSenderUnlockBoost { factor } => threshold_factor *= *factor,
                UpgradeEffect::AutoSenderCostReduction { factor } => cost_factor *= *factor,
                UpgradeEffect::UltimateMultiplier { value } => {
                    click *= *value;
                    efficiency *= *value;
                }
                UpgradeEffect::Unknown => {
                    warn!(id = %upgrade.id.as_str(), "ignoring unknown upgrade effect");
                }
            }
        }

        for reward in self.achievements.unlocked_rewards() {
            match reward {
                AchievementReward::ClickMultiplier { value } => click *= value,
                AchievementReward::AutoSenderEfficiency { value } => efficiency *= value,
                AchievementReward::Unknown => warn!("ignoring unknown achievement reward"),
            }
        }

        self.click_power = click;
        for producer in &mut self.producers {
            producer.efficiency_multiplier = efficiency;
        }
        self.unlock_threshold_factor = threshold_factor;
        self.producer_cost_factor = cost_factor;
    }

    /// One driver tick. Ordering within the tick: expire temporary
    /// effects, recompute production, integrate it into the currency
    /// totals, poll random events, then run the (batched) achievement
    /// check. A boost that expired by this tick's wall clock therefore
    /// never contributes to this tick's accrual.
    pub fn update(&mut self, now_ms: i64, dt_ms: u64) -> TickOutcome {
        let expired_effects = self.temporary_effects.expire(now_ms);
        if !expired_effects.is_empty() {
            debug!(?expired_effects, "temporary effects expired");
        }

        self.recompute_production(now_ms);
        let mut resumes_gained = Decimal::ZERO;
        if self.resumes_per_second > Decimal::ZERO && dt_ms > 0 {
            resumes_gained =
                self.resumes_per_second * Decimal::from(dt_ms) / Decimal::ONE_THOUSAND;
            self.add_auto_resumes(resumes_gained);
        }

        let producers_owned = self.producers_owned();
        let event = self.events.step(
            now_ms,
            self.total_resumes,
            producers_owned,
            &mut self.rng,
            &mut self.temporary_effects,
        );
        if let Some(fired) = &event {
            match fired.kind {
                RandomEventKind::Rejection => self.achievements.record(StatEvent::Rejection),
                RandomEventKind::Networking => {
                    self.achievements.record(StatEvent::NetworkingEvent)
                }
                RandomEventKind::SuccessTease => self.achievements.record(StatEvent::Response),
                RandomEventKind::FakeInterview | RandomEventKind::Flavor => {}
            }
            // A boost applied this tick shows up in the displayed rate
            // immediately; it did not touch this tick's accrual.
            self.recompute_production(now_ms);
        }

        let unlocked_achievements = self.achievements.check(now_ms, self.total_resumes);
        if !unlocked_achievements.is_empty() {
            self.reapply_all_effects();
            self.recompute_production(now_ms);
        }

        TickOutcome {
            expired_effects,
            event,
            unlocked_achievements,
            resumes_gained,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silent_flavor() -> FlavorConfig {
        FlavorConfig {
            rejection_base_chance: 0.0,
            rejection_chance_per_resume: 0.0,
            overqualified_chance: 0.0,
            entry_level_chance: 0.0,
            networking_chance: 0.0,
            ..FlavorConfig::default()
        }
    }

    fn quiet_state() -> GameState {
        GameState::new(
            GameConfig {
                rng_seed: 42,
                flavor: silent_flavor(),
            },
            0,
        )
    }

    #[test]
    fn click_applies_click_power_to_both_counters() {
        let mut state = quiet_state();
        let gained = state.click(0);
        assert_eq!(gained, Decimal::ONE);
        assert_eq!(state.resumes, Decimal::ONE);
        assert_eq!(state.total_resumes, Decimal::ONE);
        assert_eq!(state.achievements.stats.total_clicks, 1);
    }

    #[test]
    fn producer_purchase_exact_funds_boundary() {
        let mut state = quiet_state();
        state.add_auto_resumes(Decimal::new(15, 0));
        let cost = state.purchase_producer("linkedin-premium", 0).unwrap();
        assert_eq!(cost, Decimal::new(15, 0));
        assert_eq!(state.resumes, Decimal::ZERO);
        assert_eq!(state.producers[0].owned, 1);
        assert_eq!(state.resumes_per_second, Decimal::new(1, 1));

        let mut short = quiet_state();
        short.add_auto_resumes(Decimal::new(14, 0));
        let err = short.purchase_producer("linkedin-premium", 0).unwrap_err();
        assert!(matches!(err, GameError::InsufficientFunds { .. }));
        assert_eq!(short.producers[0].owned, 0);
        assert_eq!(short.resumes, Decimal::new(14, 0));
    }

    #[test]
    fn unknown_producer_id_is_not_found() {
        let mut state = quiet_state();
        assert_eq!(
            state.purchase_producer("fax-machine", 0),
            Err(GameError::NotFound {
                kind: EntityKind::Producer,
                id: "fax-machine".to_string(),
            })
        );
    }

    #[test]
    fn upgrade_with_unpurchased_dependency_is_locked() {
        let mut state = quiet_state();
        state.add_auto_resumes(Decimal::new(100_000, 0));
        let before = state.resumes;
        let err = state.purchase_upgrade("cover-letter-templates", 0).unwrap_err();
        assert_eq!(err, GameError::NotUnlocked("cover-letter-templates".to_string()));
        assert_eq!(state.resumes, before);
        assert!(!game_core::find_upgrade(&state.upgrades, "cover-letter-templates")
            .unwrap()
            .purchased);
    }

    #[test]
    fn upgrade_purchase_is_one_shot() {
        let mut state = quiet_state();
        state.add_auto_resumes(Decimal::new(100_000, 0));
        state.purchase_upgrade("resume-formatting", 0).unwrap();
        assert_eq!(state.click_power, Decimal::TWO);
        assert_eq!(
            state.purchase_upgrade("resume-formatting", 0),
            Err(GameError::AlreadyPurchased("resume-formatting".to_string()))
        );
    }

    #[test]
    fn reapply_is_idempotent() {
        let mut state = quiet_state();
        state.add_auto_resumes(Decimal::new(100_000, 0));
        state.purchase_producer("linkedin-premium", 0).unwrap();
        state.purchase_upgrade("resume-formatting", 0).unwrap();
        state.purchase_upgrade("cover-letter-templates", 0).unwrap();

        state.reapply_all_effects();
        let click_once = state.click_power;
        let eff_once = state.producers[0].efficiency_multiplier;
        state.reapply_all_effects();
        assert_eq!(state.click_power, click_once);
        assert_eq!(state.producers[0].efficiency_multiplier, eff_once);
    }

    #[test]
    fn ultimate_multiplier_hits_click_and_efficiency() {
        let mut state = quiet_state();
        for upgrade in &mut state.upgrades {
            if upgrade.id.as_str() == "thought-leadership" {
                upgrade.purchased = true;
            }
        }
        state.reapply_all_effects();
        assert_eq!(state.click_power, Decimal::TEN);
        assert_eq!(state.producers[0].efficiency_multiplier, Decimal::TEN);
    }

    #[test]
    fn unknown_effect_is_skipped_not_fatal() {
        let mut state = quiet_state();
        state.upgrades[0].effect = UpgradeEffect::Unknown;
        state.upgrades[0].purchased = true;
        state.reapply_all_effects();
        assert_eq!(state.click_power, Decimal::ONE);
    }

    #[test]
    fn cost_reduction_and_unlock_boost_become_factors() {
        let mut state = quiet_state();
        for upgrade in &mut state.upgrades {
            match upgrade.id.as_str() {
                "linkedin-optimization" | "skills-endorsements" => upgrade.purchased = true,
                _ => {}
            }
        }
        state.reapply_all_effects();
        assert_eq!(state.unlock_threshold_factor(), Decimal::new(8, 1));
        assert_eq!(state.producer_cost_factor(), Decimal::new(75, 2));
        // indeed-mass-applier: ceil(500 * 0.75) = 375
        assert_eq!(
            state.producers[1].current_cost(state.producer_cost_factor()),
            Decimal::new(375, 0)
        );
    }

    #[test]
    fn prestige_gate_is_inclusive() {
        let mut state = quiet_state();
        state.add_auto_resumes(Decimal::new(9_999, 0));
        let err = state.perform_prestige(0).unwrap_err();
        assert_eq!(
            err,
            GameError::PrestigeNotReady {
                required: Decimal::new(10_000, 0),
                total: Decimal::new(9_999, 0),
            }
        );

        state.add_auto_resumes(Decimal::ONE);
        let outcome = state.perform_prestige(0).unwrap();
        assert_eq!(outcome.new_level, 1);
        // floor(sqrt(10) * 10) = 31
        assert_eq!(outcome.experience_gained, Decimal::new(31, 0));
    }

    #[test]
    fn prestige_reset_is_complete_and_preserves_achievements() {
        let mut state = quiet_state();
        state.add_auto_resumes(Decimal::new(20_000, 0));
        state.purchase_producer("linkedin-premium", 0).unwrap();
        state.purchase_upgrade("resume-formatting", 0).unwrap();
        state.achievements.record(StatEvent::Rejection);
        state.achievements.check(1_000, state.total_resumes);
        assert!(state.achievements.achievements[0].unlocked);

        let preview = state.prestige.experience_gain(state.total_resumes);
        let outcome = state.perform_prestige(2_000).unwrap();
        assert_eq!(outcome.experience_gained, preview);
        assert_eq!(state.prestige.level, 1);
        assert_eq!(state.resumes, Decimal::ZERO);
        assert_eq!(state.total_resumes, Decimal::ZERO);
        assert!(state.producers.iter().all(|p| p.owned == 0));
        assert!(state.upgrades.iter().all(|u| !u.purchased));
        assert_eq!(state.achievements.stats.rejections, 0);
        assert!(state.achievements.achievements[0].unlocked);
        assert!(state.prestige.is_industry_unlocked(IndustryId::Finance));
        assert!(outcome
            .unlocked_prestige_achievements
            .contains(&PrestigeAchievementId::FirstCareerChange));
    }

    #[test]
    fn starting_resumes_bonus_grants_after_reset() {
        let mut state = quiet_state();
        state.prestige.life_experience_points = Decimal::new(1_000, 0);
        state.purchase_permanent_bonus("startingResumes", 0).unwrap();
        state.add_auto_resumes(Decimal::new(10_000, 0));
        state.perform_prestige(0).unwrap();
        assert_eq!(state.resumes, Decimal::ONE_HUNDRED);
        assert_eq!(state.total_resumes, Decimal::ONE_HUNDRED);
    }

    #[test]
    fn industry_switch_changes_multipliers_without_reset() {
        let mut state = quiet_state();
        state.add_auto_resumes(Decimal::new(10_000, 0));
        state.perform_prestige(0).unwrap();
        state.add_auto_resumes(Decimal::new(500, 0));
        let total_before = state.total_resumes;

        state.select_industry("finance", 0).unwrap();
        assert_eq!(state.total_resumes, total_before);
        assert_eq!(state.click_power, Decimal::new(8, 1));
        assert_eq!(state.producers[0].efficiency_multiplier, Decimal::new(15, 1));

        assert_eq!(
            state.select_industry("entertainment", 0),
            Err(GameError::NotUnlocked("entertainment".to_string()))
        );
    }

    #[test]
    fn expired_click_boost_restores_baseline_next_tick() {
        let mut state = quiet_state();
        state.temporary_effects.apply(
            TemporaryEffectKind::ClickMultiplier,
            TemporaryEffect {
                multiplier: Decimal::TWO,
                started_at_ms: 0,
                duration_ms: 10_000,
            },
        );
        state.update(5_000, 1_000);
        assert_eq!(state.effective_click_power(5_000), Decimal::TWO);

        let outcome = state.update(10_000, 1_000);
        assert_eq!(outcome.expired_effects, vec![TemporaryEffectKind::ClickMultiplier]);
        assert_eq!(state.effective_click_power(10_000), Decimal::ONE);
    }

    #[test]
    fn expired_production_boost_skips_that_ticks_accrual() {
        let mut state = quiet_state();
        state.add_auto_resumes(Decimal::new(15, 0));
        state.purchase_producer("linkedin-premium", 0).unwrap();
        state.temporary_effects.apply(
            TemporaryEffectKind::AutoSenderBoost,
            TemporaryEffect {
                multiplier: Decimal::new(15, 1),
                started_at_ms: 0,
                duration_ms: 10_000,
            },
        );

        let boosted = state.update(5_000, 1_000);
        assert_eq!(boosted.resumes_gained, Decimal::new(15, 2));

        let plain = state.update(10_000, 1_000);
        assert_eq!(plain.resumes_gained, Decimal::new(1, 1));
        assert_eq!(state.resumes_per_second, Decimal::new(1, 1));
    }

    #[test]
    fn flavor_rolls_respect_configuration() {
        let mut flavor = silent_flavor();
        flavor.rejection_base_chance = 1.0;
        let mut state = GameState::new(
            GameConfig {
                rng_seed: 1,
                flavor,
            },
            0,
        );
        for _ in 0..5 {
            state.click(0);
        }
        assert_eq!(state.achievements.stats.rejections, 5);
        assert_eq!(state.achievements.stats.consecutive_failures, 5);
        assert_eq!(state.achievements.stats.overqualified_applications, 0);
    }

    #[test]
    fn purchases_conserve_currency() {
        use proptest::prelude::*;
        proptest!(|(budget in 15i64..10_000)| {
            let mut state = quiet_state();
            state.add_auto_resumes(Decimal::new(budget, 0));
            let mut spent = Decimal::ZERO;
            while let Ok(cost) = state.purchase_producer("linkedin-premium", 0) {
                spent += cost;
            }
            prop_assert_eq!(state.resumes + spent, Decimal::new(budget, 0));
            prop_assert!(state.resumes < state.producers[0].current_cost(Decimal::ONE));
        });
    }

    #[test]
    fn reset_to_new_game_wipes_prestige_too() {
        let mut state = quiet_state();
        state.add_auto_resumes(Decimal::new(10_000, 0));
        state.perform_prestige(0).unwrap();
        assert_eq!(state.prestige.level, 1);
        state.reset_to_new_game(0);
        assert_eq!(state.prestige.level, 0);
        assert_eq!(state.resumes, Decimal::ZERO);
        assert_eq!(state.prestige.life_experience_points, Decimal::ZERO);
    }
}
