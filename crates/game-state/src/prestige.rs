//! Career changes: the prestige gate, permanent bonuses, industries,
//! and prestige-only achievements.
//!
//! Nothing in here resets on prestige; this is the carry-over state
//! that the reset exists to manage. The reset of the run-scoped state
//! itself is orchestrated by the economy core, which owns it.

use game_core::{EntityKind, GameError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The fixed set of permanent bonus tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PermanentBonusId {
    ClickPowerMultiplier,
    AutoSenderEfficiency,
    StartingResumes,
    UpgradeCostReduction,
    ExperienceGainRate,
}

impl PermanentBonusId {
    pub const ALL: [PermanentBonusId; 5] = [
        PermanentBonusId::ClickPowerMultiplier,
        PermanentBonusId::AutoSenderEfficiency,
        PermanentBonusId::StartingResumes,
        PermanentBonusId::UpgradeCostReduction,
        PermanentBonusId::ExperienceGainRate,
    ];

    /// Stable key used by the action surface and the save format.
    pub fn key(&self) -> &'static str {
        match self {
            PermanentBonusId::ClickPowerMultiplier => "clickPowerMultiplier",
            PermanentBonusId::AutoSenderEfficiency => "autoSenderEfficiency",
            PermanentBonusId::StartingResumes => "startingResumes",
            PermanentBonusId::UpgradeCostReduction => "upgradeCostReduction",
            PermanentBonusId::ExperienceGainRate => "experienceGainRate",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.key() == key)
    }
}

/// One permanent bonus track with its own level and cost curve.
#[derive(Clone, Debug)]
pub struct PermanentBonus {
    pub id: PermanentBonusId,
    pub description: String,
    pub base_cost: Decimal,
    pub cost_multiplier: Decimal,
    pub effect_per_level: Decimal,
    pub max_level: u32,
    pub level: u32,
}

impl PermanentBonus {
    fn new(
        id: PermanentBonusId,
        description: &str,
        base_cost: i64,
        cost_multiplier: Decimal,
        effect_per_level: Decimal,
        max_level: u32,
    ) -> Self {
        Self {
            id,
            description: description.to_string(),
            base_cost: Decimal::new(base_cost, 0),
            cost_multiplier,
            effect_per_level,
            max_level,
            level: 0,
        }
    }

    /// Cost of the next level: `base * multiplier^level`.
    pub fn next_cost(&self) -> Decimal {
        game_econ::scaled_cost(self.base_cost, self.cost_multiplier, self.level)
            .unwrap_or(self.base_cost)
    }

    /// Current cumulative effect: `effect_per_level * level`.
    pub fn effect(&self) -> Decimal {
        self.effect_per_level * Decimal::from(self.level)
    }
}

fn default_bonuses() -> Vec<PermanentBonus> {
    vec![
        PermanentBonus::new(
            PermanentBonusId::ClickPowerMultiplier,
            "Increases click power by 25% per level",
            10,
            Decimal::new(15, 1),
            Decimal::new(25, 2),
            20,
        ),
        PermanentBonus::new(
            PermanentBonusId::AutoSenderEfficiency,
            "Increases all auto-sender production by 20% per level",
            15,
            Decimal::new(16, 1),
            Decimal::new(2, 1),
            15,
        ),
        PermanentBonus::new(
            PermanentBonusId::StartingResumes,
            "Start each career with 100 more resumes per level",
            25,
            Decimal::TWO,
            Decimal::ONE_HUNDRED,
            10,
        ),
        PermanentBonus::new(
            PermanentBonusId::UpgradeCostReduction,
            "Reduces upgrade costs by 5% per level",
            30,
            Decimal::new(18, 1),
            Decimal::new(5, 2),
            12,
        ),
        PermanentBonus::new(
            PermanentBonusId::ExperienceGainRate,
            "Increases Life Experience gain rate by 30% per level",
            50,
            Decimal::new(22, 1),
            Decimal::new(3, 1),
            8,
        ),
    ]
}

/// Mutually exclusive modifier sets unlocked by prestige level.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum IndustryId {
    Tech,
    Finance,
    Healthcare,
    Education,
    Entertainment,
}

impl IndustryId {
    pub const ALL: [IndustryId; 5] = [
        IndustryId::Tech,
        IndustryId::Finance,
        IndustryId::Healthcare,
        IndustryId::Education,
        IndustryId::Entertainment,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            IndustryId::Tech => "tech",
            IndustryId::Finance => "finance",
            IndustryId::Healthcare => "healthcare",
            IndustryId::Education => "education",
            IndustryId::Entertainment => "entertainment",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.key() == key)
    }
}

/// An industry's fixed multipliers and unlock gate.
#[derive(Clone, Debug)]
pub struct Industry {
    pub id: IndustryId,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub unlock_level: u32,
    pub click_multiplier: Decimal,
    pub production_multiplier: Decimal,
}

impl Industry {
    fn new(
        id: IndustryId,
        name: &str,
        icon: &str,
        description: &str,
        unlock_level: u32,
        click_multiplier: Decimal,
        production_multiplier: Decimal,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            icon: icon.to_string(),
            description: description.to_string(),
            unlock_level,
            click_multiplier,
            production_multiplier,
        }
    }
}

fn default_industries() -> Vec<Industry> {
    vec![
        Industry::new(
            IndustryId::Tech,
            "Technology",
            "\u{1f4bb}",
            "Fast-paced innovation with stock options that may never vest",
            0,
            Decimal::ONE,
            Decimal::ONE,
        ),
        Industry::new(
            IndustryId::Finance,
            "Finance",
            "\u{1f4b0}",
            "High stress, high reward... mostly stress",
            1,
            Decimal::new(8, 1),
            Decimal::new(15, 1),
        ),
        Industry::new(
            IndustryId::Healthcare,
            "Healthcare",
            "\u{1f3e5}",
            "Saving lives while drowning in paperwork",
            2,
            Decimal::new(12, 1),
            Decimal::new(9, 1),
        ),
        Industry::new(
            IndustryId::Education,
            "Education",
            "\u{1f393}",
            "Shaping young minds for poverty wages",
            3,
            Decimal::new(9, 1),
            Decimal::new(8, 1),
        ),
        Industry::new(
            IndustryId::Entertainment,
            "Entertainment",
            "\u{1f3ad}",
            "Dream big, earn small, blame the algorithm",
            4,
            Decimal::new(13, 1),
            Decimal::new(12, 1),
        ),
    ]
}

/// Prestige-only achievements live in their own namespace, separate
/// from the regular tracker; their reward is an experience grant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrestigeAchievementId {
    FirstCareerChange,
    IndustryHopper,
    ExperienceCollector,
    MaxedOut,
}

impl PrestigeAchievementId {
    pub const ALL: [PrestigeAchievementId; 4] = [
        PrestigeAchievementId::FirstCareerChange,
        PrestigeAchievementId::IndustryHopper,
        PrestigeAchievementId::ExperienceCollector,
        PrestigeAchievementId::MaxedOut,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            PrestigeAchievementId::FirstCareerChange => "first-career-change",
            PrestigeAchievementId::IndustryHopper => "industry-hopper",
            PrestigeAchievementId::ExperienceCollector => "experience-collector",
            PrestigeAchievementId::MaxedOut => "maxed-out",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.key() == key)
    }
}

#[derive(Clone, Debug)]
pub struct PrestigeAchievement {
    pub id: PrestigeAchievementId,
    pub name: String,
    pub description: String,
    pub experience_reward: Decimal,
    pub unlocked: bool,
}

fn default_prestige_achievements() -> Vec<PrestigeAchievement> {
    let entry = |id, name: &str, description: &str, reward: i64| PrestigeAchievement {
        id,
        name: name.to_string(),
        description: description.to_string(),
        experience_reward: Decimal::new(reward, 0),
        unlocked: false,
    };
    vec![
        entry(
            PrestigeAchievementId::FirstCareerChange,
            "Career Pivot",
            "Complete your first Career Change",
            50,
        ),
        entry(
            PrestigeAchievementId::IndustryHopper,
            "Industry Hopper",
            "Unlock all 5 industries",
            200,
        ),
        entry(
            PrestigeAchievementId::ExperienceCollector,
            "Wise Beyond Your Years",
            "Accumulate 1000 Life Experience points",
            100,
        ),
        entry(
            PrestigeAchievementId::MaxedOut,
            "Life Mastery",
            "Max out any permanent bonus",
            500,
        ),
    ]
}

/// The prestige engine's carried-over state.
#[derive(Clone, Debug)]
pub struct Prestige {
    pub level: u32,
    pub life_experience_points: Decimal,
    pub total_life_experience_earned: Decimal,
    pub current_industry: IndustryId,
    pub unlocked_industries: BTreeSet<IndustryId>,
    pub bonuses: Vec<PermanentBonus>,
    pub industries: Vec<Industry>,
    pub achievements: Vec<PrestigeAchievement>,
}

impl Default for Prestige {
    fn default() -> Self {
        Self::new()
    }
}

impl Prestige {
    pub fn new() -> Self {
        let mut unlocked = BTreeSet::new();
        unlocked.insert(IndustryId::Tech);
        Self {
            level: 0,
            life_experience_points: Decimal::ZERO,
            total_life_experience_earned: Decimal::ZERO,
            current_industry: IndustryId::Tech,
            unlocked_industries: unlocked,
            bonuses: default_bonuses(),
            industries: default_industries(),
            achievements: default_prestige_achievements(),
        }
    }

    pub fn bonus(&self, id: PermanentBonusId) -> &PermanentBonus {
        self.bonuses
            .iter()
            .find(|b| b.id == id)
            .unwrap_or(&self.bonuses[0])
    }

    /// Cumulative effect of a bonus track (0 when unleveled).
    pub fn bonus_effect(&self, id: PermanentBonusId) -> Decimal {
        self.bonuses
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.effect())
            .unwrap_or(Decimal::ZERO)
    }

    /// Spend experience points on the next level of a bonus track.
    /// Exactly one level per purchase; there is no bulk-buy.
    pub fn purchase_bonus(&mut self, id: PermanentBonusId) -> Result<Decimal, GameError> {
        let idx = self
            .bonuses
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| GameError::NotFound {
                kind: EntityKind::Bonus,
                id: id.key().to_string(),
            })?;
        let bonus = &self.bonuses[idx];
        if bonus.level >= bonus.max_level {
            return Err(GameError::MaxLevelReached(id.key().to_string()));
        }
        let cost = bonus.next_cost();
        if self.life_experience_points < cost {
            return Err(GameError::InsufficientFunds {
                needed: cost,
                available: self.life_experience_points,
            });
        }
        self.life_experience_points -= cost;
        self.bonuses[idx].level += 1;
        Ok(cost)
    }

    /// Lifetime-resume threshold for the next career change.
    pub fn requirement(&self) -> Decimal {
        game_econ::prestige_requirement(self.level)
    }

    /// The gate is inclusive: exactly meeting the requirement passes.
    pub fn can_prestige(&self, total_resumes: Decimal) -> bool {
        total_resumes >= self.requirement()
    }

    /// Preview of the experience a reset at `total_resumes` would
    /// grant. Pure; shares its formula with the actual grant.
    pub fn experience_gain(&self, total_resumes: Decimal) -> Decimal {
        game_econ::experience_gain(
            total_resumes,
            self.level,
            self.bonus_effect(PermanentBonusId::ExperienceGainRate),
        )
    }

    pub fn is_industry_unlocked(&self, id: IndustryId) -> bool {
        self.unlocked_industries.contains(&id)
    }

    /// Unlock every industry whose level threshold is now met; returns
    /// the newly unlocked set. The unlocked set only grows.
    pub fn unlock_industries_for_level(&mut self) -> Vec<IndustryId> {
        let mut newly = Vec::new();
        for industry in &self.industries {
            if self.level >= industry.unlock_level
                && self.unlocked_industries.insert(industry.id)
            {
                newly.push(industry.id);
            }
        }
        newly
    }

    /// Switch to an already-unlocked industry. Free, allowed anytime,
    /// and never triggers a reset; the new multipliers take effect at
    /// the next effect reapplication.
    pub fn select_industry(&mut self, id: IndustryId) -> Result<(), GameError> {
        if !self.is_industry_unlocked(id) {
            return Err(GameError::NotUnlocked(id.key().to_string()));
        }
        self.current_industry = id;
        Ok(())
    }

    pub fn industry(&self, id: IndustryId) -> &Industry {
        self.industries
            .iter()
            .find(|i| i.id == id)
            .unwrap_or(&self.industries[0])
    }

    pub fn current_industry_def(&self) -> &Industry {
        self.industry(self.current_industry)
    }

    /// Evaluate prestige achievements, granting experience rewards for
    /// any that newly pass. Unlocks are terminal.
    pub fn check_achievements(&mut self) -> Vec<PrestigeAchievementId> {
        let mut newly = Vec::new();
        for i in 0..self.achievements.len() {
            if self.achievements[i].unlocked {
                continue;
            }
            let met = match self.achievements[i].id {
                PrestigeAchievementId::FirstCareerChange => self.level >= 1,
                PrestigeAchievementId::IndustryHopper => self.unlocked_industries.len() >= 5,
                PrestigeAchievementId::ExperienceCollector => {
                    self.total_life_experience_earned >= Decimal::ONE_THOUSAND
                }
                PrestigeAchievementId::MaxedOut => {
                    self.bonuses.iter().any(|b| b.level >= b.max_level)
                }
            };
            if met {
                self.achievements[i].unlocked = true;
                self.life_experience_points += self.achievements[i].experience_reward;
                newly.push(self.achievements[i].id);
            }
        }
        newly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bonus_cost_curve() {
        let mut prestige = Prestige::new();
        prestige.life_experience_points = Decimal::new(1_000, 0);
        // clickPowerMultiplier: base 10, multiplier 1.5
        let c0 = prestige.purchase_bonus(PermanentBonusId::ClickPowerMultiplier).unwrap();
        assert_eq!(c0, Decimal::TEN);
        let c1 = prestige.purchase_bonus(PermanentBonusId::ClickPowerMultiplier).unwrap();
        assert_eq!(c1, Decimal::new(15, 0));
        let c2 = prestige.purchase_bonus(PermanentBonusId::ClickPowerMultiplier).unwrap();
        assert_eq!(c2, Decimal::new(225, 1));
        assert_eq!(
            prestige.bonus_effect(PermanentBonusId::ClickPowerMultiplier),
            Decimal::new(75, 2)
        );
    }

    #[test]
    fn bonus_purchase_failures() {
        let mut prestige = Prestige::new();
        assert!(matches!(
            prestige.purchase_bonus(PermanentBonusId::StartingResumes),
            Err(GameError::InsufficientFunds { .. })
        ));
        prestige.life_experience_points = Decimal::new(1_000_000_000, 0);
        for _ in 0..8 {
            prestige.purchase_bonus(PermanentBonusId::ExperienceGainRate).unwrap();
        }
        assert_eq!(
            prestige.purchase_bonus(PermanentBonusId::ExperienceGainRate),
            Err(GameError::MaxLevelReached("experienceGainRate".to_string()))
        );
    }

    #[test]
    fn experience_spend_never_touches_lifetime_total() {
        let mut prestige = Prestige::new();
        prestige.life_experience_points = Decimal::ONE_HUNDRED;
        prestige.total_life_experience_earned = Decimal::ONE_HUNDRED;
        prestige.purchase_bonus(PermanentBonusId::ClickPowerMultiplier).unwrap();
        assert_eq!(prestige.life_experience_points, Decimal::new(90, 0));
        assert_eq!(prestige.total_life_experience_earned, Decimal::ONE_HUNDRED);
    }

    #[test]
    fn industry_unlocks_follow_level() {
        let mut prestige = Prestige::new();
        assert!(prestige.is_industry_unlocked(IndustryId::Tech));
        assert!(!prestige.is_industry_unlocked(IndustryId::Finance));
        assert_eq!(
            prestige.select_industry(IndustryId::Finance),
            Err(GameError::NotUnlocked("finance".to_string()))
        );
        prestige.level = 2;
        let newly = prestige.unlock_industries_for_level();
        assert_eq!(newly, vec![IndustryId::Finance, IndustryId::Healthcare]);
        prestige.select_industry(IndustryId::Finance).unwrap();
        assert_eq!(prestige.current_industry, IndustryId::Finance);
    }

    #[test]
    fn prestige_achievements_grant_experience() {
        let mut prestige = Prestige::new();
        prestige.level = 1;
        let newly = prestige.check_achievements();
        assert_eq!(newly, vec![PrestigeAchievementId::FirstCareerChange]);
        assert_eq!(prestige.life_experience_points, Decimal::new(50, 0));
        // Terminal: a second pass grants nothing.
        assert!(prestige.check_achievements().is_empty());
        assert_eq!(prestige.life_experience_points, Decimal::new(50, 0));
    }

    #[test]
    fn bonus_keys_round_trip() {
        for id in PermanentBonusId::ALL {
            assert_eq!(PermanentBonusId::from_key(id.key()), Some(id));
        }
        assert_eq!(PermanentBonusId::from_key("nope"), None);
        for id in IndustryId::ALL {
            assert_eq!(IndustryId::from_key(id.key()), Some(id));
        }
        for id in PrestigeAchievementId::ALL {
            assert_eq!(PrestigeAchievementId::from_key(id.key()), Some(id));
        }
    }
}
