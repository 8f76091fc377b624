//! The persisted form of the economy state.
//!
//! Currency values travel as decimal strings so no precision is lost
//! in transit; every block after the core currency fields is optional
//! and defaults when absent, so older saves keep loading. Derived
//! fields (`clickPower` effective multipliers, efficiency, production
//! rate) are never trusted from a save: applying one always re-runs
//! the effect reapplication and production recomputation passes.

use crate::achievements::Statistics;
use crate::effects::TemporaryEffects;
use crate::prestige::{IndustryId, PermanentBonusId, PrestigeAchievementId};
use crate::GameState;
use chrono::{DateTime, Utc};
use game_core::GameError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

fn zero_string() -> String {
    "0".to_string()
}

/// Per-producer persisted state: only the owned count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducerSave {
    pub owned: u32,
}

/// Per-upgrade persisted state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpgradeSave {
    pub id: String,
    pub purchased: bool,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementSave {
    pub unlocked: bool,
    #[serde(default)]
    pub unlocked_at_ms: Option<i64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AchievementTrackerSave {
    pub achievements: BTreeMap<String, AchievementSave>,
    pub statistics: Statistics,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct BonusSave {
    pub level: u32,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct PrestigeAchievementSave {
    pub unlocked: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrestigeSave {
    pub level: u32,
    pub life_experience_points: String,
    pub total_life_experience_earned: String,
    pub current_industry: String,
    pub unlocked_industries: Vec<String>,
    pub permanent_bonuses: BTreeMap<String, BonusSave>,
    pub prestige_achievements: BTreeMap<String, PrestigeAchievementSave>,
}

impl Default for PrestigeSave {
    fn default() -> Self {
        Self {
            level: 0,
            life_experience_points: zero_string(),
            total_life_experience_earned: zero_string(),
            current_industry: IndustryId::Tech.key().to_string(),
            unlocked_industries: vec![IndustryId::Tech.key().to_string()],
            permanent_bonuses: BTreeMap::new(),
            prestige_achievements: BTreeMap::new(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RandomEventsSave {
    pub event_cooldowns: BTreeMap<String, i64>,
    pub last_event_time_ms: i64,
    pub news_ticker_index: usize,
}

/// The full persisted record. `resumes`, `totalResumes`, and
/// `clickPower` are the required fields; everything else defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    pub resumes: String,
    pub total_resumes: String,
    pub click_power: String,
    #[serde(default = "zero_string")]
    pub resumes_per_second: String,
    #[serde(default)]
    pub auto_senders: BTreeMap<String, ProducerSave>,
    #[serde(default)]
    pub upgrades: Vec<UpgradeSave>,
    #[serde(default)]
    pub achievement_tracker: AchievementTrackerSave,
    #[serde(default)]
    pub prestige: PrestigeSave,
    #[serde(default)]
    pub random_events: RandomEventsSave,
    #[serde(default)]
    pub temporary_effects: TemporaryEffects,
    #[serde(default)]
    pub save_timestamp: Option<DateTime<Utc>>,
}

fn parse_currency(field: &str, value: &str) -> Result<Decimal, GameError> {
    let parsed = Decimal::from_str_exact(value)
        .map_err(|e| GameError::InvalidSaveData(format!("{field}: {e}")))?;
    if parsed < Decimal::ZERO {
        return Err(GameError::InvalidSaveData(format!("{field}: negative value")));
    }
    Ok(parsed)
}

impl GameState {
    /// Project every persistent field into the save record.
    pub fn to_save(&self) -> SaveData {
        let auto_senders = self
            .producers
            .iter()
            .map(|p| (p.id.as_str().to_string(), ProducerSave { owned: p.owned }))
            .collect();
        let upgrades = self
            .upgrades
            .iter()
            .map(|u| UpgradeSave {
                id: u.id.as_str().to_string(),
                purchased: u.purchased,
            })
            .collect();
        let achievements = self
            .achievements
            .achievements
            .iter()
            .map(|a| {
                (
                    a.id.clone(),
                    AchievementSave {
                        unlocked: a.unlocked,
                        unlocked_at_ms: a.unlocked_at_ms,
                    },
                )
            })
            .collect();
        let prestige = PrestigeSave {
            level: self.prestige.level,
            life_experience_points: self.prestige.life_experience_points.to_string(),
            total_life_experience_earned: self.prestige.total_life_experience_earned.to_string(),
            current_industry: self.prestige.current_industry.key().to_string(),
            unlocked_industries: self
                .prestige
                .unlocked_industries
                .iter()
                .map(|i| i.key().to_string())
                .collect(),
            permanent_bonuses: self
                .prestige
                .bonuses
                .iter()
                .map(|b| (b.id.key().to_string(), BonusSave { level: b.level }))
                .collect(),
            prestige_achievements: self
                .prestige
                .achievements
                .iter()
                .map(|a| {
                    (
                        a.id.key().to_string(),
                        PrestigeAchievementSave { unlocked: a.unlocked },
                    )
                })
                .collect(),
        };

        SaveData {
            resumes: self.resumes.to_string(),
            total_resumes: self.total_resumes.to_string(),
            click_power: self.click_power.to_string(),
            resumes_per_second: self.resumes_per_second.to_string(),
            auto_senders,
            upgrades,
            achievement_tracker: AchievementTrackerSave {
                achievements,
                statistics: self.achievements.stats.clone(),
            },
            prestige,
            random_events: RandomEventsSave {
                event_cooldowns: self.events.cooldowns.clone(),
                last_event_time_ms: self.events.last_event_ms,
                news_ticker_index: self.events.news_index,
            },
            temporary_effects: self.temporary_effects.clone(),
            save_timestamp: Some(Utc::now()),
        }
    }

    /// Replace this state with the persisted record.
    ///
    /// All fallible parsing happens before the first mutation, so a
    /// malformed record leaves the state untouched. Unknown ids inside
    /// the record are logged and skipped rather than failing the load.
    pub fn apply_save(&mut self, data: &SaveData, now_ms: i64) -> Result<(), GameError> {
        let resumes = parse_currency("resumes", &data.resumes)?;
        let total_resumes = parse_currency("totalResumes", &data.total_resumes)?;
        let click_power = parse_currency("clickPower", &data.click_power)?;
        let resumes_per_second =
            parse_currency("resumesPerSecond", &data.resumes_per_second)?;
        let experience = parse_currency(
            "prestige.lifeExperiencePoints",
            &data.prestige.life_experience_points,
        )?;
        let lifetime_experience = parse_currency(
            "prestige.totalLifeExperienceEarned",
            &data.prestige.total_life_experience_earned,
        )?;

        self.resumes = resumes;
        self.total_resumes = total_resumes;
        // Derived; overwritten below by the recomputation passes but
        // applied first so even a truncated reapply leaves sane values.
        self.click_power = click_power;
        self.resumes_per_second = resumes_per_second;

        for producer in &mut self.producers {
            producer.owned = data
                .auto_senders
                .get(producer.id.as_str())
                .map(|p| p.owned)
                .unwrap_or(0);
            producer.efficiency_multiplier = Decimal::ONE;
        }
        for (id, _) in &data.auto_senders {
            if !self.producers.iter().any(|p| p.id.as_str() == id) {
                warn!(id = %id, "ignoring unknown auto-sender in save");
            }
        }

        for upgrade in &mut self.upgrades {
            upgrade.purchased = false;
        }
        for entry in &data.upgrades {
            match self.upgrades.iter_mut().find(|u| u.id.as_str() == entry.id) {
                Some(upgrade) => upgrade.purchased = entry.purchased,
                None => warn!(id = %entry.id, "ignoring unknown upgrade in save"),
            }
        }

        for achievement in &mut self.achievements.achievements {
            match data.achievement_tracker.achievements.get(&achievement.id) {
                Some(saved) => {
                    achievement.unlocked = saved.unlocked;
                    achievement.unlocked_at_ms = saved.unlocked_at_ms;
                }
                None => {
                    achievement.unlocked = false;
                    achievement.unlocked_at_ms = None;
                }
            }
        }
        self.achievements.stats = data.achievement_tracker.statistics.clone();
        self.achievements.clear_check_timer();

        self.prestige.level = data.prestige.level;
        self.prestige.life_experience_points = experience;
        self.prestige.total_life_experience_earned = lifetime_experience;
        self.prestige.current_industry = match IndustryId::from_key(&data.prestige.current_industry)
        {
            Some(id) => id,
            None => {
                warn!(id = %data.prestige.current_industry, "unknown industry in save, defaulting");
                IndustryId::Tech
            }
        };
        self.prestige.unlocked_industries.clear();
        self.prestige.unlocked_industries.insert(IndustryId::Tech);
        for key in &data.prestige.unlocked_industries {
            match IndustryId::from_key(key) {
                Some(id) => {
                    self.prestige.unlocked_industries.insert(id);
                }
                None => warn!(id = %key, "ignoring unknown industry in save"),
            }
        }
        // Self-heal saves written before an industry existed.
        self.prestige.unlock_industries_for_level();

        for bonus in &mut self.prestige.bonuses {
            let saved_level = data
                .prestige
                .permanent_bonuses
                .get(bonus.id.key())
                .map(|b| b.level)
                .unwrap_or(0);
            if saved_level > bonus.max_level {
                warn!(id = %bonus.id.key(), level = saved_level, "clamping bonus level to cap");
            }
            bonus.level = saved_level.min(bonus.max_level);
        }
        for (key, _) in &data.prestige.permanent_bonuses {
            if PermanentBonusId::from_key(key).is_none() {
                warn!(id = %key, "ignoring unknown permanent bonus in save");
            }
        }

        for achievement in &mut self.prestige.achievements {
            achievement.unlocked = data
                .prestige
                .prestige_achievements
                .get(achievement.id.key())
                .map(|a| a.unlocked)
                .unwrap_or(false);
        }
        for (key, _) in &data.prestige.prestige_achievements {
            if PrestigeAchievementId::from_key(key).is_none() {
                warn!(id = %key, "ignoring unknown prestige achievement in save");
            }
        }

        self.events.cooldowns = data.random_events.event_cooldowns.clone();
        self.events.last_event_ms = data.random_events.last_event_time_ms;
        self.events.news_index = data.random_events.news_ticker_index;

        // Effects keep their original start timestamps: time spent
        // offline counts against the window, and anything elapsed is
        // dropped on the first tick after load.
        self.temporary_effects = data.temporary_effects.clone();

        self.reapply_all_effects();
        self.recompute_production(now_ms);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameConfig;

    fn populated_state() -> GameState {
        let mut state = GameState::new(GameConfig::default(), 0);
        state.add_auto_resumes(Decimal::new(123_456_789, 0));
        for _ in 0..3 {
            state.purchase_producer("linkedin-premium", 0).unwrap();
        }
        state.purchase_upgrade("resume-formatting", 0).unwrap();
        state.purchase_upgrade("cover-letter-templates", 0).unwrap();
        state.prestige.level = 2;
        state.prestige.life_experience_points = Decimal::new(1234, 1);
        state.prestige.total_life_experience_earned = Decimal::new(500, 0);
        state.prestige.unlock_industries_for_level();
        state
    }

    #[test]
    fn round_trip_reproduces_decimal_strings() {
        let state = populated_state();
        let saved = state.to_save();

        let mut restored = GameState::new(GameConfig::default(), 0);
        restored.apply_save(&saved, 0).unwrap();
        let saved_again = restored.to_save();

        assert_eq!(saved.resumes, saved_again.resumes);
        assert_eq!(saved.total_resumes, saved_again.total_resumes);
        assert_eq!(saved.click_power, saved_again.click_power);
        assert_eq!(saved.resumes_per_second, saved_again.resumes_per_second);
        assert_eq!(saved.auto_senders, saved_again.auto_senders);
        assert_eq!(
            saved.prestige.life_experience_points,
            saved_again.prestige.life_experience_points
        );
        assert_eq!(
            saved.prestige.total_life_experience_earned,
            saved_again.prestige.total_life_experience_earned
        );
        assert_eq!(saved.prestige.level, saved_again.prestige.level);
        assert_eq!(
            saved.prestige.unlocked_industries,
            saved_again.prestige.unlocked_industries
        );
        let purchased = |data: &SaveData| {
            data.upgrades
                .iter()
                .filter(|u| u.purchased)
                .map(|u| u.id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(purchased(&saved), purchased(&saved_again));
    }

    #[test]
    fn json_round_trip_preserves_observable_state() {
        let state = populated_state();
        let json = serde_json::to_string(&state.to_save()).unwrap();
        let data: SaveData = serde_json::from_str(&json).unwrap();

        let mut restored = GameState::new(GameConfig::default(), 0);
        restored.apply_save(&data, 0).unwrap();
        assert_eq!(restored.resumes, state.resumes);
        assert_eq!(restored.total_resumes, state.total_resumes);
        assert_eq!(restored.click_power, state.click_power);
        assert_eq!(restored.producers[0].owned, 3);
        assert!(restored.upgrades[0].purchased);
        assert_eq!(restored.prestige.level, 2);
    }

    #[test]
    fn minimal_save_defaults_optional_blocks() {
        let json = r#"{"resumes":"42","totalResumes":"42","clickPower":"1"}"#;
        let data: SaveData = serde_json::from_str(json).unwrap();
        let mut state = GameState::new(GameConfig::default(), 0);
        state.apply_save(&data, 0).unwrap();
        assert_eq!(state.resumes, Decimal::new(42, 0));
        assert_eq!(state.prestige.level, 0);
        assert_eq!(state.prestige.current_industry, IndustryId::Tech);
        assert!(state.temporary_effects.is_empty());
        // Derived fields come from the reapply pass, not the save.
        assert_eq!(state.click_power, Decimal::ONE);
    }

    #[test]
    fn malformed_currency_is_rejected_without_mutation() {
        let mut state = GameState::new(GameConfig::default(), 0);
        state.add_auto_resumes(Decimal::new(77, 0));
        let before = state.resumes;

        let json = r#"{"resumes":"not-a-number","totalResumes":"1","clickPower":"1"}"#;
        let data: SaveData = serde_json::from_str(json).unwrap();
        let err = state.apply_save(&data, 0).unwrap_err();
        assert!(matches!(err, GameError::InvalidSaveData(_)));
        assert_eq!(state.resumes, before);
    }

    #[test]
    fn unknown_ids_in_save_are_ignored() {
        let mut state = GameState::new(GameConfig::default(), 0);
        let mut data = state.to_save();
        data.auto_senders
            .insert("quantum-applier".to_string(), ProducerSave { owned: 9 });
        data.upgrades.push(UpgradeSave {
            id: "mind-upload".to_string(),
            purchased: true,
        });
        data.prestige.current_industry = "space".to_string();
        state.apply_save(&data, 0).unwrap();
        assert_eq!(state.prestige.current_industry, IndustryId::Tech);
        assert!(state.producers.iter().all(|p| p.owned == 0));
        assert!(state.upgrades.iter().all(|u| !u.purchased));
    }

    #[test]
    fn bonus_levels_are_clamped_to_cap() {
        let mut state = GameState::new(GameConfig::default(), 0);
        let mut data = state.to_save();
        data.prestige
            .permanent_bonuses
            .insert("experienceGainRate".to_string(), BonusSave { level: 99 });
        state.apply_save(&data, 0).unwrap();
        let bonus = state.prestige.bonus(PermanentBonusId::ExperienceGainRate);
        assert_eq!(bonus.level, bonus.max_level);
    }
}
