//! Read-only projections for the UI collaborator.
//!
//! The UI never reaches into engine internals: after every state
//! change it re-reads these display records, which carry both raw
//! values and pre-formatted strings.

use crate::prestige::{IndustryId, PermanentBonusId};
use crate::GameState;
use game_core::{format_amount, format_cost, format_count};
use rust_decimal::Decimal;

#[derive(Clone, Debug)]
pub struct ProducerInfo {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub owned: u32,
    pub cost: Decimal,
    pub formatted_cost: String,
    pub production_rate: Decimal,
    pub formatted_production_rate: String,
    pub can_afford: bool,
    pub unlocked: bool,
}

#[derive(Clone, Debug)]
pub struct UpgradeInfo {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub cost: Decimal,
    pub formatted_cost: String,
    pub purchased: bool,
    pub unlocked: bool,
    pub can_afford: bool,
}

#[derive(Clone, Debug)]
pub struct BonusInfo {
    pub id: PermanentBonusId,
    pub description: String,
    pub level: u32,
    pub max_level: u32,
    /// Cost of the next level; `None` at the cap.
    pub next_cost: Option<Decimal>,
    pub current_effect: Decimal,
    pub can_afford: bool,
}

#[derive(Clone, Debug)]
pub struct IndustryInfo {
    pub id: IndustryId,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub unlocked: bool,
    pub current: bool,
}

#[derive(Clone, Debug)]
pub struct PrestigeInfo {
    pub level: u32,
    pub experience: Decimal,
    pub formatted_experience: String,
    pub lifetime_experience: Decimal,
    pub can_prestige: bool,
    pub requirement: Decimal,
    pub formatted_requirement: String,
    pub experience_preview: Decimal,
    pub formatted_experience_preview: String,
    pub industries: Vec<IndustryInfo>,
    pub bonuses: Vec<BonusInfo>,
}

#[derive(Clone, Debug)]
pub struct Summary {
    pub formatted_resumes: String,
    pub formatted_total_resumes: String,
    pub formatted_rate: String,
    pub formatted_click_power: String,
}

impl GameState {
    /// Headline numbers for the main panel.
    pub fn summary(&self) -> Summary {
        Summary {
            formatted_resumes: format_count(self.resumes),
            formatted_total_resumes: format_count(self.total_resumes),
            formatted_rate: format_amount(self.resumes_per_second),
            formatted_click_power: format_amount(self.click_power),
        }
    }

    /// Every producer, locked ones included, so the store can show
    /// upcoming unlocks.
    pub fn producer_info(&self) -> Vec<ProducerInfo> {
        self.producers
            .iter()
            .map(|p| {
                let cost = p.current_cost(self.producer_cost_factor());
                ProducerInfo {
                    id: p.id.as_str().to_string(),
                    name: p.name.clone(),
                    icon: p.icon.clone(),
                    description: p.description.clone(),
                    owned: p.owned,
                    cost,
                    formatted_cost: format_cost(cost),
                    production_rate: p.production_rate(),
                    formatted_production_rate: format_amount(p.production_rate()),
                    can_afford: self.resumes >= cost,
                    unlocked: p.is_unlocked(self.total_resumes, self.unlock_threshold_factor()),
                }
            })
            .collect()
    }

    pub fn upgrade_info(&self) -> Vec<UpgradeInfo> {
        let purchased = self.purchased_upgrade_ids();
        let view = self.unlock_view(&purchased);
        self.upgrades
            .iter()
            .map(|u| {
                let cost = self.effective_upgrade_cost(u);
                UpgradeInfo {
                    id: u.id.as_str().to_string(),
                    name: u.name.clone(),
                    icon: u.icon.clone(),
                    description: u.description.clone(),
                    cost,
                    formatted_cost: format_cost(cost),
                    purchased: u.purchased,
                    unlocked: u.is_unlocked(&view),
                    can_afford: self.resumes >= cost,
                }
            })
            .collect()
    }

    pub fn prestige_info(&self) -> PrestigeInfo {
        let preview = self.prestige.experience_gain(self.total_resumes);
        let requirement = self.prestige.requirement();
        let industries = self
            .prestige
            .industries
            .iter()
            .map(|i| IndustryInfo {
                id: i.id,
                name: i.name.clone(),
                icon: i.icon.clone(),
                description: i.description.clone(),
                unlocked: self.prestige.is_industry_unlocked(i.id),
                current: i.id == self.prestige.current_industry,
            })
            .collect();
        let bonuses = self
            .prestige
            .bonuses
            .iter()
            .map(|b| {
                let next_cost = (b.level < b.max_level).then(|| b.next_cost());
                BonusInfo {
                    id: b.id,
                    description: b.description.clone(),
                    level: b.level,
                    max_level: b.max_level,
                    next_cost,
                    current_effect: b.effect(),
                    can_afford: next_cost
                        .map(|c| self.prestige.life_experience_points >= c)
                        .unwrap_or(false),
                }
            })
            .collect();

        PrestigeInfo {
            level: self.prestige.level,
            experience: self.prestige.life_experience_points,
            formatted_experience: format_count(self.prestige.life_experience_points),
            lifetime_experience: self.prestige.total_life_experience_earned,
            can_prestige: self.prestige.can_prestige(self.total_resumes),
            requirement,
            formatted_requirement: format_count(requirement),
            experience_preview: preview,
            formatted_experience_preview: format_count(preview),
            industries,
            bonuses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameConfig;

    #[test]
    fn producer_info_reflects_affordability() {
        let mut state = GameState::new(GameConfig::default(), 0);
        state.add_auto_resumes(Decimal::new(15, 0));
        let info = state.producer_info();
        assert_eq!(info.len(), 8);
        assert!(info[0].can_afford);
        assert!(info[0].unlocked);
        assert_eq!(info[0].formatted_cost, "15");
        assert!(!info[1].can_afford);
        assert!(!info[1].unlocked);
    }

    #[test]
    fn prestige_info_previews_without_side_effects() {
        let mut state = GameState::new(GameConfig::default(), 0);
        state.add_auto_resumes(Decimal::new(16_000, 0));
        let before = state.prestige.life_experience_points;
        let info = state.prestige_info();
        assert!(info.can_prestige);
        assert_eq!(info.experience_preview, Decimal::new(40, 0));
        assert_eq!(state.prestige.life_experience_points, before);
    }
}
