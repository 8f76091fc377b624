//! One-shot upgrades, their effect variants, and the fixed registry DAG.

use crate::error::{EntityKind, GameError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Unique identifier for an upgrade, e.g. "resume-formatting".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UpgradeId(pub String);

impl UpgradeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// What a purchased upgrade does. Effects are declarative: nothing is
/// mutated at purchase time; the economy core folds every purchased
/// effect into its reapplication pass so ordering stays consistent.
///
/// `Unknown` absorbs effect types from future registry revisions; the
/// reapplication pass logs and skips it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpgradeEffect {
    ClickMultiplier { value: Decimal },
    AutoSenderEfficiency { value: Decimal },
    AutoSenderUnlockBoost { factor: Decimal },
    AutoSenderCostReduction { factor: Decimal },
    UltimateMultiplier { value: Decimal },
    #[serde(other)]
    Unknown,
}

/// Numeric unlock conditions; all must hold in addition to the
/// dependency check.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnlockConditions {
    pub min_total_resumes: Decimal,
    pub min_producers_owned: u32,
    pub min_upgrades_purchased: u32,
    pub min_achievements_unlocked: u32,
}

/// Read-only view of the aggregate state an unlock check needs.
#[derive(Clone, Debug)]
pub struct UnlockView<'a> {
    pub total_resumes: Decimal,
    pub producers_owned: u32,
    pub upgrades_purchased: u32,
    pub achievements_unlocked: u32,
    pub purchased: &'a BTreeSet<UpgradeId>,
}

/// A one-time purchase that permanently modifies a game multiplier.
#[derive(Clone, Debug)]
pub struct Upgrade {
    pub id: UpgradeId,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub cost: Decimal,
    pub effect: UpgradeEffect,
    pub dependencies: Vec<UpgradeId>,
    pub unlock: UnlockConditions,
    pub purchased: bool,
}

impl Upgrade {
    fn new(
        id: &str,
        name: &str,
        icon: &str,
        description: &str,
        cost: i64,
        effect: UpgradeEffect,
        min_total_resumes: i64,
        dependencies: &[&str],
    ) -> Self {
        Self {
            id: UpgradeId(id.to_string()),
            name: name.to_string(),
            icon: icon.to_string(),
            description: description.to_string(),
            cost: Decimal::new(cost, 0),
            effect,
            dependencies: dependencies.iter().map(|d| UpgradeId(d.to_string())).collect(),
            unlock: UnlockConditions {
                min_total_resumes: Decimal::new(min_total_resumes, 0),
                ..UnlockConditions::default()
            },
            purchased: false,
        }
    }

    /// True iff every dependency is purchased and every numeric unlock
    /// condition is satisfied. No partial credit: a single missing or
    /// unpurchased dependency blocks the unlock.
    pub fn is_unlocked(&self, view: &UnlockView<'_>) -> bool {
        for dep in &self.dependencies {
            if !view.purchased.contains(dep) {
                return false;
            }
        }
        view.total_resumes >= self.unlock.min_total_resumes
            && view.producers_owned >= self.unlock.min_producers_owned
            && view.upgrades_purchased >= self.unlock.min_upgrades_purchased
            && view.achievements_unlocked >= self.unlock.min_achievements_unlocked
    }
}

/// The fixed registry of 11 upgrades forming a DAG through
/// `dependencies`, in application order.
pub fn default_upgrades() -> Vec<Upgrade> {
    vec![
        Upgrade::new(
            "resume-formatting",
            "Resume Formatting",
            "\u{1f4dd}",
            "Professionally format your resume for better impact. Doubles your click power!",
            100,
            UpgradeEffect::ClickMultiplier { value: Decimal::TWO },
            75,
            &[],
        ),
        Upgrade::new(
            "cover-letter-templates",
            "Cover Letter Templates",
            "\u{1f4cb}",
            "Pre-written cover letter templates for different industries. Increases auto-sender efficiency by 50%!",
            250,
            UpgradeEffect::AutoSenderEfficiency { value: Decimal::new(15, 1) },
            200,
            &["resume-formatting"],
        ),
        Upgrade::new(
            "professional-headshots",
            "Professional Headshots",
            "\u{1f4f8}",
            "High-quality professional photos that make you look competent. Increases click power by 50%!",
            500,
            UpgradeEffect::ClickMultiplier { value: Decimal::new(15, 1) },
            400,
            &["cover-letter-templates"],
        ),
        Upgrade::new(
            "linkedin-optimization",
            "LinkedIn Optimization",
            "\u{1f4bc}",
            "Optimize your LinkedIn profile for maximum visibility. Reduces auto-sender unlock requirements!",
            750,
            UpgradeEffect::AutoSenderUnlockBoost { factor: Decimal::new(8, 1) },
            600,
            &["resume-formatting"],
        ),
        Upgrade::new(
            "interview-prep-courses",
            "Interview Prep Courses",
            "\u{1f3ad}",
            "Master the art of saying \"I'm passionate about synergy\" with confidence. Doubles click power!",
            1200,
            UpgradeEffect::ClickMultiplier { value: Decimal::TWO },
            1000,
            &["professional-headshots", "linkedin-optimization"],
        ),
        Upgrade::new(
            "certification-programs",
            "Certification Programs",
            "\u{1f3c6}",
            "Collect meaningless certificates that HR loves. Doubles auto-sender efficiency!",
            1800,
            UpgradeEffect::AutoSenderEfficiency { value: Decimal::TWO },
            1500,
            &["cover-letter-templates"],
        ),
        Upgrade::new(
            "skills-endorsements",
            "Skills Endorsements",
            "\u{2b50}",
            "Get your mom to endorse you for \"leadership\" on LinkedIn. Reduces auto-sender costs by 25%!",
            2500,
            UpgradeEffect::AutoSenderCostReduction { factor: Decimal::new(75, 2) },
            2200,
            &["linkedin-optimization", "certification-programs"],
        ),
        Upgrade::new(
            "portfolio-enhancements",
            "Portfolio Enhancements",
            "\u{1f310}",
            "A fancy website that nobody will ever visit. Triples your click power!",
            3500,
            UpgradeEffect::ClickMultiplier { value: Decimal::new(3, 0) },
            3000,
            &["interview-prep-courses"],
        ),
        Upgrade::new(
            "networking-mastery",
            "Networking Mastery",
            "\u{1f91d}",
            "Master the art of pretending to care about strangers' weekend plans. Triples auto-sender efficiency!",
            5000,
            UpgradeEffect::AutoSenderEfficiency { value: Decimal::new(3, 0) },
            4500,
            &["skills-endorsements"],
        ),
        Upgrade::new(
            "executive-presence",
            "Executive Presence",
            "\u{1f454}",
            "Learn to speak in corporate buzzwords fluently. 5x click power for maximum synergistic impact!",
            7500,
            UpgradeEffect::ClickMultiplier { value: Decimal::new(5, 0) },
            7000,
            &["portfolio-enhancements", "networking-mastery"],
        ),
        Upgrade::new(
            "thought-leadership",
            "Thought Leadership",
            "\u{1f9e0}",
            "Become a LinkedIn influencer who posts about \"Monday Motivation\". 10x multiplier to all effects!",
            12_000,
            UpgradeEffect::UltimateMultiplier { value: Decimal::TEN },
            11_000,
            &["executive-presence"],
        ),
    ]
}

/// Registry validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("duplicate upgrade id: {0}")]
    DuplicateId(String),
    #[error("dependency not found: {0}")]
    DependencyNotFound(String),
    #[error("dependency cycle involving: {0}")]
    DependencyCycle(String),
}

/// Validate uniqueness, dependency resolution, and acyclicity of an
/// upgrade registry.
pub fn validate_upgrades(upgrades: &[Upgrade]) -> Result<(), RegistryError> {
    let mut by_id: BTreeMap<&UpgradeId, &Upgrade> = BTreeMap::new();
    for upgrade in upgrades {
        if by_id.insert(&upgrade.id, upgrade).is_some() {
            return Err(RegistryError::DuplicateId(upgrade.id.0.clone()));
        }
    }
    for upgrade in upgrades {
        for dep in &upgrade.dependencies {
            if !by_id.contains_key(dep) {
                return Err(RegistryError::DependencyNotFound(dep.0.clone()));
            }
        }
    }

    // Depth-first cycle check over the dependency edges.
    fn visit<'a>(
        id: &'a UpgradeId,
        by_id: &BTreeMap<&'a UpgradeId, &'a Upgrade>,
        done: &mut BTreeSet<&'a UpgradeId>,
        path: &mut BTreeSet<&'a UpgradeId>,
    ) -> Result<(), RegistryError> {
        if done.contains(id) {
            return Ok(());
        }
        if !path.insert(id) {
            return Err(RegistryError::DependencyCycle(id.0.clone()));
        }
        for dep in &by_id[id].dependencies {
            visit(dep, by_id, done, path)?;
        }
        path.remove(id);
        done.insert(id);
        Ok(())
    }

    let mut done = BTreeSet::new();
    for upgrade in upgrades {
        let mut path = BTreeSet::new();
        visit(&upgrade.id, &by_id, &mut done, &mut path)?;
    }
    Ok(())
}

/// Resolve an id against an upgrade slice.
pub fn find_upgrade<'a>(upgrades: &'a [Upgrade], id: &str) -> Result<&'a Upgrade, GameError> {
    upgrades
        .iter()
        .find(|u| u.id.as_str() == id)
        .ok_or_else(|| GameError::NotFound {
            kind: EntityKind::Upgrade,
            id: id.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view<'a>(purchased: &'a BTreeSet<UpgradeId>, total: i64) -> UnlockView<'a> {
        UnlockView {
            total_resumes: Decimal::new(total, 0),
            producers_owned: 0,
            upgrades_purchased: purchased.len() as u32,
            achievements_unlocked: 0,
            purchased,
        }
    }

    #[test]
    fn registry_is_a_valid_dag() {
        let upgrades = default_upgrades();
        assert_eq!(upgrades.len(), 11);
        validate_upgrades(&upgrades).unwrap();
    }

    #[test]
    fn unpurchased_dependency_blocks_unlock() {
        let upgrades = default_upgrades();
        let templates = find_upgrade(&upgrades, "cover-letter-templates").unwrap();
        let none = BTreeSet::new();
        assert!(!templates.is_unlocked(&view(&none, 1_000_000)));

        let mut with_dep = BTreeSet::new();
        with_dep.insert(UpgradeId("resume-formatting".to_string()));
        assert!(templates.is_unlocked(&view(&with_dep, 1_000_000)));
    }

    #[test]
    fn numeric_condition_blocks_unlock() {
        let upgrades = default_upgrades();
        let formatting = find_upgrade(&upgrades, "resume-formatting").unwrap();
        let none = BTreeSet::new();
        assert!(!formatting.is_unlocked(&view(&none, 74)));
        assert!(formatting.is_unlocked(&view(&none, 75)));
    }

    #[test]
    fn cycle_detection_flags_a_loop() {
        let mut upgrades = default_upgrades();
        // Point the root at the tip to close a loop.
        upgrades[0].dependencies = vec![UpgradeId("thought-leadership".to_string())];
        assert!(matches!(
            validate_upgrades(&upgrades),
            Err(RegistryError::DependencyCycle(_))
        ));
    }

    #[test]
    fn unknown_dependency_is_rejected() {
        let mut upgrades = default_upgrades();
        upgrades[0].dependencies = vec![UpgradeId("does-not-exist".to_string())];
        assert_eq!(
            validate_upgrades(&upgrades),
            Err(RegistryError::DependencyNotFound("does-not-exist".to_string()))
        );
    }

    #[test]
    fn effect_serde_uses_snake_case_tags() {
        let effect = UpgradeEffect::ClickMultiplier { value: Decimal::TWO };
        let json = serde_json::to_string(&effect).unwrap();
        assert_eq!(json, r#"{"type":"click_multiplier","value":"2"}"#);
        let back: UpgradeEffect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, effect);
    }

    #[test]
    fn unrecognized_effect_tag_maps_to_unknown() {
        let back: UpgradeEffect =
            serde_json::from_str(r#"{"type":"quantum_networking"}"#).unwrap();
        assert_eq!(back, UpgradeEffect::Unknown);
    }
}
