//! Milestone achievements derived from accumulated statistics.
//!
//! The tracker is a one-way state machine per achievement: locked to
//! unlocked, never back. Unlock flags and timestamps survive career
//! changes; the statistics counters do not.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Named statistic events fed into the tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatEvent {
    Click,
    Rejection,
    /// An actual response from an employer; resets the failure streak.
    Response,
    Overqualified,
    EntryLevelExperience,
    NetworkingEvent,
}

/// Cumulative counters backing achievement conditions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Statistics {
    pub total_clicks: u64,
    pub rejections: u64,
    pub consecutive_failures: u64,
    pub overqualified_applications: u64,
    pub entry_level_with_experience: u64,
    pub networking_events: u64,
    pub session_start_ms: i64,
}

impl Statistics {
    fn fresh(now_ms: i64) -> Self {
        Self {
            session_start_ms: now_ms,
            ..Self::default()
        }
    }

    pub fn record(&mut self, event: StatEvent) {
        match event {
            StatEvent::Click => self.total_clicks += 1,
            StatEvent::Rejection => {
                self.rejections += 1;
                self.consecutive_failures += 1;
            }
            StatEvent::Response => self.consecutive_failures = 0,
            StatEvent::Overqualified => self.overqualified_applications += 1,
            StatEvent::EntryLevelExperience => self.entry_level_with_experience += 1,
            StatEvent::NetworkingEvent => self.networking_events += 1,
        }
    }
}

/// Boolean condition over the statistics and lifetime resume count.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AchievementCondition {
    RejectionsAtLeast(u64),
    TotalAndRejections { min_total: Decimal, min_rejections: u64 },
    TotalAndFailureStreak { min_total: Decimal, min_streak: u64 },
    OverqualifiedAtLeast(u64),
    EntryLevelAtLeast(u64),
    NetworkingEventsAtLeast(u64),
}

impl AchievementCondition {
    fn is_met(&self, total_resumes: Decimal, stats: &Statistics) -> bool {
        match *self {
            AchievementCondition::RejectionsAtLeast(n) => stats.rejections >= n,
            AchievementCondition::TotalAndRejections { min_total, min_rejections } => {
                total_resumes >= min_total && stats.rejections >= min_rejections
            }
            AchievementCondition::TotalAndFailureStreak { min_total, min_streak } => {
                total_resumes >= min_total && stats.consecutive_failures >= min_streak
            }
            AchievementCondition::OverqualifiedAtLeast(n) => {
                stats.overqualified_applications >= n
            }
            AchievementCondition::EntryLevelAtLeast(n) => {
                stats.entry_level_with_experience >= n
            }
            AchievementCondition::NetworkingEventsAtLeast(n) => stats.networking_events >= n,
        }
    }
}

/// One-shot bonus granted when an achievement unlocks. Folded into the
/// effect reapplication pass, so it applies exactly once however often
/// the pass reruns. `Unknown` covers future reward types (skipped).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AchievementReward {
    ClickMultiplier { value: Decimal },
    AutoSenderEfficiency { value: Decimal },
    #[serde(other)]
    Unknown,
}

/// A milestone with a terminal unlocked state.
#[derive(Clone, Debug)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub condition: AchievementCondition,
    pub rewards: Vec<AchievementReward>,
    pub unlocked: bool,
    pub unlocked_at_ms: Option<i64>,
}

impl Achievement {
    fn new(
        id: &str,
        name: &str,
        icon: &str,
        description: &str,
        condition: AchievementCondition,
        rewards: Vec<AchievementReward>,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            condition,
            rewards,
            unlocked: false,
            unlocked_at_ms: None,
        }
    }
}

fn default_achievements() -> Vec<Achievement> {
    vec![
        Achievement::new(
            "first-rejection",
            "First Rejection",
            "\u{1f494}",
            "Receive your first rejection. Welcome to the club!",
            AchievementCondition::RejectionsAtLeast(1),
            vec![AchievementReward::ClickMultiplier { value: Decimal::new(11, 1) }],
        ),
        Achievement::new(
            "100-club",
            "100 Club",
            "\u{1f4af}",
            "Send 100 resumes without getting a single interview.",
            AchievementCondition::TotalAndRejections {
                min_total: Decimal::ONE_HUNDRED,
                min_rejections: 50,
            },
            vec![AchievementReward::AutoSenderEfficiency { value: Decimal::new(115, 2) }],
        ),
        Achievement::new(
            "ghost-protocol",
            "Ghost Protocol",
            "\u{1f47b}",
            "Go 30 days without hearing back from any employer.",
            AchievementCondition::TotalAndFailureStreak {
                min_total: Decimal::new(300, 0),
                min_streak: 100,
            },
            vec![AchievementReward::ClickMultiplier { value: Decimal::new(125, 2) }],
        ),
        Achievement::new(
            "overqualified",
            "Overqualified",
            "\u{1f393}",
            "Get rejected for being overqualified 10 times.",
            AchievementCondition::OverqualifiedAtLeast(10),
            vec![AchievementReward::AutoSenderEfficiency { value: Decimal::new(12, 1) }],
        ),
        Achievement::new(
            "entry-level-expert",
            "Entry Level Expert",
            "\u{1f921}",
            "Apply for \"entry level\" positions that require 5+ years of experience.",
            AchievementCondition::EntryLevelAtLeast(25),
            vec![AchievementReward::ClickMultiplier { value: Decimal::new(13, 1) }],
        ),
        Achievement::new(
            "networking-ninja",
            "Networking Ninja",
            "\u{1f977}",
            "Attend 50 networking events and still be unemployed.",
            AchievementCondition::NetworkingEventsAtLeast(50),
            vec![AchievementReward::AutoSenderEfficiency { value: Decimal::new(15, 1) }],
        ),
    ]
}

/// Tracks statistics and evaluates achievement conditions on a batched
/// interval rather than every tick.
#[derive(Clone, Debug)]
pub struct AchievementTracker {
    pub achievements: Vec<Achievement>,
    pub stats: Statistics,
    last_check_ms: Option<i64>,
    check_interval_ms: i64,
}

impl AchievementTracker {
    pub fn new(now_ms: i64) -> Self {
        Self {
            achievements: default_achievements(),
            stats: Statistics::fresh(now_ms),
            last_check_ms: None,
            check_interval_ms: 1000,
        }
    }

    pub fn record(&mut self, event: StatEvent) {
        self.stats.record(event);
    }

    /// Evaluate every still-locked achievement; at most once per check
    /// interval. Returns the ids newly unlocked this pass.
    pub fn check(&mut self, now_ms: i64, total_resumes: Decimal) -> Vec<String> {
        if let Some(last) = self.last_check_ms {
            if now_ms - last < self.check_interval_ms {
                return Vec::new();
            }
        }
        self.last_check_ms = Some(now_ms);

        let mut newly = Vec::new();
        for achievement in &mut self.achievements {
            if achievement.unlocked {
                continue;
            }
            if achievement.condition.is_met(total_resumes, &self.stats) {
                achievement.unlocked = true;
                achievement.unlocked_at_ms = Some(now_ms);
                info!(id = %achievement.id, "achievement unlocked");
                newly.push(achievement.id.clone());
            }
        }
        newly
    }

    pub fn unlocked_count(&self) -> u32 {
        self.achievements.iter().filter(|a| a.unlocked).count() as u32
    }

    /// Rewards of unlocked achievements, in registry order, for the
    /// effect reapplication pass.
    pub fn unlocked_rewards(&self) -> Vec<AchievementReward> {
        self.achievements
            .iter()
            .filter(|a| a.unlocked)
            .flat_map(|a| a.rewards.iter().cloned())
            .collect()
    }

    /// Career change wipes the counters but never the unlock flags.
    pub fn reset_statistics(&mut self, now_ms: i64) {
        self.stats = Statistics::fresh(now_ms);
    }

    /// Force the next `check` call to run regardless of the interval
    /// (used after loading a save).
    pub fn clear_check_timer(&mut self) {
        self.last_check_ms = None;
    }
}
