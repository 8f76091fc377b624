//! Random narrative events and their numeric side effects.
//!
//! Single-threaded polling model: the tick asks the engine whether an
//! event fires now; there are no timers or callbacks. Event text is
//! cosmetic; what matters to the economy is the optional time-boxed
//! multiplier an event applies.

use crate::effects::{TemporaryEffect, TemporaryEffectKind, TemporaryEffects};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Broad category of a narrative event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RandomEventKind {
    Rejection,
    FakeInterview,
    Networking,
    SuccessTease,
    Flavor,
}

/// Eligibility requirements an event declares.
#[derive(Clone, Copy, Debug, Default)]
pub struct EventRequirements {
    pub min_total_resumes: Option<Decimal>,
    pub max_total_resumes: Option<Decimal>,
    pub min_producers_owned: Option<u32>,
}

/// A temporary multiplier template the event applies when it fires.
#[derive(Clone, Copy, Debug)]
pub struct EventEffect {
    pub kind: TemporaryEffectKind,
    pub multiplier: Decimal,
    pub duration_ms: i64,
}

/// Immutable definition of one random event.
#[derive(Clone, Debug)]
pub struct RandomEventDef {
    pub id: String,
    pub kind: RandomEventKind,
    pub title: String,
    pub message: String,
    pub icon: String,
    /// Relative probability weight among eligible events.
    pub weight: f64,
    pub requirements: EventRequirements,
    pub effect: Option<EventEffect>,
}

/// What the tick reports when an event fired.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FiredEvent {
    pub id: String,
    pub kind: RandomEventKind,
    pub title: String,
}

/// Rotating headline feed; only the index is engine state.
pub const NEWS_HEADLINES: [&str; 10] = [
    "Local startup seeks 'rockstar ninja unicorn' developer with 10+ years experience in technology invented last week",
    "Job market is 'stronger than ever' according to people who already have jobs",
    "New study: Having a degree makes you both overqualified and underqualified for the same position",
    "Company culture described as 'like a family' - a dysfunctional family that doesn't pay well",
    "'Entry-level' position requires 5 years experience, PhD, and ability to work for 'competitive' salary",
    "Remote work opportunities: Must be able to commute to office daily",
    "Hiring manager still looking for 'purple squirrel' candidate after 2 years of searching",
    "Revolutionary idea: Maybe the problem isn't your resume, it's the entire system",
    "Breaking: Local person actually gets call back, turns out to be wrong number",
    "Recruiter promises to 'circle back' - experts predict heat death of universe first",
];

fn def(
    id: &str,
    kind: RandomEventKind,
    title: &str,
    message: &str,
    icon: &str,
    weight: f64,
    requirements: EventRequirements,
    effect: Option<EventEffect>,
) -> RandomEventDef {
    RandomEventDef {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        message: message.to_string(),
        icon: icon.to_string(),
        weight,
        requirements,
        effect,
    }
}

fn min_resumes(n: i64) -> EventRequirements {
    EventRequirements {
        min_total_resumes: Some(Decimal::new(n, 0)),
        ..EventRequirements::default()
    }
}

fn default_events() -> Vec<RandomEventDef> {
    vec![
        def(
            "rejection-generic",
            RandomEventKind::Rejection,
            "Application Status Update",
            "Thank you for your interest in our company. While your background is impressive, we have decided to move forward with other candidates who more closely match our requirements.",
            "\u{1f4e7}",
            0.30,
            min_resumes(5),
            None,
        ),
        def(
            "rejection-overqualified",
            RandomEventKind::Rejection,
            "Position Update",
            "We appreciate your application, but unfortunately, you appear to be overqualified for this role. We worry you might leave when something better comes along.",
            "\u{1f393}",
            0.20,
            min_resumes(50),
            None,
        ),
        def(
            "rejection-experience",
            RandomEventKind::Rejection,
            "Application Review Complete",
            "While we were impressed with your resume, we have decided to pursue candidates with more relevant experience in this specific field.",
            "\u{1f4ca}",
            0.25,
            min_resumes(25),
            None,
        ),
        def(
            "fake-interview-phone",
            RandomEventKind::FakeInterview,
            "Interview Opportunity!",
            "Congratulations! You've been selected for a phone screening. We'll call you next Tuesday between 9 AM and 5 PM. Please keep your phone available.",
            "\u{1f4de}",
            0.15,
            min_resumes(20),
            Some(EventEffect {
                kind: TemporaryEffectKind::ClickMultiplier,
                multiplier: Decimal::new(15, 1),
                duration_ms: 60_000,
            }),
        ),
        def(
            "fake-interview-video",
            RandomEventKind::FakeInterview,
            "Video Interview Scheduled",
            "Great news! We'd like to schedule a video interview with you. Please download our proprietary interview platform and create an account.",
            "\u{1f4bb}",
            0.12,
            min_resumes(40),
            None,
        ),
        def(
            "networking-linkedin",
            RandomEventKind::Networking,
            "LinkedIn Connection",
            "A \"Senior Talent Acquisition Specialist\" wants to connect with you! Their profile says they can help you find your dream job.",
            "\u{1f4bc}",
            0.18,
            min_resumes(15),
            Some(EventEffect {
                kind: TemporaryEffectKind::AutoSenderBoost,
                multiplier: Decimal::new(11, 1),
                duration_ms: 45_000,
            }),
        ),
        def(
            "networking-recruiter",
            RandomEventKind::Networking,
            "Recruiter Reached Out",
            "A recruiter from \"Dynamic Solutions Inc\" has an amazing opportunity that's \"perfect for your background.\" It's confidential, so they can't tell you the company name.",
            "\u{1f575}\u{fe0f}",
            0.16,
            EventRequirements {
                min_producers_owned: Some(2),
                ..EventRequirements::default()
            },
            None,
        ),
        def(
            "success-final-round",
            RandomEventKind::SuccessTease,
            "Final Round Interview!",
            "Fantastic news! You've made it to the final round! You're one of our top 3 candidates. We should have a decision by end of week.",
            "\u{1f389}",
            0.08,
            min_resumes(75),
            Some(EventEffect {
                kind: TemporaryEffectKind::ClickMultiplier,
                multiplier: Decimal::TWO,
                duration_ms: 120_000,
            }),
        ),
        def(
            "success-reference-check",
            RandomEventKind::SuccessTease,
            "Reference Check",
            "We're moving forward with your application and would like to conduct a reference check. This is typically the final step in our process!",
            "\u{2705}",
            0.06,
            min_resumes(100),
            Some(EventEffect {
                kind: TemporaryEffectKind::AutoSenderBoost,
                multiplier: Decimal::new(15, 1),
                duration_ms: 180_000,
            }),
        ),
        def(
            "flavor-job-fair",
            RandomEventKind::Flavor,
            "Virtual Job Fair",
            "There's a virtual job fair happening today! Entry is free, but you need to register with your email, phone, and complete a 47-question personality assessment.",
            "\u{1f3e2}",
            0.10,
            min_resumes(30),
            None,
        ),
        def(
            "flavor-career-advice",
            RandomEventKind::Flavor,
            "Career Tip of the Day",
            "Remember: 80% of jobs are never posted online! Focus on networking, informational interviews, and reaching out directly to hiring managers.",
            "\u{1f4a1}",
            0.12,
            min_resumes(10),
            None,
        ),
        def(
            "flavor-salary-survey",
            RandomEventKind::Flavor,
            "Salary Survey",
            "A salary survey shows that professionals in your field earn 20% more than you expected! Unfortunately, none of them seem to be hiring.",
            "\u{1f4b0}",
            0.09,
            min_resumes(60),
            None,
        ),
    ]
}

/// Weighted, cooldown-gated event selection driven by the tick.
#[derive(Clone, Debug)]
pub struct RandomEventEngine {
    pub defs: Vec<RandomEventDef>,
    /// Per-event-id timestamp of the last firing.
    pub cooldowns: BTreeMap<String, i64>,
    pub last_event_ms: i64,
    pub news_index: usize,
    /// Minimum wall-clock gap between event attempts.
    pub min_interval_ms: i64,
    /// Chance that an attempt fires anything at all.
    pub trigger_chance: f64,
    /// Per-event-id cooldown preventing immediate repetition.
    pub cooldown_ms: i64,
}

impl Default for RandomEventEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomEventEngine {
    pub fn new() -> Self {
        Self {
            defs: default_events(),
            cooldowns: BTreeMap::new(),
            last_event_ms: 0,
            news_index: 0,
            min_interval_ms: 15_000,
            trigger_chance: 0.3,
            cooldown_ms: 30_000,
        }
    }

    fn on_cooldown(&self, id: &str, now_ms: i64) -> bool {
        match self.cooldowns.get(id) {
            Some(&fired_at) => now_ms - fired_at < self.cooldown_ms,
            None => false,
        }
    }

    fn is_eligible(
        &self,
        event: &RandomEventDef,
        now_ms: i64,
        total_resumes: Decimal,
        producers_owned: u32,
    ) -> bool {
        if let Some(min) = event.requirements.min_total_resumes {
            if total_resumes < min {
                return false;
            }
        }
        if let Some(max) = event.requirements.max_total_resumes {
            if total_resumes > max {
                return false;
            }
        }
        if let Some(min) = event.requirements.min_producers_owned {
            if producers_owned < min {
                return false;
            }
        }
        !self.on_cooldown(&event.id, now_ms)
    }

    /// One polling step. At most one event fires; its temporary effect
    /// (if any) is recorded into `effects` keyed by effect kind.
    pub fn step(
        &mut self,
        now_ms: i64,
        total_resumes: Decimal,
        producers_owned: u32,
        rng: &mut ChaCha8Rng,
        effects: &mut TemporaryEffects,
    ) -> Option<FiredEvent> {
        if now_ms - self.last_event_ms < self.min_interval_ms {
            return None;
        }
        if rng.gen::<f64>() >= self.trigger_chance {
            return None;
        }

        let candidates: Vec<(usize, f64)> = self
            .defs
            .iter()
            .enumerate()
            .filter(|(_, e)| self.is_eligible(e, now_ms, total_resumes, producers_owned))
            .map(|(i, e)| (i, e.weight))
            .collect();
        if candidates.is_empty() {
            debug!("no eligible random events");
            return None;
        }

        let index = *game_econ::weighted_pick(rng, &candidates)?;
        let event = &self.defs[index];
        if let Some(effect) = &event.effect {
            effects.apply(
                effect.kind,
                TemporaryEffect {
                    multiplier: effect.multiplier,
                    started_at_ms: now_ms,
                    duration_ms: effect.duration_ms,
                },
            );
        }
        self.cooldowns.insert(event.id.clone(), now_ms);
        self.last_event_ms = now_ms;
        info!(id = %event.id, "random event fired");
        Some(FiredEvent {
            id: event.id.clone(),
            kind: event.kind,
            title: event.title.clone(),
        })
    }

    /// Advance the news ticker and return the current headline.
    pub fn next_headline(&mut self) -> &'static str {
        let headline = NEWS_HEADLINES[self.news_index % NEWS_HEADLINES.len()];
        self.news_index = (self.news_index + 1) % NEWS_HEADLINES.len();
        headline
    }
}
