//! Time-boxed multiplicative effects originating from random events.
//!
//! Expiry is evaluated lazily against the tick's wall clock; there are
//! no scheduled timers. An effect whose window has elapsed is removed
//! the next time a tick processes effects, restoring baseline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which multiplier an effect applies to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum TemporaryEffectKind {
    ClickMultiplier,
    AutoSenderBoost,
}

/// One active effect: a multiplier and its wall-clock window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporaryEffect {
    pub multiplier: Decimal,
    pub started_at_ms: i64,
    pub duration_ms: i64,
}

impl TemporaryEffect {
    pub fn is_active(&self, now_ms: i64) -> bool {
        now_ms - self.started_at_ms < self.duration_ms
    }
}

/// The transient effect record, keyed by effect kind. A newly applied
/// effect of the same kind replaces the previous one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemporaryEffects {
    map: BTreeMap<TemporaryEffectKind, TemporaryEffect>,
}

impl TemporaryEffects {
    pub fn apply(&mut self, kind: TemporaryEffectKind, effect: TemporaryEffect) {
        self.map.insert(kind, effect);
    }

    /// Multiplier currently in force for `kind`, or 1 when no effect
    /// is active. An expired-but-not-yet-removed effect counts as
    /// inactive, so a boost never outlives its window.
    pub fn active_multiplier(&self, kind: TemporaryEffectKind, now_ms: i64) -> Decimal {
        self.map
            .get(&kind)
            .filter(|e| e.is_active(now_ms))
            .map(|e| e.multiplier)
            .unwrap_or(Decimal::ONE)
    }

    /// Drop every effect whose window has elapsed; returns the kinds
    /// removed.
    pub fn expire(&mut self, now_ms: i64) -> Vec<TemporaryEffectKind> {
        let expired: Vec<TemporaryEffectKind> = self
            .map
            .iter()
            .filter(|(_, e)| !e.is_active(now_ms))
            .map(|(k, _)| *k)
            .collect();
        for kind in &expired {
            self.map.remove(kind);
        }
        expired
    }

    pub fn get(&self, kind: TemporaryEffectKind) -> Option<&TemporaryEffect> {
        self.map.get(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
