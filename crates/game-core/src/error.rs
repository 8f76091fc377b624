use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// What kind of entity an id failed to resolve to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Producer,
    Upgrade,
    Bonus,
    Industry,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Producer => "auto-sender",
            EntityKind::Upgrade => "upgrade",
            EntityKind::Bonus => "permanent bonus",
            EntityKind::Industry => "industry",
        };
        f.write_str(name)
    }
}

/// The action-surface failure taxonomy.
///
/// Every variant is non-fatal and recoverable at the call site: an
/// action either fully succeeds or fully no-ops, and the caller gets
/// back which, with enough detail for UI display.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GameError {
    /// Unknown producer/upgrade/bonus/industry id.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },
    /// One-shot purchase attempted a second time.
    #[error("already purchased: {0}")]
    AlreadyPurchased(String),
    /// A dependency or numeric unlock condition is unmet.
    #[error("not yet unlocked: {0}")]
    NotUnlocked(String),
    /// Currency or experience-point shortfall.
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Decimal, available: Decimal },
    /// Permanent bonus is already at its level cap.
    #[error("{0} is at maximum level")]
    MaxLevelReached(String),
    /// The career-change gate is not met.
    #[error("career change requires {required} lifetime resumes, have {total}")]
    PrestigeNotReady { required: Decimal, total: Decimal },
    /// Malformed or missing required persisted fields.
    #[error("invalid save data: {0}")]
    InvalidSaveData(String),
    /// The persistence medium is inaccessible.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}
