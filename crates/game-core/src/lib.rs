#![deny(warnings)]

//! Core domain models for Resume Tycoon.
//!
//! This crate defines the auto-sender and upgrade registries, the
//! action-surface error taxonomy, and the display-formatting contracts
//! shared across the workspace. All currency-typed quantities are
//! `rust_decimal::Decimal`; floating point never touches stored state.

pub mod error;
pub mod format;
pub mod producer;
pub mod upgrade;

pub use error::{EntityKind, GameError};
pub use format::{format_amount, format_cost, format_count};
pub use producer::{default_producers, find_producer, Producer, ProducerId};
pub use upgrade::{
    default_upgrades, find_upgrade, validate_upgrades, RegistryError, UnlockConditions,
    UnlockView, Upgrade, UpgradeEffect, UpgradeId,
};
