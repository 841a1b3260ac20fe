//! Error types
//!
//! Trigger rejections (`NotReady`, `GateFailed`) are NOT errors - они
//! возвращаются как `TriggerOutcome` (см. `action`).

use thiserror::Error;

use crate::catalog::WeaponKey;

/// Slot table errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    /// Capacity exhausted (recoverable, caller informs the player)
    #[error("no free weapon slot")]
    NoFreeSlot,

    /// Caller contract violation
    #[error("slot index {index} out of range (slot count {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Explicit placement into an occupied slot
    #[error("slot {index} is already occupied")]
    SlotOccupied { index: usize },

    #[error("slot count {0} is outside 1..=9")]
    InvalidSlotCount(usize),
}

/// Save data errors
///
/// Per-slot variants are collected in `LoadReport::skipped` (skip-and-continue);
/// `Malformed` aborts the load before anything is touched.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("slot {index}: weapon key '{key}' not found in catalog")]
    UnresolvableWeaponKey { index: usize, key: WeaponKey },

    #[error("slot {index}: save has more entries than the {len} available slots")]
    SlotOutOfRange { index: usize, len: usize },

    #[error("malformed save data: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Config errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("slot_count must be in 1..=9, got {0}")]
    InvalidSlotCount(usize),

    #[error("tick_hz must be positive, got {0}")]
    InvalidTickRate(f64),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Soak run invariant failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SoakError {
    #[error("tick {tick}: {detail}")]
    InvariantViolated { tick: u32, detail: String },

    #[error(transparent)]
    Slot(#[from] SlotError),
}
