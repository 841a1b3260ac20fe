//! Action module - primary/secondary abilities оружия
//!
//! # Архитектура
//!
//! **ActionConfig** - статическое описание способности (из `WeaponDefinition`):
//! - cooldown длительность
//! - опциональное active window (Seconds / Ticks)
//! - когда стартует cooldown: на trigger или на закрытии окна
//! - retrigger policy: Reject (gate) / Preempt (перезапуск окна)
//! - grounded gate, toggle
//!
//! **ActionState** - runtime state (cooldown + pending finalization).
//! Один pending slot на ActionState - новый trigger перезаписывает его,
//! никогда не добавляет второй.
//!
//! **GateConditions** - внешние предикаты (grounded), передаются caller'ом.

use serde::{Deserialize, Serialize};

pub mod state;


pub use state::*;

// ============================================================================
// ActionConfig
// ============================================================================

/// Bounded "active" window of an ability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActiveWindow {
    /// Timed window (секунды)
    Seconds(f32),
    /// Counted in `advance` calls (shot handler stays on for N frames)
    Ticks(u32),
}

/// When the cooldown begins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CooldownStart {
    /// Instant-fire abilities
    #[default]
    OnTrigger,
    /// Sustained effects: cooldown стартует когда окно закрывается
    OnWindowClose,
}

/// What a trigger does while a window is still open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RetriggerPolicy {
    /// Cancel the pending finalization and restart the window
    #[default]
    Preempt,
    /// Reject with `GateFailure::WindowActive`
    Reject,
}

/// Static ability description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionConfig {
    /// Cooldown длительность (секунды). `<= 0` = без cooldown'а
    pub cooldown: f32,
    pub window: Option<ActiveWindow>,
    #[serde(default)]
    pub cooldown_start: CooldownStart,
    #[serde(default)]
    pub retrigger: RetriggerPolicy,
    /// `false` = можно использовать в воздухе
    #[serde(default)]
    pub requires_grounded: bool,
    /// Toggle ability (barrier): flip bit on every accepted press
    #[serde(default)]
    pub toggle: bool,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self::idle()
    }
}

impl ActionConfig {
    /// Empty slot: no cooldown, no window
    pub fn idle() -> Self {
        Self {
            cooldown: 0.0,
            window: None,
            cooldown_start: CooldownStart::OnTrigger,
            retrigger: RetriggerPolicy::Preempt,
            requires_grounded: false,
            toggle: false,
        }
    }

    /// Instant ability (wind burst): cooldown на trigger, без окна
    pub fn instant(cooldown: f32) -> Self {
        Self {
            cooldown,
            ..Self::idle()
        }
    }

    /// Projectile shot: weapon handler enabled for exactly two ticks
    pub fn shot(cooldown: f32) -> Self {
        Self {
            cooldown,
            window: Some(ActiveWindow::Ticks(2)),
            ..Self::idle()
        }
    }

    /// Sustained effect (electric overdrive): cooldown only after the effect ends,
    /// retrigger while active is rejected
    pub fn sustained(duration: f32, cooldown: f32) -> Self {
        Self {
            cooldown,
            window: Some(ActiveWindow::Seconds(duration)),
            cooldown_start: CooldownStart::OnWindowClose,
            retrigger: RetriggerPolicy::Reject,
            ..Self::idle()
        }
    }

    /// Toggle (barrier) with a max deployed duration
    pub fn toggle(max_duration: f32, cooldown: f32) -> Self {
        Self {
            cooldown,
            window: Some(ActiveWindow::Seconds(max_duration)),
            requires_grounded: true,
            toggle: true,
            ..Self::idle()
        }
    }

    pub fn grounded(mut self) -> Self {
        self.requires_grounded = true;
        self
    }
}

// ============================================================================
// Gates
// ============================================================================

/// Externally supplied trigger preconditions
pub trait GateConditions {
    fn is_grounded(&self) -> bool;
}

/// Snapshot of gate predicates (для тестов и headless runs)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gates {
    pub grounded: bool,
}

impl Gates {
    pub const GROUNDED: Gates = Gates { grounded: true };
    pub const AIRBORNE: Gates = Gates { grounded: false };
}

impl Default for Gates {
    fn default() -> Self {
        Self::GROUNDED
    }
}

impl GateConditions for Gates {
    fn is_grounded(&self) -> bool {
        self.grounded
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// Why a gate rejected a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateFailure {
    NotGrounded,
    /// Selected slot is empty
    NoWeapon,
    /// Non-retriggerable ability with an open window
    WindowActive,
}

/// Result of `try_trigger`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Accepted,
    NotReady,
    GateFailed(GateFailure),
}

impl TriggerOutcome {
    pub fn is_accepted(self) -> bool {
        matches!(self, TriggerOutcome::Accepted)
    }
}

/// Event produced by `ActionState::advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEvent {
    /// Active window expired and its finalization ran
    WindowClosed { window_id: u64 },
}
