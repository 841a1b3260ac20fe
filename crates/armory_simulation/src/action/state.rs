//! ActionState - trigger state machine
//!
//! ```text
//! Ready ──trigger──▶ Cooling ──advance──▶ Ready
//!   └──── Active window (orthogonal, overlaps early Cooling) ────┘
//! ```
//!
//! Окно "подвешивает" finalization до дедлайна; дедлайн проверяется в каждом
//! `advance`, блокирующих ожиданий нет. Дедлайн - обратный отсчёт по `delta`
//! (как `CooldownTimer`), от абсолютного session clock он не зависит.

use super::{
    ActionConfig, ActionEvent, ActiveWindow, CooldownStart, GateConditions, GateFailure,
    RetriggerPolicy, TriggerOutcome,
};
use crate::cooldown::CooldownTimer;

/// Deadline of a pending finalization
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Deadline {
    /// Remaining window time (секунды), уменьшается на `delta`
    Remaining(f32),
    /// Remaining `advance` calls
    TicksLeft(u32),
}

/// The single pending finalization slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingFinalization {
    pub window_id: u64,
    /// Session time открытия окна
    pub opened_at: f64,
    pub deadline: Deadline,
}

/// Runtime state of one ability
#[derive(Debug, Clone, PartialEq)]
pub struct ActionState {
    config: ActionConfig,
    cooldown: CooldownTimer,
    pending: Option<PendingFinalization>,
    /// Toggle bit (только для toggle abilities)
    toggled: bool,
    cooldowns_enabled: bool,
    next_window_id: u64,
}

impl Default for ActionState {
    fn default() -> Self {
        Self::new(ActionConfig::idle())
    }
}

impl ActionState {
    pub fn new(config: ActionConfig) -> Self {
        Self {
            config,
            cooldown: CooldownTimer::new(),
            pending: None,
            toggled: false,
            cooldowns_enabled: true,
            next_window_id: 0,
        }
    }

    /// Reset to Ready with a (possibly different) config.
    /// Cooldowns-enabled flag survives the reset.
    pub fn reset(&mut self, config: ActionConfig) {
        let cooldowns_enabled = self.cooldowns_enabled;
        *self = Self::new(config);
        self.cooldowns_enabled = cooldowns_enabled;
    }

    pub fn config(&self) -> &ActionConfig {
        &self.config
    }

    pub fn cooldown(&self) -> &CooldownTimer {
        &self.cooldown
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown.is_ready()
    }

    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingFinalization> {
        self.pending.as_ref()
    }

    pub fn active_window_id(&self) -> Option<u64> {
        self.pending.map(|p| p.window_id)
    }

    pub fn is_toggled(&self) -> bool {
        self.toggled
    }

    pub fn cooldowns_enabled(&self) -> bool {
        self.cooldowns_enabled
    }

    /// Disabling clears the running cooldown and suppresses new ones
    pub fn set_cooldowns_enabled(&mut self, enabled: bool) {
        self.cooldowns_enabled = enabled;
        if !enabled {
            self.cooldown.clear();
        }
    }

    /// Trigger contract:
    /// 1. cooldown не готов → `NotReady` (ничего не меняется)
    /// 2. gates → `GateFailed`
    /// 3. overwrite pending slot, open window, start cooldown → `Accepted`
    pub fn try_trigger(&mut self, now: f64, gates: &dyn GateConditions) -> TriggerOutcome {
        if !self.cooldown.is_ready() {
            return TriggerOutcome::NotReady;
        }

        if self.config.toggle {
            return self.trigger_toggle(now, gates);
        }

        if self.pending.is_some() && self.config.retrigger == RetriggerPolicy::Reject {
            return TriggerOutcome::GateFailed(GateFailure::WindowActive);
        }

        if self.config.requires_grounded && !gates.is_grounded() {
            return TriggerOutcome::GateFailed(GateFailure::NotGrounded);
        }

        // Preempt: previous finalization is dropped, not run
        self.pending = None;
        self.open_window(now);

        if self.config.cooldown_start == CooldownStart::OnTrigger || self.config.window.is_none() {
            self.start_cooldown();
        }

        TriggerOutcome::Accepted
    }

    /// Two-phase toggle: the bit flips unconditionally, the grounded gate
    /// only blocks the visible effect (window + cooldown).
    fn trigger_toggle(&mut self, now: f64, gates: &dyn GateConditions) -> TriggerOutcome {
        self.toggled = !self.toggled;

        if self.config.requires_grounded && !gates.is_grounded() {
            return TriggerOutcome::GateFailed(GateFailure::NotGrounded);
        }

        if self.toggled {
            self.pending = None;
            self.open_window(now);
        } else {
            self.pending = None;
        }

        self.start_cooldown();
        TriggerOutcome::Accepted
    }

    /// Tick. Cooldown advances first, then the pending deadline counts down.
    pub fn advance(&mut self, delta: f32) -> Option<ActionEvent> {
        self.cooldown.advance(delta);

        let pending = self.pending.as_mut()?;
        let expired = match &mut pending.deadline {
            Deadline::Remaining(remaining) => {
                *remaining = (*remaining - delta).max(0.0);
                *remaining <= 0.0
            }
            Deadline::TicksLeft(ticks) => {
                *ticks = ticks.saturating_sub(1);
                *ticks == 0
            }
        };

        if !expired {
            return None;
        }

        let window_id = pending.window_id;
        self.finalize();
        Some(ActionEvent::WindowClosed { window_id })
    }

    fn finalize(&mut self) {
        self.pending = None;

        if self.config.toggle {
            // Max duration reached → auto-retract
            self.toggled = false;
        }

        if self.config.cooldown_start == CooldownStart::OnWindowClose {
            self.start_cooldown();
        }
    }

    fn open_window(&mut self, now: f64) {
        let Some(window) = self.config.window else {
            return;
        };

        let deadline = match window {
            ActiveWindow::Seconds(duration) => Deadline::Remaining(duration),
            ActiveWindow::Ticks(ticks) => Deadline::TicksLeft(ticks.max(1)),
        };

        self.pending = Some(PendingFinalization {
            window_id: self.next_window_id,
            opened_at: now,
            deadline,
        });
        self.next_window_id += 1;
    }

    fn start_cooldown(&mut self) {
        if self.cooldowns_enabled {
            self.cooldown.start(self.config.cooldown);
        }
    }
}
