//! Cooldown timer - leaf primitive для всех action'ов
//!
//! Значение уменьшается до 0 каждым тиком, готовность = `remaining == 0`.
//! Дополнительно хранится `total` для нормализованного прогресса (UI cooldown meter).

use serde::{Deserialize, Serialize};

/// Countdown timer (секунды)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CooldownTimer {
    /// Оставшееся время (уменьшается до 0)
    remaining: f32,
    /// Длительность последнего запуска
    total: f32,
}

impl CooldownTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start countdown. Non-positive durations are ignored.
    pub fn start(&mut self, duration: f32) {
        if duration <= 0.0 {
            return;
        }

        self.remaining = duration;
        self.total = duration;
    }

    /// Tick: `remaining = max(0, remaining - delta)`
    pub fn advance(&mut self, delta: f32) {
        if self.remaining > 0.0 {
            self.remaining = (self.remaining - delta).max(0.0);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Progress in `[0, 1]`, or `NaN` when no cooldown was ever started
    /// (UI reads NaN as "draw nothing").
    pub fn normalized_progress(&self) -> f32 {
        if self.total > 0.0 {
            ((self.total - self.remaining) / self.total).clamp(0.0, 1.0)
        } else {
            f32::NAN
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn total(&self) -> f32 {
        self.total
    }

    /// Drop all cooldown data (`remaining = total = 0`)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_start_and_advance() {
        let mut timer = CooldownTimer::new();
        assert!(timer.is_ready());

        timer.start(2.0);
        assert!(!timer.is_ready());
        assert_eq!(timer.remaining(), 2.0);

        timer.advance(1.0);
        assert_eq!(timer.normalized_progress(), 0.5);
        assert!(!timer.is_ready());

        timer.advance(1.0);
        assert!(timer.is_ready());
        assert_eq!(timer.normalized_progress(), 1.0);
    }

    #[test]
    fn test_cooldown_never_negative() {
        let mut timer = CooldownTimer::new();
        timer.start(0.5);
        timer.advance(10.0);
        assert_eq!(timer.remaining(), 0.0);
    }

    #[test]
    fn test_non_positive_duration_is_noop() {
        let mut timer = CooldownTimer::new();
        timer.start(0.0);
        timer.start(-1.0);
        assert!(timer.is_ready());
        assert_eq!(timer.total(), 0.0);
        assert!(timer.normalized_progress().is_nan());
    }

    #[test]
    fn test_clear() {
        let mut timer = CooldownTimer::new();
        timer.start(3.0);
        timer.clear();
        assert!(timer.is_ready());
        assert!(timer.normalized_progress().is_nan());
    }
}
