//! Cooldown meter reports (selector → UI)

use crate::catalog::CooldownColor;

/// Which action meter a report targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotRole {
    Primary,
    Secondary,
}

impl SlotRole {
    pub const ALL: [SlotRole; 2] = [SlotRole::Primary, SlotRole::Secondary];
}

/// One meter update
///
/// `normalized` = NaN → meter draws nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CooldownReport {
    pub role: SlotRole,
    pub color: CooldownColor,
    pub normalized: f32,
    pub remaining: f32,
}

impl CooldownReport {
    /// NaN progress, white tint
    pub fn cleared(role: SlotRole) -> Self {
        Self {
            role,
            color: CooldownColor::WHITE,
            normalized: f32::NAN,
            remaining: 0.0,
        }
    }

    pub fn is_cleared(&self) -> bool {
        self.normalized.is_nan()
    }
}

/// UI collaborator
pub trait CooldownSink {
    fn report_cooldown(&mut self, report: CooldownReport);
}

impl CooldownSink for Vec<CooldownReport> {
    fn report_cooldown(&mut self, report: CooldownReport) {
        self.push(report);
    }
}
