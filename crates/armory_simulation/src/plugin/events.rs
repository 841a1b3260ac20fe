//! Arsenal events
//!
//! # Architecture
//!
//! **Intents (host → ECS):**
//! - `EquipWeaponIntent` → equip по ключу (explicit slot или auto placement)
//! - `UnequipWeaponIntent` → очистить слот
//! - `SelectSlotIntent` / `CycleSlotIntent` → hotkeys 1-9 / колесо мыши
//! - `TriggerActionIntent` → primary/secondary кнопка
//! - `WeaponPickedUp` → collectible подобран (auto placement)
//!
//! **Outputs (ECS → UI/visuals):**
//! - `CooldownChanged` → cooldown meter
//! - `ActionTriggered` → outcome каждого trigger'а
//! - `ActionWindowClosed` → active window истекло (stop shooting, retract barrier)

use bevy::prelude::*;

use crate::action::TriggerOutcome;
use crate::catalog::WeaponKey;
use crate::selector::{ActionFinished, CooldownReport, SlotRole};

// ============================================================================
// Intents
// ============================================================================

/// Equip weapon
///
/// # Flow
/// 1. Lookup key в `WeaponDatabase`
/// 2. `preferred_slot` пустой → кладём туда, иначе первый свободный слот
/// 3. Action state слота сбрасывается
#[derive(Event, Clone, Debug)]
pub struct EquipWeaponIntent {
    pub entity: Entity,
    pub weapon: WeaponKey,
    pub preferred_slot: Option<usize>,
}

/// Unequip weapon из слота
#[derive(Event, Clone, Debug)]
pub struct UnequipWeaponIntent {
    pub entity: Entity,
    pub slot: usize,
}

/// Select slot (hotkeys 1-9 → 0-8)
#[derive(Event, Clone, Debug)]
pub struct SelectSlotIntent {
    pub entity: Entity,
    pub slot: usize,
}

/// Cycle slot (scroll wheel, any sign)
#[derive(Event, Clone, Debug)]
pub struct CycleSlotIntent {
    pub entity: Entity,
    pub delta: i32,
}

/// Trigger action выбранного слота
#[derive(Event, Clone, Debug)]
pub struct TriggerActionIntent {
    pub entity: Entity,
    pub role: SlotRole,
}

/// Weapon collectible picked up
#[derive(Event, Clone, Debug)]
pub struct WeaponPickedUp {
    pub entity: Entity,
    pub weapon: WeaponKey,
}

// ============================================================================
// Outputs
// ============================================================================

/// Cooldown meter update for the displayed slot
#[derive(Event, Clone, Debug)]
pub struct CooldownChanged {
    pub entity: Entity,
    pub report: CooldownReport,
}

/// Outcome of a trigger intent
#[derive(Event, Clone, Debug)]
pub struct ActionTriggered {
    pub entity: Entity,
    pub slot: usize,
    pub role: SlotRole,
    pub outcome: TriggerOutcome,
}

/// Active window finalized
#[derive(Event, Clone, Debug)]
pub struct ActionWindowClosed {
    pub entity: Entity,
    pub finished: ActionFinished,
}
