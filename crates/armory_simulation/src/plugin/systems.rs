//! Arsenal system implementations
//!
//! # Systems (FixedUpdate, chained)
//!
//! 1. `advance_arsenals` - все cooldown'ы и active windows
//! 2. `process_weapon_pickups` - collectible → auto placement
//! 3. `process_equip_weapon` / `process_unequip_weapon`
//! 4. `process_slot_selection` - select + cycle
//! 5. `process_action_triggers` - primary/secondary
//! 6. `publish_cooldown_reports` - outbox → `CooldownChanged`
//!
//! Таймеры двигаются ДО trigger'ов того же тика: cooldown, истёкший в тике T,
//! уже Ready для trigger'а из тика T.

use bevy::prelude::*;

use super::components::{Arsenal, Grounded};
use super::events::*;
use crate::action::Gates;
use crate::catalog::{WeaponCatalog, WeaponDatabase};
use crate::logger::{log, log_error};

/// Intent для entity без `Arsenal` - ошибка host'а, intent отбрасывается
fn log_missing_arsenal(context: &str, entity: Entity) {
    log_error(&format!("{}: entity {:?} missing Arsenal", context, entity));
}

// ============================================================================
// Tick
// ============================================================================

/// System: advance all arsenals by the fixed delta
pub fn advance_arsenals(
    mut arsenals: Query<(Entity, &mut Arsenal)>,
    mut closed: EventWriter<ActionWindowClosed>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut arsenal) in arsenals.iter_mut() {
        for finished in arsenal.selector.advance(delta) {
            closed.write(ActionWindowClosed { entity, finished });
        }
    }
}

// ============================================================================
// Equip / Unequip
// ============================================================================

/// Process weapon pickups (auto placement, full hotbar → pickup discarded)
pub fn process_weapon_pickups(
    mut events: EventReader<WeaponPickedUp>,
    mut arsenals: Query<&mut Arsenal>,
    catalog: Res<WeaponDatabase>,
) {
    for pickup in events.read() {
        let Ok(mut arsenal) = arsenals.get_mut(pickup.entity) else {
            log_missing_arsenal("pickup", pickup.entity);
            continue;
        };

        let Some(record) = catalog.lookup(&pickup.weapon) else {
            log_error(&format!("Picked up unknown weapon '{}'", pickup.weapon));
            continue;
        };

        // Полный hotbar → pickup теряется (warning пишет selector)
        let _ = arsenal.selector.equip(record, None);
    }
}

/// Process equip weapon intents
pub fn process_equip_weapon(
    mut events: EventReader<EquipWeaponIntent>,
    mut arsenals: Query<&mut Arsenal>,
    catalog: Res<WeaponDatabase>,
) {
    for intent in events.read() {
        let Ok(mut arsenal) = arsenals.get_mut(intent.entity) else {
            log_missing_arsenal("equip", intent.entity);
            continue;
        };

        let Some(record) = catalog.lookup(&intent.weapon) else {
            log_error(&format!("WeaponDefinition not found: '{}'", intent.weapon));
            continue;
        };

        // Ошибки уже залогированы selector'ом
        let _ = arsenal.selector.equip(record, intent.preferred_slot);
    }
}

/// Process unequip weapon intents
pub fn process_unequip_weapon(
    mut events: EventReader<UnequipWeaponIntent>,
    mut arsenals: Query<&mut Arsenal>,
) {
    for intent in events.read() {
        let Ok(mut arsenal) = arsenals.get_mut(intent.entity) else {
            log_missing_arsenal("unequip", intent.entity);
            continue;
        };

        let _ = arsenal.selector.unequip(intent.slot);
    }
}

// ============================================================================
// Selection
// ============================================================================

/// Process select + cycle intents (select first, then cycle)
pub fn process_slot_selection(
    mut selects: EventReader<SelectSlotIntent>,
    mut cycles: EventReader<CycleSlotIntent>,
    mut arsenals: Query<&mut Arsenal>,
) {
    for intent in selects.read() {
        match arsenals.get_mut(intent.entity) {
            Ok(mut arsenal) => {
                let _ = arsenal.selector.select_slot(intent.slot);
            }
            Err(_) => log_missing_arsenal("select", intent.entity),
        }
    }

    for intent in cycles.read() {
        match arsenals.get_mut(intent.entity) {
            Ok(mut arsenal) => arsenal.selector.cycle_slot(intent.delta),
            Err(_) => log_missing_arsenal("cycle", intent.entity),
        }
    }
}

// ============================================================================
// Triggers
// ============================================================================

/// Process trigger intents. Rejections are reported, never logged as errors.
pub fn process_action_triggers(
    mut events: EventReader<TriggerActionIntent>,
    mut arsenals: Query<(&mut Arsenal, Option<&Grounded>)>,
    mut triggered: EventWriter<ActionTriggered>,
) {
    for intent in events.read() {
        let Ok((mut arsenal, grounded)) = arsenals.get_mut(intent.entity) else {
            log_missing_arsenal("trigger", intent.entity);
            continue;
        };

        let gates = Gates {
            grounded: grounded.copied().unwrap_or_default().0,
        };
        let slot = arsenal.selector.cursor();
        let outcome = arsenal.selector.trigger(intent.role, &gates);

        if outcome.is_accepted() {
            log(&format!("{:?}: {:?} action fired from slot {}", intent.entity, intent.role, slot));
        }

        triggered.write(ActionTriggered {
            entity: intent.entity,
            slot,
            role: intent.role,
            outcome,
        });
    }
}

// ============================================================================
// UI
// ============================================================================

/// Drain every arsenal's report outbox into `CooldownChanged` events
pub fn publish_cooldown_reports(
    mut arsenals: Query<(Entity, &mut Arsenal)>,
    mut changed: EventWriter<CooldownChanged>,
) {
    for (entity, mut arsenal) in arsenals.iter_mut() {
        for report in arsenal.selector.drain_reports() {
            changed.write(CooldownChanged { entity, report });
        }
    }
}
