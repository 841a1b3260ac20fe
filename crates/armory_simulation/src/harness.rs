//! Headless soak harness
//!
//! Гоняет N arsenals через случайные intents (seeded ChaCha8) и после каждого
//! тика проверяет инварианты hotbar'а. Используется бинарником и determinism
//! тестами.

use bevy::prelude::*;
use rand::Rng;

use crate::action::ActionConfig;
use crate::catalog::{WeaponDatabase, WeaponKey};
use crate::config::ArmoryConfig;
use crate::error::SoakError;
use crate::logger::log_info;
use crate::plugin::*;
use crate::selector::{SlotRole, WeaponSelector};
use crate::{arsenal_snapshot, create_headless_app, drain_events, step_fixed, DeterministicRng};

/// Arsenals per soak run
pub const SOAK_ENTITIES: usize = 4;

/// Aggregated soak counters + final world snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoakSummary {
    pub ticks: u32,
    pub intents_sent: u64,
    pub triggers_accepted: u64,
    pub triggers_rejected: u64,
    pub windows_closed: u64,
    pub cooldown_reports: u64,
    pub save_roundtrips: u64,
    pub snapshot: Vec<u8>,
}

pub fn run_soak(seed: u64, ticks: u32, config: &ArmoryConfig) -> Result<SoakSummary, SoakError> {
    // Soak намеренно шлёт out-of-range индексы
    let config = &ArmoryConfig {
        strict_indices: false,
        ..config.clone()
    };

    let mut app = create_headless_app(seed, config.clone());
    let catalog = app.world().resource::<WeaponDatabase>().clone();
    let keys = catalog.keys();

    let mut entities = Vec::with_capacity(SOAK_ENTITIES);
    for _ in 0..SOAK_ENTITIES {
        let arsenal = Arsenal::from_config(config, &catalog)?;
        entities.push(app.world_mut().spawn((arsenal, Grounded(true))).id());
    }

    let mut summary = SoakSummary {
        ticks,
        ..Default::default()
    };

    for tick in 0..ticks {
        summary.intents_sent += send_random_intents(&mut app, &entities, &keys, config.slot_count);

        // Редкий save → load roundtrip вне schedule
        let roundtrip = app.world_mut().resource_mut::<DeterministicRng>().rng.gen_ratio(1, 500);
        if roundtrip {
            let entity = entities[tick as usize % entities.len()];
            if let Some(mut arsenal) = app.world_mut().get_mut::<Arsenal>(entity) {
                let record = arsenal.selector.save();
                if let Err(err) = arsenal.selector.load(&record, &catalog) {
                    return Err(SoakError::InvariantViolated {
                        tick,
                        detail: format!("roundtrip load failed: {err}"),
                    });
                }
                summary.save_roundtrips += 1;
            }
        }

        step_fixed(&mut app);

        for triggered in drain_events::<ActionTriggered>(&mut app) {
            if triggered.outcome.is_accepted() {
                summary.triggers_accepted += 1;
            } else {
                summary.triggers_rejected += 1;
            }
        }
        summary.windows_closed += drain_events::<ActionWindowClosed>(&mut app).len() as u64;
        summary.cooldown_reports += drain_events::<CooldownChanged>(&mut app).len() as u64;
        clear_intents(&mut app);

        let world = app.world_mut();
        let mut query = world.query::<&Arsenal>();
        for arsenal in query.iter(world) {
            check_invariants(tick, &arsenal.selector)?;
        }

        if tick > 0 && tick % 1000 == 0 {
            log_info(&format!(
                "Soak tick {}: {} accepted, {} rejected, {} windows closed",
                tick, summary.triggers_accepted, summary.triggers_rejected, summary.windows_closed
            ));
        }
    }

    summary.snapshot = arsenal_snapshot(app.world_mut());
    Ok(summary)
}

/// Returns the number of intents written
fn send_random_intents(app: &mut App, entities: &[Entity], keys: &[WeaponKey], slot_count: usize) -> u64 {
    if keys.is_empty() {
        return 0;
    }

    app.world_mut()
        .resource_scope(|world, mut rng: Mut<DeterministicRng>| {
            let rng = &mut rng.rng;
            let mut sent = 0;

            for &entity in entities {
                for _ in 0..rng.gen_range(0..3) {
                    // Чуть шире реального диапазона: out-of-range индексы тоже должны быть безопасны
                    let any_slot = rng.gen_range(0..slot_count + 1);

                    match rng.gen_range(0..100) {
                        0..=9 => {
                            let weapon = keys[rng.gen_range(0..keys.len())].clone();
                            let preferred_slot = rng.gen_bool(0.5).then_some(any_slot);
                            world.send_event(EquipWeaponIntent {
                                entity,
                                weapon,
                                preferred_slot,
                            });
                        }
                        10..=17 => {
                            let weapon = keys[rng.gen_range(0..keys.len())].clone();
                            world.send_event(WeaponPickedUp { entity, weapon });
                        }
                        18..=27 => {
                            world.send_event(UnequipWeaponIntent { entity, slot: any_slot });
                        }
                        28..=37 => {
                            world.send_event(SelectSlotIntent { entity, slot: any_slot });
                        }
                        38..=47 => {
                            let delta = rng.gen_range(-12..=12);
                            world.send_event(CycleSlotIntent { entity, delta });
                        }
                        48..=54 => {
                            let grounded = rng.gen_bool(0.7);
                            if let Some(mut flag) = world.get_mut::<Grounded>(entity) {
                                flag.0 = grounded;
                            }
                            continue;
                        }
                        _ => {
                            let role = if rng.gen_bool(0.6) { SlotRole::Primary } else { SlotRole::Secondary };
                            world.send_event(TriggerActionIntent { entity, role });
                        }
                    }

                    sent += 1;
                }
            }

            sent
        })
}

/// Intents уже прочитаны системами этого тика
fn clear_intents(app: &mut App) {
    let world = app.world_mut();
    world.resource_mut::<Events<EquipWeaponIntent>>().clear();
    world.resource_mut::<Events<UnequipWeaponIntent>>().clear();
    world.resource_mut::<Events<SelectSlotIntent>>().clear();
    world.resource_mut::<Events<CycleSlotIntent>>().clear();
    world.resource_mut::<Events<TriggerActionIntent>>().clear();
    world.resource_mut::<Events<WeaponPickedUp>>().clear();
}

/// Hotbar invariants (после каждого тика)
pub fn check_invariants(tick: u32, selector: &WeaponSelector) -> Result<(), SoakError> {
    let violated = |detail: String| Err(SoakError::InvariantViolated { tick, detail });
    let table = selector.table();

    if selector.cursor() >= table.len() {
        return violated(format!("cursor {} >= slot count {}", selector.cursor(), table.len()));
    }

    let first_empty = table.iter().position(|slot| slot.is_none());
    if table.free_index() != first_empty {
        return violated(format!(
            "free index {:?} != lowest empty slot {:?}",
            table.free_index(),
            first_empty
        ));
    }

    for index in 0..table.len() {
        let Some(pair) = selector.actions_at(index) else {
            return violated(format!("slot {index} has no action state"));
        };

        if table.get(index).is_none() && pair.primary.config() != &ActionConfig::idle() {
            return violated(format!("empty slot {index} kept a weapon action"));
        }
    }

    Ok(())
}
