//! Armory Simulation Core
//!
//! Weapon hotbar + action cooldowns на Bevy 0.16 (strategic layer).
//!
//! - `slots` - фиксированный hotbar, курсор, first-free index
//! - `action` / `cooldown` - gated actions, active windows, cooldown timers
//! - `selector` - hotbar + per-slot actions + cooldown meter reports
//! - `save` - slot contents ↔ JSON по weapon key
//! - `plugin` - ECS wiring (intents → `Arsenal` → outputs)

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod action;
pub mod catalog;
pub mod config;
pub mod cooldown;
pub mod error;
pub mod harness;
pub mod logger;
pub mod plugin;
pub mod save;
pub mod selector;
pub mod slots;

// Re-export базовых типов для удобства
pub use action::{ActionConfig, ActionState, GateConditions, GateFailure, Gates, TriggerOutcome};
pub use catalog::{WeaponCatalog, WeaponDatabase, WeaponDefinition, WeaponKey, WeaponRecord};
pub use config::ArmoryConfig;
pub use cooldown::CooldownTimer;
pub use error::{ConfigError, LoadError, SlotError, SoakError};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter};
pub use plugin::*;
pub use save::{SaveRecord, SlotPayload};
pub use selector::{CooldownReport, CooldownSink, SlotRole, WeaponSelector};
pub use slots::{WeaponSlotTable, MAX_SLOTS};

/// Главный plugin симуляции (config + RNG + arsenal)
pub struct SimulationPlugin {
    pub config: ArmoryConfig,
    pub seed: u64,
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self {
            config: ArmoryConfig::default(),
            seed: 42,
        }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            // Детерминистичный RNG (seed по умолчанию)
            .insert_resource(DeterministicRng::new(self.seed))
            .add_plugins(ArmoryPlugin);
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64, config: ArmoryConfig) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .add_plugins(SimulationPlugin { config, seed });

    app
}

/// Один fixed tick без wall clock
///
/// `app.update()` двигает `Time<Fixed>` по реальному времени, что ломает
/// детерминизм; здесь timestep добавляется вручную.
pub fn step_fixed(app: &mut App) {
    let world = app.world_mut();
    let timestep = world.resource::<Time<Fixed>>().timestep();
    world.resource_mut::<Time<Fixed>>().advance_by(timestep);
    world.run_schedule(FixedUpdate);
}

/// Забирает все накопленные события типа `E`
pub fn drain_events<E: Event>(app: &mut App) -> Vec<E> {
    app.world_mut().resource_mut::<Events<E>>().drain().collect()
}

/// Snapshot всех arsenals для сравнения детерминизма
///
/// Слоты (weapon keys), курсор, session clock и остаток каждого cooldown'а
/// побитово.
pub fn arsenal_snapshot(world: &mut World) -> Vec<u8> {
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &Arsenal)>();
    let mut arsenals: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    arsenals.sort_by_key(|(entity, _)| entity.index());

    for (entity, arsenal) in arsenals {
        let selector = &arsenal.selector;
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        for payload in selector.save().slots {
            if let SlotPayload::Weapon(key) = payload {
                snapshot.extend_from_slice(key.0.as_bytes());
            }
            snapshot.push(0);
        }
        snapshot.extend_from_slice(&(selector.cursor() as u32).to_le_bytes());
        snapshot.extend_from_slice(&selector.now().to_bits().to_le_bytes());

        for index in 0..selector.slot_count() {
            let Some(pair) = selector.actions_at(index) else {
                continue;
            };
            for role in SlotRole::ALL {
                let state = pair.get(role);
                snapshot.extend_from_slice(&state.cooldown().remaining().to_bits().to_le_bytes());
                snapshot.push(u8::from(state.is_active()) | (u8::from(state.is_toggled()) << 1));
            }
        }
    }

    snapshot
}
