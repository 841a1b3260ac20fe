//! Arsenal plugin - ECS wiring для WeaponSelector
//!
//! # Architecture
//!
//! **Events → Systems flow:**
//! - Host (input, AI, collectibles) шлёт intent events
//! - Systems мутируют `Arsenal` component
//! - Outputs (`CooldownChanged`, `ActionTriggered`, `ActionWindowClosed`) читает UI/visual слой
//!
//! Одна entity = один selector. Вся мутация в FixedUpdate, одним chain'ом.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

// Re-exports
pub use components::*;
pub use events::*;
pub use systems::*;

use crate::catalog::WeaponDatabase;
use crate::config::ArmoryConfig;
use crate::logger::log_error;

/// Arsenal plugin (weapon hotbar + action cooldowns)
///
/// Порядок выполнения (FixedUpdate):
/// 1. advance_arsenals - таймеры, закрытие окон
/// 2. process_weapon_pickups
/// 3. process_equip_weapon
/// 4. process_unequip_weapon
/// 5. process_slot_selection
/// 6. process_action_triggers
/// 7. publish_cooldown_reports
pub struct ArmoryPlugin;

impl Plugin for ArmoryPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<ArmoryConfig>()
            .cloned()
            .unwrap_or_default();

        // Невалидный config (tick_hz <= 0 паникует в Time::from_hz) → defaults
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                log_error(&format!("Invalid ArmoryConfig ({}), falling back to defaults", err));
                ArmoryConfig::default()
            }
        };

        app.insert_resource(Time::<Fixed>::from_hz(config.tick_hz))
            .insert_resource(config)
            .init_resource::<WeaponDatabase>();

        // Регистрация событий
        app.add_event::<EquipWeaponIntent>()
            .add_event::<UnequipWeaponIntent>()
            .add_event::<SelectSlotIntent>()
            .add_event::<CycleSlotIntent>()
            .add_event::<TriggerActionIntent>()
            .add_event::<WeaponPickedUp>()
            .add_event::<CooldownChanged>()
            .add_event::<ActionTriggered>()
            .add_event::<ActionWindowClosed>();

        app.add_systems(
            FixedUpdate,
            (
                // Фаза 1: timers
                advance_arsenals,
                // Фаза 2: loadout
                process_weapon_pickups,
                process_equip_weapon,
                process_unequip_weapon,
                process_slot_selection,
                // Фаза 3: actions (после advance того же тика)
                process_action_triggers,
                // Фаза 4: UI
                publish_cooldown_reports,
            )
                .chain(),
        );
    }
}
