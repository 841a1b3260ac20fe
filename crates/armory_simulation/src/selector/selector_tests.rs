//! Tests for WeaponSelector.

use super::*;
use crate::action::{ActionConfig, Gates};
use crate::catalog::{WeaponDatabase, WeaponDefinition};

/// Helper: оружие с заданными способностями
fn weapon_def(key: &str, primary: ActionConfig, secondary: ActionConfig) -> WeaponDefinition {
    WeaponDefinition {
        key: key.into(),
        name: key.to_uppercase(),
        cooldown_color: crate::catalog::CooldownColor::rgb(0.2, 0.4, 0.8),
        primary,
        secondary,
    }
}

fn weapon(key: &str) -> WeaponRecord {
    WeaponRecord::from(weapon_def(key, ActionConfig::instant(2.0), ActionConfig::instant(1.0)))
}

fn catalog_with(keys: &[&str]) -> WeaponDatabase {
    let mut db = WeaponDatabase::empty();
    for key in keys {
        db.insert(weapon_def(key, ActionConfig::instant(2.0), ActionConfig::instant(1.0)));
    }
    db
}

#[test]
fn test_equip_until_full_then_reuse_freed_slot() {
    let mut selector = WeaponSelector::new(3).unwrap();
    assert_eq!(selector.equip(weapon("w1"), None), Ok(0));
    assert_eq!(selector.equip(weapon("w2"), None), Ok(1));
    assert_eq!(selector.equip(weapon("w3"), None), Ok(2));
    assert_eq!(selector.equip(weapon("w4"), None), Err(SlotError::NoFreeSlot));

    selector.unequip(1).unwrap();
    assert_eq!(selector.table().free_index(), Some(1));

    assert_eq!(selector.equip(weapon("w4"), None), Ok(1));
    assert_eq!(selector.weapon_at(1), Some(&weapon("w4")));
}

#[test]
fn test_equip_preferred_index() {
    let mut selector = WeaponSelector::new(4).unwrap();
    selector.set_strict_indices(false);
    assert_eq!(selector.equip(weapon("a"), Some(2)), Ok(2));
    assert_eq!(selector.table().free_index(), Some(0));

    // Занят → auto placement
    assert_eq!(selector.equip(weapon("b"), Some(2)), Ok(0));

    assert_eq!(
        selector.equip(weapon("c"), Some(7)),
        Err(SlotError::IndexOutOfRange { index: 7, len: 4 })
    );
}

#[test]
fn test_unequip_out_of_range() {
    let mut selector = WeaponSelector::new(2).unwrap();
    selector.set_strict_indices(false);
    assert_eq!(
        selector.unequip(5),
        Err(SlotError::IndexOutOfRange { index: 5, len: 2 })
    );
    assert_eq!(selector.unequip(1), Ok(()));
}

#[test]
fn test_primary_cooldown_progress() {
    let mut selector = WeaponSelector::new(2).unwrap();
    selector.equip(weapon("w1"), None).unwrap();

    assert_eq!(selector.trigger_primary(&Gates::GROUNDED), TriggerOutcome::Accepted);

    selector.advance(1.0);
    assert_eq!(selector.current_primary().cooldown().normalized_progress(), 0.5);
    assert!(!selector.current_primary().is_ready());

    selector.advance(1.0);
    assert!(selector.current_primary().is_ready());
}

#[test]
fn test_trigger_not_ready_then_ready_same_tick() {
    let mut selector = WeaponSelector::new(1).unwrap();
    selector.equip(weapon("w1"), None).unwrap();

    assert!(selector.trigger_primary(&Gates::GROUNDED).is_accepted());
    assert_eq!(selector.trigger_primary(&Gates::GROUNDED), TriggerOutcome::NotReady);

    // Cooldown истекает ровно в этом тике → trigger после advance принимается
    selector.advance(2.0);
    assert!(selector.trigger_primary(&Gates::GROUNDED).is_accepted());
}

#[test]
fn test_trigger_empty_slot() {
    let mut selector = WeaponSelector::new(2).unwrap();
    assert_eq!(
        selector.trigger_secondary(&Gates::GROUNDED),
        TriggerOutcome::GateFailed(GateFailure::NoWeapon)
    );
}

#[test]
fn test_cooldowns_are_per_slot() {
    let mut selector = WeaponSelector::new(3).unwrap();
    selector.equip(weapon("w1"), None).unwrap();
    selector.equip(weapon("w2"), None).unwrap();

    assert!(selector.trigger_primary(&Gates::GROUNDED).is_accepted());
    selector.advance(0.5);

    selector.select_slot(1).unwrap();
    assert!(selector.current_primary().is_ready());
    assert!(selector.trigger_primary(&Gates::GROUNDED).is_accepted());

    selector.cycle_slot(-1);
    assert_eq!(selector.cursor(), 0);
    assert_eq!(selector.current_primary().cooldown().remaining(), 1.5);

    let other = selector.actions_at(1).unwrap();
    assert_eq!(other.primary.cooldown().remaining(), 2.0);
}

#[test]
fn test_unequip_resets_slot_actions() {
    let mut selector = WeaponSelector::new(2).unwrap();
    selector.equip(weapon("w1"), None).unwrap();
    assert!(selector.trigger_primary(&Gates::GROUNDED).is_accepted());

    selector.unequip(0).unwrap();
    assert!(selector.current_primary().is_ready());
    assert_eq!(selector.current_primary().config(), &ActionConfig::idle());

    selector.equip(weapon("w2"), None).unwrap();
    assert!(selector.current_primary().is_ready());
}

#[test]
fn test_reports_on_trigger_tick_and_select() {
    let mut selector = WeaponSelector::new(2).unwrap();
    selector.equip(weapon("w1"), None).unwrap();
    selector.drain_reports();

    selector.trigger_primary(&Gates::GROUNDED);
    let reports = selector.drain_reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].role, SlotRole::Primary);
    assert_eq!(reports[0].normalized, 0.0);
    assert_eq!(reports[0].remaining, 2.0);

    selector.advance(0.5);
    let reports = selector.drain_reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].normalized, 0.25);

    // Пустой слот → оба meter'а сброшены
    selector.select_slot(1).unwrap();
    let reports = selector.drain_reports();
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(CooldownReport::is_cleared));

    // Idle tick на пустом слоте ничего не репортит
    selector.advance(0.5);
    assert!(selector.drain_reports().is_empty());

    let mut sink: Vec<CooldownReport> = Vec::new();
    selector.select_slot(0).unwrap();
    selector.flush_reports(&mut sink);
    assert_eq!(sink.len(), 2);
    assert_eq!(sink[0].color, crate::catalog::CooldownColor::rgb(0.2, 0.4, 0.8));
    assert_eq!(sink[0].remaining, 1.0);
}

#[test]
fn test_window_close_reports_and_finishes_once() {
    let mut selector = WeaponSelector::new(1).unwrap();
    let def = weapon_def("electric", ActionConfig::shot(0.5), ActionConfig::sustained(1.0, 3.0));
    selector.equip(WeaponRecord::from(def), None).unwrap();

    assert!(selector.trigger_secondary(&Gates::GROUNDED).is_accepted());
    assert_eq!(
        selector.trigger_secondary(&Gates::GROUNDED),
        TriggerOutcome::GateFailed(GateFailure::WindowActive)
    );

    let mut finished = Vec::new();
    for _ in 0..4 {
        finished.extend(selector.advance(0.5));
    }

    assert_eq!(
        finished,
        vec![ActionFinished {
            slot: 0,
            role: SlotRole::Secondary,
            window_id: 0,
        }]
    );
    assert_eq!(selector.current_secondary().cooldown().remaining(), 2.0);
}

#[test]
fn test_cooldowns_disabled() {
    let mut selector = WeaponSelector::new(1).unwrap();
    selector.equip(weapon("w1"), None).unwrap();
    assert!(selector.trigger_primary(&Gates::GROUNDED).is_accepted());
    selector.drain_reports();

    selector.set_cooldowns_enabled(false);
    let reports = selector.drain_reports();
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(CooldownReport::is_cleared));
    assert!(selector.current_primary().is_ready());

    assert!(selector.trigger_primary(&Gates::GROUNDED).is_accepted());
    assert!(selector.trigger_primary(&Gates::GROUNDED).is_accepted());
    assert!(selector.drain_reports().is_empty());

    // Новое оружие тоже без cooldown'ов
    selector.unequip(0).unwrap();
    selector.equip(weapon("w2"), None).unwrap();
    assert!(selector.trigger_primary(&Gates::GROUNDED).is_accepted());
    assert!(selector.current_primary().is_ready());
}

#[test]
fn test_save_load_skips_unknown_weapon() {
    let catalog = catalog_with(&["w1", "w3"]);
    let mut selector = WeaponSelector::new(3).unwrap();
    selector.equip(catalog.lookup(&"w1".into()).unwrap(), None).unwrap();
    selector.equip(catalog.lookup(&"w3".into()).unwrap(), Some(2)).unwrap();

    let record = selector.save();
    assert_eq!(
        record.slots,
        vec![
            crate::save::SlotPayload::Weapon("w1".into()),
            crate::save::SlotPayload::Empty,
            crate::save::SlotPayload::Weapon("w3".into()),
        ]
    );

    let partial = catalog_with(&["w1"]);
    let mut restored = WeaponSelector::new(3).unwrap();
    restored.equip(weapon("junk"), Some(1)).unwrap();

    let report = restored.load(&record, &partial).unwrap();
    assert!(!report.is_clean());
    assert!(matches!(
        &report.skipped[..],
        [LoadError::UnresolvableWeaponKey { index: 2, .. }]
    ));

    assert_eq!(restored.weapon_at(0).map(|w| w.key().0.as_str()), Some("w1"));
    assert!(restored.weapon_at(1).is_none());
    assert!(restored.weapon_at(2).is_none());
    assert_eq!(restored.table().free_index(), Some(1));
    assert!(restored.is_data_loaded());
}

#[test]
fn test_load_json_malformed_keeps_table() {
    let catalog = catalog_with(&["w1"]);
    let mut selector = WeaponSelector::new(2).unwrap();
    selector.equip(weapon("w1"), None).unwrap();

    assert!(matches!(
        selector.load_json("not json", &catalog),
        Err(LoadError::Malformed(_))
    ));
    assert!(selector.weapon_at(0).is_some());
    assert!(!selector.is_data_loaded());
}

#[test]
fn test_load_resets_action_states() {
    let catalog = catalog_with(&["w1"]);
    let mut selector = WeaponSelector::new(2).unwrap();
    selector.equip(catalog.lookup(&"w1".into()).unwrap(), None).unwrap();
    assert!(selector.trigger_primary(&Gates::GROUNDED).is_accepted());

    let record = selector.save();
    let report = selector.load(&record, &catalog).unwrap();
    assert!(report.is_clean());
    assert!(selector.current_primary().is_ready());
}

#[test]
fn test_default_loadout_skipped_after_load() {
    let catalog = catalog_with(&["w1", "w2"]);
    let mut selector = WeaponSelector::new(3).unwrap();
    selector.load_json(r#"{"slots":[null,null,"w2"]}"#, &catalog).unwrap();

    selector.apply_default_loadout(&["w1".into()], &catalog);
    assert!(selector.weapon_at(0).is_none());
    assert_eq!(selector.table().free_index(), Some(0));
}

#[test]
fn test_from_config_applies_default_loadout() {
    let catalog = WeaponDatabase::default();
    let config = crate::config::ArmoryConfig {
        slot_count: 2,
        default_loadout: vec!["magic_missile".into(), "unknown".into(), "wind_staff".into(), "flamethrower".into()],
        ..Default::default()
    };

    let selector = WeaponSelector::from_config(&config, &catalog).unwrap();
    assert_eq!(selector.weapon_at(0).unwrap().key().0, "magic_missile");
    assert_eq!(selector.weapon_at(1).unwrap().key().0, "wind_staff");
    assert!(selector.table().is_full());
}

#[test]
fn test_timed_window_after_long_session() {
    let mut selector = WeaponSelector::new(1).unwrap();
    selector.equip(WeaponRecord::from(crate::catalog::WeaponDefinition::electric_gauntlet()), None).unwrap();

    // ~150 часов при 60 Hz
    selector.advance(540_000.0);
    assert_eq!(selector.now(), 540_000.0);

    assert!(selector.trigger_secondary(&Gates::GROUNDED).is_accepted());

    let mut closed_after = None;
    for tick in 1..=400 {
        if !selector.advance(1.0 / 60.0).is_empty() {
            closed_after = Some(tick);
            break;
        }
    }

    let ticks = closed_after.unwrap();
    assert!((180..=181).contains(&ticks), "window closed after {} ticks", ticks);
    assert!(selector.now() >= 540_002.9);

    // Окно закрыто → cooldown 6s, retrigger больше не WindowActive
    assert_eq!(selector.trigger_secondary(&Gates::GROUNDED), TriggerOutcome::NotReady);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "out of range")]
fn test_out_of_range_index_panics_in_debug() {
    let mut selector = WeaponSelector::new(2).unwrap();
    let _ = selector.select_slot(2);
}

#[test]
fn test_outbox_keeps_latest_report_per_role() {
    let mut selector = WeaponSelector::new(1).unwrap();
    selector.equip(weapon("w1"), None).unwrap();
    assert!(selector.trigger_primary(&Gates::GROUNDED).is_accepted());
    assert!(selector.trigger_secondary(&Gates::GROUNDED).is_accepted());

    // Host ни разу не сливает outbox
    for _ in 0..1000 {
        selector.advance(0.001);
    }

    let reports = selector.drain_reports();
    assert_eq!(reports.len(), 2);

    let primary = reports.iter().find(|r| r.role == SlotRole::Primary).unwrap();
    assert!((primary.remaining - 1.0).abs() < 1e-3);
    let secondary = reports.iter().find(|r| r.role == SlotRole::Secondary).unwrap();
    assert!(secondary.remaining.abs() < 1e-3);
}
