//! WeaponSelector - façade над slot table + per-slot action state
//!
//! # Архитектура
//!
//! - `WeaponSlotTable` - занятость слотов, cursor, free index
//! - `actions[i]` - пара (primary, secondary) для СЛОТА `i`, не для курсора.
//!   Переключение слота не трогает cooldown'ы других слотов
//! - cursor решает только что показывать/триггерить
//! - `clock` - session time, двигается только через `advance`
//!
//! **UI flow:** каждое изменение отображаемого слота (trigger, tick, select)
//! кладёт `CooldownReport` в outbox → caller сливает его в `CooldownSink`.
//! В outbox не больше одного report'а на role: новый заменяет старый, так что
//! host, который редко сливает outbox, видит только последнее состояние meter'а.

use crate::action::{
    ActionConfig, ActionEvent, ActionState, GateConditions, GateFailure, TriggerOutcome,
};
use crate::catalog::{WeaponCatalog, WeaponDefinition, WeaponKey, WeaponRecord};
use crate::config::ArmoryConfig;
use crate::error::{LoadError, SlotError};
use crate::logger::{log, log_error, log_info, log_warning};
use crate::save::{self, SaveRecord};
use crate::slots::WeaponSlotTable;

pub mod report;

#[cfg(test)]
mod selector_tests;

pub use report::*;

// ============================================================================
// ActionPair
// ============================================================================

/// Primary + secondary action state of one slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionPair {
    pub primary: ActionState,
    pub secondary: ActionState,
}

impl ActionPair {
    pub fn get(&self, role: SlotRole) -> &ActionState {
        match role {
            SlotRole::Primary => &self.primary,
            SlotRole::Secondary => &self.secondary,
        }
    }

    pub fn get_mut(&mut self, role: SlotRole) -> &mut ActionState {
        match role {
            SlotRole::Primary => &mut self.primary,
            SlotRole::Secondary => &mut self.secondary,
        }
    }

    /// Reset both states to Ready with the weapon's configs (or idle)
    fn reset(&mut self, weapon: Option<&WeaponDefinition>) {
        match weapon {
            Some(def) => {
                self.primary.reset(def.primary.clone());
                self.secondary.reset(def.secondary.clone());
            }
            None => {
                self.primary.reset(ActionConfig::idle());
                self.secondary.reset(ActionConfig::idle());
            }
        }
    }
}

/// Window expiry observed during `advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionFinished {
    pub slot: usize,
    pub role: SlotRole,
    pub window_id: u64,
}

/// Result of `load`: entries skipped without aborting
#[derive(Debug, Default)]
pub struct LoadReport {
    pub skipped: Vec<LoadError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

// ============================================================================
// WeaponSelector
// ============================================================================

#[derive(Debug, Clone)]
pub struct WeaponSelector {
    table: WeaponSlotTable,
    actions: Vec<ActionPair>,
    /// Session time (секунды)
    clock: f64,
    cooldowns_enabled: bool,
    data_loaded: bool,
    /// Out-of-range индекс = нарушение контракта caller'а → panic в debug
    strict_indices: bool,
    outbox: Vec<CooldownReport>,
}

impl WeaponSelector {
    pub fn new(slot_count: usize) -> Result<Self, SlotError> {
        let table = WeaponSlotTable::new(slot_count)?;
        Ok(Self {
            actions: vec![ActionPair::default(); table.len()],
            table,
            clock: 0.0,
            cooldowns_enabled: true,
            data_loaded: false,
            strict_indices: true,
            outbox: Vec::new(),
        })
    }

    /// Selector for a fresh session: slot count + cooldown flag from config,
    /// default loadout equipped (no save data yet)
    pub fn from_config(config: &ArmoryConfig, catalog: &dyn WeaponCatalog) -> Result<Self, SlotError> {
        let mut selector = Self::new(config.slot_count)?;
        selector.set_strict_indices(config.strict_indices);
        selector.set_cooldowns_enabled(config.cooldowns_enabled);
        selector.apply_default_loadout(&config.default_loadout, catalog);
        selector.outbox.clear();
        Ok(selector)
    }

    /// `false` → out-of-range индексы только логируются и возвращаются
    /// (fuzz/soak прогоны шлют их намеренно)
    pub fn set_strict_indices(&mut self, strict: bool) {
        self.strict_indices = strict;
    }

    // === Accessors ===

    pub fn table(&self) -> &WeaponSlotTable {
        &self.table
    }

    pub fn slot_count(&self) -> usize {
        self.table.len()
    }

    pub fn cursor(&self) -> usize {
        self.table.cursor()
    }

    pub fn now(&self) -> f64 {
        self.clock
    }

    pub fn current_weapon(&self) -> Option<&WeaponRecord> {
        self.table.current()
    }

    pub fn weapon_at(&self, index: usize) -> Option<&WeaponRecord> {
        self.table.get(index)
    }

    pub fn actions_at(&self, index: usize) -> Option<&ActionPair> {
        self.actions.get(index)
    }

    pub fn current_primary(&self) -> &ActionState {
        &self.actions[self.table.cursor()].primary
    }

    pub fn current_secondary(&self) -> &ActionState {
        &self.actions[self.table.cursor()].secondary
    }

    pub fn cooldowns_enabled(&self) -> bool {
        self.cooldowns_enabled
    }

    pub fn is_data_loaded(&self) -> bool {
        self.data_loaded
    }

    // === Slots ===

    /// Equip into `preferred_index` if that slot is empty, otherwise into
    /// the lowest free slot. Returns the filled index.
    pub fn equip(&mut self, record: WeaponRecord, preferred_index: Option<usize>) -> Result<usize, SlotError> {
        let key = record.key().clone();

        let result = match preferred_index {
            Some(index) if index >= self.table.len() => Err(SlotError::IndexOutOfRange {
                index,
                len: self.table.len(),
            }),
            Some(index) if self.table.is_slot_empty(index) => self.table.place(index, record),
            _ => self.table.add(record),
        };

        let change = match result {
            Ok(change) => change,
            Err(err) => {
                self.log_slot_error(&err, &format!("equip '{}'", key));
                return Err(err);
            }
        };

        self.actions[change.index].reset(self.table.get(change.index).map(WeaponRecord::definition));
        log(&format!("Equipped '{}' to slot {}", key, change.index));

        if change.current_changed {
            self.report_current();
        }

        Ok(change.index)
    }

    /// Remove the weapon from `index` (no-op on an empty slot) and reset that
    /// slot's actions to idle
    pub fn unequip(&mut self, index: usize) -> Result<(), SlotError> {
        let change = self.table.remove(index).inspect_err(|err| {
            self.log_slot_error(err, "unequip");
        })?;

        let Some(previous) = change.previous else {
            return Ok(());
        };

        self.actions[index].reset(None);
        log(&format!("Unequipped '{}' from slot {}", previous.key(), index));

        if change.current_changed {
            self.report_current();
        }

        Ok(())
    }

    pub fn select_slot(&mut self, index: usize) -> Result<(), SlotError> {
        let change = self.table.select(index).inspect_err(|err| {
            self.log_slot_error(err, "select");
        })?;

        if change.current_changed {
            self.report_current();
        }

        Ok(())
    }

    pub fn cycle_slot(&mut self, delta: i32) {
        if self.table.cycle(delta).current_changed {
            self.report_current();
        }
    }

    // === Actions ===

    pub fn trigger_primary(&mut self, gates: &dyn GateConditions) -> TriggerOutcome {
        self.trigger(SlotRole::Primary, gates)
    }

    pub fn trigger_secondary(&mut self, gates: &dyn GateConditions) -> TriggerOutcome {
        self.trigger(SlotRole::Secondary, gates)
    }

    /// Trigger an action of the selected slot at the session clock
    pub fn trigger(&mut self, role: SlotRole, gates: &dyn GateConditions) -> TriggerOutcome {
        if self.table.current().is_none() {
            return TriggerOutcome::GateFailed(GateFailure::NoWeapon);
        }

        let cursor = self.table.cursor();
        let outcome = self.actions[cursor].get_mut(role).try_trigger(self.clock, gates);

        if outcome.is_accepted() {
            self.report_role(role);
        }

        outcome
    }

    /// Advance the session clock and every slot's actions.
    /// All timers move before any trigger of the same tick is evaluated.
    pub fn advance(&mut self, delta: f32) -> Vec<ActionFinished> {
        self.clock += f64::from(delta);

        let cursor = self.table.cursor();
        let mut finished = Vec::new();
        let mut displayed_changed = [false; 2];

        for (slot, pair) in self.actions.iter_mut().enumerate() {
            for (i, role) in SlotRole::ALL.into_iter().enumerate() {
                let state = pair.get_mut(role);
                let was_cooling = !state.is_ready();

                if let Some(ActionEvent::WindowClosed { window_id }) = state.advance(delta) {
                    finished.push(ActionFinished { slot, role, window_id });
                    if slot == cursor {
                        displayed_changed[i] = true;
                    }
                }

                if slot == cursor && was_cooling {
                    displayed_changed[i] = true;
                }
            }
        }

        for (i, role) in SlotRole::ALL.into_iter().enumerate() {
            if displayed_changed[i] {
                self.report_role(role);
            }
        }

        finished
    }

    // === Cooldown meters ===

    /// Disabling clears every cooldown and resets both meters
    pub fn set_cooldowns_enabled(&mut self, enabled: bool) {
        self.cooldowns_enabled = enabled;
        for pair in &mut self.actions {
            pair.primary.set_cooldowns_enabled(enabled);
            pair.secondary.set_cooldowns_enabled(enabled);
        }

        if !enabled {
            self.reset_cooldown_meters();
        }
        log_info(&format!("Cooldowns {}", if enabled { "enabled" } else { "disabled" }));
    }

    /// Queue "draw nothing" reports for both meters
    pub fn reset_cooldown_meters(&mut self) {
        for role in SlotRole::ALL {
            self.queue_report(CooldownReport::cleared(role));
        }
    }

    /// Latest report per role wins
    fn queue_report(&mut self, report: CooldownReport) {
        self.outbox.retain(|queued| queued.role != report.role);
        self.outbox.push(report);
    }

    pub fn drain_reports(&mut self) -> Vec<CooldownReport> {
        std::mem::take(&mut self.outbox)
    }

    pub fn flush_reports(&mut self, sink: &mut dyn CooldownSink) {
        for report in self.outbox.drain(..) {
            sink.report_cooldown(report);
        }
    }

    fn report_current(&mut self) {
        if self.table.current().is_none() {
            self.reset_cooldown_meters();
            return;
        }

        for role in SlotRole::ALL {
            self.report_role(role);
        }
    }

    fn report_role(&mut self, role: SlotRole) {
        if !self.cooldowns_enabled {
            return;
        }

        let Some(weapon) = self.table.current() else {
            return;
        };

        let state = self.actions[self.table.cursor()].get(role);
        let report = CooldownReport {
            role,
            color: weapon.definition().cooldown_color,
            normalized: state.cooldown().normalized_progress(),
            remaining: state.cooldown().remaining(),
        };
        self.queue_report(report);
    }

    // === Persistence ===

    pub fn save(&self) -> SaveRecord {
        save::encode(&self.table)
    }

    /// Replace slot contents with `record`.
    ///
    /// Existing slots are cleared first (no partial merge). Unresolvable
    /// entries are skipped and listed in the report; the cursor is kept.
    pub fn load(&mut self, record: &SaveRecord, catalog: &dyn WeaponCatalog) -> Result<LoadReport, LoadError> {
        let skipped = save::decode_into(record, catalog, &mut self.table);

        for (index, pair) in self.actions.iter_mut().enumerate() {
            pair.reset(self.table.get(index).map(WeaponRecord::definition));
        }

        self.data_loaded = true;
        log_info(&format!(
            "Loaded {} weapon(s) into {} slots ({} skipped)",
            self.table.iter().flatten().count(),
            self.table.len(),
            skipped.len()
        ));

        self.report_current();
        Ok(LoadReport { skipped })
    }

    /// Parse + load. Malformed JSON aborts before the table is touched.
    pub fn load_json(&mut self, json: &str, catalog: &dyn WeaponCatalog) -> Result<LoadReport, LoadError> {
        let record = SaveRecord::from_json(json)?;
        self.load(&record, catalog)
    }

    /// Equip `keys` via auto placement unless save data was loaded
    pub fn apply_default_loadout(&mut self, keys: &[WeaponKey], catalog: &dyn WeaponCatalog) {
        if self.data_loaded {
            return;
        }

        for key in keys {
            let Some(record) = catalog.lookup(key) else {
                log_warning(&format!("Default weapon '{}' not in catalog", key));
                continue;
            };

            if self.equip(record, None).is_err() {
                break;
            }
        }

        log("Default weapons loaded");
    }

    fn log_slot_error(&self, err: &SlotError, context: &str) {
        match err {
            SlotError::NoFreeSlot => log_warning(&format!("{}: {}", context, err)),
            SlotError::IndexOutOfRange { .. } => {
                log_error(&format!("{}: {}", context, err));
                debug_assert!(!self.strict_indices, "{}: {}", context, err);
            }
            _ => log_error(&format!("{}: {}", context, err)),
        }
    }
}
