//! Save codec - slot table ⇄ `SaveRecord`
//!
//! # Формат
//!
//! ```json
//! { "slots": ["magic_missile", null, "wind_staff"] }
//! ```
//!
//! - `null` = явно пустой слот
//! - запись отсутствует (массив короче N) = "не загружено" → слот остаётся пустым,
//!   т.к. load всегда сначала очищает таблицу
//! - `free_index` НЕ сериализуется - пересчитывается после decode

use serde::{Deserialize, Serialize};

use crate::catalog::{WeaponCatalog, WeaponKey};
use crate::error::{LoadError, SlotError};
use crate::logger::log_warning;
use crate::slots::WeaponSlotTable;

// ============================================================================
// SaveRecord
// ============================================================================

/// One slot in the save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<WeaponKey>", into = "Option<WeaponKey>")]
pub enum SlotPayload {
    Empty,
    Weapon(WeaponKey),
}

impl From<Option<WeaponKey>> for SlotPayload {
    fn from(value: Option<WeaponKey>) -> Self {
        match value {
            Some(key) => SlotPayload::Weapon(key),
            None => SlotPayload::Empty,
        }
    }
}

impl From<SlotPayload> for Option<WeaponKey> {
    fn from(value: SlotPayload) -> Self {
        match value {
            SlotPayload::Weapon(key) => Some(key),
            SlotPayload::Empty => None,
        }
    }
}

/// Disposable transfer object (persistence only)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SaveRecord {
    pub slots: Vec<SlotPayload>,
}

impl SaveRecord {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }
}

// ============================================================================
// Codec
// ============================================================================

/// Decoded table + entries that were skipped
#[derive(Debug)]
pub struct Decoded {
    pub table: WeaponSlotTable,
    pub skipped: Vec<LoadError>,
}

/// One payload per slot index, `Empty` for empty slots
pub fn encode(table: &WeaponSlotTable) -> SaveRecord {
    SaveRecord {
        slots: table
            .iter()
            .map(|slot| match slot {
                Some(record) => SlotPayload::Weapon(record.key().clone()),
                None => SlotPayload::Empty,
            })
            .collect(),
    }
}

/// Decode into a fresh table of `slot_count` slots
pub fn decode(
    record: &SaveRecord,
    catalog: &dyn WeaponCatalog,
    slot_count: usize,
) -> Result<Decoded, SlotError> {
    let mut table = WeaponSlotTable::new(slot_count)?;
    let skipped = decode_into(record, catalog, &mut table);
    Ok(Decoded { table, skipped })
}

/// Clear `table` and fill it from `record`.
///
/// Unresolvable keys are skipped and logged (the rest of the save still
/// loads); entries beyond the table length are skipped too.
pub fn decode_into(
    record: &SaveRecord,
    catalog: &dyn WeaponCatalog,
    table: &mut WeaponSlotTable,
) -> Vec<LoadError> {
    table.clear();

    let mut skipped = Vec::new();
    for (index, payload) in record.slots.iter().enumerate() {
        let SlotPayload::Weapon(key) = payload else {
            continue;
        };

        if index >= table.len() {
            log_warning(&format!(
                "Save slot {} ('{}') dropped: only {} slots",
                index,
                key,
                table.len()
            ));
            skipped.push(LoadError::SlotOutOfRange {
                index,
                len: table.len(),
            });
            continue;
        }

        let Some(weapon) = catalog.lookup(key) else {
            log_warning(&format!("Save slot {}: unknown weapon '{}', slot left empty", index, key));
            skipped.push(LoadError::UnresolvableWeaponKey {
                index,
                key: key.clone(),
            });
            continue;
        };

        // Таблица только что очищена, индекс проверен выше
        if let Err(err) = table.place(index, weapon) {
            log_warning(&format!("Save slot {}: {}", index, err));
        }
    }

    skipped
}
