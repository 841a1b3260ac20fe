//! Weapon slot table (hotbar, hotkeys 1-9)
//!
//! # Архитектура
//!
//! - `slots`: фиксированное число слотов `N` (1..=9, по числу цифровых хоткеев)
//! - `cursor`: выбранный слот, всегда `< N`
//! - `free_index`: минимальный пустой слот (`None` = таблица полна)
//!
//! # Инварианты
//! - `free_index` либо `None`, либо указывает на пустой слот
//! - `free_index` - всегда МИНИМАЛЬНЫЙ пустой индекс
//! - `cursor` оборачивается по модулю `N` при cycle
//!
//! `free_index` пересчитывается полным линейным проходом после каждой
//! мутации (N <= 9).

use crate::catalog::WeaponRecord;
use crate::error::SlotError;


/// Hotbar upper bound (number keys 1-9)
pub const MAX_SLOTS: usize = 9;

/// Result of a slot mutation
///
/// `current_changed` сигнализирует caller'у что запись под курсором
/// изменилась (UI/ActionState должны обновиться).
#[derive(Debug, Clone, PartialEq)]
pub struct SlotChange {
    pub index: usize,
    pub current_changed: bool,
    /// Previous occupant (для remove)
    pub previous: Option<WeaponRecord>,
}

/// Fixed-size slot table
///
/// `==` сравнивает занятость (слоты + free index). Cursor - session state,
/// в save не попадает и в равенстве не участвует.
#[derive(Debug, Clone)]
pub struct WeaponSlotTable {
    slots: Vec<Option<WeaponRecord>>,
    cursor: usize,
    free_index: Option<usize>,
}

impl PartialEq for WeaponSlotTable {
    fn eq(&self, other: &Self) -> bool {
        self.slots == other.slots && self.free_index == other.free_index
    }
}

impl WeaponSlotTable {
    /// `N` empty slots, cursor on slot 0
    pub fn new(slot_count: usize) -> Result<Self, SlotError> {
        if slot_count == 0 || slot_count > MAX_SLOTS {
            return Err(SlotError::InvalidSlotCount(slot_count));
        }

        Ok(Self {
            slots: vec![None; slot_count],
            cursor: 0,
            free_index: Some(0),
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always `false`: a table has at least one slot
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn free_index(&self) -> Option<usize> {
        self.free_index
    }

    pub fn is_full(&self) -> bool {
        self.free_index.is_none()
    }

    pub fn get(&self, index: usize) -> Option<&WeaponRecord> {
        self.slots.get(index)?.as_ref()
    }

    pub fn is_slot_empty(&self, index: usize) -> bool {
        self.get(index).is_none()
    }

    /// Record under the cursor
    pub fn current(&self) -> Option<&WeaponRecord> {
        self.get(self.cursor)
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&WeaponRecord>> {
        self.slots.iter().map(Option::as_ref)
    }

    /// Auto placement into `free_index`
    pub fn add(&mut self, record: WeaponRecord) -> Result<SlotChange, SlotError> {
        let Some(index) = self.free_index else {
            return Err(SlotError::NoFreeSlot);
        };

        self.write(index, record);
        Ok(self.change(index, None))
    }

    /// Explicit placement into an empty slot
    pub fn place(&mut self, index: usize, record: WeaponRecord) -> Result<SlotChange, SlotError> {
        self.check_index(index)?;
        if !self.is_slot_empty(index) {
            return Err(SlotError::SlotOccupied { index });
        }

        self.write(index, record);
        Ok(self.change(index, None))
    }

    /// Clear a slot. Empty slot → no-op (`current_changed == false`).
    pub fn remove(&mut self, index: usize) -> Result<SlotChange, SlotError> {
        self.check_index(index)?;

        let Some(previous) = self.slots[index].take() else {
            return Ok(SlotChange {
                index,
                current_changed: false,
                previous: None,
            });
        };

        let old_free = self.free_index;
        self.recompute_free_index();
        debug_assert_eq!(
            self.free_index,
            Some(old_free.map_or(index, |free| free.min(index)))
        );

        Ok(self.change(index, Some(previous)))
    }

    /// Clear every slot (load path). Cursor is kept.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.recompute_free_index();
    }

    pub fn select(&mut self, index: usize) -> Result<SlotChange, SlotError> {
        self.check_index(index)?;

        let current_changed = self.cursor != index;
        self.cursor = index;
        Ok(SlotChange {
            index,
            current_changed,
            previous: None,
        })
    }

    /// `cursor = (cursor + delta) mod N`, always non-negative
    pub fn cycle(&mut self, delta: i32) -> SlotChange {
        let len = self.slots.len() as i64;
        let index = (self.cursor as i64 + delta as i64).rem_euclid(len) as usize;

        let current_changed = self.cursor != index;
        self.cursor = index;
        SlotChange {
            index,
            current_changed,
            previous: None,
        }
    }

    fn write(&mut self, index: usize, record: WeaponRecord) {
        self.slots[index] = Some(record);
        self.recompute_free_index();
    }

    fn change(&self, index: usize, previous: Option<WeaponRecord>) -> SlotChange {
        SlotChange {
            index,
            current_changed: index == self.cursor,
            previous,
        }
    }

    fn recompute_free_index(&mut self) {
        self.free_index = self.slots.iter().position(Option::is_none);
    }

    fn check_index(&self, index: usize) -> Result<(), SlotError> {
        if index < self.slots.len() {
            Ok(())
        } else {
            Err(SlotError::IndexOutOfRange {
                index,
                len: self.slots.len(),
            })
        }
    }
}
