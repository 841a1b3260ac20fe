//! Weapon catalog - статические определения оружия
//!
//! # Архитектура
//!
//! **WeaponDefinition** - immutable blueprint (key + name + две способности):
//! - Хранится в `WeaponDatabase` resource (HashMap lookup)
//! - Создаются hardcoded в `WeaponDatabase::default()` или из JSON
//!
//! **WeaponRecord** - то, что лежит в слоте:
//! - `WeaponKey` + `Arc` на definition (catalog shared read-only между сессиями)
//! - Сравнивается по key
//!
//! # Пример использования
//!
//! ```rust
//! use armory_simulation::catalog::{WeaponCatalog, WeaponDatabase};
//!
//! let catalog = WeaponDatabase::default();
//! let missile = catalog.lookup(&"magic_missile".into()).unwrap();
//! assert_eq!(missile.definition().name, "Magic Missile");
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::action::ActionConfig;

// ============================================================================
// WeaponKey
// ============================================================================

/// Weapon identifier (unique string ID, persisted in saves)
///
/// # Examples
/// - "magic_missile"
/// - "wind_staff"
/// - "electric_gauntlet"
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeaponKey(pub String);

impl From<&str> for WeaponKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for WeaponKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// WeaponDefinition
// ============================================================================

/// Cooldown meter tint (linear RGBA)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CooldownColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl CooldownColor {
    pub const WHITE: CooldownColor = CooldownColor::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

impl Default for CooldownColor {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Static weapon definition (blueprint)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaponDefinition {
    pub key: WeaponKey,
    /// Отображаемое название
    pub name: String,
    #[serde(default)]
    pub cooldown_color: CooldownColor,
    pub primary: ActionConfig,
    pub secondary: ActionConfig,
}

impl WeaponDefinition {
    /// Magic missile: projectile shot + barrier toggle
    pub fn magic_missile() -> Self {
        Self {
            key: "magic_missile".into(),
            name: "Magic Missile".to_string(),
            cooldown_color: CooldownColor::rgb(0.55, 0.35, 1.0),
            primary: ActionConfig::shot(0.6),
            secondary: ActionConfig::toggle(4.0, 1.0),
        }
    }

    /// Wind staff: shot + instant wind burst (usable in air)
    pub fn wind_staff() -> Self {
        Self {
            key: "wind_staff".into(),
            name: "Wind Staff".to_string(),
            cooldown_color: CooldownColor::rgb(0.6, 0.95, 0.85),
            primary: ActionConfig::shot(0.8),
            secondary: ActionConfig::instant(2.5),
        }
    }

    /// Electric gauntlet: shot + overdrive (cooldown после окончания эффекта)
    pub fn electric_gauntlet() -> Self {
        Self {
            key: "electric_gauntlet".into(),
            name: "Electric Gauntlet".to_string(),
            cooldown_color: CooldownColor::rgb(1.0, 0.9, 0.2),
            primary: ActionConfig::shot(0.4),
            secondary: ActionConfig::sustained(3.0, 6.0),
        }
    }

    /// Flamethrower: continuous stream while the window is open, grounded only
    pub fn flamethrower() -> Self {
        Self {
            key: "flamethrower".into(),
            name: "Flamethrower".to_string(),
            cooldown_color: CooldownColor::rgb(1.0, 0.45, 0.1),
            primary: ActionConfig::sustained(1.5, 2.0).grounded(),
            secondary: ActionConfig::instant(1.0),
        }
    }
}

// ============================================================================
// WeaponRecord
// ============================================================================

/// Slot occupant: key + shared definition
#[derive(Clone, Debug)]
pub struct WeaponRecord {
    definition: Arc<WeaponDefinition>,
}

impl WeaponRecord {
    pub fn new(definition: Arc<WeaponDefinition>) -> Self {
        Self { definition }
    }

    pub fn key(&self) -> &WeaponKey {
        &self.definition.key
    }

    pub fn definition(&self) -> &WeaponDefinition {
        &self.definition
    }
}

impl PartialEq for WeaponRecord {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for WeaponRecord {}

impl From<WeaponDefinition> for WeaponRecord {
    fn from(definition: WeaponDefinition) -> Self {
        Self::new(Arc::new(definition))
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Read-only weapon lookup
pub trait WeaponCatalog {
    fn lookup(&self, key: &WeaponKey) -> Option<WeaponRecord>;
}

/// HashMap-backed catalog (Bevy resource)
#[derive(Resource, Clone, Debug)]
pub struct WeaponDatabase {
    definitions: HashMap<WeaponKey, Arc<WeaponDefinition>>,
}

impl Default for WeaponDatabase {
    fn default() -> Self {
        let mut db = Self::empty();
        db.insert(WeaponDefinition::magic_missile());
        db.insert(WeaponDefinition::wind_staff());
        db.insert(WeaponDefinition::electric_gauntlet());
        db.insert(WeaponDefinition::flamethrower());
        db
    }
}

impl WeaponDatabase {
    pub fn empty() -> Self {
        Self {
            definitions: HashMap::new(),
        }
    }

    /// Parse a JSON array of definitions
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let definitions: Vec<WeaponDefinition> = serde_json::from_str(json)?;
        let mut db = Self::empty();
        for definition in definitions {
            db.insert(definition);
        }
        Ok(db)
    }

    /// Insert (или заменить) definition
    pub fn insert(&mut self, definition: WeaponDefinition) {
        self.definitions
            .insert(definition.key.clone(), Arc::new(definition));
    }

    pub fn remove(&mut self, key: &WeaponKey) -> bool {
        self.definitions.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Keys in stable order
    pub fn keys(&self) -> Vec<WeaponKey> {
        let mut keys: Vec<_> = self.definitions.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl WeaponCatalog for WeaponDatabase {
    fn lookup(&self, key: &WeaponKey) -> Option<WeaponRecord> {
        self.definitions.get(key).cloned().map(WeaponRecord::new)
    }
}
