//! Armory configuration
//!
//! Hardcoded defaults (как `Time::<Fixed>::from_hz(60.0)` в SimulationPlugin),
//! переопределяются из JSON.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::WeaponKey;
use crate::error::ConfigError;
use crate::slots::MAX_SLOTS;

/// Session configuration (Bevy resource)
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmoryConfig {
    /// Hotbar size (1..=9, по числу цифровых хоткеев)
    pub slot_count: usize,
    /// Fixed simulation rate
    pub tick_hz: f64,
    pub cooldowns_enabled: bool,
    /// Equipped at session start if no save data was loaded
    pub default_loadout: Vec<WeaponKey>,
    /// Out-of-range slot index → panic в debug builds
    pub strict_indices: bool,
}

impl Default for ArmoryConfig {
    fn default() -> Self {
        Self {
            slot_count: 4,
            tick_hz: 60.0,
            cooldowns_enabled: true,
            default_loadout: vec!["magic_missile".into()],
            strict_indices: true,
        }
    }
}

impl ArmoryConfig {
    /// Parse + validate
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slot_count == 0 || self.slot_count > MAX_SLOTS {
            return Err(ConfigError::InvalidSlotCount(self.slot_count));
        }

        if !(self.tick_hz > 0.0) {
            return Err(ConfigError::InvalidTickRate(self.tick_hz));
        }

        Ok(())
    }

    /// Fixed timestep (секунды)
    pub fn tick_delta(&self) -> f32 {
        (1.0 / self.tick_hz) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ArmoryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.slot_count, 4);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ArmoryConfig::from_json(r#"{ "slot_count": 9, "default_loadout": [] }"#).unwrap();
        assert_eq!(config.slot_count, 9);
        assert_eq!(config.tick_hz, 60.0);
        assert!(config.cooldowns_enabled);
        assert!(config.default_loadout.is_empty());
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            ArmoryConfig::from_json(r#"{ "slot_count": 12 }"#),
            Err(ConfigError::InvalidSlotCount(12))
        ));
        assert!(matches!(
            ArmoryConfig::from_json(r#"{ "tick_hz": 0.0 }"#),
            Err(ConfigError::InvalidTickRate(_))
        ));
        assert!(matches!(
            ArmoryConfig::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }
}
