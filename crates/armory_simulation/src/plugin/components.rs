//! Arsenal components

use bevy::prelude::*;

use crate::action::GateConditions;
use crate::catalog::WeaponCatalog;
use crate::config::ArmoryConfig;
use crate::error::SlotError;
use crate::selector::WeaponSelector;

/// Player weapon hotbar (one selector per player)
#[derive(Component, Debug, Clone)]
pub struct Arsenal {
    pub selector: WeaponSelector,
}

impl Arsenal {
    pub fn new(selector: WeaponSelector) -> Self {
        Self { selector }
    }

    /// Fresh session: slot count + default loadout из config
    pub fn from_config(config: &ArmoryConfig, catalog: &dyn WeaponCatalog) -> Result<Self, SlotError> {
        Ok(Self::new(WeaponSelector::from_config(config, catalog)?))
    }
}

/// Ground contact (обновляется physics/movement слоем хоста)
///
/// Entity без `Grounded` считается стоящим на земле.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grounded(pub bool);

impl Default for Grounded {
    fn default() -> Self {
        Self(true)
    }
}

impl GateConditions for Grounded {
    fn is_grounded(&self) -> bool {
        self.0
    }
}

/// Spawn a player arsenal (default loadout из config, стоит на земле)
pub fn spawn_arsenal(
    commands: &mut Commands,
    config: &ArmoryConfig,
    catalog: &dyn WeaponCatalog,
) -> Result<Entity, SlotError> {
    let arsenal = Arsenal::from_config(config, catalog)?;
    Ok(commands.spawn((arsenal, Grounded::default())).id())
}
