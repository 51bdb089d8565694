//! Units: buildings, ships, bombs and intel assets placed on the map

use serde::{Deserialize, Serialize};

use crate::core::types::{PlayerId, TileRef, UnitId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UnitType {
    DefensePost,
    SamLauncher,
    Spy,
    Satellite,
    Warship,
    MissileSilo,
    City,
    Port,
    Factory,
    TrainStation,
    TransportShip,
    AtomBomb,
    HydrogenBomb,
}

impl UnitType {
    /// Military infrastructure that intel gathering reveals
    pub fn is_defense_relevant(self) -> bool {
        matches!(
            self,
            UnitType::DefensePost | UnitType::SamLauncher | UnitType::MissileSilo
        )
    }

    /// Units that let their owner gather intel on other players
    pub fn is_intel_unit(self) -> bool {
        matches!(self, UnitType::Spy | UnitType::Satellite)
    }

    pub fn is_nuke(self) -> bool {
        matches!(self, UnitType::AtomBomb | UnitType::HydrogenBomb)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub unit_type: UnitType,
    pub owner: PlayerId,
    pub tile: TileRef,
    pub level: u32,
    active: bool,
    /// Claimed by a long-running execution that drives this unit
    #[serde(default)]
    bound: bool,
}

impl Unit {
    pub fn new(id: UnitId, unit_type: UnitType, owner: PlayerId, tile: TileRef) -> Self {
        Self {
            id,
            unit_type,
            owner,
            tile,
            level: 1,
            active: true,
            bound: false,
        }
    }

    /// False once the unit has been destroyed
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
    }

    /// Claim the unit for one driver; false if another already holds it
    pub(crate) fn bind(&mut self) -> bool {
        !std::mem::replace(&mut self.bound, true)
    }
}
