use serde::{Deserialize, Serialize};

use crate::core::types::{PlayerId, TileRef};
use crate::game::unit::UnitType;

/// One piece of revealed enemy infrastructure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntelAsset {
    pub tile: TileRef,
    pub unit_type: UnitType,
}

/// What a player knew about `target` at the moment of the last gather
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntelReport {
    pub target: PlayerId,
    pub assets: Vec<IntelAsset>,
}

impl IntelReport {
    pub fn new(target: PlayerId, assets: Vec<IntelAsset>) -> Self {
        Self { target, assets }
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn count_of(&self, unit_type: UnitType) -> usize {
        self.assets.iter().filter(|a| a.unit_type == unit_type).count()
    }
}
