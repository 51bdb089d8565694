//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Game tick counter (simulation time unit, nominally 100ms)
pub type Tick = u64;

/// Gold is kept as an exact integer so accrual and cost comparisons never drift
pub type Gold = u64;

/// Opaque handle for a single map cell
///
/// For a map of width `w`, the tile at `(x, y)` is `y * w + x`. Only the map
/// that produced a `TileRef` can interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileRef(pub u32);

impl TileRef {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile#{}", self.0)
    }
}

/// Unique identifier for a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

/// Unique identifier for a unit, assigned in creation order and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

/// Who holds a tile
///
/// Every tile has exactly one owner: a player or nobody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Owner {
    Player(PlayerId),
    TerraNullius,
}

impl Owner {
    pub fn player(self) -> Option<PlayerId> {
        match self {
            Owner::Player(id) => Some(id),
            Owner::TerraNullius => None,
        }
    }
}

impl From<PlayerId> for Owner {
    fn from(id: PlayerId) -> Self {
        Owner::Player(id)
    }
}
