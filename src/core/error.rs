use thiserror::Error;

use crate::core::types::{PlayerId, TileRef, UnitId};
use crate::game::map::Terrain;

/// Fatal simulation errors
///
/// Gameplay conditions (missing targets, not enough gold) are never errors;
/// executions log and deactivate instead. Anything returned here means the
/// game state can no longer be trusted.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Execution {0} ticked before init")]
    NotInitialized(&'static str),

    #[error("Unsupported terrain {terrain:?} at {tile} reached combat resolution")]
    UnsupportedTerrain { tile: TileRef, terrain: Terrain },

    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    #[error("Tile out of bounds: {0}")]
    TileOutOfBounds(TileRef),

    #[error("Invalid map: {0}")]
    InvalidMap(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
