//! Game state and entity model

pub mod map;
pub mod player;
pub mod state;
pub mod unit;

pub use map::{GameMap, Terrain};
pub use player::{Player, PlayerInfo, PlayerType};
pub use state::GameState;
pub use unit::{Unit, UnitType};
