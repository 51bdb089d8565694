pub mod config;
pub mod error;
pub mod rng;
pub mod types;

pub use config::{Difficulty, GameType, RuleConfig, UnitInfo};
pub use error::{Result, SimError};
pub use rng::PseudoRandom;
pub use types::{Gold, Owner, PlayerId, Tick, TileRef, UnitId};
