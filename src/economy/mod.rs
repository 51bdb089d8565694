//! Population, troops and gold

mod gold;
mod population;
mod system;

pub use gold::gold_addition;
pub use population::{max_population, population_growth, troop_adjustment};
pub use system::{city_levels, update_player_economy, EconomyTick};
