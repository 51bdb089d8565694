//! Per-tick economy update for one player

use crate::core::config::RuleConfig;
use crate::core::error::Result;
use crate::core::types::{Gold, PlayerId};
use crate::economy::gold::gold_addition;
use crate::economy::population::{max_population, population_growth, troop_adjustment};
use crate::game::state::GameState;
use crate::game::unit::UnitType;

/// What one economy tick changed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EconomyTick {
    pub max_population: f64,
    pub population_delta: f64,
    pub gold_added: Gold,
    pub troop_delta: f64,
}

/// Summed level of every active city `player` owns
pub fn city_levels(game: &GameState, player: PlayerId) -> u32 {
    game.units_of(player)
        .filter(|u| u.unit_type == UnitType::City)
        .map(|u| u.level)
        .sum()
}

/// Grow population, pay out gold and move troops toward their target
pub fn update_player_economy(game: &mut GameState, config: &RuleConfig, id: PlayerId) -> Result<EconomyTick> {
    let cities = city_levels(game, id);
    let player = game.require_player_mut(id)?;

    let max = max_population(player, cities, config);
    let population_delta = population_growth(player, max, config);
    player.set_population(player.population() + population_delta);

    let gold_added = gold_addition(player, config);
    player.add_gold(gold_added);

    let troop_delta = troop_adjustment(player, max);
    player.add_troops(troop_delta);

    Ok(EconomyTick {
        max_population: max,
        population_delta,
        gold_added,
        troop_delta,
    })
}
