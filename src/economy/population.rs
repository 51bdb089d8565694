//! Population ceiling, growth and troop mobilization

use crate::core::config::RuleConfig;
use crate::game::player::{Player, PlayerType};

/// Ceiling a player's population grows toward
///
/// `city_levels` is the summed level of every city the player owns.
pub fn max_population(player: &Player, city_levels: u32, config: &RuleConfig) -> f64 {
    if player.player_type == PlayerType::Human && config.infinite_troops {
        return config.infinite_population;
    }

    let tiles = player.tiles_owned() as f64;
    let base = 2.0 * (tiles.powf(0.6) * 1000.0 + 50_000.0)
        + f64::from(city_levels) * config.city_population_bonus;

    match player.player_type {
        PlayerType::Human => base,
        PlayerType::Bot => base / 2.0,
        PlayerType::FakeHuman => base * config.difficulty.max_population_multiplier(),
    }
}

/// Population change for one tick
///
/// Logistic growth toward `max`. The result never takes population above
/// `max`; a player already over the ceiling (after losing territory) is
/// brought back down to it.
pub fn population_growth(player: &Player, max: f64, config: &RuleConfig) -> f64 {
    let population = player.population();
    if max <= 0.0 {
        return -population;
    }

    let mut to_add = 10.0 + population.powf(0.73) / 4.0;
    to_add *= 1.0 - population / max;

    match player.player_type {
        PlayerType::Human => {}
        PlayerType::Bot => to_add *= 0.7,
        PlayerType::FakeHuman => to_add *= config.difficulty.growth_multiplier(),
    }

    (population + to_add).min(max) - population
}

/// Change in troops for one tick, moving toward `population * target_troop_ratio`
///
/// Small gaps close at once. Larger gaps move by `max / 1000` per tick when
/// mobilizing and five times that when demobilizing.
pub fn troop_adjustment(player: &Player, max: f64) -> f64 {
    let max_diff = max / 1000.0;
    let target = player.population() * player.target_troop_ratio;
    let diff = target - player.troops();
    if diff.abs() < max_diff {
        return diff;
    }
    let adjustment = max_diff * diff.signum();
    if adjustment < 0.0 {
        adjustment * 5.0
    } else {
        adjustment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Difficulty;
    use crate::core::types::PlayerId;
    use crate::game::player::PlayerInfo;
    use proptest::prelude::*;

    fn player(player_type: PlayerType, population: f64, troops: f64, tiles: u64) -> Player {
        let mut p = Player::new(PlayerId(1), PlayerInfo::new("P", player_type), population, troops, 0.5);
        for _ in 0..tiles {
            p.gain_tile();
        }
        p
    }

    #[test]
    fn test_max_population_base() {
        let config = RuleConfig::default();
        let p = player(PlayerType::Human, 0.0, 0.0, 0);
        assert_eq!(max_population(&p, 0, &config), 100_000.0);

        let p = player(PlayerType::Human, 0.0, 0.0, 1);
        assert_eq!(max_population(&p, 0, &config), 102_000.0);
        assert_eq!(max_population(&p, 2, &config), 602_000.0);
    }

    #[test]
    fn test_max_population_by_type() {
        let mut config = RuleConfig::default();
        let bot = player(PlayerType::Bot, 0.0, 0.0, 0);
        assert_eq!(max_population(&bot, 0, &config), 50_000.0);

        let ai = player(PlayerType::FakeHuman, 0.0, 0.0, 0);
        config.difficulty = Difficulty::Easy;
        assert_eq!(max_population(&ai, 0, &config), 50_000.0);
        config.difficulty = Difficulty::Impossible;
        assert_eq!(max_population(&ai, 0, &config), 200_000.0);
    }

    #[test]
    fn test_infinite_troops_only_for_humans() {
        let mut config = RuleConfig::default();
        config.infinite_troops = true;
        let human = player(PlayerType::Human, 0.0, 0.0, 0);
        let bot = player(PlayerType::Bot, 0.0, 0.0, 0);
        assert_eq!(max_population(&human, 0, &config), 1_000_000_000.0);
        assert_eq!(max_population(&bot, 0, &config), 50_000.0);
    }

    #[test]
    fn test_growth_from_zero() {
        let config = RuleConfig::default();
        let p = player(PlayerType::Human, 0.0, 0.0, 0);
        assert_eq!(population_growth(&p, 100_000.0, &config), 10.0);
        let bot = player(PlayerType::Bot, 0.0, 0.0, 0);
        assert!((population_growth(&bot, 100_000.0, &config) - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_growth_stops_at_ceiling() {
        let config = RuleConfig::default();
        let p = player(PlayerType::Human, 100_000.0, 0.0, 0);
        assert_eq!(population_growth(&p, 100_000.0, &config), 0.0);

        // Over the ceiling after losing land: pulled back to it
        let p = player(PlayerType::Human, 150_000.0, 0.0, 0);
        assert_eq!(population_growth(&p, 100_000.0, &config), -50_000.0);
    }

    #[test]
    fn test_troop_adjustment_small_gap_closes() {
        let p = player(PlayerType::Human, 1000.0, 495.0, 0);
        // target 500, max_diff 100
        assert_eq!(troop_adjustment(&p, 100_000.0), 5.0);
    }

    #[test]
    fn test_troop_adjustment_ramp_rates() {
        let up = player(PlayerType::Human, 100_000.0, 0.0, 0);
        assert_eq!(troop_adjustment(&up, 100_000.0), 100.0);

        let down = player(PlayerType::Human, 100_000.0, 100_000.0, 0);
        assert_eq!(troop_adjustment(&down, 100_000.0), -500.0);
    }

    proptest! {
        #[test]
        fn prop_growth_never_exceeds_max(
            population in 0.0f64..5e6,
            tiles in 0u64..5000,
            cities in 0u32..8,
            kind in 0usize..3,
        ) {
            let config = RuleConfig::default();
            let player_type = [PlayerType::Human, PlayerType::Bot, PlayerType::FakeHuman][kind];
            let p = player(player_type, population, 0.0, tiles);
            let max = max_population(&p, cities, &config);
            let grown = population + population_growth(&p, max, &config);
            prop_assert!(grown <= max + 1e-6);
            prop_assert!(grown >= 0.0);
        }
    }
}
