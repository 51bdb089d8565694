//! Conquest resolution for a single contested tile
//!
//! Pure functions over the current game state. `attack_logic` decides what one
//! tile costs both sides and how much of the per-tick capture budget it uses;
//! `attack_tiles_per_tick` decides that budget.

use serde::{Deserialize, Serialize};

use crate::combat::constants::*;
use crate::core::config::RuleConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{Owner, PlayerId, TileRef};
use crate::game::map::Terrain;
use crate::game::player::{Player, PlayerType};
use crate::game::state::GameState;
use crate::game::unit::UnitType;

/// Cost of taking one tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackResult {
    pub attacker_troop_loss: f64,
    pub defender_troop_loss: f64,
    /// Portion of the attack's per-tick capture budget this tile consumes
    pub tiles_per_tick_used: f64,
}

/// Clamp that treats NaN (0/0 troop ratios) as the lower bound
fn within(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}

fn terrain_base(terrain: Terrain, tile: TileRef) -> Result<(f64, f64)> {
    match terrain {
        Terrain::Plains => Ok((PLAINS_MAGNITUDE, PLAINS_SPEED)),
        Terrain::Highland => Ok((HIGHLAND_MAGNITUDE, HIGHLAND_SPEED)),
        Terrain::Mountain => Ok((MOUNTAIN_MAGNITUDE, MOUNTAIN_SPEED)),
        Terrain::Lake | Terrain::Ocean => Err(SimError::UnsupportedTerrain { tile, terrain }),
    }
}

/// Loss and speed multipliers for very large attackers
fn large_attacker_factors(attacker: &Player) -> (f64, f64) {
    let owned = attacker.tiles_owned() as f64;
    let loss = if owned > LARGE_ATTACKER_LOSS_TILES {
        (LARGE_ATTACKER_LOSS_TILES / owned).sqrt()
    } else {
        1.0
    };
    let speed = if owned > LARGE_ATTACKER_SPEED_TILES {
        (LARGE_ATTACKER_SPEED_TILES / owned).powf(LARGE_ATTACKER_SPEED_EXPONENT)
    } else {
        1.0
    };
    (loss, speed)
}

/// Resolve the cost of `attacker` taking `tile` from `defender` with `attack_troops`
///
/// Water tiles never reach here in a consistent game; they are reported as
/// `SimError::UnsupportedTerrain`.
pub fn attack_logic(
    game: &GameState,
    config: &RuleConfig,
    attack_troops: f64,
    attacker: PlayerId,
    defender: Owner,
    tile: TileRef,
) -> Result<AttackResult> {
    let attacker = game.require_player(attacker)?;
    let defender = match defender {
        Owner::Player(id) => Some(game.require_player(id)?),
        Owner::TerraNullius => None,
    };

    let (mut mag, mut speed) = terrain_base(game.map().terrain(tile)?, tile)?;

    if let Some(defender) = defender {
        let covered = game
            .nearby_units(tile, config.defense_post_range, UnitType::DefensePost)
            .any(|post| post.owner == defender.id);
        if covered {
            mag *= config.defense_post_defense_bonus;
            speed *= config.defense_post_speed_bonus;
        }
    }

    if game.map().has_fallout(tile) {
        let modifier = config.fallout_defense_modifier(game.fallout_ratio());
        mag *= modifier;
        speed *= modifier;
    }

    if let Some(defender) = defender {
        let human_like = matches!(attacker.player_type, PlayerType::Human | PlayerType::FakeHuman);
        if human_like && defender.player_type == PlayerType::Bot {
            mag *= BOT_DEFENDER_MAGNITUDE;
        }
    }

    let (large_loss, large_speed) = large_attacker_factors(attacker);

    match defender {
        Some(defender) => {
            let defender_troops = defender.troops();
            let (traitor_loss, traitor_speed) = if defender.is_traitor() {
                (config.traitor_defense_debuff, config.traitor_speed_debuff)
            } else {
                (1.0, 1.0)
            };
            Ok(AttackResult {
                attacker_troop_loss: within(defender_troops / attack_troops, LOSS_RATIO_MIN, LOSS_RATIO_MAX)
                    * mag
                    * PLAYER_DEFENDER_LOSS_SCALE
                    * large_loss
                    * traitor_loss,
                defender_troop_loss: defender_troops / (defender.tiles_owned().max(1) as f64),
                tiles_per_tick_used: within(
                    defender_troops / (5.0 * attack_troops),
                    SPEED_RATIO_MIN,
                    SPEED_RATIO_MAX,
                ) * speed
                    * large_speed
                    * traitor_speed,
            })
        }
        None => Ok(AttackResult {
            attacker_troop_loss: if attacker.player_type == PlayerType::Bot {
                mag / 10.0
            } else {
                mag / 5.0
            },
            defender_troop_loss: 0.0,
            tiles_per_tick_used: within(
                (2000.0 * speed.max(10.0)) / attack_troops,
                UNCLAIMED_SPEED_MIN,
                UNCLAIMED_SPEED_MAX,
            ),
        }),
    }
}

/// Capture budget for one tick of an attack
pub fn attack_tiles_per_tick(
    game: &GameState,
    attack_troops: f64,
    defender: Owner,
    adjacent_enemy_tiles: u32,
) -> Result<f64> {
    let adjacent = f64::from(adjacent_enemy_tiles);
    match defender {
        Owner::Player(id) => {
            let defender_troops = game.require_player(id)?.troops();
            Ok(within(
                (5.0 * attack_troops / defender_troops) * 2.0,
                TILES_PER_TICK_RATIO_MIN,
                TILES_PER_TICK_RATIO_MAX,
            ) * adjacent
                * 3.0)
        }
        Owner::TerraNullius => Ok(adjacent * 2.0),
    }
}

/// Troops a player sends on a boat attack
pub fn boat_attack_amount(attacker: &Player) -> f64 {
    (attacker.troops() / BOAT_TROOP_DIVISOR).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::map::GameMap;
    use crate::game::player::PlayerInfo;
    use proptest::prelude::*;

    struct Arena {
        game: GameState,
        config: RuleConfig,
        attacker: PlayerId,
        defender: PlayerId,
    }

    fn arena(rows: &[&str], attacker_type: PlayerType, defender_type: PlayerType) -> Arena {
        let config = RuleConfig::default();
        let mut game = GameState::new(GameMap::from_rows(rows).unwrap(), &config);
        let attacker = game.add_player(PlayerInfo::new("Attacker", attacker_type), &config);
        let defender = game.add_player(PlayerInfo::new("Defender", defender_type), &config);
        Arena {
            game,
            config,
            attacker,
            defender,
        }
    }

    /// Give the defender `tiles` tiles from the top-left and set its troops
    fn garrison(a: &mut Arena, tiles: u32, troops: f64) {
        for i in 0..tiles {
            let t = TileRef(i);
            a.game.conquer(a.defender, t).unwrap();
        }
        let p = a.game.player_mut(a.defender).unwrap();
        let current = p.troops();
        p.add_troops(troops - current);
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_plains_golden_values() {
        let mut a = arena(&["....", "....", "...."], PlayerType::Human, PlayerType::Human);
        garrison(&mut a, 4, 1000.0);
        let tile = a.game.map().tile_ref(1, 0).unwrap();

        let r = attack_logic(&a.game, &a.config, 1000.0, a.attacker, Owner::Player(a.defender), tile).unwrap();
        // ratio 1.0 inside [0.6, 2]: 1 * 80 * 0.8
        assert!(approx(r.attacker_troop_loss, 64.0));
        assert!(approx(r.defender_troop_loss, 250.0));
        // ratio 0.2 at the lower bound: 0.2 * 16.5
        assert!(approx(r.tiles_per_tick_used, 3.3));
    }

    #[test]
    fn test_terrain_scales_magnitude() {
        let mut a = arena(&[".^M"], PlayerType::Human, PlayerType::Human);
        garrison(&mut a, 3, 3000.0);
        let losses: Vec<f64> = (0..3)
            .map(|x| {
                let t = a.game.map().tile_ref(x, 0).unwrap();
                attack_logic(&a.game, &a.config, 3000.0, a.attacker, Owner::Player(a.defender), t)
                    .unwrap()
                    .attacker_troop_loss
            })
            .collect();
        assert!(approx(losses[0], 64.0));
        assert!(approx(losses[1], 80.0));
        assert!(approx(losses[2], 96.0));
    }

    #[test]
    fn test_water_is_an_error() {
        let a = arena(&[".~"], PlayerType::Human, PlayerType::Human);
        let water = a.game.map().tile_ref(1, 0).unwrap();
        let err = attack_logic(&a.game, &a.config, 100.0, a.attacker, Owner::TerraNullius, water).unwrap_err();
        assert!(matches!(err, SimError::UnsupportedTerrain { terrain: Terrain::Ocean, .. }));
    }

    #[test]
    fn test_defense_post_applies_once() {
        let mut a = arena(&["....", "....", "...."], PlayerType::Human, PlayerType::Human);
        garrison(&mut a, 4, 1000.0);
        let tile = a.game.map().tile_ref(1, 0).unwrap();
        let base = attack_logic(&a.game, &a.config, 1000.0, a.attacker, Owner::Player(a.defender), tile).unwrap();

        a.game.build_unit(UnitType::DefensePost, a.defender, TileRef(0)).unwrap();
        a.game.build_unit(UnitType::DefensePost, a.defender, TileRef(2)).unwrap();
        let r = attack_logic(&a.game, &a.config, 1000.0, a.attacker, Owner::Player(a.defender), tile).unwrap();
        assert!(approx(r.attacker_troop_loss, base.attacker_troop_loss * 5.0));
        assert!(approx(r.tiles_per_tick_used, base.tiles_per_tick_used * 3.0));
    }

    #[test]
    fn test_foreign_defense_post_ignored() {
        let mut a = arena(&["....", "...."], PlayerType::Human, PlayerType::Human);
        garrison(&mut a, 4, 1000.0);
        let tile = a.game.map().tile_ref(1, 0).unwrap();
        a.game.build_unit(UnitType::DefensePost, a.attacker, TileRef(0)).unwrap();
        let r = attack_logic(&a.game, &a.config, 1000.0, a.attacker, Owner::Player(a.defender), tile).unwrap();
        assert!(approx(r.attacker_troop_loss, 64.0));
    }

    #[test]
    fn test_fallout_modifier() {
        let mut a = arena(&["....", "...."], PlayerType::Human, PlayerType::Human);
        garrison(&mut a, 4, 1000.0);
        let tile = a.game.map().tile_ref(1, 0).unwrap();
        // 2 of 8 land tiles irradiated: ratio 0.25, modifier 4.5
        a.game.set_fallout(tile, true).unwrap();
        a.game.set_fallout(TileRef(7), true).unwrap();
        let r = attack_logic(&a.game, &a.config, 1000.0, a.attacker, Owner::Player(a.defender), tile).unwrap();
        assert!(approx(r.attacker_troop_loss, 64.0 * 4.5));
        assert!(approx(r.tiles_per_tick_used, 3.3 * 4.5));
    }

    #[test]
    fn test_human_vs_bot_discount() {
        for attacker_type in [PlayerType::Human, PlayerType::FakeHuman] {
            let mut a = arena(&["...."], attacker_type, PlayerType::Bot);
            garrison(&mut a, 2, 1000.0);
            let tile = a.game.map().tile_ref(1, 0).unwrap();
            let r = attack_logic(&a.game, &a.config, 1000.0, a.attacker, Owner::Player(a.defender), tile).unwrap();
            assert!(approx(r.attacker_troop_loss, 64.0 * 0.8));
        }

        let mut a = arena(&["...."], PlayerType::Bot, PlayerType::Bot);
        garrison(&mut a, 2, 1000.0);
        let tile = a.game.map().tile_ref(1, 0).unwrap();
        let r = attack_logic(&a.game, &a.config, 1000.0, a.attacker, Owner::Player(a.defender), tile).unwrap();
        assert!(approx(r.attacker_troop_loss, 64.0));
    }

    #[test]
    fn test_traitor_defender_debuffs() {
        let mut a = arena(&["...."], PlayerType::Human, PlayerType::Human);
        garrison(&mut a, 2, 1000.0);
        a.game.mark_traitor(a.defender, &a.config).unwrap();
        let tile = a.game.map().tile_ref(1, 0).unwrap();
        let r = attack_logic(&a.game, &a.config, 1000.0, a.attacker, Owner::Player(a.defender), tile).unwrap();
        assert!(approx(r.attacker_troop_loss, 64.0 * 0.5));
        assert!(approx(r.tiles_per_tick_used, 3.3 * 0.7));
        // Defender loss is not discounted
        assert!(approx(r.defender_troop_loss, 500.0));
    }

    #[test]
    fn test_loss_ratio_clamps() {
        let mut a = arena(&["...."], PlayerType::Human, PlayerType::Human);
        garrison(&mut a, 2, 100_000.0);
        let tile = a.game.map().tile_ref(1, 0).unwrap();
        // Outnumbered 100:1, ratio saturates at 2
        let r = attack_logic(&a.game, &a.config, 1000.0, a.attacker, Owner::Player(a.defender), tile).unwrap();
        assert!(approx(r.attacker_troop_loss, 2.0 * 64.0));
        assert!(approx(r.tiles_per_tick_used, 1.5 * 16.5));
    }

    #[test]
    fn test_large_attacker_dampening() {
        let mut a = arena(&["...."], PlayerType::Human, PlayerType::Human);
        garrison(&mut a, 2, 1000.0);
        let attacker = a.game.player(a.attacker).unwrap().clone();
        let (loss, speed) = large_attacker_factors(&attacker);
        assert_eq!((loss, speed), (1.0, 1.0));

        let mut big = attacker;
        for _ in 0..200_000 {
            big.gain_tile();
        }
        let (loss, speed) = large_attacker_factors(&big);
        assert!(approx(loss, (0.5f64).sqrt()));
        assert!(approx(speed, (0.375f64).powf(0.6)));
    }

    #[test]
    fn test_terra_nullius_costs() {
        let a = arena(&["...."], PlayerType::Human, PlayerType::Human);
        let tile = a.game.map().tile_ref(1, 0).unwrap();
        let r = attack_logic(&a.game, &a.config, 1000.0, a.attacker, Owner::TerraNullius, tile).unwrap();
        assert!(approx(r.attacker_troop_loss, 16.0));
        assert_eq!(r.defender_troop_loss, 0.0);
        // 2000 * 16.5 / 1000 = 33
        assert!(approx(r.tiles_per_tick_used, 33.0));

        let bot = arena(&["...."], PlayerType::Bot, PlayerType::Human);
        let r = attack_logic(&bot.game, &bot.config, 1000.0, bot.attacker, Owner::TerraNullius, tile).unwrap();
        assert!(approx(r.attacker_troop_loss, 8.0));
    }

    #[test]
    fn test_tiles_per_tick() {
        let mut a = arena(&["...."], PlayerType::Human, PlayerType::Human);
        garrison(&mut a, 2, 1000.0);
        assert!(approx(
            attack_tiles_per_tick(&a.game, 1000.0, Owner::TerraNullius, 7).unwrap(),
            14.0
        ));
        // (5 * 10 / 1000) * 2 = 0.1, times 4 adjacent * 3
        assert!(approx(
            attack_tiles_per_tick(&a.game, 10.0, Owner::Player(a.defender), 4).unwrap(),
            1.2
        ));
        // Saturates at 0.5
        assert!(approx(
            attack_tiles_per_tick(&a.game, 1_000_000.0, Owner::Player(a.defender), 4).unwrap(),
            6.0
        ));
    }

    #[test]
    fn test_boat_attack_amount() {
        let mut a = arena(&["."], PlayerType::Human, PlayerType::Human);
        let p = a.game.player_mut(a.attacker).unwrap();
        p.remove_troops(p.troops());
        p.add_troops(1234.0);
        assert_eq!(boat_attack_amount(p), 246.0);
    }

    proptest! {
        #[test]
        fn prop_terra_nullius_defender_never_loses(troops in 0.0f64..1e7, x in 0u32..3) {
            let a = arena(&[".^M"], PlayerType::FakeHuman, PlayerType::Human);
            let tile = a.game.map().tile_ref(x, 0).unwrap();
            let r = attack_logic(&a.game, &a.config, troops, a.attacker, Owner::TerraNullius, tile).unwrap();
            prop_assert_eq!(r.defender_troop_loss, 0.0);
            prop_assert!(r.tiles_per_tick_used >= UNCLAIMED_SPEED_MIN);
            prop_assert!(r.tiles_per_tick_used <= UNCLAIMED_SPEED_MAX);
        }

        #[test]
        fn prop_player_defender_losses_bounded(attack in 1.0f64..1e7, defend in 0.0f64..1e7) {
            let mut a = arena(&["...."], PlayerType::Human, PlayerType::Human);
            garrison(&mut a, 2, defend);
            let tile = a.game.map().tile_ref(1, 0).unwrap();
            let r = attack_logic(&a.game, &a.config, attack, a.attacker, Owner::Player(a.defender), tile).unwrap();
            prop_assert!(r.attacker_troop_loss >= LOSS_RATIO_MIN * 64.0 - 1e-9);
            prop_assert!(r.attacker_troop_loss <= LOSS_RATIO_MAX * 64.0 + 1e-9);
            prop_assert!(r.defender_troop_loss >= 0.0);
        }
    }
}
