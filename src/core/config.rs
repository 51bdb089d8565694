//! Rule configuration with documented constants
//!
//! All tunable numbers consumed by combat, economy, intel and construction
//! live here. The struct is passed by reference into every rule function;
//! there is no global instance.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{Result, SimError};
use crate::core::types::{Gold, Tick};
use crate::game::unit::UnitType;

/// Kind of match being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameType {
    Singleplayer,
    Public,
    Private,
}

/// AI difficulty, scales population for AI-controlled players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Impossible,
}

impl Difficulty {
    /// Multiplier applied to an AI player's population ceiling
    pub fn max_population_multiplier(self) -> f64 {
        match self {
            Difficulty::Easy => 0.5,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 1.5,
            Difficulty::Impossible => 2.0,
        }
    }

    /// Multiplier applied to an AI player's per-tick population growth
    pub fn growth_multiplier(self) -> f64 {
        match self {
            Difficulty::Easy => 0.9,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 1.1,
            Difficulty::Impossible => 1.2,
        }
    }
}

/// Static facts about a unit type under the current rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitInfo {
    pub cost: Gold,
    pub construction_duration: Tick,
    pub upgradable: bool,
    /// Must be placed inside the owner's territory
    pub territory_bound: bool,
}

/// Rules for one game
///
/// Every field has a default; a TOML file only needs to list the values it
/// overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    // === GAME ===
    pub game_type: GameType,

    /// Difficulty applied to FakeHuman players
    pub difficulty: Difficulty,

    /// Human players get an effectively unbounded population ceiling
    pub infinite_troops: bool,

    /// Skip construction countdowns entirely
    pub instant_build: bool,

    /// Spawn phase length for singleplayer games (ticks)
    pub singleplayer_spawn_turns: Tick,

    /// Spawn phase length for every other game type (ticks)
    pub multiplayer_spawn_turns: Tick,

    /// Euclidean radius of the starting territory claimed on spawn
    pub spawn_radius: u32,

    pub starting_population: f64,
    pub starting_troops: f64,

    // === COMBAT ===
    /// Euclidean distance (tiles) within which a defense post protects a tile
    pub defense_post_range: f64,

    /// Attacker loss multiplier when a defense post covers the tile
    pub defense_post_defense_bonus: f64,

    /// Capture-speed multiplier when a defense post covers the tile
    ///
    /// Values above 1 mean the tile costs more of the per-tick budget,
    /// i.e. the attack slows down.
    pub defense_post_speed_bonus: f64,

    /// Attacker loss multiplier against a traitor defender
    pub traitor_defense_debuff: f64,

    /// Capture-speed multiplier against a traitor defender
    pub traitor_speed_debuff: f64,

    /// How long traitor status lasts (ticks)
    pub traitor_duration: Tick,

    // === ECONOMY ===
    /// Population ceiling added per city level
    pub city_population_bonus: f64,

    /// Ceiling used for Human players when `infinite_troops` is on
    pub infinite_population: f64,

    /// Gold per tick is `floor(gold_rate * workers^gold_exponent)`
    pub gold_rate: f64,
    pub gold_exponent: f64,

    /// Fraction of population a player wants under arms by default
    pub default_troop_ratio: f64,

    // === INTEL ===
    pub spy_reveal_chance: f64,
    pub spy_discovery_chance: f64,

    // === NUKES ===
    pub nuke_flight_ticks: Tick,
    pub atom_bomb_radius: u32,
    pub hydrogen_bomb_radius: u32,

    /// Scales a hit player's troop and population loss, which is otherwise
    /// the share of its territory inside the blast
    pub nuke_troop_kill_ratio: f64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            game_type: GameType::Public,
            difficulty: Difficulty::Medium,
            infinite_troops: false,
            instant_build: false,
            singleplayer_spawn_turns: 100,
            multiplayer_spawn_turns: 300,
            spawn_radius: 2,
            starting_population: 25_000.0,
            starting_troops: 10_000.0,

            defense_post_range: 30.0,
            defense_post_defense_bonus: 5.0,
            defense_post_speed_bonus: 3.0,
            traitor_defense_debuff: 0.5,
            traitor_speed_debuff: 0.7,
            traitor_duration: 300,

            city_population_bonus: 250_000.0,
            infinite_population: 1_000_000_000.0,
            gold_rate: 0.045,
            gold_exponent: 0.7,
            default_troop_ratio: 0.95,

            spy_reveal_chance: 0.3,
            spy_discovery_chance: 0.05,

            nuke_flight_ticks: 50,
            atom_bomb_radius: 12,
            hydrogen_bomb_radius: 30,
            nuke_troop_kill_ratio: 1.0,
        }
    }
}

impl RuleConfig {
    /// Load rules from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse rules from a TOML string and validate them
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: RuleConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let probabilities = [
            ("spy_reveal_chance", self.spy_reveal_chance),
            ("spy_discovery_chance", self.spy_discovery_chance),
            ("default_troop_ratio", self.default_troop_ratio),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimError::InvalidConfig(format!(
                    "{} ({}) must be within [0, 1]",
                    name, value
                )));
            }
        }

        if self.starting_troops > self.starting_population {
            return Err(SimError::InvalidConfig(format!(
                "starting_troops ({}) exceeds starting_population ({})",
                self.starting_troops, self.starting_population
            )));
        }

        if self.defense_post_range <= 0.0 || self.gold_rate < 0.0 {
            return Err(SimError::InvalidConfig(
                "defense_post_range must be positive and gold_rate non-negative".into(),
            ));
        }

        Ok(())
    }

    /// Number of ticks players spend placing their starting territory
    pub fn num_spawn_phase_turns(&self) -> Tick {
        match self.game_type {
            GameType::Singleplayer => self.singleplayer_spawn_turns,
            GameType::Public | GameType::Private => self.multiplayer_spawn_turns,
        }
    }

    /// Combat modifier on irradiated tiles, given the share of land with fallout
    pub fn fallout_defense_modifier(&self, fallout_ratio: f64) -> f64 {
        5.0 - fallout_ratio * 2.0
    }

    /// Cost and build rules for `unit_type`, given how many the player already owns
    pub fn unit_info(&self, unit_type: UnitType, owned: u32) -> UnitInfo {
        let doubling = |base: Gold, cap: Gold| -> Gold {
            let factor = 1u64.checked_shl(owned.min(63)).unwrap_or(u64::MAX);
            base.saturating_mul(factor).min(cap)
        };
        let linear = |step: Gold, cap: Gold| -> Gold {
            step.saturating_mul(u64::from(owned) + 1).min(cap)
        };

        let (cost, duration, upgradable, territory_bound) = match unit_type {
            UnitType::DefensePost => (linear(50_000, 250_000), 50, false, true),
            UnitType::SamLauncher => (linear(1_500_000, 3_000_000), 300, true, true),
            UnitType::MissileSilo => (1_000_000, 100, true, true),
            UnitType::City => (doubling(125_000, 1_000_000), 20, true, true),
            UnitType::Port => (doubling(125_000, 1_000_000), 20, true, true),
            UnitType::Factory => (doubling(125_000, 1_000_000), 20, true, true),
            UnitType::TrainStation => (0, 0, false, true),
            UnitType::Spy => (linear(100_000, 500_000), 10, false, false),
            UnitType::Satellite => (2_000_000, 100, false, true),
            UnitType::Warship => (linear(250_000, 1_000_000), 0, false, false),
            UnitType::TransportShip => (0, 0, false, false),
            UnitType::AtomBomb => (750_000, 0, false, false),
            UnitType::HydrogenBomb => (5_000_000, 0, false, false),
        };

        UnitInfo {
            cost,
            construction_duration: if self.instant_build { 0 } else { duration },
            upgradable,
            territory_bound,
        }
    }

    /// Blast radius for a nuke type, `None` for anything that is not a bomb
    pub fn nuke_radius(&self, unit_type: UnitType) -> Option<u32> {
        match unit_type {
            UnitType::AtomBomb => Some(self.atom_bomb_radius),
            UnitType::HydrogenBomb => Some(self.hydrogen_bomb_radius),
            _ => None,
        }
    }
}
