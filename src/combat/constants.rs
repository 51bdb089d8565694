//! Combat constants - the fixed parts of conquest resolution
//!
//! Tunable values that vary per game (defense posts, traitor debuffs) live in
//! `RuleConfig`; these are the terrain baselines and scale breakpoints.

// Terrain baselines: (loss magnitude, capture cost per tile)
pub const PLAINS_MAGNITUDE: f64 = 80.0;
pub const PLAINS_SPEED: f64 = 16.5;
pub const HIGHLAND_MAGNITUDE: f64 = 100.0;
pub const HIGHLAND_SPEED: f64 = 20.0;
pub const MOUNTAIN_MAGNITUDE: f64 = 120.0;
pub const MOUNTAIN_SPEED: f64 = 25.0;

/// Human-like attackers take reduced losses against bots
pub const BOT_DEFENDER_MAGNITUDE: f64 = 0.8;

/// Attackers above this many tiles take reduced losses
pub const LARGE_ATTACKER_LOSS_TILES: f64 = 100_000.0;

/// Attackers above this many tiles conquer more slowly
pub const LARGE_ATTACKER_SPEED_TILES: f64 = 75_000.0;

/// Kept below 0.5 so very large empires still slow down noticeably
pub const LARGE_ATTACKER_SPEED_EXPONENT: f64 = 0.6;

/// Share of the loss magnitude an attacker pays against a player defender
pub const PLAYER_DEFENDER_LOSS_SCALE: f64 = 0.8;

// Clamp bounds
pub const LOSS_RATIO_MIN: f64 = 0.6;
pub const LOSS_RATIO_MAX: f64 = 2.0;
pub const SPEED_RATIO_MIN: f64 = 0.2;
pub const SPEED_RATIO_MAX: f64 = 1.5;
pub const UNCLAIMED_SPEED_MIN: f64 = 5.0;
pub const UNCLAIMED_SPEED_MAX: f64 = 100.0;
pub const TILES_PER_TICK_RATIO_MIN: f64 = 0.01;
pub const TILES_PER_TICK_RATIO_MAX: f64 = 0.5;

/// Share of a player's troops put on a boat
pub const BOAT_TROOP_DIVISOR: f64 = 5.0;
