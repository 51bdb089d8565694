pub mod constants;
pub mod resolution;

pub use resolution::{attack_logic, attack_tiles_per_tick, boat_attack_amount, AttackResult};
