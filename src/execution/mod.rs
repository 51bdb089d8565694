//! Executions - player and unit intents run by the scheduler
//!
//! Every command a player issues becomes an `Execution`: a small state
//! machine that is initialized once, stepped once per tick, and dropped the
//! moment it reports itself inactive. There is no way to cancel one from the
//! outside; an execution stops by observing game state (its unit is gone, its
//! target is dead) and deactivating itself.

mod attack;
mod construction;
mod gather_intel;
mod nuke;
mod player;
mod scheduler;
mod spawn;
mod spy_recon;

use std::fmt;

use crate::core::config::RuleConfig;
use crate::core::error::Result;
use crate::core::types::Tick;
use crate::game::state::GameState;

pub use attack::AttackExecution;
pub use construction::{ConstructionExecution, UpgradeStructureExecution};
pub use gather_intel::GatherDefenseIntelExecution;
pub use nuke::NukeExecution;
pub use player::PlayerExecution;
pub use scheduler::{ExecutionScheduler, ExecutionState, TickReport};
pub use spawn::SpawnExecution;
pub use spy_recon::SpyReconExecution;

/// Everything an execution may touch while it runs
pub struct TickContext<'a> {
    pub game: &'a mut GameState,
    pub config: &'a RuleConfig,
    spawned: &'a mut Vec<Box<dyn Execution>>,
}

impl<'a> TickContext<'a> {
    pub(crate) fn new(
        game: &'a mut GameState,
        config: &'a RuleConfig,
        spawned: &'a mut Vec<Box<dyn Execution>>,
    ) -> Self {
        Self { game, config, spawned }
    }

    pub fn ticks(&self) -> Tick {
        self.game.ticks()
    }

    /// Queue a follow-up execution; it starts running on the next tick
    pub fn add_execution(&mut self, execution: Box<dyn Execution>) {
        self.spawned.push(execution);
    }
}

/// A scheduled unit of simulation work
pub trait Execution: fmt::Debug {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// One-time setup. May deactivate the execution if its preconditions fail.
    fn init(&mut self, ctx: &mut TickContext<'_>) -> Result<()>;

    /// One step of work. Errors are reserved for broken invariants; gameplay
    /// failures log a warning and deactivate instead.
    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<()>;

    fn is_active(&self) -> bool;

    /// Whether this execution runs while players are still placing territory
    fn active_during_spawn_phase(&self) -> bool {
        false
    }
}
