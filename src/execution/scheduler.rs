//! Tick loop over the active execution list
//!
//! Executions are stepped strictly in the order they were admitted. That order
//! is part of the replay contract: two executions touching the same tile in
//! the same tick must always resolve the same way.

use crate::core::config::RuleConfig;
use crate::core::error::Result;
use crate::core::types::Tick;
use crate::execution::{Execution, TickContext};
use crate::game::state::GameState;

/// Lifecycle of a scheduled execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    Uninitialized,
    Active,
    /// Absorbing; the execution is dropped at the end of the tick
    Terminated,
}

#[derive(Debug)]
struct Slot {
    execution: Box<dyn Execution>,
    state: ExecutionState,
}

/// Summary of one `execute_tick`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: Tick,
    /// Executions whose `tick` ran
    pub stepped: usize,
    /// Executions left untouched because of the spawn phase
    pub deferred: usize,
    /// Executions removed for good this tick
    pub terminated: usize,
}

#[derive(Debug, Default)]
pub struct ExecutionScheduler {
    active: Vec<Slot>,
    /// Admitted at the start of the next tick, never mid-tick
    pending: Vec<Box<dyn Execution>>,
}

impl ExecutionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_execution(&mut self, execution: Box<dyn Execution>) {
        self.pending.push(execution);
    }

    /// Executions admitted and not yet terminated
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Names and states of admitted executions, in stepping order
    pub fn snapshot(&self) -> Vec<(&'static str, ExecutionState)> {
        self.active
            .iter()
            .map(|s| (s.execution.name(), s.state))
            .collect()
    }

    /// Run one tick: admit pending work, step every eligible execution in
    /// admission order, drop the ones that finished, then advance the clock
    ///
    /// A returned error means an execution hit a broken invariant; the game
    /// should not be ticked again.
    pub fn execute_tick(&mut self, game: &mut GameState, config: &RuleConfig) -> Result<TickReport> {
        self.active.extend(self.pending.drain(..).map(|execution| Slot {
            execution,
            state: ExecutionState::Uninitialized,
        }));

        let in_spawn_phase = game.in_spawn_phase();
        let mut spawned: Vec<Box<dyn Execution>> = Vec::new();
        let mut report = TickReport {
            tick: game.ticks(),
            ..TickReport::default()
        };

        for slot in &mut self.active {
            if in_spawn_phase && !slot.execution.active_during_spawn_phase() {
                report.deferred += 1;
                continue;
            }

            let mut ctx = TickContext::new(game, config, &mut spawned);

            if slot.state == ExecutionState::Uninitialized {
                slot.execution.init(&mut ctx)?;
                slot.state = ExecutionState::Active;
                if !slot.execution.is_active() {
                    slot.state = ExecutionState::Terminated;
                    continue;
                }
            }

            slot.execution.tick(&mut ctx)?;
            report.stepped += 1;
            if !slot.execution.is_active() {
                slot.state = ExecutionState::Terminated;
            }
        }

        let before = self.active.len();
        self.active.retain(|s| s.state != ExecutionState::Terminated);
        report.terminated = before - self.active.len();

        self.pending.extend(spawned);
        game.advance_tick();

        Ok(report)
    }
}
