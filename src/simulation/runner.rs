use crate::core::config::RuleConfig;
use crate::core::error::Result;
use crate::core::types::{PlayerId, Tick};
use crate::execution::{Execution, ExecutionScheduler, TickReport};
use crate::game::map::GameMap;
use crate::game::player::PlayerInfo;
use crate::game::state::GameState;
use crate::simulation::summary::SimulationSummary;

/// One match: state, rules and the execution queue
#[derive(Debug)]
pub struct Simulation {
    state: GameState,
    scheduler: ExecutionScheduler,
    config: RuleConfig,
}

impl Simulation {
    /// Fails if `config` is internally inconsistent
    pub fn new(map: GameMap, config: RuleConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            "New {:?} game on {}x{} map ({} land tiles), {} spawn turns",
            config.game_type,
            map.width(),
            map.height(),
            map.num_land_tiles(),
            config.num_spawn_phase_turns()
        );
        Ok(Self {
            state: GameState::new(map, &config),
            scheduler: ExecutionScheduler::new(),
            config,
        })
    }

    pub fn add_player(&mut self, info: PlayerInfo) -> PlayerId {
        self.state.add_player(info, &self.config)
    }

    /// Queue an intent; it is admitted at the start of the next tick
    pub fn submit(&mut self, execution: Box<dyn Execution>) {
        self.scheduler.add_execution(execution);
    }

    pub fn step(&mut self) -> Result<TickReport> {
        self.scheduler.execute_tick(&mut self.state, &self.config)
    }

    /// Step `ticks` times, stopping at the first fatal error
    pub fn run(&mut self, ticks: Tick) -> Result<()> {
        for _ in 0..ticks {
            self.step()?;
        }
        Ok(())
    }

    /// Step until the spawn phase is over
    pub fn run_spawn_phase(&mut self) -> Result<()> {
        while self.state.in_spawn_phase() {
            self.step()?;
        }
        Ok(())
    }

    pub fn ticks(&self) -> Tick {
        self.state.ticks()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for scenario setup
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &ExecutionScheduler {
        &self.scheduler
    }

    pub fn state_hash(&self) -> u64 {
        self.state.state_hash()
    }

    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary::capture(&self.state)
    }
}
