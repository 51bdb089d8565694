//! Continuous reconnaissance by a single spy
//!
//! While the spy stands on enemy territory, each tick has a chance to leak a
//! full defense report on that enemy and, independently, a chance that the
//! spy is caught and destroyed.

use crate::core::config::RuleConfig;
use crate::core::error::{Result, SimError};
use crate::core::rng::PseudoRandom;
use crate::core::types::{Owner, PlayerId, UnitId};
use crate::execution::{Execution, TickContext};
use crate::game::unit::UnitType;
use crate::intel::gather_defense_intel;

pub const DEFAULT_REVEAL_CHANCE: f64 = 0.3;
pub const DEFAULT_DISCOVERY_CHANCE: f64 = 0.05;

#[derive(Debug)]
pub struct SpyReconExecution {
    spy: UnitId,
    reveal_chance: f64,
    discovery_chance: f64,
    random: Option<PseudoRandom>,
    active: bool,
}

impl SpyReconExecution {
    pub fn new(spy: UnitId) -> Self {
        Self::with_chances(spy, DEFAULT_REVEAL_CHANCE, DEFAULT_DISCOVERY_CHANCE)
    }

    pub fn with_chances(spy: UnitId, reveal_chance: f64, discovery_chance: f64) -> Self {
        Self {
            spy,
            reveal_chance,
            discovery_chance,
            random: None,
            active: true,
        }
    }

    pub fn from_config(spy: UnitId, config: &RuleConfig) -> Self {
        Self::with_chances(spy, config.spy_reveal_chance, config.spy_discovery_chance)
    }
}

impl Execution for SpyReconExecution {
    fn name(&self) -> &'static str {
        "SpyReconExecution"
    }

    fn init(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        match ctx.game.unit(self.spy) {
            Some(unit) if unit.unit_type == UnitType::Spy => {}
            Some(unit) => {
                tracing::warn!("SpyReconExecution: {} is a {:?}, not a spy", self.spy, unit.unit_type);
                self.active = false;
                return Ok(());
            }
            None => {
                tracing::warn!("SpyReconExecution: {} not found", self.spy);
                self.active = false;
                return Ok(());
            }
        }
        // One stream per spy: a second driver would replay the same draws
        if !ctx.game.bind_unit(self.spy)? {
            tracing::warn!("SpyReconExecution: {} is already on a mission", self.spy);
            self.active = false;
            return Ok(());
        }
        self.random = Some(PseudoRandom::for_unit(self.spy));
        Ok(())
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        let random = self
            .random
            .as_mut()
            .ok_or(SimError::NotInitialized("SpyReconExecution"))?;

        let (controller, tile) = match ctx.game.unit(self.spy) {
            Some(unit) if unit.is_active() => (unit.owner, unit.tile),
            _ => {
                self.active = false;
                return Ok(());
            }
        };

        let target: PlayerId = match ctx.game.owner(tile)? {
            Owner::Player(owner) if owner != controller => owner,
            _ => return Ok(()),
        };

        if random.chance(self.reveal_chance) {
            gather_defense_intel(ctx.game, controller, target);
        }

        if random.chance(self.discovery_chance) {
            ctx.game.delete_unit(self.spy);
            tracing::info!("{} of {} discovered and destroyed by {}", self.spy, controller, target);
            self.active = false;
        }

        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
