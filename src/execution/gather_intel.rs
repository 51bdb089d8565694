use crate::core::error::{Result, SimError};
use crate::core::types::PlayerId;
use crate::execution::{Execution, TickContext};
use crate::intel::{gather_defense_intel, has_intel_units};

/// One-shot gather of a target's defenses
///
/// Produces at most one report no matter how long it stays scheduled.
#[derive(Debug)]
pub struct GatherDefenseIntelExecution {
    requestor: PlayerId,
    target_id: PlayerId,
    target: Option<PlayerId>,
    active: bool,
}

impl GatherDefenseIntelExecution {
    pub fn new(requestor: PlayerId, target_id: PlayerId) -> Self {
        Self {
            requestor,
            target_id,
            target: None,
            active: true,
        }
    }
}

impl Execution for GatherDefenseIntelExecution {
    fn name(&self) -> &'static str {
        "GatherDefenseIntelExecution"
    }

    fn init(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        if !ctx.game.has_player(self.requestor) {
            tracing::warn!("GatherDefenseIntelExecution: requestor {} not found", self.requestor);
            self.active = false;
            return Ok(());
        }
        if self.target_id == self.requestor {
            tracing::warn!("GatherDefenseIntelExecution: {} cannot gather intel on itself", self.requestor);
            self.active = false;
            return Ok(());
        }
        match ctx.game.player(self.target_id) {
            None => {
                tracing::warn!("GatherDefenseIntelExecution: target {} not found", self.target_id);
                self.active = false;
            }
            Some(target) if !target.is_alive() => {
                tracing::warn!("GatherDefenseIntelExecution: target {} already defeated", self.target_id);
                self.active = false;
            }
            Some(target) => self.target = Some(target.id),
        }
        Ok(())
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        let target = self
            .target
            .ok_or(SimError::NotInitialized("GatherDefenseIntelExecution"))?;
        self.active = false;

        if !has_intel_units(ctx.game, self.requestor) {
            tracing::warn!(
                "{} has no spy or satellite; intel on {} not gathered",
                self.requestor,
                target
            );
            return Ok(());
        }

        gather_defense_intel(ctx.game, self.requestor, target);
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
