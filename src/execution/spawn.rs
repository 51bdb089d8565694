//! Starting territory placement

use crate::core::error::Result;
use crate::core::types::{Owner, PlayerId, TileRef};
use crate::execution::{Execution, PlayerExecution, TickContext};

/// Places a player's starting territory around `tile`
///
/// Only valid during the spawn phase. Spawning again before the phase ends
/// moves the player: its previous territory is released first.
#[derive(Debug)]
pub struct SpawnExecution {
    player: PlayerId,
    tile: TileRef,
    active: bool,
}

impl SpawnExecution {
    pub fn new(player: PlayerId, tile: TileRef) -> Self {
        Self {
            player,
            tile,
            active: true,
        }
    }
}

impl Execution for SpawnExecution {
    fn name(&self) -> &'static str {
        "SpawnExecution"
    }

    fn init(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        if !ctx.game.has_player(self.player) {
            tracing::warn!("SpawnExecution: player {} not found", self.player);
            self.active = false;
        } else if !ctx.game.map().is_valid(self.tile) {
            tracing::warn!("SpawnExecution: {} is off the map", self.tile);
            self.active = false;
        }
        Ok(())
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        self.active = false;

        if !ctx.game.in_spawn_phase() {
            tracing::warn!("SpawnExecution: spawn phase is over, {} cannot spawn", self.player);
            return Ok(());
        }
        if !ctx.game.map().is_land(self.tile) {
            tracing::warn!("SpawnExecution: {} cannot spawn on water at {}", self.player, self.tile);
            return Ok(());
        }
        match ctx.game.owner(self.tile)? {
            Owner::TerraNullius => {}
            Owner::Player(owner) if owner == self.player => {}
            Owner::Player(owner) => {
                tracing::warn!("SpawnExecution: {} is already held by {}", self.tile, owner);
                return Ok(());
            }
        }

        for old in ctx.game.tiles_owned_by(Owner::Player(self.player)) {
            ctx.game.relinquish(old)?;
        }

        let radius = ctx.config.spawn_radius;
        let claim: Vec<TileRef> = ctx
            .game
            .map()
            .tiles_within(self.tile, radius)
            .into_iter()
            .filter(|&t| ctx.game.map().is_land(t))
            .filter(|&t| ctx.game.owner(t).map(|o| o == Owner::TerraNullius).unwrap_or(false))
            .collect();
        for t in &claim {
            ctx.game.conquer(self.player, *t)?;
        }

        let player = ctx.game.require_player_mut(self.player)?;
        if !player.has_spawned() {
            player.mark_spawned();
            ctx.add_execution(Box::new(PlayerExecution::new(self.player)));
        }
        tracing::debug!("{} spawned at {} with {} tiles", self.player, self.tile, claim.len());
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn active_during_spawn_phase(&self) -> bool {
        true
    }
}
