//! Nuclear strikes launched from a missile silo

use std::collections::BTreeMap;

use crate::core::error::{Result, SimError};
use crate::core::types::{Owner, PlayerId, Tick, TileRef, UnitId};
use crate::execution::{Execution, TickContext};
use crate::game::unit::UnitType;

#[derive(Debug)]
pub struct NukeExecution {
    player: PlayerId,
    bomb: UnitType,
    target: TileRef,
    /// Flight ticks left, set once the launch is paid for
    remaining: Option<Tick>,
    active: bool,
}

impl NukeExecution {
    pub fn new(player: PlayerId, bomb: UnitType, target: TileRef) -> Self {
        Self {
            player,
            bomb,
            target,
            remaining: None,
            active: true,
        }
    }

    fn detonate(&self, ctx: &mut TickContext<'_>) -> Result<()> {
        let radius = ctx
            .config
            .nuke_radius(self.bomb)
            .ok_or(SimError::NotInitialized("NukeExecution"))?;
        let blast: Vec<TileRef> = ctx
            .game
            .map()
            .tiles_within(self.target, radius)
            .into_iter()
            .filter(|&t| ctx.game.map().is_land(t))
            .collect();

        // Share of each player's land inside the blast, taken before anything changes
        let mut hits: BTreeMap<PlayerId, u64> = BTreeMap::new();
        for &t in &blast {
            if let Owner::Player(owner) = ctx.game.owner(t)? {
                *hits.entry(owner).or_insert(0) += 1;
            }
        }
        let mut fractions = Vec::with_capacity(hits.len());
        for (&owner, &hit) in &hits {
            let owned = ctx.game.require_player(owner)?.tiles_owned().max(1);
            fractions.push((owner, (hit as f64 / owned as f64).min(1.0)));
        }

        for &t in &blast {
            ctx.game.set_fallout(t, true)?;
            ctx.game.relinquish(t)?;
        }

        let r_sq = u64::from(radius) * u64::from(radius);
        let destroyed: Vec<UnitId> = ctx
            .game
            .units()
            .filter(|u| ctx.game.map().euclidean_dist_squared(u.tile, self.target) <= r_sq)
            .map(|u| u.id)
            .collect();
        for id in &destroyed {
            ctx.game.delete_unit(*id);
        }

        let kill_ratio = ctx.config.nuke_troop_kill_ratio;
        for (owner, fraction) in fractions {
            let player = ctx.game.require_player_mut(owner)?;
            let loss = fraction * kill_ratio;
            player.remove_troops(player.troops() * loss);
            player.set_population(player.population() * (1.0 - loss));
        }

        tracing::info!(
            "{:?} from {} detonated at {}: {} tiles irradiated, {} units destroyed, {} players hit",
            self.bomb,
            self.player,
            self.target,
            blast.len(),
            destroyed.len(),
            hits.len()
        );
        Ok(())
    }
}

impl Execution for NukeExecution {
    fn name(&self) -> &'static str {
        "NukeExecution"
    }

    fn init(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        let owned = match ctx.game.player(self.player) {
            Some(p) if p.is_alive() => p.units_owned(self.bomb),
            _ => {
                tracing::warn!("NukeExecution: {} is not an active player", self.player);
                self.active = false;
                return Ok(());
            }
        };
        if !self.bomb.is_nuke() {
            tracing::warn!("NukeExecution: {:?} is not a bomb", self.bomb);
            self.active = false;
            return Ok(());
        }
        if !ctx.game.map().is_valid(self.target) {
            tracing::warn!("NukeExecution: target {} is off the map", self.target);
            self.active = false;
            return Ok(());
        }
        let has_silo = ctx
            .game
            .units_of(self.player)
            .any(|u| u.unit_type == UnitType::MissileSilo);
        if !has_silo {
            tracing::warn!("NukeExecution: {} has no missile silo", self.player);
            self.active = false;
            return Ok(());
        }

        let cost = ctx.config.unit_info(self.bomb, owned).cost;
        if !ctx.game.require_player_mut(self.player)?.remove_gold(cost) {
            tracing::warn!("NukeExecution: {} cannot afford {:?} ({} gold)", self.player, self.bomb, cost);
            self.active = false;
            return Ok(());
        }

        tracing::info!("{} launched {:?} at {}", self.player, self.bomb, self.target);
        self.remaining = Some(ctx.config.nuke_flight_ticks);
        Ok(())
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        let remaining = self
            .remaining
            .ok_or(SimError::NotInitialized("NukeExecution"))?;
        if remaining > 1 {
            self.remaining = Some(remaining - 1);
            return Ok(());
        }

        self.detonate(ctx)?;
        self.active = false;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
